//! # spark-views
//!
//! Terminal view tree with hit-testing, pointer grab and mouse routing.
//!
//! ## Architecture
//!
//! Views live in a `slotmap` arena ([`ViewTree`]) and are addressed by
//! [`ViewId`]. A single [`PointerRoutingContext`], owned by the run loop,
//! holds everything that outlives one event: the grab, the views under the
//! mouse and the continuous-press target.
//!
//! Each terminal report flows through:
//! ```text
//! crossterm MouseEvent → PointerDecoder → submit_pointer_event
//!     → hit chain → global subscribers → grab check
//!     → enter/leave → bubbling dispatch → z-order raise
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Geometry and layout value types
//! - [`engine`] - View tree arena, coordinate transforms
//! - [`layout`] - Taffy flexbox layout for the view tree
//! - [`state`] - Pointer routing, grab, hover, crossterm input
//! - [`config`] - Routing options

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::MouseConfig;

pub use engine::{LayoutStyle, ViewFlags, ViewId, ViewKind, ViewNode, ViewTree};

pub use error::{Result, ViewError};

pub use layout::compute_layout;

pub use state::{
    // Routing
    DispatchOutcome, EventCx, PointerRoutingContext,
    // Mouse
    HandlerId, MouseButton, MouseEvent, MouseFlags, MouseHandlers, PointerEvent,
    // Grab
    GrabArgs, GrabState,
    // Hit testing
    hit_chain, HitChain,
    // Input
    convert_modifiers, disable_mouse_capture, enable_mouse_capture, poll_event, read_event,
    route_event, InputEvent, PointerDecoder,
};
