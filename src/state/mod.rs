//! State Module - Runtime pointer routing
//!
//! This module contains the systems that turn terminal mouse reports into
//! view notifications:
//!
//! - **Mouse** - Event types, flags, per-view handlers
//! - **Hit test** - Point to view chain, root to topmost
//! - **Grab** - Exclusive pointer capture with cancellable transitions
//! - **Hover** - Enter/leave derivation between events
//! - **Continuous press** - The view wanting repeats while pressed
//! - **Context / Dispatch** - Per-pointer state and the routing pipeline
//! - **Input** - crossterm decoding and mouse capture

mod context;
mod continuous_press;
mod dispatch;
mod grab;
mod hit_test;
mod hover;
mod input;
mod mouse;

pub use context::*;
pub use continuous_press::*;
pub use dispatch::*;
pub use grab::*;
pub use hit_test::*;
pub use hover::*;
pub use input::*;
pub use mouse::*;
