//! View engine - the arena that holds the view tree.
//!
//! Views are NOT objects with back-pointers. They are entries in a
//! `SlotMap` addressed by `ViewId`:
//!
//! ```text
//! root    (parent=None,   children=[window_a, window_b])
//! window_a (parent=root,  children=[button],  decorations=[border])
//! border  (parent=window_a, kind=Decorative)
//! ```
//!
//! Children are kept back to front, so the last child is drawn on top and
//! wins hit-testing. A removed view's id no longer resolves, which makes
//! "is this view still alive" an O(1) lookup.

mod node;
mod tree;

pub use node::*;
pub use tree::*;

slotmap::new_key_type! {
    /// Identifier of a view in a [`ViewTree`].
    pub struct ViewId;
}
