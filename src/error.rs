//! Error type for view tree mutation and layout.
//!
//! Pointer routing never returns these: a dead view met during routing is
//! treated as absent.

use crate::engine::ViewId;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("view {0:?} is not in the tree")]
    StaleView(ViewId),

    #[error("view tree has no root")]
    NoRoot,

    #[error("view tree already has a root ({0:?})")]
    RootExists(ViewId),

    #[error("cannot move {view:?} under its own descendant {parent:?}")]
    Cycle { view: ViewId, parent: ViewId },

    #[error("decorative view {0:?} cannot own children or decorations")]
    DecorativeParent(ViewId),

    #[error("the root view cannot be moved")]
    RootMove,

    #[error("layout failed: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
