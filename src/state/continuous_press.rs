//! Continuous press - the view that wants "still pressed" repeats.
//!
//! Repeat timing lives with the run loop; this only remembers which view
//! is eligible.

use crate::engine::{ViewId, ViewTree};

use super::mouse::MouseFlags;

#[derive(Debug, Default)]
pub struct ContinuousPress {
    target: Option<ViewId>,
}

impl ContinuousPress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the target for the topmost view under the pointer.
    pub fn update(&mut self, tree: &ViewTree, deepest: Option<ViewId>, flags: MouseFlags) -> Option<ViewId> {
        self.target = deepest.filter(|&view| {
            flags.is_button_down() && tree.get(view).is_some_and(|node| node.wants_continuous_press())
        });
        self.target
    }

    /// The current target, cleared if it has been removed.
    pub fn target(&mut self, tree: &ViewTree) -> Option<ViewId> {
        if self.target.is_some_and(|view| !tree.contains(view)) {
            log::debug!("continuous press target {:?} is gone", self.target);
            self.target = None;
        }
        self.target
    }

    pub fn forget(&mut self, view: ViewId) {
        if self.target == Some(view) {
            self.target = None;
        }
    }

    pub fn clear(&mut self) {
        self.target = None;
    }
}
