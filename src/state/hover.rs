//! Hover tracking - enter/leave derivation from consecutive hit chains.
//!
//! The tracker keeps the previous chain along with whether each view was
//! inside its bounds when last evaluated. `diff` only computes which views
//! cross; the dispatcher delivers the notifications so that handlers can
//! touch the tree.

use smallvec::SmallVec;

use crate::engine::{ViewId, ViewTree};
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HoverEntry {
    view: ViewId,
    inside: bool,
}

/// Views to notify for one event, leaves first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Crossings {
    pub leaves: SmallVec<[ViewId; 8]>,
    pub enters: SmallVec<[ViewId; 8]>,
}

impl Crossings {
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.enters.is_empty()
    }
}

/// The views-under-mouse set.
#[derive(Debug, Default)]
pub struct HoverTracker {
    entries: Vec<HoverEntry>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the stored chain against `chain` and store `chain`.
    ///
    /// - A view that dropped out of the chain gets a leave if it had been
    ///   entered, is still attached, and no longer contains `point`.
    /// - A view in `chain` gets an enter when it contains `point` and was
    ///   not inside at the previous evaluation.
    /// - A view in both chains whose bounds test went from inside to
    ///   outside gets a leave.
    pub fn diff(&mut self, tree: &ViewTree, chain: &[ViewId], point: Point) -> Crossings {
        let mut crossings = Crossings::default();

        for entry in &self.entries {
            if !entry.inside || chain.contains(&entry.view) {
                continue;
            }
            if tree.is_attached(entry.view) && !tree.bounds_contain_screen(entry.view, point) {
                crossings.leaves.push(entry.view);
            }
        }

        let previous = std::mem::take(&mut self.entries);
        for &view in chain {
            let inside = tree.bounds_contain_screen(view, point);
            let was_inside = previous
                .iter()
                .find(|entry| entry.view == view)
                .is_some_and(|entry| entry.inside);

            if inside && !was_inside {
                crossings.enters.push(view);
            } else if !inside && was_inside {
                crossings.leaves.push(view);
            }
            self.entries.push(HoverEntry { view, inside });
        }

        crossings
    }

    /// The stored chain, outermost first.
    pub fn views(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.entries.iter().map(|entry| entry.view)
    }

    /// Whether `view` is in the stored chain and was inside its bounds.
    pub fn is_hovered(&self, view: ViewId) -> bool {
        self.entries.iter().any(|entry| entry.view == view && entry.inside)
    }

    /// Record `view` as outside its bounds without a full diff.
    ///
    /// Returns `true` if it had been inside, meaning a leave is due.
    pub fn mark_outside(&mut self, view: ViewId) -> bool {
        match self.entries.iter_mut().find(|entry| entry.view == view && entry.inside) {
            Some(entry) => {
                entry.inside = false;
                true
            }
            None => false,
        }
    }

    /// Drop a view that has been removed from the tree.
    pub fn forget(&mut self, view: ViewId) {
        self.entries.retain(|entry| entry.view != view);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::hit_test::hit_chain;
    use crate::types::Rect;

    fn tree() -> (ViewTree, ViewId, ViewId, ViewId) {
        let mut tree = ViewTree::new();
        let root = tree.set_root(Rect::new(0, 0, 80, 24)).unwrap();
        let a = tree.add_view(root, Rect::new(10, 5, 30, 10)).unwrap();
        let c = tree.add_view(a, Rect::new(5, 2, 5, 3)).unwrap();
        (tree, root, a, c)
    }

    fn step(tracker: &mut HoverTracker, tree: &ViewTree, root: ViewId, point: Point) -> Crossings {
        let chain = hit_chain(tree, root, point);
        tracker.diff(tree, &chain, point)
    }

    #[test]
    fn test_first_event_enters_whole_chain() {
        let (tree, root, a, _) = tree();
        let mut tracker = HoverTracker::new();
        let crossings = step(&mut tracker, &tree, root, Point::new(11, 6));
        assert_eq!(crossings.enters.as_slice(), &[root, a]);
        assert!(crossings.leaves.is_empty());
    }

    #[test]
    fn test_stationary_pointer_is_quiet() {
        let (tree, root, _, _) = tree();
        let mut tracker = HoverTracker::new();
        step(&mut tracker, &tree, root, Point::new(11, 6));
        let crossings = step(&mut tracker, &tree, root, Point::new(11, 6));
        assert!(crossings.is_empty());
    }

    #[test]
    fn test_move_into_nested_child_enters_only_child() {
        let (tree, root, _, c) = tree();
        let mut tracker = HoverTracker::new();
        step(&mut tracker, &tree, root, Point::new(11, 6));

        // C covers screen (15..20, 7..10)
        let crossings = step(&mut tracker, &tree, root, Point::new(16, 8));
        assert_eq!(crossings.enters.as_slice(), &[c]);
        assert!(crossings.leaves.is_empty());
    }

    #[test]
    fn test_move_out_leaves_once() {
        let (tree, root, a, c) = tree();
        let mut tracker = HoverTracker::new();
        step(&mut tracker, &tree, root, Point::new(16, 8));

        let crossings = step(&mut tracker, &tree, root, Point::new(2, 2));
        assert_eq!(crossings.leaves.as_slice(), &[a, c]);
        assert!(crossings.enters.is_empty());

        let crossings = step(&mut tracker, &tree, root, Point::new(3, 2));
        assert!(crossings.is_empty());
    }

    #[test]
    fn test_removed_view_gets_no_leave() {
        let (mut tree, root, a, _) = tree();
        let mut tracker = HoverTracker::new();
        step(&mut tracker, &tree, root, Point::new(16, 8));

        tree.remove(a).unwrap();
        let crossings = step(&mut tracker, &tree, root, Point::new(16, 8));
        assert!(crossings.leaves.is_empty());
        assert!(crossings.enters.is_empty());
    }

    #[test]
    fn test_occluded_view_keeps_silent() {
        let (mut tree, root, a, _) = tree();
        let mut tracker = HoverTracker::new();
        step(&mut tracker, &tree, root, Point::new(11, 6));

        // A sibling covers A; the pointer is still inside A's frame
        let cover = tree.add_view(root, Rect::new(10, 5, 5, 5)).unwrap();
        let crossings = step(&mut tracker, &tree, root, Point::new(11, 6));
        assert_eq!(crossings.enters.as_slice(), &[cover]);
        assert!(crossings.leaves.is_empty());
        assert!(!tracker.views().any(|v| v == a));
    }

    #[test]
    fn test_is_hovered_and_forget() {
        let (tree, root, a, c) = tree();
        let mut tracker = HoverTracker::new();
        step(&mut tracker, &tree, root, Point::new(11, 6));
        assert!(tracker.is_hovered(a));
        assert!(!tracker.is_hovered(c));

        tracker.forget(a);
        assert!(!tracker.is_hovered(a));
        assert_eq!(tracker.views().collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn test_mark_outside_then_reenter() {
        let (tree, root, a, _) = tree();
        let mut tracker = HoverTracker::new();
        step(&mut tracker, &tree, root, Point::new(11, 6));

        assert!(tracker.mark_outside(a));
        assert!(!tracker.mark_outside(a));

        // Back under the pointer, A is entered again
        let crossings = step(&mut tracker, &tree, root, Point::new(11, 6));
        assert_eq!(crossings.enters.as_slice(), &[a]);
    }
}
