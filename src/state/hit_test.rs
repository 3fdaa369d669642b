//! Hit testing - which views lie under a screen point.
//!
//! Walks down from the root, at each level picking the front-most visible
//! child whose frame contains the point. A view's children are only
//! searched when the point falls inside its viewport, which is how
//! ancestors clip their descendants. When the point is in a view's inset
//! instead, its decorations are tested and a hit ends the walk.

use smallvec::SmallVec;

use crate::engine::{ViewId, ViewTree};
use crate::types::{Point, Rect};

/// Views under a point, outermost first.
pub type HitChain = SmallVec<[ViewId; 16]>;

/// Collect the chain of views containing `point`, from `root` down to the
/// topmost view.
///
/// Empty when `root` is dead, invisible, or does not contain the point.
pub fn hit_chain(tree: &ViewTree, root: ViewId, point: Point) -> HitChain {
    let mut chain = HitChain::new();

    let Some(mut origin) = tree.frame_origin_screen(root) else {
        return chain;
    };
    let mut current = root;

    while let Some(node) = tree.get(current) {
        if !node.is_visible() {
            break;
        }
        let frame = Rect::new(origin.x, origin.y, node.frame().width, node.frame().height);
        if !frame.contains(point) {
            break;
        }
        chain.push(current);

        let viewport = frame.inset(node.inset());
        if !viewport.contains(point) {
            let local = point.relative_to(origin);
            let decoration = node.decorations().iter().rev().copied().find(|&d| {
                tree.get(d).is_some_and(|deco| {
                    deco.is_visible() && deco.ring_contains(local.relative_to(deco.frame().origin()))
                })
            });
            if let Some(decoration) = decoration {
                chain.push(decoration);
            }
            break;
        }

        let content_origin = viewport.origin().relative_to(node.scroll_offset());
        let next = node.children().iter().rev().copied().find_map(|child| {
            let child_node = tree.get(child)?;
            let child_frame = child_node.frame().offset(content_origin);
            (child_node.is_visible() && child_frame.contains(point)).then_some((child, child_frame))
        });

        match next {
            Some((child, child_frame)) => {
                origin = child_frame.origin();
                current = child;
            }
            None => break,
        }
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Thickness;

    struct Fixture {
        tree: ViewTree,
        root: ViewId,
        a: ViewId,
        b: ViewId,
        c: ViewId,
    }

    /// root ⊃ A ⊃ B ⊃ C, no insets.
    fn nested() -> Fixture {
        let mut tree = ViewTree::new();
        let root = tree.set_root(Rect::new(0, 0, 80, 24)).unwrap();
        let a = tree.add_view(root, Rect::new(10, 5, 40, 15)).unwrap();
        let b = tree.add_view(a, Rect::new(5, 2, 20, 8)).unwrap();
        let c = tree.add_view(b, Rect::new(2, 1, 6, 3)).unwrap();
        Fixture { tree, root, a, b, c }
    }

    #[test]
    fn test_chain_root_to_topmost() {
        let f = nested();
        // C occupies screen (17..23, 8..11)
        let chain = hit_chain(&f.tree, f.root, Point::new(18, 9));
        assert_eq!(chain.as_slice(), &[f.root, f.a, f.b, f.c]);
    }

    #[test]
    fn test_chain_stops_at_deepest_container() {
        let f = nested();
        let chain = hit_chain(&f.tree, f.root, Point::new(11, 6));
        assert_eq!(chain.as_slice(), &[f.root, f.a]);
    }

    #[test]
    fn test_chain_empty_outside_root() {
        let f = nested();
        assert!(hit_chain(&f.tree, f.root, Point::new(80, 0)).is_empty());
        assert!(hit_chain(&f.tree, f.root, Point::new(-1, 3)).is_empty());
    }

    #[test]
    fn test_chain_is_deterministic() {
        let f = nested();
        let first = hit_chain(&f.tree, f.root, Point::new(18, 9));
        let second = hit_chain(&f.tree, f.root, Point::new(18, 9));
        assert_eq!(first, second);
    }

    #[test]
    fn test_later_sibling_wins_overlap() {
        let mut f = nested();
        let front = f.tree.add_view(f.root, Rect::new(15, 7, 10, 5)).unwrap();
        let chain = hit_chain(&f.tree, f.root, Point::new(18, 9));
        assert_eq!(chain.as_slice(), &[f.root, front]);

        // Raising A puts it back on top
        f.tree.raise_to_front(f.a);
        let chain = hit_chain(&f.tree, f.root, Point::new(18, 9));
        assert_eq!(chain.as_slice(), &[f.root, f.a, f.b, f.c]);
    }

    #[test]
    fn test_invisible_views_are_skipped() {
        let mut f = nested();
        f.tree.set_visible(f.b, false).unwrap();
        let chain = hit_chain(&f.tree, f.root, Point::new(18, 9));
        assert_eq!(chain.as_slice(), &[f.root, f.a]);
    }

    #[test]
    fn test_invisible_root_hits_nothing() {
        let mut f = nested();
        f.tree.set_visible(f.root, false).unwrap();
        assert!(hit_chain(&f.tree, f.root, Point::new(18, 9)).is_empty());
    }

    #[test]
    fn test_children_clipped_by_parent_viewport() {
        let mut f = nested();
        // D hangs out of B's right edge
        let d = f.tree.add_view(f.b, Rect::new(18, 0, 10, 2)).unwrap();
        // Inside B and D
        assert_eq!(
            hit_chain(&f.tree, f.root, Point::new(34, 7)).as_slice(),
            &[f.root, f.a, f.b, d]
        );
        // Inside D's frame but outside B: clipped
        assert_eq!(
            hit_chain(&f.tree, f.root, Point::new(36, 7)).as_slice(),
            &[f.root, f.a]
        );
    }

    #[test]
    fn test_scroll_offset_moves_children() {
        let mut f = nested();
        f.tree.set_scroll_offset(f.b, Point::new(0, 1)).unwrap();
        // C shifted up one row: now covers rows 7..10
        assert_eq!(
            hit_chain(&f.tree, f.root, Point::new(18, 7)).as_slice(),
            &[f.root, f.a, f.b, f.c]
        );
        assert_eq!(
            hit_chain(&f.tree, f.root, Point::new(18, 10)).as_slice(),
            &[f.root, f.a, f.b]
        );
    }

    #[test]
    fn test_decoration_hit_in_inset() {
        let mut f = nested();
        f.tree.set_inset(f.a, Thickness::uniform(1)).unwrap();
        let border = f
            .tree
            .add_decoration(f.a, Rect::new(0, 0, 40, 15), Thickness::uniform(1))
            .unwrap();

        // Top-left corner of A is the border
        assert_eq!(
            hit_chain(&f.tree, f.root, Point::new(10, 5)).as_slice(),
            &[f.root, f.a, border]
        );
        // Inside the viewport the border is not hit
        assert_eq!(
            hit_chain(&f.tree, f.root, Point::new(11, 6)).as_slice(),
            &[f.root, f.a]
        );
    }

    #[test]
    fn test_every_chain_member_contains_point() {
        let f = nested();
        let point = Point::new(18, 9);
        for &view in &hit_chain(&f.tree, f.root, point) {
            assert!(f.tree.bounds_contain_screen(view, point));
        }
    }
}
