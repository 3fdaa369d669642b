//! View Tree - arena of views keyed by `ViewId`.
//!
//! Parent links are plain ids used for traversal only; the arena owns every
//! node. A removed view's id stops resolving immediately, which is how the
//! router detects stale references.

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{Result, ViewError};
use crate::state::MouseHandlers;
use crate::types::{CoordSpace, Point, Rect, Thickness};

use super::node::{LayoutStyle, ViewFlags, ViewKind, ViewNode};
use super::ViewId;

type DestroyCallback = Box<dyn FnOnce(ViewId)>;

/// The view tree.
#[derive(Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
    root: Option<ViewId>,
    destroy_callbacks: SecondaryMap<ViewId, Vec<DestroyCallback>>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Create the root view. Its frame is in screen coordinates.
    pub fn set_root(&mut self, frame: Rect) -> Result<ViewId> {
        if let Some(root) = self.root {
            return Err(ViewError::RootExists(root));
        }
        let id = self.nodes.insert(ViewNode::new(ViewKind::Content, None, frame));
        self.root = Some(id);
        Ok(id)
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    /// Add a content view in front of `parent`'s existing children.
    pub fn add_view(&mut self, parent: ViewId, frame: Rect) -> Result<ViewId> {
        self.content_node(parent)?;
        let id = self
            .nodes
            .insert(ViewNode::new(ViewKind::Content, Some(parent), frame));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Add a decoration to `owner`. `frame` is relative to the owner's
    /// frame; `inset` cuts the hole the decoration surrounds.
    pub fn add_decoration(&mut self, owner: ViewId, frame: Rect, inset: Thickness) -> Result<ViewId> {
        self.content_node(owner)?;
        let mut node = ViewNode::new(ViewKind::Decorative { owner }, Some(owner), frame);
        node.inset = inset;
        let id = self.nodes.insert(node);
        self.node_mut(owner)?.decorations.push(id);
        Ok(id)
    }

    /// Reparent a content view, placing it in front of its new siblings.
    pub fn move_view(&mut self, view: ViewId, new_parent: ViewId) -> Result<()> {
        if Some(view) == self.root {
            return Err(ViewError::RootMove);
        }
        self.content_node(view)?;
        self.content_node(new_parent)?;

        let mut current = Some(new_parent);
        while let Some(id) = current {
            if id == view {
                return Err(ViewError::Cycle {
                    view,
                    parent: new_parent,
                });
            }
            current = self.parent(id);
        }

        self.detach(view);
        self.node_mut(new_parent)?.children.push(view);
        self.node_mut(view)?.parent = Some(new_parent);
        Ok(())
    }

    /// Remove a view with all of its descendants and decorations.
    ///
    /// Destroy callbacks run after the subtree is gone, so they observe the
    /// tree without it. Returns the removed ids, the view itself first.
    pub fn remove(&mut self, view: ViewId) -> Result<Vec<ViewId>> {
        if !self.nodes.contains_key(view) {
            return Err(ViewError::StaleView(view));
        }

        self.detach(view);
        if self.root == Some(view) {
            self.root = None;
        }

        let mut removed = Vec::new();
        let mut pending = vec![view];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(id) {
                pending.extend(node.decorations.iter().rev().copied());
                pending.extend(node.children.iter().rev().copied());
                removed.push(id);
            }
        }

        for &id in &removed {
            if let Some(callbacks) = self.destroy_callbacks.remove(id) {
                for callback in callbacks {
                    callback(id);
                }
            }
        }

        Ok(removed)
    }

    /// Register a callback to run when `view` is removed.
    pub fn on_destroy(&mut self, view: ViewId, callback: impl FnOnce(ViewId) + 'static) -> Result<()> {
        if !self.nodes.contains_key(view) {
            return Err(ViewError::StaleView(view));
        }
        match self.destroy_callbacks.entry(view) {
            Some(entry) => entry.or_default().push(Box::new(callback)),
            None => return Err(ViewError::StaleView(view)),
        }
        Ok(())
    }

    /// Unlink `view` from its parent's child or decoration list.
    fn detach(&mut self, view: ViewId) {
        let Some(node) = self.nodes.get(view) else { return };
        let Some(parent) = node.parent else { return };
        let decorative = node.kind.is_decorative();
        if let Some(parent) = self.nodes.get_mut(parent) {
            if decorative {
                parent.decorations.retain(|&d| d != view);
            } else {
                parent.children.retain(|&c| c != view);
            }
        }
    }

    fn node_mut(&mut self, view: ViewId) -> Result<&mut ViewNode> {
        self.nodes.get_mut(view).ok_or(ViewError::StaleView(view))
    }

    fn content_node(&self, view: ViewId) -> Result<&ViewNode> {
        let node = self.nodes.get(view).ok_or(ViewError::StaleView(view))?;
        if node.kind.is_decorative() {
            return Err(ViewError::DecorativeParent(view));
        }
        Ok(node)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Check if `view` is still alive.
    #[inline]
    pub fn contains(&self, view: ViewId) -> bool {
        self.nodes.contains_key(view)
    }

    pub fn get(&self, view: ViewId) -> Option<&ViewNode> {
        self.nodes.get(view)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if `view` is alive and its ancestor chain reaches the root.
    pub fn is_attached(&self, view: ViewId) -> bool {
        let Some(root) = self.root else { return false };
        let mut current = Some(view);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.nodes.get(view).and_then(|n| n.parent)
    }

    /// The view a declined event moves on to.
    ///
    /// Decorative views skip their owner and go straight to the owner's
    /// parent.
    pub fn bubble_parent(&self, view: ViewId) -> Option<ViewId> {
        let node = self.nodes.get(view)?;
        match node.kind {
            ViewKind::Content => node.parent,
            ViewKind::Decorative { owner } => self.parent(owner),
        }
    }

    /// Content children in z-order, back to front.
    pub fn children(&self, view: ViewId) -> &[ViewId] {
        self.nodes.get(view).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn decorations(&self, view: ViewId) -> &[ViewId] {
        self.nodes.get(view).map(|n| n.decorations.as_slice()).unwrap_or(&[])
    }

    /// Find a view by its debug name.
    pub fn find_by_name(&self, name: &str) -> Option<ViewId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn set_frame(&mut self, view: ViewId, frame: Rect) -> Result<()> {
        self.node_mut(view)?.frame = frame;
        Ok(())
    }

    pub fn set_inset(&mut self, view: ViewId, inset: Thickness) -> Result<()> {
        self.node_mut(view)?.inset = inset;
        Ok(())
    }

    pub fn set_scroll_offset(&mut self, view: ViewId, offset: Point) -> Result<()> {
        self.node_mut(view)?.scroll_offset = offset;
        Ok(())
    }

    pub fn set_visible(&mut self, view: ViewId, visible: bool) -> Result<()> {
        self.node_mut(view)?.flags.set(ViewFlags::VISIBLE, visible);
        Ok(())
    }

    pub fn set_flags(&mut self, view: ViewId, flags: ViewFlags) -> Result<()> {
        self.node_mut(view)?.flags = flags;
        Ok(())
    }

    pub fn insert_flags(&mut self, view: ViewId, flags: ViewFlags) -> Result<()> {
        self.node_mut(view)?.flags.insert(flags);
        Ok(())
    }

    pub fn set_handlers(&mut self, view: ViewId, handlers: MouseHandlers) -> Result<()> {
        self.node_mut(view)?.handlers = handlers;
        Ok(())
    }

    pub fn set_style(&mut self, view: ViewId, style: LayoutStyle) -> Result<()> {
        self.node_mut(view)?.style = style;
        Ok(())
    }

    pub fn set_name(&mut self, view: ViewId, name: impl Into<String>) -> Result<()> {
        self.node_mut(view)?.name = Some(name.into());
        Ok(())
    }

    /// Move a content view to the front of its siblings.
    ///
    /// Returns `true` if the z-order changed.
    pub fn raise_to_front(&mut self, view: ViewId) -> bool {
        let Some(node) = self.nodes.get(view) else { return false };
        if node.kind.is_decorative() {
            return false;
        }
        let Some(parent) = node.parent else { return false };
        let Some(parent) = self.nodes.get_mut(parent) else { return false };
        let Some(pos) = parent.children.iter().position(|&c| c == view) else {
            return false;
        };
        if pos + 1 == parent.children.len() {
            return false;
        }
        parent.children.remove(pos);
        parent.children.push(view);
        true
    }

    // =========================================================================
    // Coordinate transforms
    // =========================================================================

    /// Screen position of the top-left corner of `view`'s frame.
    pub fn frame_origin_screen(&self, view: ViewId) -> Option<Point> {
        let mut node = self.nodes.get(view)?;
        let mut origin = node.frame.origin();
        loop {
            match node.kind {
                ViewKind::Decorative { owner } => {
                    node = self.nodes.get(owner)?;
                    origin = origin.offset(node.frame.origin());
                }
                ViewKind::Content => {
                    let Some(parent) = node.parent else { break };
                    node = self.nodes.get(parent)?;
                    origin = origin
                        .offset(node.inset.top_left())
                        .relative_to(node.scroll_offset)
                        .offset(node.frame.origin());
                }
            }
        }
        Some(origin)
    }

    /// `view`'s frame in screen coordinates.
    pub fn screen_frame(&self, view: ViewId) -> Option<Rect> {
        let origin = self.frame_origin_screen(view)?;
        let frame = self.nodes.get(view)?.frame;
        Some(Rect::new(origin.x, origin.y, frame.width, frame.height))
    }

    /// The visible content area of `view` in screen coordinates.
    pub fn screen_viewport(&self, view: ViewId) -> Option<Rect> {
        let inset = self.nodes.get(view)?.inset;
        Some(self.screen_frame(view)?.inset(inset))
    }

    /// Map a screen point into `view`'s frame space.
    pub fn screen_to_frame(&self, view: ViewId, point: Point) -> Option<Point> {
        Some(point.relative_to(self.frame_origin_screen(view)?))
    }

    /// Map a screen point into `view`'s viewport space.
    pub fn screen_to_viewport(&self, view: ViewId, point: Point) -> Option<Point> {
        let inset = self.nodes.get(view)?.inset;
        Some(self.screen_to_frame(view, point)?.relative_to(inset.top_left()))
    }

    /// Map a screen point into the space `view` receives events in.
    pub fn screen_to_local(&self, view: ViewId, point: Point) -> Option<(Point, CoordSpace)> {
        let node = self.nodes.get(view)?;
        match node.kind {
            ViewKind::Content => Some((self.screen_to_viewport(view, point)?, CoordSpace::Viewport)),
            ViewKind::Decorative { .. } => Some((self.screen_to_frame(view, point)?, CoordSpace::Frame)),
        }
    }

    /// Whether `space` is the space `view` receives events in.
    ///
    /// A mismatch is a routing bug: it asserts in debug builds and reports
    /// `false` in release builds so the caller can skip the view.
    pub fn space_matches(&self, view: ViewId, space: CoordSpace) -> bool {
        let Some(node) = self.nodes.get(view) else { return false };
        let expected = node.local_space();
        debug_assert_eq!(space, expected, "point space mismatch for view {view:?}");
        if space != expected {
            log::error!("point in {space:?} for view {view:?}, expected {expected:?}");
            return false;
        }
        true
    }

    /// Containment test for a point already in `view`'s local space: the
    /// viewport for content views, the ring for decorations.
    ///
    /// A point in the wrong space reports "outside" (see [`Self::space_matches`]).
    pub fn local_contains(&self, view: ViewId, point: Point, space: CoordSpace) -> bool {
        if !self.space_matches(view, space) {
            return false;
        }
        let Some(node) = self.nodes.get(view) else { return false };
        match node.kind {
            ViewKind::Content => node.viewport_bounds().contains(point),
            ViewKind::Decorative { .. } => node.ring_contains(point),
        }
    }

    /// Whether a screen point lies within `view`'s bounds as seen from its
    /// parent: the frame for content views, the ring for decorations.
    pub fn bounds_contain_screen(&self, view: ViewId, point: Point) -> bool {
        let Some(node) = self.nodes.get(view) else { return false };
        let Some(local) = self.screen_to_frame(view, point) else { return false };
        match node.kind {
            ViewKind::Content => Rect::new(0, 0, node.frame.width, node.frame.height).contains(local),
            ViewKind::Decorative { .. } => node.ring_contains(local),
        }
    }
}
