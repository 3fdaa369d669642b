//! ViewNode - one entry in the view tree arena.

use crate::state::MouseHandlers;
use crate::types::{CoordSpace, Dimension, FlexDirection, Point, Position, Rect, Thickness};

use super::ViewId;

bitflags::bitflags! {
    /// Per-view behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ViewFlags: u8 {
        const VISIBLE = 1 << 0;
        /// Wants repeated notifications while a button is held over it.
        const WANTS_CONTINUOUS_PRESS = 1 << 1;
        /// Top-level container that is raised when clicked.
        const OVERLAPPED = 1 << 2;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Content views hold children and scroll; decorative views are borders or
/// margins drawn in their owner's inset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Content,
    Decorative { owner: ViewId },
}

impl ViewKind {
    pub const fn is_decorative(&self) -> bool {
        matches!(self, Self::Decorative { .. })
    }
}

/// Layout input for the taffy bridge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutStyle {
    pub width: Dimension,
    pub height: Dimension,
    pub direction: FlexDirection,
    pub grow: f32,
    pub position: Position,
}

impl LayoutStyle {
    pub fn fixed(width: u16, height: u16) -> Self {
        Self {
            width: Dimension::Cells(width),
            height: Dimension::Cells(height),
            ..Default::default()
        }
    }

    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.position = Position::Absolute { x, y };
        self
    }

    pub fn row(mut self) -> Self {
        self.direction = FlexDirection::Row;
        self
    }

    pub fn grow(mut self, grow: f32) -> Self {
        self.grow = grow;
        self
    }
}

/// A view in the arena.
///
/// `frame` is relative to the parent's viewport origin for content views
/// and relative to the owner's frame origin for decorative views.
#[derive(Debug)]
pub struct ViewNode {
    pub(super) kind: ViewKind,
    pub(super) parent: Option<ViewId>,
    pub(super) children: Vec<ViewId>,
    pub(super) decorations: Vec<ViewId>,
    pub(super) frame: Rect,
    pub(super) inset: Thickness,
    pub(super) scroll_offset: Point,
    pub(super) flags: ViewFlags,
    pub(super) handlers: MouseHandlers,
    pub(super) style: LayoutStyle,
    pub(super) name: Option<String>,
}

impl ViewNode {
    pub(super) fn new(kind: ViewKind, parent: Option<ViewId>, frame: Rect) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            decorations: Vec::new(),
            frame,
            inset: Thickness::ZERO,
            scroll_offset: Point::ZERO,
            flags: ViewFlags::default(),
            handlers: MouseHandlers::default(),
            style: LayoutStyle::default(),
            name: None,
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Structural parent. For decorative views this is the owner.
    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    /// Content children, back to front.
    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    /// Owned decorations, back to front.
    pub fn decorations(&self) -> &[ViewId] {
        &self.decorations
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn inset(&self) -> Thickness {
        self.inset
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll_offset
    }

    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    pub fn handlers(&self) -> &MouseHandlers {
        &self.handlers
    }

    pub fn style(&self) -> &LayoutStyle {
        &self.style
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }

    #[inline]
    pub fn wants_continuous_press(&self) -> bool {
        self.flags.contains(ViewFlags::WANTS_CONTINUOUS_PRESS)
    }

    #[inline]
    pub fn is_overlapped(&self) -> bool {
        self.flags.contains(ViewFlags::OVERLAPPED)
    }

    /// The space mouse events for this view are expressed in.
    pub fn local_space(&self) -> CoordSpace {
        match self.kind {
            ViewKind::Content => CoordSpace::Viewport,
            ViewKind::Decorative { .. } => CoordSpace::Frame,
        }
    }

    /// Viewport size: the frame minus the inset, at the origin.
    pub fn viewport_bounds(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.frame.width - self.inset.horizontal(),
            self.frame.height - self.inset.vertical(),
        )
    }

    /// Whether a frame-space point lies on this decoration.
    ///
    /// A decoration with an inset only covers the ring between its frame
    /// and the inset hole.
    pub fn ring_contains(&self, local: Point) -> bool {
        let outer = Rect::new(0, 0, self.frame.width, self.frame.height);
        if !outer.contains(local) {
            return false;
        }
        self.inset.is_zero() || !outer.inset(self.inset).contains(local)
    }
}
