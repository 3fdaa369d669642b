//! Mouse Module - Mouse event types and per-view handlers
//!
//! A `PointerEvent` is what the terminal adapter produces: a screen
//! position and a flag set. The dispatcher turns it into `MouseEvent`s, one
//! per routing stage, each expressed in the receiving view's local space.
//!
//! # Example
//!
//! ```ignore
//! use spark_views::state::{MouseHandlers, MouseFlags};
//!
//! tree.set_handlers(button, MouseHandlers::new().on_mouse_event(|cx, event| {
//!     if event.flags.contains(MouseFlags::BUTTON1_CLICKED) {
//!         println!("clicked at ({}, {})", event.position.x, event.position.y);
//!         return true; // Consume event
//!     }
//!     false
//! }))?;
//! ```

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::ViewId;
use crate::types::{CoordSpace, Point};

use super::context::EventCx;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

bitflags::bitflags! {
    /// Button, wheel, motion and modifier state of one pointer event.
    ///
    /// `PRESSED` flags mean the button is held; `RELEASED`, `CLICKED` and
    /// `DOUBLE_CLICKED` are one-shot transitions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseFlags: u32 {
        const BUTTON1_PRESSED = 1 << 0;
        const BUTTON1_RELEASED = 1 << 1;
        const BUTTON1_CLICKED = 1 << 2;
        const BUTTON1_DOUBLE_CLICKED = 1 << 3;
        const BUTTON2_PRESSED = 1 << 4;
        const BUTTON2_RELEASED = 1 << 5;
        const BUTTON2_CLICKED = 1 << 6;
        const BUTTON2_DOUBLE_CLICKED = 1 << 7;
        const BUTTON3_PRESSED = 1 << 8;
        const BUTTON3_RELEASED = 1 << 9;
        const BUTTON3_CLICKED = 1 << 10;
        const BUTTON3_DOUBLE_CLICKED = 1 << 11;
        const WHEELED_UP = 1 << 12;
        const WHEELED_DOWN = 1 << 13;
        const WHEELED_LEFT = 1 << 14;
        const WHEELED_RIGHT = 1 << 15;
        const REPORT_MOUSE_POSITION = 1 << 16;
        const BUTTON_SHIFT = 1 << 17;
        const BUTTON_CTRL = 1 << 18;
        const BUTTON_ALT = 1 << 19;

        const ANY_PRESSED = Self::BUTTON1_PRESSED.bits()
            | Self::BUTTON2_PRESSED.bits()
            | Self::BUTTON3_PRESSED.bits();
        const ANY_CLICKED = Self::BUTTON1_CLICKED.bits()
            | Self::BUTTON2_CLICKED.bits()
            | Self::BUTTON3_CLICKED.bits();
        const ANY_WHEEL = Self::WHEELED_UP.bits()
            | Self::WHEELED_DOWN.bits()
            | Self::WHEELED_LEFT.bits()
            | Self::WHEELED_RIGHT.bits();
    }
}

impl MouseFlags {
    pub const fn pressed(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::BUTTON1_PRESSED,
            MouseButton::Middle => Self::BUTTON2_PRESSED,
            MouseButton::Right => Self::BUTTON3_PRESSED,
        }
    }

    pub const fn released(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::BUTTON1_RELEASED,
            MouseButton::Middle => Self::BUTTON2_RELEASED,
            MouseButton::Right => Self::BUTTON3_RELEASED,
        }
    }

    pub const fn clicked(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::BUTTON1_CLICKED,
            MouseButton::Middle => Self::BUTTON2_CLICKED,
            MouseButton::Right => Self::BUTTON3_CLICKED,
        }
    }

    pub const fn double_clicked(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::BUTTON1_DOUBLE_CLICKED,
            MouseButton::Middle => Self::BUTTON2_DOUBLE_CLICKED,
            MouseButton::Right => Self::BUTTON3_DOUBLE_CLICKED,
        }
    }

    /// A button is currently held down.
    #[inline]
    pub fn is_button_down(&self) -> bool {
        self.intersects(Self::ANY_PRESSED)
    }

    #[inline]
    pub fn is_wheel(&self) -> bool {
        self.intersects(Self::ANY_WHEEL)
    }
}

/// A decoded pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub position: Point,
    pub flags: MouseFlags,
}

impl PointerEvent {
    pub fn new(x: i32, y: i32, flags: MouseFlags) -> Self {
        Self {
            position: Point::new(x, y),
            flags,
        }
    }

    pub fn pressed(button: MouseButton, x: i32, y: i32) -> Self {
        Self::new(x, y, MouseFlags::pressed(button))
    }

    pub fn released(button: MouseButton, x: i32, y: i32) -> Self {
        Self::new(x, y, MouseFlags::released(button))
    }

    pub fn clicked(button: MouseButton, x: i32, y: i32) -> Self {
        Self::new(x, y, MouseFlags::clicked(button))
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self::new(x, y, MouseFlags::REPORT_MOUSE_POSITION)
    }
}

/// Mouse event as seen by one receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    /// Position in `space`.
    pub position: Point,
    pub space: CoordSpace,
    pub screen_position: Point,
    pub flags: MouseFlags,
    /// The view this event is addressed to. For the global notification,
    /// the topmost view under the pointer.
    pub view: Option<ViewId>,
    /// Set by a receiver to stop further routing.
    pub handled: bool,
}

impl MouseEvent {
    /// Screen-space event for global subscribers.
    pub fn screen(pointer: &PointerEvent, view: Option<ViewId>) -> Self {
        Self {
            position: pointer.position,
            space: CoordSpace::Screen,
            screen_position: pointer.position,
            flags: pointer.flags,
            view,
            handled: false,
        }
    }

    /// Fresh event for `view` at a local position.
    pub fn local(pointer: &PointerEvent, view: ViewId, position: Point, space: CoordSpace) -> Self {
        Self {
            position,
            space,
            screen_position: pointer.position,
            flags: pointer.flags,
            view: Some(view),
            handled: false,
        }
    }
}

// =============================================================================
// HANDLER TYPES
// =============================================================================

/// Identifies a subscription so it can be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

impl HandlerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Per-view mouse handler. Return true to consume the event.
pub type MouseHandler = Rc<dyn Fn(&mut EventCx<'_>, &mut MouseEvent) -> bool>;

/// Per-view enter/leave handler.
pub type CrossingHandler = Rc<dyn Fn(&mut EventCx<'_>, &MouseEvent)>;

/// Global screen-space subscriber. Set `handled` to swallow the event.
pub type GlobalMouseHandler = Rc<dyn Fn(&mut MouseEvent)>;

/// Handlers for a view.
///
/// Uses `Rc<dyn Fn>` so the dispatcher can clone a handler out of the tree
/// before calling it with mutable access to that same tree.
#[derive(Default, Clone)]
pub struct MouseHandlers {
    pub on_mouse_event: Option<MouseHandler>,
    pub on_mouse_enter: Option<CrossingHandler>,
    pub on_mouse_leave: Option<CrossingHandler>,
}

impl MouseHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mouse_event(
        mut self,
        handler: impl Fn(&mut EventCx<'_>, &mut MouseEvent) -> bool + 'static,
    ) -> Self {
        self.on_mouse_event = Some(Rc::new(handler));
        self
    }

    pub fn on_mouse_enter(mut self, handler: impl Fn(&mut EventCx<'_>, &MouseEvent) + 'static) -> Self {
        self.on_mouse_enter = Some(Rc::new(handler));
        self
    }

    pub fn on_mouse_leave(mut self, handler: impl Fn(&mut EventCx<'_>, &MouseEvent) + 'static) -> Self {
        self.on_mouse_leave = Some(Rc::new(handler));
        self
    }
}

impl fmt::Debug for MouseHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MouseHandlers")
            .field("on_mouse_event", &self.on_mouse_event.is_some())
            .field("on_mouse_enter", &self.on_mouse_enter.is_some())
            .field("on_mouse_leave", &self.on_mouse_leave.is_some())
            .finish()
    }
}
