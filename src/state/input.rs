//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with pointer routing. Terminals only
//! report presses and releases, so the decoder synthesises click and
//! double-click flags from press/release pairs.
//!
//! # API
//!
//! - `PointerDecoder::decode` - Convert a crossterm MouseEvent to pointer events
//! - `convert_modifiers` - Map crossterm modifiers onto `MouseFlags`
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Submit decoded pointer events to a routing context
//! - `enable_mouse_capture` / `disable_mouse_capture` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_views::state::{poll_event, route_event, PointerDecoder};
//! use std::time::Duration;
//!
//! let mut decoder = PointerDecoder::default();
//! loop {
//!     if let Some(event) = poll_event(&mut decoder, Duration::from_millis(16))? {
//!         route_event(&mut routing, &mut tree, &event);
//!     }
//! }
//! ```

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEvent as CrosstermKeyEvent,
    KeyModifiers, MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent,
    MouseEventKind, poll, read,
};
use crossterm::execute;
use smallvec::{SmallVec, smallvec};
use std::io::stdout;
use std::time::{Duration, Instant};

use crate::config::MouseConfig;
use crate::engine::ViewTree;
use crate::types::Point;

use super::context::PointerRoutingContext;
use super::mouse::{MouseButton, MouseFlags, PointerEvent};

/// Pointer events decoded from one terminal report.
pub type PointerEvents = SmallVec<[PointerEvent; 2]>;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type for the run loop
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Decoded pointer events (a release may carry a click)
    Pointer(PointerEvents),
    /// Keyboard event, passed through untouched
    Key(CrosstermKeyEvent),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// Unhandled event type
    Other,
}

// =============================================================================
// POINTER DECODING
// =============================================================================

/// Stateful crossterm mouse decoder.
#[derive(Debug, Clone)]
pub struct PointerDecoder {
    double_click_interval: Duration,
    /// Button held and where it went down; cleared once the pointer drags away.
    pressed: Option<(MouseButton, Point)>,
    last_click: Option<(MouseButton, Point, Instant)>,
}

impl Default for PointerDecoder {
    fn default() -> Self {
        Self::new(&MouseConfig::default())
    }
}

impl PointerDecoder {
    pub fn new(config: &MouseConfig) -> Self {
        Self {
            double_click_interval: config.double_click_interval,
            pressed: None,
            last_click: None,
        }
    }

    pub fn decode(&mut self, event: CrosstermMouseEvent) -> PointerEvents {
        self.decode_at(event, Instant::now())
    }

    /// Decode with an explicit timestamp.
    pub fn decode_at(&mut self, event: CrosstermMouseEvent, now: Instant) -> PointerEvents {
        let position = Point::new(i32::from(event.column), i32::from(event.row));
        let modifiers = convert_modifiers(event.modifiers);
        let pointer = |flags: MouseFlags| PointerEvent {
            position,
            flags: flags | modifiers,
        };

        match event.kind {
            MouseEventKind::Down(btn) => {
                let button = convert_mouse_button(btn);
                self.pressed = Some((button, position));
                smallvec![pointer(MouseFlags::pressed(button))]
            }
            MouseEventKind::Up(btn) => {
                let button = convert_mouse_button(btn);
                let mut events: PointerEvents = smallvec![pointer(MouseFlags::released(button))];
                if self.pressed.take() == Some((button, position)) {
                    events.push(pointer(self.click_flags(button, position, now)));
                }
                events
            }
            MouseEventKind::Drag(btn) => {
                let button = convert_mouse_button(btn);
                if self.pressed.is_some_and(|(_, at)| at != position) {
                    self.pressed = None;
                    self.last_click = None;
                }
                smallvec![pointer(MouseFlags::pressed(button) | MouseFlags::REPORT_MOUSE_POSITION)]
            }
            MouseEventKind::Moved => smallvec![pointer(MouseFlags::REPORT_MOUSE_POSITION)],
            MouseEventKind::ScrollUp => smallvec![pointer(MouseFlags::WHEELED_UP)],
            MouseEventKind::ScrollDown => smallvec![pointer(MouseFlags::WHEELED_DOWN)],
            MouseEventKind::ScrollLeft => smallvec![pointer(MouseFlags::WHEELED_LEFT)],
            MouseEventKind::ScrollRight => smallvec![pointer(MouseFlags::WHEELED_RIGHT)],
        }
    }

    /// Click or double click, depending on the previous click.
    fn click_flags(&mut self, button: MouseButton, position: Point, now: Instant) -> MouseFlags {
        let is_double = self.last_click.is_some_and(|(last_button, last_position, at)| {
            last_button == button
                && last_position == position
                && now.saturating_duration_since(at) <= self.double_click_interval
        });

        if is_double {
            self.last_click = None;
            MouseFlags::double_clicked(button)
        } else {
            self.last_click = Some((button, position, now));
            MouseFlags::clicked(button)
        }
    }

    /// Forget half-finished clicks, e.g. after focus loss.
    pub fn reset(&mut self) {
        self.pressed = None;
        self.last_click = None;
    }
}

/// Convert crossterm MouseButton to our MouseButton
fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

/// Convert crossterm KeyModifiers to the modifier bits of `MouseFlags`
pub fn convert_modifiers(mods: KeyModifiers) -> MouseFlags {
    let mut flags = MouseFlags::empty();
    flags.set(MouseFlags::BUTTON_SHIFT, mods.contains(KeyModifiers::SHIFT));
    flags.set(MouseFlags::BUTTON_CTRL, mods.contains(KeyModifiers::CONTROL));
    flags.set(MouseFlags::BUTTON_ALT, mods.contains(KeyModifiers::ALT));
    flags
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Convert any crossterm event.
pub fn convert_event(decoder: &mut PointerDecoder, event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => InputEvent::Pointer(decoder.decode(mouse)),
        CrosstermEvent::Key(key) => InputEvent::Key(key),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        CrosstermEvent::FocusLost => {
            decoder.reset();
            InputEvent::Other
        }
        _ => InputEvent::Other,
    }
}

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(decoder: &mut PointerDecoder, timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event(decoder)?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event(decoder: &mut PointerDecoder) -> std::io::Result<InputEvent> {
    Ok(convert_event(decoder, read()?))
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Submit the pointer events of `event` in order.
/// Returns true if any of them was handled.
pub fn route_event(routing: &mut PointerRoutingContext, tree: &mut ViewTree, event: &InputEvent) -> bool {
    let InputEvent::Pointer(pointers) = event else {
        return false;
    };
    let mut handled = false;
    for &pointer in pointers {
        handled |= routing.submit_pointer_event(tree, pointer).is_handled();
    }
    handled
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse_capture() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse_capture() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MouseHandlers;
    use crate::types::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn down(column: u16, row: u16) -> CrosstermMouseEvent {
        mouse(MouseEventKind::Down(CrosstermMouseButton::Left), column, row)
    }

    fn up(column: u16, row: u16) -> CrosstermMouseEvent {
        mouse(MouseEventKind::Up(CrosstermMouseButton::Left), column, row)
    }

    #[test]
    fn test_decode_mouse_down() {
        let mut decoder = PointerDecoder::default();
        let events = decoder.decode(down(10, 5));

        assert_eq!(events.as_slice(), &[PointerEvent::pressed(MouseButton::Left, 10, 5)]);
    }

    #[test]
    fn test_decode_release_in_place_adds_click() {
        let mut decoder = PointerDecoder::default();
        decoder.decode(down(10, 5));
        let events = decoder.decode(up(10, 5));

        assert_eq!(
            events.as_slice(),
            &[
                PointerEvent::released(MouseButton::Left, 10, 5),
                PointerEvent::clicked(MouseButton::Left, 10, 5),
            ]
        );
    }

    #[test]
    fn test_decode_release_elsewhere_is_not_click() {
        let mut decoder = PointerDecoder::default();
        decoder.decode(down(10, 5));
        let events = decoder.decode(up(11, 5));

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].flags, MouseFlags::BUTTON1_RELEASED);
    }

    #[test]
    fn test_decode_drag_cancels_click() {
        let mut decoder = PointerDecoder::default();
        decoder.decode(down(10, 5));
        let drag = decoder.decode(mouse(MouseEventKind::Drag(CrosstermMouseButton::Left), 12, 5));
        assert_eq!(
            drag[0].flags,
            MouseFlags::BUTTON1_PRESSED | MouseFlags::REPORT_MOUSE_POSITION
        );

        // Dragging back and releasing on the press cell is still a drag
        decoder.decode(mouse(MouseEventKind::Drag(CrosstermMouseButton::Left), 10, 5));
        assert_eq!(decoder.decode(up(10, 5)).len(), 1);
    }

    #[test]
    fn test_decode_double_click_within_interval() {
        let mut decoder = PointerDecoder::default();
        let start = Instant::now();

        decoder.decode_at(down(3, 3), start);
        decoder.decode_at(up(3, 3), start);
        decoder.decode_at(down(3, 3), start + Duration::from_millis(100));
        let events = decoder.decode_at(up(3, 3), start + Duration::from_millis(120));

        assert_eq!(events[1].flags, MouseFlags::BUTTON1_DOUBLE_CLICKED);

        // A third click starts over
        decoder.decode_at(down(3, 3), start + Duration::from_millis(200));
        let events = decoder.decode_at(up(3, 3), start + Duration::from_millis(220));
        assert_eq!(events[1].flags, MouseFlags::BUTTON1_CLICKED);
    }

    #[test]
    fn test_decode_slow_second_click_is_single() {
        let mut decoder = PointerDecoder::new(&MouseConfig::default().with_double_click_interval(Duration::from_millis(200)));
        let start = Instant::now();

        decoder.decode_at(down(3, 3), start);
        decoder.decode_at(up(3, 3), start);
        decoder.decode_at(down(3, 3), start + Duration::from_millis(400));
        let events = decoder.decode_at(up(3, 3), start + Duration::from_millis(410));

        assert_eq!(events[1].flags, MouseFlags::BUTTON1_CLICKED);
    }

    #[test]
    fn test_decode_scroll_directions() {
        let directions = [
            (MouseEventKind::ScrollUp, MouseFlags::WHEELED_UP),
            (MouseEventKind::ScrollDown, MouseFlags::WHEELED_DOWN),
            (MouseEventKind::ScrollLeft, MouseFlags::WHEELED_LEFT),
            (MouseEventKind::ScrollRight, MouseFlags::WHEELED_RIGHT),
        ];

        let mut decoder = PointerDecoder::default();
        for (kind, expected) in directions {
            let events = decoder.decode(mouse(kind, 0, 0));
            assert_eq!(events[0].flags, expected);
            assert!(events[0].flags.is_wheel());
        }
    }

    #[test]
    fn test_decode_move() {
        let mut decoder = PointerDecoder::default();
        let events = decoder.decode(mouse(MouseEventKind::Moved, 30, 20));

        assert_eq!(events.as_slice(), &[PointerEvent::moved(30, 20)]);
    }

    #[test]
    fn test_decode_with_modifiers() {
        let mut decoder = PointerDecoder::default();
        let mut event = down(0, 0);
        event.modifiers = KeyModifiers::CONTROL | KeyModifiers::SHIFT;

        let flags = decoder.decode(event)[0].flags;
        assert!(flags.contains(MouseFlags::BUTTON1_PRESSED));
        assert!(flags.contains(MouseFlags::BUTTON_CTRL));
        assert!(flags.contains(MouseFlags::BUTTON_SHIFT));
        assert!(!flags.contains(MouseFlags::BUTTON_ALT));
    }

    #[test]
    fn test_convert_modifiers() {
        assert_eq!(convert_modifiers(KeyModifiers::empty()), MouseFlags::empty());
        assert_eq!(convert_modifiers(KeyModifiers::ALT), MouseFlags::BUTTON_ALT);
        // No meta bit in MouseFlags
        assert_eq!(convert_modifiers(KeyModifiers::META), MouseFlags::empty());
    }

    #[test]
    fn test_all_mouse_buttons() {
        assert_eq!(convert_mouse_button(CrosstermMouseButton::Left), MouseButton::Left);
        assert_eq!(convert_mouse_button(CrosstermMouseButton::Right), MouseButton::Right);
        assert_eq!(convert_mouse_button(CrosstermMouseButton::Middle), MouseButton::Middle);
    }

    #[test]
    fn test_convert_event_variants() {
        let mut decoder = PointerDecoder::default();
        assert!(matches!(
            convert_event(&mut decoder, CrosstermEvent::Resize(120, 40)),
            InputEvent::Resize(120, 40)
        ));
        assert!(matches!(
            convert_event(&mut decoder, CrosstermEvent::FocusGained),
            InputEvent::Other
        ));
        assert!(matches!(
            convert_event(&mut decoder, CrosstermEvent::Mouse(down(1, 1))),
            InputEvent::Pointer(events) if events.len() == 1
        ));
    }

    #[test]
    fn test_focus_lost_forgets_press() {
        let mut decoder = PointerDecoder::default();
        decoder.decode(down(4, 4));
        convert_event(&mut decoder, CrosstermEvent::FocusLost);
        assert_eq!(decoder.decode(up(4, 4)).len(), 1);
    }

    #[test]
    fn test_route_event_submits_release_and_click() {
        let mut tree = ViewTree::new();
        let root = tree.set_root(Rect::new(0, 0, 20, 5)).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        tree.set_handlers(
            root,
            MouseHandlers::new().on_mouse_event(move |_, event| {
                seen_clone.borrow_mut().push(event.flags);
                event.flags.contains(MouseFlags::BUTTON1_CLICKED)
            }),
        )
        .unwrap();

        let mut routing = PointerRoutingContext::default();
        let mut decoder = PointerDecoder::default();
        decoder.decode(down(2, 2));
        let release = InputEvent::Pointer(decoder.decode(up(2, 2)));

        assert!(route_event(&mut routing, &mut tree, &release));
        assert_eq!(
            *seen.borrow(),
            vec![MouseFlags::BUTTON1_RELEASED, MouseFlags::BUTTON1_CLICKED]
        );
        assert!(!route_event(&mut routing, &mut tree, &InputEvent::Resize(10, 10)));
    }
}
