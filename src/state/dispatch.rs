//! Mouse event dispatch - one pointer event through the routing pipeline.
//!
//! Order per event:
//!
//! 1. discard while mouse routing is disabled
//! 2. hit-test from the root
//! 3. global screen-space subscribers, which may swallow the event
//! 4. grab short-circuit: the holder gets the event, nothing else does
//! 5. continuous-press target update
//! 6. enter/leave notifications
//! 7. dispatch to the topmost view, bubbling to ancestors while declined
//! 8. raise the overlapped container that was pressed
//!
//! Handlers run with mutable access to the tree, so every id is checked
//! again after external code has run.

use crate::engine::{ViewId, ViewTree};

use super::context::{EventCx, PointerRoutingContext};
use super::hit_test::{hit_chain, HitChain};
use super::hover::Crossings;
use super::mouse::{MouseEvent, PointerEvent};

/// How far an event got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Mouse routing is disabled.
    Discarded,
    /// A global subscriber set `handled`.
    ConsumedGlobally,
    /// Routed only to the grab holder.
    Grabbed { view: ViewId, handled: bool },
    /// Nothing under the pointer.
    NoTarget,
    /// Consumed by this view, possibly after bubbling.
    Handled(ViewId),
    /// Every view in the bubble path declined.
    Unhandled,
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(
            self,
            Self::ConsumedGlobally | Self::Grabbed { handled: true, .. } | Self::Handled(_)
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Crossing {
    Enter,
    Leave,
}

impl PointerRoutingContext {
    /// Route one pointer event through `tree`.
    pub fn submit_pointer_event(&mut self, tree: &mut ViewTree, pointer: PointerEvent) -> DispatchOutcome {
        if !self.mouse_enabled() {
            log::trace!("mouse disabled, discarding {:?}", pointer.flags);
            return DispatchOutcome::Discarded;
        }

        let chain = match tree.root() {
            Some(root) => hit_chain(tree, root, pointer.position),
            None => HitChain::new(),
        };
        let deepest = chain.last().copied();

        if self.notify_global(&pointer, deepest) {
            log::trace!("event at {:?} consumed globally", pointer.position);
            return DispatchOutcome::ConsumedGlobally;
        }
        self.last_position = Some(pointer.position);

        if let Some(holder) = self.grabbed_view(tree) {
            return self.dispatch_grabbed(tree, holder, &pointer);
        }

        self.continuous_press.update(tree, deepest, pointer.flags);

        let Some(deepest) = deepest else {
            return DispatchOutcome::NoTarget;
        };

        let crossings = self.hover.diff(tree, &chain, pointer.position);
        self.deliver_crossings(tree, &crossings, &pointer);

        let outcome = self.bubble(tree, deepest, &pointer);

        if self.config.raise_overlapped_on_press && pointer.flags.is_button_down() {
            raise_overlapped(tree, deepest);
        }

        outcome
    }

    /// Returns `true` if a global subscriber swallowed the event.
    fn notify_global(&self, pointer: &PointerEvent, deepest: Option<ViewId>) -> bool {
        if self.mouse_handlers.is_empty() {
            return false;
        }
        let mut event = MouseEvent::screen(pointer, deepest);
        for (_, handler) in &self.mouse_handlers {
            handler(&mut event);
            if event.handled {
                return true;
            }
        }
        false
    }

    /// Deliver to the grab holder only. Never falls through to the views
    /// under the pointer, whatever the holder answers.
    ///
    /// Every event outside the holder's own bounds (its viewport, or the
    /// ring for a decoration) is preceded by a leave on the holder.
    fn dispatch_grabbed(&mut self, tree: &mut ViewTree, holder: ViewId, pointer: &PointerEvent) -> DispatchOutcome {
        let outside = tree
            .screen_to_local(holder, pointer.position)
            .is_some_and(|(local, space)| !tree.local_contains(holder, local, space));
        if outside {
            self.hover.mark_outside(holder);
            self.notify_crossing(tree, holder, pointer, Crossing::Leave);
        }

        let handled = tree.contains(holder) && self.invoke(tree, holder, pointer);
        log::trace!("grabbed event -> {holder:?}, handled: {handled}");
        DispatchOutcome::Grabbed { view: holder, handled }
    }

    /// Dispatch to `deepest`, then its ancestors, until one consumes it.
    fn bubble(&mut self, tree: &mut ViewTree, deepest: ViewId, pointer: &PointerEvent) -> DispatchOutcome {
        let mut target = Some(deepest);

        while let Some(view) = target {
            if !tree.contains(view) {
                log::debug!("bubble target {view:?} removed mid-dispatch");
                break;
            }
            let next = tree.bubble_parent(view);

            if self.invoke(tree, view, pointer) {
                log::trace!("event at {:?} handled by {view:?}", pointer.position);
                return DispatchOutcome::Handled(view);
            }
            // A grab taken by a declining handler ends the walk
            if self.grab.is_grabbed() {
                break;
            }
            target = next;
        }

        DispatchOutcome::Unhandled
    }

    /// Call `view`'s mouse handler with the event in its local space.
    ///
    /// Returns `true` if the handler consumed the event or marked it handled.
    fn invoke(&mut self, tree: &mut ViewTree, view: ViewId, pointer: &PointerEvent) -> bool {
        let Some(handler) = tree.get(view).and_then(|node| node.handlers().on_mouse_event.clone()) else {
            return false;
        };
        let Some(mut event) = local_event(tree, view, pointer) else {
            return false;
        };

        let mut cx = EventCx::new(tree, self, view);
        let consumed = handler(&mut cx, &mut event);
        consumed || event.handled
    }

    fn deliver_crossings(&mut self, tree: &mut ViewTree, crossings: &Crossings, pointer: &PointerEvent) {
        for &view in &crossings.leaves {
            self.notify_crossing(tree, view, pointer, Crossing::Leave);
        }
        for &view in &crossings.enters {
            self.notify_crossing(tree, view, pointer, Crossing::Enter);
        }
    }

    fn notify_crossing(&mut self, tree: &mut ViewTree, view: ViewId, pointer: &PointerEvent, crossing: Crossing) {
        let Some(node) = tree.get(view) else {
            return;
        };
        let handler = match crossing {
            Crossing::Enter => node.handlers().on_mouse_enter.clone(),
            Crossing::Leave => node.handlers().on_mouse_leave.clone(),
        };
        let Some(handler) = handler else { return };
        let Some(event) = local_event(tree, view, pointer) else {
            return;
        };

        log::trace!("{crossing:?} -> {view:?}");
        let mut cx = EventCx::new(tree, self, view);
        handler(&mut cx, &event);
    }
}

/// `pointer` in the space `view` receives events in. `None` skips the view.
fn local_event(tree: &ViewTree, view: ViewId, pointer: &PointerEvent) -> Option<MouseEvent> {
    let (position, space) = tree.screen_to_local(view, pointer.position)?;
    tree.space_matches(view, space)
        .then(|| MouseEvent::local(pointer, view, position, space))
}

/// Bring the outermost overlapped ancestor of `view` to the front.
fn raise_overlapped(tree: &mut ViewTree, view: ViewId) {
    let mut outermost = None;
    let mut current = Some(view);
    while let Some(id) = current {
        let Some(node) = tree.get(id) else { return };
        if node.is_overlapped() && !node.kind().is_decorative() {
            outermost = Some(id);
        }
        current = node.parent();
    }

    let Some(container) = outermost else { return };
    if tree.raise_to_front(container) {
        log::debug!("raised {container:?} to front");
    }
}
