//! Pointer grab - exclusive routing of all mouse events to one view.
//!
//! Two-phase protocol: a cancellable `grabbing` / `ungrabbing` pre-event,
//! then the state change, then the `grabbed` / `ungrabbed` notification.
//! Subscribers see the transition before it happens and can veto it by
//! setting `cancel`.
//!
//! The machine knows nothing about the tree. The routing context checks
//! liveness before and after.

use std::rc::Rc;

use crate::engine::ViewId;

use super::mouse::HandlerId;

/// Arguments of a cancellable grab transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabArgs {
    pub view: ViewId,
    pub cancel: bool,
}

impl GrabArgs {
    fn new(view: ViewId) -> Self {
        Self { view, cancel: false }
    }
}

/// Pre-event subscriber. Set `cancel` to veto.
pub type GrabVetoHandler = Rc<dyn Fn(&mut GrabArgs)>;

/// Post-event subscriber.
pub type GrabHandler = Rc<dyn Fn(ViewId)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabState {
    #[default]
    Free,
    Grabbed(ViewId),
}

/// The grab state machine and its subscribers.
#[derive(Default)]
pub struct PointerGrab {
    state: GrabState,
    grabbing: Vec<(HandlerId, GrabVetoHandler)>,
    ungrabbing: Vec<(HandlerId, GrabVetoHandler)>,
    grabbed: Vec<(HandlerId, GrabHandler)>,
    ungrabbed: Vec<(HandlerId, GrabHandler)>,
}

impl PointerGrab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GrabState {
        self.state
    }

    /// The grabbing view, without any liveness check.
    pub fn view(&self) -> Option<ViewId> {
        match self.state {
            GrabState::Free => None,
            GrabState::Grabbed(view) => Some(view),
        }
    }

    pub fn is_grabbed(&self) -> bool {
        matches!(self.state, GrabState::Grabbed(_))
    }

    /// Request an exclusive grab for `view`.
    ///
    /// `None` is a no-op. A grab held by another view is overwritten
    /// without asking the current holder. Returns `true` if the grab moved
    /// to `view`.
    pub fn request_grab(&mut self, view: Option<ViewId>) -> bool {
        let Some(view) = view else { return false };

        let mut args = GrabArgs::new(view);
        for (_, handler) in &self.grabbing {
            handler(&mut args);
        }
        if args.cancel {
            log::debug!("grab of {view:?} cancelled");
            return false;
        }

        self.state = GrabState::Grabbed(view);
        log::debug!("pointer grabbed by {view:?}");
        for (_, handler) in &self.grabbed {
            handler(view);
        }
        true
    }

    /// Release the current grab. No-op when free.
    ///
    /// Returns `true` if the state moved to `Free`.
    pub fn request_ungrab(&mut self) -> bool {
        let GrabState::Grabbed(view) = self.state else { return false };

        let mut args = GrabArgs::new(view);
        for (_, handler) in &self.ungrabbing {
            handler(&mut args);
        }
        if args.cancel {
            log::debug!("ungrab of {view:?} cancelled");
            return false;
        }

        self.state = GrabState::Free;
        log::debug!("pointer released by {view:?}");
        for (_, handler) in &self.ungrabbed {
            handler(view);
        }
        true
    }

    /// Drop the grab without notifications. Used when the holder died.
    pub(crate) fn reset_if(&mut self, view: ViewId) -> bool {
        if self.state == GrabState::Grabbed(view) {
            self.state = GrabState::Free;
            true
        } else {
            false
        }
    }

    pub fn on_grabbing(&mut self, handler: impl Fn(&mut GrabArgs) + 'static) -> HandlerId {
        let id = HandlerId::next();
        self.grabbing.push((id, Rc::new(handler)));
        id
    }

    pub fn on_ungrabbing(&mut self, handler: impl Fn(&mut GrabArgs) + 'static) -> HandlerId {
        let id = HandlerId::next();
        self.ungrabbing.push((id, Rc::new(handler)));
        id
    }

    pub fn on_grabbed(&mut self, handler: impl Fn(ViewId) + 'static) -> HandlerId {
        let id = HandlerId::next();
        self.grabbed.push((id, Rc::new(handler)));
        id
    }

    pub fn on_ungrabbed(&mut self, handler: impl Fn(ViewId) + 'static) -> HandlerId {
        let id = HandlerId::next();
        self.ungrabbed.push((id, Rc::new(handler)));
        id
    }

    /// Remove a subscription. Returns `true` if it existed.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        let before = self.handler_count();
        self.grabbing.retain(|(handler_id, _)| *handler_id != id);
        self.ungrabbing.retain(|(handler_id, _)| *handler_id != id);
        self.grabbed.retain(|(handler_id, _)| *handler_id != id);
        self.ungrabbed.retain(|(handler_id, _)| *handler_id != id);
        self.handler_count() != before
    }

    fn handler_count(&self) -> usize {
        self.grabbing.len() + self.ungrabbing.len() + self.grabbed.len() + self.ungrabbed.len()
    }

    /// Back to `Free` with no subscribers.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
