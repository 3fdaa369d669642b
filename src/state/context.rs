//! Pointer Routing Context - the per-pointer state shared by every event.
//!
//! One instance per run loop. It owns the grab state machine, the
//! views-under-mouse set, the continuous-press target and the global mouse
//! subscribers. Handlers reach it through [`EventCx`].
//!
//! Nothing here keeps a view alive: every stored `ViewId` is checked
//! against the tree on access and dropped when stale.

use std::rc::Rc;

use crate::config::MouseConfig;
use crate::engine::{ViewId, ViewTree};
use crate::error::Result;
use crate::types::Point;

use super::continuous_press::ContinuousPress;
use super::grab::{GrabArgs, GrabState, PointerGrab};
use super::hover::HoverTracker;
use super::mouse::{GlobalMouseHandler, HandlerId, MouseEvent};

pub struct PointerRoutingContext {
    pub(super) config: MouseConfig,
    mouse_enabled: bool,
    pub(super) grab: PointerGrab,
    pub(super) hover: HoverTracker,
    pub(super) continuous_press: ContinuousPress,
    pub(super) mouse_handlers: Vec<(HandlerId, GlobalMouseHandler)>,
    pub(super) last_position: Option<Point>,
}

impl Default for PointerRoutingContext {
    fn default() -> Self {
        Self::new(MouseConfig::default())
    }
}

impl PointerRoutingContext {
    pub fn new(config: MouseConfig) -> Self {
        Self {
            config,
            mouse_enabled: config.enabled,
            grab: PointerGrab::new(),
            hover: HoverTracker::new(),
            continuous_press: ContinuousPress::new(),
            mouse_handlers: Vec::new(),
            last_position: None,
        }
    }

    pub fn config(&self) -> &MouseConfig {
        &self.config
    }

    // =========================================================================
    // Mouse toggle
    // =========================================================================

    /// While disabled, submitted events are discarded without touching any
    /// routing state.
    pub fn set_mouse_enabled(&mut self, enabled: bool) {
        self.mouse_enabled = enabled;
    }

    pub fn mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    // =========================================================================
    // Grab
    // =========================================================================

    /// Request an exclusive grab for `view`. Dead views are refused.
    pub fn request_grab(&mut self, tree: &ViewTree, view: Option<ViewId>) -> bool {
        if let Some(view) = view.filter(|&view| !tree.contains(view)) {
            log::debug!("grab refused for removed view {view:?}");
            return false;
        }
        self.grab.request_grab(view)
    }

    pub fn request_ungrab(&mut self) -> bool {
        self.grab.request_ungrab()
    }

    /// The live grabbing view. A holder that has been removed resets the
    /// grab to `Free` without notifications.
    pub fn grabbed_view(&mut self, tree: &ViewTree) -> Option<ViewId> {
        let view = self.grab.view()?;
        if tree.contains(view) {
            return Some(view);
        }
        log::debug!("grab holder {view:?} is gone, releasing");
        self.grab.reset_if(view);
        None
    }

    /// Raw grab state, without a liveness check.
    pub fn grab_state(&self) -> GrabState {
        self.grab.state()
    }

    pub fn on_grabbing(&mut self, handler: impl Fn(&mut GrabArgs) + 'static) -> HandlerId {
        self.grab.on_grabbing(handler)
    }

    pub fn on_ungrabbing(&mut self, handler: impl Fn(&mut GrabArgs) + 'static) -> HandlerId {
        self.grab.on_ungrabbing(handler)
    }

    pub fn on_grabbed(&mut self, handler: impl Fn(ViewId) + 'static) -> HandlerId {
        self.grab.on_grabbed(handler)
    }

    pub fn on_ungrabbed(&mut self, handler: impl Fn(ViewId) + 'static) -> HandlerId {
        self.grab.on_ungrabbed(handler)
    }

    // =========================================================================
    // Global mouse subscribers
    // =========================================================================

    /// Subscribe to every event in screen coordinates, before any view sees
    /// it. Setting `handled` swallows the event.
    pub fn on_mouse_event(&mut self, handler: impl Fn(&mut MouseEvent) + 'static) -> HandlerId {
        let id = HandlerId::next();
        self.mouse_handlers.push((id, Rc::new(handler)));
        id
    }

    /// Remove a grab or global mouse subscription.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        if self.grab.remove_handler(id) {
            return true;
        }
        let before = self.mouse_handlers.len();
        self.mouse_handlers.retain(|(handler_id, _)| *handler_id != id);
        self.mouse_handlers.len() != before
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The live views of the last hit chain, outermost first.
    pub fn views_under_mouse(&self, tree: &ViewTree) -> Vec<ViewId> {
        self.hover.views().filter(|&view| tree.contains(view)).collect()
    }

    pub fn is_hovered(&self, view: ViewId) -> bool {
        self.hover.is_hovered(view)
    }

    pub fn continuous_press_target(&mut self, tree: &ViewTree) -> Option<ViewId> {
        self.continuous_press.target(tree)
    }

    /// Screen position of the last event that reached routing.
    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Drop every reference to removed views.
    pub fn forget_views(&mut self, removed: &[ViewId]) {
        for &view in removed {
            self.hover.forget(view);
            self.continuous_press.forget(view);
            if self.grab.reset_if(view) {
                log::debug!("grab holder {view:?} removed, releasing");
            }
        }
    }

    /// Back to the freshly created state, subscribers included.
    pub fn reset(&mut self) {
        self.mouse_enabled = self.config.enabled;
        self.grab.reset();
        self.hover.clear();
        self.continuous_press.clear();
        self.mouse_handlers.clear();
        self.last_position = None;
    }
}

/// What a handler gets: mutable access to the tree and the routing state,
/// plus the view being notified.
pub struct EventCx<'a> {
    tree: &'a mut ViewTree,
    routing: &'a mut PointerRoutingContext,
    view: ViewId,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(tree: &'a mut ViewTree, routing: &'a mut PointerRoutingContext, view: ViewId) -> Self {
        Self { tree, routing, view }
    }

    /// The view this notification is for.
    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn tree(&self) -> &ViewTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut *self.tree
    }

    pub fn routing(&self) -> &PointerRoutingContext {
        &*self.routing
    }

    pub fn request_grab(&mut self, view: Option<ViewId>) -> bool {
        self.routing.request_grab(&*self.tree, view)
    }

    /// Grab the pointer for the notified view.
    pub fn grab(&mut self) -> bool {
        self.request_grab(Some(self.view))
    }

    pub fn request_ungrab(&mut self) -> bool {
        self.routing.request_ungrab()
    }

    pub fn grabbed_view(&mut self) -> Option<ViewId> {
        self.routing.grabbed_view(&*self.tree)
    }

    /// Remove a view and clear the routing state's references to it.
    pub fn remove_view(&mut self, view: ViewId) -> Result<Vec<ViewId>> {
        let removed = self.tree.remove(view)?;
        self.routing.forget_views(&removed);
        Ok(removed)
    }
}
