use std::collections::VecDeque;

use egui::CursorIcon;

mod behavior;
mod debug;
mod egui_bridge;
mod geometry;
mod ghost;
mod options;
mod render_tree;
mod resolver;
mod session;
mod store;
mod types;

#[cfg(test)]
mod bridge_tests;

pub use behavior::DndBehavior;
pub use geometry::{Frames, compute_frames, offset_in_target, parse_px};
pub use ghost::{GhostLayer, GhostProxy, GhostStrategy};
pub use options::{
    ContainerStyle, DND_DATA_PROPERTY, DND_ID_PROPERTY, DND_LAYOUT_ROOT_ID, DndLayoutOptions,
    OptionsError,
};
pub use render_tree::{ComputedStyle, ElementBox, ID_PROPERTY, PropValue, PropertyBag, RenderTree};
pub use resolver::{resolve_backing_element, resolve_identity_node, resolve_info};
pub use session::DragPhase;
pub use store::{MoveListener, SessionStore};
pub use types::{
    CanDrop, DndId, DndInfo, DndProps, ElementId, ElementPosition, EventResponse, MousePosition,
    NodeId, PointerEvent, PointerEventKind,
};

use egui_bridge::BridgeState;
use session::{PressSession, ReleaseKind};

/// The drag surface of one tree: turns raw pointer events into clicks, drags and drops.
///
/// Owns the [`SessionStore`] for its tree and, when enabled, the [`GhostLayer`] that
/// follows the pointer. Feed it events with [`Self::handle_event`] (or
/// [`Self::handle_egui_input`]); application callbacks go through a [`DndBehavior`].
///
/// One pointer session at a time: a second press replaces the first.
#[derive(Debug)]
pub struct DndLayout<T: 'static> {
    pub options: DndLayoutOptions,

    store: SessionStore<T>,
    ghost: Option<GhostLayer<T>>,
    press: PressSession,

    /// Direct handle to the root element; otherwise found through `options.root_id`.
    drag_root: Option<ElementId>,

    dimmed: Option<(ElementId, f32)>,

    bridge: BridgeState,

    debug_log: VecDeque<String>,
    debug_event_counter: u64,
}

impl<T: 'static> Default for DndLayout<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> DndLayout<T> {
    pub fn new() -> Self {
        Self::new_with_options(DndLayoutOptions::default())
    }

    /// Invalid options are logged and used as given; see [`DndLayoutOptions::validate`].
    pub fn new_with_options(options: DndLayoutOptions) -> Self {
        if let Err(err) = options.validate() {
            log::warn!("DndLayout: {err}");
        }
        let mut layout = Self {
            options,
            store: SessionStore::new(),
            ghost: None,
            press: PressSession::default(),
            drag_root: None,
            dimmed: None,
            bridge: BridgeState::default(),
            debug_log: VecDeque::new(),
            debug_event_counter: 0,
        };
        layout.sync_ghost_layer();
        layout
    }

    #[must_use]
    pub fn with_drag_root(mut self, root: ElementId) -> Self {
        self.drag_root = Some(root);
        self
    }

    pub fn set_drag_root(&mut self, root: Option<ElementId>) {
        self.drag_root = root;
    }

    pub fn drag_root(&self) -> Option<ElementId> {
        self.drag_root
    }

    /// The shared drag state, e.g. to register extra move listeners.
    pub fn store(&self) -> &SessionStore<T> {
        &self.store
    }

    pub fn ghost(&self) -> Option<&GhostLayer<T>> {
        self.ghost.as_ref()
    }

    pub fn ghost_proxy(&self) -> Option<GhostProxy> {
        self.ghost.as_ref()?.proxy()
    }

    pub fn phase(&self) -> DragPhase {
        self.press.phase()
    }

    pub fn is_dragging(&self) -> bool {
        self.store.is_dragging()
    }

    /// `options.style`, with the cursor forced to [`CursorIcon::Move`] while dragging.
    pub fn container_style(&self) -> ContainerStyle {
        let mut style = self.options.style.clone();
        if self.is_dragging() {
            style.cursor = Some(CursorIcon::Move);
        }
        style
    }

    /// The dragged element and the opacity factor the host should apply to it.
    pub fn dimmed_element(&self) -> Option<(ElementId, f32)> {
        self.dimmed
    }

    /// Resolve `event` against `tree` with this layout's property names and root.
    pub fn resolve_info<R>(&self, tree: &R, event: &PointerEvent) -> DndInfo<T>
    where
        R: RenderTree<T> + ?Sized,
    {
        resolver::resolve_info(tree, event, &self.options, self.drag_root)
    }

    /// Dispatch one pointer event.
    pub fn handle_event<R>(
        &mut self,
        tree: &R,
        behavior: &mut dyn DndBehavior<T>,
        event: &PointerEvent,
    ) -> EventResponse
    where
        R: RenderTree<T> + ?Sized,
    {
        self.sync_ghost_layer();
        match event.kind {
            PointerEventKind::Down => self.on_pointer_down(tree, event),
            PointerEventKind::Move => self.on_pointer_move(behavior, event),
            PointerEventKind::Up => self.on_pointer_up(tree, behavior, event),
            PointerEventKind::Over => self.on_pointer_over(tree, behavior, event),
            PointerEventKind::ContextMenu => self.on_context_menu(tree, behavior, event),
            PointerEventKind::Leave => self.on_pointer_leave(behavior),
        }
    }

    /// `Idle -> Pressed` on a primary press.
    pub fn on_pointer_down<R>(&mut self, tree: &R, event: &PointerEvent) -> EventResponse
    where
        R: RenderTree<T> + ?Sized,
    {
        if !event.is_primary() {
            self.debug_log_event(format!("down ignored: button={:?}", event.button));
            return EventResponse::default();
        }

        let info = self.resolve_info(tree, event);
        let msg = self.press.press(event.time);
        self.debug_log_event(format!(
            "{msg} dnd_id={}",
            info.dnd_id.as_ref().map_or_else(|| "<none>".to_owned(), ToString::to_string)
        ));

        // A stale drag from a missed release must not survive the new press.
        self.store.set_is_dragging(false);
        self.dimmed = None;
        self.store.start_drag(info);
        EventResponse::default()
    }

    /// `Pressed -> Dragging` when the pressed node may be dragged; broadcasts every move.
    pub fn on_pointer_move(
        &mut self,
        behavior: &mut dyn DndBehavior<T>,
        event: &PointerEvent,
    ) -> EventResponse {
        if self.phase() == DragPhase::Pressed {
            let draggable = self
                .store
                .with_current_drag(|d| d.is_some_and(|d| d.has_identity() && d.drag_enabled()));
            if draggable && self.store.set_is_dragging(true) {
                if let Some(msg) = self.press.begin_drag() {
                    self.debug_log_event(msg);
                }
                self.dimmed = self
                    .store
                    .with_current_drag(|d| d.and_then(|d| d.element))
                    .map(|el| (el, self.options.drag_opacity_factor));
            }
        }

        self.store.broadcast_move(event);

        if self.phase() == DragPhase::Dragging {
            if let Some(drag) = self.store.current_drag() {
                behavior.on_dragging(event, drag.data(), drag.element);
            }
        }
        EventResponse::default()
    }

    /// `Pressed/Dragging -> Idle`: a click if released quickly, otherwise a drop.
    pub fn on_pointer_up<R>(
        &mut self,
        tree: &R,
        behavior: &mut dyn DndBehavior<T>,
        event: &PointerEvent,
    ) -> EventResponse
    where
        R: RenderTree<T> + ?Sized,
    {
        if !event.is_primary() {
            self.debug_log_event(format!("up ignored: button={:?}", event.button));
            return EventResponse::default();
        }

        let (release, msg) = self
            .press
            .release(event.time, self.options.click_threshold_secs);
        self.debug_log_event(msg);

        let from = self.store.current_drag();
        self.end_drag();

        let Some(release) = release else {
            return EventResponse::default();
        };

        match release.kind {
            ReleaseKind::Click => {
                let info = self.resolve_info(tree, event);
                if let (Some(id), Some(props)) = (&info.dnd_id, &info.dnd_props) {
                    self.debug_log_event(format!("click dnd_id={id}"));
                    behavior.on_component_clicked(&props.data, id);
                }
            }
            ReleaseKind::Drop => {
                let to = self.resolve_info(tree, event);
                match from {
                    // `can_drag` only gates Dragging; a long press on a non-draggable node still drops.
                    Some(from) if from.has_identity() && to.has_identity() => {
                        self.debug_log_event(format!(
                            "drop from={} to={} after {:.3}s",
                            fmt_id(&from),
                            fmt_id(&to),
                            release.elapsed
                        ));
                        behavior.on_drag_end(&from, &to);
                    }
                    _ => self.debug_log_event("drop discarded: unresolved source or target"),
                }
            }
        }
        EventResponse::default()
    }

    /// Hovering a tagged node; no state change.
    pub fn on_pointer_over<R>(
        &mut self,
        tree: &R,
        behavior: &mut dyn DndBehavior<T>,
        event: &PointerEvent,
    ) -> EventResponse
    where
        R: RenderTree<T> + ?Sized,
    {
        let info = self.resolve_info(tree, event);
        if let (Some(props), Some(element)) = (&info.dnd_props, info.element) {
            let is_dragging = self.store.is_dragging();
            let current = self.store.current_drag();
            behavior.on_hover(is_dragging, &props.data, element, current.as_ref(), event);
        }
        EventResponse::default()
    }

    /// Suppresses the native context menu and reports the node under the pointer.
    pub fn on_context_menu<R>(
        &mut self,
        tree: &R,
        behavior: &mut dyn DndBehavior<T>,
        event: &PointerEvent,
    ) -> EventResponse
    where
        R: RenderTree<T> + ?Sized,
    {
        let info = self.resolve_info(tree, event);
        self.debug_log_event(format!("context menu dnd_id={}", fmt_id(&info)));
        behavior.on_mouse_right_click(&info, event);
        EventResponse::SUPPRESS
    }

    /// The pointer left the drag root: abandon any press or drag.
    pub fn on_pointer_leave(&mut self, behavior: &mut dyn DndBehavior<T>) -> EventResponse {
        if let Some(msg) = self.press.cancel() {
            self.debug_log_event(msg);
        }
        self.end_drag();
        behavior.on_mouse_leave();
        EventResponse::default()
    }

    fn end_drag(&mut self) {
        self.store.reset();
        self.dimmed = None;
        if let Some(ghost) = &self.ghost {
            ghost.sync();
        }
    }

    /// Create, drop or replace the ghost layer to match the options.
    fn sync_ghost_layer(&mut self) {
        let wanted = self
            .options
            .show_ghost_layer
            .then(|| self.options.ghost_strategy());
        let current = self.ghost.as_ref().map(GhostLayer::strategy);
        if wanted == current {
            return;
        }
        self.ghost = wanted.map(|strategy| GhostLayer::new(&self.store, strategy));
    }
}

fn fmt_id<T>(info: &DndInfo<T>) -> String {
    info.dnd_id
        .as_ref()
        .map_or_else(|| "<none>".to_owned(), ToString::to_string)
}
