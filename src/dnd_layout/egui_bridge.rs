use egui::{Area, Context, Event, Id, LayerId, Order, PointerButton, Pos2, Vec2};

use super::geometry::{offset_in_target, root_rect};
use super::{
    DndBehavior, DndLayout, ElementId, EventResponse, GhostStrategy, PointerEvent, PointerEventKind,
    RenderTree,
};

/// Pointer bookkeeping needed to turn egui events into DOM-like pointer events.
#[derive(Debug, Default)]
pub(super) struct BridgeState {
    last_pointer: Option<Pos2>,
    hovered: Option<ElementId>,
    inside_root: bool,
}

impl<T: 'static> DndLayout<T> {
    /// Run this pass's egui pointer events through the layout.
    ///
    /// Targets come from [`RenderTree::element_at`]. Hovering a new element also produces an
    /// `Over` event, a secondary press a `ContextMenu` event, and leaving the drag root (or
    /// the window) a `Leave` event. Presses outside the drag root are not forwarded.
    pub fn handle_egui_input<R>(
        &mut self,
        ctx: &Context,
        tree: &R,
        behavior: &mut dyn DndBehavior<T>,
    ) -> EventResponse
    where
        R: RenderTree<T> + ?Sized,
    {
        let (events, time) = ctx.input(|i| (i.events.clone(), i.time));

        let mut response = EventResponse::default();
        for event in &events {
            for pointer_event in self.translate_egui_event(tree, event, time) {
                response = response.merge(self.handle_event(tree, behavior, &pointer_event));
            }
        }

        if let Some(cursor) = self.container_style().cursor.filter(|_| self.is_dragging()) {
            ctx.set_cursor_icon(cursor);
        }
        response
    }

    /// Paint the ghost proxy on top of everything, if a drag is showing one.
    pub fn paint_ghost(&self, ctx: &Context, behavior: &mut dyn DndBehavior<T>) {
        let Some(proxy) = self.ghost_proxy() else {
            return;
        };
        let id = Id::new(("egui_tree_dnd_ghost", self.options.root_id.as_str()));

        match proxy.strategy {
            GhostStrategy::CustomTemplate => {
                let Some(drag) = self.store.current_drag() else {
                    return;
                };
                Area::new(id)
                    .order(Order::Tooltip)
                    .fixed_pos(proxy.rect.min)
                    .interactable(false)
                    .show(ctx, |ui| {
                        ui.set_min_size(proxy.rect.size());
                        behavior.ghost_ui(ui, &drag);
                    });
            }
            GhostStrategy::Clone => {
                if let Some(source) = proxy.source {
                    let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, id));
                    behavior.paint_clone_ghost(&painter, source, proxy.rect);
                }
            }
        }
    }

    fn translate_egui_event<R>(&mut self, tree: &R, event: &Event, time: f64) -> Vec<PointerEvent>
    where
        R: RenderTree<T> + ?Sized,
    {
        match event {
            Event::PointerMoved(pos) => self.translate_pointer_moved(tree, *pos, time),
            Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let inside = self.root_contains(tree, *pos);
                self.bridge.inside_root = inside;
                self.bridge.last_pointer = Some(*pos);
                let kind = match (button, pressed) {
                    // Presses outside the drag root belong to someone else.
                    (_, true) if !inside => return Vec::new(),
                    (PointerButton::Secondary, true) => PointerEventKind::ContextMenu,
                    (_, true) => PointerEventKind::Down,
                    // A release anywhere still ends a session started inside.
                    (_, false) => PointerEventKind::Up,
                };
                vec![pointer_event(tree, kind, *pos, time).with_button(*button)]
            }
            Event::PointerGone => {
                let gone = std::mem::take(&mut self.bridge);
                if gone.inside_root {
                    let pos = gone.last_pointer.unwrap_or(Pos2::ZERO);
                    vec![PointerEvent::new(PointerEventKind::Leave, None, pos, time)]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn translate_pointer_moved<R>(&mut self, tree: &R, pos: Pos2, time: f64) -> Vec<PointerEvent>
    where
        R: RenderTree<T> + ?Sized,
    {
        let movement = self.bridge.last_pointer.map_or(Vec2::ZERO, |last| pos - last);
        self.bridge.last_pointer = Some(pos);

        if !self.root_contains(tree, pos) {
            let was_inside = std::mem::take(&mut self.bridge.inside_root);
            self.bridge.hovered = None;
            return if was_inside {
                vec![PointerEvent::new(PointerEventKind::Leave, None, pos, time)]
            } else {
                Vec::new()
            };
        }
        self.bridge.inside_root = true;

        let mut out = Vec::with_capacity(2);
        let target = tree.element_at(pos);
        if target != self.bridge.hovered {
            self.bridge.hovered = target;
            if target.is_some() {
                out.push(pointer_event(tree, PointerEventKind::Over, pos, time));
            }
        }
        out.push(pointer_event(tree, PointerEventKind::Move, pos, time).with_movement(movement));
        out
    }

    /// Without a measurable root the whole screen counts as inside.
    fn root_contains<R>(&self, tree: &R, pos: Pos2) -> bool
    where
        R: RenderTree<T> + ?Sized,
    {
        root_rect(tree, self.drag_root, &self.options.root_id).is_none_or(|r| r.contains(pos))
    }
}

fn pointer_event<T, R>(tree: &R, kind: PointerEventKind, pos: Pos2, time: f64) -> PointerEvent
where
    R: RenderTree<T> + ?Sized,
{
    let target = tree.element_at(pos);
    PointerEvent::new(kind, target, pos, time).with_offset(offset_in_target(tree, target, pos))
}
