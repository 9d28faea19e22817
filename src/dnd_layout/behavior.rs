use egui::{Color32, Painter, Rect, Stroke, StrokeKind, Ui};

use super::types::{DndId, DndInfo, ElementId, PointerEvent};

/// Application callbacks of a [`super::DndLayout`].
///
/// Every method has a no-op default, so implement only what you need.
/// Callbacks run synchronously inside the event handler; a panic propagates to the caller.
pub trait DndBehavior<T> {
    /// A drag was released over a tagged node.
    fn on_drag_end(&mut self, from: &DndInfo<T>, to: &DndInfo<T>) {
        let _ = (from, to);
    }

    /// Called for every pointer move while dragging.
    fn on_dragging(&mut self, event: &PointerEvent, data: Option<&T>, element: Option<ElementId>) {
        let _ = (event, data, element);
    }

    /// The pointer entered a tagged node that renders an element.
    fn on_hover(
        &mut self,
        is_dragging: bool,
        data: &T,
        element: ElementId,
        current_drag: Option<&DndInfo<T>>,
        event: &PointerEvent,
    ) {
        let _ = (is_dragging, data, element, current_drag, event);
    }

    /// A short press-release over a tagged node.
    fn on_component_clicked(&mut self, data: &T, dnd_id: &DndId) {
        let _ = (data, dnd_id);
    }

    /// Context menu request. `info` may be empty if nothing tagged is under the pointer.
    fn on_mouse_right_click(&mut self, info: &DndInfo<T>, event: &PointerEvent) {
        let _ = (info, event);
    }

    fn on_mouse_leave(&mut self) {}

    /// Content of the ghost when [`super::DndLayoutOptions::custom_ghost`] is set.
    fn ghost_ui(&mut self, ui: &mut Ui, drag: &DndInfo<T>) {
        let _ = (ui, drag);
    }

    /// Paint the cloned ghost of `source` into `rect`.
    ///
    /// The default paints a translucent placeholder of the element's size.
    fn paint_clone_ghost(&mut self, painter: &Painter, source: ElementId, rect: Rect) {
        let _ = source;
        painter.rect_filled(rect, 4.0, Color32::from_white_alpha(48));
        painter.rect_stroke(
            rect,
            4.0,
            Stroke::new(1.0, Color32::from_white_alpha(160)),
            StrokeKind::Inside,
        );
    }
}

/// No callbacks at all.
impl<T> DndBehavior<T> for () {}
