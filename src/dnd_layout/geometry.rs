use egui::{Pos2, Rect, Vec2};

use super::render_tree::{ElementBox, RenderTree};
use super::types::{ElementId, ElementPosition, MousePosition, PointerEvent};

/// Parse a pixel style value such as `"12px"` or `"-3.5"`.
///
/// The trailing unit suffix is stripped; anything unparsable is `0.0`.
pub fn parse_px(value: &str) -> f32 {
    let number = value
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    match number.trim().parse::<f32>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Origin of the drag root's scrolled content, in the frame positions are measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) struct RootOrigin {
    pub(super) origin: Vec2,
    pub(super) scroll: Vec2,
}

impl RootOrigin {
    fn to_content(self, client: Pos2) -> Pos2 {
        client - self.origin + self.scroll
    }
}

/// Both coordinate frames computed for one event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frames {
    pub mouse_position: MousePosition,
    pub element_position: ElementPosition,
}

pub(super) fn root_origin<T, R>(tree: &R, drag_root: Option<ElementId>, root_id: &str) -> RootOrigin
where
    R: RenderTree<T> + ?Sized,
{
    if let Some(root) = drag_root {
        return tree
            .element_box(root)
            .map(|b| RootOrigin {
                origin: b.client_offset,
                scroll: b.scroll,
            })
            .unwrap_or_default();
    }

    // No direct handle: fall back to the singleton root found by its id.
    tree.element_by_html_id(root_id)
        .and_then(|root| tree.element_box(root))
        .map(|b| RootOrigin {
            origin: b.rect.min.to_vec2(),
            scroll: b.scroll,
        })
        .unwrap_or_default()
}

/// Bounding rect of the drag root, used by the egui bridge to detect leaving it.
pub(super) fn root_rect<T, R>(tree: &R, drag_root: Option<ElementId>, root_id: &str) -> Option<Rect>
where
    R: RenderTree<T> + ?Sized,
{
    let root = drag_root.or_else(|| tree.element_by_html_id(root_id))?;
    tree.element_box(root).map(|b| b.rect)
}

/// Pointer position relative to the padding edge of `target` (DOM `offsetX/offsetY`).
pub fn offset_in_target<T, R>(tree: &R, target: Option<ElementId>, client_pos: Pos2) -> Vec2
where
    R: RenderTree<T> + ?Sized,
{
    let Some(b) = target.and_then(|t| tree.element_box(t)) else {
        return Vec2::ZERO;
    };
    let border = Vec2::new(b.style.px("border-left-width"), b.style.px("border-top-width"));
    client_pos - b.rect.min - border
}

/// Compute the pointer and element frames of `event` against `reference`.
///
/// `reference` is the resolved backing element; `event.target` may be a nested child of it.
/// Missing measurements count as zero.
pub fn compute_frames<T, R>(
    tree: &R,
    event: &PointerEvent,
    reference: Option<ElementId>,
    drag_root: Option<ElementId>,
    root_id: &str,
) -> Frames
where
    R: RenderTree<T> + ?Sized,
{
    let root = root_origin(tree, drag_root, root_id);

    let reference_box = reference.and_then(|e| tree.element_box(e));
    let target_box = event.target.and_then(|e| tree.element_box(e));

    let reference_min = reference_box.as_ref().map_or(Pos2::ZERO, |b| b.rect.min);
    let target_min = target_box.as_ref().map_or(Pos2::ZERO, |b| b.rect.min);

    let inset = |b: Option<&ElementBox>| b.map_or(Vec2::ZERO, |b| b.style.padding_border_inset());
    let inset_delta = inset(target_box.as_ref()) - inset(reference_box.as_ref());

    let offset = event.offset + (target_min - reference_min) + inset_delta;
    let pointer_in_content = root.to_content(event.client_pos);

    // An unmeasurable reference has no position at all, not one relative to the root.
    let element_position = reference_box.as_ref().map_or_else(ElementPosition::default, |b| {
        let element_in_content = root.to_content(b.rect.min);
        let size = b.computed_size();
        ElementPosition {
            client_left: b.rect.min.x,
            client_top: b.rect.min.y,
            x: element_in_content.x,
            y: element_in_content.y,
            width: size.x,
            height: size.y,
        }
    });

    Frames {
        mouse_position: MousePosition {
            client_x: event.client_pos.x,
            client_y: event.client_pos.y,
            offset_x: offset.x,
            offset_y: offset.y,
            x: pointer_in_content.x,
            y: pointer_in_content.y,
        },
        element_position,
    }
}
