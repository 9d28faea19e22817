use super::geometry::compute_frames;
use super::options::DndLayoutOptions;
use super::render_tree::{ID_PROPERTY, RenderTree};
use super::types::{DndInfo, ElementId, NodeId, PointerEvent};

/// Upper bound on tree walks, in case a host tree has a cycle.
const MAX_WALK_DEPTH: usize = 4096;

/// Walk up from the node owning `target` to the first node tagged with `id_property`.
///
/// Stops (with `None`) at the drag root, i.e. the node whose [`ID_PROPERTY`] is `root_id`,
/// so the search never leaves the drag container.
pub fn resolve_identity_node<T, R>(
    tree: &R,
    target: Option<ElementId>,
    id_property: &str,
    root_id: &str,
) -> Option<NodeId>
where
    R: RenderTree<T> + ?Sized,
{
    let mut node = tree.owning_node(target?)?;
    for _ in 0..MAX_WALK_DEPTH {
        if let Some(props) = tree.props(node) {
            if props.text(ID_PROPERTY) == Some(root_id) {
                return None;
            }
            if props.contains(id_property) {
                return Some(node);
            }
        }
        node = tree.parent(node)?;
    }
    log::warn!("resolve_identity_node: gave up after {MAX_WALK_DEPTH} ancestors of {node:?}");
    None
}

/// The nearest concrete element rendered by `node`, following first children down through
/// non-element layers.
pub fn resolve_backing_element<T, R>(tree: &R, node: NodeId) -> Option<ElementId>
where
    R: RenderTree<T> + ?Sized,
{
    let mut node = node;
    for _ in 0..MAX_WALK_DEPTH {
        if let Some(element) = tree.rendered_element(node) {
            return Some(element);
        }
        node = tree.first_child(node)?;
    }
    log::warn!("resolve_backing_element: gave up after {MAX_WALK_DEPTH} descendants");
    None
}

/// Build the [`DndInfo`] snapshot for `event`.
///
/// Never fails: an event over nothing tagged gives a record without identity.
pub fn resolve_info<T, R>(
    tree: &R,
    event: &PointerEvent,
    options: &DndLayoutOptions,
    drag_root: Option<ElementId>,
) -> DndInfo<T>
where
    R: RenderTree<T> + ?Sized,
{
    let node = resolve_identity_node(tree, event.target, &options.id_property, &options.root_id);
    let element = node.and_then(|n| resolve_backing_element(tree, n));
    let props = node.and_then(|n| tree.props(n));
    let frames = compute_frames(tree, event, element, drag_root, &options.root_id);

    DndInfo {
        dnd_id: props.and_then(|p| p.dnd_id(&options.id_property)).cloned(),
        dnd_props: props.and_then(|p| p.dnd_props(&options.data_property)).cloned(),
        node,
        element,
        mouse_position: frames.mouse_position,
        element_position: frames.element_position,
    }
}
