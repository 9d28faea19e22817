use egui::{Pos2, Rect, Vec2};

use crate::dnd_layout::{
    DND_DATA_PROPERTY, DND_ID_PROPERTY, DND_LAYOUT_ROOT_ID, DndId, DndProps, ElementBox, ElementId,
    ID_PROPERTY, NodeId, PropertyBag, RenderTree,
};

#[derive(Debug)]
struct SimpleNode<T> {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Option<ElementId>,
    props: PropertyBag<T>,
}

#[derive(Clone, Debug)]
struct SimpleElement {
    owner: NodeId,
    element_box: ElementBox,
    html_id: Option<String>,
}

/// A small in-memory [`RenderTree`].
///
/// Good enough for tests, demos and hosts that lay out a flat list of boxes themselves.
/// Handles are indices and stay valid for the lifetime of the tree.
#[derive(Debug)]
pub struct SimpleRenderTree<T> {
    nodes: Vec<SimpleNode<T>>,
    elements: Vec<SimpleElement>,
    html_ids: ahash::HashMap<String, ElementId>,
}

impl<T> Default for SimpleRenderTree<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
            html_ids: ahash::HashMap::default(),
        }
    }
}

fn index(id: u64) -> usize {
    usize::try_from(id).unwrap_or(usize::MAX)
}

impl<T> SimpleRenderTree<T> {
    fn node(&self, id: NodeId) -> Option<&SimpleNode<T>> {
        self.nodes.get(index(id.0))
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut SimpleElement> {
        self.elements.get_mut(index(id.0))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The element `node` renders directly, if any.
    pub fn element_of(&self, node: NodeId) -> Option<ElementId> {
        self.node(node)?.element
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    pub fn props_mut(&mut self, node: NodeId) -> Option<&mut PropertyBag<T>> {
        self.nodes.get_mut(index(node.0)).map(|n| &mut n.props)
    }

    /// Move an element's bounding rect to `rect` (descendants are not moved).
    pub fn set_element_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(e) = self.element_mut(element) {
            e.element_box.rect = rect;
        }
    }

    /// Scroll `element` by `delta`: its scroll offset grows and every element rendered
    /// below it shifts the other way, like a browser scroll container.
    pub fn scroll_element_by(&mut self, element: ElementId, delta: Vec2) {
        let Some(owner) = self.elements.get(index(element.0)).map(|e| e.owner) else {
            return;
        };
        if let Some(e) = self.element_mut(element) {
            e.element_box.scroll += delta;
        }

        let mut stack: Vec<NodeId> = self.children(owner).to_vec();
        while let Some(node) = stack.pop() {
            if let Some(el) = self.element_of(node) {
                if let Some(e) = self.element_mut(el) {
                    e.element_box.rect = e.element_box.rect.translate(-delta);
                }
            }
            stack.extend_from_slice(self.children(node));
        }
    }

    /// Remove an element from the document; later measurements of it are misses.
    pub fn detach_element(&mut self, element: ElementId) {
        let Some(e) = self.elements.get(index(element.0)) else {
            return;
        };
        let owner = e.owner;
        if let Some(html_id) = e.html_id.clone() {
            self.html_ids.remove(&html_id);
        }
        if let Some(node) = self.nodes.get_mut(index(owner.0)) {
            if node.element == Some(element) {
                node.element = None;
            }
        }
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.elements
            .get(index(element.0))
            .is_some_and(|e| self.element_of(e.owner) == Some(element))
    }
}

impl<T> RenderTree<T> for SimpleRenderTree<T> {
    fn owning_node(&self, target: ElementId) -> Option<NodeId> {
        self.is_attached(target)
            .then(|| self.elements.get(index(target.0)).map(|e| e.owner))
            .flatten()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.children.first().copied()
    }

    fn rendered_element(&self, node: NodeId) -> Option<ElementId> {
        self.element_of(node)
    }

    fn props(&self, node: NodeId) -> Option<&PropertyBag<T>> {
        self.node(node).map(|n| &n.props)
    }

    fn element_box(&self, element: ElementId) -> Option<ElementBox> {
        if !self.is_attached(element) {
            return None;
        }
        self.elements
            .get(index(element.0))
            .map(|e| e.element_box.clone())
    }

    fn element_by_html_id(&self, html_id: &str) -> Option<ElementId> {
        self.html_ids.get(html_id).copied()
    }

    fn element_at(&self, pos: Pos2) -> Option<ElementId> {
        // Later elements are painted on top of earlier ones.
        (0..self.elements.len())
            .rev()
            .map(|i| ElementId(i as u64))
            .filter(|&id| self.is_attached(id))
            .find(|&id| {
                self.elements
                    .get(index(id.0))
                    .is_some_and(|e| e.element_box.rect.contains(pos))
            })
    }
}

/// Builds a [`SimpleRenderTree`] from code.
///
/// ```
/// use egui::{Pos2, Rect, Vec2};
/// use egui_tree_dnd::{DndProps, DndTreeBuilder};
///
/// let mut b = DndTreeBuilder::new();
/// let root = b.drag_root(Rect::from_min_size(Pos2::ZERO, Vec2::splat(200.0)));
/// let item = b.element(root, Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::splat(40.0)));
/// b.tag(item, "item-1", DndProps::new("payload"));
/// let tree = b.build();
/// assert_eq!(tree.node_count(), 2);
/// ```
#[derive(Debug)]
pub struct DndTreeBuilder<T> {
    tree: SimpleRenderTree<T>,
}

impl<T> Default for DndTreeBuilder<T> {
    fn default() -> Self {
        Self {
            tree: SimpleRenderTree::default(),
        }
    }
}

impl<T> DndTreeBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.tree.nodes.len() as u64);
        self.tree.nodes.push(SimpleNode {
            parent,
            children: Vec::new(),
            element: None,
            props: PropertyBag::new(),
        });
        if let Some(parent) = parent {
            if let Some(p) = self.tree.nodes.get_mut(index(parent.0)) {
                p.children.push(id);
            }
        }
        id
    }

    /// A node that renders no element of its own (a fragment or wrapper component).
    pub fn fragment(&mut self, parent: impl Into<Option<NodeId>>) -> NodeId {
        self.push_node(parent.into())
    }

    /// A node rendering a concrete element with the given bounding rect.
    pub fn element(&mut self, parent: impl Into<Option<NodeId>>, rect: Rect) -> NodeId {
        let node = self.push_node(parent.into());
        let element = ElementId(self.tree.elements.len() as u64);
        self.tree.elements.push(SimpleElement {
            owner: node,
            element_box: ElementBox::new(rect),
            html_id: None,
        });
        if let Some(n) = self.tree.nodes.get_mut(index(node.0)) {
            n.element = Some(element);
        }
        node
    }

    /// The drag root container with the default root id.
    pub fn drag_root(&mut self, rect: Rect) -> NodeId {
        self.drag_root_in(None, rect)
    }

    /// The drag root container, nested under `parent`.
    pub fn drag_root_in(&mut self, parent: impl Into<Option<NodeId>>, rect: Rect) -> NodeId {
        let node = self.element(parent, rect);
        self.set_html_id(node, DND_LAYOUT_ROOT_ID);
        node
    }

    /// Set the element's document id, and the node's `id` property to match.
    pub fn set_html_id(&mut self, node: NodeId, html_id: &str) {
        let Some(element) = self.tree.element_of(node) else {
            return;
        };
        if let Some(e) = self.tree.element_mut(element) {
            e.html_id = Some(html_id.to_owned());
        }
        self.tree.html_ids.insert(html_id.to_owned(), element);
        if let Some(props) = self.tree.props_mut(node) {
            props.insert(ID_PROPERTY, crate::dnd_layout::PropValue::Text(html_id.to_owned()));
        }
    }

    /// Tag `node` as draggable under the default property names.
    pub fn tag(&mut self, node: NodeId, id: impl Into<DndId>, props: DndProps<T>) {
        self.tag_with(node, DND_ID_PROPERTY, id, DND_DATA_PROPERTY, props);
    }

    pub fn tag_with(
        &mut self,
        node: NodeId,
        id_property: &str,
        id: impl Into<DndId>,
        data_property: &str,
        props: DndProps<T>,
    ) {
        if let Some(bag) = self.tree.props_mut(node) {
            let taken = std::mem::take(bag);
            *bag = taken
                .with_dnd_id(id_property, id)
                .with_dnd_props(data_property, props);
        }
    }

    fn with_element_box(&mut self, node: NodeId, f: impl FnOnce(&mut ElementBox)) {
        if let Some(element) = self.tree.element_of(node) {
            if let Some(e) = self.tree.element_mut(element) {
                f(&mut e.element_box);
            }
        }
    }

    pub fn set_style(&mut self, node: NodeId, name: &str, value: &str) {
        self.with_element_box(node, |b| b.style.set(name, value));
    }

    pub fn set_scroll(&mut self, node: NodeId, scroll: Vec2) {
        self.with_element_box(node, |b| b.scroll = scroll);
    }

    pub fn set_client_offset(&mut self, node: NodeId, offset: Vec2) {
        self.with_element_box(node, |b| b.client_offset = offset);
    }

    pub fn build(self) -> SimpleRenderTree<T> {
        self.tree
    }
}
