use std::rc::Rc;

use egui::{Pos2, Rect, Vec2};

use super::geometry::parse_px;
use super::types::{DndId, DndProps, ElementId, NodeId};

/// Property holding the text id used to recognise the drag root node.
pub const ID_PROPERTY: &str = "id";

/// A value stored in a node's [`PropertyBag`].
#[derive(Debug)]
pub enum PropValue<T> {
    Id(DndId),
    Props(Rc<DndProps<T>>),
    Text(String),
}

/// Per-node properties, keyed by name.
///
/// The layout only reads two reserved names (configurable in
/// [`super::DndLayoutOptions`]) plus [`ID_PROPERTY`] for the drag root.
#[derive(Debug)]
pub struct PropertyBag<T> {
    values: ahash::HashMap<String, PropValue<T>>,
}

impl<T> Default for PropertyBag<T> {
    fn default() -> Self {
        Self {
            values: ahash::HashMap::default(),
        }
    }
}

impl<T> PropertyBag<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropValue<T>) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn with_dnd_id(mut self, name: impl Into<String>, id: impl Into<DndId>) -> Self {
        self.insert(name, PropValue::Id(id.into()));
        self
    }

    #[must_use]
    pub fn with_dnd_props(mut self, name: impl Into<String>, props: DndProps<T>) -> Self {
        self.insert(name, PropValue::Props(Rc::new(props)));
        self
    }

    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, PropValue::Text(text.into()));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dnd_id(&self, name: &str) -> Option<&DndId> {
        match self.values.get(name)? {
            PropValue::Id(id) => Some(id),
            PropValue::Props(_) | PropValue::Text(_) => None,
        }
    }

    pub fn dnd_props(&self, name: &str) -> Option<&Rc<DndProps<T>>> {
        match self.values.get(name)? {
            PropValue::Props(props) => Some(props),
            PropValue::Id(_) | PropValue::Text(_) => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            PropValue::Text(text) => Some(text),
            PropValue::Id(_) | PropValue::Props(_) => None,
        }
    }
}

/// Computed style of an element, as raw CSS-like strings (`"12px"`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    values: ahash::HashMap<String, String>,
}

impl ComputedStyle {
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Missing or unparsable values are `0.0`.
    pub fn px(&self, name: &str) -> f32 {
        self.get(name).map(parse_px).unwrap_or(0.0)
    }

    /// Padding plus border width on the leading edges.
    pub fn padding_border_inset(&self) -> Vec2 {
        Vec2::new(
            self.px("padding-left") + self.px("border-left-width"),
            self.px("padding-top") + self.px("border-top-width"),
        )
    }
}

/// Measurements of one concrete element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementBox {
    /// Bounding rect in viewport coordinates.
    pub rect: Rect,

    /// `clientLeft` / `clientTop`.
    pub client_offset: Vec2,

    /// `scrollLeft` / `scrollTop`.
    pub scroll: Vec2,

    pub style: ComputedStyle,
}

impl Default for ElementBox {
    fn default() -> Self {
        Self::new(Rect::from_min_max(Pos2::ZERO, Pos2::ZERO))
    }
}

impl ElementBox {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            client_offset: Vec2::ZERO,
            scroll: Vec2::ZERO,
            style: ComputedStyle::default(),
        }
    }

    /// Computed width/height, or the bounding rect size where the style has none.
    pub fn computed_size(&self) -> Vec2 {
        let width = self.style.px("width");
        let height = self.style.px("height");
        Vec2::new(
            if width > 0.0 { width } else { self.rect.width() },
            if height > 0.0 { height } else { self.rect.height() },
        )
    }
}

/// The host's view of its UI tree.
///
/// Logical nodes (components, fragments, ...) form a tree through [`Self::parent`] and
/// [`Self::first_child`]; some of them render a concrete element that can be measured.
pub trait RenderTree<T> {
    /// The logical node that rendered `target`.
    fn owning_node(&self, target: ElementId) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    /// The element `node` renders directly, if it is an element-type node.
    fn rendered_element(&self, node: NodeId) -> Option<ElementId>;

    fn props(&self, node: NodeId) -> Option<&PropertyBag<T>>;

    /// `None` once the element is no longer in the document.
    fn element_box(&self, element: ElementId) -> Option<ElementBox>;

    /// Lookup by the element's document-wide id attribute.
    fn element_by_html_id(&self, html_id: &str) -> Option<ElementId>;

    /// Topmost element under `pos`. Only needed by the egui bridge.
    fn element_at(&self, pos: Pos2) -> Option<ElementId> {
        let _ = pos;
        None
    }
}
