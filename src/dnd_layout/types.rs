use std::fmt;
use std::rc::Rc;

use egui::{PointerButton, Pos2, Vec2};

/// Identity tag of a draggable node.
///
/// Uniqueness is up to the caller; the layout never checks it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum DndId {
    Num(i64),
    Str(String),
}

impl fmt::Display for DndId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DndId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for DndId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for DndId {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for DndId {
    fn from(value: i32) -> Self {
        Self::Num(i64::from(value))
    }
}

impl PartialEq<str> for DndId {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Self::Str(s) if s == other)
    }
}

impl PartialEq<&str> for DndId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Handle of a logical node in a [`super::RenderTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Handle of a concrete screen element in a [`super::RenderTree`].
///
/// Only valid for as long as the host keeps the element alive; the layout never stores one
/// beyond the drag session that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

/// Whether a node accepts a drop. Advisory only: the layout never enforces it.
pub enum CanDrop<T> {
    Always(bool),
    Predicate(Rc<dyn Fn(&DndInfo<T>) -> bool>),
}

impl<T> Default for CanDrop<T> {
    fn default() -> Self {
        Self::Always(true)
    }
}

impl<T> Clone for CanDrop<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Always(b) => Self::Always(*b),
            Self::Predicate(f) => Self::Predicate(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for CanDrop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always(b) => f.debug_tuple("Always").field(b).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// The payload attached to a draggable node, next to its [`DndId`].
#[derive(Clone, Debug)]
pub struct DndProps<T> {
    pub data: T,

    /// Advisory drop acceptance, see [`DndProps::accepts_drop`].
    pub can_drop: CanDrop<T>,

    /// `Some(false)` keeps the node clickable but never lets it enter a drag.
    pub can_drag: Option<bool>,
}

impl<T> DndProps<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            can_drop: CanDrop::default(),
            can_drag: None,
        }
    }

    #[must_use]
    pub fn with_can_drag(mut self, can_drag: bool) -> Self {
        self.can_drag = Some(can_drag);
        self
    }

    #[must_use]
    pub fn with_can_drop(mut self, can_drop: CanDrop<T>) -> Self {
        self.can_drop = can_drop;
        self
    }

    pub fn drag_enabled(&self) -> bool {
        self.can_drag != Some(false)
    }

    pub fn accepts_drop(&self, drag: &DndInfo<T>) -> bool {
        match &self.can_drop {
            CanDrop::Always(b) => *b,
            CanDrop::Predicate(f) => f(drag),
        }
    }
}

/// Pointer position captured while resolving an event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MousePosition {
    pub client_x: f32,
    pub client_y: f32,

    /// Relative to the content box of the resolved backing element.
    pub offset_x: f32,
    pub offset_y: f32,

    /// Relative to the scrolled content origin of the drag root.
    pub x: f32,
    pub y: f32,
}

/// Position of the resolved backing element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementPosition {
    /// Viewport coordinates of the element's bounding rect.
    pub client_left: f32,
    pub client_top: f32,

    /// Relative to the scrolled content origin of the drag root.
    pub x: f32,
    pub y: f32,

    /// Computed size of the element (falls back to the bounding rect size).
    pub width: f32,
    pub height: f32,
}

impl ElementPosition {
    pub fn client_min(&self) -> Pos2 {
        Pos2::new(self.client_left, self.client_top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Snapshot produced for every resolved pointer event.
///
/// A record with `dnd_id == None` means the event hit no tagged node.
pub struct DndInfo<T> {
    pub dnd_id: Option<DndId>,
    pub dnd_props: Option<Rc<DndProps<T>>>,
    pub node: Option<NodeId>,
    pub element: Option<ElementId>,
    pub mouse_position: MousePosition,
    pub element_position: ElementPosition,
}

impl<T> DndInfo<T> {
    pub fn empty() -> Self {
        Self {
            dnd_id: None,
            dnd_props: None,
            node: None,
            element: None,
            mouse_position: MousePosition::default(),
            element_position: ElementPosition::default(),
        }
    }

    pub fn has_identity(&self) -> bool {
        self.dnd_id.is_some()
    }

    pub fn data(&self) -> Option<&T> {
        self.dnd_props.as_deref().map(|p| &p.data)
    }

    pub fn drag_enabled(&self) -> bool {
        self.dnd_props.as_deref().is_none_or(DndProps::drag_enabled)
    }

    /// Pointer minus element origin, both in viewport coordinates.
    pub fn grab_offset(&self) -> Vec2 {
        Pos2::new(self.mouse_position.client_x, self.mouse_position.client_y)
            - self.element_position.client_min()
    }
}

impl<T> Clone for DndInfo<T> {
    fn clone(&self) -> Self {
        Self {
            dnd_id: self.dnd_id.clone(),
            dnd_props: self.dnd_props.clone(),
            node: self.node,
            element: self.element,
            mouse_position: self.mouse_position,
            element_position: self.element_position,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DndInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DndInfo")
            .field("dnd_id", &self.dnd_id)
            .field("dnd_props", &self.dnd_props)
            .field("node", &self.node)
            .field("element", &self.element)
            .field("mouse_position", &self.mouse_position)
            .field("element_position", &self.element_position)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Over,
    ContextMenu,
    Leave,
}

/// A raw pointer event as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: Option<PointerButton>,

    /// The physical element under the pointer, if any.
    pub target: Option<ElementId>,

    pub client_pos: Pos2,

    /// Pointer relative to the padding edge of `target`.
    pub offset: Vec2,

    /// Movement since the previous pointer event.
    pub movement: Vec2,

    /// Seconds, same clock as `egui::InputState::time`.
    pub time: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, target: Option<ElementId>, client_pos: Pos2, time: f64) -> Self {
        Self {
            kind,
            button: None,
            target,
            client_pos,
            offset: Vec2::ZERO,
            movement: Vec2::ZERO,
            time,
        }
    }

    pub fn down(target: Option<ElementId>, client_pos: Pos2, time: f64) -> Self {
        Self::new(PointerEventKind::Down, target, client_pos, time).with_button(PointerButton::Primary)
    }

    pub fn up(target: Option<ElementId>, client_pos: Pos2, time: f64) -> Self {
        Self::new(PointerEventKind::Up, target, client_pos, time).with_button(PointerButton::Primary)
    }

    pub fn moved(target: Option<ElementId>, client_pos: Pos2, movement: Vec2, time: f64) -> Self {
        Self::new(PointerEventKind::Move, target, client_pos, time).with_movement(movement)
    }

    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.button == Some(PointerButton::Primary)
    }
}

/// What the host should do with the native event after the layout handled it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventResponse {
    pub const SUPPRESS: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}
