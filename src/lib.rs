//! Drag-and-drop for tree-structured UIs.
//!
//! A [`DndLayout`] sits on top of a host UI tree (anything implementing [`RenderTree`]):
//! pressing on a tagged node starts a session, moving turns it into a drag followed by a
//! ghost proxy, and releasing resolves to either a click or a drop, reported through a
//! [`DndBehavior`]. [`DndLayout::handle_egui_input`] and [`DndLayout::paint_ghost`] wire it
//! into `egui`.
#![forbid(unsafe_code)]

pub mod dnd_layout;
pub mod tree_builder;

pub use dnd_layout::{
    CanDrop, ContainerStyle, DND_DATA_PROPERTY, DND_ID_PROPERTY, DND_LAYOUT_ROOT_ID, DndBehavior,
    DndId, DndInfo, DndLayout, DndLayoutOptions, DndProps, DragPhase, ElementBox, ElementId,
    ElementPosition, EventResponse, GhostLayer, GhostProxy, GhostStrategy, MousePosition, NodeId,
    OptionsError, PointerEvent, PointerEventKind, PropertyBag, RenderTree, SessionStore,
};
pub use tree_builder::{DndTreeBuilder, SimpleRenderTree};
