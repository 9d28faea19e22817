use std::cell::RefCell;
use std::rc::{Rc, Weak};

use egui::{Pos2, Rect, Vec2};

use super::store::{MoveListener, SessionStore, WeakSessionStore};
use super::types::{DndInfo, ElementId, PointerEvent};

/// How the ghost proxy is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GhostStrategy {
    /// A caller-drawn template, moved by the accumulated pointer movement.
    CustomTemplate,

    /// A copy of the dragged element, placed absolutely under the pointer.
    #[default]
    Clone,
}

/// Where to draw the ghost right now. All coordinates are viewport (client) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostProxy {
    pub strategy: GhostStrategy,

    /// The dragged backing element.
    pub source: Option<ElementId>,

    pub rect: Rect,

    /// Accumulated movement (always zero for [`GhostStrategy::Clone`]).
    pub translation: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CloneAnchor {
    source: Option<ElementId>,
    grab_offset: Vec2,
    size: Vec2,
    min: Pos2,
}

#[derive(Debug, Default)]
struct GhostState {
    translation: Vec2,
    clone: Option<CloneAnchor>,
}

impl GhostState {
    fn reset(&mut self) {
        self.translation = Vec2::ZERO;
        self.clone = None;
    }

    fn on_move<T>(&mut self, strategy: GhostStrategy, drag: &DndInfo<T>, event: &PointerEvent) {
        match strategy {
            GhostStrategy::CustomTemplate => {
                self.translation += event.movement;
            }
            GhostStrategy::Clone => {
                let anchor = self.clone.get_or_insert_with(|| CloneAnchor {
                    source: drag.element,
                    grab_offset: drag.grab_offset(),
                    size: drag.element_position.size(),
                    min: drag.element_position.client_min(),
                });
                anchor.min = event.client_pos - anchor.grab_offset;
            }
        }
    }
}

/// Floating proxy of the dragged element.
///
/// Subscribes to the store's move broadcast on creation and unsubscribes when dropped.
/// Reads the drag state, never writes it.
pub struct GhostLayer<T> {
    store: SessionStore<T>,
    strategy: GhostStrategy,
    state: Rc<RefCell<GhostState>>,
    listener: MoveListener,
}

impl<T: 'static> GhostLayer<T> {
    pub fn new(store: &SessionStore<T>, strategy: GhostStrategy) -> Self {
        let state = Rc::new(RefCell::new(GhostState::default()));
        let listener = Self::move_listener(store.downgrade(), Rc::downgrade(&state), strategy);
        store.register_move_listener(Rc::clone(&listener));
        Self {
            store: store.clone(),
            strategy,
            state,
            listener,
        }
    }

    fn move_listener(
        store: WeakSessionStore<T>,
        state: Weak<RefCell<GhostState>>,
        strategy: GhostStrategy,
    ) -> MoveListener {
        Rc::new(move |event: &PointerEvent| {
            let (Some(store), Some(state)) = (store.upgrade(), state.upgrade()) else {
                return;
            };
            let mut state = state.borrow_mut();
            if !store.is_dragging() {
                state.reset();
                return;
            }
            store.with_current_drag(|drag| {
                if let Some(drag) = drag {
                    state.on_move(strategy, drag, event);
                }
            });
        })
    }
}

impl<T> GhostLayer<T> {
    pub fn strategy(&self) -> GhostStrategy {
        self.strategy
    }

    /// Drop any proxy state once the drag is over.
    pub fn sync(&self) {
        if !self.store.is_dragging() {
            self.state.borrow_mut().reset();
        }
    }

    /// The proxy to draw, or `None` when not dragging (or, for a clone, before the first move).
    pub fn proxy(&self) -> Option<GhostProxy> {
        self.sync();
        if !self.store.is_dragging() {
            return None;
        }
        let state = self.state.borrow();
        match self.strategy {
            GhostStrategy::CustomTemplate => self.store.with_current_drag(|drag| {
                let drag = drag?;
                let pos = &drag.element_position;
                Some(GhostProxy {
                    strategy: self.strategy,
                    source: drag.element,
                    rect: Rect::from_min_size(pos.client_min() + state.translation, pos.size()),
                    translation: state.translation,
                })
            }),
            GhostStrategy::Clone => state.clone.map(|anchor| GhostProxy {
                strategy: self.strategy,
                source: anchor.source,
                rect: Rect::from_min_size(anchor.min, anchor.size),
                translation: Vec2::ZERO,
            }),
        }
    }
}

impl<T> Drop for GhostLayer<T> {
    fn drop(&mut self) {
        self.store.unregister_move_listener(&self.listener);
    }
}

impl<T> std::fmt::Debug for GhostLayer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GhostLayer")
            .field("strategy", &self.strategy)
            .field("state", &self.state.borrow())
            .finish_non_exhaustive()
    }
}
