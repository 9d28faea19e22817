use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use super::types::{DndInfo, PointerEvent};

/// A subscriber to broadcast pointer moves.
///
/// Listeners are compared by `Rc` identity when unregistering.
pub type MoveListener = Rc<dyn Fn(&PointerEvent)>;

struct StoreInner<T> {
    is_dragging: Cell<bool>,
    current_drag: RefCell<Option<DndInfo<T>>>,
    move_listeners: RefCell<Vec<MoveListener>>,
}

/// Shared drag state of one mounted [`super::DndLayout`].
///
/// Cloning gives another handle to the same state. Invariant: `is_dragging()` implies
/// `current_drag().is_some()`.
pub struct SessionStore<T> {
    inner: Rc<StoreInner<T>>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for SessionStore<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                is_dragging: Cell::new(false),
                current_drag: RefCell::new(None),
                move_listeners: RefCell::new(Vec::new()),
            }),
        }
    }
}

impl<T> std::fmt::Debug for SessionStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("is_dragging", &self.is_dragging())
            .field("has_current_drag", &self.inner.current_drag.borrow().is_some())
            .field("move_listeners", &self.move_listener_count())
            .finish()
    }
}

impl<T> SessionStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging.get()
    }

    pub fn current_drag(&self) -> Option<DndInfo<T>> {
        self.inner.current_drag.borrow().clone()
    }

    pub fn with_current_drag<R>(&self, f: impl FnOnce(Option<&DndInfo<T>>) -> R) -> R {
        f(self.inner.current_drag.borrow().as_ref())
    }

    /// Record the pressed node. Does not start dragging.
    pub fn start_drag(&self, info: DndInfo<T>) {
        *self.inner.current_drag.borrow_mut() = Some(info);
    }

    /// Returns `false` (and changes nothing) when asked to drag without a current drag.
    pub fn set_is_dragging(&self, is_dragging: bool) -> bool {
        if is_dragging && self.inner.current_drag.borrow().is_none() {
            log::warn!("set_is_dragging(true) ignored: no current drag");
            return false;
        }
        self.inner.is_dragging.set(is_dragging);
        true
    }

    /// Clear the drag flag and the current drag together.
    pub fn reset(&self) {
        self.inner.is_dragging.set(false);
        *self.inner.current_drag.borrow_mut() = None;
    }

    /// Appends `listener`; registering the same `Rc` twice makes it run twice.
    pub fn register_move_listener(&self, listener: MoveListener) {
        self.inner.move_listeners.borrow_mut().push(listener);
    }

    /// Removes every registration of `listener`.
    pub fn unregister_move_listener(&self, listener: &MoveListener) {
        self.inner
            .move_listeners
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, listener));
    }

    pub fn move_listener_count(&self) -> usize {
        self.inner.move_listeners.borrow().len()
    }

    /// Run every listener, in registration order, with `event`.
    ///
    /// Iterates over a snapshot: listeners (un)registered during the broadcast only see the
    /// next one. A panicking listener is logged and skipped.
    pub fn broadcast_move(&self, event: &PointerEvent) {
        let snapshot: Vec<MoveListener> = self.inner.move_listeners.borrow().clone();
        for (index, listener) in snapshot.iter().enumerate() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(event))) {
                log::error!(
                    "move listener #{index} panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    pub(super) fn downgrade(&self) -> WeakSessionStore<T> {
        WeakSessionStore {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle, held by listeners so they don't keep the store alive.
pub(super) struct WeakSessionStore<T> {
    inner: Weak<StoreInner<T>>,
}

impl<T> WeakSessionStore<T> {
    pub(super) fn upgrade(&self) -> Option<SessionStore<T>> {
        self.inner.upgrade().map(|inner| SessionStore { inner })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use egui::Pos2;

    use super::*;
    use crate::dnd_layout::types::{DndInfo, PointerEventKind};

    fn move_event() -> PointerEvent {
        PointerEvent::new(PointerEventKind::Move, None, Pos2::new(1.0, 2.0), 0.0)
    }

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> MoveListener {
        let log = Rc::clone(log);
        Rc::new(move |_e: &PointerEvent| log.borrow_mut().push(name))
    }

    #[test]
    fn broadcast_runs_listeners_in_registration_order() {
        let store = SessionStore::<()>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        let c = recorder(&log, "c");
        store.register_move_listener(Rc::clone(&a));
        store.register_move_listener(Rc::clone(&b));
        store.register_move_listener(Rc::clone(&c));

        store.broadcast_move(&move_event());
        assert_eq!(*log.borrow(), ["a", "b", "c"]);

        store.unregister_move_listener(&b);
        log.borrow_mut().clear();
        store.broadcast_move(&move_event());
        store.broadcast_move(&move_event());
        assert_eq!(*log.borrow(), ["a", "c", "a", "c"]);
    }

    #[test]
    fn duplicate_registration_runs_twice_and_unregisters_together() {
        let store = SessionStore::<()>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&log, "a");
        store.register_move_listener(Rc::clone(&a));
        store.register_move_listener(Rc::clone(&a));

        store.broadcast_move(&move_event());
        assert_eq!(log.borrow().len(), 2);

        store.unregister_move_listener(&a);
        assert_eq!(store.move_listener_count(), 0);
    }

    fn failing_listener(_e: &PointerEvent) {
        panic!("listener failure");
    }

    #[test]
    fn panicking_listener_does_not_stop_the_broadcast() {
        let store = SessionStore::<()>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        store.register_move_listener(recorder(&log, "first"));
        store.register_move_listener(Rc::new(failing_listener));
        store.register_move_listener(recorder(&log, "last"));

        store.broadcast_move(&move_event());
        assert_eq!(*log.borrow(), ["first", "last"]);
    }

    #[test]
    fn registration_during_broadcast_applies_to_next_broadcast() {
        let store = SessionStore::<()>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let late = recorder(&log, "late");

        let weak = store.downgrade();
        let late_for_listener = Rc::clone(&late);
        let log_for_listener = Rc::clone(&log);
        store.register_move_listener(Rc::new(move |_e: &PointerEvent| {
            log_for_listener.borrow_mut().push("registrar");
            if let Some(store) = weak.upgrade() {
                store.register_move_listener(Rc::clone(&late_for_listener));
            }
        }));

        store.broadcast_move(&move_event());
        assert_eq!(*log.borrow(), ["registrar"]);

        log.borrow_mut().clear();
        store.broadcast_move(&move_event());
        assert_eq!(*log.borrow(), ["registrar", "late"]);
    }

    #[test]
    fn dragging_requires_a_current_drag() {
        let store = SessionStore::<()>::new();
        assert!(!store.set_is_dragging(true));
        assert!(!store.is_dragging());

        store.start_drag(DndInfo::empty());
        assert!(!store.is_dragging(), "pressing alone is not dragging");
        assert!(store.set_is_dragging(true));
        assert!(store.is_dragging());

        store.reset();
        assert!(!store.is_dragging());
        assert!(store.current_drag().is_none());
    }
}
