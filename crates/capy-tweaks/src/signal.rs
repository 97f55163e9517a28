//! Handler bookkeeping shared by every signal source.
//!
//! Hosts and fakes keep their connected callbacks in a [`SignalTable`].
//! Emission always works on a snapshot, so a callback may connect or
//! disconnect handlers (including itself) while it runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Opaque handle returned by every `connect*` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

/// Allocates handler ids shared by several tables.
#[derive(Debug, Default)]
pub struct HandlerIds {
    last: Cell<u64>,
}

impl HandlerIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> HandlerId {
        let id = self.last.get() + 1;
        self.last.set(id);
        HandlerId(id)
    }
}

/// Ordered list of `(id, key, callback)` entries.
pub struct SignalTable<K, F: ?Sized> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(HandlerId, K, Rc<F>)>>,
}

impl<K: PartialEq + Clone, F: ?Sized> SignalTable<K, F> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn connect(&self, key: K, handler: Rc<F>) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, key, handler));
        id
    }

    /// Connect under an id allocated elsewhere, for sources that keep several
    /// tables behind a single `disconnect`.
    pub fn insert(&self, id: HandlerId, key: K, handler: Rc<F>) {
        self.handlers.borrow_mut().push((id, key, handler));
    }

    /// Returns false if the id was not connected.
    pub fn disconnect(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Callbacks connected to `key`, in connection order.
    pub fn snapshot(&self, key: &K) -> Vec<Rc<F>> {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, k, _)| k == key)
            .map(|(_, _, handler)| handler.clone())
            .collect()
    }

    pub fn count(&self, key: &K) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, k, _)| k == key)
            .count()
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<K> {
        self.handlers
            .borrow()
            .iter()
            .map(|(_, key, _)| key.clone())
            .collect()
    }
}

impl<K: PartialEq + Clone, F: ?Sized> Default for SignalTable<K, F> {
    fn default() -> Self {
        Self::new()
    }
}
