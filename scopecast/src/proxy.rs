//! Multicast dispatch proxy: the fan-out unit for exactly one event kind.
//!
//! A proxy holds the ordered set of observer bindings interested in its
//! kind and broadcasts each incoming event to a stable snapshot of that
//! set. Sinks run arbitrary consumer code and may synchronously dispose
//! subscriptions on the same proxy mid-broadcast, so the live set is never
//! iterated directly: additions during a broadcast are not visited, and
//! retired bindings are skipped even when the snapshot still holds them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use scopecast_core::{Event, ScopeNode, Selector, Sink};

use crate::scope::belongs_to_scope;

/// Identity of one observer binding within its proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BindingId(u64);

/// One subscriber's selector + sink, owned by exactly one proxy.
pub(crate) struct ObserverBinding<N: ScopeNode> {
    id: BindingId,
    selector: Option<Selector>,
    sink: Sink<Event<N>>,
    retired: Cell<bool>,
}

impl<N: ScopeNode> ObserverBinding<N> {
    pub(crate) fn id(&self) -> BindingId {
        self.id
    }

    /// Mark the binding dead. Returns whether this call was the first.
    pub(crate) fn retire(&self) -> bool {
        !self.retired.replace(true)
    }

    /// Retire and signal completion, once.
    pub(crate) fn finish(&self) {
        if self.retire() {
            self.sink.complete();
        }
    }

    /// Deliver `event` if the binding is live and the event passes the
    /// selector and scope filters.
    pub(crate) fn deliver(&self, event: &Event<N>) {
        if self.retired.get() || !self.accepts(event) {
            return;
        }
        self.sink.next(event.clone());
    }

    fn accepts(&self, event: &Event<N>) -> bool {
        // Missing target or observing root is a non-match, never a fault.
        let Some(target) = &event.target else {
            return false;
        };
        if let Some(selector) = &self.selector {
            if !target.matches(selector) {
                return false;
            }
        }
        let Some(root) = &event.current_target else {
            return false;
        };
        belongs_to_scope(target, root)
    }
}

/// Fan-out unit for one event kind within one scope.
pub(crate) struct DispatchProxy<N: ScopeNode> {
    observers: RefCell<Vec<Rc<ObserverBinding<N>>>>,
    next_id: Cell<u64>,
}

impl<N: ScopeNode> DispatchProxy<N> {
    pub(crate) fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Append an observer binding.
    pub(crate) fn add(
        &self,
        selector: Option<Selector>,
        sink: Sink<Event<N>>,
    ) -> Rc<ObserverBinding<N>> {
        let id = BindingId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let binding = Rc::new(ObserverBinding {
            id,
            selector,
            sink,
            retired: Cell::new(false),
        });
        self.observers.borrow_mut().push(Rc::clone(&binding));
        binding
    }

    /// Remove a binding; returns whether the observer set is now empty.
    pub(crate) fn remove(&self, id: BindingId) -> bool {
        let mut observers = self.observers.borrow_mut();
        observers.retain(|binding| binding.id != id);
        observers.is_empty()
    }

    /// Broadcast `event` to a stable snapshot of the current observer set.
    pub(crate) fn dispatch(&self, event: &Event<N>) {
        let snapshot: Vec<Rc<ObserverBinding<N>>> = self.observers.borrow().clone();
        for binding in snapshot {
            binding.deliver(event);
        }
    }

    /// Broadcast completion to every observer, then clear the set.
    pub(crate) fn dispose_all(&self) {
        let drained: Vec<Rc<ObserverBinding<N>>> =
            self.observers.borrow_mut().drain(..).collect();
        for binding in drained {
            binding.finish();
        }
    }
}
