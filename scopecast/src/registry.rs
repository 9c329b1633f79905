//! Delegation registry: one native listener per active event kind per scope.
//!
//! Listener attachment is delegated to one point per scope root rather than
//! per element: however many subscribers ask for the same event kind, the
//! registry keeps exactly one dispatch proxy and therefore exactly one
//! native listener binding for it, and the set of attached bindings always
//! equals the set of kinds with at least one live observer. Synchronization
//! is synchronous: the same mutation that changes the proxy set refreshes
//! every mounted node before returning.
//!
//! All state is single-threaded (`Rc<RefCell>`); lifecycle and subscription
//! callbacks may re-enter the registry, so every mutation happens in a
//! short borrow and consumer callbacks run only after it is released.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use scopecast_core::{
    BindingEntry, DelegationError, DispatchFn, Disposer, Event, EventKind, ListenerBindings,
    MountPoint, NodeId, ScopeNode, Selector, Sink, Source,
};

use crate::names;
use crate::proxy::DispatchProxy;

/// Per-kind state: the proxy plus the dispatch entry point handed out to
/// mounted nodes. Handler identity is stable for the proxy's lifetime so
/// the shallow binding comparison recognizes unchanged sets.
struct ProxySlot<N: ScopeNode> {
    proxy: Rc<DispatchProxy<N>>,
    handler: DispatchFn<N>,
}

struct Inner<N: ScopeNode> {
    /// One keyed container for the whole lifecycle; teardown drains it in
    /// place and never re-types it.
    proxies: HashMap<EventKind, ProxySlot<N>>,
    /// Weak so the registry and a mounted wrapper never form a strong
    /// cycle; a wrapper dropped without unmounting is pruned on the next
    /// mutation instead of leaking.
    mounted: Vec<Weak<dyn MountPoint<N>>>,
}

/// Owns the active dispatch proxies and the mounted node set for one scope
/// root.
///
/// Handles are cheap clones sharing the same state; registries are never
/// shared across scope roots. Construct one per wrapped subtree and thread
/// it through the wrapper rather than reaching for ambient singletons.
pub struct DelegationRegistry<N: ScopeNode> {
    inner: Rc<RefCell<Inner<N>>>,
}

impl<N: ScopeNode> Clone for DelegationRegistry<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N: ScopeNode> Default for DelegationRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScopeNode> fmt::Debug for DelegationRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DelegationRegistry")
            .field("active_kinds", &inner.proxies.len())
            .field("mounted", &inner.mounted.len())
            .finish()
    }
}

impl<N: ScopeNode> DelegationRegistry<N> {
    /// Create an empty registry for one scope root.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                proxies: HashMap::new(),
                mounted: Vec::new(),
            })),
        }
    }

    /// Whether two handles refer to the same registry instance.
    pub fn same_registry(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register `target` as live. No-op when already mounted. When proxies
    /// are active, the required binding set is wired onto the node before
    /// this returns, so a freshly mounted node never misses events for
    /// already-subscribed kinds.
    pub fn mount(&self, target: Rc<dyn MountPoint<N>>) {
        let needs_wiring = {
            let mut inner = self.inner.borrow_mut();
            inner.mounted.retain(|slot| slot.strong_count() > 0);
            if inner.mounted.iter().any(|slot| {
                slot.upgrade()
                    .is_some_and(|mounted| mounted.node_id() == target.node_id())
            }) {
                return;
            }
            inner.mounted.push(Rc::downgrade(&target));
            !inner.proxies.is_empty()
        };
        if needs_wiring {
            tracing::debug!(node = %target.node_id(), "node mounted; wiring listener bindings");
            self.refresh_listeners(Some(&[target.node_id()]));
        }
    }

    /// Remove `node` from the live set. Idempotent when the node is not
    /// tracked. Unmounting the last node is full teardown: every active
    /// proxy broadcasts completion to its observers and the proxy map is
    /// emptied.
    pub fn unmount(&self, node: NodeId) {
        let teardown = {
            let mut inner = self.inner.borrow_mut();
            let was_populated = !inner.mounted.is_empty();
            inner.mounted.retain(|slot| {
                slot.upgrade()
                    .is_some_and(|mounted| mounted.node_id() != node)
            });
            if !was_populated || !inner.mounted.is_empty() {
                Vec::new()
            } else {
                // Completion callbacks below may re-enter the registry, so
                // the map is drained before any of them run.
                inner
                    .proxies
                    .drain()
                    .map(|(_, slot)| slot.proxy)
                    .collect::<Vec<_>>()
            }
        };
        if teardown.is_empty() {
            return;
        }
        tracing::debug!(
            proxies = teardown.len(),
            "last node unmounted; completing active subscriptions"
        );
        for proxy in teardown {
            proxy.dispose_all();
        }
    }

    /// Subscribe to events of `kind` whose target matches `selector`
    /// (absent selector matches any target) within this registry's scope.
    ///
    /// The returned stream is cold: each attach lazily creates or reuses
    /// the proxy for `kind`, wiring the native listener onto all live
    /// nodes when the proxy is new. The stream never errors; it completes
    /// only when the scope root becomes fully unmounted. Disposal removes
    /// the observer binding and, when it was the last one for `kind`,
    /// detaches the now-unused native listener — synchronously and
    /// idempotently.
    pub fn subscribe(
        &self,
        selector: Option<Selector>,
        kind: impl Into<EventKind>,
    ) -> Source<Event<N>> {
        let kind = kind.into();
        let weak = Rc::downgrade(&self.inner);
        Source::new(move |sink| {
            let Some(inner) = weak.upgrade() else {
                // The registry is gone; nothing will ever emit.
                sink.complete();
                return Disposer::noop();
            };
            let registry = DelegationRegistry { inner };
            registry.attach(kind.clone(), selector.clone(), sink)
        })
    }

    fn attach(&self, kind: EventKind, selector: Option<Selector>, sink: Sink<Event<N>>) -> Disposer {
        let (proxy, created) = {
            let mut inner = self.inner.borrow_mut();
            match inner.proxies.get(&kind) {
                Some(slot) => (Rc::clone(&slot.proxy), false),
                None => {
                    let proxy = Rc::new(DispatchProxy::new());
                    let handler = self.dispatch_fn(kind.clone());
                    inner.proxies.insert(
                        kind.clone(),
                        ProxySlot {
                            proxy: Rc::clone(&proxy),
                            handler,
                        },
                    );
                    (proxy, true)
                }
            }
        };
        if created {
            tracing::debug!(kind = %kind, "first subscriber; wiring native listener");
            self.refresh_listeners(None);
        }

        let binding = proxy.add(selector, sink);
        let binding_id = binding.id();
        let owner = Rc::clone(&proxy);
        let weak = Rc::downgrade(&self.inner);
        Disposer::new(move || {
            binding.retire();
            if !owner.remove(binding_id) {
                return;
            }
            // Last observer for this kind: drop the proxy and unwire, but
            // only if the registry still owns this same proxy (teardown may
            // already have replaced or cleared it).
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let registry = DelegationRegistry { inner };
            let removed = {
                let mut inner = registry.inner.borrow_mut();
                match inner.proxies.get(&kind) {
                    Some(slot) if Rc::ptr_eq(&slot.proxy, &owner) => {
                        inner.proxies.remove(&kind);
                        true
                    }
                    _ => false,
                }
            };
            if removed {
                tracing::debug!(kind = %kind, "last subscriber gone; unwiring native listener");
                registry.refresh_listeners(None);
            }
        })
    }

    /// The stable dispatch entry point for `kind`: resolve the proxy at
    /// call time (it may be gone by then) and broadcast.
    fn dispatch_fn(&self, kind: EventKind) -> DispatchFn<N> {
        let weak = Rc::downgrade(&self.inner);
        Rc::new(move |event: Event<N>| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let proxy = {
                let inner = inner.borrow();
                inner.proxies.get(&kind).map(|slot| Rc::clone(&slot.proxy))
            };
            if let Some(proxy) = proxy {
                proxy.dispatch(&event);
            }
        })
    }

    /// Recompute the desired binding map from the current proxy set and
    /// push it to each target node (default: every live node). A node whose
    /// attached bindings already have the same shape is left untouched,
    /// avoiding redundant downstream re-render work.
    pub fn refresh_listeners(&self, targets: Option<&[NodeId]>) {
        let (desired, nodes) = {
            let mut inner = self.inner.borrow_mut();
            inner.mounted.retain(|slot| slot.strong_count() > 0);
            let entries: Vec<BindingEntry<N>> = inner
                .proxies
                .iter()
                .map(|(kind, slot)| BindingEntry {
                    prop: names::listener_prop(kind.as_str()).to_owned(),
                    kind: kind.clone(),
                    handler: Rc::clone(&slot.handler),
                })
                .collect();
            let nodes: Vec<Rc<dyn MountPoint<N>>> = inner
                .mounted
                .iter()
                .filter_map(Weak::upgrade)
                .filter(|mounted| targets.is_none_or(|ids| ids.contains(&mounted.node_id())))
                .collect();
            (ListenerBindings::from_entries(entries), nodes)
        };
        for node in nodes {
            if node.attached().same_shape(&desired) {
                continue;
            }
            node.apply(desired.clone());
        }
    }

    /// Event kinds with an active proxy, sorted.
    pub fn active_kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self.inner.borrow().proxies.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Number of live mounted nodes.
    pub fn mounted_count(&self) -> usize {
        self.inner
            .borrow()
            .mounted
            .iter()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }

    /// Whether `node` is currently mounted.
    pub fn is_mounted(&self, node: NodeId) -> bool {
        self.inner.borrow().mounted.iter().any(|slot| {
            slot.upgrade()
                .is_some_and(|mounted| mounted.node_id() == node)
        })
    }
}

/// Subscribe against a subtree that may never have been wrapped for
/// delegation.
///
/// `None` means the caller handed over an unprepared tree: the call does
/// not fail, it yields a stream that never emits and logs a non-fatal
/// diagnostic so the mistake is visible.
pub fn events<N: ScopeNode>(
    registry: Option<&DelegationRegistry<N>>,
    selector: Option<Selector>,
    kind: impl Into<EventKind>,
) -> Source<Event<N>> {
    match registry {
        Some(registry) => registry.subscribe(selector, kind),
        None => {
            tracing::warn!("{}", DelegationError::UnpreparedTree);
            Source::never()
        }
    }
}
