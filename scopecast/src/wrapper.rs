//! Scope wrapper node: the structural node injected around any subtree
//! handed to the delegation system.
//!
//! The wrapper is the bridge between the host's component lifecycle and the
//! registry. On mount it marks its rendered root as a scope boundary and
//! registers as a mount point; the registry then keeps the root's listener
//! bindings synchronized with the active proxy set. Re-rendering with an
//! unchanged binding set never touches the underlying native listeners —
//! the registry's shallow comparison skips the node.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use scopecast_core::{Event, ListenerBindings, MountPoint, NodeId, ScopeNode};

use crate::registry::DelegationRegistry;

/// Wrapper lifecycle. Re-parenting to another registry is modeled as
/// unmount-then-mount against the two registries in sequence, never a
/// third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unmounted,
    Mounted,
}

/// Content handed to [`prepare`]: either a raw subtree root or a subtree
/// that was already wrapped.
///
/// The explicit tag replaces any duck-typed "is this already wrapped?"
/// probing: wrapped-ness is decided once, here.
pub enum Content<N: ScopeNode> {
    /// A raw subtree root that still needs a wrapper.
    Raw(N),
    /// An already-wrapped subtree; handed back unchanged.
    Wrapped(Rc<ScopeWrapper<N>>),
}

/// Wrap `content` exactly once: raw subtrees get a fresh wrapper under
/// `registry`, an already-wrapped subtree is returned as-is.
pub fn prepare<N: ScopeNode>(
    registry: &DelegationRegistry<N>,
    content: Content<N>,
) -> Rc<ScopeWrapper<N>> {
    match content {
        Content::Raw(root) => ScopeWrapper::new(registry.clone(), root),
        Content::Wrapped(wrapper) => wrapper,
    }
}

/// Structural wrapper inserted once per delegated subtree.
pub struct ScopeWrapper<N: ScopeNode> {
    weak_self: Weak<Self>,
    root: N,
    registry: RefCell<DelegationRegistry<N>>,
    attached: RefCell<ListenerBindings<N>>,
    state: Cell<Lifecycle>,
}

impl<N: ScopeNode> ScopeWrapper<N> {
    /// Wrap `root` for delegation under `registry`. Use [`prepare`] when
    /// the subtree may already be wrapped.
    pub fn new(registry: DelegationRegistry<N>, root: N) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            root,
            registry: RefCell::new(registry),
            attached: RefCell::new(ListenerBindings::empty()),
            state: Cell::new(Lifecycle::Unmounted),
        })
    }

    /// The wrapped scope-root node.
    pub fn root(&self) -> &N {
        &self.root
    }

    /// Whether the wrapper is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.state.get() == Lifecycle::Mounted
    }

    /// Mount notification from the host. Idempotent. Renders the boundary
    /// marker on the root and registers with the registry; bindings for
    /// already-subscribed kinds are wired onto this node before returning.
    pub fn mount(&self) {
        if self.state.get() == Lifecycle::Mounted {
            return;
        }
        let Some(this) = self.weak_self.upgrade() else {
            return;
        };
        self.state.set(Lifecycle::Mounted);
        self.root.mark_boundary();
        let registry = self.registry.borrow().clone();
        registry.mount(this);
    }

    /// Unmount notification from the host. Idempotent. The boundary marker
    /// comes off with the rest of this wrapper's output, so an enclosing
    /// scope sees straight through the former subtree afterwards.
    pub fn unmount(&self) {
        if self.state.get() == Lifecycle::Unmounted {
            return;
        }
        self.state.set(Lifecycle::Unmounted);
        let registry = self.registry.borrow().clone();
        registry.unmount(self.root.id());
        self.root.clear_boundary();
        self.attached.replace(ListenerBindings::empty());
    }

    /// A re-render handed this wrapper a different registry instance:
    /// unmount from the old one, mount into the new one. No-op when the
    /// identity is unchanged.
    pub fn swap_registry(&self, next: DelegationRegistry<N>) {
        if self.registry.borrow().same_registry(&next) {
            return;
        }
        let was_mounted = self.is_mounted();
        if was_mounted {
            self.unmount();
        }
        self.registry.replace(next);
        if was_mounted {
            self.mount();
        }
    }

    /// Host-side delivery: route a native event observed at this wrapper's
    /// root into the attached binding for its kind. Delegate, then filter —
    /// selector and scope checks happen downstream in the proxy.
    pub fn deliver(&self, event: Event<N>) {
        let handler = self.attached.borrow().handler_for(&event.kind);
        if let Some(handler) = handler {
            handler(event.observed_at(self.root.clone()));
        }
    }
}

impl<N: ScopeNode> MountPoint<N> for ScopeWrapper<N> {
    fn node_id(&self) -> NodeId {
        self.root.id()
    }

    fn scope_root(&self) -> N {
        self.root.clone()
    }

    fn attached(&self) -> ListenerBindings<N> {
        self.attached.borrow().clone()
    }

    fn apply(&self, bindings: ListenerBindings<N>) {
        self.attached.replace(bindings);
    }
}
