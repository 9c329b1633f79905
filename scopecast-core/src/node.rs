//! Tree-node seams the host rendering layer implements.
//!
//! The delegation system never owns the display tree. It sees nodes through
//! two traits: [`ScopeNode`], the read view used at dispatch time (parent
//! walk, boundary marker, selector matching), and [`MountPoint`], the
//! mounted node a registry pushes listener bindings onto.

use std::fmt;
use std::rc::Rc;

use crate::event::{Event, EventKind};
use crate::selector::Selector;

/// Stable identity for a tree node within one document.
///
/// Two handles to the same live node must report the same id; the registry
/// keys its mounted-node set on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read view of one node in the host's live display tree.
///
/// Handles are cheap clones (typically `Rc`-backed) referring to the same
/// underlying node.
pub trait ScopeNode: Clone + fmt::Debug + 'static {
    /// Stable identity of the underlying node.
    fn id(&self) -> NodeId;

    /// Parent link; `None` at the tree root or for a detached node.
    fn parent(&self) -> Option<Self>;

    /// Whether this node carries a scope boundary marker.
    fn is_boundary(&self) -> bool;

    /// Render the scope boundary marker onto this node.
    fn mark_boundary(&self);

    /// Remove the scope boundary marker. The marker is part of the
    /// wrapper's rendered output, so it must not outlive an unmount.
    fn clear_boundary(&self);

    /// Whether this node itself satisfies `selector` (target-only; no
    /// ancestor semantics).
    fn matches(&self, selector: &Selector) -> bool;
}

/// Dispatch entry point a registry hands out to mounted nodes.
///
/// Identity is meaningful: the registry keeps one handler per active event
/// kind alive for the proxy's lifetime so the shallow binding comparison
/// can recognize unchanged sets.
pub type DispatchFn<N> = Rc<dyn Fn(Event<N>)>;

/// One listener-prop entry in a binding set.
#[derive(Clone)]
pub struct BindingEntry<N: ScopeNode> {
    /// Host-framework listener-prop key (`onClick`).
    pub prop: String,
    /// Canonical event kind the entry dispatches (`click`).
    pub kind: EventKind,
    /// Dispatch entry point into the owning registry.
    pub handler: DispatchFn<N>,
}

impl<N: ScopeNode> fmt::Debug for BindingEntry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingEntry")
            .field("prop", &self.prop)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The EventKind → native-listener map a registry currently requires
/// attached to live nodes. Kept sorted by prop key so comparisons are
/// order-insensitive.
#[derive(Clone)]
pub struct ListenerBindings<N: ScopeNode> {
    entries: Vec<BindingEntry<N>>,
}

impl<N: ScopeNode> ListenerBindings<N> {
    /// The empty binding set.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a binding set, sorting entries by prop key.
    pub fn from_entries(mut entries: Vec<BindingEntry<N>>) -> Self {
        entries.sort_by(|a, b| a.prop.cmp(&b.prop));
        Self { entries }
    }

    /// Whether no listener is required.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of required listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The entries, sorted by prop key.
    pub fn entries(&self) -> &[BindingEntry<N>] {
        &self.entries
    }

    /// Listener-prop keys, sorted.
    pub fn props(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.prop.as_str())
    }

    /// The dispatch handler bound for `kind`, if any.
    pub fn handler_for(&self, kind: &EventKind) -> Option<DispatchFn<N>> {
        self.entries
            .iter()
            .find(|entry| entry.kind == *kind)
            .map(|entry| Rc::clone(&entry.handler))
    }

    /// Shallow comparison: same prop keys bound to the identical handlers.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.prop == b.prop && Rc::ptr_eq(&a.handler, &b.handler))
    }
}

impl<N: ScopeNode> Default for ListenerBindings<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N: ScopeNode> fmt::Debug for ListenerBindings<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.props()).finish()
    }
}

/// A mounted tree node a registry keeps synchronized.
///
/// Implemented by the scope wrapper node; `apply` replaces the attached
/// bindings and is only invoked when the set actually changed shape.
pub trait MountPoint<N: ScopeNode> {
    /// Identity of the rendered scope root.
    fn node_id(&self) -> NodeId;

    /// The scope-root node this mount point renders.
    fn scope_root(&self) -> N;

    /// Bindings currently attached to the rendered root.
    fn attached(&self) -> ListenerBindings<N>;

    /// Replace the attached bindings; the host re-renders as a result.
    fn apply(&self, bindings: ListenerBindings<N>);
}
