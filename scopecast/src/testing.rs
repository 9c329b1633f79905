//! Test doubles for exercising delegation without a real rendering layer.
//!
//! - [`TestNode`]: an in-memory display-tree node with parent links, tag /
//!   id / class data, and a boundary flag.
//! - [`RecordingSink`]: collects delivered events and completion signals.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use scopecast_core::{Disposer, Event, NodeId, ScopeNode, Selector, Source};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

struct NodeInner {
    id: NodeId,
    tag: String,
    element_id: RefCell<Option<String>>,
    classes: RefCell<Vec<String>>,
    boundary: Cell<bool>,
    parent: RefCell<Weak<NodeInner>>,
}

/// An in-memory display-tree node.
///
/// Handles are cheap clones of the same underlying node; parents hold no
/// strong references to children, so tests own their nodes directly.
#[derive(Clone)]
pub struct TestNode {
    inner: Rc<NodeInner>,
}

impl TestNode {
    /// Create a detached node with the given tag.
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                id: NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)),
                tag: tag.to_ascii_lowercase(),
                element_id: RefCell::new(None),
                classes: RefCell::new(Vec::new()),
                boundary: Cell::new(false),
                parent: RefCell::new(Weak::new()),
            }),
        }
    }

    /// Add a class name.
    pub fn with_class(self, class: &str) -> Self {
        self.inner.classes.borrow_mut().push(class.to_owned());
        self
    }

    /// Set the element id.
    pub fn with_element_id(self, id: &str) -> Self {
        self.inner.element_id.replace(Some(id.to_owned()));
        self
    }

    /// Attach `child` under this node.
    pub fn append_child(&self, child: &Self) {
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
    }
}

impl fmt::Debug for TestNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.inner.tag, self.inner.id)
    }
}

impl ScopeNode for TestNode {
    fn id(&self) -> NodeId {
        self.inner.id
    }

    fn parent(&self) -> Option<Self> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Self { inner })
    }

    fn is_boundary(&self) -> bool {
        self.inner.boundary.get()
    }

    fn mark_boundary(&self) {
        self.inner.boundary.set(true);
    }

    fn clear_boundary(&self) {
        self.inner.boundary.set(false);
    }

    fn matches(&self, selector: &Selector) -> bool {
        if let Some(tag) = selector.tag() {
            if self.inner.tag != tag {
                return false;
            }
        }
        if let Some(id) = selector.id() {
            if self.inner.element_id.borrow().as_deref() != Some(id) {
                return false;
            }
        }
        let classes = self.inner.classes.borrow();
        selector
            .classes()
            .iter()
            .all(|wanted| classes.iter().any(|have| have == wanted))
    }
}

/// Collects events and completion signals delivered to subscriptions.
pub struct RecordingSink<N: ScopeNode> {
    events: Rc<RefCell<Vec<Event<N>>>>,
    completions: Rc<Cell<usize>>,
}

impl<N: ScopeNode> RecordingSink<N> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            completions: Rc::new(Cell::new(0)),
        }
    }

    /// Attach to `source`; recording continues until disposal.
    pub fn attach(&self, source: &Source<Event<N>>) -> Disposer {
        let events = Rc::clone(&self.events);
        let completions = Rc::clone(&self.completions);
        source.subscribe_with(
            move |event| events.borrow_mut().push(event),
            move || completions.set(completions.get() + 1),
        )
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<Event<N>> {
        self.events.borrow().clone()
    }

    /// Number of recorded events.
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Number of completion signals observed.
    pub fn completions(&self) -> usize {
        self.completions.get()
    }
}

impl<N: ScopeNode> Default for RecordingSink<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScopeNode> Clone for RecordingSink<N> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
            completions: Rc::clone(&self.completions),
        }
    }
}

impl<N: ScopeNode> fmt::Debug for RecordingSink<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSink")
            .field("events", &self.count())
            .field("completions", &self.completions())
            .finish()
    }
}
