//! Event kinds and the delegated event payload.

use std::fmt;

use crate::node::ScopeNode;

/// Canonical identifier for a class of native events (`click`, `keydown`, …).
///
/// Kinds are normalized to lowercase on construction so map lookups and the
/// listener-prop translation are insensitive to how the host spells them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKind(String);

impl EventKind {
    /// Create a kind, normalizing to lowercase.
    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(kind.as_ref().to_ascii_lowercase())
    }

    /// The canonical lowercase name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A native event as it travels through the delegation system.
///
/// `target` is the node the event originated at; an absent target never
/// matches any observer. `current_target` is the scope root whose listener
/// binding observed the event; the wrapper fills it in at delivery time and
/// the scope filter walks ancestors against it.
#[derive(Debug, Clone)]
pub struct Event<N: ScopeNode> {
    /// Canonical kind of the event.
    pub kind: EventKind,
    /// The node the event originated at, if the host could resolve one.
    pub target: Option<N>,
    /// The scope root whose binding observed the event.
    pub current_target: Option<N>,
}

impl<N: ScopeNode> Event<N> {
    /// Build an event as the host would hand it over, with no observing
    /// scope root recorded yet.
    pub fn new(kind: impl Into<EventKind>, target: Option<N>) -> Self {
        Self {
            kind: kind.into(),
            target,
            current_target: None,
        }
    }

    /// Record the scope root whose listener binding observed this event.
    pub fn observed_at(mut self, root: N) -> Self {
        self.current_target = Some(root);
        self
    }
}
