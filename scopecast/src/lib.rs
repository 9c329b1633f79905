//! # scopecast — delegated-event subscription registry
//!
//! scopecast sits between a continuously re-rendered element tree and a
//! push-stream interface. Consumers ask for "all events of kind K matching
//! selector S within scope Z" and receive a stream of matching events; the
//! registry guarantees exactly one underlying native listener per active
//! event kind per scope, re-wires listeners as the tree mounts, unmounts,
//! and re-renders, and scopes delivery so nested independently-managed
//! subtrees neither leak events to nor receive events meant for their
//! ancestors.
//!
//! ## Components
//!
//! - [`names`] — static bidirectional table between canonical event kinds
//!   and host listener-prop names.
//! - [`belongs_to_scope`] — the scope boundary resolver: a pure ancestor
//!   walk that stops at boundary markers.
//! - [`DelegationRegistry`] — owns the per-kind multicast proxies and the
//!   mounted node set for one scope root.
//! - [`ScopeWrapper`] — the structural node injected around a delegated
//!   subtree; its lifecycle hooks drive the registry.
//! - [`testing`] — in-memory tree and recording doubles for tests.
//!
//! ## Control flow
//!
//! A consumer subscribes through the registry → the registry lazily creates
//! or reuses the proxy for that kind → the listener-binding set is pushed
//! to every mounted wrapper → the host later delivers a real event to a
//! wrapper's binding → the binding dispatches into the proxy → the proxy
//! filters via selector match and the boundary resolver → matching
//! observers receive the event on their streams.
//!
//! ```rust
//! use scopecast::testing::{RecordingSink, TestNode};
//! use scopecast::{DelegationRegistry, Event, ScopeWrapper, Selector};
//!
//! let registry = DelegationRegistry::new();
//! let root = TestNode::new("div");
//! let wrapper = ScopeWrapper::new(registry.clone(), root.clone());
//! wrapper.mount();
//!
//! let button = TestNode::new("button").with_class("btn");
//! root.append_child(&button);
//!
//! let clicks = registry.subscribe(Some(Selector::parse(".btn").unwrap()), "click");
//! let sink = RecordingSink::new();
//! let subscription = sink.attach(&clicks);
//!
//! wrapper.deliver(Event::new("click", Some(button)));
//! assert_eq!(sink.count(), 1);
//! subscription.dispose();
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod proxy;

pub mod names;
pub mod registry;
pub mod scope;
pub mod testing;
pub mod wrapper;

pub use registry::{DelegationRegistry, events};
pub use scope::belongs_to_scope;
pub use wrapper::{Content, ScopeWrapper, prepare};

// Core contracts, re-exported for convenience.
pub use scopecast_core::{
    BindingEntry, DelegationError, DispatchFn, Disposer, Event, EventKind, ListenerBindings,
    MountPoint, NodeId, ScopeNode, Selector, SelectorError, Sink, Source,
};
