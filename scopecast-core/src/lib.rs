//! # scopecast-core
//!
//! Core contracts for the scopecast delegated-event subscription registry.
//!
//! This crate has minimal dependencies and is what a host rendering layer
//! implements to plug its display tree into the delegation system:
//!
//! - [`ScopeNode`] — the read view of one live tree node (identity, parent
//!   link, boundary marker, selector matching).
//! - [`MountPoint`] — a mounted node a registry keeps listener bindings
//!   synchronized on.
//! - [`Event`] / [`EventKind`] — the delegated event payload.
//! - [`Selector`] — target-only matcher predicates.
//! - [`Source`] / [`Sink`] / [`Disposer`] — the push-stream primitives the
//!   registry builds subscription streams from.
//!
//! The registry, proxy, resolver, and wrapper node live in the `scopecast`
//! crate.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod node;
mod selector;
mod stream;

pub use error::{DelegationError, SelectorError};
pub use event::{Event, EventKind};
pub use node::{BindingEntry, DispatchFn, ListenerBindings, MountPoint, NodeId, ScopeNode};
pub use selector::Selector;
pub use stream::{Disposer, Sink, Source};
