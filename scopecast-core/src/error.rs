//! Error types for scopecast.
//!
//! No error here is used for control flow: registry operations are
//! infallible by contract, and absence/mismatch conditions are represented
//! as empty results. These types exist as the vocabulary for the two places
//! a caller can hand the system something malformed: selector text and
//! unprepared subtrees.

use thiserror::Error;

/// Errors from parsing selector text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector was empty or all whitespace.
    #[error("empty selector")]
    Empty,

    /// The selector contained an empty or malformed segment.
    #[error("malformed selector `{0}`")]
    Invalid(String),
}

/// Non-fatal faults surfaced as diagnostics rather than failures.
///
/// The subscription stream itself never errors; when one of these occurs
/// the caller receives an inert stream and the fault is logged.
#[derive(Error, Debug)]
pub enum DelegationError {
    /// A subscription was requested against a subtree that was never
    /// wrapped for delegation. The resulting stream never emits.
    #[error("subtree is not prepared for event delegation; yielding an inert stream")]
    UnpreparedTree,

    /// A selector failed to parse.
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),
}
