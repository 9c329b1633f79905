//! Push-stream primitives.
//!
//! This is the minimal reactive surface the delegation system needs: create
//! a cold stream from a connect function that returns a disposer, deliver
//! values to a sink, and complete a sink exactly once. Everything is
//! single-threaded and synchronous; cancellation is synchronous and
//! idempotent.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The receiving half of one subscription.
pub struct Sink<T> {
    next: Box<dyn Fn(T)>,
    complete: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl<T> Sink<T> {
    /// Build a sink from next/complete callbacks.
    pub fn new(next: impl Fn(T) + 'static, complete: impl FnOnce() + 'static) -> Self {
        Self {
            next: Box::new(next),
            complete: RefCell::new(Some(Box::new(complete))),
        }
    }

    /// Deliver a value.
    pub fn next(&self, value: T) {
        (self.next)(value);
    }

    /// Signal completion. Idempotent: only the first call reaches the
    /// consumer; there is no error channel.
    pub fn complete(&self) {
        let complete = self.complete.borrow_mut().take();
        if let Some(complete) = complete {
            complete();
        }
    }

    /// Whether completion has already been signaled.
    pub fn is_completed(&self) -> bool {
        self.complete.borrow().is_none()
    }
}

impl<T> fmt::Debug for Sink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("completed", &self.is_completed())
            .finish_non_exhaustive()
    }
}

/// Idempotent handle that tears down one subscription.
///
/// Clones share the same teardown action; whichever clone runs first wins
/// and the rest are no-ops.
#[derive(Clone)]
pub struct Disposer {
    action: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl Disposer {
    /// Wrap a teardown action.
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: Rc::new(RefCell::new(Some(Box::new(action)))),
        }
    }

    /// A disposer with nothing to tear down.
    pub fn noop() -> Self {
        Self {
            action: Rc::new(RefCell::new(None)),
        }
    }

    /// Run the teardown action. Later calls have no additional effect.
    pub fn dispose(&self) {
        let action = self.action.borrow_mut().take();
        if let Some(action) = action {
            action();
        }
    }

    /// Whether the teardown action has already run (or never existed).
    pub fn is_disposed(&self) -> bool {
        self.action.borrow().is_none()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// A lazily-started push stream.
///
/// Nothing happens until a consumer attaches; each attach runs the connect
/// function synchronously and owns its own disposer. Streams are cold:
/// independent consumers get independent subscriptions.
pub struct Source<T> {
    connect: Rc<dyn Fn(Sink<T>) -> Disposer>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            connect: Rc::clone(&self.connect),
        }
    }
}

impl<T: 'static> Source<T> {
    /// Build a stream from a connect function.
    pub fn new(connect: impl Fn(Sink<T>) -> Disposer + 'static) -> Self {
        Self {
            connect: Rc::new(connect),
        }
    }

    /// A stream that never emits and never completes.
    pub fn never() -> Self {
        Self::new(|_sink| Disposer::noop())
    }

    /// A stream that completes immediately on attach, emitting nothing.
    pub fn completed() -> Self {
        Self::new(|sink| {
            sink.complete();
            Disposer::noop()
        })
    }

    /// Attach a consumer interested only in values.
    pub fn subscribe(&self, next: impl Fn(T) + 'static) -> Disposer {
        self.subscribe_with(next, || {})
    }

    /// Attach a consumer with value and completion callbacks.
    pub fn subscribe_with(
        &self,
        next: impl Fn(T) + 'static,
        complete: impl FnOnce() + 'static,
    ) -> Disposer {
        (self.connect)(Sink::new(next, complete))
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").finish_non_exhaustive()
    }
}
