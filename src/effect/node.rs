//! Type-erased effect tree.
//!
//! `Effect<R, E, A>` is a typed handle around an `Arc<Node<R>>`. Success and
//! error values travel through the tree as [`Value`]s; the phantom types on
//! the handle guarantee that every downcast in [`unerase`] targets the type
//! that was erased into it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// An erased success or error value.
pub(crate) type Value = Box<dyn Any + Send>;

/// Terminal result of evaluating a node: `Ok` success, `Err` failure.
pub(crate) type Outcome = Result<Value, Value>;

/// Produces a fresh copy of a stored value on every evaluation.
pub(crate) type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// Deferred host computation.
pub(crate) type Thunk = Arc<dyn Fn() -> Outcome + Send + Sync>;

/// Environment-dependent step.
pub(crate) type Access<R> = Arc<dyn Fn(&R) -> Arc<Node<R>> + Send + Sync>;

/// Value in, next effect out.
pub(crate) type Continuation<R> = Arc<dyn Fn(Value) -> Arc<Node<R>> + Send + Sync>;

/// Value in, value out. Used for channel-preserving rewrites.
pub(crate) type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Value in, terminal outcome out.
pub(crate) type Resume = Arc<dyn Fn(Value) -> Outcome + Send + Sync>;

/// One side of a [`Node::Fold`].
pub(crate) enum Handler<R: 'static> {
    /// Finish the branch directly with an outcome.
    Resume(Resume),
    /// Continue with another effect.
    Continue(Continuation<R>),
}

impl<R: 'static> Clone for Handler<R> {
    fn clone(&self) -> Self {
        match self {
            Handler::Resume(f) => Handler::Resume(Arc::clone(f)),
            Handler::Continue(f) => Handler::Continue(Arc::clone(f)),
        }
    }
}

impl<R: 'static> Handler<R> {
    /// Branch that passes its input through unchanged as a success.
    pub(crate) fn succeed() -> Self {
        Handler::Resume(Arc::new(|value: Value| -> Outcome { Ok(value) }))
    }
}

pub(crate) enum Node<R: 'static> {
    Pure(Producer),
    Failure(Producer),
    Suspend {
        thunk: Thunk,
        may_fail: bool,
    },
    Access(Access<R>),
    FlatMap {
        source: Link<R>,
        cont: Continuation<R>,
    },
    Map {
        source: Link<R>,
        f: Transform,
    },
    MapError {
        source: Link<R>,
        f: Transform,
    },
    Fold {
        source: Link<R>,
        on_error: Handler<R>,
        on_success: Handler<R>,
    },
    #[cfg(feature = "tracing")]
    Instrument {
        source: Link<R>,
        span: tracing::Span,
    },
}

impl<R: 'static> Node<R> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Node::Pure(_) => "Pure",
            Node::Failure(_) => "Failure",
            Node::Suspend { .. } => "Suspend",
            Node::Access(_) => "Access",
            Node::FlatMap { .. } => "FlatMap",
            Node::Map { .. } => "Map",
            Node::MapError { .. } => "MapError",
            Node::Fold { .. } => "Fold",
            #[cfg(feature = "tracing")]
            Node::Instrument { .. } => "Instrument",
        }
    }
}

/// Owning edge to a node: an effect's root, or a composite node's source.
///
/// Every reference to a node that can own a subtree goes through a link,
/// including effects captured inside continuations and handlers. Releasing
/// the last reference never recurses into the subtree: while one release is
/// in progress on a thread, nested releases are queued and the outermost one
/// drains the queue in a loop.
pub(crate) struct Link<R: 'static>(Option<Arc<Node<R>>>);

impl<R: 'static> Link<R> {
    pub(crate) fn new(node: Arc<Node<R>>) -> Self {
        Link(Some(node))
    }

    pub(crate) fn node(&self) -> &Arc<Node<R>> {
        match &self.0 {
            Some(node) => node,
            None => unreachable!("effect links are only emptied while dropping"),
        }
    }

    pub(crate) fn into_inner(mut self) -> Arc<Node<R>> {
        match self.0.take() {
            Some(node) => node,
            None => unreachable!("effect links are only emptied while dropping"),
        }
    }
}

impl<R: 'static> Drop for Link<R> {
    fn drop(&mut self) {
        if let Some(node) = self.0.take() {
            release(node);
        }
    }
}

thread_local! {
    static RELEASING: Cell<bool> = const { Cell::new(false) };
    static PENDING: RefCell<Vec<Box<dyn Any>>> = const { RefCell::new(Vec::new()) };
}

fn release<R: 'static>(node: Arc<Node<R>>) {
    match RELEASING.try_with(|releasing| releasing.replace(true)) {
        Ok(true) => {
            let node: Box<dyn Any> = Box::new(node);
            // Without thread-local storage the node is dropped in place.
            let _ = PENDING.try_with(move |pending| pending.borrow_mut().push(node));
        }
        Ok(false) => {
            let _guard = ReleaseGuard;
            drop(node);
            while let Some(next) = next_pending() {
                drop(next);
            }
        }
        Err(_) => drop(node),
    }
}

fn next_pending() -> Option<Box<dyn Any>> {
    PENDING
        .try_with(|pending| pending.borrow_mut().pop())
        .ok()
        .flatten()
}

/// Clears the releasing flag, also when a drop panics mid-drain.
struct ReleaseGuard;

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        let _ = RELEASING.try_with(|releasing| releasing.set(false));
    }
}

pub(crate) fn erase<T: Send + 'static>(value: T) -> Value {
    Box::new(value)
}

pub(crate) fn unerase<T: 'static>(value: Value) -> T {
    match value.downcast::<T>() {
        Ok(value) => *value,
        Err(_) => unreachable!(
            "effect tree produced a value that is not a {}",
            std::any::type_name::<T>()
        ),
    }
}
