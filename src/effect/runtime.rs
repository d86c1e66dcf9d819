//! The evaluator behind [`Effect::provide`].
//!
//! Interpretation is a single loop. Composite nodes push a frame describing
//! what to do with their source's outcome and descend into the source; leaf
//! nodes produce an outcome, which is then fed to frames popped off the stack
//! until one of them yields another node to evaluate. Stack depth is bounded
//! by the heap-allocated frame vector, never by the native call stack.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::effect::node::{erase, unerase, Continuation, Handler, Node, Outcome, Thunk, Transform};
use crate::effect::Effect;
use crate::fault::Fault;
use crate::marker::Nothing;

enum Frame<R: 'static> {
    FlatMap(Continuation<R>),
    Map(Transform),
    MapError(Transform),
    Fold {
        on_error: Handler<R>,
        on_success: Handler<R>,
    },
    #[cfg(feature = "tracing")]
    Span(tracing::span::EnteredSpan),
}

enum Step<R: 'static> {
    Descend(Arc<Node<R>>),
    Finish(Outcome),
}

/// Pending frames, innermost last.
///
/// Frames are discarded newest-first even when a panic unwinds out of the
/// evaluator, so entered spans exit in reverse order of entry.
struct Frames<R: 'static>(Vec<Frame<R>>);

impl<R: 'static> Frames<R> {
    fn push(&mut self, frame: Frame<R>) {
        self.0.push(frame);
    }

    fn pop(&mut self) -> Option<Frame<R>> {
        self.0.pop()
    }
}

impl<R: 'static> Drop for Frames<R> {
    fn drop(&mut self) {
        while let Some(frame) = self.0.pop() {
            drop(frame);
        }
    }
}

impl<R, E, A> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Send + 'static,
{
    /// Supply the environment and run the effect to completion.
    ///
    /// Returns `Ok` with the success value or `Err` with the error value.
    /// The effect itself is untouched and can be provided again; each call
    /// re-runs every thunk and environment lookup in it.
    ///
    /// # Panics
    ///
    /// A panic raised by an [`Effect::exec`] thunk, or by any function passed
    /// to a combinator, unwinds out of `provide`. Only [`Effect::from`]
    /// thunks have their panics captured.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// struct Env {
    ///     base: i32,
    /// }
    ///
    /// let effect = Effect::<Env, String, _>::access(|env: &Env| env.base).map(|x| x + 1);
    /// assert_eq!(effect.provide(&Env { base: 1 }), Ok(2));
    /// assert_eq!(effect.provide(&Env { base: 10 }), Ok(11));
    /// ```
    pub fn provide(&self, env: &R) -> Result<A, E> {
        #[cfg(feature = "tracing")]
        tracing::trace!(root = self.root().kind(), "providing environment");

        let outcome = evaluate(self.root(), env);

        #[cfg(feature = "tracing")]
        tracing::trace!(succeeded = outcome.is_ok(), "effect evaluated");

        outcome.map(unerase::<A>).map_err(unerase::<E>)
    }
}

impl<R, A> Effect<R, Nothing, A>
where
    R: 'static,
    A: Send + 'static,
{
    /// Provide an effect that cannot fail and return its value directly.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), String, i32>::raise_error("gone".to_string())
    ///     .fold(|e| e.len() as i32, |x| x);
    /// assert_eq!(effect.provide_infallible(&()), 4);
    /// ```
    pub fn provide_infallible(&self, env: &R) -> A {
        match self.provide(env) {
            Ok(value) => value,
            Err(never) => never.absurd(),
        }
    }
}

impl<E, A> Effect<(), E, A>
where
    E: Send + 'static,
    A: Send + 'static,
{
    /// Run an effect that needs no environment.
    pub fn run_standalone(&self) -> Result<A, E> {
        self.provide(&())
    }
}

pub(crate) fn evaluate<R: 'static>(root: &Arc<Node<R>>, env: &R) -> Outcome {
    let mut stack = Frames(Vec::new());
    let mut current = Arc::clone(root);

    'eval: loop {
        let step = match &*current {
            Node::Pure(value) => Step::Finish(Ok(value())),
            Node::Failure(error) => Step::Finish(Err(error())),
            Node::Suspend { thunk, may_fail } => Step::Finish(run_thunk(thunk, *may_fail)),
            Node::Access(f) => Step::Descend(f(env)),
            Node::FlatMap { source, cont } => {
                stack.push(Frame::FlatMap(Arc::clone(cont)));
                Step::Descend(Arc::clone(source.node()))
            }
            Node::Map { source, f } => {
                stack.push(Frame::Map(Arc::clone(f)));
                Step::Descend(Arc::clone(source.node()))
            }
            Node::MapError { source, f } => {
                stack.push(Frame::MapError(Arc::clone(f)));
                Step::Descend(Arc::clone(source.node()))
            }
            Node::Fold {
                source,
                on_error,
                on_success,
            } => {
                stack.push(Frame::Fold {
                    on_error: on_error.clone(),
                    on_success: on_success.clone(),
                });
                Step::Descend(Arc::clone(source.node()))
            }
            #[cfg(feature = "tracing")]
            Node::Instrument { source, span } => {
                stack.push(Frame::Span(span.clone().entered()));
                Step::Descend(Arc::clone(source.node()))
            }
        };

        let mut outcome = match step {
            Step::Descend(next) => {
                current = next;
                continue 'eval;
            }
            Step::Finish(outcome) => outcome,
        };

        // Unwind frames until one asks for another node.
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::FlatMap(cont) => match outcome {
                    Ok(value) => {
                        current = cont(value);
                        continue 'eval;
                    }
                    Err(error) => outcome = Err(error),
                },
                Frame::Map(f) => outcome = outcome.map(|value| f(value)),
                Frame::MapError(f) => outcome = outcome.map_err(|error| f(error)),
                Frame::Fold {
                    on_error,
                    on_success,
                } => {
                    let (handler, input) = match outcome {
                        Ok(value) => (on_success, value),
                        Err(error) => (on_error, error),
                    };
                    match handler {
                        Handler::Resume(finish) => outcome = finish(input),
                        Handler::Continue(next) => {
                            current = next(input);
                            continue 'eval;
                        }
                    }
                }
                #[cfg(feature = "tracing")]
                Frame::Span(entered) => drop(entered),
            }
        }

        return outcome;
    }
}

fn run_thunk(thunk: &Thunk, may_fail: bool) -> Outcome {
    if !may_fail {
        return thunk();
    }

    match panic::catch_unwind(AssertUnwindSafe(|| thunk())) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let fault = Fault::from_panic(payload);
            #[cfg(feature = "tracing")]
            tracing::debug!(%fault, "captured panic from fallible thunk");
            Err(erase(fault))
        }
    }
}
