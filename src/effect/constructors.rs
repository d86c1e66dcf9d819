//! Construction primitives.
//!
//! None of these run anything: thunks and environment lookups are stored in
//! the tree and only invoked by [`Effect::provide`].

use std::sync::Arc;

use crate::effect::node::{erase, Node, Outcome};
use crate::effect::Effect;
use crate::fault::{BoxError, Fault};
use crate::marker::{unit, Unit};

impl<R, E, A> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Send + 'static,
{
    /// Create an effect that always succeeds with `value`.
    ///
    /// The value is cloned on each evaluation so the effect can be provided
    /// repeatedly.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), String, _>::pure(42);
    /// assert_eq!(effect.provide(&()), Ok(42));
    /// ```
    pub fn pure(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Effect::from_node(Node::Pure(Arc::new(move || erase(value.clone()))))
    }

    /// Create an effect that always fails with `error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), _, i32>::raise_error("error");
    /// assert_eq!(effect.provide(&()), Err("error"));
    /// ```
    pub fn raise_error(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Effect::from_node(Node::Failure(Arc::new(move || erase(error.clone()))))
    }

    /// Lift an already computed `Result`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), String, _>::from_result(Ok(42));
    /// assert_eq!(effect.provide(&()), Ok(42));
    /// ```
    pub fn from_result(result: Result<A, E>) -> Self
    where
        A: Clone + Sync,
        E: Clone + Sync,
    {
        match result {
            Ok(value) => Effect::pure(value),
            Err(error) => Effect::raise_error(error),
        }
    }

    /// Lift an `Option`, failing with `error` when it is `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), _, i32>::from_option(None, "missing");
    /// assert_eq!(effect.provide(&()), Err("missing"));
    /// ```
    pub fn from_option(option: Option<A>, error: E) -> Self
    where
        A: Clone + Sync,
        E: Clone + Sync,
    {
        Effect::from_result(option.ok_or(error))
    }

    /// Defer to an effect computed from the environment.
    ///
    /// This is the only way environment-dependent behaviour enters an effect
    /// tree. `f` runs during evaluation, once per evaluation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// struct Env {
    ///     greeting: &'static str,
    /// }
    ///
    /// let effect = Effect::<Env, String, _>::access_m(|env: &Env| {
    ///     Effect::pure(format!("{}, world", env.greeting))
    /// });
    /// assert_eq!(effect.provide(&Env { greeting: "hello" }), Ok("hello, world".to_string()));
    /// ```
    pub fn access_m<F>(f: F) -> Self
    where
        F: Fn(&R) -> Effect<R, E, A> + Send + Sync + 'static,
    {
        Effect::from_node(Node::Access(Arc::new(move |env: &R| f(env).into_node())))
    }

    /// Project a value out of the environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// struct Env {
    ///     port: u16,
    /// }
    ///
    /// let effect = Effect::<Env, String, _>::access(|env: &Env| env.port);
    /// assert_eq!(effect.provide(&Env { port: 8080 }), Ok(8080));
    /// ```
    pub fn access<F>(f: F) -> Self
    where
        F: Fn(&R) -> A + Send + Sync + 'static,
        A: Clone + Sync,
    {
        Effect::access_m(move |env: &R| Effect::pure(f(env)))
    }
}

impl<R, A> Effect<R, Fault, A>
where
    R: 'static,
    A: Send + 'static,
{
    /// Defer a fallible host computation.
    ///
    /// On evaluation the thunk runs; `Ok` becomes the success value, while an
    /// `Err` or a panic is captured as a [`Fault`] in the error channel.
    /// Narrow the error type afterwards with [`Effect::map_error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::ParseIntError;
    /// use tidepool::Effect;
    ///
    /// let ok = Effect::<(), _, _>::from(|| "1".parse::<i32>());
    /// assert_eq!(ok.provide(&()).ok(), Some(1));
    ///
    /// let fault = Effect::<(), _, _>::from(|| "x".parse::<i32>())
    ///     .provide(&())
    ///     .unwrap_err();
    /// assert!(fault.is::<ParseIntError>());
    /// ```
    pub fn from<F, X>(thunk: F) -> Self
    where
        F: Fn() -> Result<A, X> + Send + Sync + 'static,
        X: Into<BoxError> + 'static,
    {
        let thunk = move || -> Outcome {
            match thunk() {
                Ok(value) => Ok(erase(value)),
                Err(error) => {
                    let fault = Fault::new(error);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(%fault, "thunk returned an error");
                    Err(erase(fault))
                }
            }
        };

        Effect::from_node(Node::Suspend {
            thunk: Arc::new(thunk),
            may_fail: true,
        })
    }
}

impl<R, E> Effect<R, E, Unit>
where
    R: 'static,
    E: Send + 'static,
{
    /// Create an effect that succeeds with [`Unit`].
    pub fn unit() -> Self {
        Effect::pure(unit())
    }

    /// Defer a side effect that is not expected to fail.
    ///
    /// The effect always succeeds with [`Unit`]. A panic inside the thunk is
    /// a defect: it is not captured and unwinds out of [`Effect::provide`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    /// use tidepool::{Effect, Unit};
    ///
    /// let counter = Arc::new(AtomicUsize::new(0));
    /// let hits = Arc::clone(&counter);
    /// let effect = Effect::<(), String, Unit>::exec(move || {
    ///     hits.fetch_add(1, Ordering::SeqCst);
    /// });
    ///
    /// assert_eq!(counter.load(Ordering::SeqCst), 0);
    /// assert_eq!(effect.provide(&()), Ok(Unit));
    /// assert_eq!(counter.load(Ordering::SeqCst), 1);
    /// ```
    pub fn exec<F>(thunk: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let thunk = move || -> Outcome {
            thunk();
            Ok(erase(unit()))
        };

        Effect::from_node(Node::Suspend {
            thunk: Arc::new(thunk),
            may_fail: false,
        })
    }
}

/// Free-function form of [`Effect::pure`], handy inside continuations where
/// the types are already fixed.
///
/// # Examples
///
/// ```
/// use tidepool::{pure, Effect};
///
/// let effect = Effect::<(), String, _>::pure(20).flat_map(|x| pure(x + 1));
/// assert_eq!(effect.provide(&()), Ok(21));
/// ```
pub fn pure<R, E, A>(value: A) -> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
{
    Effect::pure(value)
}

/// Free-function form of [`Effect::raise_error`].
pub fn raise_error<R, E, A>(error: E) -> Effect<R, E, A>
where
    R: 'static,
    E: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    Effect::raise_error(error)
}

/// Free-function form of [`Effect::exec`].
pub fn exec<R, E, F>(thunk: F) -> Effect<R, E, Unit>
where
    R: 'static,
    E: Send + 'static,
    F: Fn() + Send + Sync + 'static,
{
    Effect::exec(thunk)
}

/// Free-function form of [`Effect::access_m`].
pub fn access_m<R, E, A, F>(f: F) -> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(&R) -> Effect<R, E, A> + Send + Sync + 'static,
{
    Effect::access_m(f)
}

/// Free-function form of [`Effect::access`].
pub fn access<R, E, A, F>(f: F) -> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(&R) -> A + Send + Sync + 'static,
{
    Effect::access(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_construction_runs_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&calls);
        let _from = Effect::<(), _, _>::from(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Fault>(1)
        });
        let seen = Arc::clone(&calls);
        let _exec = Effect::<(), String, _>::exec(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let seen = Arc::clone(&calls);
        let _access = Effect::<(), String, i32>::access_m(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Effect::pure(1)
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_option_some() {
        let effect = Effect::<(), &str, _>::from_option(Some(3), "missing");
        assert_eq!(effect.provide(&()), Ok(3));
    }

    #[test]
    fn test_from_result_err() {
        let effect = Effect::<(), _, i32>::from_result(Err("bad"));
        assert_eq!(effect.provide(&()), Err("bad"));
    }

    #[test]
    fn test_unit_effect() {
        assert_eq!(Effect::<(), String, Unit>::unit().provide(&()), Ok(Unit));
    }

    #[test]
    fn test_from_captures_boxed_string_errors() {
        let effect = Effect::<(), _, i32>::from(|| Err("not today"));
        let fault = effect.provide(&()).unwrap_err();
        assert_eq!(fault.message(), "not today");
        assert!(!fault.is_panic());
    }

    #[test]
    fn test_free_functions_match_associated_ones() {
        struct Env {
            name: String,
        }

        let env = Env {
            name: "tide".to_string(),
        };

        assert_eq!(pure::<Env, String, _>(1).provide(&env), Ok(1));
        assert_eq!(raise_error::<Env, _, i32>("e").provide(&env), Err("e"));
        assert_eq!(
            access::<Env, String, _, _>(|env: &Env| env.name.clone()).provide(&env),
            Ok("tide".to_string())
        );
        assert_eq!(
            access_m::<Env, String, _, _>(|env: &Env| pure(env.name.len())).provide(&env),
            Ok(4)
        );
        assert_eq!(exec::<Env, String, _>(|| {}).provide(&env), Ok(Unit));
    }
}
