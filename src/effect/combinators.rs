//! Sequencing and error-handling combinators.
//!
//! Every combinator wraps the receiver in a new node; nothing runs until the
//! result is provided. Functions passed in are `Fn` because an effect may be
//! evaluated more than once.

use std::sync::Arc;

use crate::effect::node::{erase, unerase, Handler, Link, Node, Value};
use crate::effect::Effect;
use crate::marker::Nothing;

impl<R, E, A> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Send + 'static,
{
    /// Transform the success value.
    ///
    /// Failures pass through and `f` is not called.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), String, _>::pure(5).map(|x| x * 2);
    /// assert_eq!(effect.provide(&()), Ok(10));
    /// ```
    pub fn map<B, F>(self, f: F) -> Effect<R, E, B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        Effect::from_node(Node::Map {
            source: Link::new(self.into_node()),
            f: Arc::new(move |value: Value| erase(f(unerase::<A>(value)))),
        })
    }

    /// Transform the error value.
    ///
    /// Successes pass through and `f` is not called.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), _, i32>::raise_error("error")
    ///     .map_error(|e| format!("failed: {}", e));
    /// assert_eq!(effect.provide(&()), Err("failed: error".to_string()));
    /// ```
    pub fn map_error<E2, F>(self, f: F) -> Effect<R, E2, A>
    where
        F: Fn(E) -> E2 + Send + Sync + 'static,
        E2: Send + 'static,
    {
        Effect::from_node(Node::MapError {
            source: Link::new(self.into_node()),
            f: Arc::new(move |error: Value| erase(f(unerase::<E>(error)))),
        })
    }

    /// Transform both channels at once.
    ///
    /// Equivalent to `.map(on_success).map_error(on_error)`, built as a single
    /// fold node.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let parse = |input: &'static str| Effect::<(), _, _>::from(move || input.parse::<i32>());
    ///
    /// let ok = parse("1").bimap(|fault| fault.message(), |x| x + 1);
    /// assert_eq!(ok.provide(&()), Ok(2));
    ///
    /// let err = parse("lskjdf").bimap(|fault| fault.message(), |x| x + 1);
    /// assert_eq!(err.provide(&()), Err("invalid digit found in string".to_string()));
    /// ```
    pub fn bimap<E2, B, FE, FA>(self, on_error: FE, on_success: FA) -> Effect<R, E2, B>
    where
        FE: Fn(E) -> E2 + Send + Sync + 'static,
        FA: Fn(A) -> B + Send + Sync + 'static,
        E2: Send + 'static,
        B: Send + 'static,
    {
        Effect::from_node(Node::Fold {
            source: Link::new(self.into_node()),
            on_error: Handler::Resume(Arc::new(move |error: Value| {
                Err(erase(on_error(unerase::<E>(error))))
            })),
            on_success: Handler::Resume(Arc::new(move |value: Value| {
                Ok(erase(on_success(unerase::<A>(value))))
            })),
        })
    }

    /// Chain a dependent effect.
    ///
    /// On success the value is passed to `f` and the returned effect runs
    /// next. On failure the error propagates and `f` is never called.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), String, _>::pure(5).flat_map(|x| Effect::pure(x * 2));
    /// assert_eq!(effect.provide(&()), Ok(10));
    ///
    /// let effect = Effect::<(), String, i32>::raise_error("error".to_string())
    ///     .flat_map(|x| Effect::pure(x * 2));
    /// assert_eq!(effect.provide(&()), Err("error".to_string()));
    /// ```
    pub fn flat_map<B, F>(self, f: F) -> Effect<R, E, B>
    where
        F: Fn(A) -> Effect<R, E, B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        Effect::from_node(Node::FlatMap {
            source: Link::new(self.into_node()),
            cont: Arc::new(move |value: Value| f(unerase::<A>(value)).into_node()),
        })
    }

    /// Sequence another effect after this one, ignoring this one's value.
    ///
    /// `next` is only called once this effect has succeeded; failures still
    /// short-circuit.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), String, _>::pure("ignored").and_then(|| Effect::pure(7));
    /// assert_eq!(effect.provide(&()), Ok(7));
    /// ```
    pub fn and_then<B, F>(self, next: F) -> Effect<R, E, B>
    where
        F: Fn() -> Effect<R, E, B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.flat_map(move |_| next())
    }

    /// Recover from a failure with another effect.
    ///
    /// The dual of [`Effect::flat_map`]: on failure the error is passed to
    /// `f`, on success the value passes through. The recovery may change the
    /// error type.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), _, i32>::from(|| "nope".parse::<i32>())
    ///     .flat_map_error(|fault| Effect::raise_error(fault.message()));
    /// assert_eq!(effect.provide(&()), Err("invalid digit found in string".to_string()));
    /// ```
    pub fn flat_map_error<E2, F>(self, f: F) -> Effect<R, E2, A>
    where
        F: Fn(E) -> Effect<R, E2, A> + Send + Sync + 'static,
        E2: Send + 'static,
    {
        Effect::from_node(Node::Fold {
            source: Link::new(self.into_node()),
            on_error: Handler::Continue(Arc::new(move |error: Value| {
                f(unerase::<E>(error)).into_node()
            })),
            on_success: Handler::succeed(),
        })
    }

    /// Collapse both channels into a success value.
    ///
    /// The resulting effect cannot fail: its error type is [`Nothing`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), _, i32>::from(|| "kjsdfdf".parse::<i32>()).fold(|_| -1, |x| x);
    /// assert_eq!(effect.provide_infallible(&()), -1);
    /// ```
    pub fn fold<B, FE, FA>(self, on_error: FE, on_success: FA) -> Effect<R, Nothing, B>
    where
        FE: Fn(E) -> B + Send + Sync + 'static,
        FA: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        Effect::from_node(Node::Fold {
            source: Link::new(self.into_node()),
            on_error: Handler::Resume(Arc::new(move |error: Value| {
                Ok(erase(on_error(unerase::<E>(error))))
            })),
            on_success: Handler::Resume(Arc::new(move |value: Value| {
                Ok(erase(on_success(unerase::<A>(value))))
            })),
        })
    }

    /// Run `alternative` if this effect fails, discarding the error.
    ///
    /// The alternative is only built when it is needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let failed = Effect::<(), String, i32>::raise_error("error".to_string());
    /// assert_eq!(failed.or_else(|| Effect::pure(2)).provide(&()), Ok(2));
    ///
    /// let fine = Effect::<(), String, _>::pure(1);
    /// assert_eq!(fine.or_else(|| Effect::pure(2)).provide(&()), Ok(1));
    /// ```
    pub fn or_else<F>(self, alternative: F) -> Effect<R, E, A>
    where
        F: Fn() -> Effect<R, E, A> + Send + Sync + 'static,
    {
        Effect::from_node(Node::Fold {
            source: Link::new(self.into_node()),
            on_error: Handler::Continue(Arc::new(move |_: Value| alternative().into_node())),
            on_success: Handler::succeed(),
        })
    }

    /// Run a follow-up effect for its side effect and keep the current value.
    ///
    /// A failure of the follow-up fails the whole effect.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use tidepool::{Effect, Unit};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let log = Arc::clone(&seen);
    /// let effect = Effect::<(), String, _>::pure(42).tap(move |value: &i32| {
    ///     let log = Arc::clone(&log);
    ///     let value = *value;
    ///     Effect::<(), String, Unit>::exec(move || log.lock().unwrap().push(value))
    /// });
    ///
    /// assert_eq!(effect.provide(&()), Ok(42));
    /// assert_eq!(*seen.lock().unwrap(), vec![42]);
    /// ```
    pub fn tap<B, F>(self, f: F) -> Effect<R, E, A>
    where
        F: Fn(&A) -> Effect<R, E, B> + Send + Sync + 'static,
        A: Clone + Sync,
        B: Send + 'static,
    {
        self.flat_map(move |value: A| {
            let follow_up = f(&value);
            follow_up.map(move |_| value.clone())
        })
    }

    /// Run `other` after this effect and pair both values.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), String, _>::pure(1).zip(Effect::pure("one"));
    /// assert_eq!(effect.provide(&()), Ok((1, "one")));
    /// ```
    pub fn zip<B>(self, other: Effect<R, E, B>) -> Effect<R, E, (A, B)>
    where
        A: Clone + Sync,
        B: Send + 'static,
    {
        self.flat_map(move |left: A| other.clone().map(move |right| (left.clone(), right)))
    }
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use crate::fault::Fault;
    use crate::marker::Unit;

    fn parse(input: &'static str) -> Effect<(), Fault, i32> {
        Effect::from(move || input.parse::<i32>())
    }

    #[test]
    fn test_bimap_only_touches_one_channel() {
        let ok = parse("41").bimap(|_| "never", |x| x + 1);
        assert_eq!(ok.provide(&()), Ok(42));

        let err = parse("x").bimap(|_| "mapped", |x| x + 1);
        assert_eq!(err.provide(&()), Err("mapped"));
    }

    #[test]
    fn test_flat_map_error_passes_success_through() {
        let effect = parse("1").flat_map_error(|_| Effect::<(), String, i32>::pure(-1));
        assert_eq!(effect.provide(&()), Ok(1));
    }

    #[test]
    fn test_flat_map_error_can_recover() {
        let effect = parse("x").flat_map_error(|_| Effect::<(), String, i32>::pure(-1));
        assert_eq!(effect.provide(&()), Ok(-1));
    }

    #[test]
    fn test_fold_both_branches() {
        assert_eq!(parse("1").fold(|_| -1, |x| x).provide_infallible(&()), 1);
        assert_eq!(parse("kjsdfdf").fold(|_| -1, |x| x).provide_infallible(&()), -1);
    }

    #[test]
    fn test_and_then_short_circuits() {
        let effect = Effect::<(), _, Unit>::raise_error("stop")
            .and_then(|| -> Effect<(), &str, i32> { panic!("next must not be built") });
        assert_eq!(effect.provide(&()), Err("stop"));
    }

    #[test]
    fn test_or_else_alternative_built_lazily() {
        let effect = Effect::<(), String, _>::pure(1)
            .or_else(|| panic!("alternative must not be built"));
        assert_eq!(effect.provide(&()), Ok(1));
    }

    #[test]
    fn test_tap_failure_fails_whole_effect() {
        let effect = Effect::<(), String, _>::pure(3)
            .tap(|_| Effect::<(), String, Unit>::raise_error("tap failed".to_string()));
        assert_eq!(effect.provide(&()), Err("tap failed".to_string()));
    }

    #[test]
    fn test_zip_first_failure_wins() {
        let effect = Effect::<(), _, i32>::raise_error("left")
            .zip(Effect::<(), &str, i32>::raise_error("right"));
        assert_eq!(effect.provide(&()), Err("left"));

        let effect = Effect::<(), _, _>::pure(1).zip(Effect::<(), &str, i32>::raise_error("right"));
        assert_eq!(effect.provide(&()), Err("right"));
    }
}
