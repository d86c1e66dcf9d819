//! Context trails for effect errors.

use crate::context::ContextError;
use crate::effect::Effect;

impl<R, E, A> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Send + 'static,
{
    /// Wrap any error in a [`ContextError`] carrying `msg`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidepool::Effect;
    ///
    /// let effect = Effect::<(), _, i32>::raise_error("connection refused")
    ///     .context("connecting to database");
    ///
    /// let err = effect.provide(&()).unwrap_err();
    /// assert_eq!(err.inner(), &"connection refused");
    /// assert_eq!(err.context_trail(), &["connecting to database"]);
    /// ```
    pub fn context(self, msg: impl Into<String>) -> Effect<R, ContextError<E>, A> {
        let msg = msg.into();
        self.map_error(move |err| ContextError::new(err).context(msg.clone()))
    }
}

impl<R, E, A> Effect<R, ContextError<E>, A>
where
    R: 'static,
    E: Send + 'static,
    A: Send + 'static,
{
    /// Add another layer to an existing context trail.
    pub fn context_chain(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.map_error(move |err| err.context(msg.clone()))
    }
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use crate::fault::Fault;

    #[test]
    fn test_context_wraps_error() {
        let effect = Effect::<(), _, i32>::raise_error("base error").context("operation failed");

        let err = effect.provide(&()).unwrap_err();
        assert_eq!(err.inner(), &"base error");
        assert_eq!(err.context_trail(), &["operation failed"]);
    }

    #[test]
    fn test_context_chain_accumulates() {
        let effect = Effect::<(), _, i32>::raise_error("base error")
            .context("step 1")
            .context_chain("step 2")
            .context_chain(String::from("step 3"));

        let err = effect.provide(&()).unwrap_err();
        assert_eq!(err.context_trail(), &["step 1", "step 2", "step 3"]);
    }

    #[test]
    fn test_context_leaves_success_alone() {
        let effect = Effect::<(), String, _>::pure(42).context("unused");
        assert_eq!(effect.provide(&()), Ok(42));
    }

    #[test]
    fn test_context_on_captured_fault() {
        let effect = Effect::<(), _, _>::from(|| "abc".parse::<u8>())
            .context("parsing port")
            .map(|port| port + 1)
            .context_chain("starting server");

        let err = effect.provide(&()).unwrap_err();
        assert!(err.inner().is::<std::num::ParseIntError>());
        assert_eq!(
            err.to_string(),
            "Error: invalid digit found in string\n  -> parsing port\n  -> starting server"
        );
        let _: &Fault = err.inner();
    }

    #[test]
    fn test_context_can_be_provided_repeatedly() {
        let effect = Effect::<(), _, i32>::raise_error("e").context("ctx");
        let first = effect.provide(&()).unwrap_err();
        let second = effect.provide(&()).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(second.context_trail().len(), 1);
    }
}
