//! Error context trails.
//!
//! [`ContextError`] wraps an error together with the list of operations that
//! were in progress when it surfaced, innermost first. Effects add layers with
//! [`Effect::context`](crate::Effect::context) and
//! [`Effect::context_chain`](crate::Effect::context_chain).
//!
//! # Examples
//!
//! ```
//! use tidepool::{ContextError, Effect};
//!
//! let effect = Effect::<(), _, i32>::raise_error("connection refused")
//!     .context("opening session")
//!     .context_chain("loading profile");
//!
//! let err = effect.run_standalone().unwrap_err();
//! assert_eq!(err.inner(), &"connection refused");
//! assert_eq!(err.context_trail(), &["opening session", "loading profile"]);
//! ```

use std::error::Error as StdError;
use std::fmt;

/// An error plus the trail of context it propagated through.
///
/// Rendered with `Display` as:
///
/// ```text
/// Error: connection refused
///   -> opening session
///   -> loading profile
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextError<E> {
    error: E,
    context: Vec<String>,
}

impl<E> ContextError<E> {
    /// Wrap `error` with an empty trail.
    pub fn new(error: E) -> Self {
        ContextError {
            error,
            context: Vec::new(),
        }
    }

    /// Append a context layer.
    pub fn context(mut self, msg: impl Into<String>) -> Self {
        self.context.push(msg.into());
        self
    }

    /// The wrapped error.
    pub fn inner(&self) -> &E {
        &self.error
    }

    /// Discard the trail and return the wrapped error.
    pub fn into_inner(self) -> E {
        self.error
    }

    /// Context messages in the order they were added.
    pub fn context_trail(&self) -> &[String] {
        &self.context
    }

    /// Transform the wrapped error, keeping the trail.
    pub fn map_inner<E2>(self, f: impl FnOnce(E) -> E2) -> ContextError<E2> {
        ContextError {
            error: f(self.error),
            context: self.context,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ContextError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;
        for ctx in &self.context {
            write!(f, "\n  -> {}", ctx)?;
        }
        Ok(())
    }
}

impl<E: StdError + 'static> StdError for ContextError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}
