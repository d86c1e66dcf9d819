//! Captured host faults.
//!
//! A [`Fault`] is what a thunk wrapped by [`Effect::from`](crate::Effect::from)
//! fails with: either the error value the thunk returned, or the message of a
//! panic raised while it ran. Faults are cheap to clone and can be inspected
//! for their concrete error type.
//!
//! # Examples
//!
//! ```
//! use std::num::ParseIntError;
//! use tidepool::Fault;
//!
//! let fault = Fault::new("x".parse::<i32>().unwrap_err());
//! assert!(fault.is::<ParseIntError>());
//! assert_eq!(fault.message(), "invalid digit found in string");
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Boxed error type accepted by [`Fault::new`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A host failure captured into an effect's error channel.
#[derive(Debug, Clone)]
pub struct Fault {
    kind: FaultKind,
}

#[derive(Debug, Clone)]
enum FaultKind {
    Error(Arc<dyn StdError + Send + Sync + 'static>),
    Panic(String),
}

impl Fault {
    /// Wrap an error value.
    ///
    /// Anything convertible into a boxed error is accepted, including plain
    /// `&str` and `String` messages.
    pub fn new(error: impl Into<BoxError>) -> Self {
        let error: BoxError = error.into();
        Fault {
            kind: FaultKind::Error(Arc::from(error)),
        }
    }

    /// Build a fault from a panic payload as returned by
    /// [`std::panic::catch_unwind`].
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "thunk panicked with a non-string payload".to_string()
        };

        Fault {
            kind: FaultKind::Panic(message),
        }
    }

    /// Human readable description of the fault.
    pub fn message(&self) -> String {
        match &self.kind {
            FaultKind::Error(error) => error.to_string(),
            FaultKind::Panic(message) => message.clone(),
        }
    }

    /// Whether the fault was a panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self.kind, FaultKind::Panic(_))
    }

    /// Whether the wrapped error is of type `T`.
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Borrow the wrapped error as a concrete type.
    ///
    /// Always `None` for panics.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match &self.kind {
            FaultKind::Error(error) => error.downcast_ref::<T>(),
            FaultKind::Panic(_) => None,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FaultKind::Error(error) => write!(f, "{}", error),
            FaultKind::Panic(message) => write!(f, "panicked: {}", message),
        }
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            FaultKind::Error(error) => Some(&**error),
            FaultKind::Panic(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::num::ParseIntError;

    #[test]
    fn test_new_keeps_concrete_error() {
        let fault = Fault::new("lskjdf".parse::<i32>().unwrap_err());

        assert!(fault.is::<ParseIntError>());
        assert!(!fault.is::<io::Error>());
        assert!(!fault.is_panic());
        assert_eq!(fault.message(), "invalid digit found in string");
    }

    #[test]
    fn test_new_accepts_plain_messages() {
        let fault = Fault::new("disk on fire");
        assert_eq!(fault.message(), "disk on fire");
        assert_eq!(fault.to_string(), "disk on fire");

        let fault = Fault::new(String::from("owned message"));
        assert_eq!(fault.message(), "owned message");
    }

    #[test]
    fn test_from_panic_str_payload() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        let fault = Fault::from_panic(payload);

        assert!(fault.is_panic());
        assert_eq!(fault.message(), "boom");
        assert_eq!(fault.to_string(), "panicked: boom");
        assert!(fault.downcast_ref::<io::Error>().is_none());
    }

    #[test]
    fn test_from_panic_string_payload() {
        let payload = std::panic::catch_unwind(|| panic!("code {}", 42)).unwrap_err();
        assert_eq!(Fault::from_panic(payload).message(), "code 42");
    }

    #[test]
    fn test_from_panic_opaque_payload() {
        let fault = Fault::from_panic(Box::new(17_u8));
        assert!(fault.is_panic());
        assert_eq!(fault.message(), "thunk panicked with a non-string payload");
    }

    #[test]
    fn test_source_points_to_wrapped_error() {
        let fault = Fault::new(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let source = fault.source().expect("wrapped error should be the source");
        assert_eq!(source.to_string(), "missing");

        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert!(Fault::from_panic(payload).source().is_none());
    }

    #[test]
    fn test_clone_shares_error() {
        let fault = Fault::new(io::Error::new(io::ErrorKind::Other, "shared"));
        let cloned = fault.clone();
        assert_eq!(fault.message(), cloned.message());
        assert!(cloned.is::<io::Error>());
    }
}
