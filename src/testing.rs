//! Testing utilities for effect programs.
//!
//! [`Effect::provide`](crate::Effect::provide) returns a plain `Result`, so
//! these macros are thin wrappers that produce readable panic messages.
//!
//! # Examples
//!
//! ```rust
//! use tidepool::{assert_failure, assert_success, Effect};
//!
//! assert_success!(Effect::<(), String, _>::pure(42).provide(&()));
//! assert_failure!(Effect::<(), _, i32>::raise_error("boom").provide(&()));
//! ```
//!
//! The environment for a test is usually an in-memory fake such as
//! [`TestConsole`](crate::console::TestConsole).

/// Assert that a provided effect succeeded, optionally with a given value.
///
/// # Example
///
/// ```rust
/// use tidepool::{assert_success, Effect};
///
/// let result = Effect::<(), String, _>::pure(1).map(|x| x + 1).provide(&());
/// assert_success!(result, 2);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Ok(_) => {}
            ::core::result::Result::Err(e) => {
                panic!("Expected Success, got Failure: {:?}", e);
            }
        }
    };
    ($result:expr, $expected:expr) => {
        match $result {
            ::core::result::Result::Ok(v) => {
                assert_eq!(v, $expected);
            }
            ::core::result::Result::Err(e) => {
                panic!("Expected Success with {:?}, got Failure: {:?}", $expected, e);
            }
        }
    };
}

/// Assert that a provided effect failed.
///
/// # Example
///
/// ```rust
/// use tidepool::{assert_failure, Effect};
///
/// let result = Effect::<(), _, i32>::raise_error("error").provide(&());
/// assert_failure!(result);
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Err(_) => {}
            ::core::result::Result::Ok(v) => {
                panic!("Expected Failure, got Success: {:?}", v);
            }
        }
    };
}

/// Assert that a provided effect failed with a specific error.
///
/// # Example
///
/// ```rust
/// use tidepool::{assert_failure_with, Effect};
///
/// let result = Effect::<(), _, i32>::raise_error("error1").provide(&());
/// assert_failure_with!(result, "error1");
/// ```
#[macro_export]
macro_rules! assert_failure_with {
    ($result:expr, $expected:expr) => {
        match $result {
            ::core::result::Result::Err(e) => {
                assert_eq!(e, $expected);
            }
            ::core::result::Result::Ok(v) => {
                panic!("Expected Failure with {:?}, got Success: {:?}", $expected, v);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::console::{self, TestConsole};
    use crate::Effect;

    #[test]
    fn assert_success_macro() {
        assert_success!(Effect::<(), String, _>::pure(42).provide(&()));
        assert_success!(Effect::<(), String, _>::pure(42).provide(&()), 42);
    }

    #[test]
    fn assert_failure_macro() {
        let result = Effect::<(), _, i32>::raise_error("error".to_string()).provide(&());
        assert_failure!(result);
    }

    #[test]
    fn assert_failure_with_macro() {
        let result = Effect::<(), _, i32>::raise_error(vec!["error1", "error2"]).provide(&());
        assert_failure_with!(result, vec!["error1", "error2"]);
    }

    #[test]
    fn assert_success_on_console_program() {
        let env = TestConsole::with_input(["x"]);
        assert_success!(console::readln().provide(&env), "x".to_string());
    }

    #[test]
    #[should_panic(expected = "Expected Success, got Failure")]
    fn assert_success_panics_on_failure() {
        assert_success!(Effect::<(), _, i32>::raise_error("error").provide(&()));
    }

    #[test]
    #[should_panic(expected = "Expected Success with")]
    fn assert_success_with_value_panics_on_failure() {
        assert_success!(Effect::<(), _, i32>::raise_error("error").provide(&()), 1);
    }

    #[test]
    #[should_panic(expected = "Expected Failure, got Success")]
    fn assert_failure_panics_on_success() {
        assert_failure!(Effect::<(), String, _>::pure(42).provide(&()));
    }

    #[test]
    #[should_panic(expected = "Expected Failure with")]
    fn assert_failure_with_panics_on_success() {
        assert_failure_with!(Effect::<(), String, _>::pure(42).provide(&()), "error".to_string());
    }
}
