//! # Tidepool
//!
//! Lazy effect descriptions with typed errors and environment access.
//!
//! An [`Effect<R, E, A>`] describes a computation that needs an environment
//! `R` and either fails with an `E` or succeeds with an `A`. Building an
//! effect runs nothing; [`Effect::provide`] supplies the environment and
//! interprets the description.
//!
//! - **Describe, then run**: compose effects freely, provide them as often as
//!   you like.
//! - **Typed failures**: errors are values. Faults from fallible host code
//!   are captured as [`Fault`]s, recovery is always explicit.
//! - **Swappable environments**: programs read capabilities through
//!   [`Effect::access_m`], so tests provide fakes instead of real I/O.
//!
//! ## Quick Example
//!
//! ```rust
//! use tidepool::console::{self, TestConsole};
//!
//! let env = TestConsole::with_input(["Toni"]);
//!
//! let program = console::println("what's your name?")
//!     .and_then(console::readln)
//!     .flat_map(|name| console::println(format!("Hello {}", name)));
//!
//! program.provide(&env).unwrap();
//! assert_eq!(env.output(), vec!["what's your name?", "Hello Toni"]);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod console;
pub mod context;
pub mod effect;
pub mod fault;
pub mod marker;
pub mod testing;

// Re-exports
pub use context::ContextError;
pub use effect::{access, access_m, exec, pure, raise_error, Effect};
pub use fault::Fault;
pub use marker::{unit, Nothing, Unit};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::console::HasConsole;
    pub use crate::context::ContextError;
    pub use crate::effect::{access, access_m, exec, pure, raise_error, Effect};
    pub use crate::fault::Fault;
    pub use crate::marker::{unit, Nothing, Unit};
}
