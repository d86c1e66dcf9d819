//! Marker types for channels that carry no information.
//!
//! - [`Unit`] is the success value of effects that run only for their side
//!   effect (printing a line, pushing to a log).
//! - [`Nothing`] is the error type of effects that cannot fail, such as the
//!   result of [`Effect::fold`](crate::Effect::fold).
//!
//! # Examples
//!
//! ```
//! use tidepool::{unit, Effect, Unit};
//!
//! let effect = Effect::<(), String, Unit>::exec(|| {});
//! assert_eq!(effect.run_standalone(), Ok(unit()));
//! assert_eq!(Unit.to_string(), "Unit");
//! ```

use std::error::Error as StdError;
use std::fmt;

/// The "no meaningful value" marker.
///
/// `Unit` is zero-sized and every instance is equal to every other one, so it
/// can be compared and hashed freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit;

/// Returns the [`Unit`] marker.
pub const fn unit() -> Unit {
    Unit
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unit")
    }
}

impl From<()> for Unit {
    fn from(_: ()) -> Self {
        Unit
    }
}

impl From<Unit> for () {
    fn from(_: Unit) -> Self {}
}

/// The "no possible error" marker.
///
/// `Nothing` has no values. An `Effect<R, Nothing, A>` is statically known to
/// succeed, which is what [`Effect::provide_infallible`](crate::Effect::provide_infallible)
/// relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nothing {}

impl Nothing {
    /// Converts an impossible value into any type.
    pub fn absurd<T>(self) -> T {
        match self {}
    }
}

impl fmt::Display for Nothing {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl StdError for Nothing {}

impl From<Nothing> for std::convert::Infallible {
    fn from(never: Nothing) -> Self {
        never.absurd()
    }
}
