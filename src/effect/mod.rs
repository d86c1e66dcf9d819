//! Effect type for describing computations that need an environment and may fail.
//!
//! An [`Effect<R, E, A>`] is a *description*: building one runs nothing and
//! never looks at the environment. Only [`Effect::provide`] interprets the
//! description, against an environment `R`, producing `Ok(A)` or `Err(E)`.
//!
//! # Core Concepts
//!
//! - **Environment**: capabilities are read through [`Effect::access_m`], so
//!   the same program runs against a live or a fake environment.
//! - **Typed errors**: failures are values in the `E` channel. Host faults
//!   raised inside [`Effect::from`] thunks are captured as [`Fault`](crate::Fault)s.
//! - **Reusable**: an effect can be provided any number of times; every
//!   evaluation is independent.
//! - **Stack safe**: evaluation is a loop over an explicit continuation
//!   stack, so long chains and recursive programs do not overflow.
//!
//! # Examples
//!
//! ## Composing effects
//!
//! ```
//! use tidepool::Effect;
//!
//! let effect = Effect::<(), String, _>::pure(5)
//!     .map(|x| x * 2)
//!     .flat_map(|x| Effect::pure(x + 10));
//!
//! assert_eq!(effect.provide(&()), Ok(20));
//! ```
//!
//! ## Capturing faults
//!
//! ```
//! use tidepool::Effect;
//!
//! let parse = |input: &'static str| Effect::<(), _, _>::from(move || input.parse::<i32>());
//!
//! assert_eq!(parse("1").map(|x| x + 1).provide(&()).ok(), Some(2));
//!
//! let failed = parse("lskjdf").map_error(|fault| fault.message());
//! assert_eq!(failed.provide(&()), Err("invalid digit found in string".to_string()));
//! ```
//!
//! ## Using the environment
//!
//! ```
//! use tidepool::Effect;
//!
//! struct Env {
//!     multiplier: i32,
//! }
//!
//! let effect = Effect::<Env, String, _>::access_m(|env: &Env| Effect::pure(env.multiplier * 2));
//! assert_eq!(effect.provide(&Env { multiplier: 21 }), Ok(42));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

mod combinators;
mod constructors;
mod context;
pub(crate) mod node;
mod runtime;
#[cfg(feature = "tracing")]
mod tracing;

pub use constructors::{access, access_m, exec, pure, raise_error};

use node::{Link, Node};

/// A lazy, reusable description of a computation.
///
/// `Effect<R, E, A>` needs an environment `R` to run, and either fails with
/// an `E` or succeeds with an `A`.
///
/// Cloning is cheap: clones share the same immutable tree.
///
/// # Examples
///
/// ```
/// use tidepool::Effect;
///
/// let effect: Effect<(), String, i32> = Effect::raise_error("boom".to_string());
/// assert_eq!(effect.provide(&()), Err("boom".to_string()));
///
/// let recovered = effect.or_else(|| Effect::pure(2));
/// assert_eq!(recovered.provide(&()), Ok(2));
/// ```
pub struct Effect<R: 'static, E, A> {
    node: Link<R>,
    _types: PhantomData<fn() -> (E, A)>,
}

impl<R: 'static, E, A> Effect<R, E, A> {
    pub(crate) fn from_node(node: Node<R>) -> Self {
        Effect::from_shared(Arc::new(node))
    }

    pub(crate) fn from_shared(node: Arc<Node<R>>) -> Self {
        Effect {
            node: Link::new(node),
            _types: PhantomData,
        }
    }

    pub(crate) fn root(&self) -> &Arc<Node<R>> {
        self.node.node()
    }

    pub(crate) fn into_node(self) -> Arc<Node<R>> {
        self.node.into_inner()
    }
}

impl<R: 'static, E, A> Clone for Effect<R, E, A> {
    fn clone(&self) -> Self {
        Effect::from_shared(Arc::clone(self.root()))
    }
}

// Manual Debug since the tree holds closures
impl<R: 'static, E, A> fmt::Debug for Effect<R, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("root", &self.root().kind())
            .finish()
    }
}
