//! Tracing spans around effect evaluation.
//!
//! Feature-gated behind `#[cfg(feature = "tracing")]`.

use crate::effect::node::{Link, Node};
use crate::effect::Effect;

impl<R, E, A> Effect<R, E, A>
where
    R: 'static,
    E: Send + 'static,
    A: Send + 'static,
{
    /// Evaluate this effect inside `span`.
    ///
    /// The span is entered when evaluation reaches this effect and exited once
    /// it has produced its outcome, including everything its continuations
    /// run in between.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tidepool::Effect;
    /// use tracing::info_span;
    ///
    /// let effect = Effect::<(), String, _>::pure(42)
    ///     .map(|x| x + 1)
    ///     .instrument(info_span!("compute", step = 1));
    /// ```
    pub fn instrument(self, span: ::tracing::Span) -> Self {
        Effect::from_node(Node::Instrument {
            source: Link::new(self.into_node()),
            span,
        })
    }
}
