//! Ordered fallback chains: each field is resolved by trying strategies in
//! turn until one yields a value.

use crate::document::Node;
use crate::error::ExtractError;

/// One product container plus its flattened text, computed once and shared
/// by every free-text strategy.
pub struct Listing<'a> {
    node: Node<'a>,
    flat_text: String,
}

impl<'a> Listing<'a> {
    #[must_use]
    pub fn new(node: Node<'a>) -> Self {
        let flat_text = node.spaced_text();
        Self { node, flat_text }
    }

    #[must_use]
    pub fn node(&self) -> Node<'a> {
        self.node
    }

    /// All text of the container, one space between text nodes.
    #[must_use]
    pub fn flat_text(&self) -> &str {
        &self.flat_text
    }

    #[must_use]
    pub fn contains_text(&self, phrase: &str) -> bool {
        self.flat_text.contains(phrase)
    }
}

type Strategy<'s, T> = Box<dyn Fn(&Listing<'_>) -> Result<Option<T>, ExtractError> + 's>;

/// A named, ordered list of strategies. The first strategy returning
/// `Some` wins and later ones are never run.
pub struct FieldChain<'s, T> {
    field: &'static str,
    strategies: Vec<Strategy<'s, T>>,
}

impl<'s, T> FieldChain<'s, T> {
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    #[must_use]
    pub fn then<S>(mut self, strategy: S) -> Self
    where
        S: Fn(&Listing<'_>) -> Result<Option<T>, ExtractError> + 's,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Runs the strategies in order.
    ///
    /// `Ok(None)` means every strategy came up empty, which is an expected
    /// outcome and only noted at debug level.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExtractError`] raised by a strategy. Strategies
    /// after it are not run.
    pub fn resolve(&self, listing: &Listing<'_>) -> Result<Option<T>, ExtractError> {
        for strategy in &self.strategies {
            if let Some(value) = strategy(listing)? {
                return Ok(Some(value));
            }
        }
        tracing::debug!(field = self.field, "no strategy resolved field");
        Ok(None)
    }
}
