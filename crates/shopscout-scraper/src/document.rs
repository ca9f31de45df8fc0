//! Queryable HTML documents backed by the `scraper` crate.

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

/// A parsed results page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw response bytes. Invalid UTF-8 is replaced, never rejected.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        Self {
            html: Html::parse_document(&text),
        }
    }

    #[must_use]
    pub fn parse_str(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidSelector`] if `selector` is not valid CSS.
    pub fn select(&self, selector: &str) -> Result<Vec<Node<'_>>, ExtractError> {
        let selector = compile(selector)?;
        Ok(self.html.select(&selector).map(Node::new).collect())
    }
}

/// One element of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Concatenated text of the element and its descendants. With `trim`,
    /// leading and trailing whitespace is removed.
    #[must_use]
    pub fn text(&self, trim: bool) -> String {
        let text: String = self.element.text().collect();
        if trim {
            text.trim().to_string()
        } else {
            text
        }
    }

    /// Text of the element and its descendants with text nodes separated by
    /// a single space. Whitespace runs collapse and the ends are trimmed.
    #[must_use]
    pub fn spaced_text(&self) -> String {
        self.element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Descendants matching `selector`, in document order. The element
    /// itself is never included.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidSelector`] if `selector` is not valid CSS.
    pub fn select(&self, selector: &str) -> Result<Vec<Node<'a>>, ExtractError> {
        let selector = compile(selector)?;
        Ok(self.element.select(&selector).map(Node::new).collect())
    }

    /// First descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidSelector`] if `selector` is not valid CSS.
    pub fn select_first(&self, selector: &str) -> Result<Option<Node<'a>>, ExtractError> {
        let selector = compile(selector)?;
        Ok(self.element.select(&selector).next().map(Node::new))
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
