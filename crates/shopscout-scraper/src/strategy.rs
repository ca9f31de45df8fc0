//! Building blocks for field strategies.
//!
//! Every helper returns a closure suitable for [`FieldChain::then`]. Values
//! are cleaned on the way out: trimmed, and rejected when empty or when they
//! contain the `N/A` marker.
//!
//! [`FieldChain::then`]: crate::chain::FieldChain::then

use regex::Regex;
use shopscout_core::UNAVAILABLE;

use crate::chain::Listing;
use crate::error::ExtractError;

type Resolved<T> = Result<Option<T>, ExtractError>;

/// Trims `raw`, rejecting empty values and values containing `N/A`.
#[must_use]
pub fn clean(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(UNAVAILABLE) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Length in characters, which is what every length window is measured in.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Text of the first element matching `selector`.
pub fn text_at(selector: &str) -> impl Fn(&Listing<'_>) -> Resolved<String> + '_ {
    move |listing| {
        Ok(listing
            .node()
            .select_first(selector)?
            .and_then(|node| clean(&node.text(true))))
    }
}

/// Text of the first element matching `selector`, kept only if `accept`
/// approves it. Later matches are not considered.
pub fn text_at_where<'s, P>(
    selector: &'s str,
    accept: P,
) -> impl Fn(&Listing<'_>) -> Resolved<String> + 's
where
    P: Fn(&str) -> bool + 's,
{
    move |listing| {
        Ok(listing
            .node()
            .select_first(selector)?
            .and_then(|node| clean(&node.text(true)))
            .filter(|text| accept(text)))
    }
}

/// Tries each selector in turn, taking the first element of each, until one
/// yields text that `accept` approves.
pub fn first_text_where<'s, P>(
    selectors: &'s [&'s str],
    accept: P,
) -> impl Fn(&Listing<'_>) -> Resolved<String> + 's
where
    P: Fn(&str) -> bool + 's,
{
    move |listing| {
        for selector in selectors {
            let text = listing
                .node()
                .select_first(selector)?
                .and_then(|node| clean(&node.text(true)));
            if let Some(text) = text.filter(|t| accept(t)) {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

/// Attribute `name` of the first element matching `selector`.
pub fn attr_at<'s>(
    selector: &'s str,
    name: &'s str,
) -> impl Fn(&Listing<'_>) -> Resolved<String> + 's {
    move |listing| {
        Ok(listing
            .node()
            .select_first(selector)?
            .and_then(|node| node.attr(name))
            .and_then(clean))
    }
}

/// Attribute `name` of the container element itself.
pub fn own_attr(name: &str) -> impl Fn(&Listing<'_>) -> Resolved<String> + '_ {
    move |listing| Ok(listing.node().attr(name).and_then(clean))
}

/// Capture group 1 of the first match of `re` in the flattened text, kept
/// only if `accept` approves it.
pub fn pattern_where<'s, P>(
    re: &'s Regex,
    accept: P,
) -> impl Fn(&Listing<'_>) -> Resolved<String> + 's
where
    P: Fn(&str) -> bool + 's,
{
    move |listing| {
        Ok(re
            .captures(listing.flat_text())
            .and_then(|caps| caps.get(1))
            .and_then(|m| clean(m.as_str()))
            .filter(|text| accept(text)))
    }
}

/// Capture group 1 of the first match of `re` in the flattened text.
pub fn pattern(re: &Regex) -> impl Fn(&Listing<'_>) -> Resolved<String> + '_ {
    pattern_where(re, |_| true)
}

/// `value` whenever `phrase` occurs in the flattened text.
pub fn phrase_yields<'s>(
    phrase: &'s str,
    value: &'s str,
) -> impl Fn(&Listing<'_>) -> Resolved<String> + 's {
    move |listing| Ok(listing.contains_text(phrase).then(|| value.to_string()))
}

/// Always `value`; used to end a chain with a site's documented default.
pub fn constant(value: &str) -> impl Fn(&Listing<'_>) -> Resolved<String> + '_ {
    move |_| Ok(Some(value.to_string()))
}

/// Parses a number that may carry thousands separators, e.g. `"18,721"`.
#[must_use]
pub fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

/// A boolean marker: set when the marker element is present (and, if
/// `marker_text` is given, its text contains it) or when any of `phrases`
/// appears in the flattened text.
#[derive(Debug, Clone, Copy)]
pub struct FlagRule {
    pub marker: Option<&'static str>,
    pub marker_text: Option<&'static str>,
    pub phrases: &'static [&'static str],
}

impl FlagRule {
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidSelector`] if `marker` is not valid CSS.
    pub fn holds(&self, listing: &Listing<'_>) -> Result<bool, ExtractError> {
        if let Some(marker) = self.marker {
            if let Some(node) = listing.node().select_first(marker)? {
                let text_ok = self
                    .marker_text
                    .is_none_or(|wanted| node.text(false).contains(wanted));
                if text_ok {
                    return Ok(true);
                }
            }
        }
        Ok(self.phrases.iter().any(|p| listing.contains_text(p)))
    }
}

/// De-duplicating, capped accumulator for list-valued fields.
#[derive(Debug)]
pub struct Fragments {
    items: Vec<String>,
    cap: usize,
}

impl Fragments {
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    /// Adds `raw` after cleaning. Duplicates and anything past the cap are
    /// dropped. Returns whether the value was kept.
    pub fn push(&mut self, raw: &str) -> bool {
        if self.is_full() {
            return false;
        }
        match clean(raw) {
            Some(text) if !self.items.contains(&text) => {
                self.items.push(text);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// True if the lowercased `text` contains any of `stoplist`.
#[must_use]
pub fn mentions_any(text: &str, stoplist: &[&str]) -> bool {
    let lower = text.to_lowercase();
    stoplist.iter().any(|word| lower.contains(word))
}
