use std::fmt;

use serde::{Deserialize, Serialize};

/// Text shown in place of a field that was checked but could not be resolved.
///
/// Serialized records carry `null` for such fields; this marker is only used
/// when rendering. Resolved values never contain it.
pub const UNAVAILABLE: &str = "N/A";

/// Retail site a record was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Amazon,
    Flipkart,
}

impl Site {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Site::Amazon => "amazon",
            Site::Flipkart => "flipkart",
        }
    }

    /// Display label, e.g. `"Amazon"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Site::Amazon => "Amazon",
            Site::Flipkart => "Flipkart",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product listing from a search-results page, normalized so that both
/// sites share field names for everything they have in common.
///
/// Unresolved fields are `None` and serialize as an explicit `null`; no key is
/// ever omitted. A record only exists when its `name` was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// 1-based position among the records kept from one results page.
    pub rank: u32,
    /// ASIN on Amazon, `data-id` on Flipkart.
    pub source_id: Option<String>,
    pub name: String,
    /// Absolute product detail URL with tracking parameters dropped when the
    /// raw link was implausibly long.
    pub url: Option<String>,
    /// Currency-formatted, e.g. `"$1299.99"` or `"₹1,299"`.
    pub price: Option<String>,
    pub original_price: Option<String>,
    pub discount: Option<String>,
    /// Free text, e.g. `"4.5 out of 5 stars"` or `"4.3 ★"`.
    pub rating: Option<String>,
    /// Free text, thousands separators preserved, e.g. `"18,721"`.
    pub review_count: Option<String>,
    /// Best-effort; may be derived from the leading words of `name`.
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub delivery: Option<String>,
    pub availability: Option<String>,
    /// Short labels such as `"Best Seller"`, de-duplicated, in page order.
    pub badges: Vec<String>,
    /// Specification or highlight fragments, de-duplicated, in page order.
    pub highlights: Vec<String>,
    #[serde(flatten)]
    pub flags: SiteFlags,
}

/// Site-specific markers, flattened into the record next to a `site` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "site", rename_all = "snake_case")]
pub enum SiteFlags {
    Amazon(AmazonFlags),
    Flipkart(FlipkartFlags),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmazonFlags {
    pub prime_eligible: bool,
    pub sponsored: bool,
    pub small_business: bool,
    pub climate_pledge: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipkartFlags {
    pub assured: bool,
    pub plus: bool,
    pub emi_available: bool,
    pub exchange_offer: bool,
    pub bank_offer: Option<String>,
}

impl SiteFlags {
    #[must_use]
    pub fn site(&self) -> Site {
        match self {
            SiteFlags::Amazon(_) => Site::Amazon,
            SiteFlags::Flipkart(_) => Site::Flipkart,
        }
    }
}

impl ProductRecord {
    #[must_use]
    pub fn site(&self) -> Site {
        self.flags.site()
    }

    /// Shared optional text fields, in a fixed order, paired with their names.
    #[must_use]
    pub fn text_fields(&self) -> [(&'static str, Option<&str>); 12] {
        [
            ("source_id", self.source_id.as_deref()),
            ("url", self.url.as_deref()),
            ("price", self.price.as_deref()),
            ("original_price", self.original_price.as_deref()),
            ("discount", self.discount.as_deref()),
            ("rating", self.rating.as_deref()),
            ("review_count", self.review_count.as_deref()),
            ("brand", self.brand.as_deref()),
            ("image_url", self.image_url.as_deref()),
            ("delivery", self.delivery.as_deref()),
            ("availability", self.availability.as_deref()),
            ("name", Some(self.name.as_str())),
        ]
    }

    /// Number of fields carrying a value, counting `rank`, the shared text
    /// fields, non-empty lists and set flags.
    #[must_use]
    pub fn filled_field_count(&self) -> usize {
        let text = self.text_fields().iter().filter(|(_, v)| v.is_some()).count();
        let lists =
            usize::from(!self.badges.is_empty()) + usize::from(!self.highlights.is_empty());
        let flags = match &self.flags {
            SiteFlags::Amazon(f) => count_set(&[
                f.prime_eligible,
                f.sponsored,
                f.small_business,
                f.climate_pledge,
            ]),
            SiteFlags::Flipkart(f) => {
                count_set(&[f.assured, f.plus, f.emi_available, f.exchange_offer])
                    + usize::from(f.bank_offer.is_some())
            }
        };
        1 + text + lists + flags
    }

    /// Total number of fields [`Self::filled_field_count`] can count.
    #[must_use]
    pub fn total_field_count(&self) -> usize {
        let flags = match self.flags {
            SiteFlags::Amazon(_) => 4,
            SiteFlags::Flipkart(_) => 5,
        };
        1 + self.text_fields().len() + 2 + flags
    }
}

fn count_set(flags: &[bool]) -> usize {
    flags.iter().filter(|set| **set).count()
}

/// Renders an optional field, substituting [`UNAVAILABLE`].
#[must_use]
pub fn or_unavailable(value: Option<&str>) -> &str {
    value.unwrap_or(UNAVAILABLE)
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
