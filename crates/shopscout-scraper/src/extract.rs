//! Turning a results page into ranked records.

use reqwest::Url;
use shopscout_core::{ProductRecord, Site, SiteFlags};

use crate::chain::Listing;
use crate::document::{Document, Node};
use crate::error::{ExtractError, FetchError};

/// Per-site knowledge: where to search, how to find product containers and
/// how to resolve one container into fields.
pub trait Retailer {
    fn site(&self) -> Site;

    /// Scheme and host every relative link is resolved against.
    fn origin(&self) -> &str;

    /// Search URL for `query`, form-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the origin is not a valid base.
    fn search_url(&self, query: &str) -> Result<Url, FetchError>;

    /// Container selectors, most specific first.
    fn container_selectors(&self) -> &[&'static str];

    /// Resolves every field of one container.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if a selector in the site's table is invalid.
    fn parse_listing(&self, listing: &Listing<'_>) -> Result<ParsedListing, ExtractError>;
}

/// Builds `<origin><path>?<params>` with form-encoded parameters.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if `origin` does not parse.
pub fn search_url_with_params(
    origin: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Url, FetchError> {
    let base = format!("{}{path}", origin.trim_end_matches('/'));
    Url::parse_with_params(&base, params).map_err(|e| FetchError::InvalidUrl {
        base,
        reason: e.to_string(),
    })
}

/// Every field of one container, before the inclusion gate. `name` is the
/// only field a record cannot exist without.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedListing {
    pub name: Option<String>,
    pub source_id: Option<String>,
    pub url: Option<String>,
    pub price: Option<String>,
    pub original_price: Option<String>,
    pub discount: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub delivery: Option<String>,
    pub availability: Option<String>,
    pub badges: Vec<String>,
    pub highlights: Vec<String>,
    pub flags: SiteFlags,
}

impl ParsedListing {
    /// The ranked record, or `None` if the listing fails the inclusion gate.
    #[must_use]
    pub fn into_record(self, rank: u32) -> Option<ProductRecord> {
        Some(ProductRecord {
            rank,
            name: self.name?,
            source_id: self.source_id,
            url: self.url,
            price: self.price,
            original_price: self.original_price,
            discount: self.discount,
            rating: self.rating,
            review_count: self.review_count,
            brand: self.brand,
            image_url: self.image_url,
            delivery: self.delivery,
            availability: self.availability,
            badges: self.badges,
            highlights: self.highlights,
            flags: self.flags,
        })
    }
}

/// A listing becomes a record if and only if its name resolved.
#[must_use]
pub fn passes_inclusion_gate(listing: &ParsedListing) -> bool {
    listing.name.is_some()
}

/// What `max_results` limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultCap {
    /// Inspect at most `max_results` containers; nameless ones still count,
    /// so fewer records may come back.
    #[default]
    Containers,
    /// Keep inspecting until `max_results` records are retained.
    Records,
}

/// Runs the container selectors in order and returns the matches of the
/// first one that finds anything. Invalid selectors are skipped.
pub fn discover_containers<'d, R>(retailer: &R, doc: &'d Document) -> Vec<Node<'d>>
where
    R: Retailer + ?Sized,
{
    for selector in retailer.container_selectors() {
        match doc.select(selector) {
            Ok(nodes) if !nodes.is_empty() => {
                tracing::debug!(
                    site = %retailer.site(),
                    selector,
                    count = nodes.len(),
                    "found product containers"
                );
                return nodes;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(site = %retailer.site(), error = %err, "skipping container selector");
            }
        }
    }
    Vec::new()
}

/// Extracts ranked records from a results page.
///
/// Ranks are dense from 1 over the records kept. A container that raises an
/// [`ExtractError`] is skipped and extraction carries on with the next.
pub fn extract_listings<R>(
    retailer: &R,
    doc: &Document,
    max_results: usize,
    cap: ResultCap,
) -> Vec<ProductRecord>
where
    R: Retailer + ?Sized,
{
    let site = retailer.site();
    let containers = discover_containers(retailer, doc);
    if containers.is_empty() {
        tracing::info!(%site, "no product containers found; the page may be blocked or its layout changed");
        return Vec::new();
    }

    let mut records: Vec<ProductRecord> = Vec::new();
    for (index, node) in containers.into_iter().enumerate() {
        let limit_reached = match cap {
            ResultCap::Containers => index >= max_results,
            ResultCap::Records => records.len() >= max_results,
        };
        if limit_reached {
            break;
        }

        let parsed = match retailer.parse_listing(&Listing::new(node)) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(%site, container = index + 1, error = %err, "skipping listing");
                continue;
            }
        };
        if !passes_inclusion_gate(&parsed) {
            tracing::debug!(%site, container = index + 1, "listing has no name; dropped");
            continue;
        }

        let rank = u32::try_from(records.len() + 1).unwrap_or(u32::MAX);
        if let Some(record) = parsed.into_record(rank) {
            tracing::debug!(%site, rank, name = %record.name, "extracted listing");
            records.push(record);
        }
    }

    tracing::info!(%site, count = records.len(), "extracted products");
    records
}
