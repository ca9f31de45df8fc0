//! amazon.com search results.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use shopscout_core::{AmazonFlags, Site, SiteFlags};

use crate::chain::{FieldChain, Listing};
use crate::error::{ExtractError, FetchError};
use crate::extract::{search_url_with_params, ParsedListing, Retailer};
use crate::links::product_url;
use crate::strategy::{
    attr_at, char_len, clean, constant, mentions_any, own_attr, parse_count, pattern,
    pattern_where, text_at, text_at_where, FlagRule, Fragments,
};
use crate::tuning::{
    ARIA_REVIEW_COUNT_MIN, BADGE_MAX_LEN, BRAND_ELEMENT_MAX_LEN, DERIVED_BRAND_MAX_LEN,
    LIST_FIELD_CAP, RATING_MAX, SPEC_LEN_WINDOW,
};

pub const AMAZON_ORIGIN: &str = "https://www.amazon.com";

/// One selector (or selector list) per field.
#[derive(Debug)]
pub struct AmazonSelectors {
    pub containers: &'static [&'static str],
    pub name: &'static [&'static str],
    pub title_link: &'static str,
    pub product_link: &'static str,
    pub detail_link: &'static str,
    pub price_whole: &'static str,
    pub price_fraction: &'static str,
    pub price_offscreen: &'static str,
    pub original_price: &'static str,
    pub discount_badge: &'static str,
    pub rating_alt: &'static str,
    pub rating_star: &'static str,
    pub review_count: &'static str,
    pub review_aria: &'static str,
    pub delivery_text: &'static str,
    pub delivery_aria: &'static str,
    pub badge_text: &'static str,
    pub badge_choice: &'static str,
    pub image: &'static str,
    pub brand: &'static str,
    pub byline: &'static str,
    pub availability: &'static str,
    pub specs: &'static str,
    pub prime: &'static str,
    pub sponsored: &'static str,
}

pub const AMAZON_SELECTORS: AmazonSelectors = AmazonSelectors {
    containers: &[
        r#"div[data-component-type="s-search-result"]"#,
        "div.s-result-item[data-asin]",
    ],
    name: &["h2 a span", "h2 span"],
    title_link: "h2 a",
    product_link: "a.a-link-normal.s-no-outline",
    detail_link: r#"a[href*="/dp/"]"#,
    price_whole: "span.a-price-whole",
    price_fraction: "span.a-price-fraction",
    price_offscreen: "span.a-price span.a-offscreen",
    original_price: "span.a-price.a-text-price span.a-offscreen",
    discount_badge: "span.a-badge-label-inner",
    rating_alt: "span.a-icon-alt",
    rating_star: r#"i[class*="a-star"]"#,
    review_count: "span.a-size-base.s-underline-text",
    review_aria: "span[aria-label]",
    delivery_text: "span.a-color-base.a-text-bold",
    delivery_aria: r#"span[aria-label*="delivery"], span[aria-label*="Delivery"]"#,
    badge_text: "span.a-badge-text",
    badge_choice: r#"span[data-a-badge-color*="sx"]"#,
    image: "img.s-image",
    brand: "h5 span.a-size-base",
    byline: "div.a-row.a-size-base.a-color-secondary span.a-size-base",
    availability: "span.a-color-price, span.a-color-success",
    specs: "span.a-size-base",
    prime: "i.a-icon-prime",
    sponsored: "span.puis-label-popover-default",
};

impl AmazonSelectors {
    /// Every selector in the table, for validation.
    #[must_use]
    pub fn all(&self) -> Vec<&'static str> {
        let mut all: Vec<&'static str> = self.containers.to_vec();
        all.extend_from_slice(self.name);
        all.extend_from_slice(&[
            self.title_link,
            self.product_link,
            self.detail_link,
            self.price_whole,
            self.price_fraction,
            self.price_offscreen,
            self.original_price,
            self.discount_badge,
            self.rating_alt,
            self.rating_star,
            self.review_count,
            self.review_aria,
            self.delivery_text,
            self.delivery_aria,
            self.badge_text,
            self.badge_choice,
            self.image,
            self.brand,
            self.byline,
            self.availability,
            self.specs,
            self.prime,
            self.sponsored,
        ]);
        all
    }
}

static DETAIL_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/[^/]+/dp/[A-Z0-9]{10})").expect("valid detail path regex"));
static DOLLAR_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d+(?:,\d{3})*(?:\.\d{2})?)").expect("valid dollar price regex")
});
static STARS_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.?\d*)\s+out\s+of\s+5\s+stars").expect("valid stars regex")
});
static ARIA_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)").expect("valid aria count regex"));
static RATINGS_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:,\d{3})+)\s*(?:ratings?|reviews?)").expect("valid ratings regex")
});
static PAREN_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{1,3}(?:,\d{3})+)\)").expect("valid paren count regex"));
static DELIVERY_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:FREE|Get it|Arrives?)\s+(?:by\s+)?([A-Z][a-z]+,?\s+[A-Z][a-z]+\s+\d+|[Tt]omorrow|[Tt]oday)",
    )
    .expect("valid delivery regex")
});

const DELIVERY_WORDS: &[&str] = &["delivery", "arrives", "get it", "tomorrow", "today"];
const BYLINE_STOPLIST: &[&str] = &["visit", "store", "shop"];
const SPEC_STOPLIST: &[&str] = &["sponsored", "visit", "shop", "store", "see more", "amazon"];

const PRIME: FlagRule = FlagRule {
    marker: Some(AMAZON_SELECTORS.prime),
    marker_text: None,
    phrases: &[],
};
const SPONSORED: FlagRule = FlagRule {
    marker: Some(AMAZON_SELECTORS.sponsored),
    marker_text: Some("Sponsored"),
    phrases: &[],
};
const SMALL_BUSINESS: FlagRule = FlagRule {
    marker: None,
    marker_text: None,
    phrases: &["Small Business"],
};
const CLIMATE_PLEDGE: FlagRule = FlagRule {
    marker: None,
    marker_text: None,
    phrases: &["Climate Pledge"],
};

/// amazon.com, or any host serving the same markup.
#[derive(Debug, Clone)]
pub struct Amazon {
    origin: String,
}

impl Default for Amazon {
    fn default() -> Self {
        Self::with_origin(AMAZON_ORIGIN)
    }
}

impl Amazon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points searches and link resolution at `origin` (e.g. a mock server).
    #[must_use]
    pub fn with_origin(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// `href` of the first `selector` match, as an absolute product URL.
    fn link(
        &self,
        selector: &'static str,
    ) -> impl Fn(&Listing<'_>) -> Result<Option<String>, ExtractError> + '_ {
        move |listing| {
            Ok(listing
                .node()
                .select_first(selector)?
                .and_then(|node| node.attr("href"))
                .and_then(|href| product_url(&self.origin, href, &DETAIL_PATH)))
        }
    }
}

/// Whole and fractional price parts joined with a single decimal point and
/// thousands separators dropped: `"1,299."` + `"99"` is `"$1299.99"`.
fn split_price(listing: &Listing<'_>) -> Result<Option<String>, ExtractError> {
    let sel = &AMAZON_SELECTORS;
    let Some(whole) = listing.node().select_first(sel.price_whole)? else {
        return Ok(None);
    };
    let whole: String = whole
        .text(true)
        .trim_end_matches('.')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if whole.is_empty() {
        return Ok(None);
    }
    let fraction = listing
        .node()
        .select_first(sel.price_fraction)?
        .and_then(|node| clean(&node.text(true)));
    let price = match fraction {
        Some(fraction) => format!("${whole}.{fraction}"),
        None => format!("${whole}"),
    };
    Ok(clean(&price))
}

/// Review count element: digits with optional separators, or a short form
/// like `"1.2K"`. The original text is kept.
fn looks_like_count(text: &str) -> bool {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    let compact: String = digits.chars().filter(|c| *c != '.' && *c != 'K').collect();
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    all_digits(&digits) || all_digits(&compact)
}

fn rating_in_range(value: &str) -> bool {
    value
        .parse::<f64>()
        .is_ok_and(|v| (0.0..=RATING_MAX).contains(&v))
}

fn badges(listing: &Listing<'_>) -> Result<Vec<String>, ExtractError> {
    let sel = &AMAZON_SELECTORS;
    let mut badges = Fragments::with_cap(LIST_FIELD_CAP);
    for node in listing.node().select(sel.badge_text)? {
        let text = node.text(true);
        if !text.contains('%') && char_len(&text) < BADGE_MAX_LEN {
            badges.push(&text);
        }
    }
    if let Some(choice) = listing.node().select_first(sel.badge_choice)? {
        badges.push(&choice.text(true));
    }
    if listing.contains_text("Best Seller") {
        badges.push("Best Seller");
    }
    Ok(badges.into_vec())
}

fn specifications(listing: &Listing<'_>) -> Result<Vec<String>, ExtractError> {
    let (min, max) = SPEC_LEN_WINDOW;
    let mut specs = Fragments::with_cap(LIST_FIELD_CAP);
    for node in listing.node().select(AMAZON_SELECTORS.specs)? {
        let text = node.text(true);
        let len = char_len(&text);
        if min < len && len < max && !text.contains('$') && !mentions_any(&text, SPEC_STOPLIST) {
            specs.push(&text);
        }
        if specs.is_full() {
            break;
        }
    }
    Ok(specs.into_vec())
}

impl Retailer for Amazon {
    fn site(&self) -> Site {
        Site::Amazon
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        search_url_with_params(&self.origin, "/s", &[("k", query), ("ref", "nb_sb_noss")])
    }

    fn container_selectors(&self) -> &[&'static str] {
        AMAZON_SELECTORS.containers
    }

    fn parse_listing(&self, listing: &Listing<'_>) -> Result<ParsedListing, ExtractError> {
        let sel = &AMAZON_SELECTORS;

        let source_id = FieldChain::new("source_id")
            .then(own_attr("data-asin"))
            .resolve(listing)?;

        let mut name_chain = FieldChain::new("name");
        for selector in sel.name {
            name_chain = name_chain.then(text_at(selector));
        }
        let name = name_chain.resolve(listing)?;

        let url = FieldChain::new("url")
            .then(self.link(sel.title_link))
            .then(self.link(sel.product_link))
            .then(self.link(sel.detail_link))
            .then(|_| Ok(source_id.as_ref().map(|asin| format!("{}/dp/{asin}", self.origin))))
            .resolve(listing)?;

        let price = FieldChain::new("price")
            .then(split_price)
            .then(text_at(sel.price_offscreen))
            .then(|l: &Listing<'_>| Ok(pattern(&DOLLAR_PRICE)(l)?.map(|p| format!("${p}"))))
            .resolve(listing)?;

        let original_price = FieldChain::new("original_price")
            .then(text_at(sel.original_price))
            .resolve(listing)?;

        let discount = FieldChain::new("discount")
            .then(text_at_where(sel.discount_badge, |t| t.contains('%')))
            .resolve(listing)?;

        let rating = FieldChain::new("rating")
            .then(text_at(sel.rating_alt))
            .then(|l: &Listing<'_>| {
                Ok(attr_at(sel.rating_star, "aria-label")(l)?.filter(|a| a.contains("out of")))
            })
            .then(|l: &Listing<'_>| {
                Ok(pattern_where(&STARS_PHRASE, rating_in_range)(l)?
                    .map(|r| format!("{r} out of 5 stars")))
            })
            .resolve(listing)?;

        let review_count = FieldChain::new("review_count")
            .then(text_at_where(sel.review_count, looks_like_count))
            .then(|l: &Listing<'_>| {
                let aria = attr_at(sel.review_aria, "aria-label")(l)?;
                Ok(aria.and_then(|aria| {
                    ARIA_COUNT
                        .find(&aria)
                        .map(|m| m.as_str().to_string())
                        .filter(|n| parse_count(n).is_some_and(|n| n > ARIA_REVIEW_COUNT_MIN))
                }))
            })
            .then(pattern(&RATINGS_PHRASE))
            .then(pattern(&PAREN_COUNT))
            .resolve(listing)?;

        let delivery = FieldChain::new("delivery")
            .then(text_at_where(sel.delivery_text, |t| mentions_any(t, DELIVERY_WORDS)))
            .then(attr_at(sel.delivery_aria, "aria-label"))
            .then(|l: &Listing<'_>| {
                Ok(DELIVERY_PHRASE
                    .find(l.flat_text())
                    .and_then(|m| clean(m.as_str())))
            })
            .resolve(listing)?;

        let brand = FieldChain::new("brand")
            .then(text_at_where(sel.brand, |t| char_len(t) < BRAND_ELEMENT_MAX_LEN))
            .then(text_at_where(sel.byline, |t| {
                char_len(t) < BRAND_ELEMENT_MAX_LEN && !mentions_any(t, BYLINE_STOPLIST)
            }))
            .then(|_| {
                let leading = name
                    .as_deref()
                    .map(|n| n.split_whitespace().take(2).collect::<Vec<_>>().join(" "));
                Ok(leading
                    .and_then(|b| clean(&b))
                    .filter(|b| char_len(b) < DERIVED_BRAND_MAX_LEN))
            })
            .resolve(listing)?;

        let image_url = FieldChain::new("image_url")
            .then(attr_at(sel.image, "src"))
            .resolve(listing)?;

        let availability = FieldChain::new("availability")
            .then(text_at(sel.availability))
            .then(constant("In Stock"))
            .resolve(listing)?;

        let flags = AmazonFlags {
            prime_eligible: PRIME.holds(listing)?,
            sponsored: SPONSORED.holds(listing)?,
            small_business: SMALL_BUSINESS.holds(listing)?,
            climate_pledge: CLIMATE_PLEDGE.holds(listing)?,
        };

        Ok(ParsedListing {
            name,
            source_id,
            url,
            price,
            original_price,
            discount,
            rating,
            review_count,
            brand,
            image_url,
            delivery,
            availability,
            badges: badges(listing)?,
            highlights: specifications(listing)?,
            flags: SiteFlags::Amazon(flags),
        })
    }
}

#[cfg(test)]
#[path = "amazon_test.rs"]
mod tests;
