//! flipkart.com search results.
//!
//! Flipkart ships obfuscated, frequently rotated class names, so most fields
//! try several known class selectors before falling back to patterns over
//! the card's text.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use shopscout_core::{FlipkartFlags, Site, SiteFlags};

use crate::chain::{FieldChain, Listing};
use crate::error::{ExtractError, FetchError};
use crate::extract::{search_url_with_params, ParsedListing, Retailer};
use crate::links::{absolutize, product_url};
use crate::strategy::{
    attr_at, char_len, clean, constant, first_text_where, own_attr, parse_count, pattern,
    pattern_where, phrase_yields, FlagRule, Fragments,
};
use crate::tuning::{
    BANK_OFFER_MAX_LEN, BLOCK_HIGHLIGHT_LEN_WINDOW, BRAND_ELEMENT_MAX_LEN, DERIVED_BRAND_MAX_LEN,
    HIGHLIGHT_SCAN_LIMIT, LIST_FIELD_CAP, LIST_HIGHLIGHT_MIN_LEN, NAME_ELEMENT_MIN_LEN,
    NAME_LINK_MIN_LEN, RATING_MAX, TEXT_REVIEW_COUNT_MIN,
};

pub const FLIPKART_ORIGIN: &str = "https://www.flipkart.com";

/// One selector list per field, tried in order.
#[derive(Debug)]
pub struct FlipkartSelectors {
    pub containers: &'static [&'static str],
    pub titled_link: &'static str,
    pub name: &'static [&'static str],
    pub any_link: &'static str,
    pub product_link: &'static str,
    pub price: &'static [&'static str],
    pub original_price: &'static [&'static str],
    pub discount: &'static [&'static str],
    pub rating: &'static [&'static str],
    pub review_count: &'static [&'static str],
    pub image: &'static str,
    pub lazy_image: &'static str,
    pub highlight_list: &'static str,
    pub highlight_blocks: &'static str,
    pub assured: &'static str,
    pub plus: &'static str,
}

pub const FLIPKART_SELECTORS: FlipkartSelectors = FlipkartSelectors {
    containers: &[
        "div[data-id]",
        "div._1AtVbE",
        "div._13oc-S",
        r#"div[class*="_1AtVbE"], div[class*="_2kHMtA"], div[class*="_13oc-S"], div[class*="cPHDOP"]"#,
    ],
    titled_link: "a[title]",
    name: &[
        "div._4rR01T",
        "a._1fQZEK",
        "div.s1Q9rs",
        "a.IRpwTa",
        "div._2WkVRV",
        "a.wjcEIp",
        "div.KzDlHZ",
    ],
    any_link: "a",
    product_link: r#"a[href*="/p/"]"#,
    price: &["div._30jeq3", "div._25b18c", "div._1vC4OE", "div._3I9_wc", "div._2rQ-NK"],
    original_price: &["div._3I9_wc._27UcVY", "div._3auQ3N._1POkHg", "span._2Tpdn3"],
    discount: &["div._3Ay6sb", "div._3xFhiH", "span._1uv9Cb"],
    rating: &["div._3LWZlK", "div._1lRcqv", "span._1lRcqv", "div.gUuXy-"],
    review_count: &["span._2_R_DZ", "span._13vcmD", "span.Wphh3N"],
    image: "img[src]",
    lazy_image: "img[data-src]",
    highlight_list: "ul",
    highlight_blocks: r#"div[class*="_21Ahn-"], div[class*="fMghBO"]"#,
    assured: r#"div[class*="_2Ix7k"], div[class*="_3l_jm"]"#,
    plus: r#"div[class*="_3Djpdu"]"#,
};

impl FlipkartSelectors {
    /// Every selector in the table, for validation.
    #[must_use]
    pub fn all(&self) -> Vec<&'static str> {
        let mut all: Vec<&'static str> = Vec::new();
        for list in [
            self.containers,
            self.name,
            self.price,
            self.original_price,
            self.discount,
            self.rating,
            self.review_count,
        ] {
            all.extend_from_slice(list);
        }
        all.extend_from_slice(&[
            self.titled_link,
            self.any_link,
            self.product_link,
            self.image,
            self.lazy_image,
            self.highlight_list,
            self.highlight_blocks,
            self.assured,
            self.plus,
        ]);
        all
    }
}

static PRODUCT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/[^/?]+/p/[A-Za-z0-9]+)").expect("valid product path regex"));
static RUPEE_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹\s*([0-9,]+)").expect("valid rupee price regex"));
static PERCENT_OFF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+%\s+off)").expect("valid percent off regex"));
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("valid number regex"));
static STAR_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)\s*★").expect("valid star rating regex"));
static COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*)").expect("valid count regex"));
static RATINGS_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*)\s*(?:ratings?|reviews?)").expect("valid ratings regex")
});
static PAREN_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d[\d,]*)\)").expect("valid paren count regex"));
static BRAND_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Brand:\s*([A-Za-z0-9\s]+)").expect("valid brand regex"));
static DELIVERY_PHRASES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?i)(Free Delivery)",
        r"(?i)(Delivery by [A-Za-z]+,?\s+[A-Za-z]+\s+\d+)",
        r"(?i)(Get it by [^.]+)",
    ]
    .map(|re| Regex::new(re).expect("valid delivery regex"))
});
static BANK_OFFER_PHRASES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"((?:Extra\s+)?₹[\d,]+\s+off\s+on\s+[A-Za-z\s]+Bank)",
        r"(\d+%\s+[Cc]ashback.*?[Bb]ank)",
        r"(Bank Offer[^.]+)",
    ]
    .map(|re| Regex::new(re).expect("valid bank offer regex"))
});

const ASSURED: FlagRule = FlagRule {
    marker: Some(FLIPKART_SELECTORS.assured),
    marker_text: None,
    phrases: &["Assured"],
};
const PLUS: FlagRule = FlagRule {
    marker: Some(FLIPKART_SELECTORS.plus),
    marker_text: None,
    phrases: &["Plus"],
};
const EMI: FlagRule = FlagRule {
    marker: None,
    marker_text: None,
    phrases: &["EMI"],
};
const EXCHANGE: FlagRule = FlagRule {
    marker: None,
    marker_text: None,
    phrases: &["Exchange"],
};

/// Stock phrases in priority order, with the value each one maps to.
const STOCK_PHRASES: &[(&str, &str)] = &[
    ("Out of Stock", "Out of Stock"),
    ("Sold Out", "Out of Stock"),
    ("Currently Unavailable", "Currently Unavailable"),
    ("Coming Soon", "Coming Soon"),
];

/// flipkart.com, or any host serving the same markup.
#[derive(Debug, Clone)]
pub struct Flipkart {
    origin: String,
}

impl Default for Flipkart {
    fn default() -> Self {
        Self::with_origin(FLIPKART_ORIGIN)
    }
}

impl Flipkart {
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

    fn resolve_url(&self, listing: &Listing<'_>) -> Result<Option<String>, ExtractError> {
        let sel = &FLIPKART_SELECTORS;
        let node = listing.node();

        // The titled link only counts when it is site-relative or absolute.
        let titled = node
            .select(sel.titled_link)?
            .into_iter()
            .find_map(|a| a.attr("href"))
            .map(str::trim)
            .filter(|href| href.starts_with('/') || href.starts_with("http"));
        if let Some(url) = titled.and_then(|href| product_url(&self.origin, href, &PRODUCT_PATH)) {
            return Ok(Some(url));
        }

        let product = node
            .select_first(sel.product_link)?
            .and_then(|a| a.attr("href"))
            .and_then(|href| product_url(&self.origin, href, &PRODUCT_PATH));
        if product.is_some() {
            return Ok(product);
        }

        let first = node
            .select(sel.any_link)?
            .into_iter()
            .find_map(|a| a.attr("href"))
            .filter(|href| href.contains("/p/") || href.contains("/product"))
            .and_then(|href| product_url(&self.origin, href, &PRODUCT_PATH));
        Ok(first)
    }
}

fn titled_name(listing: &Listing<'_>) -> Result<Option<String>, ExtractError> {
    Ok(listing
        .node()
        .select(FLIPKART_SELECTORS.titled_link)?
        .into_iter()
        .find_map(|a| a.attr("title"))
        .and_then(clean))
}

fn link_text_name(listing: &Listing<'_>) -> Result<Option<String>, ExtractError> {
    Ok(listing
        .node()
        .select(FLIPKART_SELECTORS.any_link)?
        .into_iter()
        .filter_map(|a| clean(&a.text(true)))
        .find(|text| char_len(text) > NAME_LINK_MIN_LEN))
}

/// `"<number> ★"`; whole numbers keep one decimal place (`"4.0 ★"`).
fn format_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1} ★")
    } else {
        format!("{value} ★")
    }
}

/// First selector whose element holds a number in `0..=5`.
fn element_rating(listing: &Listing<'_>) -> Result<Option<String>, ExtractError> {
    for selector in FLIPKART_SELECTORS.rating {
        let Some(node) = listing.node().select_first(selector)? else {
            continue;
        };
        let text = node.text(true);
        let Some(number) = LEADING_NUMBER.find(&text).map(|m| m.as_str()) else {
            continue;
        };
        let Ok(value) = number.parse::<f64>() else {
            continue;
        };
        if (0.0..=RATING_MAX).contains(&value) {
            return Ok(Some(format_rating(value)));
        }
    }
    Ok(None)
}

fn element_review_count(listing: &Listing<'_>) -> Result<Option<String>, ExtractError> {
    for selector in FLIPKART_SELECTORS.review_count {
        let Some(node) = listing.node().select_first(selector)? else {
            continue;
        };
        if let Some(count) = COUNT.find(&node.text(true)) {
            return Ok(Some(count.as_str().to_string()));
        }
    }
    Ok(None)
}

fn plausible_count(text: &str) -> bool {
    parse_count(text).is_some_and(|n| n > TEXT_REVIEW_COUNT_MIN)
}

/// First match among `patterns`, in pattern order, cut to `max_len` chars.
fn first_phrase(patterns: &[Regex], text: &str, max_len: usize) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| clean(&m.as_str().chars().take(max_len).collect::<String>()))
    })
}

fn image(listing: &Listing<'_>) -> Result<Option<String>, ExtractError> {
    let sel = &FLIPKART_SELECTORS;
    let eager = listing
        .node()
        .select_first(sel.image)?
        .and_then(|img| img.attr("src"))
        .filter(|src| src.contains("http"))
        .and_then(clean);
    if eager.is_some() {
        return Ok(eager);
    }
    attr_at(sel.lazy_image, "data-src")(listing)
}

fn highlights(listing: &Listing<'_>) -> Result<Vec<String>, ExtractError> {
    let sel = &FLIPKART_SELECTORS;
    let mut highlights = Fragments::with_cap(LIST_FIELD_CAP);

    if let Some(list) = listing.node().select_first(sel.highlight_list)? {
        for item in list.select("li")?.into_iter().take(HIGHLIGHT_SCAN_LIMIT) {
            let text = item.text(true);
            if char_len(&text) > LIST_HIGHLIGHT_MIN_LEN {
                highlights.push(&text);
            }
        }
    }

    let (min, max) = BLOCK_HIGHLIGHT_LEN_WINDOW;
    for block in listing
        .node()
        .select(sel.highlight_blocks)?
        .into_iter()
        .take(HIGHLIGHT_SCAN_LIMIT)
    {
        let text = block.text(true);
        let len = char_len(&text);
        if min < len && len < max {
            highlights.push(&text);
        }
    }

    Ok(highlights.into_vec())
}

impl Retailer for Flipkart {
    fn site(&self) -> Site {
        Site::Flipkart
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        search_url_with_params(
            &self.origin,
            "/search",
            &[
                ("q", query),
                ("otracker", "search"),
                ("otracker1", "search"),
                ("marketplace", "FLIPKART"),
                ("as-show", "on"),
                ("as", "off"),
            ],
        )
    }

    fn container_selectors(&self) -> &[&'static str] {
        FLIPKART_SELECTORS.containers
    }

    fn parse_listing(&self, listing: &Listing<'_>) -> Result<ParsedListing, ExtractError> {
        let sel = &FLIPKART_SELECTORS;
        let text = listing.flat_text();

        let source_id = FieldChain::new("source_id")
            .then(own_attr("data-id"))
            .resolve(listing)?;

        let name = FieldChain::new("name")
            .then(titled_name)
            .then(first_text_where(sel.name, |t| char_len(t) > NAME_ELEMENT_MIN_LEN))
            .then(link_text_name)
            .resolve(listing)?;

        let url = FieldChain::new("url")
            .then(|l: &Listing<'_>| self.resolve_url(l))
            .then(|_| {
                Ok(source_id
                    .as_ref()
                    .and_then(|id| absolutize(&self.origin, &format!("/product/p/{id}"))))
            })
            .resolve(listing)?;

        let price = FieldChain::new("price")
            .then(first_text_where(sel.price, |t| t.contains('₹')))
            .then(|l: &Listing<'_>| Ok(pattern(&RUPEE_PRICE)(l)?.map(|p| format!("₹{p}"))))
            .resolve(listing)?;

        let original_price = FieldChain::new("original_price")
            .then(first_text_where(sel.original_price, |t| t.contains('₹')))
            .resolve(listing)?;

        let discount = FieldChain::new("discount")
            .then(first_text_where(sel.discount, |t| {
                t.contains('%') && t.to_lowercase().contains("off")
            }))
            .then(pattern(&PERCENT_OFF))
            .resolve(listing)?;

        let rating = FieldChain::new("rating")
            .then(element_rating)
            .then(|l: &Listing<'_>| Ok(pattern(&STAR_RATING)(l)?.map(|r| format!("{r} ★"))))
            .resolve(listing)?;

        let review_count = FieldChain::new("review_count")
            .then(element_review_count)
            .then(pattern_where(&RATINGS_PHRASE, plausible_count))
            .then(pattern_where(&PAREN_COUNT, plausible_count))
            .resolve(listing)?;

        let brand = FieldChain::new("brand")
            .then(pattern_where(&BRAND_LABEL, |b| {
                char_len(b) < BRAND_ELEMENT_MAX_LEN
            }))
            .then(|_| {
                Ok(name
                    .as_deref()
                    .and_then(|n| n.split_whitespace().next())
                    .and_then(clean)
                    .filter(|b| char_len(b) < DERIVED_BRAND_MAX_LEN))
            })
            .resolve(listing)?;

        let image_url = FieldChain::new("image_url").then(image).resolve(listing)?;

        let delivery = FieldChain::new("delivery")
            .then(|_| Ok(first_phrase(&*DELIVERY_PHRASES, text, usize::MAX)))
            .then(phrase_yields("Delivery", "Available"))
            .resolve(listing)?;

        let mut availability_chain = FieldChain::new("availability");
        for (phrase, value) in STOCK_PHRASES {
            availability_chain = availability_chain.then(phrase_yields(phrase, value));
        }
        let availability = availability_chain
            .then(constant("In Stock"))
            .resolve(listing)?;

        let bank_offer = FieldChain::new("bank_offer")
            .then(|_| Ok(first_phrase(&*BANK_OFFER_PHRASES, text, BANK_OFFER_MAX_LEN)))
            .then(phrase_yields("Bank Offer", "Available"))
            .resolve(listing)?;

        let flags = FlipkartFlags {
            assured: ASSURED.holds(listing)?,
            plus: PLUS.holds(listing)?,
            emi_available: EMI.holds(listing)?,
            exchange_offer: EXCHANGE.holds(listing)?,
            bank_offer,
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
            badges: Vec::new(),
            highlights: highlights(listing)?,
            flags: SiteFlags::Flipkart(flags),
        })
    }
}

#[cfg(test)]
#[path = "flipkart_test.rs"]
mod tests;
