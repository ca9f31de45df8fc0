//! Numeric interpretation of scraped free-text fields, for cross-site
//! comparison. Extraction keeps prices and ratings as text; everything here
//! is best-effort and returns `None` rather than guessing.

use std::collections::HashMap;

use crate::record::{ProductRecord, Site};

const CURRENCY_MARKERS: [&str; 8] = ["₹", "Rs.", "Rs", "INR", "$", "USD", "€", "£"];

/// Parses a price such as `"₹1,299"`, `"$29.99"` or `"From 299"`.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let mut cleaned = raw.to_string();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned = cleaned.replace(',', "");

    for token in cleaned.split_whitespace() {
        let numeric: String = token
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        if numeric.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(value) = numeric.parse::<f64>() {
                return Some(value);
            }
        }
    }

    let digits: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok()
}

/// Parses a rating such as `"4.7 out of 5 stars"` or `"4.1 ★"`.
#[must_use]
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect::<String>()
        })
        .filter(|numeric| numeric.chars().any(|c| c.is_ascii_digit()))
        .find_map(|numeric| numeric.parse::<f64>().ok())
}

/// Average share of filled fields across a result set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completeness {
    pub average_filled: f64,
    pub total_fields: usize,
}

impl Completeness {
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total_fields == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let total = self.total_fields as f64;
        self.average_filled / total * 100.0
    }
}

/// Returns `None` for an empty slice.
#[must_use]
pub fn completeness(records: &[ProductRecord]) -> Option<Completeness> {
    let first = records.first()?;
    let filled: usize = records.iter().map(ProductRecord::filled_field_count).sum();
    #[allow(clippy::cast_precision_loss)]
    let average_filled = filled as f64 / records.len() as f64;
    Some(Completeness {
        average_filled,
        total_fields: first.total_field_count(),
    })
}

/// Per-site aggregate used by the comparison report.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub site: Site,
    pub count: usize,
    /// Mean of the prices that parsed, rounded to two decimals.
    pub average_price: Option<f64>,
    pub priced: usize,
    /// `(brand, count)` sorted by count, first-seen order on ties.
    pub top_brands: Vec<(String, usize)>,
    /// `(rating rounded to one decimal, count)` sorted by count.
    pub rating_buckets: Vec<(String, usize)>,
}

#[must_use]
pub fn summarize(site: Site, records: &[ProductRecord], top_n: usize) -> SiteSummary {
    let prices: Vec<f64> = records
        .iter()
        .filter_map(|r| r.price.as_deref().and_then(parse_price))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let average_price = (!prices.is_empty())
        .then(|| round_to(prices.iter().sum::<f64>() / prices.len() as f64, 2));

    let mut top_brands = count_in_order(
        records
            .iter()
            .map(|r| r.brand.clone().unwrap_or_else(|| "Unknown".to_string())),
    );
    top_brands.truncate(top_n);

    let rating_buckets = count_in_order(
        records
            .iter()
            .filter_map(|r| r.rating.as_deref().and_then(parse_rating))
            .map(|rating| format!("{:.1}", round_to(rating, 1))),
    );

    SiteSummary {
        site,
        count: records.len(),
        average_price,
        priced: prices.len(),
        top_brands,
        rating_buckets,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn count_in_order(labels: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for label in labels {
        if let Some(&i) = index.get(&label) {
            order[i].1 += 1;
        } else {
            index.insert(label.clone(), order.len());
            order.push((label, 1));
        }
    }
    // stable: ties keep first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}
