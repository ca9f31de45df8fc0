//! Plain-text rendering of search results for the terminal.

use shopscout_core::compare::{completeness, SiteSummary};
use shopscout_core::{or_unavailable, ProductRecord, Site, SiteFlags};

const RULE_WIDTH: usize = 100;
const NAME_WIDTH: usize = 75;
const URL_WIDTH: usize = 70;
const OFFER_WIDTH: usize = 60;

/// Cuts `text` to `max` chars, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn joined(items: &[String], separator: &str) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(separator)
    }
}

fn render_record(record: &ProductRecord) -> Vec<String> {
    let was_label = match record.site() {
        Site::Amazon => "Was",
        Site::Flipkart => "MRP",
    };
    let mut price_line = format!("Price: {}", or_unavailable(record.price.as_deref()));
    if let Some(original) = &record.original_price {
        price_line.push_str(&format!(" ({was_label}: {original})"));
    }
    if let Some(discount) = &record.discount {
        price_line.push_str(&format!(" [{discount}]"));
    }

    let mut lines = vec![
        format!("Rank: {}", record.rank),
        format!("Name: {}", truncate(&record.name, NAME_WIDTH)),
        format!("Brand: {}", or_unavailable(record.brand.as_deref())),
        format!("ID: {}", or_unavailable(record.source_id.as_deref())),
        price_line,
        format!("Rating: {}", or_unavailable(record.rating.as_deref())),
        format!("Reviews: {}", or_unavailable(record.review_count.as_deref())),
    ];

    match &record.flags {
        SiteFlags::Amazon(flags) => {
            lines.push(format!("Prime: {}", yes_no(flags.prime_eligible)));
            if flags.sponsored {
                lines.push("Sponsored: Yes".to_string());
            }
        }
        SiteFlags::Flipkart(flags) => {
            lines.push(format!("Flipkart Assured: {}", yes_no(flags.assured)));
            lines.push(format!("Flipkart Plus: {}", yes_no(flags.plus)));
            lines.push(format!("EMI: {}", yes_no(flags.emi_available)));
            lines.push(format!("Exchange: {}", yes_no(flags.exchange_offer)));
            if let Some(offer) = &flags.bank_offer {
                lines.push(format!("Bank Offer: {}", truncate(offer, OFFER_WIDTH)));
            }
        }
    }

    lines.push(format!("Delivery: {}", or_unavailable(record.delivery.as_deref())));
    lines.push(format!(
        "Availability: {}",
        or_unavailable(record.availability.as_deref())
    ));
    match record.site() {
        Site::Amazon => lines.push(format!("Badges: {}", joined(&record.badges, ", "))),
        Site::Flipkart => lines.push(format!(
            "Highlights: {}",
            truncate(&joined(&record.highlights, " | "), 80)
        )),
    }
    lines.push(format!(
        "URL: {}",
        truncate(or_unavailable(record.url.as_deref()), URL_WIDTH)
    ));
    lines
}

/// One site's listing block, ending with its completeness line.
#[must_use]
pub(crate) fn render_site(site: Site, records: &[ProductRecord]) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let Some(stats) = completeness(records) else {
        return format!("[!] No products found on {}\n\n", site.label());
    };

    let mut lines = vec![
        heavy.clone(),
        format!("{}: FOUND {} PRODUCTS", site.label().to_uppercase(), records.len()),
        heavy.clone(),
        String::new(),
    ];
    for record in records {
        lines.extend(render_record(record));
        lines.push(light.clone());
        lines.push(String::new());
    }
    lines.push(format!(
        "[STATS] Data Completeness: {:.1}/{} fields ({:.1}%)",
        stats.average_filled,
        stats.total_fields,
        stats.percent()
    ));
    lines.push(heavy);
    lines.push(String::new());
    lines.join("\n") + "\n"
}

fn render_counts(counts: &[(String, usize)]) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(label, count)| format!("{label} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Side-by-side comparison of the sites that returned products.
#[must_use]
pub(crate) fn render_summary(summaries: &[SiteSummary]) -> String {
    let mut lines = vec!["COMPARISON".to_string(), "=".repeat(RULE_WIDTH)];
    for summary in summaries {
        let price = summary
            .average_price
            .map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}"));
        lines.push(format!(
            "{}: {} products, average price {} ({} priced)",
            summary.site.label(),
            summary.count,
            price,
            summary.priced
        ));
        lines.push(format!("  top brands: {}", render_counts(&summary.top_brands)));
        lines.push(format!("  ratings: {}", render_counts(&summary.rating_buckets)));
    }
    lines.push(String::new());
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopscout_core::compare::summarize;
    use shopscout_core::{AmazonFlags, FlipkartFlags};

    fn amazon_record() -> ProductRecord {
        ProductRecord {
            rank: 1,
            source_id: Some("B0TEST0001".to_string()),
            name: "Acme Wireless Headphones".to_string(),
            url: Some("https://www.amazon.com/dp/B0TEST0001".to_string()),
            price: Some("$1299.99".to_string()),
            original_price: Some("$1,499.00".to_string()),
            discount: Some("13% off".to_string()),
            rating: Some("4.5 out of 5 stars".to_string()),
            review_count: Some("18,721".to_string()),
            brand: Some("Acme".to_string()),
            image_url: None,
            delivery: None,
            availability: Some("In Stock".to_string()),
            badges: vec!["Best Seller".to_string()],
            highlights: Vec::new(),
            flags: SiteFlags::Amazon(AmazonFlags {
                prime_eligible: true,
                ..AmazonFlags::default()
            }),
        }
    }

    #[test]
    fn amazon_record_renders_price_line_and_markers() {
        let out = render_site(Site::Amazon, &[amazon_record()]);
        assert!(out.contains("AMAZON: FOUND 1 PRODUCTS"));
        assert!(out.contains("Price: $1299.99 (Was: $1,499.00) [13% off]"));
        assert!(out.contains("Prime: Yes"));
        assert!(out.contains("Delivery: N/A"));
        assert!(out.contains("Badges: Best Seller"));
        assert!(out.contains("[STATS] Data Completeness:"));
    }

    #[test]
    fn flipkart_record_uses_mrp_and_offer_lines() {
        let record = ProductRecord {
            original_price: Some("₹79,900".to_string()),
            discount: None,
            badges: Vec::new(),
            highlights: vec!["128 GB ROM".to_string()],
            flags: SiteFlags::Flipkart(FlipkartFlags {
                assured: true,
                bank_offer: Some("Bank Offer 10% off".to_string()),
                ..FlipkartFlags::default()
            }),
            ..amazon_record()
        };
        let out = render_site(Site::Flipkart, &[record]);
        assert!(out.contains("(MRP: ₹79,900)"));
        assert!(out.contains("Flipkart Assured: Yes"));
        assert!(out.contains("Bank Offer: Bank Offer 10% off"));
        assert!(out.contains("Highlights: 128 GB ROM"));
    }

    #[test]
    fn empty_site_renders_notice() {
        assert_eq!(
            render_site(Site::Flipkart, &[]),
            "[!] No products found on Flipkart\n\n"
        );
    }

    #[test]
    fn long_values_are_truncated() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("short", 8), "short");
    }

    #[test]
    fn summary_lists_price_brands_and_ratings() {
        let summary = summarize(Site::Amazon, &[amazon_record()], 5);
        let out = render_summary(&[summary]);
        assert!(out.contains("Amazon: 1 products, average price 1299.99 (1 priced)"));
        assert!(out.contains("top brands: Acme (1)"));
        assert!(out.contains("ratings: 4.5 (1)"));
    }
}
