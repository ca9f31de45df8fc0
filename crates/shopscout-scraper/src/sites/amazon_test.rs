use super::*;
use crate::document::Document;
use crate::extract::{extract_listings, ResultCap};

fn card(inner: &str) -> String {
    format!(
        r#"<div data-component-type="s-search-result" data-asin="B0TEST0001">{inner}</div>"#
    )
}

fn parse(html: &str) -> ParsedListing {
    let doc = Document::parse_str(html);
    let node = doc.select(AMAZON_SELECTORS.containers[0]).unwrap()[0];
    Amazon::new().parse_listing(&Listing::new(node)).unwrap()
}

const FULL: &str = r#"
    <h5><span class="a-size-base">Acme</span></h5>
    <h2><a class="a-link-normal" href="/Acme-Headphones/dp/B0TEST0001/ref=sr_1_1"><span>Acme Wireless Headphones</span></a></h2>
    <i class="a-icon a-icon-star-small a-star-small-4-5" aria-label="4.5 out of 5 stars, rating details"></i>
    <span class="a-icon-alt">4.5 out of 5 stars</span>
    <span class="a-size-base s-underline-text">18,721</span>
    <span class="a-price"><span class="a-offscreen">$1,299.99</span><span class="a-price-whole">1,299<span class="a-price-decimal">.</span></span><span class="a-price-fraction">99</span></span>
    <span class="a-price a-text-price"><span class="a-offscreen">$1,499.00</span></span>
    <span class="a-badge-label-inner">13% off</span>
    <span class="a-badge-text">Best Seller</span>
    <i class="a-icon-prime"></i>
    <span class="a-color-base a-text-bold">FREE delivery Tomorrow</span>
    <img class="s-image" src="https://m.media-amazon.com/images/I/acme.jpg">
    <span class="a-color-success">In Stock</span>
    <span class="a-size-base">Active noise cancelling, 40 hour battery</span>
"#;

// ---------------------------------------------------------------------------
// Full listing
// ---------------------------------------------------------------------------

#[test]
fn full_listing_resolves_every_field() {
    let parsed = parse(&card(FULL));

    assert_eq!(parsed.name.as_deref(), Some("Acme Wireless Headphones"));
    assert_eq!(parsed.source_id.as_deref(), Some("B0TEST0001"));
    assert_eq!(
        parsed.url.as_deref(),
        Some("https://www.amazon.com/Acme-Headphones/dp/B0TEST0001/ref=sr_1_1")
    );
    assert_eq!(parsed.price.as_deref(), Some("$1299.99"));
    assert_eq!(parsed.original_price.as_deref(), Some("$1,499.00"));
    assert_eq!(parsed.discount.as_deref(), Some("13% off"));
    assert_eq!(parsed.rating.as_deref(), Some("4.5 out of 5 stars"));
    assert_eq!(parsed.review_count.as_deref(), Some("18,721"));
    assert_eq!(parsed.brand.as_deref(), Some("Acme"));
    assert_eq!(
        parsed.image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/acme.jpg")
    );
    assert_eq!(parsed.delivery.as_deref(), Some("FREE delivery Tomorrow"));
    assert_eq!(parsed.availability.as_deref(), Some("In Stock"));
    assert_eq!(parsed.badges, vec!["Best Seller"]);
    assert_eq!(
        parsed.highlights,
        vec!["Active noise cancelling, 40 hour battery"]
    );
    assert_eq!(
        parsed.flags,
        SiteFlags::Amazon(AmazonFlags {
            prime_eligible: true,
            ..AmazonFlags::default()
        })
    );
}

#[test]
fn missing_name_fails_the_gate_but_other_fields_still_resolve() {
    let parsed = parse(&card(
        r#"<span class="a-price"><span class="a-offscreen">$9.99</span></span>"#,
    ));
    assert_eq!(parsed.name, None);
    assert_eq!(parsed.price.as_deref(), Some("$9.99"));
    assert!(parsed.into_record(1).is_none());
}

#[test]
fn primary_strategy_failure_only_changes_that_field() {
    let full = parse(&card(FULL));
    let without_alt = parse(&card(
        &FULL.replace(r#"<span class="a-icon-alt">4.5 out of 5 stars</span>"#, ""),
    ));

    assert_eq!(
        without_alt.rating.as_deref(),
        Some("4.5 out of 5 stars, rating details")
    );
    let mut normalized = without_alt;
    normalized.rating.clone_from(&full.rating);
    assert_eq!(normalized, full);
}

// ---------------------------------------------------------------------------
// Price and discount
// ---------------------------------------------------------------------------

#[test]
fn whole_and_fraction_join_with_one_decimal_point() {
    let parsed = parse(&card(
        r#"<h2><span>Widget</span></h2><span class="a-price-whole">1,299</span><span class="a-price-fraction">99</span>"#,
    ));
    assert_eq!(parsed.price.as_deref(), Some("$1299.99"));
}

#[test]
fn price_falls_back_to_offscreen_then_text() {
    let offscreen = parse(&card(
        r#"<h2><span>Widget</span></h2><span class="a-price"><span class="a-offscreen">$24.99</span></span>"#,
    ));
    assert_eq!(offscreen.price.as_deref(), Some("$24.99"));

    let text = parse(&card(r"<h2><span>Widget</span></h2><div>Only $ 1,024.50 today</div>"));
    assert_eq!(text.price.as_deref(), Some("$1,024.50"));
}

#[test]
fn badge_without_percent_is_not_a_discount() {
    let parsed = parse(&card(
        r#"<h2><span>Widget</span></h2><span class="a-badge-label-inner">Best Seller</span>"#,
    ));
    assert_eq!(parsed.discount, None);
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[test]
fn long_tracking_href_is_rebuilt_from_detail_path() {
    let href = format!(
        "/sspa/click?ie=UTF8&spc={}&url=/Acme-Headphones/dp/B0TEST0001/ref=sr_1_1_sspa",
        "x".repeat(600)
    );
    let parsed = parse(&card(&format!(
        r#"<h2><a href="{href}"><span>Acme Headphones</span></a></h2>"#
    )));
    assert_eq!(
        parsed.url.as_deref(),
        Some("https://www.amazon.com/Acme-Headphones/dp/B0TEST0001")
    );
}

#[test]
fn url_falls_back_through_links_to_asin() {
    let detail = parse(&card(
        r#"<h2><span>Widget</span></h2><a href="/Widget/dp/B0TEST0001">img</a>"#,
    ));
    assert_eq!(
        detail.url.as_deref(),
        Some("https://www.amazon.com/Widget/dp/B0TEST0001")
    );

    let bare = parse(&card(r"<h2><span>Widget</span></h2>"));
    assert_eq!(
        bare.url.as_deref(),
        Some("https://www.amazon.com/dp/B0TEST0001")
    );
}

#[test]
fn link_carrying_unavailable_marker_falls_through_to_next_link() {
    let parsed = parse(&card(
        r#"<h2><a href="/N/A-Widget/dp/B0TEST0001"><span>Widget</span></a></h2>
           <a class="a-link-normal s-no-outline" href="/Widget/dp/B0TEST0001">img</a>"#,
    ));
    assert_eq!(
        parsed.url.as_deref(),
        Some("https://www.amazon.com/Widget/dp/B0TEST0001")
    );
}

#[test]
fn custom_origin_is_used_for_links_and_search() {
    let amazon = Amazon::with_origin("http://127.0.0.1:9999/");
    let url = amazon.search_url("usb c hub").unwrap();
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:9999/s?k=usb+c+hub&ref=nb_sb_noss"
    );
}

// ---------------------------------------------------------------------------
// Rating and review count
// ---------------------------------------------------------------------------

#[test]
fn aria_review_count_must_exceed_ten() {
    let small = parse(&card(
        r#"<h2><span>Widget</span></h2><span aria-label="10 ratings"></span>"#,
    ));
    assert_eq!(small.review_count, None);

    let large = parse(&card(
        r#"<h2><span>Widget</span></h2><span aria-label="1,234 ratings"></span>"#,
    ));
    assert_eq!(large.review_count.as_deref(), Some("1,234"));
}

#[test]
fn review_count_falls_back_to_text_patterns() {
    let parsed = parse(&card(r"<h2><span>Widget</span></h2><div>(2,048)</div>"));
    assert_eq!(parsed.review_count.as_deref(), Some("2,048"));
}

#[test]
fn text_rating_is_range_checked() {
    let good = parse(&card(r"<h2><span>Widget</span></h2><div>4.2 out of 5 stars</div>"));
    assert_eq!(good.rating.as_deref(), Some("4.2 out of 5 stars"));

    let bad = parse(&card(r"<h2><span>Widget</span></h2><div>7.5 out of 5 stars</div>"));
    assert_eq!(bad.rating, None);
}

// ---------------------------------------------------------------------------
// Brand, badges, flags
// ---------------------------------------------------------------------------

#[test]
fn store_byline_is_skipped_and_brand_derived_from_name() {
    let parsed = parse(&card(
        r#"<div class="a-row a-size-base a-color-secondary"><span class="a-size-base">Visit the Acme Store</span></div>
           <h2><span>Acme Wireless Over-Ear Headphones</span></h2>"#,
    ));
    assert_eq!(parsed.brand.as_deref(), Some("Acme Wireless"));
}

#[test]
fn badges_are_deduplicated_and_capped() {
    let parsed = parse(&card(
        r#"<h2><span>Widget</span></h2>
           <span class="a-badge-text">Overall Pick</span>
           <span class="a-badge-text">20% off</span>
           <span class="a-badge-text">Overall Pick</span>
           <span class="a-badge-text">Limited time deal</span>
           <span data-a-badge-color="sx-cloud">Amazon's Choice</span>
           <span>Best Seller in Headphones</span>"#,
    ));
    assert_eq!(
        parsed.badges,
        vec!["Overall Pick", "Limited time deal", "Amazon's Choice"]
    );
}

#[test]
fn flags_use_marker_or_phrase() {
    let parsed = parse(&card(
        r#"<h2><span>Widget</span></h2>
           <span class="puis-label-popover-default">Sponsored</span>
           <span>Small Business</span>
           <span>Climate Pledge Friendly</span>"#,
    ));
    assert_eq!(
        parsed.flags,
        SiteFlags::Amazon(AmazonFlags {
            prime_eligible: false,
            sponsored: true,
            small_business: true,
            climate_pledge: true,
        })
    );
}

#[test]
fn missing_availability_defaults_to_in_stock() {
    let parsed = parse(&card(r"<h2><span>Widget</span></h2>"));
    assert_eq!(parsed.availability.as_deref(), Some("In Stock"));
}

// ---------------------------------------------------------------------------
// Page extraction
// ---------------------------------------------------------------------------

const THREE_RESULTS: &str = r#"<html><body>
    <div data-component-type="s-search-result" data-asin="B000000001"><h2><a href="/a/dp/B000000001"><span>First Widget</span></a></h2></div>
    <div data-component-type="s-search-result" data-asin="B000000002"><span class="a-price"><span class="a-offscreen">$5.00</span></span></div>
    <div data-component-type="s-search-result" data-asin="B000000003"><h2><a href="/c/dp/B000000003"><span>Third Widget</span></a></h2></div>
</body></html>"#;

#[test]
fn nameless_container_is_dropped_and_ranks_stay_dense() {
    let doc = Document::parse_str(THREE_RESULTS);
    let records = extract_listings(&Amazon::new(), &doc, 2, ResultCap::Records);

    let ranked: Vec<(u32, &str)> = records
        .iter()
        .map(|r| (r.rank, r.source_id.as_deref().unwrap_or_default()))
        .collect();
    assert_eq!(ranked, vec![(1, "B000000001"), (2, "B000000003")]);
}

#[test]
fn container_cap_can_yield_fewer_records_than_requested() {
    let doc = Document::parse_str(THREE_RESULTS);
    let records = extract_listings(&Amazon::new(), &doc, 2, ResultCap::Containers);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "First Widget");
}

#[test]
fn falls_back_to_result_item_containers() {
    let doc = Document::parse_str(
        r#"<div class="s-result-item" data-asin="B000000009"><h2><span>Legacy Widget</span></h2></div>"#,
    );
    let records = extract_listings(&Amazon::new(), &doc, 20, ResultCap::Containers);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_id.as_deref(), Some("B000000009"));
}

#[test]
fn every_table_selector_is_valid_css() {
    let doc = Document::parse_str("<html></html>");
    for selector in AMAZON_SELECTORS.all() {
        assert!(doc.select(selector).is_ok(), "invalid selector: {selector}");
    }
}
