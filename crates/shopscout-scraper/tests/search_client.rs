//! Integration tests for `SearchClient` over the real HTTP fetcher.
//!
//! Each test stands up a `wiremock` server and points a retailer at it, so
//! no real network traffic is made.

use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopscout_core::Site;
use shopscout_scraper::{
    browser_headers, Amazon, Flipkart, HttpFetcher, ResultCap, SearchClient, SearchOptions,
};

const AMAZON_PAGE: &str = r#"<html><body>
    <div data-component-type="s-search-result" data-asin="B0TEST0001">
      <h2><a href="/Acme-Hub/dp/B0TEST0001"><span>Acme USB-C Hub 7-in-1</span></a></h2>
      <span class="a-price"><span class="a-offscreen">$29.99</span></span>
    </div>
    <div data-component-type="s-search-result" data-asin="B0TEST0002">
      <span>Sponsored placement</span>
    </div>
    <div data-component-type="s-search-result" data-asin="B0TEST0003">
      <h2><a href="/Zen-Hub/dp/B0TEST0003"><span>Zen USB-C Hub</span></a></h2>
    </div>
</body></html>"#;

const FLIPKART_PAGE: &str = r#"<html><body>
    <div data-id="ACCTEST0001">
      <a title="boAt Rockerz 450 Headset" href="/boat-rockerz-450/p/itmabc123"></a>
      <div class="_30jeq3">₹1,499</div>
    </div>
</body></html>"#;

/// Options with no wait between attempts so retry tests stay fast.
fn fast_options(max_retries: u32) -> SearchOptions {
    SearchOptions {
        max_results: 20,
        max_retries,
        retry_delay: Duration::ZERO,
        result_cap: ResultCap::Containers,
    }
}

fn amazon_client(server: &MockServer) -> SearchClient<HttpFetcher, Amazon> {
    SearchClient::new(
        HttpFetcher::new().expect("failed to build test fetcher"),
        Amazon::with_origin(&server.uri()),
        browser_headers(Site::Amazon, "shopscout-test/0.1"),
        Duration::from_secs(5),
    )
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn amazon_search_returns_ranked_records_with_absolute_urls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "usb c hub"))
        .and(query_param("ref", "nb_sb_noss"))
        .and(header("user-agent", "shopscout-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AMAZON_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let records = amazon_client(&server)
        .search("usb c hub", &fast_options(3))
        .await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].rank, 1);
    assert_eq!(records[0].name, "Acme USB-C Hub 7-in-1");
    assert_eq!(records[0].price.as_deref(), Some("$29.99"));
    assert_eq!(
        records[0].url.as_deref(),
        Some(format!("{}/Acme-Hub/dp/B0TEST0001", server.uri()).as_str())
    );
    assert_eq!(records[1].rank, 2);
    assert_eq!(records[1].source_id.as_deref(), Some("B0TEST0003"));
}

#[tokio::test]
async fn flipkart_search_sends_navigation_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "boat headphones"))
        .and(query_param("marketplace", "FLIPKART"))
        .and(header("sec-fetch-mode", "navigate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FLIPKART_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(
        HttpFetcher::new().expect("failed to build test fetcher"),
        Flipkart::with_origin(&server.uri()),
        browser_headers(Site::Flipkart, "shopscout-test/0.1"),
        Duration::from_secs(5),
    );
    let records = client.search("boat headphones", &fast_options(1)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "boAt Rockerz 450 Headset");
    assert_eq!(records[0].price.as_deref(), Some("₹1,499"));
    assert_eq!(records[0].brand.as_deref(), Some("boAt"));
}

// ---------------------------------------------------------------------------
// Retry behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_error_is_retried_then_page_is_extracted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AMAZON_PAGE))
        .mount(&server)
        .await;

    let records = amazon_client(&server)
        .search("usb c hub", &fast_options(3))
        .await;

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn rate_limited_every_time_degrades_to_empty_after_max_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(3)
        .mount(&server)
        .await;

    let records = amazon_client(&server)
        .search("usb c hub", &fast_options(3))
        .await;

    assert!(records.is_empty(), "expected empty result, got: {records:?}");
}

#[tokio::test]
async fn page_without_products_is_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Robot check</body></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let records = amazon_client(&server)
        .search("usb c hub", &fast_options(5))
        .await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn connection_refused_degrades_to_empty() {
    // Bind then drop a server so its port is closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let client = SearchClient::new(
        HttpFetcher::new().expect("failed to build test fetcher"),
        Amazon::with_origin(&uri),
        browser_headers(Site::Amazon, "shopscout-test/0.1"),
        Duration::from_secs(2),
    );

    assert!(client.search("usb c hub", &fast_options(2)).await.is_empty());
}
