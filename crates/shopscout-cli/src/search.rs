//! `search` command: run the site scrapers, print what they found and
//! optionally save it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use shopscout_core::compare::summarize;
use shopscout_core::{write_records_json, ProductRecord, ScoutConfig, Site};
use shopscout_scraper::{
    browser_headers, Amazon, Flipkart, HttpFetcher, ResultCap, Retailer, SearchClient,
    SearchOptions,
};

use crate::report;
use crate::{SearchArgs, SiteChoice};

/// Brands listed per site in the comparison summary.
const TOP_BRANDS: usize = 5;

/// Merges command-line overrides onto the loaded config.
pub(crate) fn search_options(
    config: &ScoutConfig,
    args: &SearchArgs,
) -> anyhow::Result<SearchOptions> {
    let max_results = args.max_results.unwrap_or(config.max_results);
    let max_retries = args.max_retries.unwrap_or(config.max_retries);
    anyhow::ensure!(max_results > 0, "--max-results must be at least 1");
    anyhow::ensure!(max_retries > 0, "--max-retries must be at least 1");

    Ok(SearchOptions {
        max_results,
        max_retries,
        retry_delay: args
            .retry_delay
            .map_or_else(|| config.retry_delay(), Duration::from_secs),
        result_cap: ResultCap::Containers,
    })
}

async fn search_site<R: Retailer>(
    fetcher: &HttpFetcher,
    retailer: R,
    config: &ScoutConfig,
    query: &str,
    options: &SearchOptions,
) -> (Site, Vec<ProductRecord>) {
    let site = retailer.site();
    let headers = browser_headers(site, &config.user_agent);
    let client = SearchClient::new(fetcher.clone(), retailer, headers, config.request_timeout());
    (site, client.search(query, options).await)
}

/// Runs the selected sites concurrently, then reports.
///
/// # Errors
///
/// Returns an error if the query is blank, an override is invalid, the HTTP
/// client cannot be built, or saving fails. Search failures themselves only
/// show up as empty results.
pub(crate) async fn run_search(config: &ScoutConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let query = args.query.join(" ");
    let query = query.trim();
    anyhow::ensure!(!query.is_empty(), "search query is empty");

    let options = search_options(config, args)?;
    tracing::info!(
        query,
        site = ?args.site,
        max_results = options.max_results,
        "starting search"
    );
    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;

    let wants = |site: SiteChoice| args.site == site || args.site == SiteChoice::Both;
    let amazon = async {
        if wants(SiteChoice::Amazon) {
            Some(search_site(&fetcher, Amazon::new(), config, query, &options).await)
        } else {
            None
        }
    };
    let flipkart = async {
        if wants(SiteChoice::Flipkart) {
            Some(search_site(&fetcher, Flipkart::new(), config, query, &options).await)
        } else {
            None
        }
    };
    let (amazon, flipkart) = tokio::join!(amazon, flipkart);
    let results: Vec<(Site, Vec<ProductRecord>)> =
        [amazon, flipkart].into_iter().flatten().collect();

    for (site, records) in &results {
        print!("{}", report::render_site(*site, records));
    }

    let summaries: Vec<_> = results
        .iter()
        .filter(|(_, records)| !records.is_empty())
        .map(|(site, records)| summarize(*site, records, TOP_BRANDS))
        .collect();
    if !summaries.is_empty() {
        print!("{}", report::render_summary(&summaries));
    }

    if args.save {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output_dir.clone());
        for (site, records) in results.iter().filter(|(_, records)| !records.is_empty()) {
            let path = save_records(&dir, *site, records)?;
            println!(
                "saved {} {} products to {}",
                records.len(),
                site.label(),
                path.display()
            );
        }
    }

    Ok(())
}

/// Writes `records` to `<dir>/<site>_products.json`, creating `dir` if needed.
pub(crate) fn save_records(
    dir: &Path,
    site: Site,
    records: &[ProductRecord],
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{}_products.json", site.as_str()));
    write_records_json(&path, records)
        .with_context(|| format!("failed to save {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopscout_core::{read_records_json, AmazonFlags, SiteFlags};

    fn config() -> ScoutConfig {
        ScoutConfig {
            log_level: "info".to_string(),
            request_timeout_secs: 15,
            user_agent: "shopscout-test/0.1".to_string(),
            max_results: 20,
            max_retries: 5,
            retry_delay_secs: 8,
            output_dir: PathBuf::from("."),
        }
    }

    fn args(max_results: Option<usize>, max_retries: Option<u32>) -> SearchArgs {
        SearchArgs {
            query: vec!["usb".to_string(), "hub".to_string()],
            site: SiteChoice::Both,
            max_results,
            max_retries,
            retry_delay: None,
            save: false,
            output_dir: None,
        }
    }

    #[test]
    fn options_come_from_config_when_not_overridden() {
        let options = search_options(&config(), &args(None, None)).unwrap();
        assert_eq!(options.max_results, 20);
        assert_eq!(options.max_retries, 5);
        assert_eq!(options.retry_delay, Duration::from_secs(8));
        assert_eq!(options.result_cap, ResultCap::Containers);
    }

    #[test]
    fn flags_override_config() {
        let mut overrides = args(Some(3), Some(2));
        overrides.retry_delay = Some(1);
        let options = search_options(&config(), &overrides).unwrap();
        assert_eq!(options.max_results, 3);
        assert_eq!(options.max_retries, 2);
        assert_eq!(options.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn zero_overrides_are_rejected() {
        assert!(search_options(&config(), &args(Some(0), None)).is_err());
        assert!(search_options(&config(), &args(None, Some(0))).is_err());
    }

    #[test]
    fn save_records_writes_site_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let record = ProductRecord {
            rank: 1,
            source_id: Some("B0TEST0001".to_string()),
            name: "Acme Hub".to_string(),
            url: None,
            price: Some("$19.99".to_string()),
            original_price: None,
            discount: None,
            rating: None,
            review_count: None,
            brand: None,
            image_url: None,
            delivery: None,
            availability: None,
            badges: Vec::new(),
            highlights: Vec::new(),
            flags: SiteFlags::Amazon(AmazonFlags::default()),
        };

        let path = save_records(&out, Site::Amazon, std::slice::from_ref(&record)).unwrap();

        assert_eq!(path, out.join("amazon_products.json"));
        assert_eq!(read_records_json(&path).unwrap(), vec![record]);
    }
}
