//! Retrying search client: fetch a results page, then extract it.

use std::time::Duration;

use reqwest::header::HeaderMap;
use shopscout_core::ProductRecord;

use crate::document::Document;
use crate::extract::{extract_listings, ResultCap, Retailer};
use crate::fetch::PageFetcher;
use crate::retry::retry_with_fixed_delay;

/// Knobs for one [`SearchClient::search`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: usize,
    /// Total fetch attempts, including the first. Zero is treated as one.
    pub max_retries: u32,
    /// Flat wait between failed attempts.
    pub retry_delay: Duration,
    pub result_cap: ResultCap,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 20,
            max_retries: 5,
            retry_delay: Duration::from_secs(8),
            result_cap: ResultCap::Containers,
        }
    }
}

/// Searches one retailer.
pub struct SearchClient<F, R> {
    fetcher: F,
    retailer: R,
    headers: HeaderMap,
    timeout: Duration,
}

impl<F, R> SearchClient<F, R>
where
    F: PageFetcher,
    R: Retailer,
{
    #[must_use]
    pub fn new(fetcher: F, retailer: R, headers: HeaderMap, timeout: Duration) -> Self {
        Self {
            fetcher,
            retailer,
            headers,
            timeout,
        }
    }

    pub fn retailer(&self) -> &R {
        &self.retailer
    }

    /// Searches for `query`, returning ranked records.
    ///
    /// Never fails: a URL that cannot be built or a fetch that fails on every
    /// attempt is logged and yields an empty list. A page that fetched but
    /// held no products is also an empty list, and is not retried.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Vec<ProductRecord> {
        let site = self.retailer.site();
        let url = match self.retailer.search_url(query) {
            Ok(url) => url.to_string(),
            Err(err) => {
                tracing::warn!(%site, query, error = %err, "cannot build search URL");
                return Vec::new();
            }
        };
        tracing::info!(%site, query, url = %url, "searching");

        let max_retries = options.max_retries;
        let fetched = retry_with_fixed_delay(max_retries, options.retry_delay, |attempt| {
            tracing::debug!(%site, attempt, max_retries, "fetching results page");
            self.fetcher.fetch(&url, &self.headers, self.timeout)
        })
        .await;

        match fetched {
            Ok(body) => {
                let doc = Document::parse(&body);
                extract_listings(&self.retailer, &doc, options.max_results, options.result_cap)
            }
            Err(err) => {
                tracing::warn!(
                    %site,
                    max_retries = options.max_retries,
                    error = %err,
                    "giving up on search after final attempt"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
