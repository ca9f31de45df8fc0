//! Page fetching. [`PageFetcher`] is the seam tests replace; [`HttpFetcher`]
//! is the real transport.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use crate::error::FetchError;
use crate::links::extract_domain;

/// Retry-After assumed when a 429 response carries none (or an unparsable one).
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// One HTTP GET returning the raw body.
pub trait PageFetcher {
    /// Fetches `url` with `headers`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Any network failure, timeout or non-2xx status is a [`FetchError`].
    fn fetch(
        &self,
        url: &str,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// [`PageFetcher`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built
    /// (e.g. TLS backend initialisation fails).
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .timeout(timeout)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(FetchError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
