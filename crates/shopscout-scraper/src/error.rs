use thiserror::Error;

/// A failed page fetch. Every variant is treated as transient by the search
/// client and retried until attempts run out.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("cannot build search URL from \"{base}\": {reason}")]
    InvalidUrl { base: String, reason: String },
}

/// A fault while resolving one listing's fields. The listing is skipped; the
/// rest of the page is still extracted.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },
}
