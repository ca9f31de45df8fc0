//! Request headers that make a search look like a desktop browser
//! navigation.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use shopscout_core::{Site, DEFAULT_USER_AGENT};

/// Builds the header set for `site`.
///
/// `Accept-Encoding` is left to `reqwest`, which negotiates only the codecs
/// it can decode. A `user_agent` that is not a valid header value is replaced
/// by [`DEFAULT_USER_AGENT`].
#[must_use]
pub fn browser_headers(site: Site, user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let agent = HeaderValue::from_str(user_agent).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "user agent is not a valid header value; using default");
        HeaderValue::from_static(DEFAULT_USER_AGENT)
    });
    headers.insert(USER_AGENT, agent);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    if site == Site::Flipkart {
        for (name, value) in [
            ("sec-fetch-dest", "document"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-site", "none"),
        ] {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
    }

    headers
}
