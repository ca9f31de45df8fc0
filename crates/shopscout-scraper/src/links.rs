//! Product link normalisation.

use regex::Regex;
use reqwest::Url;

use crate::strategy::clean;
use crate::tuning::LONG_HREF_LEN;

/// Resolves `href` against `origin`, accepting only http(s) results.
///
/// When `href` is longer than [`LONG_HREF_LEN`] and `product_path` matches it,
/// the link is rebuilt from the captured product path alone, dropping the
/// tracking parameters that make it long. Results carrying the `N/A` marker
/// are rejected like any other unusable value.
#[must_use]
pub fn product_url(origin: &str, href: &str, product_path: &Regex) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if href.len() > LONG_HREF_LEN {
        if let Some(path) = product_path.captures(href).and_then(|c| c.get(1)) {
            return clean(&format!("{}{}", origin.trim_end_matches('/'), path.as_str()));
        }
    }
    absolutize(origin, href)
}

/// Joins `href` onto `origin`. Non-http(s) results (`javascript:` links and
/// the like) are rejected.
#[must_use]
pub fn absolutize(origin: &str, href: &str) -> Option<String> {
    let base = Url::parse(origin).ok()?;
    let url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    clean(url.as_str())
}

/// Hostname of `url` for log and error messages. Falls back to the full
/// string if it does not parse.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
