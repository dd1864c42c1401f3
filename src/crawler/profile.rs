//! Single-attribute profile fetches
//!
//! Fetches one profile page and pulls a single scalar field out of it via a
//! caller-supplied extractor. "No value" and "fetch failed" are kept
//! distinct: an empty extraction (or a suppressed empty body) yields
//! `Ok(None)`, while a terminal fetch failure propagates as an error.

use crate::crawler::fetcher::Fetcher;
use crate::CrawlError;

/// Fetches `url` and extracts one scalar attribute from the body
///
/// * `Ok(Some(value))` - the extractor produced a non-empty value
/// * `Ok(None)` - the page was fetched but the field is absent or empty
/// * `Err(_)` - the fetch failed after all retries
pub async fn fetch_attribute<E>(
    fetcher: &Fetcher,
    url: &str,
    extract: E,
) -> Result<Option<String>, CrawlError>
where
    E: Fn(&str) -> String,
{
    let body = match fetcher.fetch(url).await? {
        Some(body) => body,
        None => return Ok(None),
    };

    let value = extract(&body);
    if value.is_empty() {
        tracing::debug!("No attribute value on {}", url);
        return Ok(None);
    }

    Ok(Some(value))
}
