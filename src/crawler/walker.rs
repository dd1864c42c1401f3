//! Lazy page-chain walker
//!
//! Walks a paginated listing as a pull-driven sequence: fetch the current
//! page, hand its items out one at a time, and only once they are consumed
//! fetch the page the extractor pointed to next. The walker never
//! prefetches, so downstream consumption is the only thing driving network
//! traffic.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::PageExtract;
use crate::CrawlError;
use std::collections::VecDeque;
use url::Url;

/// Pull-driven iterator over every item of a page chain
///
/// The chain ends cleanly when a page offers no next link (even if it had
/// items), or when a page's body is suppressed as empty. A terminal fetch
/// failure fails the whole walk; there is no partial continuation past a
/// failed page.
pub struct PageWalker<'a, E> {
    fetcher: &'a Fetcher,
    cursor: Option<String>,
    extract: E,
    buffered: VecDeque<String>,
}

impl<'a, E> PageWalker<'a, E>
where
    E: Fn(&str) -> PageExtract,
{
    /// Creates a walker starting at `start_url`, extracting with `extract`
    pub fn new(fetcher: &'a Fetcher, start_url: String, extract: E) -> Self {
        Self {
            fetcher,
            cursor: Some(start_url),
            extract,
            buffered: VecDeque::new(),
        }
    }

    /// Produces the next item of the sequence
    ///
    /// * `Ok(Some(item))` - next item, in page order then in-page order
    /// * `Ok(None)` - the chain is exhausted (complete, not an error)
    /// * `Err(_)` - a page fetch failed terminally
    pub async fn next_item(&mut self) -> Result<Option<String>, CrawlError> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Ok(Some(item));
            }

            let url = match self.cursor.take() {
                Some(url) => url,
                None => return Ok(None),
            };

            let body = match self.fetcher.fetch(&url).await? {
                Some(body) => body,
                // An empty page body carries neither items nor a next link.
                None => return Ok(None),
            };

            let page = (self.extract)(&body);
            tracing::debug!(
                "Page {} yielded {} items, next: {}",
                url,
                page.items.len(),
                page.next_url.as_deref().unwrap_or("none")
            );

            self.cursor = match page.next_url {
                Some(next) => Some(resolve_next(&url, &next)?),
                None => None,
            };
            self.buffered.extend(page.items);
        }
    }
}

/// Resolves a possibly-relative next link against the page it came from
fn resolve_next(current: &str, next: &str) -> Result<String, CrawlError> {
    let base = Url::parse(current)?;
    Ok(base.join(next)?.to_string())
}
