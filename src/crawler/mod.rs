//! Crawler module: the rate-limited, retrying, paginated crawl engine
//!
//! This module contains the core crawling logic:
//! - global request pacing through the throttle gate
//! - throttled HTTP fetching with timeout and bounded retry
//! - lazy walking of paginated listings
//! - per-seed pipeline coordination

mod coordinator;
mod fetcher;
mod parser;
mod profile;
mod throttle;
mod walker;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, CookieJar, Fetcher};
pub use parser::{extract_email, extract_followers, PageExtract};
pub use profile::fetch_attribute;
pub use throttle::{Grant, RequestTicket, ThrottleGate};
pub use walker::PageWalker;

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Spawn the throttle gate serializer
/// 2. Build the HTTP client and seed the cookie jar
/// 3. Walk each seed's follower listing to completion
/// 4. Fetch each follower's profile email
/// 5. Append non-empty emails to the output sink
pub async fn crawl(config: Config) -> Result<(), CrawlError> {
    run_crawl(config).await
}
