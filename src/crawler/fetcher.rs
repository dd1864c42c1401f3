//! Throttled HTTP fetcher
//!
//! This module performs every outgoing request for the crawler:
//! - acquiring a grant from the throttle gate before each attempt
//! - sending the GET with the configured user agent and current cookie
//! - refreshing the shared cookie jar from each successful response
//! - bounding each attempt's network step with a timeout, started once the
//!   grant arrives (queue time at the gate does not count against it)
//! - retrying failed attempts a bounded number of times with a fixed delay
//!
//! An empty response body is a suppressed value, not an error: the caller
//! receives `Ok(None)` and decides what that means for its pipeline.

use crate::config::Config;
use crate::crawler::throttle::ThrottleGate;
use crate::CrawlError;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Process-wide cookie store
///
/// Holds one opaque cookie string. Every fetch reads it to build the
/// `Cookie` header and overwrites it from the response's `Set-Cookie`
/// headers. Last write wins; a response without `Set-Cookie` leaves the
/// jar untouched.
#[derive(Clone)]
pub struct CookieJar {
    value: Arc<Mutex<String>>,
}

impl CookieJar {
    /// Creates a jar seeded with the configured cookie values
    pub fn new(initial: &[String]) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial.join(";"))),
        }
    }

    /// Current cookie value (may be empty)
    pub fn get(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    /// Overwrites the cookie value
    pub fn set(&self, value: String) {
        *self.value.lock().unwrap() = value;
    }
}

/// Builds the shared HTTP client
///
/// The per-attempt timeout is enforced by the fetcher (it must also cover
/// the throttle grant wait), so the client itself only carries a connect
/// timeout.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Executes throttled, retried GET requests
pub struct Fetcher {
    client: Client,
    gate: ThrottleGate,
    cookies: CookieJar,
    request_timeout: Duration,
    retry_delay: Duration,
    max_retries: u32,
}

impl Fetcher {
    /// Creates a fetcher from the configuration, sharing the given gate and jar
    pub fn new(config: &Config, gate: ThrottleGate, cookies: CookieJar) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.request.user_agent)?;

        Ok(Self {
            client,
            gate,
            cookies,
            request_timeout: Duration::from_millis(config.crawler.request_timeout),
            retry_delay: Duration::from_millis(config.crawler.retry_delay),
            max_retries: config.crawler.max_retries,
        })
    }

    /// Fetches a URL, returning its body text
    ///
    /// * `Ok(Some(body))` - non-empty body
    /// * `Ok(None)` - request succeeded but the body was empty (suppressed)
    /// * `Err(_)` - every attempt failed; the terminal error after retries
    ///
    /// Each attempt submits its own throttle ticket, so retry traffic also
    /// honors the global minimum request interval. The timeout covers the
    /// network step only: many callers may queue at the gate at once, and a
    /// long wait for a grant is back-pressure, not a failure.
    pub async fn fetch(&self, url: &str) -> Result<Option<String>, CrawlError> {
        let mut attempt: u32 = 0;

        loop {
            match self.attempt(url).await {
                Ok(body) => {
                    if body.is_empty() {
                        tracing::debug!("Empty body for {}, suppressing", url);
                        return Ok(None);
                    }
                    return Ok(Some(body));
                }
                Err(e) => {
                    tracing::warn!("Request failed for {}: {}", url, e);
                }
            }

            if attempt >= self.max_retries {
                tracing::error!(
                    "Giving up on {} after {} attempts",
                    url,
                    attempt + 1
                );
                return Err(CrawlError::RetriesExhausted {
                    url: url.to_string(),
                });
            }

            attempt += 1;
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    /// One attempt: grant, then a time-bounded GET with cookie refresh
    async fn attempt(&self, url: &str) -> Result<String, CrawlError> {
        let grant = self.gate.acquire(url).await?;
        tracing::debug!("Request {}: {}", grant.ticket_id, url);

        match tokio::time::timeout(self.request_timeout, self.send(url)).await {
            Ok(result) => result,
            Err(_) => Err(CrawlError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    /// The network step of one attempt
    async fn send(&self, url: &str) -> Result<String, CrawlError> {
        let mut request = self.client.get(url);
        let cookie = self.cookies.get();
        if !cookie.is_empty() {
            request = request.header(COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        // Refresh the jar before the body is consumed.
        let set_cookie: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !set_cookie.is_empty() {
            self.cookies.set(set_cookie.join(";"));
        }

        response.text().await.map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })
    }
}
