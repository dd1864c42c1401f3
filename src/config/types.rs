use serde::Deserialize;

/// Top-level configuration structure
///
/// Loaded from a TOML file with kebab-case keys, for example:
///
/// ```toml
/// [crawler]
/// base-url = "https://github.com"
/// seeds = ["alice", "bob"]
/// min-request-interval = 1000
///
/// [request]
/// user-agent = "Mozilla/5.0 ..."
/// cookie = ["logged_in=no"]
///
/// [output]
/// email-path = "./emails.txt"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub request: RequestConfig,
    pub output: OutputConfig,
}

/// Crawl pacing and seed configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Root URL of the crawled site (e.g. "https://github.com")
    pub base_url: String,

    /// Seed user identifiers whose followers are crawled
    pub seeds: Vec<String>,

    /// Minimum interval between any two outgoing requests, in milliseconds
    pub min_request_interval: u64,

    /// Ceiling on the network step of a single fetch attempt, in milliseconds;
    /// starts once the throttle grant arrives
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Delay between retry attempts, in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,

    /// Number of retries after the initial attempt fails
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RequestConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Initial cookie values ("name=value"), joined with ';' for the Cookie header
    #[serde(default)]
    pub cookie: Vec<String>,
}

/// Output sink configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the append-only file receiving one email per line
    pub email_path: String,
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_retry_delay() -> u64 {
    3_000
}

fn default_max_retries() -> u32 {
    3
}

impl CrawlerConfig {
    /// URL of the first follower listing page for a seed user
    pub fn followers_url(&self, seed: &str) -> String {
        format!("{}/{}?tab=followers", self.base_url.trim_end_matches('/'), seed)
    }

    /// URL of a user's profile page
    pub fn profile_url(&self, user: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), user)
    }
}
