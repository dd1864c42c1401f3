//! Integration tests for the throttled fetcher
//!
//! These tests use wiremock to stand in for the crawled site and verify
//! retry behavior, pacing, timeout handling, and cookie propagation.

use mailtrawl::config::{Config, CrawlerConfig, OutputConfig, RequestConfig};
use mailtrawl::crawler::{CookieJar, Fetcher, ThrottleGate};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn test_config(base_url: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_url: base_url.to_string(),
            seeds: vec!["alice".to_string()],
            min_request_interval: 10, // Very short for testing
            request_timeout: 5_000,
            retry_delay: 50,
            max_retries: 3,
        },
        request: RequestConfig {
            user_agent: "MailtrawlTest/1.0".to_string(),
            cookie: vec![],
        },
        output: OutputConfig {
            email_path: "./test_emails.txt".to_string(),
        },
    }
}

/// Builds a fetcher with its own gate and jar from the configuration
fn make_fetcher(config: &Config) -> Fetcher {
    let gate = ThrottleGate::spawn(Duration::from_millis(config.crawler.min_request_interval));
    let cookies = CookieJar::new(&config.request.cookie);
    Fetcher::new(config, gate, cookies).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_retry_exhaustion_makes_all_attempts_then_fails() {
    let mock_server = MockServer::start().await;

    // Always failing endpoint: one initial attempt plus three retries.
    Mock::given(method("GET"))
        .and(path("/fail"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri());
    let fetcher = make_fetcher(&config);

    let start = Instant::now();
    let result = fetcher.fetch(&format!("{}/fail", mock_server.uri())).await;
    let elapsed = start.elapsed();

    let err = result.expect_err("Expected terminal failure");
    assert!(err.is_transport(), "Unexpected error kind: {}", err);

    // Three retry delays of 50ms each sit between the four attempts.
    assert!(
        elapsed >= Duration::from_millis(150),
        "Retries were not paced: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_retry_then_success_returns_body_without_extra_attempts() {
    let mock_server = MockServer::start().await;

    // Two failures, then success; the success must stop the retry loop.
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri());
    let fetcher = make_fetcher(&config);

    let body = fetcher
        .fetch(&format!("{}/flaky", mock_server.uri()))
        .await
        .expect("Fetch should recover");
    assert_eq!(body.as_deref(), Some("recovered"));
}

#[tokio::test]
async fn test_empty_body_is_suppressed_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri());
    let fetcher = make_fetcher(&config);

    let body = fetcher
        .fetch(&format!("{}/empty", mock_server.uri()))
        .await
        .expect("Empty body must not be an error");
    assert_eq!(body, None);
}

#[tokio::test]
async fn test_fetches_are_spaced_by_the_throttle_gate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri());
    config.crawler.min_request_interval = 100;
    let fetcher = make_fetcher(&config);

    let start = Instant::now();
    for i in 0..3 {
        fetcher
            .fetch(&format!("{}/page{}", mock_server.uri(), i))
            .await
            .unwrap();
    }

    // Three grants means at least two full intervals.
    assert!(
        start.elapsed() >= Duration::from_millis(200),
        "Fetches were not throttled: {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_set_cookie_is_sent_on_the_next_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("welcome")
                .insert_header("set-cookie", "session=abc"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // The second fetch must carry the cookie the first response set.
    Mock::given(method("GET"))
        .and(path("/next"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri());
    let fetcher = make_fetcher(&config);

    fetcher
        .fetch(&format!("{}/login", mock_server.uri()))
        .await
        .unwrap();
    let body = fetcher
        .fetch(&format!("{}/next", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(body.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_initial_cookie_from_config_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .and(header("cookie", "logged_in=no;tz=UTC"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri());
    config.request.cookie = vec!["logged_in=no".to_string(), "tz=UTC".to_string()];
    let fetcher = make_fetcher(&config);

    let body = fetcher
        .fetch(&format!("{}/home", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(body.as_deref(), Some("ok"));
}
