//! Mailtrawl main entry point
//!
//! Command-line interface for the mailtrawl social-graph email crawler.

use clap::Parser;
use mailtrawl::config::load_config;
use mailtrawl::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mailtrawl: a rate-limited social-graph email crawler
///
/// Mailtrawl walks each seed user's paginated follower listing, fetches
/// every follower's profile page, and appends each non-empty public email
/// to an output file, pacing all requests through one global throttle.
#[derive(Parser, Debug)]
#[command(name = "mailtrawl")]
#[command(version = "1.0.0")]
#[command(about = "A rate-limited social-graph email crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mailtrawl=info,warn"),
            1 => EnvFilter::new("mailtrawl=debug,info"),
            2 => EnvFilter::new("mailtrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &mailtrawl::config::Config) {
    println!("=== Mailtrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!(
        "  Minimum request interval: {}ms",
        config.crawler.min_request_interval
    );
    println!("  Request timeout: {}ms", config.crawler.request_timeout);
    println!(
        "  Retries: {} ({}ms apart)",
        config.crawler.max_retries, config.crawler.retry_delay
    );

    println!("\nRequest Headers:");
    println!("  User agent: {}", config.request.user_agent);
    println!("  Initial cookies: {}", config.request.cookie.len());

    println!("\nOutput:");
    println!("  Email file: {}", config.output.email_path);

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", config.crawler.followers_url(seed));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: mailtrawl::config::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} seeds at one request per {}ms",
        config.crawler.seeds.len(),
        config.crawler.min_request_interval
    );

    match crawl(config).await {
        Ok(()) => {
            tracing::info!("Crawl finished");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
