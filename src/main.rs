//! Site-Crawler main entry point
//!
//! This is the command-line interface for the single-host link census.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use site_crawler::config::{build_config, load_http_config, HttpConfig};
use site_crawler::crawler::crawl;
use site_crawler::output::{format_report, format_statistics, write_report};
use tracing_subscriber::EnvFilter;

/// Site-Crawler: count internal links across one website
///
/// Crawls every page reachable from BASE_URL on the same host, using at most
/// MAX_CONCURRENCY workers and registering at most MAX_PAGES distinct pages,
/// then prints how often each page is linked.
#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(version)]
#[command(about = "Counts internal links across one website", long_about = None)]
struct Cli {
    /// Seed URL; only pages on its host are crawled
    #[arg(value_name = "BASE_URL")]
    base_url: String,

    /// Maximum number of distinct pages to register
    #[arg(value_name = "MAX_PAGES")]
    max_pages: usize,

    /// Maximum number of pages processed at once
    #[arg(value_name = "MAX_CONCURRENCY")]
    max_concurrency: usize,

    /// Path to a TOML file with HTTP client settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads configuration, runs the crawl and emits the report
async fn run(cli: Cli) -> anyhow::Result<()> {
    let http = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_http_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => HttpConfig::default(),
    };

    let config = build_config(&cli.base_url, cli.max_pages, cli.max_concurrency, http)
        .context("invalid configuration")?;

    let outcome = crawl(&config).await.context("crawl failed")?;

    let report = format_report(&outcome.pages, cli.base_url.as_str());
    print!("{}", report);

    if let Some(path) = &cli.output {
        write_report(&report, path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    for line in format_statistics(&outcome.stats).lines() {
        tracing::info!("{}", line);
    }

    Ok(())
}
