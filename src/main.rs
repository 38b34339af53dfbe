//! Site-Indexer main entry point
//!
//! This is the command-line interface for the Site-Indexer crawler.

use anyhow::Context;
use clap::Parser;
use site_indexer::config::resolve_config;
use site_indexer::crawler::{CrawlEngine, HttpFetcher};
use site_indexer::storage::open_store;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Site-Indexer: a same-domain site crawler
///
/// Site-Indexer crawls every page reachable from a seed URL on the same
/// site, storing page content and the link graph in a SQLite database.
/// An aborted crawl leaves a frontier dump that `--restore` resumes from.
#[derive(Parser, Debug)]
#[command(name = "site-indexer")]
#[command(version)]
#[command(about = "A same-domain site crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Directory receiving the database and the frontier dump
    #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Resume from a frontier dump written by an aborted run
    #[arg(long, value_name = "FILE")]
    restore: Option<PathBuf>,

    /// Where to write the frontier if the crawl aborts [default: OUTPUT_DIR/frontier.txt]
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Delete an existing database before crawling
    #[arg(long, conflicts_with = "restore")]
    fresh: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let config = resolve_config(cli.config.as_deref(), cli.user_agent.clone(), cli.timeout)
        .context("Failed to load configuration")?;

    std::fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!("Failed to create output directory {}", cli.output_dir.display())
    })?;

    let database_path = cli.output_dir.join(&config.output.database_name);
    let dump_path = cli
        .dump
        .clone()
        .unwrap_or_else(|| cli.output_dir.join(&config.output.dump_name));

    let store = open_store(&database_path, cli.fresh)
        .with_context(|| format!("Failed to open database {}", database_path.display()))?;
    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;

    tracing::info!("Writing results to: {}", database_path.display());

    let mut engine = CrawlEngine::new(fetcher, store, config.request_options());

    if let Some(restore_path) = &cli.restore {
        engine
            .restore(restore_path)
            .with_context(|| format!("Failed to restore frontier from {}", restore_path.display()))?;
    }

    match engine.start(Some(cli.seed.as_str())).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl finished: {} pages processed, {} fetched, {} probes",
                summary.pages_processed,
                summary.pages_fetched,
                summary.probes
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl aborted: {}", e);

            let pending = engine
                .dump(&dump_path)
                .with_context(|| format!("Failed to write frontier dump {}", dump_path.display()))?;

            eprintln!(
                "Crawl aborted with {} pending URLs; resume with --restore {}",
                pending,
                dump_path.display()
            );
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_indexer=info,warn"),
            1 => EnvFilter::new("site_indexer=debug,info"),
            2 => EnvFilter::new("site_indexer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}
