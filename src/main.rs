//! job-listing-scraper main entry point
//!
//! This is the command-line interface: it resolves the configuration and the
//! search keyword, drives one run, and writes the CSV result file.

use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use job_listing_scraper::config::{load_config_with_hash, validate, Backend, Config};
use job_listing_scraper::navigator::{HttpNavigator, Navigator, WebDriverNavigator};
use job_listing_scraper::output::{result_path, CsvSink, ResultSink};
use job_listing_scraper::recorder::{print_statistics, run_timestamp};
use job_listing_scraper::{Pipeline, RunRecorder, RunReport, ScrapeError};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// job-listing-scraper: collect job listings for a keyword
///
/// Searches the job board for a keyword, walks the result pages up to a
/// limit, and writes company name, tagline, employment status and first-year
/// salary of every listing to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "job-listing-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Paginated job listing extractor", long_about = None)]
struct Cli {
    /// Search keyword (prompted for when omitted)
    #[arg(value_name = "KEYWORD")]
    keyword: Option<String>,

    /// Maximum number of result pages to visit
    #[arg(long, value_name = "N")]
    page_limit: Option<u32>,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Open the listing URL for the keyword instead of using the search form
    #[arg(long)]
    direct_url: bool,

    /// Navigation backend
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Webdriver,
    Http,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Webdriver => Backend::Webdriver,
            BackendArg::Http => Backend::Http,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let keyword = match cli.keyword.clone() {
        Some(keyword) => keyword,
        None => prompt_keyword()?,
    };

    let timestamp = run_timestamp();
    let log_path = Path::new(&config.output.logs_dir).join(format!("log_{}.log", timestamp));
    let mut recorder = RunRecorder::with_log_file(&log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;

    recorder.info(format!(
        "Run started: backend {:?}, page limit {}, headless {}, direct url {}",
        config.browser.backend,
        config.run.page_limit,
        config.browser.headless,
        config.run.direct_url
    ));

    let outcome = match config.browser.backend {
        Backend::Webdriver => match WebDriverNavigator::connect(&config.browser).await {
            Ok(navigator) => run_with(navigator, &config, &keyword, &mut recorder).await,
            Err(e) => Err(e.into()),
        },
        Backend::Http => match HttpNavigator::new(&config.browser) {
            Ok(navigator) => run_with(navigator, &config, &keyword, &mut recorder).await,
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = &outcome {
        recorder.error(format!("Run aborted: {}", e));
    }

    // partial results are written too
    let mut sink = CsvSink::new(result_path(
        &config.output.results_dir,
        &keyword,
        &timestamp,
    ));
    sink.write(recorder.records())
        .with_context(|| format!("cannot write results to {}", sink.path().display()))?;
    recorder.info(format!(
        "Wrote {} records to {}",
        recorder.records().len(),
        sink.path().display()
    ));

    let stats = recorder.stats();
    recorder.info(format!(
        "completed: succeeded {} / failed {}",
        stats.succeeded, stats.failed
    ));

    if !cli.quiet {
        print_statistics(&stats);
    }

    match outcome {
        Ok(report) => {
            tracing::info!(
                "Visited {} pages, stopped because the run {}",
                report.pages_visited,
                report.termination
            );
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("scraping run failed")),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_listing_scraper=info,warn"),
            1 => EnvFilter::new("job_listing_scraper=debug,info"),
            2 => EnvFilter::new("job_listing_scraper=trace,debug"),
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

/// Loads the config file (if any), applies CLI overrides and validates
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("cannot load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(limit) = cli.page_limit {
        config.run.page_limit = limit;
    }
    if cli.headless {
        config.browser.headless = true;
    }
    if cli.direct_url {
        config.run.direct_url = true;
    }
    if let Some(backend) = cli.backend {
        config.browser.backend = backend.into();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

fn prompt_keyword() -> anyhow::Result<String> {
    let keyword: String = Input::new()
        .with_prompt("Search keyword")
        .allow_empty(true)
        .interact_text()
        .context("cannot read keyword")?;
    Ok(keyword)
}

/// Runs the pipeline on `navigator` and always closes the session
async fn run_with<N: Navigator>(
    navigator: N,
    config: &Config,
    keyword: &str,
    recorder: &mut RunRecorder,
) -> Result<RunReport, ScrapeError> {
    let mut pipeline = Pipeline::new(config.clone(), navigator)?;
    let result = pipeline.run(keyword, recorder).await;

    if let Err(e) = pipeline.navigator_mut().close().await {
        tracing::warn!("Failed to close navigator: {}", e);
    }

    result
}
