//! Lead-Ripple main entry point
//!
//! This is the command-line interface for the Lead-Ripple contact harvester.

use anyhow::Context;
use clap::Parser;
use lead_ripple::config::{load_config_with_hash, validate, Config};
use lead_ripple::crawler::{Coordinator, CrawlSession, HarvestReport, HarvestRequest, TokioSleeper};
use lead_ripple::discovery::{select_provider, SiteDiscovery};
use lead_ripple::output::{
    generate_markdown_summary, generate_summary, load_statistics, print_statistics, write_csv,
};
use lead_ripple::storage::{RunStatus, SqliteStorage, Storage};
use lead_ripple::url::normalize_domain;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Lead-Ripple: a polite business contact harvester
///
/// Lead-Ripple finds business websites for keywords and regions, crawls a few
/// pages of each site while respecting robots.txt, and extracts one contact
/// lead per domain.
#[derive(Parser, Debug)]
#[command(name = "lead-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A polite business contact harvester", long_about = None)]
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

    /// Validate config and show what would be harvested without any network access
    #[arg(long, conflicts_with_all = ["stats", "export_csv"])]
    dry_run: bool,

    /// Show statistics of the latest stored run and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_csv"])]
    stats: bool,

    /// Export the leads of the latest stored run as CSV and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_csv: Option<PathBuf>,

    /// Additional seed URL to crawl (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Override the number of leads to collect
    #[arg(long, value_name = "N")]
    target: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(path) = &cli.export_csv {
        handle_export_csv(&config, path)?;
    } else {
        handle_harvest(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lead_ripple=info,warn"),
            1 => EnvFilter::new("lead_ripple=debug,info"),
            2 => EnvFilter::new("lead_ripple=trace,debug"),
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

/// Merges CLI flags and provider keys from the environment into the config
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    config.search.seeds.extend(cli.seeds.iter().cloned());
    if let Some(target) = cli.target {
        config.crawler.target = target;
    }

    if config.providers.serpapi_key.is_none() {
        config.providers.serpapi_key = std::env::var("SERPAPI_KEY").ok();
    }
    if config.providers.bing_key.is_none() {
        config.providers.bing_key = std::env::var("BING_KEY").ok();
    }

    validate(config)?;
    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config) {
    println!("=== Lead-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Target leads: {}", config.crawler.target);
    println!("  Max pages per domain: {}", config.crawler.max_pages);
    println!("  Request timeout: {}s", config.crawler.timeout_secs);
    println!("  Retries per page: {}", config.crawler.max_retries);
    println!(
        "  Expansion email threshold: {}",
        config.crawler.expansion_email_threshold
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nSearch:");
    println!("  Keywords: {}", config.search.keywords.join(", "));
    println!("  Regions: {}", config.search.regions.join(", "));
    let queries = lead_ripple::discovery::build_queries(&config.search.keywords, &config.search.regions);
    let provider = if config.providers.serpapi_key.is_some() {
        "serpapi"
    } else if config.providers.bing_key.is_some() {
        "bing"
    } else {
        "none"
    };
    println!("  Queries: {} (provider: {})", queries.len(), provider);
    for query in &queries {
        println!("    * {}", query);
    }

    println!("\nSeeds ({}):", config.search.seeds.len());
    for seed in &config.search.seeds {
        println!("  - {}", seed);
    }

    if let Some(pattern) = &config.filter.region_pattern {
        println!("\nRegion filter: {}", pattern);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);
    if let Some(csv) = &config.output.csv_path {
        println!("  CSV: {}", csv);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics of the latest run
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let run = storage
        .get_latest_run()?
        .context("No harvest runs found in database")?;

    let stats = load_statistics(&storage, &run)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-csv mode: writes the leads of the latest run
fn handle_export_csv(config: &Config, path: &Path) -> anyhow::Result<()> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let run = storage
        .get_latest_run()?
        .context("No harvest runs found in database")?;

    let leads = storage.load_leads(run.id)?;
    write_csv(&leads, path)?;

    println!("✓ Exported {} leads to: {}", leads.len(), path.display());
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, config_hash: &str) -> anyhow::Result<()> {
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .context("Failed to open lead database")?;
    let run_id = storage.create_run(config_hash, config.crawler.target as u64)?;
    tracing::info!("Starting harvest run {}", run_id);

    let sleeper = Arc::new(TokioSleeper);
    let session = CrawlSession::from_config(&config, sleeper.clone())?;

    let provider = select_provider(
        session.fetcher().client(),
        config.providers.serpapi_key.as_deref(),
        config.providers.bing_key.as_deref(),
    );
    let discovery = SiteDiscovery::new(provider, sleeper);
    tracing::info!(
        "Search provider: {}",
        discovery.provider_name().unwrap_or("none (seeds only)")
    );

    let cancel = session.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current step");
            cancel.cancel();
        }
    });

    let coordinator = Coordinator::new(session, discovery);
    let request = HarvestRequest::from_config(&config);

    let report = coordinator
        .run_with_progress(&request, |processed, total, lead| match lead {
            Some(lead) => tracing::info!("[{}/{}] {} <{}>", processed, total, lead.name, lead.email),
            None => tracing::info!("[{}/{}] no lead", processed, total),
        })
        .await;

    persist_report(&mut storage, run_id, &report)?;

    let summary = generate_summary(&storage, run_id)?;
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;
    tracing::info!("Summary written to {}", config.output.summary_path);

    if let Some(csv_path) = &config.output.csv_path {
        write_csv(&report.leads, Path::new(csv_path))?;
        tracing::info!("Leads exported to {}", csv_path);
    }

    tracing::info!(
        "Harvest finished: {} leads from {} candidates",
        report.leads.len(),
        report.stats.candidates
    );

    Ok(())
}

fn persist_report(storage: &mut SqliteStorage, run_id: i64, report: &HarvestReport) -> anyhow::Result<()> {
    for lead in &report.leads {
        let domain = normalize_domain(&lead.website).unwrap_or_else(|| lead.website.clone());
        storage.insert_lead(run_id, &domain, lead)?;
    }
    for (candidate, reason) in &report.skipped {
        storage.record_skip(run_id, candidate, reason)?;
    }

    let status = if report.cancelled {
        RunStatus::Interrupted
    } else {
        RunStatus::Completed
    };
    storage.complete_run(run_id, status, &report.stats)?;
    Ok(())
}
