//! Restaurant Sentinel
//!
//! Scans the watchlist for new restaurants once, or on a schedule, and
//! manages the watchlist, trusted sources and discovered restaurants.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use discovery::{seed_sources, CandidateStore, Source, SourceRegistry, WatchlistStore};
use sentinel_core::kernel::{open_store, start_scheduler, SentinelDeps};
use sentinel_core::{Config, Sentinel};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Watchlist-driven restaurant discovery")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every watchlist target once (default)
    Run,

    /// Scan on the configured cron schedule until interrupted
    Schedule,

    /// Manage the watchlist
    Watch {
        #[command(subcommand)]
        command: WatchCommands,
    },

    /// Manage trusted search domains
    Sources {
        #[command(subcommand)]
        command: SourceCommands,
    },

    /// List discovered restaurants, newest first
    Restaurants,
}

#[derive(Subcommand)]
enum WatchCommands {
    /// Track a food item
    Add {
        food: String,
        #[arg(long, default_value = "Markham")]
        location: String,
    },

    /// Show tracked food items
    List,
}

#[derive(Subcommand)]
enum SourceCommands {
    /// Install the built-in source list
    Seed,

    /// Register one domain
    Add {
        domain: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show registered domains
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,discovery=debug,sentinel_core=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(&config).await,
        Commands::Schedule => cmd_schedule(&config).await,
        Commands::Watch { command } => match command {
            WatchCommands::Add { food, location } => cmd_watch_add(&config, &food, &location).await,
            WatchCommands::List => cmd_watch_list(&config).await,
        },
        Commands::Sources { command } => match command {
            SourceCommands::Seed => cmd_sources_seed(&config).await,
            SourceCommands::Add { domain, notes } => {
                cmd_sources_add(&config, &domain, notes).await
            }
            SourceCommands::List => cmd_sources_list(&config).await,
        },
        Commands::Restaurants => cmd_restaurants(&config).await,
    }
}

async fn build_sentinel(config: &Config) -> Result<Sentinel> {
    let deps = SentinelDeps::from_config(config).await?;
    Ok(Sentinel::new(
        config.discovery_config(),
        deps,
        config.politeness_delay,
    ))
}

async fn cmd_run(config: &Config) -> Result<()> {
    tracing::info!("Sentinel waking up");
    let sentinel = build_sentinel(config).await?;

    let report = sentinel.run_once().await.context("Batch failed")?;

    println!(
        "Scanned {} target(s): {} new restaurant(s), {} failed run(s)",
        report.targets,
        report.new_records,
        report.failed()
    );
    for result in &report.results {
        let status = match result.error {
            Some(kind) => kind.to_string(),
            None => "ok".to_string(),
        };
        println!(
            "  {}: {} new, {} rejected, {} closed, {} duplicate [{}]",
            result.target,
            result.accepted.len(),
            result.rejected_count,
            result.closed.len(),
            result.duplicates.len(),
            status
        );
    }
    Ok(())
}

async fn cmd_schedule(config: &Config) -> Result<()> {
    let sentinel = Arc::new(build_sentinel(config).await?);
    let mut scheduler = start_scheduler(sentinel, &config.schedule)
        .await
        .with_context(|| format!("Invalid schedule {:?}", config.schedule))?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("Shutting down scheduler");
    scheduler.shutdown().await?;
    Ok(())
}

async fn cmd_watch_add(config: &Config, food: &str, location: &str) -> Result<()> {
    let store = open_store(config).await?;
    if store.add_target(food, location).await?.is_inserted() {
        println!("Now watching {} in {}", food, location);
    } else {
        println!("{} is already on the watchlist", food);
    }
    Ok(())
}

async fn cmd_watch_list(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let entries = store.list_targets().await?;
    if entries.is_empty() {
        println!("Watchlist is empty");
    }
    for entry in entries {
        let checked = entry
            .last_checked
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!("{} in {} (last checked: {})", entry.subject, entry.locality, checked);
    }
    Ok(())
}

async fn cmd_sources_seed(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let added = seed_sources(store.as_ref()).await?;
    println!("Added {} source(s)", added);
    Ok(())
}

async fn cmd_sources_add(config: &Config, domain: &str, notes: Option<String>) -> Result<()> {
    let store = open_store(config).await?;
    let source = Source {
        domain: domain.to_string(),
        notes,
    };
    if store.add_source(&source).await?.is_inserted() {
        println!("Added {}", domain);
    } else {
        println!("{} is already registered", domain);
    }
    Ok(())
}

async fn cmd_sources_list(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    for source in store.list_sources().await? {
        match source.notes {
            Some(notes) => println!("{} - {}", source.domain, notes),
            None => println!("{}", source.domain),
        }
    }
    Ok(())
}

async fn cmd_restaurants(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let restaurants = store.list_all().await?;
    if restaurants.is_empty() {
        println!("No restaurants discovered yet");
    }
    for r in restaurants {
        println!(
            "{} ({}) taste {}/10 - {}",
            r.name, r.neighborhood, r.taste_rating, r.notes
        );
    }
    Ok(())
}
