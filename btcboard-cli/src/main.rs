//! BTCBoard CLI — terminal dashboard for spot price, moving averages, and AHR999.
//!
//! Commands:
//! - `snapshot` — one refresh, printed as text or JSON
//! - `watch` — refresh on a fixed interval with a clock tick in between
//! - `history` — load the CSV history and report what was parsed

mod render;
mod schedule;

use anyhow::{bail, Context, Result};
use btcboard_core::data::{parse_history, provider_for, HistoryProvider, HistorySource};
use btcboard_core::{Dashboard, DashboardConfig};
use clap::{Parser, Subcommand};
use schedule::{Tick, Ticker};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "btcboard",
    about = "BTCBoard — bitcoin price dashboard with CSV-backed moving averages"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the history source (path or http(s) URL).
    #[arg(long, global = true)]
    history: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh once and print the dashboard.
    Snapshot {
        /// Use this spot price instead of querying the price feed.
        #[arg(long)]
        price: Option<f64>,

        /// Offline mode: no network feeds, fallback quote and index.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Print the snapshot as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Refresh on the configured interval until interrupted.
    Watch {
        /// Offline mode: no network feeds, fallback quote and index.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Stop after this many refreshes.
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Load the price history and report what was parsed.
    History {
        /// Number of most recent rows to print.
        #[arg(long, default_value_t = 5)]
        tail: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("btcboard=info,btcboard_core=info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.history.as_deref())?;

    match cli.command {
        Commands::Snapshot {
            price,
            offline,
            json,
        } => run_snapshot(config, price, offline, json),
        Commands::Watch { offline, ticks } => run_watch(config, offline, ticks),
        Commands::History { tail } => run_history(&config, tail),
    }
}

fn load_config(path: Option<&PathBuf>, history: Option<&str>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(source) = history {
        config.history.source = HistorySource::parse(source);
    }
    Ok(config)
}

fn build_dashboard(config: DashboardConfig, offline: bool) -> Result<Dashboard> {
    let dashboard = if offline {
        Dashboard::offline(config)?
    } else {
        Dashboard::new(config)?
    };
    tracing::debug!(?dashboard, "dashboard ready");
    Ok(dashboard)
}

fn run_snapshot(config: DashboardConfig, price: Option<f64>, offline: bool, json: bool) -> Result<()> {
    if let Some(p) = price {
        if !(p.is_finite() && p > 0.0) {
            bail!("--price must be a positive number, got {p}");
        }
    }

    let dashboard = build_dashboard(config, offline || price.is_some())?;
    let snapshot = match price {
        Some(p) => dashboard.snapshot_for_price(p),
        None => dashboard.refresh(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        render::print_snapshot(&snapshot);
    }
    Ok(())
}

fn run_watch(config: DashboardConfig, offline: bool, ticks: Option<u64>) -> Result<()> {
    if ticks == Some(0) {
        bail!("--ticks must be at least 1");
    }

    let dashboard = build_dashboard(config, offline)?;
    let refresh_every = dashboard.config().refresh_interval();
    let clock_every = dashboard.config().clock_interval();

    tracing::info!(
        refresh_secs = refresh_every.as_secs(),
        clock_secs = clock_every.as_secs(),
        "watching"
    );

    render::print_snapshot(&dashboard.refresh());
    let mut refreshes = 1u64;
    let mut ticker = Ticker::new(refresh_every, clock_every, Instant::now());

    while ticks.map_or(true, |limit| refreshes < limit) {
        let now = Instant::now();
        let due = ticker.next_due();
        if due > now {
            std::thread::sleep(due - now);
        }

        match ticker.poll(Instant::now()) {
            Some(Tick::Refresh) => {
                tracing::debug!(refreshes, "scheduled refresh");
                render::print_snapshot(&dashboard.refresh());
                refreshes += 1;
            }
            Some(Tick::Clock) => {
                println!("[{}]", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
            }
            None => {}
        }
    }

    Ok(())
}

fn run_history(config: &DashboardConfig, tail: usize) -> Result<()> {
    let source = &config.history.source;
    let provider = provider_for(source, config.history_timeout())?;
    let text = provider
        .fetch_text()
        .with_context(|| format!("loading history from {source}"))?;
    let report = parse_history(&text)?;
    let history = &report.history;

    println!("Source:   {source}");
    println!("Records:  {}", history.len());
    match history.date_range() {
        Some((oldest, newest)) => println!("Range:    {oldest} to {newest}"),
        None => println!("Range:    (empty)"),
    }
    if report.skipped_short > 0 {
        println!("Skipped:  {} short line(s)", report.skipped_short);
    }
    if report.dropped_invalid > 0 {
        println!("Dropped:  {} row(s) with bad date or price", report.dropped_invalid);
    }

    if !history.is_empty() && tail > 0 {
        println!();
        println!("{:<12} {:>14}", "Date", "Price");
        println!("{}", "-".repeat(27));
        for point in history.iter().take(tail) {
            println!("{:<12} {:>14.2}", point.date.to_string(), point.price);
        }
    }

    Ok(())
}
