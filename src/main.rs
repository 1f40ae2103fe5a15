//! Funding Rate API - Main Entry Point
//!
//! Serves the funding-rate and market-overview endpoints, or runs a one-shot
//! (optionally periodic) funding scan from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use funding_rate_api::api::{self, AppState};
use funding_rate_api::config::{Config, LoggingConfig};
use funding_rate_api::exchange::FundingSource;
use funding_rate_api::market::{self, assemble, perpetual_market_names, top_positive};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Funding Rate API CLI
#[derive(Parser)]
#[command(name = "funding-rate-api")]
#[command(version, about = "Hyperliquid funding rates and spot market overview over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch, assemble and rank funding rates, then log the result
    Scan {
        /// Number of top markets to show (overrides ranking.top_n)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Repeat every N seconds until Ctrl-C
        #[arg(short, long)]
        interval_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    let _guard = init_logging(&config.logging)?;

    match cli.command.unwrap_or(Commands::Serve {
        bind: None,
        port: None,
    }) {
        Commands::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            run_server(config).await
        }
        Commands::Scan {
            top_n,
            interval_secs,
        } => {
            if let Some(top_n) = top_n {
                config.ranking.top_n = top_n;
            }
            config.validate()?;
            run_scan(config, interval_secs.map(Duration::from_secs)).await
        }
    }
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        "Funding Rate API v{} starting (Hyperliquid: {}, CoinGecko: {})",
        env!("CARGO_PKG_VERSION"),
        config.hyperliquid.base_url,
        config.coingecko.base_url
    );

    let state = AppState::from_config(&config);

    // Failed warm-ups are retried on first request, per reconnect policy.
    for (upstream, ready) in [
        (state.funding.upstream(), state.funding.warm_up().await),
        (state.market_data.upstream(), state.market_data.warm_up().await),
    ] {
        if ready {
            info!(%upstream, "Upstream ready");
        } else {
            warn!(%upstream, "Upstream unavailable at startup");
        }
    }

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    api::serve(listener, state, shutdown_signal()).await?;

    info!("Funding Rate API shutdown complete");
    Ok(())
}

async fn run_scan(config: Config, interval: Option<Duration>) -> Result<()> {
    let state = AppState::from_config(&config);

    let Some(interval) = interval else {
        scan_once(&state, &config).await;
        return Ok(());
    };

    info!("Scanning every {}s, Ctrl-C to stop", interval.as_secs());
    let mut ticker = tokio::time::interval(interval);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => scan_once(&state, &config).await,
            _ = &mut shutdown => break,
        }
    }

    Ok(())
}

/// One fetch → assemble → rank cycle. Errors are logged, never fatal.
async fn scan_once(state: &AppState, config: &Config) {
    let source = match state.funding.get().await {
        Ok(source) => source,
        Err(e) => {
            error!("Scan failed: {}", e);
            return;
        }
    };

    let contexts = match source.fetch_asset_contexts().await {
        Ok(contexts) => contexts,
        Err(e) => {
            error!("Scan failed: {:#}", e);
            state.funding.report_failure().await;
            return;
        }
    };

    let names = perpetual_market_names(&contexts.descriptors);
    info!("Found {} perpetual markets", names.len());

    let records = match assemble(
        &contexts.descriptors,
        &contexts.states,
        &config.ranking.market_suffix,
    ) {
        Ok(records) => records,
        Err(e) => {
            error!("Scan failed: {}", e);
            return;
        }
    };

    let top = top_positive(&records, config.ranking.top_n);
    if top.is_empty() {
        info!("No markets with positive funding");
        return;
    }

    info!("Top {} funding opportunities:", top.len());
    info!("   {:<14} | {:>10} | {:>10}", "Market", "Hourly", "APR");
    for record in &top {
        info!(
            "   {:<14} | {:>9.4}% | {:>9.2}%",
            record.market, record.hourly_percentage, record.apr
        );
    }
    info!(
        "Snapshot at {:.3}, {} markets assembled",
        market::unix_timestamp(),
        records.len()
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Stdout plus a daily rolling file. The returned guard must outlive logging.
fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("Failed to create log directory {}", config.directory))?;

    let file_appender = tracing_appender::rolling::daily(&config.directory, "funding-rate-api.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::from_default_env()
        .add_directive("funding_rate_api=debug".parse()?)
        .add_directive(Level::INFO.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout.and(file_writer))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE);

    if config.json {
        builder.json().init();
    } else {
        builder.with_ansi(false).init();
    }

    Ok(guard)
}
