//! Studio Link demo
//!
//! Connects to a switcher, prints the mirrored state after every update and
//! optionally cuts on a fixed interval.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_link::{StudioClient, StudioConfig, StudioEvent};

/// Studio Link - mirror and control a Livestream Studio switcher
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Switcher host (overrides the configuration file)
    #[arg(long, env = "STUDIO_HOST")]
    host: Option<String>,

    /// Switcher control port (overrides the configuration file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Send a cut every N seconds while connected
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    cut_interval: Option<u64>,

    /// Pretty-print the state JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut config = match &args.config {
        Some(path) => {
            info!("Configuration file: {}", path);
            StudioConfig::load(path).await?
        },
        None => StudioConfig::default(),
    };
    if let Some(host) = args.host.clone() {
        config.host = Some(host);
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate().context("Invalid configuration")?;
    if config.host.is_none() {
        anyhow::bail!("No switcher host given (use --host, STUDIO_HOST or the config file)");
    }

    info!("Starting studio-link...");
    let client = StudioClient::new(config);
    let mut events = client.subscribe_channel();
    client.connect();

    let mut cut_timer = args.cut_interval.map(|secs| {
        let period = Duration::from_secs(secs);
        interval_at(Instant::now() + period, period)
    });

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(event) = events.recv() => print_event(&client, &event, args.pretty)?,
            _ = tick(&mut cut_timer) => {
                if client.is_connected() {
                    info!("Sending cut");
                    client.cut()?;
                }
            },
        }
    }

    client.shutdown();
    info!("studio-link shutdown complete");
    Ok(())
}

fn print_event(client: &StudioClient, event: &StudioEvent, pretty: bool) -> Result<()> {
    match event {
        StudioEvent::Connect => println!("{}", "connect".bold().green()),
        StudioEvent::Update(packet_type) => {
            let state = client.snapshot_json()?;
            let json = if pretty {
                serde_json::to_string_pretty(&state)?
            } else {
                serde_json::to_string(&state)?
            };
            println!("{} {}", "update".bold().cyan(), packet_type.yellow());
            println!("{}", json);
        },
        StudioEvent::Close { had_error } => {
            let label = if *had_error { "close (error)" } else { "close" };
            println!("{}", label.bold().yellow());
        },
        StudioEvent::Error(e) => println!("{} {}", "error".bold().red(), e),
    }
    Ok(())
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        },
        None => std::future::pending().await,
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
