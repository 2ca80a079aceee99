//! Stookwijzer monitor.
//!
//! Polls the wood-burning advisory for one location:
//! - Resolves the location to RD once at startup
//! - Updates on a fixed interval until Ctrl+C, or once with `--once`
//! - Logs every reading and prints a JSON snapshot per update

mod snapshot;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use stookwijzer::{ClientConfig, GeoPoint, Stookwijzer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use snapshot::Snapshot;

#[derive(Parser, Debug)]
#[command(name = "stookwijzer-monitor")]
#[command(about = "Polls the RIVM Stookwijzer wood-burning advisory")]
struct Args {
    /// Latitude of the monitored location (WGS84)
    #[arg(long, env = "STOOKWIJZER_LATITUDE", allow_hyphen_values = true)]
    latitude: f64,

    /// Longitude of the monitored location (WGS84)
    #[arg(long, env = "STOOKWIJZER_LONGITUDE", allow_hyphen_values = true)]
    longitude: f64,

    /// Client configuration file (YAML); defaults apply when omitted
    #[arg(long, env = "STOOKWIJZER_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds between updates
    #[arg(long, env = "STOOKWIJZER_INTERVAL", default_value = "1800")]
    interval_secs: u64,

    /// Update once, print the snapshot and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    let config = match args.config {
        Some(ref path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if args.interval_secs == 0 {
        anyhow::bail!("--interval-secs must be > 0");
    }

    let location = GeoPoint::new(args.latitude, args.longitude);
    info!(
        latitude = location.latitude,
        longitude = location.longitude,
        layer = %config.layer,
        policy = ?config.advice_policy,
        "Starting Stookwijzer monitor"
    );

    let mut client = Stookwijzer::for_location(&config, location)
        .await
        .context("Failed to set up the Stookwijzer client")?;

    if args.once {
        client.update().await;
        print_snapshot(&client)?;
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                client.update().await;
                print_snapshot(&client)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn print_snapshot(client: &Stookwijzer) -> Result<()> {
    let snapshot = Snapshot::from_client(client);
    if let Some(ref error) = snapshot.error {
        warn!(error = %error, "Advice unavailable");
    }
    println!("{}", serde_json::to_string(&snapshot)?);
    Ok(())
}
