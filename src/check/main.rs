//! Data completeness check and one-off lookups.
//!
//! Loads the same data the server does, reports boundaries that were
//! skipped or have no parent mapping, and optionally resolves one point.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use constituency::config::{BoundsConfig, Config, DataConfig};
use constituency::loader::load_data_store;
use constituency::ParentMapper;

#[derive(Parser, Debug)]
#[command(name = "check")]
#[command(about = "Check constituency data completeness and resolve single points")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding ac_bangalore.geojson, ac_data.json and pc_data.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Latitude to resolve (requires --lon)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude to resolve (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Fail if any boundary was skipped, unnamed or has no parent mapping
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data = DataConfig::in_dir(dir);
    }

    let (store, report) = load_data_store(&config.data, ParentMapper::bangalore())?;

    for skipped in &report.skipped {
        warn!("Skipped '{}': {}", skipped.name, skipped.error);
    }
    for name in &report.unmapped {
        warn!("Unmapped boundary '{}'", name);
    }

    let names = store.known_names();
    info!(
        "{} assembly constituencies across {} parliamentary constituencies",
        names.boundaries.len(),
        names.parents.len()
    );

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        check_point(lat, lon, &config.bounds)?;
        match store.resolve(lat, lon) {
            Some(resolution) => println!("{}", serde_json::to_string_pretty(&resolution)?),
            None => bail!("No boundary contains ({}, {})", lat, lon),
        }
    }

    if args.strict && !report.is_clean() {
        bail!(
            "Data incomplete: {} skipped, {} unnamed, {} unmapped",
            report.skipped.len(),
            report.unnamed,
            report.unmapped.len()
        );
    }

    info!("Check complete");
    Ok(())
}

/// Reject coordinates the resolver cannot handle; out-of-bounds points only warn.
fn check_point(lat: f64, lon: f64, bounds: &BoundsConfig) -> Result<()> {
    if !lat.is_finite() || !lon.is_finite() {
        bail!("Coordinates ({}, {}) must be finite numbers", lat, lon);
    }
    if !bounds.contains(lat, lon) {
        warn!("({}, {}) is outside the configured lookup bounds", lat, lon);
    }
    Ok(())
}
