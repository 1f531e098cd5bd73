//! Dronz Dispatch - plans and records one day of pizza deliveries

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dronz_dispatch::{dispatch, Config};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan drone delivery flights for one day of orders")]
struct Args {
    /// Delivery date (YYYY-MM-DD)
    date: NaiveDate,

    /// REST service base URL (overrides DRONZ_REST_URL)
    #[arg(long)]
    url: Option<String>,

    /// Directory for result files (overrides DRONZ_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("dronz_dispatch=debug".parse()?))
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(url) = args.url {
        config.rest_url = url;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    tracing::info!("Dispatching {} from {}", args.date, config.rest_url);
    dispatch::run(&config, args.date).await?;

    Ok(())
}
