//! Synthetic water-quality imagery producer.
//!
//! Every cycle, tiles each configured micro-area, uploads a rendered scene
//! to object storage and prints one JSON payload per area.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use producer::{FileSink, PayloadSink, ProducerConfig, ProducerPipeline, StdoutSink};
use storage::{BlobStore, ObjectStorage};

#[derive(Parser, Debug)]
#[command(name = "producer")]
#[command(about = "Synthetic Sentinel-2 water-quality imagery producer")]
struct Args {
    /// Configuration file path (environment variables are used when absent)
    #[arg(short, long, env = "PRODUCER_CONFIG")]
    config: Option<String>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Keep images in memory instead of uploading them
    #[arg(long)]
    dry_run: bool,

    /// Append payloads to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Base seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Logs go to stderr; stdout carries payloads
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    info!("Starting imagery producer");

    let mut config = match &args.config {
        Some(path) => ProducerConfig::from_yaml(path)?,
        None => ProducerConfig::from_env()?,
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    info!(
        areas = config.areas.len(),
        max_area_km2 = config.max_area_km2,
        seed = ?config.seed,
        "Loaded configuration"
    );

    let store: Arc<dyn BlobStore> = if args.dry_run {
        info!(bucket = %config.storage.bucket, "Dry run, images kept in memory");
        Arc::new(ObjectStorage::in_memory(config.storage.bucket.clone()))
    } else {
        Arc::new(ObjectStorage::new(&config.storage)?)
    };

    let sink: Box<dyn PayloadSink> = match &args.output {
        Some(path) => Box::new(FileSink::open(path)?),
        None => Box::new(StdoutSink),
    };

    let pipeline = ProducerPipeline::new(config, store, sink)?;

    if args.once {
        let summary = pipeline.run_cycle().await;
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Single cycle complete"
        );
        if summary.failed > 0 && summary.succeeded == 0 {
            anyhow::bail!("All {} areas failed", summary.failed);
        }
        return Ok(());
    }

    pipeline.run_forever().await
}
