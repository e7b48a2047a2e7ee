//! Resume From Snapshot Example
//!
//! A logger is captured mid-run, rebuilt from the snapshot, and keeps
//! logging into the same run.
//!
//! Run with: cargo run --example resume_from_snapshot

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use wandb_logger::backend::memory::MemoryClient;
use wandb_logger::{ExperimentLogger, LoggerSnapshot, Metrics, Session};

fn loss(value: f64) -> Metrics {
    let mut metrics = Metrics::new();
    metrics.insert("loss".into(), value.into());
    metrics
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("debug".parse()?))
        .init();

    let client = MemoryClient::new();

    let mut logger = ExperimentLogger::builder(client.clone())
        .project("amazon-reviews")
        .name("bpr")
        .build()?;
    logger.log_metrics(&loss(0.91))?;
    logger.log_metrics(&loss(0.74))?;

    let json = logger.snapshot().to_json()?;
    println!("Snapshot: {json}");
    drop(logger);

    let snapshot = LoggerSnapshot::from_json(&json)?;
    let mut restored = ExperimentLogger::from_snapshot(client.clone(), snapshot)?;
    restored.log_metrics(&loss(0.62))?;

    let run_id = restored.experiment()?.id().to_string();
    for metric in client.store().metrics_for_run(&run_id, "loss") {
        println!("step {}: {}", metric.step(), metric.value());
    }
    Ok(())
}
