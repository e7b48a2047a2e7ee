//! Offline Run Example
//!
//! Logs a short training loop to an offline run directory.
//!
//! Run with: cargo run --example offline_run
//! Set `WANDB_PROJECT` / `WANDB_DIR` to override the defaults.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use wandb_logger::backend::file::{read_history, FileClient};
use wandb_logger::backend::ModelSummary;
use wandb_logger::{ExperimentLogger, LoggerConfig, Metrics};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    println!("=== Offline Experiment Logging ===\n");

    let root = std::env::temp_dir().join("wandb-logger-demo");
    let config = LoggerConfig {
        project: Some("movielens-100k".into()),
        name: Some("sar-baseline".into()),
        ..LoggerConfig::default()
    }
    .with_env();

    let mut logger = ExperimentLogger::new(FileClient::new(&root), config)?;
    println!("1. Init options: {}", serde_json::to_string(logger.init_options())?);

    // -------------------------------------------------------------------------
    // 2. Watch the model
    // -------------------------------------------------------------------------
    let model = ModelSummary::new("sar")
        .parameter("item_similarity", 1_682 * 1_682)
        .parameter("user_affinity", 943 * 1_682);
    logger.watch(&model)?;
    println!("2. Watching {} ({} parameters)", model.name(), model.parameter_count());

    // -------------------------------------------------------------------------
    // 3. Simulated evaluation loop
    // -------------------------------------------------------------------------
    println!("3. Logging metrics...");
    for epoch in 0..5 {
        let ndcg = 0.30 + 0.02 * f64::from(epoch);
        let mut metrics = Metrics::new();
        metrics.insert("epoch".into(), epoch.into());
        metrics.insert("ndcg@10".into(), ndcg.into());
        logger.log_metrics(&metrics)?;
        println!("   Epoch {epoch}: ndcg@10={ndcg:.4}");
    }

    // -------------------------------------------------------------------------
    // 4. Inspect the run directory
    // -------------------------------------------------------------------------
    let session = logger.experiment()?;
    let dir = session.dir().to_path_buf();
    println!("\n4. Run directory: {}", dir.display());
    println!("   History rows: {}", read_history(&dir)?.len());

    // -------------------------------------------------------------------------
    // 5. Snapshot for a later resume
    // -------------------------------------------------------------------------
    println!("\n5. Snapshot: {}", logger.snapshot().to_json()?);

    println!("\n=== Offline Run Complete ===");
    Ok(())
}
