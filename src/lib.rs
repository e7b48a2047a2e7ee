//! # wandb-logger: Lazily-Initialized Experiment Logger
//!
//! An [`ExperimentLogger`] holds the init options for an experiment-tracking
//! session, creates the session through a [`TrackingClient`] the first time
//! it is needed, and forwards model watching and metric logging to it.
//!
//! ## Design Principles
//!
//! - **Lazy**: no session exists until `experiment`, `watch` or
//!   `log_metrics` is called, and at most one is ever created per logger
//! - **Pass-through**: metrics go to the client as given; client errors come
//!   back as the client's own error type
//! - **Snapshot**: a logger serializes without its session and resumes the
//!   same run when restored
//!
//! ## Example Usage
//!
//! ```rust
//! use wandb_logger::backend::memory::MemoryClient;
//! use wandb_logger::backend::ModelSummary;
//! use wandb_logger::{ExperimentLogger, Metrics};
//!
//! let client = MemoryClient::new();
//! let mut logger = ExperimentLogger::builder(client.clone())
//!     .project("movielens")
//!     .version("sar-v2")
//!     .extra("group", "baselines")
//!     .build()?;
//!
//! logger.watch(&ModelSummary::new("sar").parameter("item_similarity", 1_682 * 1_682))?;
//!
//! for epoch in 0..3 {
//!     let mut metrics = Metrics::new();
//!     metrics.insert("epoch".into(), epoch.into());
//!     metrics.insert("ndcg@10".into(), (0.3 + 0.01 * f64::from(epoch)).into());
//!     logger.log_metrics(&metrics)?;
//! }
//!
//! assert_eq!(client.store().metrics_for_run("sar-v2", "ndcg@10").len(), 3);
//! # Ok::<(), wandb_logger::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod options;
pub mod snapshot;

pub use client::{Metrics, Session, SessionError, SessionModel, TrackingClient};
pub use config::LoggerConfig;
pub use error::{Error, Result};
pub use logger::{ExperimentLogger, ExperimentLoggerBuilder};
pub use options::{InitOptions, ResumePolicy};
pub use snapshot::LoggerSnapshot;
