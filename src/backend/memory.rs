//! In-memory tracking client
//!
//! Runs live in a shared [`TrackingStore`]. Handy for tests and for
//! inspecting what a logger would have sent.

use std::sync::Arc;

use super::{requested_run_id, MetricRecord, ModelSummary, RunRecord, TrackingStore, WatchRecord};
use crate::client::{Metrics, Session, TrackingClient};
use crate::options::InitOptions;
use crate::{Error, Result};

/// Client whose runs are kept in a [`TrackingStore`].
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    store: Arc<TrackingStore>,
}

impl MemoryClient {
    /// Create a client with a fresh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client over an existing store.
    #[must_use]
    pub const fn with_store(store: Arc<TrackingStore>) -> Self {
        Self { store }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &TrackingStore {
        &self.store
    }
}

impl TrackingClient for MemoryClient {
    type Session = MemorySession;

    fn name(&self) -> &str {
        "memory"
    }

    fn init(&self, options: &InitOptions) -> Result<MemorySession> {
        let run_id = requested_run_id(options);

        if self.store.open_run(&run_id, options)? {
            tracing::info!(run_id = %run_id, "resumed run");
        } else {
            tracing::info!(run_id = %run_id, project = ?options.project(), "created run");
        }

        Ok(MemorySession {
            run_id,
            store: Arc::clone(&self.store),
        })
    }
}

/// Session writing to a [`TrackingStore`].
#[derive(Debug)]
pub struct MemorySession {
    run_id: String,
    store: Arc<TrackingStore>,
}

impl MemorySession {
    /// Step the next `log` call writes to.
    #[must_use]
    pub fn step(&self) -> Option<u64> {
        self.store.get_run(&self.run_id).map(|run| run.step())
    }

    /// Mark the run finished.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunNotFound`] if the run was removed from the store.
    pub fn finish(&self) -> Result<()> {
        self.store
            .update_run(&self.run_id, RunRecord::finish)
            .ok_or_else(|| Error::RunNotFound(self.run_id.clone()))
    }
}

impl Session for MemorySession {
    type Model = ModelSummary;
    type Error = Error;

    fn id(&self) -> &str {
        &self.run_id
    }

    fn watch(&mut self, model: &ModelSummary) -> Result<()> {
        if !self.store.contains_run(&self.run_id) {
            return Err(Error::RunNotFound(self.run_id.clone()));
        }
        self.store
            .add_watch(WatchRecord::new(self.run_id.clone(), model.clone()));
        Ok(())
    }

    fn log(&mut self, metrics: &Metrics) -> Result<()> {
        let step = self
            .store
            .update_run(&self.run_id, RunRecord::advance_step)
            .ok_or_else(|| Error::RunNotFound(self.run_id.clone()))?;

        for (key, value) in metrics {
            self.store.add_metric(MetricRecord::new(
                self.run_id.clone(),
                key.clone(),
                step,
                value.clone(),
            ));
        }
        Ok(())
    }
}
