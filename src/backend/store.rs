//! Tracking Store - in-memory storage for runs, metrics and watches
//!
//! Backed by `DashMap`, so sessions on different threads can write to the
//! same store without an outer lock.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{check_resume, MetricRecord, RunRecord, WatchRecord};
use crate::options::InitOptions;
use crate::Result;

/// In-memory store shared by a [`MemoryClient`](super::memory::MemoryClient)
/// and its sessions.
///
/// Runs are looked up by id in O(1). Metrics and watches are bucketed per
/// run; metric queries return step-ordered time series.
#[derive(Debug, Default)]
pub struct TrackingStore {
    runs: DashMap<String, RunRecord>,
    metrics: DashMap<String, Vec<MetricRecord>>,
    watches: DashMap<String, Vec<WatchRecord>>,
}

impl TrackingStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store holds no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Get the number of runs in the store.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Get the number of metric data points across all runs.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.metrics.iter().map(|entry| entry.value().len()).sum()
    }

    /// Add a run, replacing any run with the same id.
    pub fn add_run(&self, run: RunRecord) {
        self.runs.insert(run.run_id().to_string(), run);
    }

    /// Create the run `run_id` or resume it, under one shard lock.
    ///
    /// The resume policy in `options` is checked against the entry held by
    /// the lock, so concurrent callers cannot both create the same run.
    /// Returns `true` if an existing run was resumed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunExists`](crate::Error::RunExists) or
    /// [`Error::RunNotFound`](crate::Error::RunNotFound) when the resume
    /// policy forbids the outcome.
    pub fn open_run(&self, run_id: &str, options: &InitOptions) -> Result<bool> {
        match self.runs.entry(run_id.to_string()) {
            Entry::Occupied(mut entry) => {
                check_resume(options, run_id, true)?;
                entry.get_mut().resume();
                Ok(true)
            }
            Entry::Vacant(entry) => {
                check_resume(options, run_id, false)?;
                entry.insert(RunRecord::new(run_id.to_string(), options));
                Ok(false)
            }
        }
    }

    /// Check whether a run exists.
    #[must_use]
    pub fn contains_run(&self, run_id: &str) -> bool {
        self.runs.contains_key(run_id)
    }

    /// Get a copy of a run by id.
    #[must_use]
    pub fn get_run(&self, run_id: &str) -> Option<RunRecord> {
        self.runs.get(run_id).map(|run| run.value().clone())
    }

    /// Apply `f` to a run in place. Returns `None` if the run is unknown.
    pub fn update_run<T>(&self, run_id: &str, f: impl FnOnce(&mut RunRecord) -> T) -> Option<T> {
        self.runs.get_mut(run_id).map(|mut run| f(run.value_mut()))
    }

    /// Get all runs for a project.
    #[must_use]
    pub fn runs_for_project(&self, project: &str) -> Vec<RunRecord> {
        self.runs
            .iter()
            .filter(|run| run.project() == Some(project))
            .map(|run| run.value().clone())
            .collect()
    }

    /// Add a metric data point.
    pub fn add_metric(&self, metric: MetricRecord) {
        self.metrics
            .entry(metric.run_id().to_string())
            .or_default()
            .push(metric);
    }

    /// Get metrics for a run and key, ordered by step.
    #[must_use]
    pub fn metrics_for_run(&self, run_id: &str, key: &str) -> Vec<MetricRecord> {
        let mut metrics: Vec<MetricRecord> = self
            .metrics
            .get(run_id)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|m| m.key() == key)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        metrics.sort_by_key(MetricRecord::step);
        metrics
    }

    /// Get every metric of a run, ordered by step then key.
    #[must_use]
    pub fn history(&self, run_id: &str) -> Vec<MetricRecord> {
        let mut metrics = self
            .metrics
            .get(run_id)
            .map(|bucket| bucket.value().clone())
            .unwrap_or_default();

        metrics.sort_by(|a, b| a.step().cmp(&b.step()).then_with(|| a.key().cmp(b.key())));
        metrics
    }

    /// Record a watched model.
    pub fn add_watch(&self, watch: WatchRecord) {
        self.watches
            .entry(watch.run_id().to_string())
            .or_default()
            .push(watch);
    }

    /// Get the models watched by a run, in registration order.
    #[must_use]
    pub fn watches_for_run(&self, run_id: &str) -> Vec<WatchRecord> {
        self.watches
            .get(run_id)
            .map(|bucket| bucket.value().clone())
            .unwrap_or_default()
    }
}
