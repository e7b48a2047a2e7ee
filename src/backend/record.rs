//! Run, metric and watch records kept by the bundled clients

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::InitOptions;

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run accepts metrics.
    Running,
    /// Run was finished by its session.
    Finished,
}

/// One run of an experiment.
///
/// The record owns the step counter: every `log` call on a session writes
/// its metrics at the current step and then advances it, so a resumed run
/// continues where it stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    run_id: String,
    project: Option<String>,
    name: Option<String>,
    config: InitOptions,
    status: RunStatus,
    step: u64,
    resumed: u32,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    /// Create a running record from the options that started it.
    #[must_use]
    pub fn new(run_id: impl Into<String>, config: &InitOptions) -> Self {
        Self {
            run_id: run_id.into(),
            project: config.project().map(str::to_string),
            name: config.name().map(str::to_string),
            config: config.clone(),
            status: RunStatus::Running,
            step: 0,
            resumed: 0,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the project, if any.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Get the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Init options the run was first created with.
    #[must_use]
    pub const fn config(&self) -> &InitOptions {
        &self.config
    }

    /// Get the current run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Step the next `log` call writes to.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// How many times the run has been resumed.
    #[must_use]
    pub const fn resumed(&self) -> u32 {
        self.resumed
    }

    /// Get the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get the end timestamp, if the run has finished.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Return the current step and advance the counter.
    pub fn advance_step(&mut self) -> u64 {
        let step = self.step;
        self.step += 1;
        step
    }

    /// Mark the run running again after a resume.
    pub fn resume(&mut self) {
        self.status = RunStatus::Running;
        self.ended_at = None;
        self.resumed += 1;
    }

    /// Mark the run finished.
    pub fn finish(&mut self) {
        self.status = RunStatus::Finished;
        self.ended_at = Some(Utc::now());
    }
}

/// Metric Record represents a single metric data point.
///
/// Metrics are keyed by `run_id` + `key` and ordered by `step`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    run_id: String,
    key: String,
    step: u64,
    value: Value,
    timestamp: DateTime<Utc>,
}

impl MetricRecord {
    /// Create a new metric record stamped with the current time.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>, step: u64, value: Value) -> Self {
        Self {
            run_id: run_id.into(),
            key: key.into(),
            step,
            value,
            timestamp: Utc::now(),
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the metric key/name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the step number.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Get the metric value as logged.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Numeric value, if the metric is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// Get the timestamp when the metric was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Description of a model registered through `watch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelSummary {
    name: String,
    parameters: BTreeMap<String, u64>,
}

impl ModelSummary {
    /// Create a summary with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a named parameter tensor with `numel` elements.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, numel: u64) -> Self {
        self.parameters.insert(name.into(), numel);
        self
    }

    /// Get the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Named parameter element counts.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, u64> {
        &self.parameters
    }

    /// Total number of parameter elements.
    #[must_use]
    pub fn parameter_count(&self) -> u64 {
        self.parameters.values().sum()
    }
}

/// A model registered with a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchRecord {
    run_id: String,
    model: ModelSummary,
    timestamp: DateTime<Utc>,
}

impl WatchRecord {
    /// Create a watch record stamped with the current time.
    #[must_use]
    pub fn new(run_id: impl Into<String>, model: ModelSummary) -> Self {
        Self {
            run_id: run_id.into(),
            model,
            timestamp: Utc::now(),
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The watched model.
    #[must_use]
    pub const fn model(&self) -> &ModelSummary {
        &self.model
    }

    /// Get the registration timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
