//! Experiment logger
//!
//! Holds the init options for a tracking session, creates the session on
//! first use, and forwards `watch` and `log_metrics` to it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::{Metrics, Session, SessionError, SessionModel, TrackingClient};
use crate::config::LoggerConfig;
use crate::options::{keys, InitOptions};
use crate::snapshot::LoggerSnapshot;
use crate::{Error, Result};

/// Lazily-initialized logger over a [`TrackingClient`].
///
/// At most one session is created per logger. A session supplied at
/// construction or through [`set_experiment`](Self::set_experiment) is
/// adopted as-is and creation never runs for it.
///
/// # Example
///
/// ```rust
/// use wandb_logger::backend::memory::MemoryClient;
/// use wandb_logger::{ExperimentLogger, Metrics};
///
/// let mut logger = ExperimentLogger::builder(MemoryClient::new())
///     .project("recsys")
///     .name("sar-baseline")
///     .build()?;
///
/// let mut metrics = Metrics::new();
/// metrics.insert("map@10".into(), 0.11.into());
/// logger.log_metrics(&metrics)?;
///
/// assert!(logger.session().is_some());
/// # Ok::<(), wandb_logger::Error>(())
/// ```
pub struct ExperimentLogger<C: TrackingClient> {
    client: C,
    init_options: InitOptions,
    session: Option<C::Session>,
    offline: bool,
    log_model: bool,
    prefix: String,
    save_dir: Option<PathBuf>,
    name: Option<String>,
    id: Option<String>,
    logged_model_time: BTreeMap<String, DateTime<Utc>>,
}

fn ensure_available<C: TrackingClient>(client: &C) -> Result<()> {
    if client.is_available() {
        Ok(())
    } else {
        Err(Error::dependency_missing(client.name()))
    }
}

impl<C: TrackingClient> ExperimentLogger<C> {
    /// Create a builder for a logger over `client`.
    #[must_use]
    pub fn builder(client: C) -> ExperimentLoggerBuilder<C> {
        ExperimentLoggerBuilder::new(client)
    }

    /// Create a logger from `config` with no session yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DependencyMissing`] if `client` is unavailable.
    pub fn new(client: C, config: LoggerConfig) -> Result<Self> {
        Self::with_experiment(client, config, None)
    }

    /// Create a logger from `config`, adopting `experiment` as the session
    /// when given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DependencyMissing`] if `client` is unavailable.
    pub fn with_experiment(
        client: C,
        config: LoggerConfig,
        experiment: Option<C::Session>,
    ) -> Result<Self> {
        ensure_available(&client)?;

        let init_options = config.init_options();
        let save_dir = init_options.dir().map(PathBuf::from);
        let name = init_options.name().map(str::to_string);
        let id = init_options.id().map(str::to_string);

        Ok(Self {
            client,
            init_options,
            session: experiment,
            offline: config.offline,
            log_model: config.log_model,
            prefix: config.prefix,
            save_dir,
            name,
            id,
            logged_model_time: BTreeMap::new(),
        })
    }

    /// Rebuild a logger from a snapshot. The session stays unset.
    ///
    /// When the snapshot recorded a session id, it is written back into the
    /// init options so that lazy creation resumes that session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DependencyMissing`] if `client` is unavailable.
    pub fn from_snapshot(client: C, snapshot: LoggerSnapshot) -> Result<Self> {
        ensure_available(&client)?;

        let LoggerSnapshot {
            mut init_options,
            offline,
            log_model,
            prefix,
            save_dir,
            name,
            id,
            logged_model_time,
        } = snapshot;

        if let Some(id) = &id {
            init_options.set(keys::ID, id.clone());
        }

        Ok(Self {
            client,
            init_options,
            session: None,
            offline,
            log_model,
            prefix,
            save_dir,
            name,
            id,
            logged_model_time,
        })
    }

    /// Capture the serializable state of this logger.
    ///
    /// The `id` field holds the live session's id, or `None` when no
    /// session exists.
    #[must_use]
    pub fn snapshot(&self) -> LoggerSnapshot {
        LoggerSnapshot {
            init_options: self.init_options.clone(),
            offline: self.offline,
            log_model: self.log_model,
            prefix: self.prefix.clone(),
            save_dir: self.save_dir.clone(),
            name: self.name.clone(),
            id: self.session.as_ref().map(|session| session.id().to_string()),
            logged_model_time: self.logged_model_time.clone(),
        }
    }

    /// Replace the stored session.
    pub fn set_experiment(&mut self, session: C::Session) {
        tracing::debug!(id = session.id(), "adopting tracking session");
        self.session = Some(session);
    }

    /// The session, created from the init options on first access.
    ///
    /// # Errors
    ///
    /// Returns the client's error if session creation fails; the session
    /// stays unset in that case.
    pub fn experiment(&mut self) -> std::result::Result<&mut C::Session, SessionError<C>> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                tracing::debug!(client = self.client.name(), "creating tracking session");
                let session = self.client.init(&self.init_options)?;
                tracing::debug!(id = session.id(), "tracking session created");
                session
            }
        };
        Ok(self.session.insert(session))
    }

    /// The session if one exists, without creating it.
    #[must_use]
    pub const fn session(&self) -> Option<&C::Session> {
        self.session.as_ref()
    }

    /// Register `model` with the session.
    ///
    /// # Errors
    ///
    /// Returns the client's error from session creation or `watch`.
    pub fn watch(&mut self, model: &SessionModel<C>) -> std::result::Result<(), SessionError<C>> {
        let session = self.experiment()?;
        tracing::trace!(id = session.id(), "watch");
        session.watch(model)
    }

    /// Forward `metrics` to the session as-is.
    ///
    /// # Errors
    ///
    /// Returns the client's error from session creation or `log`.
    pub fn log_metrics(&mut self, metrics: &Metrics) -> std::result::Result<(), SessionError<C>> {
        let session = self.experiment()?;
        tracing::trace!(id = session.id(), keys = metrics.len(), "log_metrics");
        session.log(metrics)
    }

    /// Options handed to session creation.
    #[must_use]
    pub const fn init_options(&self) -> &InitOptions {
        &self.init_options
    }

    /// Look up a single init option, including pass-through extras.
    #[must_use]
    pub fn init_option(&self, key: &str) -> Option<&Value> {
        self.init_options.get(key)
    }

    /// The tracking client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Offline flag as configured.
    #[must_use]
    pub const fn offline(&self) -> bool {
        self.offline
    }

    /// Model upload flag as configured.
    #[must_use]
    pub const fn log_model(&self) -> bool {
        self.log_model
    }

    /// Metric-name prefix as configured.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Artifact directory, read from the merged init options.
    #[must_use]
    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    /// Session name, read from the merged init options.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Session id, read from the merged init options.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Last-logged time per model checkpoint path.
    #[must_use]
    pub const fn logged_model_time(&self) -> &BTreeMap<String, DateTime<Utc>> {
        &self.logged_model_time
    }
}

impl<C: TrackingClient> fmt::Debug for ExperimentLogger<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentLogger")
            .field("client", &self.client.name())
            .field("init_options", &self.init_options)
            .field("session", &self.session.as_ref().map(|session| session.id()))
            .field("offline", &self.offline)
            .field("log_model", &self.log_model)
            .field("prefix", &self.prefix)
            .field("save_dir", &self.save_dir)
            .field("name", &self.name)
            .field("id", &self.id)
            .field("logged_model_time", &self.logged_model_time)
            .finish()
    }
}

/// Builder for [`ExperimentLogger`].
pub struct ExperimentLoggerBuilder<C: TrackingClient> {
    client: C,
    config: LoggerConfig,
    experiment: Option<C::Session>,
}

impl<C: TrackingClient> ExperimentLoggerBuilder<C> {
    /// Create a builder with default configuration.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: LoggerConfig::default(),
            experiment: None,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the session display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Set the local artifact directory.
    #[must_use]
    pub fn save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.save_dir = Some(dir.into());
        self
    }

    /// Set the offline flag.
    #[must_use]
    pub fn offline(mut self, offline: bool) -> Self {
        self.config.offline = offline;
        self
    }

    /// Set the session id to resume.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.config.id = Some(id.into());
        self
    }

    /// Set the anonymous-access flag.
    #[must_use]
    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.config.anonymous = Some(anonymous);
        self
    }

    /// Set the version, which takes precedence over `id`.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = Some(version.into());
        self
    }

    /// Set the project namespace.
    #[must_use]
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.config.project = Some(project.into());
        self
    }

    /// Set the model upload flag.
    #[must_use]
    pub fn log_model(mut self, log_model: bool) -> Self {
        self.config.log_model = log_model;
        self
    }

    /// Set the metric-name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Add a pass-through init option. Overrides computed options.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.extra.insert(key.into(), value.into());
        self
    }

    /// Adopt an existing session instead of creating one.
    #[must_use]
    pub fn experiment(mut self, session: C::Session) -> Self {
        self.experiment = Some(session);
        self
    }

    /// Build the logger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DependencyMissing`] if the client is unavailable.
    pub fn build(self) -> Result<ExperimentLogger<C>> {
        ExperimentLogger::with_experiment(self.client, self.config, self.experiment)
    }
}
