//! Serializable logger state
//!
//! Sessions are live handles and never serialize. A [`LoggerSnapshot`]
//! keeps everything else and records the live session's id in its place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::options::InitOptions;
use crate::Result;

/// Captured state of an [`ExperimentLogger`](crate::ExperimentLogger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSnapshot {
    pub(crate) init_options: InitOptions,
    pub(crate) offline: bool,
    pub(crate) log_model: bool,
    pub(crate) prefix: String,
    pub(crate) save_dir: Option<PathBuf>,
    pub(crate) name: Option<String>,
    /// Id of the session live at capture time, `None` if there was none.
    pub(crate) id: Option<String>,
    pub(crate) logged_model_time: BTreeMap<String, DateTime<Utc>>,
}

impl LoggerSnapshot {
    /// Id of the session that was live when the snapshot was taken.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Init options at capture time.
    #[must_use]
    pub const fn init_options(&self) -> &InitOptions {
        &self.init_options
    }

    /// Offline flag.
    #[must_use]
    pub const fn offline(&self) -> bool {
        self.offline
    }

    /// Model upload flag.
    #[must_use]
    pub const fn log_model(&self) -> bool {
        self.log_model
    }

    /// Metric-name prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Artifact directory derived from the init options.
    #[must_use]
    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    /// Session name derived from the init options.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Encode as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
