//! Logger configuration
//!
//! [`LoggerConfig`] is the full constructor surface of
//! [`ExperimentLogger`](crate::ExperimentLogger). It can be built in code,
//! deserialized from JSON, and overlaid with the tracker's environment
//! variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::{anonymous_mode, keys, InitOptions, RESUME_ALLOW};
use crate::Result;

/// Environment variable naming the project.
pub const ENV_PROJECT: &str = "WANDB_PROJECT";
/// Environment variable naming the session.
pub const ENV_NAME: &str = "WANDB_NAME";
/// Environment variable carrying a session id to resume.
pub const ENV_RUN_ID: &str = "WANDB_RUN_ID";
/// Environment variable for the artifact directory.
pub const ENV_DIR: &str = "WANDB_DIR";
/// Environment variable selecting online/offline mode.
pub const ENV_MODE: &str = "WANDB_MODE";

/// Constructor options for an experiment logger.
///
/// `offline`, `log_model` and `prefix` are stored on the logger and exposed
/// to callers; the forwarding operations do not read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Session display name
    pub name: Option<String>,
    /// Local directory for session artifacts
    pub save_dir: Option<PathBuf>,
    /// Offline mode flag
    pub offline: bool,
    /// Session id to resume
    pub id: Option<String>,
    /// Anonymous-access mode: `true` allows, `false` disables, `None` leaves unset
    pub anonymous: Option<bool>,
    /// Session id that takes precedence over `id`
    pub version: Option<String>,
    /// Project namespace
    pub project: Option<String>,
    /// Model upload flag
    pub log_model: bool,
    /// Metric-name prefix
    pub prefix: String,
    /// Extra init options, passed through verbatim
    pub extra: Map<String, Value>,
}

impl LoggerConfig {
    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or a JSON error if it
    /// cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Fill unset fields from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Fill unset fields from `lookup`.
    ///
    /// Explicitly configured values always win over the environment.
    #[must_use]
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.project.is_none() {
            self.project = lookup(ENV_PROJECT);
        }
        if self.name.is_none() {
            self.name = lookup(ENV_NAME);
        }
        if self.id.is_none() {
            self.id = lookup(ENV_RUN_ID);
        }
        if self.save_dir.is_none() {
            self.save_dir = lookup(ENV_DIR).map(PathBuf::from);
        }
        if let Some(mode) = lookup(ENV_MODE) {
            match mode.as_str() {
                "offline" | "dryrun" => self.offline = true,
                "online" | "run" | "disabled" => {}
                other => tracing::warn!(mode = other, "ignoring unrecognized {ENV_MODE}"),
            }
        }
        self
    }

    /// Assemble the session init options.
    ///
    /// `version` wins over `id` (an empty `version` counts as unset),
    /// `resume` is always `"allow"`, and extras are merged last so they
    /// override every computed key.
    #[must_use]
    pub fn init_options(&self) -> InitOptions {
        let id = self
            .version
            .clone()
            .filter(|version| !version.is_empty())
            .or_else(|| self.id.clone());

        let mut options = InitOptions::new();
        options.set(keys::NAME, self.name.clone());
        options.set(keys::PROJECT, self.project.clone());
        options.set(keys::ID, id);
        options.set(
            keys::DIR,
            self.save_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
        );
        options.set(keys::RESUME, RESUME_ALLOW);
        options.set(keys::ANONYMOUS, anonymous_mode(self.anonymous));
        options.merge(self.extra.clone());
        options
    }
}
