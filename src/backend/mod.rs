//! Bundled tracking clients
//!
//! ## Layout
//!
//! ```text
//! TrackingStore ──< RunRecord (N)
//!                       │
//!                       ├──< MetricRecord (N) [step-ordered]
//!                       └──< WatchRecord (N)
//! ```
//!
//! - [`memory`]: runs kept in a concurrent in-process store
//! - [`file`]: offline run directories of JSON lines

#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "memory")]
pub mod memory;
mod record;
#[cfg(feature = "memory")]
mod store;

pub use record::{MetricRecord, ModelSummary, RunRecord, RunStatus, WatchRecord};
#[cfg(feature = "memory")]
pub use store::TrackingStore;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::options::{InitOptions, ResumePolicy};
use crate::{Error, Result};

const RUN_ID_LEN: usize = 8;

/// Generate a fresh lowercase alphanumeric run id.
#[must_use]
pub fn generate_run_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RUN_ID_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}

/// Run id requested by `options`, or a generated one.
pub(crate) fn requested_run_id(options: &InitOptions) -> String {
    options.id().map_or_else(generate_run_id, str::to_string)
}

/// Apply the resume policy in `options` to a run that does or does not
/// exist yet. Returns whether the existing run should be continued.
pub(crate) fn check_resume(options: &InitOptions, run_id: &str, exists: bool) -> Result<bool> {
    match (options.resume_policy(), exists) {
        (Some(ResumePolicy::Never), true) => Err(Error::RunExists(run_id.to_string())),
        (Some(ResumePolicy::Must), false) => Err(Error::RunNotFound(run_id.to_string())),
        (_, exists) => Ok(exists),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::keys;

    #[test]
    fn test_generated_run_id_shape() {
        let id = generate_run_id();
        assert_eq!(id.len(), RUN_ID_LEN);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_requested_run_id_prefers_option() {
        let mut options = InitOptions::new();
        options.set(keys::ID, "fixed");
        assert_eq!(requested_run_id(&options), "fixed");
    }

    #[test]
    fn test_check_resume_policies() {
        let mut options = InitOptions::new();

        options.set(keys::RESUME, "allow");
        assert!(check_resume(&options, "r", true).unwrap());
        assert!(!check_resume(&options, "r", false).unwrap());

        options.set(keys::RESUME, "never");
        assert!(matches!(
            check_resume(&options, "r", true),
            Err(Error::RunExists(id)) if id == "r"
        ));
        assert!(!check_resume(&options, "r", false).unwrap());

        options.set(keys::RESUME, "must");
        assert!(matches!(
            check_resume(&options, "r", false),
            Err(Error::RunNotFound(id)) if id == "r"
        ));
        assert!(check_resume(&options, "r", true).unwrap());
    }
}
