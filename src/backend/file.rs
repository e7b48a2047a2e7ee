//! Offline file client
//!
//! Each run gets a directory `offline-run-<yyyymmdd_hhmmss>-<id>` under the
//! session's `dir` option (or the client root) holding:
//!
//! - `config.json`: the init options the run was created with
//! - `history.jsonl`: one JSON object per `log` call, plus `_step` and `_timestamp`
//! - `watch.jsonl`: one [`WatchRecord`] per `watch` call

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::{check_resume, requested_run_id, ModelSummary, WatchRecord};
use crate::client::{Metrics, Session, TrackingClient};
use crate::options::InitOptions;
use crate::{Error, Result};

/// Prefix of every run directory.
pub const RUN_DIR_PREFIX: &str = "offline-run-";
/// Init options of the run.
pub const CONFIG_FILE: &str = "config.json";
/// Logged metrics, one line per call.
pub const HISTORY_FILE: &str = "history.jsonl";
/// Watched models, one line per call.
pub const WATCH_FILE: &str = "watch.jsonl";
/// History key holding the step of a row.
pub const STEP_KEY: &str = "_step";
/// History key holding the wall-clock time of a row.
pub const TIMESTAMP_KEY: &str = "_timestamp";

const DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DIR_TIMESTAMP_LEN: usize = 15;

/// Client that writes runs to local directories.
#[derive(Debug, Clone)]
pub struct FileClient {
    root: PathBuf,
}

impl FileClient {
    /// Create a client rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory used when the init options carry no `dir`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TrackingClient for FileClient {
    type Session = FileSession;

    fn name(&self) -> &str {
        "file"
    }

    /// The root, or its nearest existing ancestor, is a writable directory.
    ///
    /// Nothing is created; the root is made on the first `init`.
    fn is_available(&self) -> bool {
        self.root
            .ancestors()
            .map(|path| if path.as_os_str().is_empty() { Path::new(".") } else { path })
            .find_map(|path| fs::metadata(path).ok())
            .is_some_and(|meta| meta.is_dir() && !meta.permissions().readonly())
    }

    fn init(&self, options: &InitOptions) -> Result<FileSession> {
        let run_id = requested_run_id(options);
        validate_run_id(&run_id)?;

        let base = options.dir().map_or_else(|| self.root.clone(), PathBuf::from);
        fs::create_dir_all(&base)?;

        let existing = find_run_dir(&base, &run_id)?;
        check_resume(options, &run_id, existing.is_some())?;

        let (dir, step) = match existing {
            Some(dir) => {
                let step = count_rows(&dir.join(HISTORY_FILE))?;
                tracing::info!(run_id = %run_id, dir = %dir.display(), step, "resumed offline run");
                (dir, step)
            }
            None => {
                let dir = base.join(format!(
                    "{RUN_DIR_PREFIX}{}-{run_id}",
                    Utc::now().format(DIR_TIMESTAMP_FORMAT)
                ));
                fs::create_dir_all(&dir)?;
                fs::write(dir.join(CONFIG_FILE), serde_json::to_vec_pretty(options)?)?;
                tracing::info!(run_id = %run_id, dir = %dir.display(), "created offline run");
                (dir, 0)
            }
        };

        let history = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(HISTORY_FILE))?;

        Ok(FileSession {
            run_id,
            dir,
            step,
            history,
        })
    }
}

/// Session appending to an offline run directory.
#[derive(Debug)]
pub struct FileSession {
    run_id: String,
    dir: PathBuf,
    step: u64,
    history: File,
}

impl FileSession {
    /// The run directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Step the next `log` call writes to.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Read back every history row written so far.
    ///
    /// # Errors
    ///
    /// Returns an IO or JSON error if the history cannot be read.
    pub fn history(&self) -> Result<Vec<Map<String, Value>>> {
        read_history(&self.dir)
    }
}

impl Session for FileSession {
    type Model = ModelSummary;
    type Error = Error;

    fn id(&self) -> &str {
        &self.run_id
    }

    fn watch(&mut self, model: &ModelSummary) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(WATCH_FILE))?;
        serde_json::to_writer(&mut file, &WatchRecord::new(self.run_id.clone(), model.clone()))?;
        file.write_all(b"\n")?;
        Ok(())
    }

    fn log(&mut self, metrics: &Metrics) -> Result<()> {
        for key in [STEP_KEY, TIMESTAMP_KEY] {
            if metrics.contains_key(key) {
                tracing::warn!(run_id = %self.run_id, key, "reserved history key replaced");
            }
        }

        let mut row: Map<String, Value> = metrics
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        row.insert(STEP_KEY.to_string(), Value::from(self.step));
        row.insert(TIMESTAMP_KEY.to_string(), Value::from(Utc::now().to_rfc3339()));

        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');
        self.history.write_all(&line)?;
        self.history.flush()?;

        tracing::trace!(run_id = %self.run_id, step = self.step, "wrote history row");
        self.step += 1;
        Ok(())
    }
}

/// Read the history rows of the run stored in `dir`.
///
/// # Errors
///
/// Returns an IO or JSON error if the history cannot be read. A missing
/// history file yields no rows.
pub fn read_history(dir: &Path) -> Result<Vec<Map<String, Value>>> {
    let path = dir.join(HISTORY_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(&line)?);
    }
    Ok(rows)
}

/// A run id must fit in one directory name segment.
fn validate_run_id(run_id: &str) -> Result<()> {
    let invalid = run_id.is_empty()
        || run_id.contains(['/', '\\', '\0', std::path::MAIN_SEPARATOR])
        || run_id.contains("..");
    if invalid {
        return Err(Error::InvalidRunId(run_id.to_string()));
    }
    Ok(())
}

/// Run id encoded in a run directory name.
fn run_id_of_dir(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(RUN_DIR_PREFIX)?;
    let stamp = rest.get(..DIR_TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(stamp, DIR_TIMESTAMP_FORMAT).ok()?;
    rest.get(DIR_TIMESTAMP_LEN..)?.strip_prefix('-')
}

fn find_run_dir(base: &Path, run_id: &str) -> Result<Option<PathBuf>> {
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if run_id_of_dir(&name.to_string_lossy()) == Some(run_id) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

fn count_rows(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Ok(0);
    }

    let mut rows = 0;
    for line in BufReader::new(File::open(path)?).lines() {
        if !line?.trim().is_empty() {
            rows += 1;
        }
    }
    Ok(rows)
}
