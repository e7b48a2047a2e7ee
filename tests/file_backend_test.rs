//! Offline file client tests

use std::fs;

use serde_json::json;
use wandb_logger::backend::file::{
    read_history, FileClient, CONFIG_FILE, HISTORY_FILE, RUN_DIR_PREFIX, STEP_KEY, TIMESTAMP_KEY,
    WATCH_FILE,
};
use wandb_logger::backend::ModelSummary;
use wandb_logger::options::keys;
use wandb_logger::{Error, ExperimentLogger, InitOptions, Metrics, TrackingClient};

fn metrics(pairs: &[(&str, f64)]) -> Metrics {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), json!(v)))
        .collect()
}

#[test]
fn test_creates_run_directory_with_config() {
    let root = tempfile::tempdir().unwrap();
    let mut logger = ExperimentLogger::builder(FileClient::new(root.path()))
        .project("criteo")
        .id("xdeepfm")
        .build()
        .unwrap();

    let dir = logger.experiment().unwrap().dir().to_path_buf();

    assert!(dir.starts_with(root.path()));
    let dir_name = dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(dir_name.starts_with(RUN_DIR_PREFIX));
    assert!(dir_name.ends_with("-xdeepfm"));

    let config: InitOptions =
        serde_json::from_str(&fs::read_to_string(dir.join(CONFIG_FILE)).unwrap()).unwrap();
    assert_eq!(&config, logger.init_options());
}

#[test]
fn test_save_dir_overrides_root() {
    let root = tempfile::tempdir().unwrap();
    let save_dir = tempfile::tempdir().unwrap();
    let mut logger = ExperimentLogger::builder(FileClient::new(root.path()))
        .save_dir(save_dir.path())
        .build()
        .unwrap();

    let dir = logger.experiment().unwrap().dir().to_path_buf();
    assert!(dir.starts_with(save_dir.path()));
}

#[test]
fn test_each_log_appends_one_row() {
    let root = tempfile::tempdir().unwrap();
    let mut logger = ExperimentLogger::builder(FileClient::new(root.path()))
        .build()
        .unwrap();

    logger.log_metrics(&metrics(&[("loss", 0.9)])).unwrap();
    logger
        .log_metrics(&metrics(&[("loss", 0.6), ("auc", 0.71)]))
        .unwrap();

    let session = logger.session().unwrap();
    let rows = session.history().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][STEP_KEY], json!(0));
    assert_eq!(rows[1][STEP_KEY], json!(1));
    assert_eq!(rows[1]["auc"], json!(0.71));
    assert!(rows[1][TIMESTAMP_KEY].is_string());
    assert_eq!(session.step(), 2);

    let raw = fs::read_to_string(session.dir().join(HISTORY_FILE)).unwrap();
    assert_eq!(raw.lines().count(), 2);
}

#[test]
fn test_watch_appends_record() {
    let root = tempfile::tempdir().unwrap();
    let mut logger = ExperimentLogger::builder(FileClient::new(root.path()))
        .build()
        .unwrap();

    logger
        .watch(&ModelSummary::new("wide_deep").parameter("wide.weight", 1000))
        .unwrap();

    let dir = logger.session().unwrap().dir().to_path_buf();
    let raw = fs::read_to_string(dir.join(WATCH_FILE)).unwrap();
    assert_eq!(raw.lines().count(), 1);
    assert!(raw.contains("wide_deep"));
}

#[test]
fn test_restore_continues_history() {
    let root = tempfile::tempdir().unwrap();
    let client = FileClient::new(root.path());

    let mut logger = ExperimentLogger::builder(client.clone()).build().unwrap();
    logger.log_metrics(&metrics(&[("loss", 1.0)])).unwrap();
    logger.log_metrics(&metrics(&[("loss", 0.5)])).unwrap();
    let dir = logger.session().unwrap().dir().to_path_buf();
    let snapshot = logger.snapshot();
    drop(logger);

    let mut restored = ExperimentLogger::from_snapshot(client, snapshot).unwrap();
    restored.log_metrics(&metrics(&[("loss", 0.25)])).unwrap();

    assert_eq!(restored.session().unwrap().dir(), dir);
    let rows = read_history(&dir).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2][STEP_KEY], json!(2));
}

#[test]
fn test_resume_never_rejects_existing_dir() {
    let root = tempfile::tempdir().unwrap();
    let client = FileClient::new(root.path());

    let mut options = InitOptions::new();
    options.set(keys::ID, "taken");
    client.init(&options).unwrap();

    options.set(keys::RESUME, "never");
    assert!(matches!(client.init(&options), Err(Error::RunExists(_))));
}

#[test]
fn test_unavailable_root_fails_construction() {
    let scratch = tempfile::tempdir().unwrap();
    let blocker = scratch.path().join("not-a-dir");
    fs::write(&blocker, b"occupied").unwrap();

    let result = ExperimentLogger::builder(FileClient::new(blocker.join("runs"))).build();
    match result {
        Err(Error::DependencyMissing { client }) => assert_eq!(client, "file"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("construction should fail"),
    }
}

#[test]
fn test_run_id_with_separator_rejected() {
    let scratch = tempfile::tempdir().unwrap();
    let client = FileClient::new(scratch.path().join("runs"));

    let mut options = InitOptions::new();
    options.set(keys::ID, "sweep/7");
    options.set(keys::RESUME, "allow");

    match client.init(&options) {
        Err(Error::InvalidRunId(id)) => assert_eq!(id, "sweep/7"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(session) => panic!("created run in {}", session.dir().display()),
    }
    assert!(!scratch.path().join("runs").exists());
}

#[test]
fn test_run_id_with_parent_dir_cannot_escape_root() {
    let scratch = tempfile::tempdir().unwrap();
    let mut logger = ExperimentLogger::builder(FileClient::new(scratch.path().join("runs")))
        .id("x/../../escaped")
        .build()
        .unwrap();

    assert!(matches!(logger.experiment(), Err(Error::InvalidRunId(_))));
    assert!(logger.session().is_none());
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_reserved_keys_replaced_by_client() {
    let root = tempfile::tempdir().unwrap();
    let mut logger = ExperimentLogger::builder(FileClient::new(root.path()))
        .build()
        .unwrap();

    logger.log_metrics(&metrics(&[("loss", 0.4)])).unwrap();
    logger
        .log_metrics(&metrics(&[("loss", 0.3), (STEP_KEY, 99.0), (TIMESTAMP_KEY, 1.0)]))
        .unwrap();

    let session = logger.session().unwrap();
    let rows = session.history().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][STEP_KEY], json!(1));
    assert!(rows[1][TIMESTAMP_KEY].is_string());

    let raw = fs::read_to_string(session.dir().join(HISTORY_FILE)).unwrap();
    assert!(raw.ends_with('\n'));
    assert_eq!(raw.lines().count(), 2);
}

#[test]
fn test_availability_check_leaves_root_absent() {
    let scratch = tempfile::tempdir().unwrap();
    let root = scratch.path().join("later");

    let mut logger = ExperimentLogger::builder(FileClient::new(&root))
        .build()
        .unwrap();
    assert!(!root.exists());

    logger.log_metrics(&metrics(&[("loss", 1.0)])).unwrap();
    assert!(root.is_dir());
}
