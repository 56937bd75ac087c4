//! End-to-end recovery workflow runs against a temporary store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use flate2::read::GzDecoder;
use tar::Archive;
use tempfile::TempDir;

use kamailio_recovery::config::RecoveryConfig;
use kamailio_recovery::core::{FixedClock, RecoveryContext};
use kamailio_recovery::remote::{MemoryStore, ObjectStore, RemoteError, RemoteResult};
use kamailio_recovery::workflow::{RecoveryWorkflow, RunStatus};

struct UnreachableStore;

impl ObjectStore for UnreachableStore {
    fn put(&self, _artifact: &Path, _bucket: &str) -> RemoteResult<()> {
        Err(RemoteError::upload_failed("connection refused"))
    }
}

fn make_component(root: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (file, contents) in files {
        fs::write(dir.join(file), contents).unwrap();
    }
    dir
}

fn context(temp: &TempDir, components: Vec<PathBuf>) -> RecoveryContext {
    let mut config = RecoveryConfig {
        backup_directory: temp.path().join("store"),
        components_to_backup: components,
        ..RecoveryConfig::default()
    };
    config.encryption.enabled = false;
    let instant = Utc.with_ymd_and_hms(2026, 8, 27, 3, 0, 0).unwrap();
    RecoveryContext::with_clock(config, Box::new(FixedClock(instant)))
}

fn top_level_entries(artifact: &Path) -> Vec<String> {
    let file = fs::File::open(artifact).unwrap();
    let mut archive = Archive::new(GzDecoder::new(file));
    let mut tops: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|e| {
            let entry = e.unwrap();
            let path = entry.path().unwrap().to_string_lossy().to_string();
            path.split('/').next().unwrap().to_string()
        })
        .collect();
    tops.sort();
    tops.dedup();
    tops
}

#[test]
fn workflow_produces_one_artifact_with_exact_components() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(temp.path(), "etc-kamailio", &[("kamailio.cfg", b"cfg")]);
    let lib = make_component(temp.path(), "lib-kamailio", &[("subscriber.db", b"db")]);
    let ctx = context(&temp, vec![etc, lib]);

    let report = RecoveryWorkflow::run(&ctx, None).unwrap();
    assert_eq!(report.status, RunStatus::Success);

    // Exactly one artifact in the store
    let store = temp.path().join("store");
    let entries: Vec<_> = fs::read_dir(&store).unwrap().map(|e| e.unwrap()).collect();
    assert_eq!(entries.len(), 1);

    // Containing exactly the components, under their base names
    assert_eq!(
        top_level_entries(&report.artifact.path),
        vec!["etc-kamailio".to_string(), "lib-kamailio".to_string()]
    );
}

#[test]
fn workflow_survives_one_missing_component() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(temp.path(), "etc-kamailio", &[("kamailio.cfg", b"cfg")]);
    let missing = temp.path().join("does-not-exist");
    let ctx = context(&temp, vec![etc, missing]);

    let report = RecoveryWorkflow::run(&ctx, None).unwrap();
    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(
        top_level_entries(&report.artifact.path),
        vec!["etc-kamailio".to_string()]
    );
}

#[test]
fn workflow_replicates_artifact_bytes_to_object_store() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(temp.path(), "etc-kamailio", &[("kamailio.cfg", b"cfg")]);
    let mut ctx = context(&temp, vec![etc]);
    // Rebuild context with remote enabled
    let mut config = ctx.config.clone();
    config.remote_backup.enabled = true;
    config.remote_backup.bucket = "kamailio-dr".to_string();
    ctx = RecoveryContext::with_clock(
        config,
        Box::new(FixedClock(Utc.with_ymd_and_hms(2026, 8, 27, 3, 0, 0).unwrap())),
    );

    let store = MemoryStore::new();
    let report = RecoveryWorkflow::run(&ctx, Some(&store)).unwrap();

    let name = report.artifact.path.file_name().unwrap().to_string_lossy();
    let key = format!("kamailio-dr/{}", name);
    let uploaded = store.object(&key).expect("artifact replicated");
    assert_eq!(uploaded, fs::read(&report.artifact.path).unwrap());
}

#[test]
fn unreachable_remote_still_leaves_valid_local_artifact() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(temp.path(), "etc-kamailio", &[("kamailio.cfg", b"cfg")]);
    let mut config = RecoveryConfig {
        backup_directory: temp.path().join("store"),
        components_to_backup: vec![etc],
        ..RecoveryConfig::default()
    };
    config.encryption.enabled = false;
    config.remote_backup.enabled = true;
    config.remote_backup.bucket = "kamailio-dr".to_string();
    let ctx = RecoveryContext::with_clock(
        config,
        Box::new(FixedClock(Utc.with_ymd_and_hms(2026, 8, 27, 3, 0, 0).unwrap())),
    );

    // The run succeeds (exit 0 territory), only with warnings
    let report = RecoveryWorkflow::run(&ctx, Some(&UnreachableStore)).unwrap();
    assert_eq!(report.status, RunStatus::SuccessWithWarnings);
    assert!(report.artifact.path.exists());
    assert_eq!(
        top_level_entries(&report.artifact.path),
        vec!["etc-kamailio".to_string()]
    );
}

#[test]
fn encrypted_workflow_removes_plaintext_artifact() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(temp.path(), "etc-kamailio", &[("kamailio.cfg", b"cfg")]);
    let mut config = RecoveryConfig {
        backup_directory: temp.path().join("store"),
        components_to_backup: vec![etc],
        ..RecoveryConfig::default()
    };
    config.encryption.enabled = true;
    config.encryption.passphrase_env = "KAM_IT_WORKFLOW_PASS".to_string();
    std::env::set_var("KAM_IT_WORKFLOW_PASS", "workflow passphrase");

    let ctx = RecoveryContext::with_clock(
        config,
        Box::new(FixedClock(Utc.with_ymd_and_hms(2026, 8, 27, 3, 0, 0).unwrap())),
    );

    let report = RecoveryWorkflow::run(&ctx, None).unwrap();
    assert!(report.artifact.encrypted);
    assert!(report
        .artifact
        .path
        .to_string_lossy()
        .ends_with(".tar.gz.enc"));

    // Only the encrypted artifact remains in the store
    let store = temp.path().join("store");
    let names: Vec<String> = fs::read_dir(&store)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".tar.gz.enc"));
}
