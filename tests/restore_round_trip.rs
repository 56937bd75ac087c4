//! Backup → encrypt → restore round trips onto a scratch root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use kamailio_recovery::config::RecoveryConfig;
use kamailio_recovery::core::{FixedClock, RecoveryContext};
use kamailio_recovery::encryption::Cipher;
use kamailio_recovery::restore::{
    RestoreErrorCode, RestoreOrchestrator, RestoreOutcome, ServiceController,
};
use kamailio_recovery::workflow::RecoveryWorkflow;

struct FakeService {
    exit_code: i32,
    calls: Mutex<Vec<String>>,
}

impl FakeService {
    fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ServiceController for FakeService {
    fn restart(&self, name: &str) -> io::Result<i32> {
        self.calls.lock().unwrap().push(name.to_string());
        Ok(self.exit_code)
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

fn context(temp: &TempDir, components: Vec<PathBuf>, passphrase_env: &str) -> RecoveryContext {
    let mut config = RecoveryConfig {
        backup_directory: temp.path().join("store"),
        components_to_backup: components,
        ..RecoveryConfig::default()
    };
    config.encryption.enabled = false;
    config.encryption.passphrase_env = passphrase_env.to_string();
    let instant = Utc.with_ymd_and_hms(2026, 8, 27, 4, 0, 0).unwrap();
    RecoveryContext::with_clock(config, Box::new(FixedClock(instant)))
}

#[test]
fn plain_backup_restores_identical_contents() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(
        temp.path(),
        "etc-kamailio",
        &[("kamailio.cfg", b"listen=udp:0.0.0.0:5060\n" as &[u8])],
    );
    let ctx = context(&temp, vec![etc], "KAM_IT_RT_UNUSED");

    let (artifact, warnings) = RecoveryWorkflow::create_backup(&ctx, None).unwrap();
    assert!(warnings.is_empty());

    let root = temp.path().join("restore-root");
    fs::create_dir_all(&root).unwrap();
    let service = FakeService::new(0);

    let outcome =
        RestoreOrchestrator::restore(&ctx, &artifact.path, &root, &service).unwrap();
    assert_eq!(outcome, RestoreOutcome::Completed);
    assert_eq!(
        fs::read(root.join("etc-kamailio").join("kamailio.cfg")).unwrap(),
        b"listen=udp:0.0.0.0:5060\n"
    );
    assert_eq!(*service.calls.lock().unwrap(), vec!["kamailio".to_string()]);
}

#[test]
fn encrypted_backup_restores_after_decrypt() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(
        temp.path(),
        "etc-kamailio",
        &[("kamailio.cfg", b"cfg contents" as &[u8])],
    );
    std::env::set_var("KAM_IT_RT_GOOD", "round trip passphrase");
    let mut ctx = context(&temp, vec![etc], "KAM_IT_RT_GOOD");
    let mut config = ctx.config.clone();
    config.encryption.enabled = true;
    ctx = RecoveryContext::with_clock(
        config,
        Box::new(FixedClock(Utc.with_ymd_and_hms(2026, 8, 27, 4, 0, 0).unwrap())),
    );

    let (artifact, warnings) = RecoveryWorkflow::create_backup(&ctx, None).unwrap();
    assert!(warnings.is_empty());
    assert!(artifact.encrypted);

    let root = temp.path().join("restore-root");
    fs::create_dir_all(&root).unwrap();
    let service = FakeService::new(0);

    let outcome =
        RestoreOrchestrator::restore(&ctx, &artifact.path, &root, &service).unwrap();
    assert_eq!(outcome, RestoreOutcome::Completed);
    assert_eq!(
        fs::read(root.join("etc-kamailio").join("kamailio.cfg")).unwrap(),
        b"cfg contents"
    );
}

#[test]
fn wrong_passphrase_aborts_before_touching_root() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(
        temp.path(),
        "etc-kamailio",
        &[("kamailio.cfg", b"cfg" as &[u8])],
    );
    let ctx = context(&temp, vec![etc], "KAM_IT_RT_WRONG");

    let (artifact, _) = RecoveryWorkflow::create_backup(&ctx, None).unwrap();
    let encrypted = Cipher::encrypt_file(&artifact.path, "the sealing passphrase").unwrap();

    // The restore-side passphrase differs
    std::env::set_var("KAM_IT_RT_WRONG", "not the sealing passphrase");

    let root = temp.path().join("restore-root");
    fs::create_dir_all(&root).unwrap();
    let service = FakeService::new(0);

    let err = RestoreOrchestrator::restore(&ctx, &encrypted, &root, &service).unwrap_err();
    assert_eq!(err.code(), RestoreErrorCode::KamRestoreDecrypt);

    // No partial unpack, no service restart
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    assert!(service.calls.lock().unwrap().is_empty());
    // The encrypted artifact is still there for a retry
    assert!(encrypted.exists());
}

#[test]
fn failed_restart_reports_warnings_but_keeps_files() {
    let temp = TempDir::new().unwrap();
    let etc = make_component(
        temp.path(),
        "etc-kamailio",
        &[("kamailio.cfg", b"cfg" as &[u8])],
    );
    let ctx = context(&temp, vec![etc], "KAM_IT_RT_UNUSED2");

    let (artifact, _) = RecoveryWorkflow::create_backup(&ctx, None).unwrap();

    let root = temp.path().join("restore-root");
    fs::create_dir_all(&root).unwrap();
    let service = FakeService::new(1);

    let outcome =
        RestoreOrchestrator::restore(&ctx, &artifact.path, &root, &service).unwrap();
    assert_eq!(outcome, RestoreOutcome::CompletedWithWarnings);
    assert!(root.join("etc-kamailio").join("kamailio.cfg").exists());
}
