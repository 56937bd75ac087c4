//! Per-run recovery context
//!
//! Carries the loaded configuration and the injected clock to every
//! component, replacing process-global state. Artifact naming lives
//! here because it is the one place that combines both.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::config::{BackupKind, RecoveryConfig};

use super::clock::{Clock, SystemClock};

/// Artifact filename prefix, fixed for compatibility with existing
/// stores and external tooling that globs for it.
pub const ARTIFACT_PREFIX: &str = "kamailio_backup";

/// Artifact extension before any encryption suffix.
pub const ARTIFACT_EXT: &str = "tar.gz";

/// Context passed to every recovery component.
pub struct RecoveryContext {
    pub config: RecoveryConfig,
    clock: Box<dyn Clock>,
    namer: Mutex<NamerState>,
}

/// Last issued timestamp and its collision counter.
#[derive(Debug, Default)]
struct NamerState {
    last_stamp: String,
    seq: u32,
}

impl RecoveryContext {
    /// Create a context backed by the system clock.
    pub fn new(config: RecoveryConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a context with an injected clock (tests, replay).
    pub fn with_clock(config: RecoveryConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            namer: Mutex::new(NamerState::default()),
        }
    }

    /// Current time per the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Next artifact filename: `kamailio_backup_<kind>_<YYYYMMDD_HHMMSS>.tar.gz`.
    ///
    /// Two calls within the same clock second get a `_<n>` disambiguator
    /// appended to the timestamp, so names stay unique even under a
    /// fixed clock or high-frequency runs.
    pub fn next_artifact_name(&self, kind: BackupKind) -> String {
        let stamp = self.now().format("%Y%m%d_%H%M%S").to_string();

        let mut namer = self.namer.lock().unwrap_or_else(|e| e.into_inner());
        if namer.last_stamp == stamp {
            namer.seq += 1;
        } else {
            namer.last_stamp = stamp.clone();
            namer.seq = 0;
        }

        if namer.seq == 0 {
            format!("{}_{}_{}.{}", ARTIFACT_PREFIX, kind.as_str(), stamp, ARTIFACT_EXT)
        } else {
            format!(
                "{}_{}_{}_{}.{}",
                ARTIFACT_PREFIX,
                kind.as_str(),
                stamp,
                namer.seq,
                ARTIFACT_EXT
            )
        }
    }
}
