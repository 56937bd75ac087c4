//! Service lifecycle collaborator
//!
//! Restore needs exactly one operation from the host's service manager:
//! restart a named unit and report its exit code. Production uses
//! systemctl; tests substitute a deterministic double.

use std::io;
use std::process::Command;
use std::time::Duration;

use crate::core::{run_with_timeout, ProcessOutcome};

/// Default bound on one restart invocation.
pub const DEFAULT_RESTART_TIMEOUT: Duration = Duration::from_secs(60);

/// Narrow service-lifecycle capability.
pub trait ServiceController {
    /// Restart the named service, returning its exit code.
    fn restart(&self, name: &str) -> io::Result<i32>;
}

/// systemd-backed controller.
pub struct SystemdController {
    timeout: Duration,
}

impl SystemdController {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_RESTART_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SystemdController {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceController for SystemdController {
    fn restart(&self, name: &str) -> io::Result<i32> {
        let mut command = Command::new("systemctl");
        command.arg("restart").arg(name);

        match run_with_timeout(&mut command, self.timeout)? {
            ProcessOutcome::Exited(code) => Ok(code),
            ProcessOutcome::TimedOut => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!(
                    "systemctl restart {} exceeded {}s",
                    name,
                    self.timeout.as_secs()
                ),
            )),
        }
    }
}
