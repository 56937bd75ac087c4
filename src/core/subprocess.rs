//! Bounded-timeout subprocess execution
//!
//! External tools (object-storage CLI, service manager) are invoked as
//! blocking subprocesses. Every invocation carries a timeout so a hung
//! tool cannot stall a scheduled run indefinitely; expiry is reported
//! to the caller, which maps it to that stage's failure severity.

use std::io;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Outcome of a bounded subprocess run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Process exited with the given code (-1 when killed by a signal).
    Exited(i32),
    /// Process did not exit within the timeout and was killed.
    TimedOut,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        matches!(self, ProcessOutcome::Exited(0))
    }
}

/// Run a command to completion or kill it at the timeout.
///
/// stdin is closed; stdout/stderr are inherited so tool output lands in
/// the operator's log stream.
pub fn run_with_timeout(command: &mut Command, timeout: Duration) -> io::Result<ProcessOutcome> {
    let mut child = command.stdin(Stdio::null()).spawn()?;

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(ProcessOutcome::Exited(status.code().unwrap_or(-1)));
        }
        if Instant::now() >= deadline {
            // Kill then reap; the process may still win the race and
            // exit normally, which is fine either way.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(ProcessOutcome::TimedOut);
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}
