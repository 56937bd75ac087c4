//! Core plumbing shared by every recovery component
//!
//! Holds the injected clock, the per-run context object and the
//! bounded-timeout subprocess helper.

pub mod clock;
pub mod context;
pub mod subprocess;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::RecoveryContext;
pub use subprocess::{run_with_timeout, ProcessOutcome};
