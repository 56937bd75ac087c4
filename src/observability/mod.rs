//! Observability for kamailio-recovery
//!
//! One structured JSON log line per event, written synchronously.

pub mod logger;

pub use logger::{Logger, Severity};
