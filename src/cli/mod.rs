//! CLI module for kamrecover
//!
//! Provides the flag surface:
//! - --backup: create one backup (encrypt + replicate per config)
//! - --restore <ARTIFACT>: restore the named artifact
//! - --rotate: run the retention pass only
//! - no flags: run the full recovery workflow

mod args;
mod commands;
mod errors;

pub use args::Cli;
pub use commands::run;
pub use errors::{CliError, CliErrorCode, CliResult};
