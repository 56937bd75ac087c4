//! CLI argument definitions using clap
//!
//! Flag surface (kept for compatibility with existing cron entries):
//! - kamrecover --backup                run one backup
//! - kamrecover --restore <ARTIFACT>   restore the named artifact
//! - kamrecover --rotate               run the retention pass only
//! - kamrecover                        run the full recovery workflow
//!
//! `--config <PATH>` names the recovery configuration file; without it
//! the default path is used and a missing or malformed file falls back
//! to built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// Kamailio disaster recovery and backup tool
#[derive(Parser, Debug)]
#[command(name = "kamrecover")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the disaster recovery configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Create a backup
    #[arg(long)]
    pub backup: bool,

    /// Restore from a specific backup artifact
    #[arg(long, value_name = "ARTIFACT")]
    pub restore: Option<PathBuf>,

    /// Rotate backups past the retention window
    #[arg(long)]
    pub rotate: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// No action flags means: run the full recovery workflow.
    pub fn wants_full_workflow(&self) -> bool {
        !self.backup && self.restore.is_none() && !self.rotate
    }
}
