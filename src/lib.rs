//! kamailio-recovery - disaster recovery and backup tooling for Kamailio
//!
//! Subsystems:
//! - backup: archive builder producing sealed `.tar.gz` artifacts
//! - encryption: passphrase-based artifact encryption gate
//! - remote: offsite replication to object storage
//! - rotation: retention-based artifact reaping
//! - restore: artifact decryption, unpack and service restart
//! - workflow: the composed scheduled recovery run

pub mod backup;
pub mod cli;
pub mod config;
pub mod core;
pub mod encryption;
pub mod observability;
pub mod remote;
pub mod restore;
pub mod rotation;
pub mod workflow;
