// src/models/mod.rs

//! Domain models for the deployer.
//!
//! Everything here is built fresh per run and dropped at exit; the bucket
//! and the CDN hold the only durable state.

mod config;
mod report;
mod site;

// Re-export all public types
pub use config::{Config, DeployConfig, LoggingConfig, TransferConfig, env};
pub use report::{DeployPlan, DeployReport, DeployStage, DeployWarning};
pub use site::{LocalFile, ManagedKeySet, UploadJob};
