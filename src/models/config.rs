//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where to read the build from and where to push it
    #[serde(default)]
    pub deploy: DeployConfig,

    /// Request fan-out and retry settings
    #[serde(default)]
    pub transfer: TransferConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, falling back to defaults if the file is absent.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config file {:?} not found. Using defaults.", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Override values from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Override values from an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bucket) = lookup(env::BUCKET) {
            self.deploy.bucket = bucket;
        }
        if let Some(id) = lookup(env::DISTRIBUTION) {
            self.deploy.distribution_id = id;
        }
        if let Some(dir) = lookup(env::BUILD_DIR) {
            self.deploy.build_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup(env::MANAGED_PREFIX) {
            self.deploy.managed_prefix = prefix;
        }
        if let Some(n) = lookup(env::UPLOAD_CONCURRENCY) {
            self.transfer.upload_concurrency = parse_count(env::UPLOAD_CONCURRENCY, &n)?;
        }
        if let Some(n) = lookup(env::DELETE_CONCURRENCY) {
            self.transfer.delete_concurrency = parse_count(env::DELETE_CONCURRENCY, &n)?;
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.deploy.bucket.trim().is_empty() {
            return Err(AppError::validation(format!(
                "deploy.bucket is empty (set {} or --bucket)",
                env::BUCKET
            )));
        }
        if self.deploy.distribution_id.trim().is_empty() {
            return Err(AppError::validation(format!(
                "deploy.distribution_id is empty (set {} or --distribution-id)",
                env::DISTRIBUTION
            )));
        }
        if self.deploy.managed_prefix.is_empty() {
            return Err(AppError::validation(
                "deploy.managed_prefix must not be empty",
            ));
        }
        if self.transfer.upload_concurrency == 0 {
            return Err(AppError::validation(
                "transfer.upload_concurrency must be > 0",
            ));
        }
        if self.transfer.delete_concurrency == 0 {
            return Err(AppError::validation(
                "transfer.delete_concurrency must be > 0",
            ));
        }
        if self.transfer.list_page_size == 0 {
            return Err(AppError::validation("transfer.list_page_size must be > 0"));
        }
        if self.transfer.max_attempts == 0 {
            return Err(AppError::validation("transfer.max_attempts must be > 0"));
        }
        Ok(())
    }
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|e| AppError::config(format!("{name}={value:?} is not a count: {e}")))
}

/// Environment variable names.
pub mod env {
    pub const BUCKET: &str = "BUCKET_NAME";
    pub const DISTRIBUTION: &str = "DISTRIBUTION_ID";
    pub const BUILD_DIR: &str = "SITEPUSH_BUILD_DIR";
    pub const MANAGED_PREFIX: &str = "SITEPUSH_MANAGED_PREFIX";
    pub const UPLOAD_CONCURRENCY: &str = "SITEPUSH_UPLOAD_CONCURRENCY";
    pub const DELETE_CONCURRENCY: &str = "SITEPUSH_DELETE_CONCURRENCY";
}

/// Source directory and deploy targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Local build root
    #[serde(default = "defaults::build_dir")]
    pub build_dir: PathBuf,

    /// Target S3 bucket
    #[serde(default)]
    pub bucket: String,

    /// CloudFront distribution fronting the bucket
    #[serde(default)]
    pub distribution_id: String,

    /// Only keys under this prefix are ever pruned
    #[serde(default = "defaults::managed_prefix")]
    pub managed_prefix: String,

    /// AWS region override
    #[serde(default)]
    pub region: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            build_dir: defaults::build_dir(),
            bucket: String::new(),
            distribution_id: String::new(),
            managed_prefix: defaults::managed_prefix(),
            region: None,
        }
    }
}

/// Request fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Maximum uploads in flight
    #[serde(default = "defaults::upload_concurrency")]
    pub upload_concurrency: usize,

    /// Maximum deletes in flight
    #[serde(default = "defaults::delete_concurrency")]
    pub delete_concurrency: usize,

    /// Maximum keys requested per listing page
    #[serde(default = "defaults::list_page_size")]
    pub list_page_size: usize,

    /// SDK attempts per request, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            upload_concurrency: defaults::upload_concurrency(),
            delete_concurrency: defaults::delete_concurrency(),
            list_page_size: defaults::list_page_size(),
            max_attempts: defaults::max_attempts(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

impl LoggingConfig {
    /// The configured level as a filter, `None` if it is not a level name.
    pub fn level_filter(&self) -> Option<log::LevelFilter> {
        self.level.trim().parse().ok()
    }
}

mod defaults {
    use std::path::PathBuf;

    // Deploy defaults
    pub fn build_dir() -> PathBuf {
        PathBuf::from("build")
    }
    pub fn managed_prefix() -> String {
        "_app/".into()
    }

    // Transfer defaults
    pub fn upload_concurrency() -> usize {
        20
    }
    pub fn delete_concurrency() -> usize {
        50
    }
    pub fn list_page_size() -> usize {
        1000
    }
    pub fn max_attempts() -> u32 {
        3
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
