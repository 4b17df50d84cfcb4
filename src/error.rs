// src/error.rs

//! Unified error handling for the deployer.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for deploy operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Reading or walking the build directory failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an object to the store failed
    #[error("Upload failed for key '{key}': {message}")]
    Upload { key: String, message: String },

    /// Listing the managed prefix failed
    #[error("Listing prefix '{prefix}' failed: {message}")]
    List { prefix: String, message: String },

    /// Deleting a stale object failed
    #[error("Delete failed for key '{key}': {message}")]
    Delete { key: String, message: String },

    /// The CDN rejected the invalidation request
    #[error("Invalidation of distribution '{distribution_id}' failed: {message}")]
    Invalidation {
        distribution_id: String,
        message: String,
    },

    /// Two local files map to the same object key
    #[error("Key collision on '{key}': both '{first}' and '{second}' map to it")]
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an I/O error tied to a local path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an upload error for a key.
    pub fn upload(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Upload {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a listing error for a prefix.
    pub fn list(prefix: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::List {
            prefix: prefix.into(),
            message: message.to_string(),
        }
    }

    /// Create a delete error for a key.
    pub fn delete(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Delete {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalidation error for a distribution.
    pub fn invalidation(distribution_id: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Invalidation {
            distribution_id: distribution_id.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error must abort the deploy.
    ///
    /// Failed deletes and failed invalidations leave the bucket holding the
    /// new build, so they are reported as warnings instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Delete { .. } | Self::Invalidation { .. })
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let source = match err.into_io_error() {
            Some(io) => io,
            None => std::io::Error::other("symbolic link loop"),
        };
        Self::Io { path, source }
    }
}
