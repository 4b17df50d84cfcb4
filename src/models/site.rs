//! Per-run values describing the local build.

use std::collections::BTreeSet;

use serde::Serialize;

/// A regular file found under the build root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LocalFile {
    /// Path relative to the build root, `/`-separated
    pub relative_path: String,
}

impl LocalFile {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }
}

/// Everything the uploader needs to push one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadJob {
    pub relative_path: String,
    pub key: String,
    pub content_type: String,
}

/// Keys produced by the current build.
///
/// Computed once per run and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedKeySet {
    keys: BTreeSet<String>,
}

impl ManagedKeySet {
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

impl<'a> FromIterator<&'a UploadJob> for ManagedKeySet {
    fn from_iter<I: IntoIterator<Item = &'a UploadJob>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(|job| job.key.clone()).collect(),
        }
    }
}

impl FromIterator<String> for ManagedKeySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}
