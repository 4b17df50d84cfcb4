//! Deploy progress and outcome reporting.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::models::UploadJob;

/// Stages of a deploy, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    Enumerate,
    Upload,
    Prune,
    Invalidate,
    Done,
}

impl DeployStage {
    /// Position of the stage among the four working stages.
    pub fn step(&self) -> usize {
        match self {
            DeployStage::Enumerate => 1,
            DeployStage::Upload => 2,
            DeployStage::Prune => 3,
            DeployStage::Invalidate | DeployStage::Done => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStage::Enumerate => "enumerate",
            DeployStage::Upload => "upload",
            DeployStage::Prune => "prune",
            DeployStage::Invalidate => "invalidate",
            DeployStage::Done => "done",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable failure recorded during prune or invalidate.
#[derive(Debug, Clone, Serialize)]
pub struct DeployWarning {
    pub stage: DeployStage,
    pub message: String,
}

impl DeployWarning {
    pub fn new(stage: DeployStage, error: &AppError) -> Self {
        Self {
            stage,
            message: error.to_string(),
        }
    }
}

/// Outcome of a deploy that reached `Done`.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub stage: DeployStage,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Number of objects written
    pub uploaded: usize,
    /// Stale keys that were removed
    pub deleted: Vec<String>,
    /// CDN-assigned id of the invalidation, if it was accepted
    pub invalidation_id: Option<String>,
    pub warnings: Vec<DeployWarning>,
}

impl DeployReport {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            stage: DeployStage::Enumerate,
            started_at: now,
            finished_at: now,
            uploaded: 0,
            deleted: Vec::new(),
            invalidation_id: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn warn(&mut self, stage: DeployStage, error: &AppError) {
        log::warn!("{} stage: {}", stage, error);
        self.warnings.push(DeployWarning::new(stage, error));
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Wall-clock duration of the run in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// What a deploy would do, computed without writing anything.
#[derive(Debug, Clone, Serialize)]
pub struct DeployPlan {
    pub uploads: Vec<UploadJob>,
    pub deletions: Vec<String>,
}
