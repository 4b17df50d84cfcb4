// src/pipeline/deploy.rs

//! Deploy orchestration.
//!
//! Stages run strictly in sequence:
//!
//! ```text
//! Enumerate ─▶ Upload ─▶ Prune ─▶ Invalidate ─▶ Done
//!     │          │         │
//!     └──────────┴─────────┴──▶ Failed (fatal error, nothing further runs)
//! ```
//!
//! Delete and invalidation failures do not lead to `Failed`; they are
//! recorded as warnings and the run still reaches `Done`.

use std::path::Path;

use chrono::Utc;

use crate::cdn::CacheInvalidator;
use crate::error::{AppError, Result};
use crate::models::{Config, DeployPlan, DeployReport, DeployStage, ManagedKeySet, UploadJob};
use crate::pipeline::{invalidate, prune, upload};
use crate::services::{LocalTree, plan_uploads};
use crate::storage::ObjectStore;

/// Tunables for one deploy run.
#[derive(Debug, Clone)]
pub struct DeploySettings {
    pub managed_prefix: String,
    pub upload_concurrency: usize,
    pub delete_concurrency: usize,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DeploySettings {
    fn from(config: &Config) -> Self {
        Self {
            managed_prefix: config.deploy.managed_prefix.clone(),
            upload_concurrency: config.transfer.upload_concurrency,
            delete_concurrency: config.transfer.delete_concurrency,
        }
    }
}

/// Pushes a build directory to a store and invalidates the CDN.
///
/// The store and CDN handles are created once by the caller and shared by
/// every stage.
pub struct Deployer<'a> {
    store: &'a dyn ObjectStore,
    cdn: &'a dyn CacheInvalidator,
    settings: DeploySettings,
}

impl<'a> Deployer<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        cdn: &'a dyn CacheInvalidator,
        settings: DeploySettings,
    ) -> Self {
        Self {
            store,
            cdn,
            settings,
        }
    }

    /// Run a full deploy of `root`.
    ///
    /// Returns `Err` only for fatal failures. Soft failures are listed in
    /// the report's warnings.
    pub async fn run(&self, root: &Path) -> Result<DeployReport> {
        let mut report = DeployReport::start();

        // Step 1: Enumerate and map every local file
        report.stage = DeployStage::Enumerate;
        self.step(report.stage, &format!("Enumerating {}", root.display()));
        let jobs = Self::enumerate(root).map_err(|e| Self::failed(report.stage, e))?;
        let managed: ManagedKeySet = jobs.iter().collect();
        log::info!("Found {} files in {}", jobs.len(), root.display());

        // Step 2: Upload all of them
        report.stage = DeployStage::Upload;
        self.step(
            report.stage,
            &format!("Uploading to {}", self.store.location()),
        );
        report.uploaded = upload::upload_all(
            self.store,
            root,
            &jobs,
            self.settings.upload_concurrency,
        )
        .await
        .map_err(|e| Self::failed(report.stage, e))?;

        // Step 3: Prune objects the build no longer contains
        report.stage = DeployStage::Prune;
        self.step(
            report.stage,
            &format!("Pruning {}", self.settings.managed_prefix),
        );
        let outcome = prune::prune(
            self.store,
            &managed,
            &self.settings.managed_prefix,
            self.settings.delete_concurrency,
        )
        .await
        .map_err(|e| Self::failed(report.stage, e))?;
        report.deleted = outcome.deleted;
        for failure in &outcome.failures {
            report.warn(DeployStage::Prune, failure);
        }

        // Step 4: Invalidate the CDN once the bucket holds the new build
        report.stage = DeployStage::Invalidate;
        self.step(
            report.stage,
            &format!("Invalidating {}", self.cdn.distribution_id()),
        );
        match invalidate::invalidate_all(self.cdn).await {
            Ok(id) => report.invalidation_id = Some(id),
            Err(e) => report.warn(DeployStage::Invalidate, &e),
        }

        report.stage = DeployStage::Done;
        report.finished_at = Utc::now();
        Ok(report)
    }

    /// Compute what a deploy of `root` would do without writing anything.
    pub async fn plan(&self, root: &Path) -> Result<DeployPlan> {
        let uploads = Self::enumerate(root)?;
        let managed: ManagedKeySet = uploads.iter().collect();

        let remote = prune::list_all_keys(self.store, &self.settings.managed_prefix).await?;
        let deletions = prune::stale_keys(&remote, &managed, &self.settings.managed_prefix);

        Ok(DeployPlan { uploads, deletions })
    }

    fn enumerate(root: &Path) -> Result<Vec<UploadJob>> {
        let files = LocalTree::open(root)?.collect()?;
        plan_uploads(&files)
    }

    fn step(&self, stage: DeployStage, message: &str) {
        log::info!("Step {}/4: {}", stage.step(), message);
    }

    fn failed(stage: DeployStage, error: AppError) -> AppError {
        log::error!("Deploy failed during {} stage: {}", stage, error);
        error
    }
}
