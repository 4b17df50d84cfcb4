//! Pipeline stages for a deploy.
//!
//! - `upload`: push every local file under its mapped key
//! - `prune`: delete stale objects under the managed prefix
//! - `invalidate`: drop the CDN's cached copies
//! - `deploy`: run the stages above in order

pub mod deploy;
pub mod invalidate;
pub mod prune;
pub mod upload;

pub use deploy::{DeploySettings, Deployer};
pub use invalidate::invalidate_all;
pub use prune::{PruneOutcome, prune};
pub use upload::upload_all;
