// src/services/keys.rs

//! Mapping of build paths to object keys.
//!
//! Pages are stored without their `.html` suffix so `/about` is served from
//! the `about` object. The root `index.html` keeps its name so it can act as
//! the bucket's default root object.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{LocalFile, UploadJob};
use crate::services::content_type;

const HTML_SUFFIX: &str = ".html";
const ROOT_INDEX: &str = "index.html";

/// Map a relative build path to its object key.
pub fn object_key(relative_path: &str) -> String {
    match relative_path.strip_suffix(HTML_SUFFIX) {
        Some(stem) if relative_path != ROOT_INDEX => stem.to_string(),
        _ => relative_path.to_string(),
    }
}

/// Build upload jobs for the given files, rejecting key collisions.
///
/// A build containing both `foo.html` and `foo` would otherwise write two
/// files to one key and let whichever upload finishes last win.
pub fn plan_uploads(files: &[LocalFile]) -> Result<Vec<UploadJob>> {
    let mut owners: HashMap<String, &str> = HashMap::with_capacity(files.len());
    let mut jobs = Vec::with_capacity(files.len());

    for file in files {
        let key = object_key(&file.relative_path);
        if let Some(first) = owners.insert(key.clone(), &file.relative_path) {
            return Err(AppError::KeyCollision {
                key,
                first: first.to_string(),
                second: file.relative_path.clone(),
            });
        }

        jobs.push(UploadJob {
            content_type: content_type::resolve(&file.relative_path).to_string(),
            relative_path: file.relative_path.clone(),
            key,
        });
    }

    Ok(jobs)
}
