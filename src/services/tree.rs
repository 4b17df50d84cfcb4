// src/services/tree.rs

//! Enumeration of the local build directory.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{AppError, Result};
use crate::models::LocalFile;

/// A build root whose regular files are to be deployed.
#[derive(Debug, Clone)]
pub struct LocalTree {
    root: PathBuf,
}

impl LocalTree {
    /// Open a build root, failing if it is missing or not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let metadata = std::fs::metadata(&root).map_err(|e| AppError::io(&root, e))?;
        if !metadata.is_dir() {
            return Err(AppError::io(
                &root,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "build root is not a directory"),
            ));
        }
        Ok(Self { root })
    }

    /// Lazily yield every regular file below the root.
    ///
    /// Paths are relative to the root and `/`-separated. Directories are
    /// skipped; symbolic links are followed.
    pub fn files(&self) -> impl Iterator<Item = Result<LocalFile>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    Some(self.relative(entry.path()).map(LocalFile::new))
                }
                Ok(_) => None,
                Err(e) => Some(Err(AppError::from(e))),
            })
    }

    /// Enumerate the whole tree, failing on the first unreadable entry.
    ///
    /// Pruning is computed from this list, so a partial listing is never
    /// returned.
    pub fn collect(&self) -> Result<Vec<LocalFile>> {
        self.files().collect()
    }

    fn relative(&self, path: &Path) -> Result<String> {
        let rel = path.strip_prefix(&self.root).map_err(|_| {
            AppError::io(
                path,
                std::io::Error::other("entry escaped the build root"),
            )
        })?;

        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| {
                        AppError::io(
                            path,
                            std::io::Error::new(
                                std::io::ErrorKind::InvalidData,
                                "file name is not valid UTF-8",
                            ),
                        )
                    })?;
                    parts.push(part.to_string());
                }
                _ => {
                    return Err(AppError::io(
                        path,
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            "unexpected path component",
                        ),
                    ));
                }
            }
        }
        Ok(parts.join("/"))
    }
}
