//! Mapping of request paths onto the served root directory

use std::io;
use std::path::{Path, PathBuf};

use crate::observability::Logger;

use super::errors::ApiError;

/// Maps a caller-supplied logical path to a safe absolute path
pub trait PathResolver: Send + Sync {
    fn resolve(&self, logical: &str) -> Result<PathBuf, ApiError>;
}

/// Resolves paths under a fixed root.
///
/// The logical path has its leading `/` stripped and is joined onto the
/// root. Paths that do not exist, or that escape the root once symlinks and
/// `..` are resolved, are reported as not found.
#[derive(Debug, Clone)]
pub struct RootPathResolver {
    root: PathBuf,
}

impl RootPathResolver {
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            root: root.as_ref().canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for RootPathResolver {
    fn resolve(&self, logical: &str) -> Result<PathBuf, ApiError> {
        let joined = self.root.join(logical.trim_start_matches('/'));
        let root = self.root.display().to_string();
        let joined_text = joined.display().to_string();
        Logger::trace(
            "PATH_RESOLVE",
            &[("root_dir", root.as_str()), ("full_path", joined_text.as_str())],
        );

        let resolved = joined
            .canonicalize()
            .map_err(|_| ApiError::PathNotFound(logical.to_string()))?;
        if !resolved.starts_with(&self.root) {
            Logger::warn(
                "PATH_OUTSIDE_ROOT",
                &[("path", logical), ("root_dir", root.as_str())],
            );
            return Err(ApiError::PathNotFound(logical.to_string()));
        }
        Ok(resolved)
    }
}
