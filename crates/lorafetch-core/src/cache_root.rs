//! Cache root location and the per-provider layout beneath it.

use crate::error::{LoraError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory created under the discovered base when no root is configured.
pub const CACHE_DIR_NAME: &str = "huggingface_cache";

/// Subdirectory for Civitai downloads.
pub const CIVITAI_SUBDIR: &str = "civitai";

/// Subdirectory for generic and Replicate downloads.
pub const GENERAL_SUBDIR: &str = "general";

/// Conventional directories walked into (in order) when discovering the root.
const DISCOVERY_DIRS: [&str; 2] = ["ComfyUI", "models"];

/// Top-level cache directory. Passed explicitly into the resolver and fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRoot {
    path: PathBuf,
}

impl CacheRoot {
    /// Use `path` as the root as-is. The directory is created lazily by the fetcher.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Discover the root starting from `base`: walk into `ComfyUI/` then
    /// `models/` when they exist, then use `huggingface_cache/` there,
    /// creating it if absent.
    pub fn discover(base: &Path) -> Result<Self> {
        let mut dir = base.to_path_buf();
        for name in DISCOVERY_DIRS {
            let candidate = dir.join(name);
            if candidate.is_dir() {
                dir = candidate;
            }
        }
        let path = dir.join(CACHE_DIR_NAME);
        if !path.exists() {
            tracing::info!("creating cache directory {}", path.display());
            fs::create_dir_all(&path).map_err(|e| LoraError::fs(&path, e))?;
        }
        Ok(Self { path })
    }

    /// Discover from the process working directory.
    pub fn discover_from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| LoraError::fs(".", e))?;
        Self::discover(&cwd)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn civitai_dir(&self) -> PathBuf {
        self.path.join(CIVITAI_SUBDIR)
    }

    pub fn general_dir(&self) -> PathBuf {
        self.path.join(GENERAL_SUBDIR)
    }
}
