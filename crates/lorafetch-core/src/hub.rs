//! Hugging Face hub download-with-cache.
//!
//! The hub client performs its own existence check and owns the layout under
//! the cache root (`models--owner--name/snapshots/...`).

use crate::error::Result;
use crate::url_model::HubFile;
use hf_hub::api::sync::ApiBuilder;
use std::path::{Path, PathBuf};

/// Fetches a single repository file into `cache_dir`, returning its local path.
pub trait HubClient {
    fn download(&self, file: &HubFile, cache_dir: &Path) -> Result<PathBuf>;
}

/// [`HubClient`] backed by the `hf-hub` sync API.
#[derive(Debug, Clone, Default)]
pub struct HfHubClient {
    progress: bool,
}

impl HfHubClient {
    pub fn new(progress: bool) -> Self {
        Self { progress }
    }
}

impl HubClient for HfHubClient {
    fn download(&self, file: &HubFile, cache_dir: &Path) -> Result<PathBuf> {
        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.to_path_buf())
            .with_progress(self.progress)
            .build()?;
        let path = api.model(file.repo_id.clone()).get(&file.repo_path())?;
        tracing::debug!(repo = %file.repo_id, "hub file at {}", path.display());
        Ok(path)
    }
}
