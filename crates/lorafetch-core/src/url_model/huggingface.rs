//! Hugging Face file URLs → repository, subfolder and filename.

use super::{ends_with_safetensors, without_scheme};
use crate::error::{LoraError, Result};

/// Query suffix the hub appends to "download" links.
const DOWNLOAD_FLAG: &str = "?download=true";

/// Segments before any subfolder: host, owner, repo, `resolve`, revision.
const SUBFOLDER_OFFSET: usize = 5;

/// A single file inside a hub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubFile {
    /// `owner/name`.
    pub repo_id: String,
    /// Nested directory path inside the repo, `/`-joined.
    pub subfolder: Option<String>,
    pub filename: String,
}

impl HubFile {
    /// Path of the file relative to the repository root.
    pub fn repo_path(&self) -> String {
        match &self.subfolder {
            Some(sub) => format!("{}/{}", sub, self.filename),
            None => self.filename.clone(),
        }
    }
}

/// Parses a browser (`/blob/`) or raw (`/resolve/`) hub URL.
///
/// `https://huggingface.co/owner/repo/blob/main/sub/file.safetensors?download=true`
/// yields repo `owner/repo`, subfolder `sub`, filename `file.safetensors`.
pub fn parse_hub_url(url: &str) -> Result<HubFile> {
    let url = url.strip_suffix(DOWNLOAD_FLAG).unwrap_or(url);
    let url = url.replace("/blob/", "/resolve/");

    if !ends_with_safetensors(&url) {
        return Err(LoraError::invalid(format!(
            "only safetensors files are supported: {url}"
        )));
    }

    let parts: Vec<&str> = without_scheme(&url).split('/').collect();
    // host, owner, repo, ..., filename
    if parts.len() < 4 {
        return Err(LoraError::invalid(format!(
            "hub URL does not name a repository file: {url}"
        )));
    }

    let owner = parts[1].trim();
    let name = parts[2].trim();
    let filename = parts[parts.len() - 1].trim();
    if owner.is_empty() || name.is_empty() || filename.is_empty() {
        return Err(LoraError::invalid(format!(
            "hub URL does not name a repository file: {url}"
        )));
    }

    let subfolder = if parts.len() > SUBFOLDER_OFFSET + 1 {
        Some(parts[SUBFOLDER_OFFSET..parts.len() - 1].join("/"))
    } else {
        None
    };

    Ok(HubFile {
        repo_id: format!("{owner}/{name}"),
        subfolder,
        filename: filename.to_string(),
    })
}
