//! Turns a raw adapter URL into a provider strategy and cache location.
//!
//! The fetcher only depends on [`ProviderStrategy`]; it never looks at the
//! raw URL again.

use crate::cache_root::CacheRoot;
use crate::error::{LoraError, Result};
use crate::url_model::{
    self, cache_filename, canonical_download_url, ends_with_safetensors, inject_token,
    parse_hub_url, replicate_filename, strip_query, HostKind, HubFile, SAFETENSOR_MARKER,
};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the Civitai API key.
pub const CIVITAI_API_KEY_ENV: &str = "CIVITAI_API_KEY";

/// Per-provider download plan. Only the hub variant lacks a cache path; the
/// hub client owns its on-disk layout.
#[derive(Clone, PartialEq, Eq)]
pub enum ProviderStrategy {
    HuggingFace(HubFile),
    Civitai {
        /// Canonical download URL, with the API token appended when configured.
        download_url: String,
        cache_path: PathBuf,
    },
    /// Tarball delivery; the safetensors file is extracted from the archive.
    Replicate { url: String, cache_path: PathBuf },
    Generic { url: String, cache_path: PathBuf },
}

impl ProviderStrategy {
    pub fn cache_path(&self) -> Option<&Path> {
        match self {
            ProviderStrategy::HuggingFace(_) => None,
            ProviderStrategy::Civitai { cache_path, .. }
            | ProviderStrategy::Replicate { cache_path, .. }
            | ProviderStrategy::Generic { cache_path, .. } => Some(cache_path),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            ProviderStrategy::HuggingFace(_) => "huggingface",
            ProviderStrategy::Civitai { .. } => "civitai",
            ProviderStrategy::Replicate { .. } => "replicate",
            ProviderStrategy::Generic { .. } => "generic",
        }
    }

    /// Source location safe to print: hub file coordinates or the URL with
    /// every token masked.
    pub fn display_source(&self) -> String {
        match self {
            ProviderStrategy::HuggingFace(f) => format!("{}:{}", f.repo_id, f.repo_path()),
            ProviderStrategy::Civitai {
                download_url: url, ..
            }
            | ProviderStrategy::Replicate { url, .. }
            | ProviderStrategy::Generic { url, .. } => url_model::redact_token(url),
        }
    }
}

impl fmt::Debug for ProviderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cache_path() {
            Some(path) => write!(
                f,
                "{}({} -> {})",
                self.provider_name(),
                self.display_source(),
                path.display()
            ),
            None => write!(f, "{}({})", self.provider_name(), self.display_source()),
        }
    }
}

/// Optional provider credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    civitai_api_key: Option<String>,
}

impl Credentials {
    /// Blank keys are treated as absent.
    pub fn new(civitai_api_key: Option<String>) -> Self {
        Self {
            civitai_api_key: civitai_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Reads `CIVITAI_API_KEY` from the process environment.
    pub fn from_env() -> Self {
        Self::new(std::env::var(CIVITAI_API_KEY_ENV).ok())
    }

    pub fn civitai_api_key(&self) -> Option<&str> {
        self.civitai_api_key.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("civitai_api_key", &self.civitai_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Resolver bound to one cache root and credential set.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    root: CacheRoot,
    credentials: Credentials,
}

impl UrlResolver {
    pub fn new(root: CacheRoot, credentials: Credentials) -> Self {
        Self { root, credentials }
    }

    pub fn root(&self) -> &CacheRoot {
        &self.root
    }

    pub fn resolve(&self, url: &str) -> Result<ProviderStrategy> {
        resolve(url, &self.root, &self.credentials)
    }
}

/// Classify `raw`, normalize it for its provider and compute where it is cached.
pub fn resolve(raw: &str, root: &CacheRoot, credentials: &Credentials) -> Result<ProviderStrategy> {
    let url = url_model::normalize_source(raw)?;
    let kind = HostKind::classify(url);
    tracing::debug!(?kind, url = %url_model::redact_token(url), "classified adapter URL");

    let strategy = match kind {
        HostKind::HuggingFace => ProviderStrategy::HuggingFace(parse_hub_url(url)?),
        HostKind::Civitai => resolve_civitai(url, root, credentials)?,
        HostKind::Replicate => ProviderStrategy::Replicate {
            url: url.to_string(),
            cache_path: root.general_dir().join(replicate_filename(url)?),
        },
        HostKind::Generic => {
            if !ends_with_safetensors(strip_query(url)) {
                return Err(LoraError::invalid(format!(
                    "only safetensors files are supported: {}",
                    url_model::redact_token(url)
                )));
            }
            ProviderStrategy::Generic {
                url: url.to_string(),
                cache_path: root.general_dir().join(cache_filename(url)),
            }
        }
    };
    tracing::debug!(strategy = ?strategy, "resolved adapter URL");
    Ok(strategy)
}

fn resolve_civitai(
    url: &str,
    root: &CacheRoot,
    credentials: &Credentials,
) -> Result<ProviderStrategy> {
    let url = canonical_download_url(url);
    if !url.contains(SAFETENSOR_MARKER) {
        return Err(LoraError::invalid(format!(
            "only safetensors downloads are supported for civitai: {}",
            url_model::redact_token(&url)
        )));
    }

    // The key is appended after hashing so it never changes the cache filename.
    let cache_path = root.civitai_dir().join(cache_filename(&url));
    let download_url = match credentials.civitai_api_key() {
        Some(key) => inject_token(&url, key),
        None => url.into_owned(),
    };
    Ok(ProviderStrategy::Civitai {
        download_url,
        cache_path,
    })
}
