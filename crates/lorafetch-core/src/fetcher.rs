//! Cache fetcher: returns a local path for a resolved strategy, downloading
//! only on a cache miss.
//!
//! A file at the expected path counts as a valid cache entry. Nothing is
//! re-validated.

use crate::cache_root::CacheRoot;
use crate::downloader::{self, HttpOptions};
use crate::error::{LoraError, Result};
use crate::hub::{HfHubClient, HubClient};
use crate::resolver::{ProviderStrategy, UrlResolver};
use crate::storage;
use crate::url_model::{self, SAFETENSORS_EXT};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Fetches resolved strategies into one cache root.
#[derive(Debug, Clone)]
pub struct Fetcher<H = HfHubClient> {
    root: CacheRoot,
    http: HttpOptions,
    hub: H,
}

impl Fetcher<HfHubClient> {
    pub fn new(root: CacheRoot, http: HttpOptions) -> Self {
        Self::with_hub(root, http, HfHubClient::default())
    }
}

impl<H: HubClient> Fetcher<H> {
    pub fn with_hub(root: CacheRoot, http: HttpOptions, hub: H) -> Self {
        Self { root, http, hub }
    }

    pub fn root(&self) -> &CacheRoot {
        &self.root
    }

    pub fn fetch(&self, strategy: &ProviderStrategy) -> Result<PathBuf> {
        match strategy {
            ProviderStrategy::HuggingFace(file) => self.hub.download(file, self.root.path()),
            ProviderStrategy::Civitai {
                download_url: url,
                cache_path,
            }
            | ProviderStrategy::Generic { url, cache_path } => {
                self.fetch_direct(url, cache_path, |body| Ok(body))
            }
            ProviderStrategy::Replicate { url, cache_path } => {
                self.fetch_direct(url, cache_path, |tarball| first_safetensors_entry(&tarball))
            }
        }
    }

    fn fetch_direct<F>(&self, url: &str, cache_path: &Path, extract: F) -> Result<PathBuf>
    where
        F: FnOnce(Vec<u8>) -> Result<Vec<u8>>,
    {
        if cache_path.exists() {
            tracing::debug!("cache hit {}", cache_path.display());
            return Ok(cache_path.to_path_buf());
        }

        storage::ensure_parent(cache_path)?;
        let log_url = url_model::redact_token(url);
        tracing::info!("downloading {} to {}", log_url, cache_path.display());
        let body = downloader::get_bytes(url, &log_url, self.http)?;
        let data = extract(body)?;
        storage::write_atomic(cache_path, &data)?;
        Ok(cache_path.to_path_buf())
    }
}

/// Resolver and fetcher together: URL in, local path out.
#[derive(Debug, Clone)]
pub struct LoraCache<H = HfHubClient> {
    resolver: UrlResolver,
    fetcher: Fetcher<H>,
}

impl<H: HubClient> LoraCache<H> {
    /// Both halves must share a cache root.
    pub fn new(resolver: UrlResolver, fetcher: Fetcher<H>) -> Self {
        debug_assert_eq!(resolver.root(), fetcher.root());
        Self { resolver, fetcher }
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    pub fn fetcher(&self) -> &Fetcher<H> {
        &self.fetcher
    }

    /// Resolve `url` and make sure its file is in the cache.
    pub fn get(&self, url: &str) -> Result<PathBuf> {
        let strategy = self.resolver.resolve(url)?;
        self.fetcher.fetch(&strategy)
    }
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Bytes of the first `*.safetensors` entry in a tarball, gzip-compressed or not.
pub(crate) fn first_safetensors_entry(tarball: &[u8]) -> Result<Vec<u8>> {
    if tarball.starts_with(&GZIP_MAGIC) {
        tracing::debug!("archive is gzip-compressed");
        scan_tar(GzDecoder::new(tarball))
    } else {
        scan_tar(tarball)
    }
}

fn scan_tar<R: Read>(reader: R) -> Result<Vec<u8>> {
    let suffix = format!(".{SAFETENSORS_EXT}");
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries().map_err(LoraError::Archive)? {
        let mut entry = entry.map_err(LoraError::Archive)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let is_weights = entry
            .path()
            .map_err(LoraError::Archive)?
            .to_string_lossy()
            .ends_with(&suffix);
        if is_weights {
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data).map_err(LoraError::Archive)?;
            tracing::debug!(bytes = data.len(), "extracted safetensors entry from archive");
            return Ok(data);
        }
    }
    Err(LoraError::MissingArchiveEntry)
}
