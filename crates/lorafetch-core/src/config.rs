use crate::cache_root::CacheRoot;
use crate::downloader::HttpOptions;
use crate::fetcher::{Fetcher, LoraCache};
use crate::hub::HfHubClient;
use crate::resolver::{Credentials, UrlResolver};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/lorafetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LorafetchConfig {
    /// Cache directory. When unset, discovered from the working directory
    /// (`ComfyUI/models/huggingface_cache` or the nearest equivalent).
    #[serde(default)]
    pub cache_root: Option<PathBuf>,
    /// Show hf-hub progress bars for hub downloads.
    #[serde(default)]
    pub hub_progress: bool,
    /// Connect timeout for direct downloads, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Maximum redirects followed for direct downloads.
    #[serde(default = "default_max_redirections")]
    pub max_redirections: u32,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_max_redirections() -> u32 {
    10
}

impl Default for LorafetchConfig {
    fn default() -> Self {
        Self {
            cache_root: None,
            hub_progress: false,
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirections: default_max_redirections(),
        }
    }
}

impl LorafetchConfig {
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_redirections: self.max_redirections,
        }
    }

    /// The configured root, or one discovered from the working directory.
    pub fn cache_root(&self) -> Result<CacheRoot> {
        Ok(match &self.cache_root {
            Some(path) => CacheRoot::new(path),
            None => CacheRoot::discover_from_cwd()?,
        })
    }

    /// Resolver and fetcher sharing this config's cache root.
    pub fn build_cache(&self, credentials: Credentials) -> Result<LoraCache> {
        let root = self.cache_root()?;
        let fetcher = Fetcher::with_hub(
            root.clone(),
            self.http_options(),
            HfHubClient::new(self.hub_progress),
        );
        Ok(LoraCache::new(UrlResolver::new(root, credentials), fetcher))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lorafetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LorafetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LorafetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: LorafetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = LorafetchConfig::default();
        assert!(cfg.cache_root.is_none());
        assert!(!cfg.hub_progress);
        assert_eq!(cfg.connect_timeout_secs, 30);
        assert_eq!(cfg.max_redirections, 10);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = LorafetchConfig {
            cache_root: Some(PathBuf::from("/srv/loras")),
            ..LorafetchConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: LorafetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.cache_root, cfg.cache_root);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
    }

    #[test]
    fn config_toml_empty_uses_defaults() {
        let cfg: LorafetchConfig = toml::from_str("").unwrap();
        assert!(cfg.cache_root.is_none());
        assert_eq!(cfg.connect_timeout_secs, 30);
        assert_eq!(cfg.max_redirections, 10);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            cache_root = "/data/cache"
            hub_progress = true
            connect_timeout_secs = 5
            max_redirections = 3
        "#;
        let cfg: LorafetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.cache_root, Some(PathBuf::from("/data/cache")));
        assert!(cfg.hub_progress);
        let http = cfg.http_options();
        assert_eq!(http.connect_timeout, Duration::from_secs(5));
        assert_eq!(http.max_redirections, 3);
    }

    #[test]
    fn explicit_cache_root_is_not_discovered() {
        let cfg = LorafetchConfig {
            cache_root: Some(PathBuf::from("/explicit/root")),
            ..LorafetchConfig::default()
        };
        assert_eq!(cfg.cache_root().unwrap(), CacheRoot::new("/explicit/root"));
    }
}
