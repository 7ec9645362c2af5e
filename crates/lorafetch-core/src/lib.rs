pub mod config;
pub mod logging;

pub mod cache_root;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod hub;
pub mod node;
pub mod resolver;
pub mod storage;
pub mod url_model;
pub mod weights;

pub use cache_root::CacheRoot;
pub use error::{LoraError, Result};
pub use fetcher::{Fetcher, LoraCache};
pub use resolver::{resolve, Credentials, ProviderStrategy, UrlResolver};
