//! Error taxonomy for resolving, fetching and loading adapters.

use std::io;
use std::path::PathBuf;

/// Errors surfaced by the resolver, fetcher and loader.
///
/// None of these are retried locally; they propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum LoraError {
    /// Malformed or unsupported URL (or other caller input). Fix the input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The server answered with anything other than 200.
    #[error("failed to download {url}: HTTP {status}")]
    Download { url: String, status: u32 },

    /// A cache directory or file could not be created or written.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Connection-level failure before any HTTP status was received.
    #[error("transfer failed: {0}")]
    Transport(#[from] curl::Error),

    /// The Hugging Face hub client failed.
    #[error("hub download failed: {0}")]
    Hub(#[from] hf_hub::api::sync::ApiError),

    /// A delivered archive (plain or gzip-compressed tar) could not be read.
    #[error("unreadable archive: {0}")]
    Archive(#[source] io::Error),

    /// A delivered archive contained no safetensors file.
    #[error("no safetensors file found in the downloaded archive")]
    MissingArchiveEntry,

    /// The cached file is not a well-formed safetensors container.
    #[error("malformed safetensors file: {0}")]
    Format(#[from] safetensors::SafeTensorError),
}

impl LoraError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LoraError::InvalidInput(msg.into())
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoraError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LoraError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_error_names_url_and_status() {
        let e = LoraError::Download {
            url: "https://example.com/a.safetensors".to_string(),
            status: 404,
        };
        assert_eq!(
            e.to_string(),
            "failed to download https://example.com/a.safetensors: HTTP 404"
        );
    }

    #[test]
    fn filesystem_error_keeps_source() {
        let e = LoraError::fs(
            "/nope/file",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.to_string().contains("/nope/file"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
