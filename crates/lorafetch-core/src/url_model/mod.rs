//! URL modeling: validation, host classification and per-provider parsing.
//!
//! Every function here is pure. Filesystem placement lives in the resolver.

mod civitai;
mod digest;
mod huggingface;
mod replicate;

pub use civitai::{canonical_download_url, inject_token, redact_token, SAFETENSOR_MARKER};
pub use digest::{cache_filename, url_digest};
pub use huggingface::{parse_hub_url, HubFile};
pub use replicate::replicate_filename;

use crate::error::{LoraError, Result};

/// The one supported weight file extension (without the dot).
pub const SAFETENSORS_EXT: &str = "safetensors";

/// Which provider a URL belongs to, decided by its host portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    HuggingFace,
    Civitai,
    Replicate,
    Generic,
}

impl HostKind {
    /// Classify by substring match on the host portion of `url`.
    pub fn classify(url: &str) -> Self {
        let host = host_portion(url).to_ascii_lowercase();
        if host.contains("huggingface.co") {
            HostKind::HuggingFace
        } else if host.contains("civitai.com") {
            HostKind::Civitai
        } else if host.contains("replicate.delivery") {
            HostKind::Replicate
        } else {
            HostKind::Generic
        }
    }
}

/// Trims `raw` and checks it is non-empty and carries an HTTP(S) scheme.
pub fn normalize_source(raw: &str) -> Result<&str> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(LoraError::invalid("URL is empty"));
    }
    if scheme_len(url).is_none() {
        return Err(LoraError::invalid(format!("not an http(s) URL: {url}")));
    }
    Ok(url)
}

/// `url` with the scheme removed. Assumes `url` passed `normalize_source`.
pub(crate) fn without_scheme(url: &str) -> &str {
    scheme_len(url).map(|n| &url[n..]).unwrap_or(url)
}

/// Everything after the scheme up to the first `/`, `?` or `#`.
pub fn host_portion(url: &str) -> &str {
    let rest = without_scheme(url);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// `url` without its query string (and fragment).
pub fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Case-insensitive check that `s` ends with the safetensors extension.
pub fn ends_with_safetensors(s: &str) -> bool {
    s.to_ascii_lowercase().ends_with(SAFETENSORS_EXT)
}

fn scheme_len(url: &str) -> Option<usize> {
    ["https://", "http://"]
        .into_iter()
        .find(|scheme| {
            url.get(..scheme.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(scheme))
        })
        .map(str::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(
            normalize_source("  https://example.com/a.safetensors \n").unwrap(),
            "https://example.com/a.safetensors"
        );
    }

    #[test]
    fn normalize_rejects_empty_and_blank() {
        assert!(matches!(normalize_source(""), Err(LoraError::InvalidInput(_))));
        assert!(matches!(normalize_source("   "), Err(LoraError::InvalidInput(_))));
    }

    #[test]
    fn normalize_rejects_other_schemes() {
        assert!(normalize_source("ftp://example.com/a.safetensors").is_err());
        assert!(normalize_source("example.com/a.safetensors").is_err());
        assert!(normalize_source("http:/x").is_err());
    }

    #[test]
    fn classify_by_host_only() {
        assert_eq!(
            HostKind::classify("https://huggingface.co/o/r/resolve/main/f.safetensors"),
            HostKind::HuggingFace
        );
        assert_eq!(
            HostKind::classify("https://civitai.com/models/1?modelVersionId=2"),
            HostKind::Civitai
        );
        assert_eq!(
            HostKind::classify("https://replicate.delivery/abc/def/trained_model.tar"),
            HostKind::Replicate
        );
        assert_eq!(
            HostKind::classify("https://example.com/huggingface.co/w.safetensors"),
            HostKind::Generic
        );
        assert_eq!(
            HostKind::classify("https://example.com/w.safetensors?src=civitai.com"),
            HostKind::Generic
        );
    }

    #[test]
    fn host_portion_stops_at_path_or_query() {
        assert_eq!(host_portion("https://example.com/a"), "example.com");
        assert_eq!(host_portion("http://example.com?x=1"), "example.com");
        assert_eq!(host_portion("https://example.com"), "example.com");
    }

    #[test]
    fn strip_query_and_extension() {
        assert_eq!(
            strip_query("https://e.com/w.safetensors?v=2"),
            "https://e.com/w.safetensors"
        );
        assert!(ends_with_safetensors("https://e.com/W.SafeTensors"));
        assert!(!ends_with_safetensors("https://e.com/w.ckpt"));
    }
}
