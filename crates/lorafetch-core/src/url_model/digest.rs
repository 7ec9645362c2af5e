//! Content-addressed cache filenames derived from the URL string.

use super::SAFETENSORS_EXT;
use sha2::{Digest, Sha256};

/// SHA-256 of the URL string as lowercase hex.
pub fn url_digest(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// `<digest>.safetensors` for `url`, query string included.
pub fn cache_filename(url: &str) -> String {
    format!("{}.{}", url_digest(url), SAFETENSORS_EXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_string() {
        assert_eq!(
            url_digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn filename_is_stable_and_query_sensitive() {
        let a = cache_filename("https://example.com/weights.safetensors?v=2");
        assert_eq!(a, cache_filename("https://example.com/weights.safetensors?v=2"));
        assert_ne!(a, cache_filename("https://example.com/weights.safetensors?v=3"));
        assert!(a.ends_with(".safetensors"));
        assert_eq!(a.len(), 64 + ".safetensors".len());
    }
}
