//! Replicate delivery URLs (`https://replicate.delivery/<a>/<b>/...`).

use super::{without_scheme, SAFETENSORS_EXT};
use crate::error::{LoraError, Result};

/// Cache filename `<a>-<b>.safetensors` from the first two path segments.
pub fn replicate_filename(url: &str) -> Result<String> {
    let mut segments = without_scheme(url)
        .split('/')
        .skip(1)
        .filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(a), Some(b)) => Ok(format!("{a}-{b}.{SAFETENSORS_EXT}")),
        _ => Err(LoraError::invalid(format!(
            "replicate URL needs at least two path segments: {url}"
        ))),
    }
}
