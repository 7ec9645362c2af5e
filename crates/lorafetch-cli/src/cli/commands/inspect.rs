//! `lorafetch inspect <url>` – fetch, load and list tensors.

use anyhow::{Context, Result};
use lorafetch_core::url_model::redact_token;
use lorafetch_core::weights::{SafetensorsLoader, WeightLoader};
use lorafetch_core::LoraCache;

pub fn run_inspect(cache: &LoraCache, url: &str, limit: Option<usize>) -> Result<()> {
    let path = cache
        .get(url)
        .with_context(|| format!("fetching {}", redact_token(url.trim())))?;
    let weights = SafetensorsLoader
        .load(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    println!("{} ({} tensors)", path.display(), weights.len());
    for (key, value) in weights.metadata() {
        println!("  meta {key} = {value}");
    }
    for name in weights.names().take(limit.unwrap_or(usize::MAX)) {
        if let Some(info) = weights.info(name) {
            println!("  {:<60} {:?} {:?}", name, info.dtype, info.shape);
        }
    }
    Ok(())
}
