//! `lorafetch fetch <url>` – make sure the file is cached and print its path.

use anyhow::{Context, Result};
use lorafetch_core::url_model::redact_token;
use lorafetch_core::LoraCache;

pub fn run_fetch(cache: &LoraCache, url: &str) -> Result<()> {
    let path = cache
        .get(url)
        .with_context(|| format!("fetching {}", redact_token(url.trim())))?;
    println!("{}", path.display());
    Ok(())
}
