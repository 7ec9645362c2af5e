//! `lorafetch resolve <url>` – show where a URL would be fetched from and cached.

use anyhow::Result;
use lorafetch_core::LoraCache;

pub fn run_resolve(cache: &LoraCache, url: &str) -> Result<()> {
    let strategy = cache.resolver().resolve(url)?;
    println!("provider: {}", strategy.provider_name());
    println!("source:   {}", strategy.display_source());
    match strategy.cache_path() {
        Some(path) => println!("cache:    {}", path.display()),
        None => println!(
            "cache:    managed by the hub client under {}",
            cache.resolver().root().path().display()
        ),
    }
    Ok(())
}
