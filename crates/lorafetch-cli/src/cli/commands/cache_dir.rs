//! `lorafetch cache-dir` – print the effective cache root.

use anyhow::Result;
use lorafetch_core::CacheRoot;

pub fn run_cache_dir(root: &CacheRoot) -> Result<()> {
    println!("{}", root.path().display());
    Ok(())
}
