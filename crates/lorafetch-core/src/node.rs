//! "Load LoRA (model only) from URL" node.
//!
//! Resolves and fetches the adapter, keeps the most recently loaded weights
//! in memory keyed by cache path, and hands them to a [`ModelPatcher`].

use crate::error::{LoraError, Result};
use crate::fetcher::LoraCache;
use crate::hub::{HfHubClient, HubClient};
use crate::weights::WeightLoader;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const STRENGTH_DEFAULT: f32 = 1.0;
pub const STRENGTH_RANGE: RangeInclusive<f32> = -20.0..=20.0;

/// Applies loaded adapter weights to a base model at a blend strength.
pub trait ModelPatcher<M, W> {
    fn apply(&self, model: M, weights: &W, strength: f32) -> Result<M>;
}

/// Weights held in memory together with the file they came from.
#[derive(Debug)]
pub struct LoadedWeights<W> {
    pub path: PathBuf,
    pub weights: W,
}

/// One node instance. Its weights slot is not shared with other instances.
pub struct LoraUrlLoader<L: WeightLoader, H = HfHubClient> {
    cache: LoraCache<H>,
    loader: L,
    loaded: Option<LoadedWeights<L::Weights>>,
}

impl<L: WeightLoader, H: HubClient> LoraUrlLoader<L, H> {
    pub fn new(cache: LoraCache<H>, loader: L) -> Self {
        Self {
            cache,
            loader,
            loaded: None,
        }
    }

    /// Path of the weights currently held in memory, if any.
    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded.as_ref().map(|l| l.path.as_path())
    }

    /// Returns `model` patched with the adapter at `url`.
    ///
    /// A zero strength returns `model` untouched without resolving the URL.
    pub fn load_lora_model_only<M, P>(
        &mut self,
        model: M,
        url: &str,
        strength: f32,
        patcher: &P,
    ) -> Result<M>
    where
        P: ModelPatcher<M, L::Weights>,
    {
        if strength == 0.0 {
            return Ok(model);
        }
        if !STRENGTH_RANGE.contains(&strength) {
            return Err(LoraError::invalid(format!(
                "strength {strength} outside {:?}",
                STRENGTH_RANGE
            )));
        }

        let path = self.cache.get(url)?;
        let weights = self.weights_for(&path)?;
        patcher.apply(model, weights, strength)
    }

    fn weights_for(&mut self, path: &Path) -> Result<&L::Weights> {
        let loaded = match self.loaded.take() {
            Some(hit) if hit.path == path => hit,
            stale => {
                // Release the old weights before reading the new file.
                drop(stale);
                tracing::debug!("loading weights from {}", path.display());
                LoadedWeights {
                    path: path.to_path_buf(),
                    weights: self.loader.load(path)?,
                }
            }
        };
        Ok(&self.loaded.insert(loaded).weights)
    }
}
