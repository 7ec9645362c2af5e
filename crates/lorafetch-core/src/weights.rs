//! Loading cached safetensors files.
//!
//! Header parsing and validation come from the `safetensors` crate;
//! [`SafetensorsWeights`] keeps the file bytes so views can outlive the read.

use crate::error::{LoraError, Result};
use safetensors::tensor::TensorInfo;
use safetensors::SafeTensors;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use safetensors::tensor::TensorView;
pub use safetensors::Dtype;

/// Parses a cached weights file into memory.
pub trait WeightLoader {
    type Weights;

    fn load(&self, path: &Path) -> Result<Self::Weights>;
}

/// Default [`WeightLoader`]: reads the whole file and parses it as safetensors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetensorsLoader;

impl WeightLoader for SafetensorsLoader {
    type Weights = SafetensorsWeights;

    fn load(&self, path: &Path) -> Result<SafetensorsWeights> {
        let bytes = fs::read(path).map_err(|e| LoraError::fs(path, e))?;
        let weights = SafetensorsWeights::parse(bytes)?;
        tracing::debug!(tensors = weights.len(), "loaded {}", path.display());
        Ok(weights)
    }
}

/// Owned safetensors file: the raw bytes plus its decoded header.
#[derive(Debug, Clone)]
pub struct SafetensorsWeights {
    metadata: BTreeMap<String, String>,
    tensors: BTreeMap<String, TensorInfo>,
    bytes: Vec<u8>,
    data_start: usize,
}

impl SafetensorsWeights {
    pub fn parse(bytes: Vec<u8>) -> Result<Self> {
        // deserialize checks offsets against the actual buffer length,
        // read_metadata alone does not.
        SafeTensors::deserialize(&bytes)?;
        let (header_len, header) = SafeTensors::read_metadata(&bytes)?;

        let metadata = header
            .metadata()
            .as_ref()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        let tensors = header
            .tensors()
            .into_iter()
            .map(|(name, info)| (name, info.clone()))
            .collect();

        Ok(Self {
            metadata,
            tensors,
            bytes,
            data_start: 8 + header_len,
        })
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// The `__metadata__` string map, empty when absent.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Tensor names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    pub fn info(&self, name: &str) -> Option<&TensorInfo> {
        self.tensors.get(name)
    }

    pub fn tensor(&self, name: &str) -> Option<TensorView<'_>> {
        let info = self.tensors.get(name)?;
        let (start, end) = info.data_offsets;
        let data = self
            .bytes
            .get(self.data_start + start..self.data_start + end)?;
        TensorView::new(info.dtype, info.shape.clone(), data).ok()
    }
}

/// Builds a safetensors file in memory. Test helper shared with the node tests.
#[cfg(test)]
pub(crate) fn encode_for_test(tensors: &[(&str, Dtype, Vec<usize>, Vec<u8>)]) -> Vec<u8> {
    let mut header = serde_json::Map::new();
    let mut data = Vec::new();
    for (name, dtype, shape, bytes) in tensors {
        let start = data.len();
        data.extend_from_slice(bytes);
        header.insert(
            name.to_string(),
            serde_json::json!({
                "dtype": format!("{dtype:?}"),
                "shape": shape,
                "data_offsets": [start, data.len()],
            }),
        );
    }
    header.insert(
        "__metadata__".to_string(),
        serde_json::json!({ "format": "pt" }),
    );
    let header = serde_json::to_vec(&header).unwrap();
    let mut out = (header.len() as u64).to_le_bytes().to_vec();
    out.extend_from_slice(&header);
    out.extend_from_slice(&data);
    out
}
