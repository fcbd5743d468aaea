//! Sequence model behind the neural predictor.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{Embedding, Linear, Module, VarBuilder, embedding, linear};
use phonemizer_core::{PhonemizerError, PhonemizerResult};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::alphabet::{BOS, PAD};

/// Next-symbol predictor used by greedy decoding.
///
/// Given the encoded source, the target decoded so far and the source
/// cursor, return the next target index. Returning `EOS` advances the
/// cursor.
pub trait SequenceModel: Send + Sync {
    fn next_index(&self, src: &[u32], tgt: &[u32], cursor: usize) -> PhonemizerResult<u32>;
}

/// Optional `config.yaml` inside a model pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct G2pModelConfig {
    /// Expected hidden size; checked against the weights when set.
    #[serde(default)]
    pub hidden_size: Option<usize>,
    /// Pack-specific decoding cap, overriding the global one.
    #[serde(default)]
    pub max_output_len: Option<usize>,
}

/// Embedding model loaded from safetensors.
///
/// Each step embeds the source symbol under the cursor and the last target
/// symbol, sums them, applies `tanh` and projects onto the phoneme
/// vocabulary. Decoding takes the argmax.
#[derive(Debug)]
pub struct CandleG2pModel {
    src_embed: Embedding,
    tgt_embed: Embedding,
    proj: Linear,
    device: Device,
}

impl CandleG2pModel {
    /// Load weights from a safetensors file.
    #[instrument(skip(config), fields(path = %path.display()))]
    pub fn load(path: &Path, config: &G2pModelConfig, device: &Device) -> PhonemizerResult<Self> {
        let tensors = candle_core::safetensors::load(path, device)
            .map_err(|e| model_load_error(path, e))?;
        let model = Self::from_tensors(tensors, config, device).map_err(|e| model_load_error(path, e))?;
        info!("G2P model loaded from {}", path.display());
        Ok(model)
    }

    /// Build the model from named tensors (`src_embed.weight`,
    /// `tgt_embed.weight`, `proj.weight`, `proj.bias`).
    pub fn from_tensors(
        tensors: HashMap<String, Tensor>,
        config: &G2pModelConfig,
        device: &Device,
    ) -> Result<Self> {
        let (src_vocab, hidden) = dims(&tensors, "src_embed.weight")?;
        let (tgt_vocab, tgt_hidden) = dims(&tensors, "tgt_embed.weight")?;
        if tgt_hidden != hidden {
            candle_core::bail!("embedding widths differ: {hidden} vs {tgt_hidden}");
        }
        if let Some(expected) = config.hidden_size {
            if expected != hidden {
                candle_core::bail!("hidden size {hidden} does not match configured {expected}");
            }
        }

        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        Ok(Self {
            src_embed: embedding(src_vocab, hidden, vb.pp("src_embed"))?,
            tgt_embed: embedding(tgt_vocab, hidden, vb.pp("tgt_embed"))?,
            proj: linear(hidden, tgt_vocab, vb.pp("proj"))?,
            device: device.clone(),
        })
    }

    fn step(&self, src: &[u32], tgt: &[u32], cursor: usize) -> Result<u32> {
        let src_id = src
            .get(cursor.min(src.len().saturating_sub(1)))
            .copied()
            .unwrap_or(PAD);
        let tgt_id = tgt.last().copied().unwrap_or(BOS);

        let s = self.src_embed.forward(&Tensor::new(&[src_id], &self.device)?)?;
        let t = self.tgt_embed.forward(&Tensor::new(&[tgt_id], &self.device)?)?;
        let hidden = s.add(&t)?.tanh()?;
        let logits = self.proj.forward(&hidden)?.squeeze(0)?;
        logits.argmax(0)?.to_scalar::<u32>()
    }
}

impl SequenceModel for CandleG2pModel {
    fn next_index(&self, src: &[u32], tgt: &[u32], cursor: usize) -> PhonemizerResult<u32> {
        self.step(src, tgt, cursor)
            .map_err(|e| PhonemizerError::inference(e.to_string()))
    }
}

fn dims(tensors: &HashMap<String, Tensor>, name: &str) -> Result<(usize, usize)> {
    match tensors.get(name) {
        Some(tensor) => tensor.dims2(),
        None => candle_core::bail!("missing tensor {name}"),
    }
}

fn model_load_error(path: &Path, e: candle_core::Error) -> PhonemizerError {
    PhonemizerError::ModelLoad {
        path: path.to_path_buf(),
        source: std::io::Error::other(e.to_string()),
    }
}
