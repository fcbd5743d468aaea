//! Integration tests for model pack loading.
//!
//! A tiny pack is written into a temporary directory: one grapheme (`a`),
//! one phoneme (`a`), and weights that emit one `a` per source symbol.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use g2p_dictionary::{G2pChain, LayerSource, ResolvedBy};
use g2p_neural::G2pPack;
use phonemizer_core::{G2p, NeuralConfig};

fn write_weights(path: &Path) {
    let device = Device::Cpu;
    let mut tgt = vec![0f32; 25];
    tgt[5 + 4] = 1.0;
    tgt[4 * 5 + 2] = 1.0;
    let mut eye = vec![0f32; 25];
    for i in 0..5 {
        eye[i * 5 + i] = 1.0;
    }
    let tensors = HashMap::from([
        (
            "src_embed.weight".to_string(),
            Tensor::zeros((5, 5), DType::F32, &device).unwrap(),
        ),
        (
            "tgt_embed.weight".to_string(),
            Tensor::from_vec(tgt, (5, 5), &device).unwrap(),
        ),
        (
            "proj.weight".to_string(),
            Tensor::from_vec(eye, (5, 5), &device).unwrap(),
        ),
        (
            "proj.bias".to_string(),
            Tensor::zeros(5, DType::F32, &device).unwrap(),
        ),
    ]);
    candle_core::safetensors::save(&tensors, path).unwrap();
}

fn write_pack(dir: &Path, with_dict: bool) {
    std::fs::write(dir.join("phones.txt"), "a vowel\n").unwrap();
    std::fs::write(dir.join("graphemes.txt"), "a\n").unwrap();
    std::fs::write(dir.join("config.yaml"), "hidden_size: 5\n").unwrap();
    if with_dict {
        std::fs::write(dir.join("dict.txt"), ";;; pack dictionary\nAA  a\n").unwrap();
    }
    write_weights(&dir.join("g2p.safetensors"));
}

#[test]
fn test_load_pack_and_predict() {
    let dir = tempfile::tempdir().unwrap();
    write_pack(dir.path(), true);

    let pack = G2pPack::load(dir.path(), &NeuralConfig::default()).expect("pack should load");
    assert_eq!(pack.phones.len(), 1);
    assert!(pack.dictionary.is_loaded());

    assert_eq!(pack.neural.query("aaa"), Some(vec!["a".into(), "a".into(), "a".into()]));
    assert!(pack.neural.is_vowel("a"));
    assert_eq!(pack.neural.cache().len(), 1);
}

#[test]
fn test_pack_in_chain() {
    let dir = tempfile::tempdir().unwrap();
    write_pack(dir.path(), true);
    let pack = G2pPack::load(dir.path(), &NeuralConfig::default()).unwrap();

    let chain = G2pChain::builder()
        .maybe_layer(
            LayerSource::Builtin,
            pack.dictionary.dictionary().map(|d| d as std::sync::Arc<dyn G2p>),
        )
        .neural(pack.neural.clone())
        .build();

    assert_eq!(chain.resolve_traced("aa").0, ResolvedBy::Layer(LayerSource::Builtin));
    assert_eq!(chain.resolve_traced("a").0, ResolvedBy::Neural);
    assert_eq!(chain.resolve_traced("?").0, ResolvedBy::Passthrough);
}

#[test]
fn test_pack_without_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    write_pack(dir.path(), false);
    let pack = G2pPack::load(dir.path(), &NeuralConfig::default()).unwrap();
    assert!(pack.dictionary.dictionary().is_none());
}

#[test]
fn test_config_mismatch_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    write_pack(dir.path(), false);
    std::fs::write(dir.path().join("config.yaml"), "hidden_size: 7\n").unwrap();
    let err = G2pPack::load(dir.path(), &NeuralConfig::default()).err().unwrap();
    assert!(err.is_load_error());
}
