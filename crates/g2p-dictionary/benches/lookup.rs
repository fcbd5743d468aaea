use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use g2p_dictionary::{G2pChain, G2pDictionary, LayerSource};

fn build_dictionary(words: usize) -> G2pDictionary {
    let mut builder = G2pDictionary::builder()
        .add_symbol_type("a", "vowel")
        .add_symbol_type("k", "stop")
        .add_symbol_type("t", "stop");
    for i in 0..words {
        builder = builder.add_entry(&format!("word{i}"), ["k", "a", "t", "a"]);
    }
    builder.build()
}

fn bench_chain_resolve(c: &mut Criterion) {
    let plugin = Arc::new(build_dictionary(100));
    let builtin = Arc::new(build_dictionary(50_000));
    let chain = G2pChain::builder()
        .layer(LayerSource::Plugin, plugin)
        .layer(LayerSource::Builtin, builtin)
        .build();

    let mut group = c.benchmark_group("chain_resolve");
    group.bench_function("plugin_hit", |b| {
        b.iter(|| chain.resolve(black_box("word42")))
    });
    group.bench_function("builtin_hit", |b| {
        b.iter(|| chain.resolve(black_box("word31337")))
    });
    group.bench_function("passthrough", |b| {
        b.iter(|| chain.resolve(black_box("unknown")))
    });
    group.finish();
}

criterion_group!(benches, bench_chain_resolve);
criterion_main!(benches);
