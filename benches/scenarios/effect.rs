//! Benchmarks for the modulation effect spliced into a bare context.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicepath::{
    effect::{ModulationConfig, ModulationEffect},
    graph::{AudioContext, AudioHost},
};

use crate::BLOCK_SIZES;

pub fn bench_effect(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/effect");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.13).sin() * 0.5).collect();
        let mut output = vec![0.0f32; size];

        let mut ctx = AudioContext::new(48_000.0);
        let effect = ModulationEffect::new(&mut ctx, ModulationConfig::default())
            .expect("software host supports every node type");
        let source = ctx.source();
        let destination = ctx.destination();
        ctx.connect(source, effect.input().into()).expect("connect input");
        ctx.connect(effect.output(), destination.into()).expect("connect output");
        effect.set_pitch_offset(&mut ctx, 0.25).expect("set offset");

        group.bench_with_input(BenchmarkId::new("modulation", size), &size, |b, _| {
            b.iter(|| {
                ctx.render(black_box(&input), black_box(&mut output));
            })
        });
    }

    group.finish();
}
