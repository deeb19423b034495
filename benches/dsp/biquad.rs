//! Benchmarks for the tone-control biquads.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicepath::dsp::biquad::{Biquad, BiquadType, Coefficients};

use crate::BLOCK_SIZES;

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut buffer = input.clone();

        let mut shelf = Biquad::new();
        shelf.set_coefficients(Coefficients::new(BiquadType::LowShelf, 200.0, 0.707, 6.0, 48_000.0));
        group.bench_with_input(BenchmarkId::new("low_shelf", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                shelf.render(black_box(&mut buffer));
            })
        });

        // Coefficient design happens once per block when a band moves
        group.bench_with_input(BenchmarkId::new("design_peaking", size), &size, |b, _| {
            b.iter(|| {
                Coefficients::new(
                    BiquadType::Peaking,
                    black_box(1000.0),
                    black_box(1.0),
                    black_box(3.0),
                    48_000.0,
                )
            })
        });
    }

    group.finish();
}
