//! Benchmarks for a complete live session block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicepath::session::{Band, LiveSession, SessionConfig};

use crate::BLOCK_SIZES;

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.07).sin() * 0.5).collect();
        let mut output = vec![0.0f32; size];

        // Default path: volume → effect → three EQ bands
        let (mut plain, _handle) =
            LiveSession::start(SessionConfig::default()).expect("build session");
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                plain.process_block(black_box(&input), black_box(&mut output));
            })
        });

        // Everything on: echo branch and boosted bands
        let (mut full, _handle) =
            LiveSession::start(SessionConfig::default()).expect("build session");
        full.set_echo(true).expect("enable echo");
        full.set_pitch_offset(0.3).expect("set offset");
        for band in Band::ALL {
            full.set_band(band, 1.5).expect("set band");
        }
        group.bench_with_input(BenchmarkId::new("echo_eq", size), &size, |b, _| {
            b.iter(|| {
                full.process_block(black_box(&input), black_box(&mut output));
            })
        });
    }

    group.finish();
}
