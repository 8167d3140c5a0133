//! Ingest benchmark: Measure the per-chunk cost of the engine hot path.
//!
//! Target: < 5µs per `add_chunk` with a null renderer, flat in the number
//! of retained chunks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flywheel_stream::feed::split_graphemes;
use flywheel_stream::render::{materialize, MaterializeOptions};
use flywheel_stream::{
    Chunk, ChunkBuffer, ChunkId, ChunkInput, ManualClock, NullRenderer, Progress, StatsSnapshot,
    StreamConfig, StreamEngine,
};
use std::time::Duration;

fn engine() -> StreamEngine {
    let config = StreamConfig {
        show_stats: false,
        ..StreamConfig::default()
    };
    StreamEngine::new(config, NullRenderer)
        .expect("default config is valid")
        .with_clock(ManualClock::new())
}

fn chunks(count: u64) -> Vec<Chunk> {
    (0..count)
        .map(|i| {
            Chunk::from_input(
                ChunkId(i),
                Duration::from_millis(i),
                ChunkInput::text(format!("token{i} ")),
            )
        })
        .collect()
}

fn buffer_push(c: &mut Criterion) {
    let chunk = chunks(1).remove(0);
    c.bench_function("chunk_buffer_push_at_capacity", |b| {
        let mut buffer = ChunkBuffer::new(1024).expect("non-zero capacity");
        for _ in 0..1024 {
            buffer.push(chunk.clone());
        }
        b.iter(|| {
            buffer.push(black_box(chunk.clone()));
        });
    });
}

fn engine_add_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_add_chunk");
    for retained in [0u64, 1_000, 10_000, 40_000] {
        group.bench_with_input(BenchmarkId::from_parameter(retained), &retained, |b, &retained| {
            let mut engine = engine();
            engine.start();
            for i in 0..retained {
                engine.add_chunk(format!("token{i} "));
            }
            b.iter(|| {
                engine.add_chunk(black_box("next "));
            });
        });
    }
    group.finish();
}

fn engine_paused_ingest(c: &mut Criterion) {
    c.bench_function("engine_paused_add_chunk", |b| {
        let mut engine = engine();
        engine.start();
        engine.pause();
        b.iter(|| {
            engine.add_chunk(black_box("deferred "));
        });
    });
}

fn materialize_log(c: &mut Criterion) {
    let log = chunks(1000);
    let progress = Progress {
        current: 500,
        total: Some(1000),
        percentage: Some(50.0),
    };
    let options = MaterializeOptions::default();

    c.bench_function("materialize_1k_chunks", |b| {
        b.iter(|| {
            materialize(
                black_box(&log),
                &progress,
                &StatsSnapshot::default(),
                &options,
            )
        });
    });
}

fn split_payload(c: &mut Criterion) {
    let payload = "Streaming héllo wörld 👩‍👩‍👧 ".repeat(200);
    c.bench_function("split_graphemes_6k", |b| {
        b.iter(|| split_graphemes(black_box(&payload), 512));
    });
}

criterion_group!(
    benches,
    buffer_push,
    engine_add_chunk,
    engine_paused_ingest,
    materialize_log,
    split_payload,
);
criterion_main!(benches);
