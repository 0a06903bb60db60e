//! Cost of submitting bursts of batchable calls.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use openads_ast::{AstClient, DispatcherConfig, InlineQueue, RecordingTagClient};

fn bench_refresh_burst(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .expect("runtime");
    let mut group = c.benchmark_group("refresh_burst");

    for burst in [1u64, 8, 64] {
        group.throughput(Throughput::Elements(burst));
        group.bench_with_input(BenchmarkId::new("calls", burst), &burst, |b, &burst| {
            let tags = Arc::new(RecordingTagClient::new());
            let adapter = AstClient::with_handle(
                tags,
                Arc::new(InlineQueue::new()),
                DispatcherConfig::default(),
                runtime.handle().clone(),
            );
            b.iter(|| {
                for i in 0..burst {
                    adapter.refresh(black_box([format!("slot-{i}")]));
                }
            })
        });
    }

    group.finish();
}

fn bench_load_tags_burst(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .expect("runtime");
    let adapter = AstClient::with_handle(
        Arc::new(RecordingTagClient::new()),
        Arc::new(InlineQueue::new()),
        DispatcherConfig::default(),
        runtime.handle().clone(),
    );

    c.bench_function("load_tags_x8", |b| {
        b.iter(|| {
            for _ in 0..8 {
                black_box(adapter.load_tags());
            }
        })
    });
}

criterion_group!(benches, bench_refresh_burst, bench_load_tags_burst);
criterion_main!(benches);
