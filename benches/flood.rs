//! Flood throughput Criterion benchmarks.
//!
//! Measures the cost of one `Hub::flood` as the subscriber count grows. Every
//! subscriber is drained by its own task and its channel is sized so that no
//! message in a timed batch is ever skipped.
//!
//! Run with: cargo bench --bench flood

use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;

use bytehub::{channel, Hub};

/// Floods per timed batch; also the capacity of each subscriber channel
const BATCH: u64 = 256;

const MESSAGE: &[u8] =
    b"This is a string that doesn't matter since a handle is what's being sent, not the bytes.";

/// Hub with `subscribers` drained subscribers and a shared receive counter
fn drained_hub(rt: &Runtime, subscribers: usize) -> (Arc<Hub>, Arc<AtomicU64>) {
    let hub = Arc::new(Hub::new());
    let received = Arc::new(AtomicU64::new(0));

    for id in 0..subscribers as i64 {
        let (tx, mut rx) = channel(BATCH as usize);
        hub.subscribe(id, tx).unwrap();

        let received = Arc::clone(&received);
        rt.spawn(async move {
            while rx.recv().await.is_some() {
                received.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    (hub, received)
}

fn wait_for(received: &AtomicU64, expected: u64) {
    while received.load(Ordering::Relaxed) < expected {
        std::thread::yield_now();
    }
}

fn bench_flood_throughput(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("flood_throughput");

    for subscribers in [1usize, 10, 100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(subscribers as u64));

        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &count| {
                let (hub, received) = drained_hub(&rt, count);
                let msg = Bytes::from_static(MESSAGE);
                let mut expected = received.load(Ordering::Relaxed);

                b.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    let mut remaining = iters;

                    while remaining > 0 {
                        let batch = remaining.min(BATCH);

                        let start = Instant::now();
                        for _ in 0..batch {
                            let skipped = hub.flood(black_box(-1), msg.clone());
                            debug_assert_eq!(skipped, 0);
                        }
                        total += start.elapsed();

                        // Channels must be empty again before the next batch
                        expected += batch * count as u64;
                        wait_for(&received, expected);
                        remaining -= batch;
                    }

                    total
                })
            },
        );
    }

    group.finish();
}

criterion_group!(flood_benches, bench_flood_throughput);
criterion_main!(flood_benches);
