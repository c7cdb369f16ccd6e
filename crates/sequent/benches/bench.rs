use core::{
    convert::Infallible,
    hint::black_box,
    sync::atomic::{AtomicU64, Ordering},
};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use sequent::WorkQueue;
use std::{sync::Arc, time::Instant};
use tokio::runtime::Builder;

// Items pushed through the queue per benchmark iteration.
const TOTAL_ITEMS: usize = 4096;

/// Benchmarks the full life of a batch: produce everything, then stop and
/// drain.
fn bench_produce_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("work_queue/produce_drain");

    for total in [256_usize, 1024, 4096] {
        group.throughput(Throughput::Elements(total as u64));
        group.bench_function(format!("elems/{total}"), move |b| {
            let rt = Builder::new_multi_thread()
                .enable_all()
                .worker_threads(2)
                .build()
                .unwrap();

            b.to_async(&rt).iter_custom(move |iters| async move {
                let start = Instant::now();

                for _ in 0..iters {
                    let consumed = Arc::new(AtomicU64::new(0));
                    let queue = WorkQueue::new({
                        let consumed = Arc::clone(&consumed);
                        move |item: u64| {
                            let consumed = Arc::clone(&consumed);
                            async move {
                                consumed.fetch_add(item, Ordering::Relaxed);
                                Ok::<(), Infallible>(())
                            }
                        }
                    })
                    .unwrap();

                    for i in 0..total {
                        queue.produce(i as u64);
                    }
                    queue.stop().await;
                    black_box(consumed.load(Ordering::Relaxed));
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

/// Benchmarks the producer-side cost alone, with the worker draining
/// concurrently.
fn bench_produce_hot(c: &mut Criterion) {
    let mut group = c.benchmark_group("work_queue/produce_hot");
    group.throughput(Throughput::Elements(TOTAL_ITEMS as u64));

    group.bench_function(format!("elems/{TOTAL_ITEMS}"), |b| {
        let rt = Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()
            .unwrap();

        b.to_async(&rt).iter_custom(|iters| async move {
            let queue = WorkQueue::new(|item: u64| async move {
                black_box(item);
                Ok::<(), Infallible>(())
            })
            .unwrap();
            queue.start();

            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..TOTAL_ITEMS {
                    queue.produce(black_box(i as u64));
                }
            }
            let elapsed = start.elapsed();

            queue.stop().await;
            elapsed
        });
    });

    group.finish();
}

/// Benchmarks contended production from multiple tasks into one queue.
fn bench_contended_produce(c: &mut Criterion) {
    let mut group = c.benchmark_group("work_queue/contended");

    for task_count in [1, 2, 4, 8] {
        let per_task = TOTAL_ITEMS / task_count;

        group.throughput(Throughput::Elements(TOTAL_ITEMS as u64));
        group.bench_function(
            format!("elems/{TOTAL_ITEMS}/producers/{task_count}"),
            move |b| {
                let rt = Builder::new_multi_thread().enable_all().build().unwrap();

                b.to_async(&rt).iter_custom(move |iters| async move {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let queue = Arc::new(
                            WorkQueue::new(|item: u64| async move {
                                black_box(item);
                                Ok::<(), Infallible>(())
                            })
                            .unwrap(),
                        );

                        let producers: Vec<_> = (0..task_count)
                            .map(|_| {
                                let queue = Arc::clone(&queue);
                                tokio::spawn(async move {
                                    for i in 0..per_task {
                                        queue.produce(i as u64);
                                    }
                                })
                            })
                            .collect();
                        for producer in producers {
                            producer.await.unwrap();
                        }
                        queue.stop().await;
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_produce_drain,
    bench_produce_hot,
    bench_contended_produce
);
criterion_main!(benches);
