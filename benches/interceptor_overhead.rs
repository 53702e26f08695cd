//! Interceptor overhead benchmark
//!
//! Compares a direct trait call against the same call routed through a
//! profiling proxy, for both unmeasured and measured methods, and measures
//! recording under contention from several threads.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench interceptor_overhead
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use method_profiler::{profiled_trait, Profiler};
use std::sync::Arc;
use std::thread;

profiled_trait! {
    pub trait Checksum: Send + Sync {
        #[profiled]
        fn measured(&self, data: &[u8]) -> u64;
        fn unmeasured(&self, data: &[u8]) -> u64;
    }
}

struct Fnv;

fn fnv1a(data: &[u8]) -> u64 {
    data.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

impl Checksum for Fnv {
    fn measured(&self, data: &[u8]) -> u64 {
        fnv1a(data)
    }

    fn unmeasured(&self, data: &[u8]) -> u64 {
        fnv1a(data)
    }
}

/// Benchmark: direct call vs. proxy call, measured and unmeasured
fn bench_call_paths(c: &mut Criterion) {
    let profiler = Profiler::with_system_clock();
    let proxy = profiler.wrap::<dyn Checksum, _>(Fnv).unwrap();
    let data = vec![0xa5u8; 64];

    let mut group = c.benchmark_group("call_path");
    group.bench_function("direct", |b| b.iter(|| Fnv.measured(black_box(&data))));
    group.bench_function("proxy_unmeasured", |b| {
        b.iter(|| proxy.unmeasured(black_box(&data)))
    });
    group.bench_function("proxy_measured", |b| {
        b.iter(|| proxy.measured(black_box(&data)))
    });
    group.finish();
}

/// Benchmark: measured calls from several threads sharing one store
fn bench_contended_recording(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_recording");

    for threads in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let profiler = Profiler::with_system_clock();
            let proxy = Arc::new(profiler.wrap::<dyn Checksum, _>(Fnv).unwrap());

            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let proxy = Arc::clone(&proxy);
                        thread::spawn(move || {
                            for i in 0..1000u32 {
                                black_box(proxy.measured(&i.to_le_bytes()));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_call_paths, bench_contended_recording);
criterion_main!(benches);
