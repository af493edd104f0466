//! Managed BLAS backends compared on the hot level 1/2/3 routines

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use netlib_blas::backends::{ReferenceBlas, SimdBlas, UnrolledBlas};
use netlib_blas::{Blas, BlasKernel};
use netlib_core::RuntimeLevel;

/// Every managed backend this host can construct
fn backends() -> Vec<Blas> {
    let mut handles = vec![Blas::new(Arc::new(ReferenceBlas::new()))];
    if let Ok(unrolled) = UnrolledBlas::new(RuntimeLevel::Vector) {
        handles.push(Blas::new(Arc::new(unrolled) as Arc<dyn BlasKernel>));
    }
    if let Ok(simd) = SimdBlas::new(RuntimeLevel::detect()) {
        handles.push(Blas::new(Arc::new(simd) as Arc<dyn BlasKernel>));
    }
    handles
}

fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i % 17) as f64 * 0.25 - 2.0).collect()
}

fn bench_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");

    for n in [64usize, 1024, 16384, 262144] {
        group.throughput(Throughput::Elements(n as u64));
        let x = ramp(n);
        let y = ramp(n);

        for blas in backends() {
            group.bench_with_input(BenchmarkId::new(blas.name(), n), &n, |bencher, &n| {
                bencher.iter(|| blas.dot(n as i32, &x, 1, &y, 1).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_axpy(c: &mut Criterion) {
    let mut group = c.benchmark_group("axpy");

    for n in [64usize, 1024, 16384, 262144] {
        group.throughput(Throughput::Elements(n as u64));
        let x = ramp(n);

        for blas in backends() {
            let mut y = ramp(n);
            group.bench_with_input(BenchmarkId::new(blas.name(), n), &n, |bencher, &n| {
                bencher.iter(|| blas.axpy(n as i32, 0.5, &x, 1, &mut y, 1).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_gemv(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemv");

    for (m, n) in [(16usize, 16usize), (128, 128), (256, 512), (512, 1024)] {
        group.throughput(Throughput::Elements((2 * m * n) as u64));
        let a = ramp(m * n);
        let x = ramp(n);

        for blas in backends() {
            let mut y = vec![0.0; m];
            group.bench_with_input(
                BenchmarkId::new(blas.name(), format!("{}x{}", m, n)),
                &(m, n),
                |bencher, &(m, n)| {
                    bencher.iter(|| {
                        blas.gemv("N", m as i32, n as i32, 1.0, &a, m as i32, &x, 1, 0.0, &mut y, 1)
                            .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_gemm(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm");

    for (m, k, n) in [(16usize, 16usize, 16usize), (64, 64, 64), (128, 128, 128), (256, 256, 256)] {
        group.throughput(Throughput::Elements((2 * m * k * n) as u64));
        let a = ramp(m * k);
        let b = ramp(k * n);

        for blas in backends() {
            let mut out = vec![0.0; m * n];
            group.bench_with_input(
                BenchmarkId::new(blas.name(), format!("{}x{}x{}", m, k, n)),
                &(m, k, n),
                |bencher, &(m, k, n)| {
                    bencher.iter(|| {
                        blas.gemm(
                            "N", "N", m as i32, n as i32, k as i32, 1.0, &a, m as i32, &b, k as i32, 0.0, &mut out,
                            m as i32,
                        )
                        .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_dot, bench_axpy, bench_gemv, bench_gemm);
criterion_main!(benches);
