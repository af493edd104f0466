//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use netlib_blas::backends::{ReferenceBlas, SimdBlas, UnrolledBlas};
use netlib_blas::{Blas, BlasKernel};
use netlib_core::RuntimeLevel;

/// Relative-epsilon comparison with an absolute floor for values near zero
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance * scale,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}

pub fn assert_all_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (k, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        let scale = e.abs().max(1.0);
        assert!(
            (a - e).abs() <= tolerance * scale,
            "element {k}: expected {e}, got {a} (tolerance {tolerance})"
        );
    }
}

pub fn reference() -> Blas {
    Blas::new(Arc::new(ReferenceBlas::new()))
}

/// Every managed backend the host can construct, reference first
pub fn managed_backends() -> Vec<Blas> {
    let mut handles = vec![reference()];
    if let Ok(unrolled) = UnrolledBlas::new(RuntimeLevel::Vector) {
        handles.push(Blas::new(Arc::new(unrolled) as Arc<dyn BlasKernel>));
    }
    if let Ok(simd) = SimdBlas::new(RuntimeLevel::detect()) {
        handles.push(Blas::new(Arc::new(simd) as Arc<dyn BlasKernel>));
    }
    handles
}

/// Every backend under test, including whatever `blas()` resolved to
pub fn all_backends() -> Vec<Blas> {
    let mut handles = managed_backends();
    handles.push(netlib_blas::blas());
    handles
}

/// Deterministic test data without exact cancellations
pub fn sample(n: usize, seed: u32) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let k = (i as u32).wrapping_mul(2654435761).wrapping_add(seed.wrapping_mul(40503)) % 1000;
            f64::from(k) / 250.0 - 2.0
        })
        .collect()
}
