//! AVX2/FMA managed backend
//!
//! ## SIMD Support
//!
//! - AVX2 + FMA: 4 lanes (f64), 8 lanes (f32)
//! - Unrolled scalar fallback when the host lacks either feature
//!
//! Large `gemm` calls additionally split the columns of `C` across the rayon
//! pool; every column is written by exactly one task.

use rayon::prelude::*;

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use netlib_core::platform::has_avx2_fma;
use netlib_core::{CandidateError, MatrixView, MatrixViewMut, Platform, Real, RuntimeLevel, StridedView, StridedViewMut};

use super::unrolled;
use crate::flags::Transpose;
use crate::kernel::{BlasKernel, BlasKernels, BlasRoutine, Capabilities};
use crate::reference;

/// `m·n·k` above which `gemm` columns are computed in parallel
const PARALLEL_MIN_WORK: usize = 1 << 18;

/// Element types with AVX2/FMA kernels
pub(crate) trait SimdLane: Real {
    fn dot(x: &[Self], y: &[Self]) -> Self;

    fn axpy(alpha: Self, x: &[Self], y: &mut [Self]);

    fn scal(alpha: Self, x: &mut [Self]);

    fn asum(x: &[Self]) -> Self;
}

impl SimdLane for f64 {
    #[inline(always)]
    fn dot(x: &[f64], y: &[f64]) -> f64 {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { ddot_avx2(x, y) };
        }
        unrolled::dot(x, y)
    }

    #[inline(always)]
    fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { daxpy_avx2(alpha, x, y) };
        }
        unrolled::axpy(alpha, x, y)
    }

    #[inline(always)]
    fn scal(alpha: f64, x: &mut [f64]) {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { dscal_avx2(alpha, x) };
        }
        unrolled::scal(alpha, x)
    }

    #[inline(always)]
    fn asum(x: &[f64]) -> f64 {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { dasum_avx2(x) };
        }
        unrolled::asum(x)
    }
}

impl SimdLane for f32 {
    #[inline(always)]
    fn dot(x: &[f32], y: &[f32]) -> f32 {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { sdot_avx2(x, y) };
        }
        unrolled::dot(x, y)
    }

    #[inline(always)]
    fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { saxpy_avx2(alpha, x, y) };
        }
        unrolled::axpy(alpha, x, y)
    }

    #[inline(always)]
    fn scal(alpha: f32, x: &mut [f32]) {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { sscal_avx2(alpha, x) };
        }
        unrolled::scal(alpha, x)
    }

    #[inline(always)]
    fn asum(x: &[f32]) -> f32 {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        if has_avx2_fma() {
            return unsafe { sasum_avx2(x) };
        }
        unrolled::asum(x)
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn ddot_avx2(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    let simd_end = n / 4 * 4;
    let (xp, yp) = (x.as_ptr(), y.as_ptr());
    let mut acc = _mm256_setzero_pd();
    let mut i = 0;

    // Process 4 elements at a time
    while i < simd_end {
        acc = _mm256_fmadd_pd(_mm256_loadu_pd(xp.add(i)), _mm256_loadu_pd(yp.add(i)), acc);
        i += 4;
    }

    let mut lanes = [0.0f64; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);

    // Handle remaining elements
    for idx in simd_end..n {
        sum += x[idx] * y[idx];
    }
    sum
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn daxpy_avx2(alpha: f64, x: &[f64], y: &mut [f64]) {
    let n = x.len().min(y.len());
    let simd_end = n / 4 * 4;
    let (xp, yp) = (x.as_ptr(), y.as_mut_ptr());
    let va = _mm256_set1_pd(alpha);
    let mut i = 0;

    while i < simd_end {
        let yv = _mm256_fmadd_pd(va, _mm256_loadu_pd(xp.add(i)), _mm256_loadu_pd(yp.add(i)));
        _mm256_storeu_pd(yp.add(i), yv);
        i += 4;
    }

    for idx in simd_end..n {
        y[idx] += alpha * x[idx];
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn dscal_avx2(alpha: f64, x: &mut [f64]) {
    let n = x.len();
    let simd_end = n / 4 * 4;
    let xp = x.as_mut_ptr();
    let va = _mm256_set1_pd(alpha);
    let mut i = 0;

    while i < simd_end {
        _mm256_storeu_pd(xp.add(i), _mm256_mul_pd(va, _mm256_loadu_pd(xp.add(i))));
        i += 4;
    }

    for value in &mut x[simd_end..] {
        *value *= alpha;
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn dasum_avx2(x: &[f64]) -> f64 {
    let n = x.len();
    let simd_end = n / 4 * 4;
    let xp = x.as_ptr();
    let sign = _mm256_set1_pd(-0.0);
    let mut acc = _mm256_setzero_pd();
    let mut i = 0;

    while i < simd_end {
        acc = _mm256_add_pd(acc, _mm256_andnot_pd(sign, _mm256_loadu_pd(xp.add(i))));
        i += 4;
    }

    let mut lanes = [0.0f64; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for value in &x[simd_end..] {
        sum += value.abs();
    }
    sum
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn sdot_avx2(x: &[f32], y: &[f32]) -> f32 {
    let n = x.len().min(y.len());
    let simd_end = n / 8 * 8;
    let (xp, yp) = (x.as_ptr(), y.as_ptr());
    let mut acc = _mm256_setzero_ps();
    let mut i = 0;

    // Process 8 elements at a time
    while i < simd_end {
        acc = _mm256_fmadd_ps(_mm256_loadu_ps(xp.add(i)), _mm256_loadu_ps(yp.add(i)), acc);
        i += 8;
    }

    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    let mut sum: f32 = lanes.iter().sum();

    for idx in simd_end..n {
        sum += x[idx] * y[idx];
    }
    sum
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn saxpy_avx2(alpha: f32, x: &[f32], y: &mut [f32]) {
    let n = x.len().min(y.len());
    let simd_end = n / 8 * 8;
    let (xp, yp) = (x.as_ptr(), y.as_mut_ptr());
    let va = _mm256_set1_ps(alpha);
    let mut i = 0;

    while i < simd_end {
        let yv = _mm256_fmadd_ps(va, _mm256_loadu_ps(xp.add(i)), _mm256_loadu_ps(yp.add(i)));
        _mm256_storeu_ps(yp.add(i), yv);
        i += 8;
    }

    for idx in simd_end..n {
        y[idx] += alpha * x[idx];
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn sscal_avx2(alpha: f32, x: &mut [f32]) {
    let n = x.len();
    let simd_end = n / 8 * 8;
    let xp = x.as_mut_ptr();
    let va = _mm256_set1_ps(alpha);
    let mut i = 0;

    while i < simd_end {
        _mm256_storeu_ps(xp.add(i), _mm256_mul_ps(va, _mm256_loadu_ps(xp.add(i))));
        i += 8;
    }

    for value in &mut x[simd_end..] {
        *value *= alpha;
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "avx2,fma")]
unsafe fn sasum_avx2(x: &[f32]) -> f32 {
    let n = x.len();
    let simd_end = n / 8 * 8;
    let xp = x.as_ptr();
    let sign = _mm256_set1_ps(-0.0);
    let mut acc = _mm256_setzero_ps();
    let mut i = 0;

    while i < simd_end {
        acc = _mm256_add_ps(acc, _mm256_andnot_ps(sign, _mm256_loadu_ps(xp.add(i))));
        i += 8;
    }

    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    let mut sum: f32 = lanes.iter().sum();
    for value in &x[simd_end..] {
        sum += value.abs();
    }
    sum
}

/// `C(:, j) := beta·C(:, j) + alpha·A·op(B)(:, j)` for one column
#[allow(clippy::too_many_arguments)]
fn gemm_column<T: SimdLane>(
    column: &mut [T],
    j: usize,
    transb: Transpose,
    k: usize,
    alpha: T,
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
    beta: T,
) {
    if beta == T::zero() {
        column.fill(T::zero());
    } else if beta != T::one() {
        T::scal(beta, column);
    }
    if alpha == T::zero() {
        return;
    }
    for l in 0..k {
        let blj = if transb.is_transposed() { b.get(j, l) } else { b.get(l, j) };
        let scale = alpha * blj;
        if scale != T::zero() {
            T::axpy(scale, a.column(l), column);
        }
    }
}

/// AVX2/FMA backend, selected from runtime level `Simd`
#[derive(Debug, Clone, Copy)]
pub struct SimdBlas {
    _private: (),
}

impl SimdBlas {
    pub const REQUIRED_LEVEL: RuntimeLevel = RuntimeLevel::Simd;

    /// Fails below level `Simd`, or when the level was forced on a host without AVX2/FMA
    pub fn new(level: RuntimeLevel) -> Result<Self, CandidateError> {
        if level < Self::REQUIRED_LEVEL {
            return Err(CandidateError::RuntimeLevel {
                required: Self::REQUIRED_LEVEL.to_string(),
                detected: level.to_string(),
            });
        }
        if !has_avx2_fma() {
            let platform = Platform::current();
            return Err(CandidateError::UnsupportedPlatform {
                os: platform.os.to_string(),
                arch: platform.arch.to_string(),
            });
        }
        Ok(Self { _private: () })
    }
}

impl<T: SimdLane> BlasKernels<T> for SimdBlas {
    fn asum(&self, x: StridedView<'_, T>) -> netlib_core::Result<T> {
        Ok(match x.as_contiguous() {
            Some(xs) => T::asum(xs),
            None => reference::level1::asum(x),
        })
    }

    fn axpy(&self, alpha: T, x: StridedView<'_, T>, mut y: StridedViewMut<'_, T>) -> netlib_core::Result<()> {
        match (x.as_contiguous(), y.as_contiguous_mut()) {
            (Some(xs), Some(ys)) => T::axpy(alpha, xs, ys),
            _ => reference::level1::axpy(alpha, x, y),
        }
        Ok(())
    }

    fn dot(&self, x: StridedView<'_, T>, y: StridedView<'_, T>) -> netlib_core::Result<T> {
        Ok(match (x.as_contiguous(), y.as_contiguous()) {
            (Some(xs), Some(ys)) => T::dot(xs, ys),
            _ => reference::level1::dot(x, y),
        })
    }

    fn scal(&self, alpha: T, mut x: StridedViewMut<'_, T>) -> netlib_core::Result<()> {
        match x.as_contiguous_mut() {
            Some(xs) => T::scal(alpha, xs),
            None => reference::level1::scal(alpha, x),
        }
        Ok(())
    }

    fn gemv(
        &self,
        trans: Transpose,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        mut y: StridedViewMut<'_, T>,
    ) -> netlib_core::Result<()> {
        let (Some(xs), Some(ys)) = (x.as_contiguous(), y.as_contiguous_mut()) else {
            reference::level2::gemv(trans, alpha, a, x, beta, y);
            return Ok(());
        };
        unrolled::scale_column(beta, ys);
        if alpha == T::zero() {
            return Ok(());
        }
        if trans.is_transposed() {
            for (j, yj) in ys.iter_mut().enumerate() {
                *yj += alpha * T::dot(a.column(j), xs);
            }
        } else {
            for (j, &xj) in xs.iter().enumerate() {
                let scale = alpha * xj;
                if scale != T::zero() {
                    T::axpy(scale, a.column(j), ys);
                }
            }
        }
        Ok(())
    }

    fn gemm(
        &self,
        transa: Transpose,
        transb: Transpose,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixView<'_, T>,
        beta: T,
        mut c: MatrixViewMut<'_, T>,
    ) -> netlib_core::Result<()> {
        if transa.is_transposed() {
            reference::level3::gemm(transa, transb, k, alpha, a, b, beta, c);
            return Ok(());
        }
        let (rows, ld) = (c.rows(), c.ld());
        let work = rows.saturating_mul(c.cols()).saturating_mul(k);
        let region = c.region_mut();
        let run = |(j, chunk): (usize, &mut [T])| {
            gemm_column(&mut chunk[..rows], j, transb, k, alpha, &a, &b, beta);
        };
        if work >= PARALLEL_MIN_WORK {
            region.par_chunks_mut(ld).enumerate().for_each(run);
        } else {
            region.chunks_mut(ld).enumerate().for_each(run);
        }
        Ok(())
    }
}

impl Capabilities for SimdBlas {
    fn has(&self, _routine: BlasRoutine) -> bool {
        true
    }
}

impl BlasKernel for SimdBlas {
    fn name(&self) -> &'static str {
        "simd"
    }

    fn f64_kernels(&self) -> &dyn BlasKernels<f64> {
        self
    }

    fn f32_kernels(&self) -> &dyn BlasKernels<f32> {
        self
    }
}
