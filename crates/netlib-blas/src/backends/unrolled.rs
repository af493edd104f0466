//! Loop-unrolled managed backend
//!
//! Unit-stride level 1 kernels and the column-oriented level 2/3 paths run
//! four independent accumulators so the compiler can keep them in vector
//! registers. Strided operands fall through to the reference loops.

use netlib_core::{CandidateError, MatrixView, MatrixViewMut, Real, RuntimeLevel, StridedView, StridedViewMut};

use crate::flags::Transpose;
use crate::kernel::{BlasKernel, BlasKernels, BlasRoutine, Capabilities};
use crate::reference;

const LANES: usize = 4;

pub(crate) fn dot<T: Real>(x: &[T], y: &[T]) -> T {
    let n = x.len().min(y.len());
    let split = n / LANES * LANES;
    let mut acc = [T::zero(); LANES];
    for (xs, ys) in x[..split].chunks_exact(LANES).zip(y[..split].chunks_exact(LANES)) {
        for lane in 0..LANES {
            acc[lane] += xs[lane] * ys[lane];
        }
    }
    let mut sum = (acc[0] + acc[1]) + (acc[2] + acc[3]);
    for k in split..n {
        sum += x[k] * y[k];
    }
    sum
}

pub(crate) fn axpy<T: Real>(alpha: T, x: &[T], y: &mut [T]) {
    let n = x.len().min(y.len());
    let split = n / LANES * LANES;
    for (xs, ys) in x[..split].chunks_exact(LANES).zip(y[..split].chunks_exact_mut(LANES)) {
        ys[0] += alpha * xs[0];
        ys[1] += alpha * xs[1];
        ys[2] += alpha * xs[2];
        ys[3] += alpha * xs[3];
    }
    for k in split..n {
        y[k] += alpha * x[k];
    }
}

pub(crate) fn scal<T: Real>(alpha: T, x: &mut [T]) {
    let split = x.len() / LANES * LANES;
    let (head, tail) = x.split_at_mut(split);
    for xs in head.chunks_exact_mut(LANES) {
        xs[0] *= alpha;
        xs[1] *= alpha;
        xs[2] *= alpha;
        xs[3] *= alpha;
    }
    for value in tail {
        *value *= alpha;
    }
}

pub(crate) fn asum<T: Real>(x: &[T]) -> T {
    let split = x.len() / LANES * LANES;
    let mut acc = [T::zero(); LANES];
    for xs in x[..split].chunks_exact(LANES) {
        for lane in 0..LANES {
            acc[lane] += xs[lane].abs();
        }
    }
    let mut sum = (acc[0] + acc[1]) + (acc[2] + acc[3]);
    for value in &x[split..] {
        sum += value.abs();
    }
    sum
}

/// Column of `c` scaled by `beta`, never reading it when `beta` is zero
pub(crate) fn scale_column<T: Real>(beta: T, column: &mut [T]) {
    if beta == T::zero() {
        column.fill(T::zero());
    } else if beta != T::one() {
        scal(beta, column);
    }
}

/// Scalar unrolled backend, selected from runtime level `Vector`
#[derive(Debug, Clone, Copy)]
pub struct UnrolledBlas {
    _private: (),
}

impl UnrolledBlas {
    pub const REQUIRED_LEVEL: RuntimeLevel = RuntimeLevel::Vector;

    pub fn new(level: RuntimeLevel) -> Result<Self, CandidateError> {
        if level < Self::REQUIRED_LEVEL {
            return Err(CandidateError::RuntimeLevel {
                required: Self::REQUIRED_LEVEL.to_string(),
                detected: level.to_string(),
            });
        }
        Ok(Self { _private: () })
    }
}

impl<T: Real> BlasKernels<T> for UnrolledBlas {
    fn asum(&self, x: StridedView<'_, T>) -> netlib_core::Result<T> {
        Ok(match x.as_contiguous() {
            Some(xs) => asum(xs),
            None => reference::level1::asum(x),
        })
    }

    fn axpy(&self, alpha: T, x: StridedView<'_, T>, mut y: StridedViewMut<'_, T>) -> netlib_core::Result<()> {
        match (x.as_contiguous(), y.as_contiguous_mut()) {
            (Some(xs), Some(ys)) => axpy(alpha, xs, ys),
            _ => reference::level1::axpy(alpha, x, y),
        }
        Ok(())
    }

    fn dot(&self, x: StridedView<'_, T>, y: StridedView<'_, T>) -> netlib_core::Result<T> {
        Ok(match (x.as_contiguous(), y.as_contiguous()) {
            (Some(xs), Some(ys)) => dot(xs, ys),
            _ => reference::level1::dot(x, y),
        })
    }

    fn scal(&self, alpha: T, mut x: StridedViewMut<'_, T>) -> netlib_core::Result<()> {
        match x.as_contiguous_mut() {
            Some(xs) => scal(alpha, xs),
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
        let Some(ys) = y.as_contiguous_mut() else {
            reference::level2::gemv(trans, alpha, a, x, beta, y);
            return Ok(());
        };
        scale_column(beta, ys);
        if alpha == T::zero() {
            return Ok(());
        }
        if trans.is_transposed() {
            // y(j) += alpha · A(:, j)·x
            match x.as_contiguous() {
                Some(xs) => {
                    for (j, yj) in ys.iter_mut().enumerate() {
                        *yj += alpha * dot(a.column(j), xs);
                    }
                }
                None => {
                    for (j, yj) in ys.iter_mut().enumerate() {
                        let column = StridedView::contiguous(a.column(j));
                        *yj += alpha * reference::level1::dot(column, x);
                    }
                }
            }
        } else {
            // y += (alpha · x(j)) · A(:, j)
            for j in 0..a.cols() {
                let scale = alpha * x.get(j);
                if scale != T::zero() {
                    axpy(scale, a.column(j), ys);
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
        if transa.is_transposed() && transb.is_transposed() {
            reference::level3::gemm(transa, transb, k, alpha, a, b, beta, c);
            return Ok(());
        }
        let op_b = |l: usize, j: usize| if transb.is_transposed() { b.get(j, l) } else { b.get(l, j) };
        for j in 0..c.cols() {
            let column = c.column_mut(j);
            scale_column(beta, column);
            if alpha == T::zero() {
                continue;
            }
            if transa.is_transposed() {
                // C(i, j) += alpha · A(:, i)·B(:, j)
                let bj = b.column(j);
                for (i, cij) in column.iter_mut().enumerate() {
                    *cij += alpha * dot(a.column(i), bj);
                }
            } else {
                // C(:, j) += (alpha · op(B)(l, j)) · A(:, l)
                for l in 0..k {
                    let scale = alpha * op_b(l, j);
                    if scale != T::zero() {
                        axpy(scale, a.column(l), column);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Capabilities for UnrolledBlas {
    fn has(&self, _routine: BlasRoutine) -> bool {
        true
    }
}

impl BlasKernel for UnrolledBlas {
    fn name(&self) -> &'static str {
        "unrolled"
    }

    fn f64_kernels(&self) -> &dyn BlasKernels<f64> {
        self
    }

    fn f32_kernels(&self) -> &dyn BlasKernels<f32> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_baseline_level() {
        assert!(matches!(
            UnrolledBlas::new(RuntimeLevel::Baseline),
            Err(CandidateError::RuntimeLevel { .. })
        ));
        assert!(UnrolledBlas::new(RuntimeLevel::Simd).is_ok());
    }

    #[test]
    fn unrolled_helpers_cover_tail() {
        let x: Vec<f64> = (1..=7).map(f64::from).collect();
        let y = vec![1.0; 7];
        assert_eq!(dot(&x, &y), 28.0);
        assert_eq!(asum(&[-1.0, 2.0, -3.0, 4.0, -5.0]), 15.0);

        let mut z = vec![1.0; 7];
        axpy(2.0, &x, &mut z);
        assert_eq!(z, vec![3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0]);
    }

    #[test]
    fn scale_column_with_zero_beta_clears_nan() {
        let mut column = [f64::NAN, 1.0];
        scale_column(0.0, &mut column);
        assert_eq!(column, [0.0, 0.0]);
    }
}
