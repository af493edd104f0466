//! Level 3: matrix-matrix operations

use netlib_core::{MatrixView, MatrixViewMut, Real};

use super::{symmetric, tri_mv, tri_sv, Triangle};
use crate::flags::{Diag, Side, Transpose, Uplo};

/// `op(X)(i, j)` for a stored operand
#[inline(always)]
fn op<T: Real>(x: &MatrixView<'_, T>, trans: Transpose, i: usize, j: usize) -> T {
    if trans.is_transposed() {
        x.get(j, i)
    } else {
        x.get(i, j)
    }
}

/// `c(i, j) := alpha·value + beta·c(i, j)`, without reading `c` when `beta` is zero
#[inline(always)]
fn update<T: Real>(c: &mut MatrixViewMut<'_, T>, i: usize, j: usize, alpha: T, value: T, beta: T) {
    let scaled = alpha * value;
    let result = if beta == T::zero() { scaled } else { scaled + beta * c.get(i, j) };
    c.set(i, j, result);
}

#[allow(clippy::too_many_arguments)]
pub fn gemm<T: Real>(
    transa: Transpose,
    transb: Transpose,
    k: usize,
    alpha: T,
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    beta: T,
    mut c: MatrixViewMut<'_, T>,
) {
    for j in 0..c.cols() {
        for i in 0..c.rows() {
            let mut sum = T::zero();
            if alpha != T::zero() {
                for l in 0..k {
                    sum += op(&a, transa, i, l) * op(&b, transb, l, j);
                }
            }
            update(&mut c, i, j, alpha, sum, beta);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn symm<T: Real>(
    side: Side,
    uplo: Uplo,
    alpha: T,
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    beta: T,
    mut c: MatrixViewMut<'_, T>,
) {
    let sym = symmetric(uplo.is_upper(), |i, j| a.get(i, j));
    let (m, n) = (c.rows(), c.cols());
    for j in 0..n {
        for i in 0..m {
            let mut sum = T::zero();
            if alpha != T::zero() {
                if side.is_left() {
                    for l in 0..m {
                        sum += sym(i, l) * b.get(l, j);
                    }
                } else {
                    for l in 0..n {
                        sum += b.get(i, l) * sym(l, j);
                    }
                }
            }
            update(&mut c, i, j, alpha, sum, beta);
        }
    }
}

/// Visit the stored triangle of an `n x n` matrix
fn for_triangle(upper: bool, n: usize, mut visit: impl FnMut(usize, usize)) {
    for j in 0..n {
        let rows = if upper { 0..j + 1 } else { j..n };
        for i in rows {
            visit(i, j);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn syrk<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    k: usize,
    alpha: T,
    a: MatrixView<'_, T>,
    beta: T,
    mut c: MatrixViewMut<'_, T>,
) {
    let n = c.rows();
    for_triangle(uplo.is_upper(), n, |i, j| {
        let mut sum = T::zero();
        if alpha != T::zero() {
            for l in 0..k {
                sum += op(&a, trans, i, l) * op(&a, trans, j, l);
            }
        }
        update(&mut c, i, j, alpha, sum, beta);
    });
}

#[allow(clippy::too_many_arguments)]
pub fn syr2k<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    k: usize,
    alpha: T,
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    beta: T,
    mut c: MatrixViewMut<'_, T>,
) {
    let n = c.rows();
    for_triangle(uplo.is_upper(), n, |i, j| {
        let mut sum = T::zero();
        if alpha != T::zero() {
            for l in 0..k {
                sum += op(&a, trans, i, l) * op(&b, trans, j, l) + op(&b, trans, i, l) * op(&a, trans, j, l);
            }
        }
        update(&mut c, i, j, alpha, sum, beta);
    });
}

/// Zero or scale every element of `b` by `alpha`
fn scale_all<T: Real>(alpha: T, b: &mut MatrixViewMut<'_, T>) {
    if alpha == T::one() {
        return;
    }
    for j in 0..b.cols() {
        for value in b.column_mut(j) {
            *value = if alpha == T::zero() { T::zero() } else { alpha * *value };
        }
    }
}

/// Triangular operand of `trmm`/`trsm` applied to each column (left) or row (right) of `B`.
///
/// `B·op(A)` is handled row by row as `op(A)ᵀ·rowᵀ`, hence the flipped transpose.
fn triangular_sweep<T: Real>(
    side: Side,
    uplo: Uplo,
    transa: Transpose,
    diag: Diag,
    a: MatrixView<'_, T>,
    b: &mut MatrixViewMut<'_, T>,
    solve: bool,
) {
    let left = side.is_left();
    let shape = Triangle {
        upper: uplo.is_upper(),
        trans: if left { transa.is_transposed() } else { !transa.is_transposed() },
        unit: diag.is_unit(),
        n: a.rows(),
        band: None,
    };
    let at = |i: usize, j: usize| a.get(i, j);
    let count = if left { b.cols() } else { b.rows() };
    for idx in 0..count {
        let vector = if left { b.column_view_mut(idx) } else { b.row_view_mut(idx) };
        if solve {
            tri_sv(shape, at, vector);
        } else {
            tri_mv(shape, at, vector);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn trmm<T: Real>(
    side: Side,
    uplo: Uplo,
    transa: Transpose,
    diag: Diag,
    alpha: T,
    a: MatrixView<'_, T>,
    mut b: MatrixViewMut<'_, T>,
) {
    if alpha != T::zero() {
        triangular_sweep(side, uplo, transa, diag, a, &mut b, false);
    }
    scale_all(alpha, &mut b);
}

#[allow(clippy::too_many_arguments)]
pub fn trsm<T: Real>(
    side: Side,
    uplo: Uplo,
    transa: Transpose,
    diag: Diag,
    alpha: T,
    a: MatrixView<'_, T>,
    mut b: MatrixViewMut<'_, T>,
) {
    scale_all(alpha, &mut b);
    if alpha != T::zero() {
        triangular_sweep(side, uplo, transa, diag, a, &mut b, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemm_with_transposes() {
        // A = [[1 2] [3 4]], B = [[5 6] [7 8]] column-major
        let a = [1.0, 3.0, 2.0, 4.0];
        let b = [5.0, 7.0, 6.0, 8.0];
        let av = MatrixView::new(&a, 0, 2, 2, 2).unwrap();
        let bv = MatrixView::new(&b, 0, 2, 2, 2).unwrap();

        let mut c = [0.0; 4];
        gemm(Transpose::No, Transpose::No, 2, 1.0, av, bv, 0.0, MatrixViewMut::new(&mut c, 0, 2, 2, 2).unwrap());
        assert_eq!(c, [19.0, 43.0, 22.0, 50.0]);

        let mut c = [1.0; 4];
        gemm(Transpose::Yes, Transpose::No, 2, 1.0, av, bv, 1.0, MatrixViewMut::new(&mut c, 0, 2, 2, 2).unwrap());
        // AᵀB = [[26 30] [38 44]]
        assert_eq!(c, [27.0, 39.0, 31.0, 45.0]);
    }

    #[test]
    fn gemm_beta_zero_ignores_nan_output() {
        let a = [1.0];
        let b = [2.0];
        let mut c = [f64::NAN];
        gemm(
            Transpose::No,
            Transpose::No,
            1,
            1.0,
            MatrixView::new(&a, 0, 1, 1, 1).unwrap(),
            MatrixView::new(&b, 0, 1, 1, 1).unwrap(),
            0.0,
            MatrixViewMut::new(&mut c, 0, 1, 1, 1).unwrap(),
        );
        assert_eq!(c, [2.0]);
    }

    #[test]
    fn trsm_right_undoes_trmm_right() {
        // Upper A = [[2 1] [0 4]]
        let a = [2.0_f64, 0.0, 1.0, 4.0];
        let av = MatrixView::new(&a, 0, 2, 2, 2).unwrap();
        let original = [1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut b = original;
        for transa in [Transpose::No, Transpose::Yes] {
            trmm(
                Side::Right,
                Uplo::Upper,
                transa,
                Diag::NonUnit,
                2.0,
                av,
                MatrixViewMut::new(&mut b, 0, 3, 2, 3).unwrap(),
            );
            trsm(
                Side::Right,
                Uplo::Upper,
                transa,
                Diag::NonUnit,
                0.5,
                av,
                MatrixViewMut::new(&mut b, 0, 3, 2, 3).unwrap(),
            );
            for (got, want) in b.iter().zip(original) {
                assert!((got - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn trmm_left_matches_gemm() {
        // Lower A = [[1 0] [2 3]], B = [[1 2] [3 4]]
        let a = [1.0, 2.0, 0.0, 3.0];
        let mut b = [1.0, 3.0, 2.0, 4.0];
        trmm(
            Side::Left,
            Uplo::Lower,
            Transpose::No,
            Diag::NonUnit,
            1.0,
            MatrixView::new(&a, 0, 2, 2, 2).unwrap(),
            MatrixViewMut::new(&mut b, 0, 2, 2, 2).unwrap(),
        );
        assert_eq!(b, [1.0, 11.0, 2.0, 16.0]);
    }

    #[test]
    fn syrk_fills_requested_triangle() {
        // A = [[1 2] [3 4]]; A·Aᵀ = [[5 11] [11 25]]
        let a = [1.0, 3.0, 2.0, 4.0];
        let mut c = [0.0; 4];
        syrk(
            Uplo::Upper,
            Transpose::No,
            2,
            1.0,
            MatrixView::new(&a, 0, 2, 2, 2).unwrap(),
            0.0,
            MatrixViewMut::new(&mut c, 0, 2, 2, 2).unwrap(),
        );
        assert_eq!(c, [5.0, 0.0, 11.0, 25.0]);
    }
}
