//! Level 2: matrix-vector operations

use netlib_core::{MatrixView, MatrixViewMut, Real, StridedView, StridedViewMut};

use super::{packed_index, symmetric, tri_mv, tri_sv, Triangle};
use crate::flags::{Diag, Transpose, Uplo};

/// `y := beta·y`, without reading `y` when `beta` is zero
fn scale_output<T: Real>(beta: T, y: &mut StridedViewMut<'_, T>) {
    if beta == T::one() {
        return;
    }
    for k in 0..y.len() {
        let value = if beta == T::zero() { T::zero() } else { beta * y.get(k) };
        y.set(k, value);
    }
}

/// `y := alpha·M·x + beta·y` for an `rows x cols` operator given elementwise.
///
/// Entries for which `at` returns `None` are structural zeros and skipped.
#[allow(clippy::too_many_arguments)]
fn general_mv<T: Real>(
    rows: usize,
    cols: usize,
    at: impl Fn(usize, usize) -> Option<T>,
    alpha: T,
    x: StridedView<'_, T>,
    beta: T,
    mut y: StridedViewMut<'_, T>,
) {
    scale_output(beta, &mut y);
    if alpha == T::zero() {
        return;
    }
    for i in 0..rows {
        let mut sum = T::zero();
        for j in 0..cols {
            if let Some(value) = at(i, j) {
                sum += value * x.get(j);
            }
        }
        *y.get_mut(i) += alpha * sum;
    }
}

pub fn gemv<T: Real>(
    trans: Transpose,
    alpha: T,
    a: MatrixView<'_, T>,
    x: StridedView<'_, T>,
    beta: T,
    y: StridedViewMut<'_, T>,
) {
    let (m, n) = (a.rows(), a.cols());
    if trans.is_transposed() {
        general_mv(n, m, |i, j| Some(a.get(j, i)), alpha, x, beta, y);
    } else {
        general_mv(m, n, |i, j| Some(a.get(i, j)), alpha, x, beta, y);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn gbmv<T: Real>(
    trans: Transpose,
    m: usize,
    kl: usize,
    ku: usize,
    alpha: T,
    a: MatrixView<'_, T>,
    x: StridedView<'_, T>,
    beta: T,
    y: StridedViewMut<'_, T>,
) {
    let n = a.cols();
    // Element (i, j) of the m x n band matrix sits in row ku + i - j of column j
    let band = move |i: usize, j: usize| {
        (i + ku >= j && i <= j + kl).then(|| a.get(ku + i - j, j))
    };
    if trans.is_transposed() {
        general_mv(n, m, |i, j| band(j, i), alpha, x, beta, y);
    } else {
        general_mv(m, n, band, alpha, x, beta, y);
    }
}

pub fn ger<T: Real>(alpha: T, x: StridedView<'_, T>, y: StridedView<'_, T>, mut a: MatrixViewMut<'_, T>) {
    for j in 0..a.cols() {
        let temp = alpha * y.get(j);
        if temp == T::zero() {
            continue;
        }
        for i in 0..a.rows() {
            *a.get_mut(i, j) += x.get(i) * temp;
        }
    }
}

pub fn symv<T: Real>(
    uplo: Uplo,
    alpha: T,
    a: MatrixView<'_, T>,
    x: StridedView<'_, T>,
    beta: T,
    y: StridedViewMut<'_, T>,
) {
    let n = a.rows();
    let sym = symmetric(uplo.is_upper(), |i, j| a.get(i, j));
    general_mv(n, n, |i, j| Some(sym(i, j)), alpha, x, beta, y);
}

#[allow(clippy::too_many_arguments)]
pub fn sbmv<T: Real>(
    uplo: Uplo,
    k: usize,
    alpha: T,
    a: MatrixView<'_, T>,
    x: StridedView<'_, T>,
    beta: T,
    y: StridedViewMut<'_, T>,
) {
    let n = a.cols();
    let upper = uplo.is_upper();
    let stored = |i: usize, j: usize| {
        if upper {
            a.get(k + i - j, j)
        } else {
            a.get(i - j, j)
        }
    };
    let sym = symmetric(upper, stored);
    general_mv(n, n, |i, j| (i.abs_diff(j) <= k).then(|| sym(i, j)), alpha, x, beta, y);
}

#[allow(clippy::too_many_arguments)]
pub fn spmv<T: Real>(
    uplo: Uplo,
    n: usize,
    alpha: T,
    ap: StridedView<'_, T>,
    x: StridedView<'_, T>,
    beta: T,
    y: StridedViewMut<'_, T>,
) {
    let upper = uplo.is_upper();
    let sym = symmetric(upper, |i, j| ap.get(packed_index(upper, n, i, j)));
    general_mv(n, n, |i, j| Some(sym(i, j)), alpha, x, beta, y);
}

/// Visit `(i, j)` for every stored-triangle entry of an `n x n` symmetric matrix
fn for_triangle(upper: bool, n: usize, mut visit: impl FnMut(usize, usize)) {
    for j in 0..n {
        let rows = if upper { 0..j + 1 } else { j..n };
        for i in rows {
            visit(i, j);
        }
    }
}

pub fn spr<T: Real>(uplo: Uplo, n: usize, alpha: T, x: StridedView<'_, T>, mut ap: StridedViewMut<'_, T>) {
    let upper = uplo.is_upper();
    for_triangle(upper, n, |i, j| {
        *ap.get_mut(packed_index(upper, n, i, j)) += alpha * x.get(i) * x.get(j);
    });
}

pub fn spr2<T: Real>(
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: StridedView<'_, T>,
    y: StridedView<'_, T>,
    mut ap: StridedViewMut<'_, T>,
) {
    let upper = uplo.is_upper();
    for_triangle(upper, n, |i, j| {
        *ap.get_mut(packed_index(upper, n, i, j)) += alpha * (x.get(i) * y.get(j) + y.get(i) * x.get(j));
    });
}

pub fn syr<T: Real>(uplo: Uplo, alpha: T, x: StridedView<'_, T>, mut a: MatrixViewMut<'_, T>) {
    let n = a.rows();
    for_triangle(uplo.is_upper(), n, |i, j| {
        *a.get_mut(i, j) += alpha * x.get(i) * x.get(j);
    });
}

pub fn syr2<T: Real>(
    uplo: Uplo,
    alpha: T,
    x: StridedView<'_, T>,
    y: StridedView<'_, T>,
    mut a: MatrixViewMut<'_, T>,
) {
    let n = a.rows();
    for_triangle(uplo.is_upper(), n, |i, j| {
        *a.get_mut(i, j) += alpha * (x.get(i) * y.get(j) + y.get(i) * x.get(j));
    });
}

fn triangle(uplo: Uplo, trans: Transpose, diag: Diag, n: usize, band: Option<usize>) -> Triangle {
    Triangle {
        upper: uplo.is_upper(),
        trans: trans.is_transposed(),
        unit: diag.is_unit(),
        n,
        band,
    }
}

/// Accessor for triangular band storage with `k` off-diagonals
fn band_at<'a, T: Real>(uplo: Uplo, k: usize, a: MatrixView<'a, T>) -> impl Fn(usize, usize) -> T + 'a {
    let upper = uplo.is_upper();
    move |i, j| {
        if upper {
            a.get(k + i - j, j)
        } else {
            a.get(i - j, j)
        }
    }
}

pub fn trmv<T: Real>(uplo: Uplo, trans: Transpose, diag: Diag, a: MatrixView<'_, T>, x: StridedViewMut<'_, T>) {
    tri_mv(triangle(uplo, trans, diag, a.rows(), None), |i, j| a.get(i, j), x);
}

pub fn trsv<T: Real>(uplo: Uplo, trans: Transpose, diag: Diag, a: MatrixView<'_, T>, x: StridedViewMut<'_, T>) {
    tri_sv(triangle(uplo, trans, diag, a.rows(), None), |i, j| a.get(i, j), x);
}

pub fn tbmv<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    k: usize,
    a: MatrixView<'_, T>,
    x: StridedViewMut<'_, T>,
) {
    tri_mv(triangle(uplo, trans, diag, a.cols(), Some(k)), band_at(uplo, k, a), x);
}

pub fn tbsv<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    k: usize,
    a: MatrixView<'_, T>,
    x: StridedViewMut<'_, T>,
) {
    tri_sv(triangle(uplo, trans, diag, a.cols(), Some(k)), band_at(uplo, k, a), x);
}

pub fn tpmv<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: StridedView<'_, T>,
    x: StridedViewMut<'_, T>,
) {
    let upper = uplo.is_upper();
    tri_mv(triangle(uplo, trans, diag, n, None), |i, j| ap.get(packed_index(upper, n, i, j)), x);
}

pub fn tpsv<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: StridedView<'_, T>,
    x: StridedViewMut<'_, T>,
) {
    let upper = uplo.is_upper();
    tri_sv(triangle(uplo, trans, diag, n, None), |i, j| ap.get(packed_index(upper, n, i, j)), x);
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3 x 3 column-major [[1 2 0] [3 4 5] [0 6 7]]
    const DENSE: [f64; 9] = [1.0, 3.0, 0.0, 2.0, 4.0, 6.0, 0.0, 5.0, 7.0];

    #[test]
    fn gemv_both_orientations() {
        let a = MatrixView::new(&DENSE, 0, 3, 3, 3).unwrap();
        let x = [1.0, 1.0, 1.0];
        let mut y = [1.0; 3];
        gemv(Transpose::No, 1.0, a, StridedView::contiguous(&x), 2.0, StridedViewMut::contiguous(&mut y));
        assert_eq!(y, [5.0, 14.0, 15.0]);

        let mut y = [f64::NAN; 3];
        gemv(Transpose::Yes, 1.0, a, StridedView::contiguous(&x), 0.0, StridedViewMut::contiguous(&mut y));
        assert_eq!(y, [4.0, 12.0, 12.0]);
    }

    #[test]
    fn gbmv_matches_dense_tridiagonal() {
        // The dense matrix above is tridiagonal: kl = ku = 1, band rows [super, diag, sub]
        let band = [0.0, 1.0, 3.0, 2.0, 4.0, 6.0, 5.0, 7.0, 0.0];
        let a = MatrixView::new(&band, 0, 3, 3, 3).unwrap();
        let x = [1.0, 2.0, 3.0];
        for trans in [Transpose::No, Transpose::Yes] {
            let mut banded = [0.0; 3];
            let mut dense = [0.0; 3];
            gbmv(trans, 3, 1, 1, 1.0, a, StridedView::contiguous(&x), 0.0, StridedViewMut::contiguous(&mut banded));
            let full = MatrixView::new(&DENSE, 0, 3, 3, 3).unwrap();
            gemv(trans, 1.0, full, StridedView::contiguous(&x), 0.0, StridedViewMut::contiguous(&mut dense));
            assert_eq!(banded, dense);
        }
    }

    #[test]
    fn packed_and_full_symmetric_agree() {
        // Upper triangle of [[2 1 0] [1 3 4] [0 4 5]]
        let full = [2.0, 0.0, 0.0, 1.0, 3.0, 0.0, 0.0, 4.0, 5.0];
        let packed = [2.0, 1.0, 3.0, 0.0, 4.0, 5.0];
        let x = [1.0, -1.0, 2.0];
        let mut from_full = [0.0; 3];
        let mut from_packed = [0.0; 3];
        symv(
            Uplo::Upper,
            1.0,
            MatrixView::new(&full, 0, 3, 3, 3).unwrap(),
            StridedView::contiguous(&x),
            0.0,
            StridedViewMut::contiguous(&mut from_full),
        );
        spmv(
            Uplo::Upper,
            3,
            1.0,
            StridedView::contiguous(&packed),
            StridedView::contiguous(&x),
            0.0,
            StridedViewMut::contiguous(&mut from_packed),
        );
        assert_eq!(from_full, [1.0, 6.0, 6.0]);
        assert_eq!(from_full, from_packed);
    }

    #[test]
    fn syr_touches_only_stored_triangle() {
        let mut a = [0.0; 4];
        let x = [1.0, 2.0];
        syr(Uplo::Lower, 1.0, StridedView::contiguous(&x), MatrixViewMut::new(&mut a, 0, 2, 2, 2).unwrap());
        assert_eq!(a, [1.0, 2.0, 0.0, 4.0]);
    }

    #[test]
    fn lower_band_solve_inverts_multiply() {
        // Lower bidiagonal [[2 0 0] [1 3 0] [0 1 4]] in band storage, k = 1
        let band = [2.0, 1.0, 3.0, 1.0, 4.0, 0.0];
        let a = MatrixView::new(&band, 0, 2, 3, 2).unwrap();
        let mut x = [1.0, 2.0, 3.0];
        tbmv(Uplo::Lower, Transpose::No, Diag::NonUnit, 1, a, StridedViewMut::contiguous(&mut x));
        assert_eq!(x, [2.0, 7.0, 14.0]);
        tbsv(Uplo::Lower, Transpose::No, Diag::NonUnit, 1, a, StridedViewMut::contiguous(&mut x));
        assert_eq!(x, [1.0, 2.0, 3.0]);
    }
}
