//! Sparse level 1: compressed vectors against dense ones
//!
//! A compressed vector is a pair `(x, indx)` of equal length where `x[i]` is
//! the value at dense position `indx[i]`. Indices are 0-based from the start
//! of the dense window and were checked against it by the facade, so every
//! `indx[i] as usize` below is in range.

use std::collections::BTreeMap;

use netlib_core::Real;

/// `y[indx[i]] += alpha·x[i]`
pub fn axpyi<T: Real>(alpha: T, x: &[T], indx: &[i32], y: &mut [T]) {
    for (&value, &index) in x.iter().zip(indx) {
        y[index as usize] += alpha * value;
    }
}

/// `Σ x[i]·y[indx[i]]`
pub fn doti<T: Real>(x: &[T], indx: &[i32], y: &[T]) -> T {
    x.iter().zip(indx).map(|(&value, &index)| value * y[index as usize]).sum()
}

/// Dot product of two compressed vectors.
///
/// Every pair with `indx[i] == indy[j]` contributes `x[i]·y[j]`, which is the
/// dense dot product of the two vectors with repeated indices summed.
pub fn dotii<T: Real>(x: &[T], indx: &[i32], y: &[T], indy: &[i32]) -> T {
    let mut dense_y: BTreeMap<i32, T> = BTreeMap::new();
    for (&value, &index) in y.iter().zip(indy) {
        *dense_y.entry(index).or_insert_with(T::zero) += value;
    }
    x.iter()
        .zip(indx)
        .filter_map(|(&value, index)| dense_y.get(index).map(|&other| value * other))
        .sum()
}

/// Scatter: `y[indx[i]] = x[i]`, later entries winning on repeated indices
pub fn copyi<T: Real>(x: &[T], indx: &[i32], y: &mut [T]) {
    for (&value, &index) in x.iter().zip(indx) {
        y[index as usize] = value;
    }
}

/// Position of `(row, col)` of a symmetric matrix in order-free packed storage.
///
/// Upper is the upper triangle by columns; lower is the lower triangle by
/// rows. Neither depends on the order of the matrix, and for a symmetric
/// element both land on the same position.
#[inline(always)]
pub(crate) fn packed_position(upper: bool, row: usize, col: usize) -> usize {
    let (row, col) = if upper { (row.min(col), row.max(col)) } else { (row.max(col), row.min(col)) };
    if upper {
        row + col * (col + 1) / 2
    } else {
        col + row * (row + 1) / 2
    }
}

/// Packed symmetric rank-1 update `A += alpha·x·xᵀ` with a compressed `x`.
///
/// Each ordered pair `(i, j)` whose indices fall in the stored triangle is
/// applied once, so repeated indices update `A` as their dense sum would.
pub fn spri<T: Real>(upper: bool, alpha: T, x: &[T], indx: &[i32], ap: &mut [T]) {
    for (&xi, &row) in x.iter().zip(indx) {
        let temp = alpha * xi;
        for (&xj, &col) in x.iter().zip(indx) {
            let (row, col) = (row as usize, col as usize);
            let stored = if upper { row <= col } else { row >= col };
            if stored {
                ap[packed_position(upper, row, col)] += temp * xj;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axpyi_accumulates_repeated_indices() {
        let mut y = [1.0, 1.0, 1.0, 1.0];
        axpyi(2.0, &[1.0, 3.0, 5.0], &[3, 0, 3], &mut y);
        assert_eq!(y, [7.0, 1.0, 1.0, 13.0]);
    }

    #[test]
    fn dotii_matches_the_dense_product() {
        // x = [0, 2, 0, 1], y = [5, 4, 0, 3] once repeated indices are summed
        let x = [1.0_f64, 2.0];
        let y = [3.0, 4.0, 5.0];
        assert_eq!(dotii(&x, &[3, 1], &y, &[3, 1, 0]), 1.0 * 3.0 + 2.0 * 4.0);
        assert_eq!(dotii(&x, &[2, 2], &y, &[0, 1, 3]), 0.0);
        assert_eq!(dotii(&[1.0_f32], &[0], &[2.0, 3.0], &[0, 0]), 5.0);
    }

    #[test]
    fn packed_positions_are_order_free() {
        // upper by columns: (0,0) (0,1) (1,1) (0,2) (1,2) (2,2)
        assert_eq!(packed_position(true, 1, 2), 4);
        assert_eq!(packed_position(true, 2, 1), 4);
        // lower by rows: (0,0) (1,0) (1,1) (2,0) (2,1) (2,2)
        assert_eq!(packed_position(false, 2, 1), 4);
        assert_eq!(packed_position(false, 2, 2), 5);
    }

    #[test]
    fn spri_matches_the_dense_update() {
        // x = [0, 2, 0, 1] compressed out of order
        let x = [1.0, 2.0];
        let indx = [3, 1];
        let mut ap = [0.0; 10];
        spri(true, 1.0, &x, &indx, &mut ap);
        let mut expected = [0.0; 10];
        expected[packed_position(true, 1, 1)] = 4.0;
        expected[packed_position(true, 1, 3)] = 2.0;
        expected[packed_position(true, 3, 3)] = 1.0;
        assert_eq!(ap, expected);

        let mut lower = [0.0; 10];
        spri(false, 1.0, &x, &indx, &mut lower);
        assert_eq!(lower, expected);
    }

    #[test]
    fn spri_repeated_index_squares_the_sum() {
        let mut ap = [0.0; 1];
        spri(true, 1.0, &[1.0, 2.0], &[0, 0], &mut ap);
        assert_eq!(ap, [9.0]);
    }
}
