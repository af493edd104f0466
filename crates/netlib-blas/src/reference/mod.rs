//! Portable reference kernels
//!
//! Straight renditions of the reference BLAS loops over validated views.
//! They are the provided methods of [`BlasKernels`](crate::kernel::BlasKernels),
//! so every managed backend inherits them and overrides only what it
//! accelerates.

pub mod level1;
pub mod level2;
pub mod level3;
pub mod sparse;

use netlib_core::{Real, StridedViewMut};

/// Position of element `(i, j)` of the stored triangle in packed storage
#[inline(always)]
pub(crate) fn packed_index(upper: bool, n: usize, i: usize, j: usize) -> usize {
    if upper {
        i + j * (j + 1) / 2
    } else {
        i + j * (2 * n - j - 1) / 2
    }
}

/// Triangular storage shape consumed by [`tri_mv`] and [`tri_sv`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct Triangle {
    pub upper: bool,
    pub trans: bool,
    pub unit: bool,
    pub n: usize,
    /// Number of off-diagonals for band storage
    pub band: Option<usize>,
}

impl Triangle {
    /// Whether `op(A)` is upper triangular
    #[inline(always)]
    fn op_upper(&self) -> bool {
        self.upper != self.trans
    }

    /// Column range of row `i` of `op(A)` excluding the diagonal
    #[inline(always)]
    fn off_diagonal(&self, i: usize) -> std::ops::Range<usize> {
        let k = self.band.unwrap_or(self.n);
        if self.op_upper() {
            i + 1..self.n.min(i.saturating_add(k).saturating_add(1))
        } else {
            i.saturating_sub(k)..i
        }
    }

    /// Element `(i, j)` of `op(A)` read through the stored triangle accessor
    #[inline(always)]
    fn op<T: Real>(&self, at: &impl Fn(usize, usize) -> T, i: usize, j: usize) -> T {
        if self.trans {
            at(j, i)
        } else {
            at(i, j)
        }
    }
}

/// `x := op(A)·x` for a triangular `A` given by its stored-triangle accessor
pub(crate) fn tri_mv<T: Real>(shape: Triangle, at: impl Fn(usize, usize) -> T, mut x: StridedViewMut<'_, T>) {
    let n = shape.n;
    let mut update = |i: usize| {
        let mut sum = if shape.unit { x.get(i) } else { shape.op(&at, i, i) * x.get(i) };
        for j in shape.off_diagonal(i) {
            sum += shape.op(&at, i, j) * x.get(j);
        }
        x.set(i, sum);
    };
    // Overwrite rows in the order that leaves unread entries intact
    if shape.op_upper() {
        (0..n).for_each(&mut update);
    } else {
        (0..n).rev().for_each(&mut update);
    }
}

/// Solve `op(A)·x = b` in place, `b` given in `x`
pub(crate) fn tri_sv<T: Real>(shape: Triangle, at: impl Fn(usize, usize) -> T, mut x: StridedViewMut<'_, T>) {
    let n = shape.n;
    let mut solve = |i: usize| {
        let mut value = x.get(i);
        for j in shape.off_diagonal(i) {
            value -= shape.op(&at, i, j) * x.get(j);
        }
        if !shape.unit {
            value /= shape.op(&at, i, i);
        }
        x.set(i, value);
    };
    if shape.op_upper() {
        (0..n).rev().for_each(&mut solve);
    } else {
        (0..n).for_each(&mut solve);
    }
}

/// Symmetric element `(i, j)` read from the stored triangle
#[inline(always)]
pub(crate) fn symmetric<T>(upper: bool, at: impl Fn(usize, usize) -> T) -> impl Fn(usize, usize) -> T {
    move |i, j| {
        if (i <= j) == upper {
            at(i, j)
        } else {
            at(j, i)
        }
    }
}
