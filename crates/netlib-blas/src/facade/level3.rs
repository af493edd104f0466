//! Level 3 entry points

#![allow(clippy::too_many_arguments)]

use netlib_core::validate::{require_if, require_mut_if};
use netlib_core::{Contract, MatrixView, MatrixViewMut, Result};

use super::Blas;
use crate::flags::{Diag, Side, Transpose, Uplo};
use crate::kernel::BlasElement;

/// Stored shape of an operand whose `op()` is `rows x cols`
#[inline]
fn stored_shape(trans: Transpose, rows: usize, cols: usize) -> (usize, usize) {
    if trans.is_transposed() {
        (cols, rows)
    } else {
        (rows, cols)
    }
}

impl Blas {
    /// `C := alpha·op(A)·op(B) + beta·C`
    pub fn gemm<T: BlasElement>(
        &self,
        transa: &str,
        transb: &str,
        m: i32,
        n: i32,
        k: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        b: &[T],
        ldb: i32,
        beta: T,
        c: &mut [T],
        ldc: i32,
    ) -> Result<()> {
        self.gemm_at(transa, transb, m, n, k, alpha, Some(a), 0, lda, Some(b), 0, ldb, beta, Some(c), 0, ldc)
    }

    pub fn gemm_at<T: BlasElement>(
        &self,
        transa: &str,
        transb: &str,
        m: i32,
        n: i32,
        k: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        b: Option<&[T]>,
        offb: usize,
        ldb: i32,
        beta: T,
        c: Option<&mut [T]>,
        offc: usize,
        ldc: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("GEMM"));
        let transa = contract.flag(1, Transpose::parse(transa))?;
        let transb = contract.flag(2, Transpose::parse(transb))?;
        let m = contract.dimension(3, m)?;
        let n = contract.dimension(4, n)?;
        let k = contract.dimension(5, k)?;
        let (rowsa, colsa) = stored_shape(transa, m, k);
        let (rowsb, colsb) = stored_shape(transb, k, n);
        let lda = contract.leading(8, lda, rowsa.max(1))?;
        let ldb = contract.leading(10, ldb, rowsb.max(1))?;
        let ldc = contract.leading(13, ldc, m.max(1))?;

        let touched = m > 0 && n > 0;
        let a = require_if(touched && k > 0, "a", a)?;
        let b = require_if(touched && k > 0, "b", b)?;
        let c = require_mut_if(touched, "c", c)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, rowsa, colsa, lda)?;
        let b = MatrixView::new(b, offb, rowsb, colsb, ldb)?;
        let c = MatrixViewMut::new(c, offc, m, n, ldc)?;
        if (alpha == T::zero() || k == 0) && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().gemm(transa, transb, k, alpha, a, b, beta, c)
    }

    /// `C := alpha·A·B + beta·C` (left) or `C := alpha·B·A + beta·C` (right), `A` symmetric
    pub fn symm<T: BlasElement>(
        &self,
        side: &str,
        uplo: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        b: &[T],
        ldb: i32,
        beta: T,
        c: &mut [T],
        ldc: i32,
    ) -> Result<()> {
        self.symm_at(side, uplo, m, n, alpha, Some(a), 0, lda, Some(b), 0, ldb, beta, Some(c), 0, ldc)
    }

    pub fn symm_at<T: BlasElement>(
        &self,
        side: &str,
        uplo: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        b: Option<&[T]>,
        offb: usize,
        ldb: i32,
        beta: T,
        c: Option<&mut [T]>,
        offc: usize,
        ldc: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SYMM"));
        let side = contract.flag(1, Side::parse(side))?;
        let uplo = contract.flag(2, Uplo::parse(uplo))?;
        let m = contract.dimension(3, m)?;
        let n = contract.dimension(4, n)?;
        let order = if side.is_left() { m } else { n };
        let lda = contract.leading(7, lda, order.max(1))?;
        let ldb = contract.leading(9, ldb, m.max(1))?;
        let ldc = contract.leading(12, ldc, m.max(1))?;

        let touched = m > 0 && n > 0;
        let a = require_if(touched, "a", a)?;
        let b = require_if(touched, "b", b)?;
        let c = require_mut_if(touched, "c", c)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, order, order, lda)?;
        let b = MatrixView::new(b, offb, m, n, ldb)?;
        let c = MatrixViewMut::new(c, offc, m, n, ldc)?;
        if alpha == T::zero() && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().symm(side, uplo, alpha, a, b, beta, c)
    }

    /// Symmetric rank-k update `C := alpha·op(A)·op(A)ᵀ + beta·C`
    pub fn syrk<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        n: i32,
        k: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        beta: T,
        c: &mut [T],
        ldc: i32,
    ) -> Result<()> {
        self.syrk_at(uplo, trans, n, k, alpha, Some(a), 0, lda, beta, Some(c), 0, ldc)
    }

    pub fn syrk_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        n: i32,
        k: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        beta: T,
        c: Option<&mut [T]>,
        offc: usize,
        ldc: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SYRK"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let trans = contract.flag(2, Transpose::parse(trans))?;
        let n = contract.dimension(3, n)?;
        let k = contract.dimension(4, k)?;
        let (rowsa, colsa) = stored_shape(trans, n, k);
        let lda = contract.leading(7, lda, rowsa.max(1))?;
        let ldc = contract.leading(10, ldc, n.max(1))?;

        let touched = n > 0;
        let a = require_if(touched && k > 0, "a", a)?;
        let c = require_mut_if(touched, "c", c)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, rowsa, colsa, lda)?;
        let c = MatrixViewMut::new(c, offc, n, n, ldc)?;
        if (alpha == T::zero() || k == 0) && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().syrk(uplo, trans, k, alpha, a, beta, c)
    }

    /// Symmetric rank-2k update `C := alpha·op(A)·op(B)ᵀ + alpha·op(B)·op(A)ᵀ + beta·C`
    pub fn syr2k<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        n: i32,
        k: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        b: &[T],
        ldb: i32,
        beta: T,
        c: &mut [T],
        ldc: i32,
    ) -> Result<()> {
        self.syr2k_at(uplo, trans, n, k, alpha, Some(a), 0, lda, Some(b), 0, ldb, beta, Some(c), 0, ldc)
    }

    pub fn syr2k_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        n: i32,
        k: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        b: Option<&[T]>,
        offb: usize,
        ldb: i32,
        beta: T,
        c: Option<&mut [T]>,
        offc: usize,
        ldc: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SYR2K"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let trans = contract.flag(2, Transpose::parse(trans))?;
        let n = contract.dimension(3, n)?;
        let k = contract.dimension(4, k)?;
        let (rows, cols) = stored_shape(trans, n, k);
        let lda = contract.leading(7, lda, rows.max(1))?;
        let ldb = contract.leading(9, ldb, rows.max(1))?;
        let ldc = contract.leading(12, ldc, n.max(1))?;

        let touched = n > 0;
        let a = require_if(touched && k > 0, "a", a)?;
        let b = require_if(touched && k > 0, "b", b)?;
        let c = require_mut_if(touched, "c", c)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, rows, cols, lda)?;
        let b = MatrixView::new(b, offb, rows, cols, ldb)?;
        let c = MatrixViewMut::new(c, offc, n, n, ldc)?;
        if (alpha == T::zero() || k == 0) && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().syr2k(uplo, trans, k, alpha, a, b, beta, c)
    }

    /// `B := alpha·op(A)·B` (left) or `B := alpha·B·op(A)` (right), `A` triangular
    pub fn trmm<T: BlasElement>(
        &self,
        side: &str,
        uplo: &str,
        transa: &str,
        diag: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        b: &mut [T],
        ldb: i32,
    ) -> Result<()> {
        self.trmm_at(side, uplo, transa, diag, m, n, alpha, Some(a), 0, lda, Some(b), 0, ldb)
    }

    pub fn trmm_at<T: BlasElement>(
        &self,
        side: &str,
        uplo: &str,
        transa: &str,
        diag: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        b: Option<&mut [T]>,
        offb: usize,
        ldb: i32,
    ) -> Result<()> {
        self.triangular_mm("TRMM", side, uplo, transa, diag, m, n, alpha, a, offa, lda, b, offb, ldb, false)
    }

    /// Solve `op(A)·X = alpha·B` (left) or `X·op(A) = alpha·B` (right); `X` overwrites `B`
    pub fn trsm<T: BlasElement>(
        &self,
        side: &str,
        uplo: &str,
        transa: &str,
        diag: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        b: &mut [T],
        ldb: i32,
    ) -> Result<()> {
        self.trsm_at(side, uplo, transa, diag, m, n, alpha, Some(a), 0, lda, Some(b), 0, ldb)
    }

    pub fn trsm_at<T: BlasElement>(
        &self,
        side: &str,
        uplo: &str,
        transa: &str,
        diag: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        b: Option<&mut [T]>,
        offb: usize,
        ldb: i32,
    ) -> Result<()> {
        self.triangular_mm("TRSM", side, uplo, transa, diag, m, n, alpha, a, offa, lda, b, offb, ldb, true)
    }

    fn triangular_mm<T: BlasElement>(
        &self,
        base: &'static str,
        side: &str,
        uplo: &str,
        transa: &str,
        diag: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        b: Option<&mut [T]>,
        offb: usize,
        ldb: i32,
        solve: bool,
    ) -> Result<()> {
        let contract = Contract::new(T::routine(base));
        let side = contract.flag(1, Side::parse(side))?;
        let uplo = contract.flag(2, Uplo::parse(uplo))?;
        let transa = contract.flag(3, Transpose::parse(transa))?;
        let diag = contract.flag(4, Diag::parse(diag))?;
        let m = contract.dimension(5, m)?;
        let n = contract.dimension(6, n)?;
        let order = if side.is_left() { m } else { n };
        let lda = contract.leading(9, lda, order.max(1))?;
        let ldb = contract.leading(11, ldb, m.max(1))?;

        let touched = m > 0 && n > 0;
        let a = require_if(touched, "a", a)?;
        let b = require_mut_if(touched, "b", b)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, order, order, lda)?;
        let b = MatrixViewMut::new(b, offb, m, n, ldb)?;
        let kernels = self.kernels::<T>();
        if solve {
            kernels.trsm(side, uplo, transa, diag, alpha, a, b)
        } else {
            kernels.trmm(side, uplo, transa, diag, alpha, a, b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_shape_swaps_when_transposed() {
        assert_eq!(stored_shape(Transpose::No, 4, 2), (4, 2));
        assert_eq!(stored_shape(Transpose::Yes, 4, 2), (2, 4));
    }
}
