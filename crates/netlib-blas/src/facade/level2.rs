//! Level 2 entry points
//!
//! Positions passed to the [`Contract`] are the reference BLAS argument
//! positions, so the first illegal argument reported is the one a Fortran
//! caller would see from `XERBLA`.

#![allow(clippy::too_many_arguments)]

use netlib_core::validate::{require_if, require_mut_if};
use netlib_core::{Contract, MatrixView, MatrixViewMut, Result, StridedView, StridedViewMut};

use super::{packed_len, Blas};
use crate::flags::{Diag, Transpose, Uplo};
use crate::kernel::BlasElement;

/// Operand lengths of `op(A)·x` for an `m x n` matrix `A`
#[inline]
fn operand_lengths(trans: Transpose, m: usize, n: usize) -> (usize, usize) {
    if trans.is_transposed() {
        (m, n)
    } else {
        (n, m)
    }
}

impl Blas {
    /// `y := alpha·op(A)·x + beta·y`
    pub fn gemv<T: BlasElement>(
        &self,
        trans: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        x: &[T],
        incx: i32,
        beta: T,
        y: &mut [T],
        incy: i32,
    ) -> Result<()> {
        self.gemv_at(trans, m, n, alpha, Some(a), 0, lda, Some(x), 0, incx, beta, Some(y), 0, incy)
    }

    pub fn gemv_at<T: BlasElement>(
        &self,
        trans: &str,
        m: i32,
        n: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        beta: T,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("GEMV"));
        let trans = contract.flag(1, Transpose::parse(trans))?;
        let m = contract.dimension(2, m)?;
        let n = contract.dimension(3, n)?;
        let lda = contract.leading(6, lda, m.max(1))?;
        let incx = contract.increment(8, incx)?;
        let incy = contract.increment(11, incy)?;

        let touched = m > 0 && n > 0;
        let a = require_if(touched, "a", a)?;
        let x = require_if(touched, "x", x)?;
        let y = require_mut_if(touched, "y", y)?;
        if !touched {
            return Ok(());
        }

        let (lenx, leny) = operand_lengths(trans, m, n);
        let a = MatrixView::new(a, offa, m, n, lda)?;
        let x = StridedView::new(x, offx, lenx, incx)?;
        let y = StridedViewMut::new(y, offy, leny, incy)?;
        if alpha == T::zero() && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().gemv(trans, alpha, a, x, beta, y)
    }

    /// `y := alpha·op(A)·x + beta·y` for a band matrix with `kl` sub- and `ku` super-diagonals
    pub fn gbmv<T: BlasElement>(
        &self,
        trans: &str,
        m: i32,
        n: i32,
        kl: i32,
        ku: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        x: &[T],
        incx: i32,
        beta: T,
        y: &mut [T],
        incy: i32,
    ) -> Result<()> {
        self.gbmv_at(trans, m, n, kl, ku, alpha, Some(a), 0, lda, Some(x), 0, incx, beta, Some(y), 0, incy)
    }

    pub fn gbmv_at<T: BlasElement>(
        &self,
        trans: &str,
        m: i32,
        n: i32,
        kl: i32,
        ku: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        beta: T,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("GBMV"));
        let trans = contract.flag(1, Transpose::parse(trans))?;
        let m = contract.dimension(2, m)?;
        let n = contract.dimension(3, n)?;
        let kl = contract.dimension(4, kl)?;
        let ku = contract.dimension(5, ku)?;
        let bands = kl.saturating_add(ku).saturating_add(1);
        let lda = contract.leading(8, lda, bands)?;
        let incx = contract.increment(10, incx)?;
        let incy = contract.increment(13, incy)?;

        let touched = m > 0 && n > 0;
        let a = require_if(touched, "a", a)?;
        let x = require_if(touched, "x", x)?;
        let y = require_mut_if(touched, "y", y)?;
        if !touched {
            return Ok(());
        }

        let (lenx, leny) = operand_lengths(trans, m, n);
        let a = MatrixView::new(a, offa, bands, n, lda)?;
        let x = StridedView::new(x, offx, lenx, incx)?;
        let y = StridedViewMut::new(y, offy, leny, incy)?;
        if alpha == T::zero() && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().gbmv(trans, m, kl, ku, alpha, a, x, beta, y)
    }

    /// `A := alpha·x·yᵀ + A`
    pub fn ger<T: BlasElement>(
        &self,
        m: i32,
        n: i32,
        alpha: T,
        x: &[T],
        incx: i32,
        y: &[T],
        incy: i32,
        a: &mut [T],
        lda: i32,
    ) -> Result<()> {
        self.ger_at(m, n, alpha, Some(x), 0, incx, Some(y), 0, incy, Some(a), 0, lda)
    }

    pub fn ger_at<T: BlasElement>(
        &self,
        m: i32,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        y: Option<&[T]>,
        offy: usize,
        incy: i32,
        a: Option<&mut [T]>,
        offa: usize,
        lda: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("GER"));
        let m = contract.dimension(1, m)?;
        let n = contract.dimension(2, n)?;
        let incx = contract.increment(5, incx)?;
        let incy = contract.increment(7, incy)?;
        let lda = contract.leading(9, lda, m.max(1))?;

        let touched = m > 0 && n > 0;
        let x = require_if(touched, "x", x)?;
        let y = require_if(touched, "y", y)?;
        let a = require_mut_if(touched, "a", a)?;
        if !touched {
            return Ok(());
        }

        let x = StridedView::new(x, offx, m, incx)?;
        let y = StridedView::new(y, offy, n, incy)?;
        let a = MatrixViewMut::new(a, offa, m, n, lda)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().ger(alpha, x, y, a)
    }

    /// `y := alpha·A·x + beta·y` with `A` symmetric, one triangle referenced
    pub fn symv<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        x: &[T],
        incx: i32,
        beta: T,
        y: &mut [T],
        incy: i32,
    ) -> Result<()> {
        self.symv_at(uplo, n, alpha, Some(a), 0, lda, Some(x), 0, incx, beta, Some(y), 0, incy)
    }

    pub fn symv_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        beta: T,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SYMV"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let n = contract.dimension(2, n)?;
        let lda = contract.leading(5, lda, n.max(1))?;
        let incx = contract.increment(7, incx)?;
        let incy = contract.increment(10, incy)?;

        let touched = n > 0;
        let a = require_if(touched, "a", a)?;
        let x = require_if(touched, "x", x)?;
        let y = require_mut_if(touched, "y", y)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, n, n, lda)?;
        let x = StridedView::new(x, offx, n, incx)?;
        let y = StridedViewMut::new(y, offy, n, incy)?;
        if alpha == T::zero() && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().symv(uplo, alpha, a, x, beta, y)
    }

    /// Symmetric band matrix-vector product with `k` off-diagonals
    pub fn sbmv<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        k: i32,
        alpha: T,
        a: &[T],
        lda: i32,
        x: &[T],
        incx: i32,
        beta: T,
        y: &mut [T],
        incy: i32,
    ) -> Result<()> {
        self.sbmv_at(uplo, n, k, alpha, Some(a), 0, lda, Some(x), 0, incx, beta, Some(y), 0, incy)
    }

    pub fn sbmv_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        k: i32,
        alpha: T,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        beta: T,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SBMV"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let n = contract.dimension(2, n)?;
        let k = contract.dimension(3, k)?;
        let bands = k.saturating_add(1);
        let lda = contract.leading(6, lda, bands)?;
        let incx = contract.increment(8, incx)?;
        let incy = contract.increment(11, incy)?;

        let touched = n > 0;
        let a = require_if(touched, "a", a)?;
        let x = require_if(touched, "x", x)?;
        let y = require_mut_if(touched, "y", y)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, bands, n, lda)?;
        let x = StridedView::new(x, offx, n, incx)?;
        let y = StridedViewMut::new(y, offy, n, incy)?;
        if alpha == T::zero() && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().sbmv(uplo, k, alpha, a, x, beta, y)
    }

    /// Symmetric packed matrix-vector product
    pub fn spmv<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        ap: &[T],
        x: &[T],
        incx: i32,
        beta: T,
        y: &mut [T],
        incy: i32,
    ) -> Result<()> {
        self.spmv_at(uplo, n, alpha, Some(ap), 0, Some(x), 0, incx, beta, Some(y), 0, incy)
    }

    pub fn spmv_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        ap: Option<&[T]>,
        offap: usize,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        beta: T,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SPMV"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let n = contract.dimension(2, n)?;
        let incx = contract.increment(6, incx)?;
        let incy = contract.increment(9, incy)?;

        let touched = n > 0;
        let ap = require_if(touched, "ap", ap)?;
        let x = require_if(touched, "x", x)?;
        let y = require_mut_if(touched, "y", y)?;
        if !touched {
            return Ok(());
        }

        let ap = StridedView::new(ap, offap, packed_len(n), 1)?;
        let x = StridedView::new(x, offx, n, incx)?;
        let y = StridedViewMut::new(y, offy, n, incy)?;
        if alpha == T::zero() && beta == T::one() {
            return Ok(());
        }
        self.kernels::<T>().spmv(uplo, n, alpha, ap, x, beta, y)
    }

    /// Packed symmetric rank-1 update `A := alpha·x·xᵀ + A`
    pub fn spr<T: BlasElement>(&self, uplo: &str, n: i32, alpha: T, x: &[T], incx: i32, ap: &mut [T]) -> Result<()> {
        self.spr_at(uplo, n, alpha, Some(x), 0, incx, Some(ap), 0)
    }

    pub fn spr_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        ap: Option<&mut [T]>,
        offap: usize,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SPR"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let n = contract.dimension(2, n)?;
        let incx = contract.increment(5, incx)?;

        let touched = n > 0;
        let x = require_if(touched, "x", x)?;
        let ap = require_mut_if(touched, "ap", ap)?;
        if !touched {
            return Ok(());
        }

        let x = StridedView::new(x, offx, n, incx)?;
        let ap = StridedViewMut::new(ap, offap, packed_len(n), 1)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().spr(uplo, n, alpha, x, ap)
    }

    /// Packed symmetric rank-2 update
    pub fn spr2<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: &[T],
        incx: i32,
        y: &[T],
        incy: i32,
        ap: &mut [T],
    ) -> Result<()> {
        self.spr2_at(uplo, n, alpha, Some(x), 0, incx, Some(y), 0, incy, Some(ap), 0)
    }

    pub fn spr2_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        y: Option<&[T]>,
        offy: usize,
        incy: i32,
        ap: Option<&mut [T]>,
        offap: usize,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SPR2"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let n = contract.dimension(2, n)?;
        let incx = contract.increment(5, incx)?;
        let incy = contract.increment(7, incy)?;

        let touched = n > 0;
        let x = require_if(touched, "x", x)?;
        let y = require_if(touched, "y", y)?;
        let ap = require_mut_if(touched, "ap", ap)?;
        if !touched {
            return Ok(());
        }

        let x = StridedView::new(x, offx, n, incx)?;
        let y = StridedView::new(y, offy, n, incy)?;
        let ap = StridedViewMut::new(ap, offap, packed_len(n), 1)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().spr2(uplo, n, alpha, x, y, ap)
    }

    /// Symmetric rank-1 update `A := alpha·x·xᵀ + A`
    pub fn syr<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: &[T],
        incx: i32,
        a: &mut [T],
        lda: i32,
    ) -> Result<()> {
        self.syr_at(uplo, n, alpha, Some(x), 0, incx, Some(a), 0, lda)
    }

    pub fn syr_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        a: Option<&mut [T]>,
        offa: usize,
        lda: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SYR"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let n = contract.dimension(2, n)?;
        let incx = contract.increment(5, incx)?;
        let lda = contract.leading(7, lda, n.max(1))?;

        let touched = n > 0;
        let x = require_if(touched, "x", x)?;
        let a = require_mut_if(touched, "a", a)?;
        if !touched {
            return Ok(());
        }

        let x = StridedView::new(x, offx, n, incx)?;
        let a = MatrixViewMut::new(a, offa, n, n, lda)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().syr(uplo, alpha, x, a)
    }

    /// Symmetric rank-2 update `A := alpha·x·yᵀ + alpha·y·xᵀ + A`
    pub fn syr2<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: &[T],
        incx: i32,
        y: &[T],
        incy: i32,
        a: &mut [T],
        lda: i32,
    ) -> Result<()> {
        self.syr2_at(uplo, n, alpha, Some(x), 0, incx, Some(y), 0, incy, Some(a), 0, lda)
    }

    pub fn syr2_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        y: Option<&[T]>,
        offy: usize,
        incy: i32,
        a: Option<&mut [T]>,
        offa: usize,
        lda: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SYR2"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let n = contract.dimension(2, n)?;
        let incx = contract.increment(5, incx)?;
        let incy = contract.increment(7, incy)?;
        let lda = contract.leading(9, lda, n.max(1))?;

        let touched = n > 0;
        let x = require_if(touched, "x", x)?;
        let y = require_if(touched, "y", y)?;
        let a = require_mut_if(touched, "a", a)?;
        if !touched {
            return Ok(());
        }

        let x = StridedView::new(x, offx, n, incx)?;
        let y = StridedView::new(y, offy, n, incy)?;
        let a = MatrixViewMut::new(a, offa, n, n, lda)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().syr2(uplo, alpha, x, y, a)
    }

    /// `x := op(A)·x` with `A` triangular
    pub fn trmv<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        a: &[T],
        lda: i32,
        x: &mut [T],
        incx: i32,
    ) -> Result<()> {
        self.trmv_at(uplo, trans, diag, n, Some(a), 0, lda, Some(x), 0, incx)
    }

    pub fn trmv_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
    ) -> Result<()> {
        self.triangular_mv("TRMV", uplo, trans, diag, n, a, offa, lda, x, offx, incx, false)
    }

    /// Solve `op(A)·x = b` in place, `A` triangular
    pub fn trsv<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        a: &[T],
        lda: i32,
        x: &mut [T],
        incx: i32,
    ) -> Result<()> {
        self.trsv_at(uplo, trans, diag, n, Some(a), 0, lda, Some(x), 0, incx)
    }

    pub fn trsv_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
    ) -> Result<()> {
        self.triangular_mv("TRSV", uplo, trans, diag, n, a, offa, lda, x, offx, incx, true)
    }

    fn triangular_mv<T: BlasElement>(
        &self,
        base: &'static str,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
        solve: bool,
    ) -> Result<()> {
        let contract = Contract::new(T::routine(base));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let trans = contract.flag(2, Transpose::parse(trans))?;
        let diag = contract.flag(3, Diag::parse(diag))?;
        let n = contract.dimension(4, n)?;
        let lda = contract.leading(6, lda, n.max(1))?;
        let incx = contract.increment(8, incx)?;

        let touched = n > 0;
        let a = require_if(touched, "a", a)?;
        let x = require_mut_if(touched, "x", x)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, n, n, lda)?;
        let x = StridedViewMut::new(x, offx, n, incx)?;
        let kernels = self.kernels::<T>();
        if solve {
            kernels.trsv(uplo, trans, diag, a, x)
        } else {
            kernels.trmv(uplo, trans, diag, a, x)
        }
    }

    /// `x := op(A)·x` with `A` triangular band, `k` off-diagonals
    pub fn tbmv<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        k: i32,
        a: &[T],
        lda: i32,
        x: &mut [T],
        incx: i32,
    ) -> Result<()> {
        self.tbmv_at(uplo, trans, diag, n, k, Some(a), 0, lda, Some(x), 0, incx)
    }

    pub fn tbmv_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        k: i32,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
    ) -> Result<()> {
        self.triangular_band("TBMV", uplo, trans, diag, n, k, a, offa, lda, x, offx, incx, false)
    }

    /// Solve `op(A)·x = b` in place, `A` triangular band
    pub fn tbsv<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        k: i32,
        a: &[T],
        lda: i32,
        x: &mut [T],
        incx: i32,
    ) -> Result<()> {
        self.tbsv_at(uplo, trans, diag, n, k, Some(a), 0, lda, Some(x), 0, incx)
    }

    pub fn tbsv_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        k: i32,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
    ) -> Result<()> {
        self.triangular_band("TBSV", uplo, trans, diag, n, k, a, offa, lda, x, offx, incx, true)
    }

    fn triangular_band<T: BlasElement>(
        &self,
        base: &'static str,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        k: i32,
        a: Option<&[T]>,
        offa: usize,
        lda: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
        solve: bool,
    ) -> Result<()> {
        let contract = Contract::new(T::routine(base));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let trans = contract.flag(2, Transpose::parse(trans))?;
        let diag = contract.flag(3, Diag::parse(diag))?;
        let n = contract.dimension(4, n)?;
        let k = contract.dimension(5, k)?;
        let bands = k.saturating_add(1);
        let lda = contract.leading(7, lda, bands)?;
        let incx = contract.increment(9, incx)?;

        let touched = n > 0;
        let a = require_if(touched, "a", a)?;
        let x = require_mut_if(touched, "x", x)?;
        if !touched {
            return Ok(());
        }

        let a = MatrixView::new(a, offa, bands, n, lda)?;
        let x = StridedViewMut::new(x, offx, n, incx)?;
        let kernels = self.kernels::<T>();
        if solve {
            kernels.tbsv(uplo, trans, diag, k, a, x)
        } else {
            kernels.tbmv(uplo, trans, diag, k, a, x)
        }
    }

    /// `x := op(A)·x` with `A` triangular in packed storage
    pub fn tpmv<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        ap: &[T],
        x: &mut [T],
        incx: i32,
    ) -> Result<()> {
        self.tpmv_at(uplo, trans, diag, n, Some(ap), 0, Some(x), 0, incx)
    }

    pub fn tpmv_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        ap: Option<&[T]>,
        offap: usize,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
    ) -> Result<()> {
        self.triangular_packed("TPMV", uplo, trans, diag, n, ap, offap, x, offx, incx, false)
    }

    /// Solve `op(A)·x = b` in place, `A` triangular in packed storage
    pub fn tpsv<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        ap: &[T],
        x: &mut [T],
        incx: i32,
    ) -> Result<()> {
        self.tpsv_at(uplo, trans, diag, n, Some(ap), 0, Some(x), 0, incx)
    }

    pub fn tpsv_at<T: BlasElement>(
        &self,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        ap: Option<&[T]>,
        offap: usize,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
    ) -> Result<()> {
        self.triangular_packed("TPSV", uplo, trans, diag, n, ap, offap, x, offx, incx, true)
    }

    fn triangular_packed<T: BlasElement>(
        &self,
        base: &'static str,
        uplo: &str,
        trans: &str,
        diag: &str,
        n: i32,
        ap: Option<&[T]>,
        offap: usize,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
        solve: bool,
    ) -> Result<()> {
        let contract = Contract::new(T::routine(base));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        let trans = contract.flag(2, Transpose::parse(trans))?;
        let diag = contract.flag(3, Diag::parse(diag))?;
        let n = contract.dimension(4, n)?;
        let incx = contract.increment(7, incx)?;

        let touched = n > 0;
        let ap = require_if(touched, "ap", ap)?;
        let x = require_mut_if(touched, "x", x)?;
        if !touched {
            return Ok(());
        }

        let ap = StridedView::new(ap, offap, packed_len(n), 1)?;
        let x = StridedViewMut::new(x, offx, n, incx)?;
        let kernels = self.kernels::<T>();
        if solve {
            kernels.tpsv(uplo, trans, diag, n, ap, x)
        } else {
            kernels.tpmv(uplo, trans, diag, n, ap, x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_lengths_follow_transpose() {
        assert_eq!(operand_lengths(Transpose::No, 2, 3), (3, 2));
        assert_eq!(operand_lengths(Transpose::Yes, 2, 3), (2, 3));
    }
}
