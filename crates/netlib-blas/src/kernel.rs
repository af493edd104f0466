//! Kernel provider traits
//!
//! Every backend exposes the same flat surface:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ BlasKernel (object safe, one per backend)                     │
//! │   - f64_kernels() ──► BlasKernels<f64>   (D routines)         │
//! │   - f32_kernels() ──► BlasKernels<f32>   (S routines)         │
//! │   - sdsdot / dsdot  (mixed precision)                          │
//! │   - Capabilities    (has_<routine>)                            │
//! └──────────────────────────────────────────────────────────────┘
//!        ▲            ▲            ▲              ▲
//!   ReferenceBlas  UnrolledBlas  SimdBlas   NativeBridgeBlas
//! ```
//!
//! Kernels receive arguments that already passed the contract validator:
//! views are in bounds, flags parsed, dimensions non-negative.

use netlib_core::{MatrixView, MatrixViewMut, Real, Result, Routine, StridedView, StridedViewMut};

use crate::flags::{Diag, Side, Transpose, Uplo};
use crate::reference;

/// Routines of one precision.
///
/// The provided methods run the portable reference kernels. Managed backends
/// override the ones they accelerate; the native bridge overrides every dense one.
pub trait BlasKernels<T: Real>: Send + Sync {
    // Level 1

    fn asum(&self, x: StridedView<'_, T>) -> Result<T> {
        Ok(reference::level1::asum(x))
    }

    fn axpy(&self, alpha: T, x: StridedView<'_, T>, y: StridedViewMut<'_, T>) -> Result<()> {
        reference::level1::axpy(alpha, x, y);
        Ok(())
    }

    fn copy(&self, x: StridedView<'_, T>, y: StridedViewMut<'_, T>) -> Result<()> {
        reference::level1::copy(x, y);
        Ok(())
    }

    fn dot(&self, x: StridedView<'_, T>, y: StridedView<'_, T>) -> Result<T> {
        Ok(reference::level1::dot(x, y))
    }

    fn nrm2(&self, x: StridedView<'_, T>) -> Result<T> {
        Ok(reference::level1::nrm2(x))
    }

    fn rot(&self, x: StridedViewMut<'_, T>, y: StridedViewMut<'_, T>, c: T, s: T) -> Result<()> {
        reference::level1::rot(x, y, c, s);
        Ok(())
    }

    fn rotg(&self, a: &mut T, b: &mut T, c: &mut T, s: &mut T) -> Result<()> {
        reference::level1::rotg(a, b, c, s);
        Ok(())
    }

    /// `param` holds the flag followed by `h11, h21, h12, h22`
    fn rotm(&self, x: StridedViewMut<'_, T>, y: StridedViewMut<'_, T>, param: StridedView<'_, T>) -> Result<()> {
        reference::level1::rotm(x, y, param);
        Ok(())
    }

    fn rotmg(&self, d1: &mut T, d2: &mut T, x1: &mut T, y1: T, param: StridedViewMut<'_, T>) -> Result<()> {
        reference::level1::rotmg(d1, d2, x1, y1, param);
        Ok(())
    }

    fn scal(&self, alpha: T, x: StridedViewMut<'_, T>) -> Result<()> {
        reference::level1::scal(alpha, x);
        Ok(())
    }

    fn swap(&self, x: StridedViewMut<'_, T>, y: StridedViewMut<'_, T>) -> Result<()> {
        reference::level1::swap(x, y);
        Ok(())
    }

    /// 0-based position of the first element of largest magnitude; `x` is non-empty
    fn iamax(&self, x: StridedView<'_, T>) -> Result<usize> {
        Ok(reference::level1::iamax(x))
    }

    // Level 2

    fn gemv(
        &self,
        trans: Transpose,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::gemv(trans, alpha, a, x, beta, y);
        Ok(())
    }

    /// `a` is the band storage: `kl + ku + 1` rows by `n` columns
    #[allow(clippy::too_many_arguments)]
    fn gbmv(
        &self,
        trans: Transpose,
        m: usize,
        kl: usize,
        ku: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::gbmv(trans, m, kl, ku, alpha, a, x, beta, y);
        Ok(())
    }

    fn ger(&self, alpha: T, x: StridedView<'_, T>, y: StridedView<'_, T>, a: MatrixViewMut<'_, T>) -> Result<()> {
        reference::level2::ger(alpha, x, y, a);
        Ok(())
    }

    fn symv(
        &self,
        uplo: Uplo,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::symv(uplo, alpha, a, x, beta, y);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn sbmv(
        &self,
        uplo: Uplo,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::sbmv(uplo, k, alpha, a, x, beta, y);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn spmv(
        &self,
        uplo: Uplo,
        n: usize,
        alpha: T,
        ap: StridedView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::spmv(uplo, n, alpha, ap, x, beta, y);
        Ok(())
    }

    fn spr(&self, uplo: Uplo, n: usize, alpha: T, x: StridedView<'_, T>, ap: StridedViewMut<'_, T>) -> Result<()> {
        reference::level2::spr(uplo, n, alpha, x, ap);
        Ok(())
    }

    fn spr2(
        &self,
        uplo: Uplo,
        n: usize,
        alpha: T,
        x: StridedView<'_, T>,
        y: StridedView<'_, T>,
        ap: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::spr2(uplo, n, alpha, x, y, ap);
        Ok(())
    }

    fn syr(&self, uplo: Uplo, alpha: T, x: StridedView<'_, T>, a: MatrixViewMut<'_, T>) -> Result<()> {
        reference::level2::syr(uplo, alpha, x, a);
        Ok(())
    }

    fn syr2(
        &self,
        uplo: Uplo,
        alpha: T,
        x: StridedView<'_, T>,
        y: StridedView<'_, T>,
        a: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::syr2(uplo, alpha, x, y, a);
        Ok(())
    }

    fn trmv(
        &self,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        a: MatrixView<'_, T>,
        x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::trmv(uplo, trans, diag, a, x);
        Ok(())
    }

    fn trsv(
        &self,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        a: MatrixView<'_, T>,
        x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::trsv(uplo, trans, diag, a, x);
        Ok(())
    }

    fn tbmv(
        &self,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        k: usize,
        a: MatrixView<'_, T>,
        x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::tbmv(uplo, trans, diag, k, a, x);
        Ok(())
    }

    fn tbsv(
        &self,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        k: usize,
        a: MatrixView<'_, T>,
        x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::tbsv(uplo, trans, diag, k, a, x);
        Ok(())
    }

    fn tpmv(
        &self,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        n: usize,
        ap: StridedView<'_, T>,
        x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::tpmv(uplo, trans, diag, n, ap, x);
        Ok(())
    }

    fn tpsv(
        &self,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        n: usize,
        ap: StridedView<'_, T>,
        x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        reference::level2::tpsv(uplo, trans, diag, n, ap, x);
        Ok(())
    }

    // Level 3

    /// `c` is `m x n`; `k` is the inner dimension
    #[allow(clippy::too_many_arguments)]
    fn gemm(
        &self,
        transa: Transpose,
        transb: Transpose,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixView<'_, T>,
        beta: T,
        c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        reference::level3::gemm(transa, transb, k, alpha, a, b, beta, c);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn symm(
        &self,
        side: Side,
        uplo: Uplo,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixView<'_, T>,
        beta: T,
        c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        reference::level3::symm(side, uplo, alpha, a, b, beta, c);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn syrk(
        &self,
        uplo: Uplo,
        trans: Transpose,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        beta: T,
        c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        reference::level3::syrk(uplo, trans, k, alpha, a, beta, c);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn syr2k(
        &self,
        uplo: Uplo,
        trans: Transpose,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixView<'_, T>,
        beta: T,
        c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        reference::level3::syr2k(uplo, trans, k, alpha, a, b, beta, c);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn trmm(
        &self,
        side: Side,
        uplo: Uplo,
        transa: Transpose,
        diag: Diag,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        reference::level3::trmm(side, uplo, transa, diag, alpha, a, b);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn trsm(
        &self,
        side: Side,
        uplo: Uplo,
        transa: Transpose,
        diag: Diag,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        reference::level3::trsm(side, uplo, transa, diag, alpha, a, b);
        Ok(())
    }

    // Sparse level 1
    //
    // `y` and `ap` start at the caller's offset and every index was checked
    // against them. No native library exports these, so every backend runs
    // the reference kernels unless it overrides them.

    fn axpyi(&self, alpha: T, x: &[T], indx: &[i32], y: &mut [T]) -> Result<()> {
        reference::sparse::axpyi(alpha, x, indx, y);
        Ok(())
    }

    fn doti(&self, x: &[T], indx: &[i32], y: &[T]) -> Result<T> {
        Ok(reference::sparse::doti(x, indx, y))
    }

    fn dotii(&self, x: &[T], indx: &[i32], y: &[T], indy: &[i32]) -> Result<T> {
        Ok(reference::sparse::dotii(x, indx, y, indy))
    }

    fn copyi(&self, x: &[T], indx: &[i32], y: &mut [T]) -> Result<()> {
        reference::sparse::copyi(x, indx, y);
        Ok(())
    }

    fn spri(&self, uplo: Uplo, alpha: T, x: &[T], indx: &[i32], ap: &mut [T]) -> Result<()> {
        reference::sparse::spri(uplo.is_upper(), alpha, x, indx, ap);
        Ok(())
    }
}

/// A complete BLAS backend
pub trait BlasKernel: Capabilities + Send + Sync {
    /// Name used in resolution logs
    fn name(&self) -> &'static str;

    fn f64_kernels(&self) -> &dyn BlasKernels<f64>;

    fn f32_kernels(&self) -> &dyn BlasKernels<f32>;

    /// `sb + x·y` accumulated in double precision
    fn sdsdot(&self, sb: f32, x: StridedView<'_, f32>, y: StridedView<'_, f32>) -> Result<f32> {
        Ok((sb as f64 + reference::level1::dot_wide(x, y)) as f32)
    }

    /// `x·y` of single-precision vectors accumulated and returned in double precision
    fn dsdot(&self, x: StridedView<'_, f32>, y: StridedView<'_, f32>) -> Result<f64> {
        Ok(reference::level1::dot_wide(x, y))
    }
}

/// Element types with a kernel table on every backend
pub trait BlasElement: Real {
    /// Name of the `I*AMAX` routine for this precision
    const IAMAX: Routine;

    fn kernels(backend: &dyn BlasKernel) -> &dyn BlasKernels<Self>;
}

impl BlasElement for f64 {
    const IAMAX: Routine = Routine::new('I', "DAMAX");

    #[inline(always)]
    fn kernels(backend: &dyn BlasKernel) -> &dyn BlasKernels<f64> {
        backend.f64_kernels()
    }
}

impl BlasElement for f32 {
    const IAMAX: Routine = Routine::new('I', "SAMAX");

    #[inline(always)]
    fn kernels(backend: &dyn BlasKernel) -> &dyn BlasKernels<f32> {
        backend.f32_kernels()
    }
}

macro_rules! blas_routines {
    ($( $variant:ident => ($prefix:literal, $base:literal), $has:ident; )*) => {
        /// Every routine a BLAS backend may provide
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BlasRoutine {
            $($variant,)*
        }

        impl BlasRoutine {
            pub const ALL: &'static [BlasRoutine] = &[$(BlasRoutine::$variant,)*];

            pub const fn routine(self) -> Routine {
                match self {
                    $(BlasRoutine::$variant => Routine::new($prefix, $base),)*
                }
            }
        }

        /// Per-routine capability query.
        ///
        /// Native backends answer from the symbols their library exports;
        /// managed backends implement every routine. The answer is
        /// informational: facades never reroute a call based on it.
        pub trait Capabilities {
            fn has(&self, routine: BlasRoutine) -> bool;

            $(
                fn $has(&self) -> bool {
                    self.has(BlasRoutine::$variant)
                }
            )*
        }
    };
}

blas_routines! {
    Dasum => ('D', "ASUM"), has_dasum;
    Sasum => ('S', "ASUM"), has_sasum;
    Daxpy => ('D', "AXPY"), has_daxpy;
    Saxpy => ('S', "AXPY"), has_saxpy;
    Dcopy => ('D', "COPY"), has_dcopy;
    Scopy => ('S', "COPY"), has_scopy;
    Ddot => ('D', "DOT"), has_ddot;
    Sdot => ('S', "DOT"), has_sdot;
    Sdsdot => ('S', "DSDOT"), has_sdsdot;
    Dsdot => ('D', "SDOT"), has_dsdot;
    Dnrm2 => ('D', "NRM2"), has_dnrm2;
    Snrm2 => ('S', "NRM2"), has_snrm2;
    Drot => ('D', "ROT"), has_drot;
    Srot => ('S', "ROT"), has_srot;
    Drotg => ('D', "ROTG"), has_drotg;
    Srotg => ('S', "ROTG"), has_srotg;
    Drotm => ('D', "ROTM"), has_drotm;
    Srotm => ('S', "ROTM"), has_srotm;
    Drotmg => ('D', "ROTMG"), has_drotmg;
    Srotmg => ('S', "ROTMG"), has_srotmg;
    Dscal => ('D', "SCAL"), has_dscal;
    Sscal => ('S', "SCAL"), has_sscal;
    Dswap => ('D', "SWAP"), has_dswap;
    Sswap => ('S', "SWAP"), has_sswap;
    Idamax => ('I', "DAMAX"), has_idamax;
    Isamax => ('I', "SAMAX"), has_isamax;
    Dgemv => ('D', "GEMV"), has_dgemv;
    Sgemv => ('S', "GEMV"), has_sgemv;
    Dgbmv => ('D', "GBMV"), has_dgbmv;
    Sgbmv => ('S', "GBMV"), has_sgbmv;
    Dger => ('D', "GER"), has_dger;
    Sger => ('S', "GER"), has_sger;
    Dsymv => ('D', "SYMV"), has_dsymv;
    Ssymv => ('S', "SYMV"), has_ssymv;
    Dsbmv => ('D', "SBMV"), has_dsbmv;
    Ssbmv => ('S', "SBMV"), has_ssbmv;
    Dspmv => ('D', "SPMV"), has_dspmv;
    Sspmv => ('S', "SPMV"), has_sspmv;
    Dspr => ('D', "SPR"), has_dspr;
    Sspr => ('S', "SPR"), has_sspr;
    Dspr2 => ('D', "SPR2"), has_dspr2;
    Sspr2 => ('S', "SPR2"), has_sspr2;
    Dsyr => ('D', "SYR"), has_dsyr;
    Ssyr => ('S', "SYR"), has_ssyr;
    Dsyr2 => ('D', "SYR2"), has_dsyr2;
    Ssyr2 => ('S', "SYR2"), has_ssyr2;
    Dtrmv => ('D', "TRMV"), has_dtrmv;
    Strmv => ('S', "TRMV"), has_strmv;
    Dtrsv => ('D', "TRSV"), has_dtrsv;
    Strsv => ('S', "TRSV"), has_strsv;
    Dtbmv => ('D', "TBMV"), has_dtbmv;
    Stbmv => ('S', "TBMV"), has_stbmv;
    Dtbsv => ('D', "TBSV"), has_dtbsv;
    Stbsv => ('S', "TBSV"), has_stbsv;
    Dtpmv => ('D', "TPMV"), has_dtpmv;
    Stpmv => ('S', "TPMV"), has_stpmv;
    Dtpsv => ('D', "TPSV"), has_dtpsv;
    Stpsv => ('S', "TPSV"), has_stpsv;
    Dgemm => ('D', "GEMM"), has_dgemm;
    Sgemm => ('S', "GEMM"), has_sgemm;
    Dsymm => ('D', "SYMM"), has_dsymm;
    Ssymm => ('S', "SYMM"), has_ssymm;
    Dsyrk => ('D', "SYRK"), has_dsyrk;
    Ssyrk => ('S', "SYRK"), has_ssyrk;
    Dsyr2k => ('D', "SYR2K"), has_dsyr2k;
    Ssyr2k => ('S', "SYR2K"), has_ssyr2k;
    Dtrmm => ('D', "TRMM"), has_dtrmm;
    Strmm => ('S', "TRMM"), has_strmm;
    Dtrsm => ('D', "TRSM"), has_dtrsm;
    Strsm => ('S', "TRSM"), has_strsm;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Partial;

    impl Capabilities for Partial {
        fn has(&self, routine: BlasRoutine) -> bool {
            matches!(routine, BlasRoutine::Ddot | BlasRoutine::Dgemm)
        }
    }

    #[test]
    fn has_methods_forward_to_has() {
        assert!(Partial.has_ddot());
        assert!(Partial.has_dgemm());
        assert!(!Partial.has_sgemm());
        assert!(!Partial.has_idamax());
    }

    #[test]
    fn routine_names_and_symbols() {
        assert_eq!(BlasRoutine::Sdsdot.routine().to_string(), "SDSDOT");
        assert_eq!(BlasRoutine::Dsdot.routine().symbol(), "dsdot_");
        assert_eq!(BlasRoutine::Idamax.routine().symbol(), "idamax_");
        assert_eq!(f32::IAMAX.to_string(), "ISAMAX");
    }

    #[test]
    fn routine_table_is_complete() {
        assert_eq!(BlasRoutine::ALL.len(), 70);
    }
}
