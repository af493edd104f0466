//! Kernel provider traits
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ ArpackKernel (object safe, one per backend)                   │
//! │   - f64_kernels() ──► ArpackKernels<f64>  (D routines)        │
//! │   - f32_kernels() ──► ArpackKernels<f32>  (S routines)        │
//! │   - icnteq / icopy / iset / iswap  (integer utilities)        │
//! │   - Capabilities  (has_<routine>)                             │
//! └──────────────────────────────────────────────────────────────┘
//!        ▲                    ▲                   ▲
//!   ReferenceArpack   NativeBridgeArpack   SystemBridgeArpack
//! ```
//!
//! As with BLAS, kernels only ever see validated arguments.

use netlib_blas::{managed_blas, BlasElement};
use netlib_core::{MatrixViewMut, Result, Routine, StridedView, StridedViewMut};

use crate::flags::{Bmat, Howmny, Which};
use crate::reference;

/// Arguments shared by `saupd` and `seupd`, already validated.
///
/// `v` is `n x ncv`, `iparam` and `ipntr` hold 11 entries each, `workd`
/// holds `3n` and `workl` is `lworkl` long.
#[derive(Debug)]
pub struct LanczosWork<'a, T> {
    pub bmat: Bmat,
    pub n: usize,
    pub which: Which,
    pub nev: usize,
    pub resid: &'a mut [T],
    pub ncv: usize,
    pub v: MatrixViewMut<'a, T>,
    pub iparam: &'a mut [i32],
    pub ipntr: &'a mut [i32],
    pub workd: &'a mut [T],
    pub workl: &'a mut [T],
}

/// Routines of one precision
pub trait ArpackKernels<T: ArpackElement>: Send + Sync {
    /// One reverse-communication step of the implicitly restarted Lanczos
    /// iteration; the caller loops until `ido` is 99
    fn saupd(&self, ido: &mut i32, tol: &mut T, work: LanczosWork<'_, T>, info: &mut i32) -> Result<()> {
        reference::lanczos::saupd(&managed_blas(), ido, tol, work, info)
    }

    /// Ritz values (and optionally vectors) of a finished `saupd` run.
    ///
    /// `select` holds `ncv` flags, `d` holds `nev` values and `z` is `n x nev`
    /// when `rvec` is set, otherwise empty.
    #[allow(clippy::too_many_arguments)]
    fn seupd(
        &self,
        rvec: bool,
        howmny: Howmny,
        select: &mut [bool],
        d: &mut [T],
        z: MatrixViewMut<'_, T>,
        sigma: T,
        tol: T,
        work: LanczosWork<'_, T>,
        info: &mut i32,
    ) -> Result<()> {
        reference::lanczos::seupd(&managed_blas(), rvec, howmny, select, d, z, sigma, tol, work, info)
    }

    /// Number of Ritz values whose error bound passed the convergence test
    fn sconv(&self, ritz: &[T], bounds: &[T], tol: T) -> Result<usize> {
        Ok(reference::convergence::sconv(ritz, bounds, tol))
    }

    /// Sort `x1` so that the wanted end comes last, permuting `x2` alongside
    /// when `apply` is set
    fn sortr(&self, which: Which, apply: bool, x1: &mut [T], x2: &mut [T]) -> Result<()> {
        reference::sort::sortr(which, apply, x1, x2);
        Ok(())
    }

    /// Sort `x` like [`sortr`](Self::sortr), permuting the columns of `a`
    fn sesrt(&self, which: Which, apply: bool, x: &mut [T], a: MatrixViewMut<'_, T>) -> Result<()> {
        reference::sort::sesrt(which, apply, x, a);
        Ok(())
    }

    /// Eigenvalues of a symmetric tridiagonal matrix and the last components
    /// of its eigenvectors; returns the LAPACK-style `info`
    fn stqrb(&self, d: &mut [T], e: &mut [T], z: &mut [T], _work: &mut [T]) -> Result<i32> {
        Ok(reference::tridiagonal::stqrb(d, e, z))
    }
}

/// A complete ARPACK backend
pub trait ArpackKernel: Capabilities + Send + Sync {
    /// Name used in resolution logs
    fn name(&self) -> &'static str;

    fn f64_kernels(&self) -> &dyn ArpackKernels<f64>;

    fn f32_kernels(&self) -> &dyn ArpackKernels<f32>;

    /// Number of elements equal to `value`
    fn icnteq(&self, array: StridedView<'_, i32>, value: i32) -> Result<usize> {
        Ok(reference::integer::icnteq(array, value))
    }

    fn icopy(&self, x: StridedView<'_, i32>, y: StridedViewMut<'_, i32>) -> Result<()> {
        reference::integer::icopy(x, y);
        Ok(())
    }

    fn iset(&self, value: i32, array: StridedViewMut<'_, i32>) -> Result<()> {
        reference::integer::iset(value, array);
        Ok(())
    }

    fn iswap(&self, x: StridedViewMut<'_, i32>, y: StridedViewMut<'_, i32>) -> Result<()> {
        reference::integer::iswap(x, y);
        Ok(())
    }
}

/// Element types with an ARPACK kernel table on every backend
pub trait ArpackElement: BlasElement {
    fn arpack_kernels(backend: &dyn ArpackKernel) -> &dyn ArpackKernels<Self>;
}

impl ArpackElement for f64 {
    #[inline(always)]
    fn arpack_kernels(backend: &dyn ArpackKernel) -> &dyn ArpackKernels<f64> {
        backend.f64_kernels()
    }
}

impl ArpackElement for f32 {
    #[inline(always)]
    fn arpack_kernels(backend: &dyn ArpackKernel) -> &dyn ArpackKernels<f32> {
        backend.f32_kernels()
    }
}

macro_rules! arpack_routines {
    ($( $variant:ident => $routine:expr, $has:ident; )*) => {
        /// Every routine an ARPACK backend may provide
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ArpackRoutine {
            $($variant,)*
        }

        impl ArpackRoutine {
            pub const ALL: &'static [ArpackRoutine] = &[$(ArpackRoutine::$variant,)*];

            pub const fn routine(self) -> Routine {
                match self {
                    $(ArpackRoutine::$variant => $routine,)*
                }
            }
        }

        /// Per-routine capability query, informational only
        pub trait Capabilities {
            fn has(&self, routine: ArpackRoutine) -> bool;

            $(
                fn $has(&self) -> bool {
                    self.has(ArpackRoutine::$variant)
                }
            )*
        }
    };
}

arpack_routines! {
    Dsaupd => Routine::new('D', "SAUPD"), has_dsaupd;
    Ssaupd => Routine::new('S', "SAUPD"), has_ssaupd;
    Dseupd => Routine::new('D', "SEUPD"), has_dseupd;
    Sseupd => Routine::new('S', "SEUPD"), has_sseupd;
    Dsconv => Routine::new('D', "SCONV"), has_dsconv;
    Ssconv => Routine::new('S', "SCONV"), has_ssconv;
    Dsortr => Routine::new('D', "SORTR"), has_dsortr;
    Ssortr => Routine::new('S', "SORTR"), has_ssortr;
    Dsesrt => Routine::new('D', "SESRT"), has_dsesrt;
    Ssesrt => Routine::new('S', "SESRT"), has_ssesrt;
    Dstqrb => Routine::new('D', "STQRB"), has_dstqrb;
    Sstqrb => Routine::new('S', "STQRB"), has_sstqrb;
    Icnteq => Routine::plain("ICNTEQ"), has_icnteq;
    Icopy => Routine::plain("ICOPY"), has_icopy;
    Iset => Routine::plain("ISET"), has_iset;
    Iswap => Routine::plain("ISWAP"), has_iswap;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DoubleOnly;

    impl Capabilities for DoubleOnly {
        fn has(&self, routine: ArpackRoutine) -> bool {
            routine.routine().prefix() == Some('D')
        }
    }

    #[test]
    fn has_methods_forward_to_has() {
        assert!(DoubleOnly.has_dsaupd());
        assert!(DoubleOnly.has_dstqrb());
        assert!(!DoubleOnly.has_ssaupd());
        assert!(!DoubleOnly.has_icopy());
    }

    #[test]
    fn routine_names_and_symbols() {
        assert_eq!(ArpackRoutine::Dsaupd.routine().to_string(), "DSAUPD");
        assert_eq!(ArpackRoutine::Icnteq.routine().symbol(), "icnteq_");
        assert_eq!(ArpackRoutine::Sseupd.routine().symbol(), "sseupd_");
        assert_eq!(ArpackRoutine::ALL.len(), 16);
    }
}
