//! Foreign-call bridge to a natively compiled BLAS
//!
//! Symbols follow the gfortran convention: lowercase name with a trailing
//! underscore, every argument by reference, and one hidden `size_t` length
//! per CHARACTER argument appended at the end.
//!
//! Each routine is looked up independently. A library that exports only part
//! of BLAS still loads; calling a missing routine fails with
//! [`NetlibError::Unsupported`] and [`Capabilities`] reports it as absent.

use std::collections::HashSet;

use netlib_core::{
    CandidateError, MatrixView, MatrixViewMut, NativeConfig, NativeLibrary, NetlibError, Platform, Result, Routine,
    StridedView, StridedViewMut,
};

use crate::flags::{Diag, Side, Transpose, Uplo};
use crate::kernel::{BlasElement, BlasKernel, BlasKernels, BlasRoutine, Capabilities};

/// Fortran INTEGER
type Int = i32;
/// Hidden length of a CHARACTER argument
type Len = usize;
/// Every flag is a single character
const FLAG_LEN: Len = 1;

// Dimensions and strides reaching a kernel were validated from `i32` arguments.
#[inline(always)]
fn int(value: usize) -> Int {
    value as Int
}

#[inline(always)]
fn inc(value: isize) -> Int {
    value as Int
}

#[inline(always)]
fn present<F>(function: Option<F>, routine: Routine) -> Result<F> {
    function.ok_or(NetlibError::unsupported(routine))
}

// Level 1
type AsumFn<T> = unsafe extern "C" fn(*const Int, *const T, *const Int) -> T;
type AxpyFn<T> = unsafe extern "C" fn(*const Int, *const T, *const T, *const Int, *mut T, *const Int);
type CopyFn<T> = unsafe extern "C" fn(*const Int, *const T, *const Int, *mut T, *const Int);
type DotFn<T> = unsafe extern "C" fn(*const Int, *const T, *const Int, *const T, *const Int) -> T;
type RotFn<T> = unsafe extern "C" fn(*const Int, *mut T, *const Int, *mut T, *const Int, *const T, *const T);
type RotgFn<T> = unsafe extern "C" fn(*mut T, *mut T, *mut T, *mut T);
type RotmFn<T> = unsafe extern "C" fn(*const Int, *mut T, *const Int, *mut T, *const Int, *const T);
type RotmgFn<T> = unsafe extern "C" fn(*mut T, *mut T, *mut T, *const T, *mut T);
type ScalFn<T> = unsafe extern "C" fn(*const Int, *const T, *mut T, *const Int);
type SwapFn<T> = unsafe extern "C" fn(*const Int, *mut T, *const Int, *mut T, *const Int);
type IamaxFn<T> = unsafe extern "C" fn(*const Int, *const T, *const Int) -> Int;
type SdsdotFn = unsafe extern "C" fn(*const Int, *const f32, *const f32, *const Int, *const f32, *const Int) -> f32;
type DsdotFn = unsafe extern "C" fn(*const Int, *const f32, *const Int, *const f32, *const Int) -> f64;

// Level 2
type GemvFn<T> = unsafe extern "C" fn(
    *const u8, *const Int, *const Int, *const T, *const T, *const Int, *const T, *const Int, *const T, *mut T,
    *const Int, Len,
);
type GbmvFn<T> = unsafe extern "C" fn(
    *const u8, *const Int, *const Int, *const Int, *const Int, *const T, *const T, *const Int, *const T,
    *const Int, *const T, *mut T, *const Int, Len,
);
type GerFn<T> =
    unsafe extern "C" fn(*const Int, *const Int, *const T, *const T, *const Int, *const T, *const Int, *mut T, *const Int);
type SymvFn<T> = unsafe extern "C" fn(
    *const u8, *const Int, *const T, *const T, *const Int, *const T, *const Int, *const T, *mut T, *const Int, Len,
);
type SbmvFn<T> = unsafe extern "C" fn(
    *const u8, *const Int, *const Int, *const T, *const T, *const Int, *const T, *const Int, *const T, *mut T,
    *const Int, Len,
);
type SpmvFn<T> = unsafe extern "C" fn(
    *const u8, *const Int, *const T, *const T, *const T, *const Int, *const T, *mut T, *const Int, Len,
);
type SprFn<T> = unsafe extern "C" fn(*const u8, *const Int, *const T, *const T, *const Int, *mut T, Len);
type Spr2Fn<T> =
    unsafe extern "C" fn(*const u8, *const Int, *const T, *const T, *const Int, *const T, *const Int, *mut T, Len);
type SyrFn<T> = unsafe extern "C" fn(*const u8, *const Int, *const T, *const T, *const Int, *mut T, *const Int, Len);
type Syr2Fn<T> = unsafe extern "C" fn(
    *const u8, *const Int, *const T, *const T, *const Int, *const T, *const Int, *mut T, *const Int, Len,
);
type TrmvFn<T> = unsafe extern "C" fn(
    *const u8, *const u8, *const u8, *const Int, *const T, *const Int, *mut T, *const Int, Len, Len, Len,
);
type TbmvFn<T> = unsafe extern "C" fn(
    *const u8, *const u8, *const u8, *const Int, *const Int, *const T, *const Int, *mut T, *const Int, Len, Len, Len,
);
type TpmvFn<T> =
    unsafe extern "C" fn(*const u8, *const u8, *const u8, *const Int, *const T, *mut T, *const Int, Len, Len, Len);

// Level 3
type GemmFn<T> = unsafe extern "C" fn(
    *const u8, *const u8, *const Int, *const Int, *const Int, *const T, *const T, *const Int, *const T, *const Int,
    *const T, *mut T, *const Int, Len, Len,
);
type SymmFn<T> = unsafe extern "C" fn(
    *const u8, *const u8, *const Int, *const Int, *const T, *const T, *const Int, *const T, *const Int, *const T,
    *mut T, *const Int, Len, Len,
);
type SyrkFn<T> = unsafe extern "C" fn(
    *const u8, *const u8, *const Int, *const Int, *const T, *const T, *const Int, *const T, *mut T, *const Int, Len,
    Len,
);
type Syr2kFn<T> = unsafe extern "C" fn(
    *const u8, *const u8, *const Int, *const Int, *const T, *const T, *const Int, *const T, *const Int, *const T,
    *mut T, *const Int, Len, Len,
);
type TrmmFn<T> = unsafe extern "C" fn(
    *const u8, *const u8, *const u8, *const u8, *const Int, *const Int, *const T, *const T, *const Int, *mut T,
    *const Int, Len, Len, Len, Len,
);

macro_rules! native_table {
    ($($field:ident: $signature:ident = $base:literal,)*) => {
        /// Symbols of one precision
        struct NativeTable<T> {
            $($field: Option<$signature<T>>,)*
            iamax: Option<IamaxFn<T>>,
        }

        impl<T: BlasElement> NativeTable<T> {
            fn load(library: &NativeLibrary) -> Self {
                // SAFETY: each signature alias is the reference BLAS interface of its symbol.
                unsafe {
                    Self {
                        $($field: library.function(&T::routine($base).symbol()),)*
                        iamax: library.function(&T::IAMAX.symbol()),
                    }
                }
            }
        }
    };
}

native_table! {
    asum: AsumFn = "ASUM",
    axpy: AxpyFn = "AXPY",
    copy: CopyFn = "COPY",
    dot: DotFn = "DOT",
    nrm2: AsumFn = "NRM2",
    rot: RotFn = "ROT",
    rotg: RotgFn = "ROTG",
    rotm: RotmFn = "ROTM",
    rotmg: RotmgFn = "ROTMG",
    scal: ScalFn = "SCAL",
    swap: SwapFn = "SWAP",
    gemv: GemvFn = "GEMV",
    gbmv: GbmvFn = "GBMV",
    ger: GerFn = "GER",
    symv: SymvFn = "SYMV",
    sbmv: SbmvFn = "SBMV",
    spmv: SpmvFn = "SPMV",
    spr: SprFn = "SPR",
    spr2: Spr2Fn = "SPR2",
    syr: SyrFn = "SYR",
    syr2: Syr2Fn = "SYR2",
    trmv: TrmvFn = "TRMV",
    trsv: TrmvFn = "TRSV",
    tbmv: TbmvFn = "TBMV",
    tbsv: TbmvFn = "TBSV",
    tpmv: TpmvFn = "TPMV",
    tpsv: TpmvFn = "TPSV",
    gemm: GemmFn = "GEMM",
    symm: SymmFn = "SYMM",
    syrk: SyrkFn = "SYRK",
    syr2k: Syr2kFn = "SYR2K",
    trmm: TrmmFn = "TRMM",
    trsm: TrmmFn = "TRSM",
}

impl<T: BlasElement> NativeTable<T> {
    fn trmv_like(
        &self,
        function: Option<TrmvFn<T>>,
        base: &'static str,
        (uplo, trans, diag): (Uplo, Transpose, Diag),
        a: MatrixView<'_, T>,
        mut x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(function, T::routine(base))?;
        let (u, t, d) = (uplo.as_char(), trans.as_char(), diag.as_char());
        let (n, lda, incx) = (int(a.rows()), int(a.ld()), inc(x.inc()));
        // SAFETY: `a` and `x` were bounds-checked for this shape.
        unsafe {
            f(&u, &t, &d, &n, a.base_ptr(), &lda, x.base_mut_ptr(), &incx, FLAG_LEN, FLAG_LEN, FLAG_LEN);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn tbmv_like(
        &self,
        function: Option<TbmvFn<T>>,
        base: &'static str,
        (uplo, trans, diag): (Uplo, Transpose, Diag),
        k: usize,
        a: MatrixView<'_, T>,
        mut x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(function, T::routine(base))?;
        let (u, t, d) = (uplo.as_char(), trans.as_char(), diag.as_char());
        let (n, k, lda, incx) = (int(a.cols()), int(k), int(a.ld()), inc(x.inc()));
        // SAFETY: `a` holds `k + 1` band rows for `n` columns and `x` holds `n` elements.
        unsafe {
            f(&u, &t, &d, &n, &k, a.base_ptr(), &lda, x.base_mut_ptr(), &incx, FLAG_LEN, FLAG_LEN, FLAG_LEN);
        }
        Ok(())
    }

    fn tpmv_like(
        &self,
        function: Option<TpmvFn<T>>,
        base: &'static str,
        (uplo, trans, diag): (Uplo, Transpose, Diag),
        n: usize,
        ap: StridedView<'_, T>,
        mut x: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(function, T::routine(base))?;
        let (u, t, d) = (uplo.as_char(), trans.as_char(), diag.as_char());
        let (n, incx) = (int(n), inc(x.inc()));
        // SAFETY: `ap` holds the packed triangle of order `n`.
        unsafe {
            f(&u, &t, &d, &n, ap.base_ptr(), x.base_mut_ptr(), &incx, FLAG_LEN, FLAG_LEN, FLAG_LEN);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn trmm_like(
        &self,
        function: Option<TrmmFn<T>>,
        base: &'static str,
        (side, uplo, transa, diag): (Side, Uplo, Transpose, Diag),
        alpha: T,
        a: MatrixView<'_, T>,
        mut b: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(function, T::routine(base))?;
        let (s, u, t, d) = (side.as_char(), uplo.as_char(), transa.as_char(), diag.as_char());
        let (m, n, lda, ldb) = (int(b.rows()), int(b.cols()), int(a.ld()), int(b.ld()));
        // SAFETY: `a` is the square triangular operand for `side` and `b` is `m x n`.
        unsafe {
            f(
                &s,
                &u,
                &t,
                &d,
                &m,
                &n,
                &alpha,
                a.base_ptr(),
                &lda,
                b.base_mut_ptr(),
                &ldb,
                FLAG_LEN,
                FLAG_LEN,
                FLAG_LEN,
                FLAG_LEN,
            );
        }
        Ok(())
    }
}

// SAFETY (all calls below): the facade validated every view against the extent
// the routine touches, so the foreign code stays inside caller-owned memory.
impl<T: BlasElement> BlasKernels<T> for NativeTable<T> {
    fn asum(&self, x: StridedView<'_, T>) -> Result<T> {
        let f = present(self.asum, T::routine("ASUM"))?;
        let (n, incx) = (int(x.len()), inc(x.inc()));
        Ok(unsafe { f(&n, x.base_ptr(), &incx) })
    }

    fn axpy(&self, alpha: T, x: StridedView<'_, T>, mut y: StridedViewMut<'_, T>) -> Result<()> {
        let f = present(self.axpy, T::routine("AXPY"))?;
        let (n, incx, incy) = (int(y.len()), inc(x.inc()), inc(y.inc()));
        unsafe { f(&n, &alpha, x.base_ptr(), &incx, y.base_mut_ptr(), &incy) };
        Ok(())
    }

    fn copy(&self, x: StridedView<'_, T>, mut y: StridedViewMut<'_, T>) -> Result<()> {
        let f = present(self.copy, T::routine("COPY"))?;
        let (n, incx, incy) = (int(y.len()), inc(x.inc()), inc(y.inc()));
        unsafe { f(&n, x.base_ptr(), &incx, y.base_mut_ptr(), &incy) };
        Ok(())
    }

    fn dot(&self, x: StridedView<'_, T>, y: StridedView<'_, T>) -> Result<T> {
        let f = present(self.dot, T::routine("DOT"))?;
        let (n, incx, incy) = (int(x.len()), inc(x.inc()), inc(y.inc()));
        Ok(unsafe { f(&n, x.base_ptr(), &incx, y.base_ptr(), &incy) })
    }

    fn nrm2(&self, x: StridedView<'_, T>) -> Result<T> {
        let f = present(self.nrm2, T::routine("NRM2"))?;
        let (n, incx) = (int(x.len()), inc(x.inc()));
        Ok(unsafe { f(&n, x.base_ptr(), &incx) })
    }

    fn rot(&self, mut x: StridedViewMut<'_, T>, mut y: StridedViewMut<'_, T>, c: T, s: T) -> Result<()> {
        let f = present(self.rot, T::routine("ROT"))?;
        let (n, incx, incy) = (int(x.len()), inc(x.inc()), inc(y.inc()));
        unsafe { f(&n, x.base_mut_ptr(), &incx, y.base_mut_ptr(), &incy, &c, &s) };
        Ok(())
    }

    fn rotg(&self, a: &mut T, b: &mut T, c: &mut T, s: &mut T) -> Result<()> {
        let f = present(self.rotg, T::routine("ROTG"))?;
        unsafe { f(a, b, c, s) };
        Ok(())
    }

    fn rotm(&self, mut x: StridedViewMut<'_, T>, mut y: StridedViewMut<'_, T>, param: StridedView<'_, T>) -> Result<()> {
        let f = present(self.rotm, T::routine("ROTM"))?;
        let (n, incx, incy) = (int(x.len()), inc(x.inc()), inc(y.inc()));
        unsafe { f(&n, x.base_mut_ptr(), &incx, y.base_mut_ptr(), &incy, param.base_ptr()) };
        Ok(())
    }

    fn rotmg(&self, d1: &mut T, d2: &mut T, x1: &mut T, y1: T, mut param: StridedViewMut<'_, T>) -> Result<()> {
        let f = present(self.rotmg, T::routine("ROTMG"))?;
        unsafe { f(d1, d2, x1, &y1, param.base_mut_ptr()) };
        Ok(())
    }

    fn scal(&self, alpha: T, mut x: StridedViewMut<'_, T>) -> Result<()> {
        let f = present(self.scal, T::routine("SCAL"))?;
        let (n, incx) = (int(x.len()), inc(x.inc()));
        unsafe { f(&n, &alpha, x.base_mut_ptr(), &incx) };
        Ok(())
    }

    fn swap(&self, mut x: StridedViewMut<'_, T>, mut y: StridedViewMut<'_, T>) -> Result<()> {
        let f = present(self.swap, T::routine("SWAP"))?;
        let (n, incx, incy) = (int(x.len()), inc(x.inc()), inc(y.inc()));
        unsafe { f(&n, x.base_mut_ptr(), &incx, y.base_mut_ptr(), &incy) };
        Ok(())
    }

    fn iamax(&self, x: StridedView<'_, T>) -> Result<usize> {
        let f = present(self.iamax, T::IAMAX)?;
        let (n, incx) = (int(x.len()), inc(x.inc()));
        let position = unsafe { f(&n, x.base_ptr(), &incx) };
        // Fortran positions are 1-based
        Ok(usize::try_from(position - 1).unwrap_or(0))
    }

    fn gemv(
        &self,
        trans: Transpose,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        mut y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.gemv, T::routine("GEMV"))?;
        let t = trans.as_char();
        let (m, n, lda) = (int(a.rows()), int(a.cols()), int(a.ld()));
        let (incx, incy) = (inc(x.inc()), inc(y.inc()));
        unsafe {
            f(&t, &m, &n, &alpha, a.base_ptr(), &lda, x.base_ptr(), &incx, &beta, y.base_mut_ptr(), &incy, FLAG_LEN)
        };
        Ok(())
    }

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
        mut y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.gbmv, T::routine("GBMV"))?;
        let t = trans.as_char();
        let (m, n, kl, ku, lda) = (int(m), int(a.cols()), int(kl), int(ku), int(a.ld()));
        let (incx, incy) = (inc(x.inc()), inc(y.inc()));
        unsafe {
            f(
                &t,
                &m,
                &n,
                &kl,
                &ku,
                &alpha,
                a.base_ptr(),
                &lda,
                x.base_ptr(),
                &incx,
                &beta,
                y.base_mut_ptr(),
                &incy,
                FLAG_LEN,
            )
        };
        Ok(())
    }

    fn ger(&self, alpha: T, x: StridedView<'_, T>, y: StridedView<'_, T>, mut a: MatrixViewMut<'_, T>) -> Result<()> {
        let f = present(self.ger, T::routine("GER"))?;
        let (m, n, lda) = (int(a.rows()), int(a.cols()), int(a.ld()));
        let (incx, incy) = (inc(x.inc()), inc(y.inc()));
        unsafe { f(&m, &n, &alpha, x.base_ptr(), &incx, y.base_ptr(), &incy, a.base_mut_ptr(), &lda) };
        Ok(())
    }

    fn symv(
        &self,
        uplo: Uplo,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        mut y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.symv, T::routine("SYMV"))?;
        let u = uplo.as_char();
        let (n, lda, incx, incy) = (int(a.rows()), int(a.ld()), inc(x.inc()), inc(y.inc()));
        unsafe { f(&u, &n, &alpha, a.base_ptr(), &lda, x.base_ptr(), &incx, &beta, y.base_mut_ptr(), &incy, FLAG_LEN) };
        Ok(())
    }

    fn sbmv(
        &self,
        uplo: Uplo,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        mut y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.sbmv, T::routine("SBMV"))?;
        let u = uplo.as_char();
        let (n, k, lda, incx, incy) = (int(a.cols()), int(k), int(a.ld()), inc(x.inc()), inc(y.inc()));
        unsafe {
            f(&u, &n, &k, &alpha, a.base_ptr(), &lda, x.base_ptr(), &incx, &beta, y.base_mut_ptr(), &incy, FLAG_LEN)
        };
        Ok(())
    }

    fn spmv(
        &self,
        uplo: Uplo,
        n: usize,
        alpha: T,
        ap: StridedView<'_, T>,
        x: StridedView<'_, T>,
        beta: T,
        mut y: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.spmv, T::routine("SPMV"))?;
        let u = uplo.as_char();
        let (n, incx, incy) = (int(n), inc(x.inc()), inc(y.inc()));
        unsafe { f(&u, &n, &alpha, ap.base_ptr(), x.base_ptr(), &incx, &beta, y.base_mut_ptr(), &incy, FLAG_LEN) };
        Ok(())
    }

    fn spr(&self, uplo: Uplo, n: usize, alpha: T, x: StridedView<'_, T>, mut ap: StridedViewMut<'_, T>) -> Result<()> {
        let f = present(self.spr, T::routine("SPR"))?;
        let u = uplo.as_char();
        let (n, incx) = (int(n), inc(x.inc()));
        unsafe { f(&u, &n, &alpha, x.base_ptr(), &incx, ap.base_mut_ptr(), FLAG_LEN) };
        Ok(())
    }

    fn spr2(
        &self,
        uplo: Uplo,
        n: usize,
        alpha: T,
        x: StridedView<'_, T>,
        y: StridedView<'_, T>,
        mut ap: StridedViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.spr2, T::routine("SPR2"))?;
        let u = uplo.as_char();
        let (n, incx, incy) = (int(n), inc(x.inc()), inc(y.inc()));
        unsafe { f(&u, &n, &alpha, x.base_ptr(), &incx, y.base_ptr(), &incy, ap.base_mut_ptr(), FLAG_LEN) };
        Ok(())
    }

    fn syr(&self, uplo: Uplo, alpha: T, x: StridedView<'_, T>, mut a: MatrixViewMut<'_, T>) -> Result<()> {
        let f = present(self.syr, T::routine("SYR"))?;
        let u = uplo.as_char();
        let (n, lda, incx) = (int(a.rows()), int(a.ld()), inc(x.inc()));
        unsafe { f(&u, &n, &alpha, x.base_ptr(), &incx, a.base_mut_ptr(), &lda, FLAG_LEN) };
        Ok(())
    }

    fn syr2(
        &self,
        uplo: Uplo,
        alpha: T,
        x: StridedView<'_, T>,
        y: StridedView<'_, T>,
        mut a: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.syr2, T::routine("SYR2"))?;
        let u = uplo.as_char();
        let (n, lda, incx, incy) = (int(a.rows()), int(a.ld()), inc(x.inc()), inc(y.inc()));
        unsafe { f(&u, &n, &alpha, x.base_ptr(), &incx, y.base_ptr(), &incy, a.base_mut_ptr(), &lda, FLAG_LEN) };
        Ok(())
    }

    fn trmv(&self, uplo: Uplo, trans: Transpose, diag: Diag, a: MatrixView<'_, T>, x: StridedViewMut<'_, T>) -> Result<()> {
        self.trmv_like(self.trmv, "TRMV", (uplo, trans, diag), a, x)
    }

    fn trsv(&self, uplo: Uplo, trans: Transpose, diag: Diag, a: MatrixView<'_, T>, x: StridedViewMut<'_, T>) -> Result<()> {
        self.trmv_like(self.trsv, "TRSV", (uplo, trans, diag), a, x)
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
        self.tbmv_like(self.tbmv, "TBMV", (uplo, trans, diag), k, a, x)
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
        self.tbmv_like(self.tbsv, "TBSV", (uplo, trans, diag), k, a, x)
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
        self.tpmv_like(self.tpmv, "TPMV", (uplo, trans, diag), n, ap, x)
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
        self.tpmv_like(self.tpsv, "TPSV", (uplo, trans, diag), n, ap, x)
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
    ) -> Result<()> {
        let f = present(self.gemm, T::routine("GEMM"))?;
        let (ta, tb) = (transa.as_char(), transb.as_char());
        let (m, n, k) = (int(c.rows()), int(c.cols()), int(k));
        let (lda, ldb, ldc) = (int(a.ld()), int(b.ld()), int(c.ld()));
        unsafe {
            f(
                &ta,
                &tb,
                &m,
                &n,
                &k,
                &alpha,
                a.base_ptr(),
                &lda,
                b.base_ptr(),
                &ldb,
                &beta,
                c.base_mut_ptr(),
                &ldc,
                FLAG_LEN,
                FLAG_LEN,
            )
        };
        Ok(())
    }

    fn symm(
        &self,
        side: Side,
        uplo: Uplo,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixView<'_, T>,
        beta: T,
        mut c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.symm, T::routine("SYMM"))?;
        let (s, u) = (side.as_char(), uplo.as_char());
        let (m, n) = (int(c.rows()), int(c.cols()));
        let (lda, ldb, ldc) = (int(a.ld()), int(b.ld()), int(c.ld()));
        unsafe {
            f(
                &s,
                &u,
                &m,
                &n,
                &alpha,
                a.base_ptr(),
                &lda,
                b.base_ptr(),
                &ldb,
                &beta,
                c.base_mut_ptr(),
                &ldc,
                FLAG_LEN,
                FLAG_LEN,
            )
        };
        Ok(())
    }

    fn syrk(
        &self,
        uplo: Uplo,
        trans: Transpose,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        beta: T,
        mut c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.syrk, T::routine("SYRK"))?;
        let (u, t) = (uplo.as_char(), trans.as_char());
        let (n, k, lda, ldc) = (int(c.rows()), int(k), int(a.ld()), int(c.ld()));
        unsafe { f(&u, &t, &n, &k, &alpha, a.base_ptr(), &lda, &beta, c.base_mut_ptr(), &ldc, FLAG_LEN, FLAG_LEN) };
        Ok(())
    }

    fn syr2k(
        &self,
        uplo: Uplo,
        trans: Transpose,
        k: usize,
        alpha: T,
        a: MatrixView<'_, T>,
        b: MatrixView<'_, T>,
        beta: T,
        mut c: MatrixViewMut<'_, T>,
    ) -> Result<()> {
        let f = present(self.syr2k, T::routine("SYR2K"))?;
        let (u, t) = (uplo.as_char(), trans.as_char());
        let (n, k) = (int(c.rows()), int(k));
        let (lda, ldb, ldc) = (int(a.ld()), int(b.ld()), int(c.ld()));
        unsafe {
            f(
                &u,
                &t,
                &n,
                &k,
                &alpha,
                a.base_ptr(),
                &lda,
                b.base_ptr(),
                &ldb,
                &beta,
                c.base_mut_ptr(),
                &ldc,
                FLAG_LEN,
                FLAG_LEN,
            )
        };
        Ok(())
    }

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
        self.trmm_like(self.trmm, "TRMM", (side, uplo, transa, diag), alpha, a, b)
    }

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
        self.trmm_like(self.trsm, "TRSM", (side, uplo, transa, diag), alpha, a, b)
    }
}

/// BLAS reached through a loaded shared library
pub struct NativeBridgeBlas {
    name: &'static str,
    double: NativeTable<f64>,
    single: NativeTable<f32>,
    sdsdot: Option<SdsdotFn>,
    dsdot: Option<DsdotFn>,
    exported: HashSet<BlasRoutine>,
    // Declared last so the symbol tables above never outlive the mapping.
    library: NativeLibrary,
}

impl NativeBridgeBlas {
    /// The library bundled under the resource tree for this platform
    #[tracing::instrument(skip(config), fields(resources = %config.resources_dir.display()))]
    pub fn bundled(config: &NativeConfig) -> std::result::Result<Self, CandidateError> {
        config.ensure_native_allowed()?;
        let library =
            NativeLibrary::materialize(&config.resources_dir, &Platform::current(), &config.bundled_file_name())?;
        Self::from_library("native", library)
    }

    /// Bind every BLAS symbol `library` exports.
    ///
    /// Fails only when the library exports none of them.
    pub fn from_library(name: &'static str, library: NativeLibrary) -> std::result::Result<Self, CandidateError> {
        let exported: HashSet<BlasRoutine> = BlasRoutine::ALL
            .iter()
            .copied()
            .filter(|routine| {
                // SAFETY: the pointer is only tested for presence, never called.
                unsafe { library.function::<unsafe extern "C" fn()>(&routine.routine().symbol()) }.is_some()
            })
            .collect();

        if exported.is_empty() {
            return Err(CandidateError::EmptyLibrary {
                library: library.origin().display().to_string(),
            });
        }

        let missing = BlasRoutine::ALL.len() - exported.len();
        if missing > 0 {
            tracing::debug!(
                library = %library.origin().display(),
                missing,
                "Native library lacks some BLAS routines"
            );
        }

        // SAFETY: both signatures are the reference BLAS interfaces of these symbols.
        let (sdsdot, dsdot) = unsafe {
            (
                library.function::<SdsdotFn>(&BlasRoutine::Sdsdot.routine().symbol()),
                library.function::<DsdotFn>(&BlasRoutine::Dsdot.routine().symbol()),
            )
        };

        Ok(Self {
            name,
            double: NativeTable::load(&library),
            single: NativeTable::load(&library),
            sdsdot,
            dsdot,
            exported,
            library,
        })
    }

    /// Where the library was loaded from
    pub fn origin(&self) -> &std::path::Path {
        self.library.origin()
    }
}

impl std::fmt::Debug for NativeBridgeBlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeBridgeBlas")
            .field("name", &self.name)
            .field("origin", &self.library.origin())
            .field("exported", &self.exported.len())
            .finish()
    }
}

impl Capabilities for NativeBridgeBlas {
    fn has(&self, routine: BlasRoutine) -> bool {
        self.exported.contains(&routine)
    }
}

impl BlasKernel for NativeBridgeBlas {
    fn name(&self) -> &'static str {
        self.name
    }

    fn f64_kernels(&self) -> &dyn BlasKernels<f64> {
        &self.double
    }

    fn f32_kernels(&self) -> &dyn BlasKernels<f32> {
        &self.single
    }

    fn sdsdot(&self, sb: f32, x: StridedView<'_, f32>, y: StridedView<'_, f32>) -> Result<f32> {
        let f = present(self.sdsdot, BlasRoutine::Sdsdot.routine())?;
        let (n, incx, incy) = (int(x.len()), inc(x.inc()), inc(y.inc()));
        // SAFETY: both views were bounds-checked for `n` elements.
        Ok(unsafe { f(&n, &sb, x.base_ptr(), &incx, y.base_ptr(), &incy) })
    }

    fn dsdot(&self, x: StridedView<'_, f32>, y: StridedView<'_, f32>) -> Result<f64> {
        let f = present(self.dsdot, BlasRoutine::Dsdot.routine())?;
        let (n, incx, incy) = (int(x.len()), inc(x.inc()), inc(y.inc()));
        // SAFETY: as above.
        Ok(unsafe { f(&n, x.base_ptr(), &incx, y.base_ptr(), &incy) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_symbol_is_unsupported() {
        let err = present::<AsumFn<f64>>(None, Routine::new('D', "ASUM")).unwrap_err();
        assert_eq!(err, NetlibError::unsupported(Routine::new('D', "ASUM")));
    }

    #[test]
    fn bundled_bridge_without_resources_fails_to_materialize() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NativeConfig::new("NETLIB_BLAS", "libblas.so.3", "netlib-blas");
        config.resources_dir = dir.path().to_path_buf();
        assert!(matches!(
            NativeBridgeBlas::bundled(&config),
            Err(CandidateError::Materialize { .. })
        ));
    }

    #[test]
    fn disabled_native_fails_before_touching_disk() {
        let mut config = NativeConfig::new("NETLIB_BLAS", "libblas.so.3", "netlib-blas");
        config.allow_native = false;
        assert!(matches!(
            NativeBridgeBlas::bundled(&config),
            Err(CandidateError::NativeDisabled { .. })
        ));
    }
}
