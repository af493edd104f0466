//! Utility entry points
//!
//! A negative size is illegal at its position and a zero size returns at
//! once. `iset` also returns at once for a non-positive stride, the way
//! ARPACK's loop does; the other integer routines accept any stride.

use netlib_core::validate::{check_span, require, require_mut, require_mut_if};
use netlib_core::{Contract, MatrixViewMut, Result, StridedView, StridedViewMut};

use super::Arpack;
use crate::flags::Which;
use crate::kernel::{ArpackElement, ArpackRoutine};

fn slice<T>(buffer: &[T], offset: usize, count: usize) -> Result<&[T]> {
    if count == 0 {
        return Ok(&[]);
    }
    check_span(offset, count, buffer.len())?;
    Ok(&buffer[offset..offset + count])
}

fn slice_mut<T>(buffer: &mut [T], offset: usize, count: usize) -> Result<&mut [T]> {
    if count == 0 {
        return Ok(&mut []);
    }
    check_span(offset, count, buffer.len())?;
    Ok(&mut buffer[offset..offset + count])
}

#[inline]
fn integer(routine: ArpackRoutine) -> Contract {
    Contract::new(routine.routine())
}

impl Arpack {
    /// Number of Ritz values whose error bound is within
    /// `tol·max(eps^(2/3), |ritz|)`
    pub fn sconv<T: ArpackElement>(&self, n: i32, ritz: &[T], bounds: &[T], tol: T) -> Result<usize> {
        self.sconv_at(n, Some(ritz), 0, Some(bounds), 0, tol)
    }

    pub fn sconv_at<T: ArpackElement>(
        &self,
        n: i32,
        ritz: Option<&[T]>,
        offritz: usize,
        bounds: Option<&[T]>,
        offbounds: usize,
        tol: T,
    ) -> Result<usize> {
        let contract = Contract::new(T::routine("SCONV"));
        let n = contract.dimension(1, n)?;
        if n == 0 {
            return Ok(0);
        }
        let ritz = require("ritz", ritz)?;
        let bounds = require("bounds", bounds)?;
        let ritz = slice(ritz, offritz, n)?;
        let bounds = slice(bounds, offbounds, n)?;
        self.kernels::<T>().sconv(ritz, bounds, tol)
    }

    /// Sort `x1` so the values `which` prefers come last, permuting `x2`
    /// alongside when `apply` is set
    pub fn sortr<T: ArpackElement>(&self, which: &str, apply: bool, n: i32, x1: &mut [T], x2: &mut [T]) -> Result<()> {
        self.sortr_at(which, apply, n, Some(x1), 0, Some(x2), 0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn sortr_at<T: ArpackElement>(
        &self,
        which: &str,
        apply: bool,
        n: i32,
        x1: Option<&mut [T]>,
        offx1: usize,
        x2: Option<&mut [T]>,
        offx2: usize,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SORTR"));
        let which = contract.flag(1, Which::parse_sort(which))?;
        let n = contract.dimension(3, n)?;
        if n == 0 {
            return Ok(());
        }
        let x1 = require_mut("x1", x1)?;
        let x2 = require_mut_if(apply, "x2", x2)?;
        let x1 = slice_mut(x1, offx1, n)?;
        let x2 = slice_mut(x2, offx2, if apply { n } else { 0 })?;
        self.kernels::<T>().sortr(which, apply, x1, x2)
    }

    /// Sort `x` like [`sortr`](Self::sortr), permuting the columns of the
    /// `na x n` matrix `a` when `apply` is set
    #[allow(clippy::too_many_arguments)]
    pub fn sesrt<T: ArpackElement>(
        &self,
        which: &str,
        apply: bool,
        n: i32,
        x: &mut [T],
        na: i32,
        a: &mut [T],
        lda: i32,
    ) -> Result<()> {
        self.sesrt_at(which, apply, n, Some(x), 0, na, Some(a), 0, lda)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn sesrt_at<T: ArpackElement>(
        &self,
        which: &str,
        apply: bool,
        n: i32,
        x: Option<&mut [T]>,
        offx: usize,
        na: i32,
        a: Option<&mut [T]>,
        offa: usize,
        lda: i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SESRT"));
        let which = contract.flag(1, Which::parse_sort(which))?;
        let n = contract.dimension(3, n)?;
        let na = contract.dimension(5, na)?;
        let lda = contract.leading(7, lda, na.max(1))?;
        if n == 0 {
            return Ok(());
        }
        let permuted = apply && na > 0;
        let x = require_mut("x", x)?;
        let a = require_mut_if(permuted, "a", a)?;
        let x = slice_mut(x, offx, n)?;
        let a = MatrixViewMut::new(a, offa, na, if permuted { n } else { 0 }, lda)?;
        self.kernels::<T>().sesrt(which, apply, x, a)
    }

    /// Eigenvalues of the symmetric tridiagonal `(d, e)` in ascending order
    /// and the last component of each eigenvector in `z`.
    ///
    /// `e` holds `n - 1` couplings, `work` at least `max(1, 2n - 2)`
    /// elements. Returns 0, or the number of couplings left unconverged.
    pub fn stqrb<T: ArpackElement>(&self, n: i32, d: &mut [T], e: &mut [T], z: &mut [T], work: &mut [T]) -> Result<i32> {
        self.stqrb_at(n, Some(d), 0, Some(e), 0, Some(z), 0, Some(work), 0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn stqrb_at<T: ArpackElement>(
        &self,
        n: i32,
        d: Option<&mut [T]>,
        offd: usize,
        e: Option<&mut [T]>,
        offe: usize,
        z: Option<&mut [T]>,
        offz: usize,
        work: Option<&mut [T]>,
        offwork: usize,
    ) -> Result<i32> {
        let contract = Contract::new(T::routine("STQRB"));
        let n = contract.dimension(1, n)?;
        if n == 0 {
            return Ok(0);
        }
        let d = require_mut("d", d)?;
        let e = require_mut_if(n > 1, "e", e)?;
        let z = require_mut("z", z)?;
        let work = require_mut("work", work)?;
        let d = slice_mut(d, offd, n)?;
        let e = slice_mut(e, offe, n - 1)?;
        let z = slice_mut(z, offz, n)?;
        let work = slice_mut(work, offwork, (2 * n - 2).max(1))?;
        self.kernels::<T>().stqrb(d, e, z, work)
    }

    /// Number of the `n` leading elements of `array` equal to `value`
    pub fn icnteq(&self, n: i32, array: &[i32], value: i32) -> Result<usize> {
        self.icnteq_at(n, Some(array), 0, value)
    }

    pub fn icnteq_at(&self, n: i32, array: Option<&[i32]>, offarray: usize, value: i32) -> Result<usize> {
        let n = integer(ArpackRoutine::Icnteq).dimension(1, n)?;
        if n == 0 {
            return Ok(0);
        }
        let array = require("array", array)?;
        let array = StridedView::new(array, offarray, n, 1)?;
        self.kernel.icnteq(array, value)
    }

    /// `ly := lx`
    pub fn icopy(&self, n: i32, lx: &[i32], incx: i32, ly: &mut [i32], incy: i32) -> Result<()> {
        self.icopy_at(n, Some(lx), 0, incx, Some(ly), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn icopy_at(
        &self,
        n: i32,
        lx: Option<&[i32]>,
        offx: usize,
        incx: i32,
        ly: Option<&mut [i32]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        let n = integer(ArpackRoutine::Icopy).dimension(1, n)?;
        if n == 0 {
            return Ok(());
        }
        let lx = require("lx", lx)?;
        let ly = require_mut("ly", ly)?;
        let x = StridedView::new(lx, offx, n, incx as isize)?;
        let y = StridedViewMut::new(ly, offy, n, incy as isize)?;
        self.kernel.icopy(x, y)
    }

    /// Set `n` elements of `array`, `inc` apart, to `value`
    pub fn iset(&self, n: i32, value: i32, array: &mut [i32], inc: i32) -> Result<()> {
        self.iset_at(n, value, Some(array), 0, inc)
    }

    pub fn iset_at(&self, n: i32, value: i32, array: Option<&mut [i32]>, offarray: usize, inc: i32) -> Result<()> {
        let n = integer(ArpackRoutine::Iset).dimension(1, n)?;
        if n == 0 || inc <= 0 {
            return Ok(());
        }
        let array = require_mut("array", array)?;
        let array = StridedViewMut::new(array, offarray, n, inc as isize)?;
        self.kernel.iset(value, array)
    }

    /// Exchange `sx` and `sy`
    pub fn iswap(&self, n: i32, sx: &mut [i32], incx: i32, sy: &mut [i32], incy: i32) -> Result<()> {
        self.iswap_at(n, Some(sx), 0, incx, Some(sy), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn iswap_at(
        &self,
        n: i32,
        sx: Option<&mut [i32]>,
        offx: usize,
        incx: i32,
        sy: Option<&mut [i32]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        let n = integer(ArpackRoutine::Iswap).dimension(1, n)?;
        if n == 0 {
            return Ok(());
        }
        let sx = require_mut("sx", sx)?;
        let sy = require_mut("sy", sy)?;
        let x = StridedViewMut::new(sx, offx, n, incx as isize)?;
        let y = StridedViewMut::new(sy, offy, n, incy as isize)?;
        self.kernel.iswap(x, y)
    }
}
