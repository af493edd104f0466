//! Level 1 entry points
//!
//! Level 1 routines have no illegal parameter values: `n <= 0` returns
//! immediately, and so does a non-positive stride for the single-vector
//! reductions and `scal`. Two-vector routines take any stride, including a
//! zero stride that reads the same element repeatedly.

use netlib_core::validate::{require, require_mut};
use netlib_core::{Result, StridedView, StridedViewMut};

use super::Blas;
use crate::kernel::BlasElement;

/// Elements of a `rotm`/`rotmg` parameter block
const PARAM_LEN: usize = 5;

impl Blas {
    /// Sum of absolute values
    pub fn asum<T: BlasElement>(&self, n: i32, x: &[T], incx: i32) -> Result<T> {
        self.asum_at(n, Some(x), 0, incx)
    }

    pub fn asum_at<T: BlasElement>(&self, n: i32, x: Option<&[T]>, offx: usize, incx: i32) -> Result<T> {
        if n <= 0 || incx <= 0 {
            return Ok(T::zero());
        }
        let x = require("x", x)?;
        let x = StridedView::new(x, offx, n as usize, incx as isize)?;
        self.kernels::<T>().asum(x)
    }

    /// `y := alpha·x + y`
    pub fn axpy<T: BlasElement>(&self, n: i32, alpha: T, x: &[T], incx: i32, y: &mut [T], incy: i32) -> Result<()> {
        self.axpy_at(n, alpha, Some(x), 0, incx, Some(y), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn axpy_at<T: BlasElement>(
        &self,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let x = require("x", x)?;
        let y = require_mut("y", y)?;
        let x = StridedView::new(x, offx, n, incx as isize)?;
        let y = StridedViewMut::new(y, offy, n, incy as isize)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().axpy(alpha, x, y)
    }

    pub fn copy<T: BlasElement>(&self, n: i32, x: &[T], incx: i32, y: &mut [T], incy: i32) -> Result<()> {
        self.copy_at(n, Some(x), 0, incx, Some(y), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn copy_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let x = require("x", x)?;
        let y = require_mut("y", y)?;
        let x = StridedView::new(x, offx, n, incx as isize)?;
        let y = StridedViewMut::new(y, offy, n, incy as isize)?;
        self.kernels::<T>().copy(x, y)
    }

    pub fn dot<T: BlasElement>(&self, n: i32, x: &[T], incx: i32, y: &[T], incy: i32) -> Result<T> {
        self.dot_at(n, Some(x), 0, incx, Some(y), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn dot_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&[T]>,
        offx: usize,
        incx: i32,
        y: Option<&[T]>,
        offy: usize,
        incy: i32,
    ) -> Result<T> {
        if n <= 0 {
            return Ok(T::zero());
        }
        let n = n as usize;
        let x = require("x", x)?;
        let y = require("y", y)?;
        let x = StridedView::new(x, offx, n, incx as isize)?;
        let y = StridedView::new(y, offy, n, incy as isize)?;
        self.kernels::<T>().dot(x, y)
    }

    /// `sb + x·y` of single-precision vectors, accumulated in double precision
    pub fn sdsdot(&self, n: i32, sb: f32, x: &[f32], incx: i32, y: &[f32], incy: i32) -> Result<f32> {
        self.sdsdot_at(n, sb, Some(x), 0, incx, Some(y), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn sdsdot_at(
        &self,
        n: i32,
        sb: f32,
        x: Option<&[f32]>,
        offx: usize,
        incx: i32,
        y: Option<&[f32]>,
        offy: usize,
        incy: i32,
    ) -> Result<f32> {
        if n <= 0 {
            return Ok(sb);
        }
        let n = n as usize;
        let x = require("x", x)?;
        let y = require("y", y)?;
        let x = StridedView::new(x, offx, n, incx as isize)?;
        let y = StridedView::new(y, offy, n, incy as isize)?;
        self.kernel.sdsdot(sb, x, y)
    }

    /// `x·y` of single-precision vectors, accumulated and returned in double precision
    pub fn dsdot(&self, n: i32, x: &[f32], incx: i32, y: &[f32], incy: i32) -> Result<f64> {
        self.dsdot_at(n, Some(x), 0, incx, Some(y), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn dsdot_at(
        &self,
        n: i32,
        x: Option<&[f32]>,
        offx: usize,
        incx: i32,
        y: Option<&[f32]>,
        offy: usize,
        incy: i32,
    ) -> Result<f64> {
        if n <= 0 {
            return Ok(0.0);
        }
        let n = n as usize;
        let x = require("x", x)?;
        let y = require("y", y)?;
        let x = StridedView::new(x, offx, n, incx as isize)?;
        let y = StridedView::new(y, offy, n, incy as isize)?;
        self.kernel.dsdot(x, y)
    }

    /// Euclidean norm
    pub fn nrm2<T: BlasElement>(&self, n: i32, x: &[T], incx: i32) -> Result<T> {
        self.nrm2_at(n, Some(x), 0, incx)
    }

    pub fn nrm2_at<T: BlasElement>(&self, n: i32, x: Option<&[T]>, offx: usize, incx: i32) -> Result<T> {
        if n <= 0 || incx <= 0 {
            return Ok(T::zero());
        }
        let x = require("x", x)?;
        let x = StridedView::new(x, offx, n as usize, incx as isize)?;
        self.kernels::<T>().nrm2(x)
    }

    /// Apply a plane rotation
    #[allow(clippy::too_many_arguments)]
    pub fn rot<T: BlasElement>(&self, n: i32, x: &mut [T], incx: i32, y: &mut [T], incy: i32, c: T, s: T) -> Result<()> {
        self.rot_at(n, Some(x), 0, incx, Some(y), 0, incy, c, s)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rot_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
        c: T,
        s: T,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let x = require_mut("x", x)?;
        let y = require_mut("y", y)?;
        let x = StridedViewMut::new(x, offx, n, incx as isize)?;
        let y = StridedViewMut::new(y, offy, n, incy as isize)?;
        self.kernels::<T>().rot(x, y, c, s)
    }

    /// Construct a Givens rotation; `a` receives `r` and `b` receives `z`
    pub fn rotg<T: BlasElement>(&self, a: &mut T, b: &mut T, c: &mut T, s: &mut T) -> Result<()> {
        self.kernels::<T>().rotg(a, b, c, s)
    }

    /// Apply a modified Givens transformation described by `param`
    #[allow(clippy::too_many_arguments)]
    pub fn rotm<T: BlasElement>(&self, n: i32, x: &mut [T], incx: i32, y: &mut [T], incy: i32, param: &[T]) -> Result<()> {
        self.rotm_at(n, Some(x), 0, incx, Some(y), 0, incy, Some(param), 0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rotm_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
        param: Option<&[T]>,
        offparam: usize,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let x = require_mut("x", x)?;
        let y = require_mut("y", y)?;
        let param = require("param", param)?;
        let x = StridedViewMut::new(x, offx, n, incx as isize)?;
        let y = StridedViewMut::new(y, offy, n, incy as isize)?;
        let param = StridedView::new(param, offparam, PARAM_LEN, 1)?;
        self.kernels::<T>().rotm(x, y, param)
    }

    /// Construct a modified Givens transformation into `param`
    pub fn rotmg<T: BlasElement>(&self, d1: &mut T, d2: &mut T, x1: &mut T, y1: T, param: &mut [T]) -> Result<()> {
        self.rotmg_at(d1, d2, x1, y1, Some(param), 0)
    }

    pub fn rotmg_at<T: BlasElement>(
        &self,
        d1: &mut T,
        d2: &mut T,
        x1: &mut T,
        y1: T,
        param: Option<&mut [T]>,
        offparam: usize,
    ) -> Result<()> {
        let param = require_mut("param", param)?;
        let param = StridedViewMut::new(param, offparam, PARAM_LEN, 1)?;
        self.kernels::<T>().rotmg(d1, d2, x1, y1, param)
    }

    /// `x := alpha·x`
    pub fn scal<T: BlasElement>(&self, n: i32, alpha: T, x: &mut [T], incx: i32) -> Result<()> {
        self.scal_at(n, alpha, Some(x), 0, incx)
    }

    pub fn scal_at<T: BlasElement>(&self, n: i32, alpha: T, x: Option<&mut [T]>, offx: usize, incx: i32) -> Result<()> {
        if n <= 0 || incx <= 0 {
            return Ok(());
        }
        let x = require_mut("x", x)?;
        let x = StridedViewMut::new(x, offx, n as usize, incx as isize)?;
        if alpha == T::one() {
            return Ok(());
        }
        self.kernels::<T>().scal(alpha, x)
    }

    pub fn swap<T: BlasElement>(&self, n: i32, x: &mut [T], incx: i32, y: &mut [T], incy: i32) -> Result<()> {
        self.swap_at(n, Some(x), 0, incx, Some(y), 0, incy)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn swap_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&mut [T]>,
        offx: usize,
        incx: i32,
        y: Option<&mut [T]>,
        offy: usize,
        incy: i32,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let x = require_mut("x", x)?;
        let y = require_mut("y", y)?;
        let x = StridedViewMut::new(x, offx, n, incx as isize)?;
        let y = StridedViewMut::new(y, offy, n, incy as isize)?;
        self.kernels::<T>().swap(x, y)
    }

    /// 0-based position of the first element of largest magnitude.
    ///
    /// `None` when `n <= 0` or `incx <= 0`.
    pub fn iamax<T: BlasElement>(&self, n: i32, x: &[T], incx: i32) -> Result<Option<usize>> {
        self.iamax_at(n, Some(x), 0, incx)
    }

    pub fn iamax_at<T: BlasElement>(&self, n: i32, x: Option<&[T]>, offx: usize, incx: i32) -> Result<Option<usize>> {
        if n <= 0 || incx <= 0 {
            return Ok(None);
        }
        let x = require("x", x)?;
        let x = StridedView::new(x, offx, n as usize, incx as isize)?;
        self.kernels::<T>().iamax(x).map(Some)
    }
}
