//! Sparse level 1 entry points
//!
//! A compressed vector is `n` values in `x` with their dense positions in
//! `indx`. Positions are 0-based and relative to the offset of the dense
//! operand; they need not be sorted or distinct.
//!
//! `n <= 0` returns before anything is looked at. Otherwise buffers are
//! checked for presence, then the `x` and `indx` spans, then every entry of
//! `indx`: a negative entry is illegal at the `indx` position, and the largest
//! entry must fit the dense operand.

#![allow(clippy::too_many_arguments)]

use netlib_core::validate::{check_span, require, require_mut};
use netlib_core::view::check_last_index;
use netlib_core::{Contract, Result};

use super::{packed_len, Blas};
use crate::flags::Uplo;
use crate::kernel::BlasElement;

/// Largest entry of a checked `indx` window, failing at `position` on a negative one
fn largest_index(contract: &Contract, position: u32, indx: &[i32]) -> Result<usize> {
    let mut largest = 0;
    for &index in indx {
        largest = largest.max(contract.dimension(position, index)?);
    }
    Ok(largest)
}

/// Window of `n` elements at `offset`
#[inline]
fn span<T>(buffer: &[T], offset: usize, n: usize) -> Result<&[T]> {
    check_span(offset, n, buffer.len())?;
    Ok(&buffer[offset..offset + n])
}

/// Dense window starting at `offset` that holds position `offset + largest`
#[inline]
fn dense<T>(buffer: &[T], offset: usize, largest: usize) -> Result<&[T]> {
    check_last_index(Some(offset.saturating_add(largest)), buffer.len())?;
    Ok(&buffer[offset..])
}

#[inline]
fn dense_mut<T>(buffer: &mut [T], offset: usize, largest: usize) -> Result<&mut [T]> {
    check_last_index(Some(offset.saturating_add(largest)), buffer.len())?;
    Ok(&mut buffer[offset..])
}

impl Blas {
    /// `y[indx[i]] += alpha·x[i]`
    pub fn axpyi<T: BlasElement>(&self, n: i32, alpha: T, x: &[T], indx: &[i32], y: &mut [T]) -> Result<()> {
        self.axpyi_at(n, alpha, Some(x), 0, Some(indx), 0, Some(y), 0)
    }

    pub fn axpyi_at<T: BlasElement>(
        &self,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        indx: Option<&[i32]>,
        offindx: usize,
        y: Option<&mut [T]>,
        offy: usize,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let contract = Contract::new(T::routine("AXPYI"));
        let x = require("x", x)?;
        let indx = require("indx", indx)?;
        let y = require_mut("y", y)?;
        let x = span(x, offx, n)?;
        let indx = span(indx, offindx, n)?;
        let largest = largest_index(&contract, 4, indx)?;
        let y = dense_mut(y, offy, largest)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().axpyi(alpha, x, indx, y)
    }

    /// `Σ x[i]·y[indx[i]]`
    pub fn doti<T: BlasElement>(&self, n: i32, x: &[T], indx: &[i32], y: &[T]) -> Result<T> {
        self.doti_at(n, Some(x), 0, Some(indx), 0, Some(y), 0)
    }

    pub fn doti_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&[T]>,
        offx: usize,
        indx: Option<&[i32]>,
        offindx: usize,
        y: Option<&[T]>,
        offy: usize,
    ) -> Result<T> {
        if n <= 0 {
            return Ok(T::zero());
        }
        let n = n as usize;
        let contract = Contract::new(T::routine("DOTI"));
        let x = require("x", x)?;
        let indx = require("indx", indx)?;
        let y = require("y", y)?;
        let x = span(x, offx, n)?;
        let indx = span(indx, offindx, n)?;
        let largest = largest_index(&contract, 3, indx)?;
        let y = dense(y, offy, largest)?;
        self.kernels::<T>().doti(x, indx, y)
    }

    /// Dot product of two compressed vectors, matched on their indices
    pub fn dotii<T: BlasElement>(&self, n: i32, x: &[T], indx: &[i32], y: &[T], indy: &[i32]) -> Result<T> {
        self.dotii_at(n, Some(x), 0, Some(indx), 0, Some(y), 0, Some(indy), 0)
    }

    /// Both index arrays only name positions to match, so any value is legal
    pub fn dotii_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&[T]>,
        offx: usize,
        indx: Option<&[i32]>,
        offindx: usize,
        y: Option<&[T]>,
        offy: usize,
        indy: Option<&[i32]>,
        offindy: usize,
    ) -> Result<T> {
        if n <= 0 {
            return Ok(T::zero());
        }
        let n = n as usize;
        let x = require("x", x)?;
        let indx = require("indx", indx)?;
        let y = require("y", y)?;
        let indy = require("indy", indy)?;
        let x = span(x, offx, n)?;
        let indx = span(indx, offindx, n)?;
        let y = span(y, offy, n)?;
        let indy = span(indy, offindy, n)?;
        self.kernels::<T>().dotii(x, indx, y, indy)
    }

    /// Scatter `y[indx[i]] = x[i]`
    pub fn copyi<T: BlasElement>(&self, n: i32, x: &[T], indx: &[i32], y: &mut [T]) -> Result<()> {
        self.copyi_at(n, Some(x), 0, Some(indx), 0, Some(y), 0)
    }

    pub fn copyi_at<T: BlasElement>(
        &self,
        n: i32,
        x: Option<&[T]>,
        offx: usize,
        indx: Option<&[i32]>,
        offindx: usize,
        y: Option<&mut [T]>,
        offy: usize,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let contract = Contract::new(T::routine("COPYI"));
        let x = require("x", x)?;
        let indx = require("indx", indx)?;
        let y = require_mut("y", y)?;
        let x = span(x, offx, n)?;
        let indx = span(indx, offindx, n)?;
        let largest = largest_index(&contract, 3, indx)?;
        let y = dense_mut(y, offy, largest)?;
        self.kernels::<T>().copyi(x, indx, y)
    }

    /// Packed symmetric rank-1 update `A += alpha·x·xᵀ` with a compressed `x`.
    ///
    /// There is no order argument, so `A` is packed in a form that does not
    /// depend on it: `U` is the upper triangle by columns and `L` the lower
    /// triangle by rows. Position `k` on the diagonal sits at `k(k+3)/2`.
    pub fn spri<T: BlasElement>(&self, uplo: &str, n: i32, alpha: T, x: &[T], indx: &[i32], a: &mut [T]) -> Result<()> {
        self.spri_at(uplo, n, alpha, Some(x), 0, Some(indx), 0, Some(a), 0)
    }

    pub fn spri_at<T: BlasElement>(
        &self,
        uplo: &str,
        n: i32,
        alpha: T,
        x: Option<&[T]>,
        offx: usize,
        indx: Option<&[i32]>,
        offindx: usize,
        a: Option<&mut [T]>,
        offa: usize,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SPRI"));
        let uplo = contract.flag(1, Uplo::parse(uplo))?;
        if n <= 0 {
            return Ok(());
        }
        let n = n as usize;
        let x = require("x", x)?;
        let indx = require("indx", indx)?;
        let a = require_mut("a", a)?;
        let x = span(x, offx, n)?;
        let indx = span(indx, offindx, n)?;
        let largest = largest_index(&contract, 5, indx)?;
        // The stored element furthest in is the last diagonal one
        let a = dense_mut(a, offa, packed_len(largest.saturating_add(1)) - 1)?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.kernels::<T>().spri(uplo, alpha, x, indx, a)
    }
}
