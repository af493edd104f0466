//! Floating-point element types accepted by the facades

use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use num_traits::{Float, FromPrimitive};

use crate::error::Routine;

/// Real scalar type of a BLAS/ARPACK routine.
///
/// `f64` maps to the `D` routines and `f32` to the `S` routines. Elements
/// cross the native boundary by pointer, hence the `Pod` bound.
pub trait Real:
    Float
    + FromPrimitive
    + bytemuck::Pod
    + Default
    + fmt::Debug
    + fmt::Display
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Sum
    + Send
    + Sync
    + 'static
{
    /// Fortran precision prefix
    const PREFIX: char;

    /// Name of `base` for this precision, e.g. `f64::routine("GEMM")` is `DGEMM`
    fn routine(base: &'static str) -> Routine {
        Routine::new(Self::PREFIX, base)
    }

    /// Convert a literal; values outside the range saturate to infinity
    fn lit(value: f64) -> Self;

    fn widen(self) -> f64;
}

impl Real for f64 {
    const PREFIX: char = 'D';

    #[inline(always)]
    fn lit(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn widen(self) -> f64 {
        self
    }
}

impl Real for f32 {
    const PREFIX: char = 'S';

    #[inline(always)]
    fn lit(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn widen(self) -> f64 {
        self as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_follow_precision() {
        assert_eq!(f64::routine("SCAL").to_string(), "DSCAL");
        assert_eq!(f32::routine("SCAL").to_string(), "SSCAL");
    }

    #[test]
    fn literal_conversion() {
        assert_eq!(f32::lit(0.5), 0.5f32);
        assert_eq!(f64::lit(2.0).widen(), 2.0);
    }
}
