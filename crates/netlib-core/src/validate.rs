//! Contract validator
//!
//! Every facade routine validates in a fixed order before delegating:
//!
//! ```text
//! 1. parameter legality   (ascending Fortran argument position)
//! 2. nullness             (every buffer the call will touch)
//! 3. bounds               (extent implied by offset, count, stride or ld)
//! 4. delegate to the resolved backend
//! ```
//!
//! Two backends presented with the same illegal call therefore fail the same
//! way, even though neither runs any kernel code.

use crate::error::{NetlibError, Result, Routine};

/// Legality checks for one routine call
#[derive(Debug, Clone, Copy)]
pub struct Contract {
    routine: Routine,
}

impl Contract {
    pub const fn new(routine: Routine) -> Self {
        Self { routine }
    }

    pub fn routine(&self) -> Routine {
        self.routine
    }

    /// Fail with a parameter-legality error at `position` unless `legal`
    #[inline]
    pub fn argument(&self, position: u32, legal: bool) -> Result<()> {
        if legal {
            Ok(())
        } else {
            Err(NetlibError::illegal_argument(self.routine, position))
        }
    }

    /// Unwrap a parsed mode flag, failing at `position` when it was not recognised
    #[inline]
    pub fn flag<M>(&self, position: u32, parsed: Option<M>) -> Result<M> {
        parsed.ok_or(NetlibError::illegal_argument(self.routine, position))
    }

    /// Convert a Fortran dimension, failing at `position` when negative
    #[inline]
    pub fn dimension(&self, position: u32, value: i32) -> Result<usize> {
        usize::try_from(value).map_err(|_| NetlibError::illegal_argument(self.routine, position))
    }

    /// Convert a leading dimension, failing at `position` when below `minimum`
    #[inline]
    pub fn leading(&self, position: u32, ld: i32, minimum: usize) -> Result<usize> {
        match usize::try_from(ld) {
            Ok(ld) if ld >= minimum => Ok(ld),
            _ => Err(NetlibError::illegal_argument(self.routine, position)),
        }
    }

    /// Check that a stride is nonzero
    #[inline]
    pub fn increment(&self, position: u32, inc: i32) -> Result<isize> {
        self.argument(position, inc != 0)?;
        Ok(inc as isize)
    }
}

/// Nullness check for a required read-only buffer
#[inline]
pub fn require<'a, T>(name: &'static str, buffer: Option<&'a [T]>) -> Result<&'a [T]> {
    buffer.ok_or(NetlibError::null_buffer(name))
}

/// Nullness check for a required mutable buffer
#[inline]
pub fn require_mut<'a, T>(name: &'static str, buffer: Option<&'a mut [T]>) -> Result<&'a mut [T]> {
    buffer.ok_or(NetlibError::null_buffer(name))
}

/// Nullness check that only applies when the call will touch the buffer.
///
/// An untouched absent buffer becomes an empty slice so that zero-extent
/// views can still be built over it.
#[inline]
pub fn require_if<'a, T>(touched: bool, name: &'static str, buffer: Option<&'a [T]>) -> Result<&'a [T]> {
    match buffer {
        Some(buffer) => Ok(buffer),
        None if touched => Err(NetlibError::null_buffer(name)),
        None => Ok(&[]),
    }
}

/// Mutable counterpart of [`require_if`]
#[inline]
pub fn require_mut_if<'a, T>(
    touched: bool,
    name: &'static str,
    buffer: Option<&'a mut [T]>,
) -> Result<&'a mut [T]> {
    match buffer {
        Some(buffer) => Ok(buffer),
        None if touched => Err(NetlibError::null_buffer(name)),
        None => Ok(&mut []),
    }
}

/// Bounds check of a required element count starting at `offset`
#[inline]
pub fn check_span(offset: usize, count: usize, length: usize) -> Result<()> {
    crate::view::check_last_index(crate::view::vector_last_index(count, offset, 1), length)
}

/// BLAS `LSAME`: a single character, compared case-insensitively
#[inline]
pub fn lsame(ca: &str, cb: char) -> bool {
    let mut chars = ca.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&cb))
}

/// ARPACK option comparison: the whole word, case-insensitively
#[inline]
pub fn lsame_word(ca: &str, cb: &str) -> bool {
    ca.eq_ignore_ascii_case(cb)
}
