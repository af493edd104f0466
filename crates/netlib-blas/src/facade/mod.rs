//! The BLAS facade
//!
//! Every routine comes in two forms:
//!
//! - a convenience form over plain slices, offsets zero
//! - an `*_at` form over optional buffers with explicit offsets, where `None`
//!   stands for an absent buffer
//!
//! The sparse routines (`axpyi`, `doti`, `dotii`, `copyi`, `spri`) take a
//! compressed vector as a value slice plus a 0-based index slice.
//!
//! Both forms run the contract validator (legality, then nullness, then bounds)
//! before the backend sees the call, so every backend fails the same way on
//! the same illegal input.

mod level1;
mod level2;
mod level3;
mod sparse;

use std::fmt;
use std::sync::Arc;

use netlib_core::Selected;

use crate::kernel::{BlasElement, BlasKernel, BlasKernels, BlasRoutine, Capabilities};

/// Handle to a resolved BLAS backend.
///
/// Cloning is cheap; clones share the backend.
#[derive(Clone)]
pub struct Blas {
    kernel: Arc<dyn BlasKernel>,
}

impl Blas {
    pub fn new(kernel: Arc<dyn BlasKernel>) -> Self {
        Self { kernel }
    }

    pub(crate) fn from_selected(selected: Selected<dyn BlasKernel>) -> Self {
        Self::new(selected.backend)
    }

    /// Name of the backend serving this handle
    pub fn name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn kernel(&self) -> &Arc<dyn BlasKernel> {
        &self.kernel
    }

    /// Whether both handles share the same backend instance
    pub fn ptr_eq(&self, other: &Blas) -> bool {
        Arc::ptr_eq(&self.kernel, &other.kernel)
    }

    #[inline(always)]
    fn kernels<T: BlasElement>(&self) -> &dyn BlasKernels<T> {
        T::kernels(self.kernel.as_ref())
    }
}

impl Capabilities for Blas {
    fn has(&self, routine: BlasRoutine) -> bool {
        self.kernel.has(routine)
    }
}

impl fmt::Debug for Blas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blas").field("backend", &self.kernel.name()).finish()
    }
}

/// Elements of packed triangular storage of order `n`
#[inline]
fn packed_len(n: usize) -> usize {
    n.saturating_mul(n.saturating_add(1)) / 2
}
