//! The ARPACK facade
//!
//! Same two forms as the BLAS facade: a convenience form over plain slices
//! and an `*_at` form over optional buffers with explicit offsets. Both run
//! the contract validator before the backend sees the call.
//!
//! Scalars ARPACK passes by reference (`ido`, `tol`, `info`) are `&mut`
//! arguments, and `info` carries ARPACK's own status codes (see
//! [`codes`](crate::codes)). A `Result` error always means the call was
//! rejected before any backend code ran.

mod driver;
mod utility;

pub use driver::{workl_len, PARAM_LEN};

use std::fmt;
use std::sync::Arc;

use netlib_core::Selected;

use crate::kernel::{ArpackElement, ArpackKernel, ArpackKernels, ArpackRoutine, Capabilities};

/// Handle to a resolved ARPACK backend.
///
/// Cloning is cheap; clones share the backend.
#[derive(Clone)]
pub struct Arpack {
    kernel: Arc<dyn ArpackKernel>,
}

impl Arpack {
    pub fn new(kernel: Arc<dyn ArpackKernel>) -> Self {
        Self { kernel }
    }

    pub(crate) fn from_selected(selected: Selected<dyn ArpackKernel>) -> Self {
        Self::new(selected.backend)
    }

    /// Name of the backend serving this handle
    pub fn name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn kernel(&self) -> &Arc<dyn ArpackKernel> {
        &self.kernel
    }

    /// Whether both handles share the same backend instance
    pub fn ptr_eq(&self, other: &Arpack) -> bool {
        Arc::ptr_eq(&self.kernel, &other.kernel)
    }

    #[inline(always)]
    fn kernels<T: ArpackElement>(&self) -> &dyn ArpackKernels<T> {
        T::arpack_kernels(self.kernel.as_ref())
    }
}

impl Capabilities for Arpack {
    fn has(&self, routine: ArpackRoutine) -> bool {
        self.kernel.has(routine)
    }
}

impl fmt::Debug for Arpack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arpack").field("backend", &self.kernel.name()).finish()
    }
}
