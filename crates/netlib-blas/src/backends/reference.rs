//! Terminal managed backend

use netlib_core::Real;

use crate::kernel::{BlasKernel, BlasKernels, BlasRoutine, Capabilities};

/// Reference BLAS loops; always constructible
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBlas;

impl ReferenceBlas {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Real> BlasKernels<T> for ReferenceBlas {}

impl Capabilities for ReferenceBlas {
    fn has(&self, _routine: BlasRoutine) -> bool {
        true
    }
}

impl BlasKernel for ReferenceBlas {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn f64_kernels(&self) -> &dyn BlasKernels<f64> {
        self
    }

    fn f32_kernels(&self) -> &dyn BlasKernels<f32> {
        self
    }
}
