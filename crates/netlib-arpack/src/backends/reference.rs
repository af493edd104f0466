//! Managed ARPACK backend

use crate::kernel::{ArpackElement, ArpackKernel, ArpackKernels, ArpackRoutine, Capabilities};

/// Implicitly restarted Lanczos in Rust over the managed BLAS; always
/// constructible
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceArpack;

impl ReferenceArpack {
    pub fn new() -> Self {
        Self
    }
}

impl<T: ArpackElement> ArpackKernels<T> for ReferenceArpack {}

impl Capabilities for ReferenceArpack {
    fn has(&self, _routine: ArpackRoutine) -> bool {
        true
    }
}

impl ArpackKernel for ReferenceArpack {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn f64_kernels(&self) -> &dyn ArpackKernels<f64> {
        self
    }

    fn f32_kernels(&self) -> &dyn ArpackKernels<f32> {
        self
    }
}
