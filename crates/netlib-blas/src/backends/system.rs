//! Alternate native bridge
//!
//! Opens whatever BLAS the system dynamic loader finds under
//! `NETLIB_BLAS_NATIVE_LIB` (default `libblas.so.3`), or the explicit
//! `NETLIB_BLAS_NATIVE_LIB_PATH`. It is located by name through the bridge
//! registry so that builds without the `system-bridge` feature simply lack it.

use std::sync::Arc;

use netlib_core::{CandidateError, NativeConfig, NativeLibrary, Result, StridedView};

use super::native::NativeBridgeBlas;
use crate::kernel::{BlasKernel, BlasKernels, BlasRoutine, Capabilities};

/// Registry name of this bridge
pub const SYSTEM_BRIDGE: &str = "system";

/// System BLAS opened by name
#[derive(Debug)]
pub struct SystemBridgeBlas {
    inner: NativeBridgeBlas,
}

impl SystemBridgeBlas {
    pub fn open(config: &NativeConfig) -> std::result::Result<Self, CandidateError> {
        config.ensure_native_allowed()?;
        let library = NativeLibrary::open_system(config.system_library())?;
        Ok(Self {
            inner: NativeBridgeBlas::from_library(SYSTEM_BRIDGE, library)?,
        })
    }

    /// [`BridgeFactory`](netlib_core::resolve::BridgeFactory) registered under [`SYSTEM_BRIDGE`]
    pub fn factory(config: &NativeConfig) -> std::result::Result<Arc<dyn BlasKernel>, CandidateError> {
        Ok(Arc::new(Self::open(config)?))
    }

    pub fn origin(&self) -> &std::path::Path {
        self.inner.origin()
    }
}

impl Capabilities for SystemBridgeBlas {
    fn has(&self, routine: BlasRoutine) -> bool {
        self.inner.has(routine)
    }
}

impl BlasKernel for SystemBridgeBlas {
    fn name(&self) -> &'static str {
        SYSTEM_BRIDGE
    }

    fn f64_kernels(&self) -> &dyn BlasKernels<f64> {
        self.inner.f64_kernels()
    }

    fn f32_kernels(&self) -> &dyn BlasKernels<f32> {
        self.inner.f32_kernels()
    }

    fn sdsdot(&self, sb: f32, x: StridedView<'_, f32>, y: StridedView<'_, f32>) -> Result<f32> {
        self.inner.sdsdot(sb, x, y)
    }

    fn dsdot(&self, x: StridedView<'_, f32>, y: StridedView<'_, f32>) -> Result<f64> {
        self.inner.dsdot(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unknown_library_is_a_link_failure() {
        let mut config = NativeConfig::new("NETLIB_BLAS", "libblas.so.3", "netlib-blas");
        config.library_path = Some(PathBuf::from("/nonexistent/libblas-missing.so"));
        assert!(matches!(SystemBridgeBlas::open(&config), Err(CandidateError::Link { .. })));
    }
}
