//! Alternate native bridge
//!
//! Opens the ARPACK the system dynamic loader finds under
//! `NETLIB_ARPACK_NATIVE_LIB` (default `libarpack.so.2`), or the explicit
//! `NETLIB_ARPACK_NATIVE_LIB_PATH`.

use std::sync::Arc;

use netlib_core::{CandidateError, NativeConfig, NativeLibrary, Result, StridedView, StridedViewMut};

use super::native::NativeBridgeArpack;
use crate::kernel::{ArpackKernel, ArpackKernels, ArpackRoutine, Capabilities};

/// Registry name of this bridge
pub const SYSTEM_BRIDGE: &str = "system";

/// System ARPACK opened by name
#[derive(Debug)]
pub struct SystemBridgeArpack {
    inner: NativeBridgeArpack,
}

impl SystemBridgeArpack {
    pub fn open(config: &NativeConfig) -> std::result::Result<Self, CandidateError> {
        config.ensure_native_allowed()?;
        let library = NativeLibrary::open_system(config.system_library())?;
        Ok(Self {
            inner: NativeBridgeArpack::from_library(SYSTEM_BRIDGE, library)?,
        })
    }

    /// [`BridgeFactory`](netlib_core::resolve::BridgeFactory) registered under [`SYSTEM_BRIDGE`]
    pub fn factory(config: &NativeConfig) -> std::result::Result<Arc<dyn ArpackKernel>, CandidateError> {
        Ok(Arc::new(Self::open(config)?))
    }

    pub fn origin(&self) -> &std::path::Path {
        self.inner.origin()
    }
}

impl Capabilities for SystemBridgeArpack {
    fn has(&self, routine: ArpackRoutine) -> bool {
        self.inner.has(routine)
    }
}

impl ArpackKernel for SystemBridgeArpack {
    fn name(&self) -> &'static str {
        SYSTEM_BRIDGE
    }

    fn f64_kernels(&self) -> &dyn ArpackKernels<f64> {
        self.inner.f64_kernels()
    }

    fn f32_kernels(&self) -> &dyn ArpackKernels<f32> {
        self.inner.f32_kernels()
    }

    fn icnteq(&self, array: StridedView<'_, i32>, value: i32) -> Result<usize> {
        self.inner.icnteq(array, value)
    }

    fn icopy(&self, x: StridedView<'_, i32>, y: StridedViewMut<'_, i32>) -> Result<()> {
        self.inner.icopy(x, y)
    }

    fn iset(&self, value: i32, array: StridedViewMut<'_, i32>) -> Result<()> {
        self.inner.iset(value, array)
    }

    fn iswap(&self, x: StridedViewMut<'_, i32>, y: StridedViewMut<'_, i32>) -> Result<()> {
        self.inner.iswap(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unknown_library_is_a_link_failure() {
        let mut config = NativeConfig::new("NETLIB_ARPACK", "libarpack.so.2", "netlib-arpack");
        config.library_path = Some(PathBuf::from("/nonexistent/libarpack-missing.so"));
        assert!(matches!(SystemBridgeArpack::open(&config), Err(CandidateError::Link { .. })));
    }
}
