//! Process-wide BLAS handles
//!
//! ```text
//!   blas() ──► native_blas() ──ok──► Blas
//!                  │ NativeUnavailable
//!                  ▼
//!              managed_blas() ──► simd ─► unrolled ─► reference
//! ```
//!
//! Each facade resolves once. The native facade remembers a failed chain and
//! reports it on every later access; the managed facade cannot fail because
//! [`ReferenceBlas`] always constructs.

use std::sync::Arc;

use netlib_core::{
    first_success, Candidate, Facade, ManagedFacade, NativeConfig, Result, RuntimeLevel, Selected,
};

use crate::backends::{NativeBridgeBlas, ReferenceBlas, SimdBlas, UnrolledBlas, BRIDGES, SYSTEM_BRIDGE};
use crate::facade::Blas;
use crate::kernel::BlasKernel;

/// Environment prefix for BLAS native configuration
pub const ENV_PREFIX: &str = "NETLIB_BLAS";
/// System library opened by the alternate bridge by default
pub const SYSTEM_LIBRARY: &str = "libblas.so.3";
/// Stem of the bundled library under the resource tree
pub const BUNDLED_LIBRARY: &str = "netlib-blas";

static NATIVE: Facade<dyn BlasKernel> = Facade::new("BLAS");
static MANAGED: ManagedFacade<dyn BlasKernel> = ManagedFacade::new("BLAS");

/// BLAS configuration read from the environment
pub fn native_config() -> NativeConfig {
    NativeConfig::from_env(ENV_PREFIX, SYSTEM_LIBRARY, BUNDLED_LIBRARY)
}

/// Native-only BLAS: the bundled library, then the system bridge.
///
/// Fails with [`netlib_core::NetlibError::NativeUnavailable`] on this and
/// every later call when neither loads.
#[tracing::instrument]
pub fn native_blas() -> Result<Blas> {
    NATIVE
        .get_or_resolve(|| {
            let config = native_config();
            let candidates = [
                Candidate::new("native", || {
                    NativeBridgeBlas::bundled(&config).map(|bridge| Arc::new(bridge) as Arc<dyn BlasKernel>)
                }),
                Candidate::new(SYSTEM_BRIDGE, || BRIDGES.construct(SYSTEM_BRIDGE, &config)),
            ];
            first_success(NATIVE.name(), candidates)
        })
        .map(Blas::from_selected)
}

/// Best managed BLAS for the current runtime level
#[tracing::instrument]
pub fn managed_blas() -> Blas {
    Blas::from_selected(MANAGED.get_or_init(|| {
        let level = RuntimeLevel::current();
        tracing::debug!(%level, "Resolving managed BLAS");
        let candidates = [
            Candidate::new("simd", || SimdBlas::new(level).map(|b| Arc::new(b) as Arc<dyn BlasKernel>)),
            Candidate::new("unrolled", || UnrolledBlas::new(level).map(|b| Arc::new(b) as Arc<dyn BlasKernel>)),
            Candidate::new("reference", || Ok(Arc::new(ReferenceBlas::new()) as Arc<dyn BlasKernel>)),
        ];
        first_success(MANAGED.name(), candidates).unwrap_or_else(|| Selected {
            name: "reference".to_string(),
            backend: Arc::new(ReferenceBlas::new()),
        })
    }))
}

/// The native BLAS when available, otherwise the managed one
#[tracing::instrument]
pub fn blas() -> Blas {
    native_blas().unwrap_or_else(|_| managed_blas())
}
