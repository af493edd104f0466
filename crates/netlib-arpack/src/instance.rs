//! Process-wide ARPACK handles
//!
//! ```text
//!   arpack() ──► native_arpack() ──ok──► Arpack
//!                    │ NativeUnavailable
//!                    ▼
//!                managed_arpack() ──► reference
//! ```
//!
//! Resolution mirrors the BLAS facades and is independent of them: a process
//! may run native BLAS with managed ARPACK or the other way round.

use std::sync::Arc;

use netlib_core::{first_success, Candidate, Facade, ManagedFacade, NativeConfig, Result, Selected};

use crate::backends::{NativeBridgeArpack, ReferenceArpack, BRIDGES, SYSTEM_BRIDGE};
use crate::facade::Arpack;
use crate::kernel::ArpackKernel;

/// Environment prefix for ARPACK native configuration
pub const ENV_PREFIX: &str = "NETLIB_ARPACK";
/// System library opened by the alternate bridge by default
pub const SYSTEM_LIBRARY: &str = "libarpack.so.2";
/// Stem of the bundled library under the resource tree
pub const BUNDLED_LIBRARY: &str = "netlib-arpack";

static NATIVE: Facade<dyn ArpackKernel> = Facade::new("ARPACK");
static MANAGED: ManagedFacade<dyn ArpackKernel> = ManagedFacade::new("ARPACK");

/// ARPACK configuration read from the environment
pub fn native_config() -> NativeConfig {
    NativeConfig::from_env(ENV_PREFIX, SYSTEM_LIBRARY, BUNDLED_LIBRARY)
}

/// Native-only ARPACK: the bundled library, then the system bridge.
///
/// Fails with [`netlib_core::NetlibError::NativeUnavailable`] on this and
/// every later call when neither loads.
#[tracing::instrument]
pub fn native_arpack() -> Result<Arpack> {
    NATIVE
        .get_or_resolve(|| {
            let config = native_config();
            let candidates = [
                Candidate::new("native", || {
                    NativeBridgeArpack::bundled(&config).map(|bridge| Arc::new(bridge) as Arc<dyn ArpackKernel>)
                }),
                Candidate::new(SYSTEM_BRIDGE, || BRIDGES.construct(SYSTEM_BRIDGE, &config)),
            ];
            first_success(NATIVE.name(), candidates)
        })
        .map(Arpack::from_selected)
}

/// The managed ARPACK; always available
#[tracing::instrument]
pub fn managed_arpack() -> Arpack {
    Arpack::from_selected(MANAGED.get_or_init(|| {
        let candidates = [Candidate::new("reference", || {
            Ok(Arc::new(ReferenceArpack::new()) as Arc<dyn ArpackKernel>)
        })];
        first_success(MANAGED.name(), candidates).unwrap_or_else(|| Selected {
            name: "reference".to_string(),
            backend: Arc::new(ReferenceArpack::new()),
        })
    }))
}

/// The native ARPACK when available, otherwise the managed one
#[tracing::instrument]
pub fn arpack() -> Arpack {
    native_arpack().unwrap_or_else(|_| managed_arpack())
}
