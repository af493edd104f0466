//! Concrete BLAS backends
//!
//! | Backend            | Kind    | Requires                          |
//! |--------------------|---------|-----------------------------------|
//! | `NativeBridgeBlas` | native  | bundled library for the platform  |
//! | `SystemBridgeBlas` | native  | `system-bridge` feature, system lib |
//! | `SimdBlas`         | managed | runtime level `Simd`, AVX2 + FMA  |
//! | `UnrolledBlas`     | managed | runtime level `Vector`            |
//! | `ReferenceBlas`    | managed | nothing                           |

pub mod native;
pub mod reference;
pub mod simd;
pub mod system;
pub mod unrolled;

use std::sync::LazyLock;

use netlib_core::BridgeRegistry;

pub use native::NativeBridgeBlas;
pub use reference::ReferenceBlas;
pub use simd::SimdBlas;
pub use system::{SystemBridgeBlas, SYSTEM_BRIDGE};
pub use unrolled::UnrolledBlas;

use crate::kernel::BlasKernel;

/// Alternate native bridges available to the resolution chain
pub static BRIDGES: LazyLock<BridgeRegistry<dyn BlasKernel>> = LazyLock::new(|| {
    let registry = BridgeRegistry::new();
    #[cfg(feature = "system-bridge")]
    registry.register(SYSTEM_BRIDGE, SystemBridgeBlas::factory);
    registry
});
