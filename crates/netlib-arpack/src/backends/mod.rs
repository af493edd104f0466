//! Concrete ARPACK backends
//!
//! | Backend              | Kind    | Requires                            |
//! |----------------------|---------|-------------------------------------|
//! | `NativeBridgeArpack` | native  | bundled library for the platform    |
//! | `SystemBridgeArpack` | native  | `system-bridge` feature, system lib |
//! | `ReferenceArpack`    | managed | nothing                             |

pub mod native;
pub mod reference;
pub mod system;

use std::sync::LazyLock;

use netlib_core::BridgeRegistry;

pub use native::NativeBridgeArpack;
pub use reference::ReferenceArpack;
pub use system::{SystemBridgeArpack, SYSTEM_BRIDGE};

use crate::kernel::ArpackKernel;

/// Alternate native bridges available to the resolution chain
pub static BRIDGES: LazyLock<BridgeRegistry<dyn ArpackKernel>> = LazyLock::new(|| {
    let registry = BridgeRegistry::new();
    #[cfg(feature = "system-bridge")]
    registry.register(SYSTEM_BRIDGE, SystemBridgeArpack::factory);
    registry
});
