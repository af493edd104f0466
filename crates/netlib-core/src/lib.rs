//! Core of the netlib facades: contract validation, strided addressing and
//! once-per-process backend resolution.
//!
//! ## Architecture
//!
//! ```text
//!   caller
//!     │   blas().gemm(...)
//!     ▼
//!   ┌───────────────────────┐   legality → nullness → bounds
//!   │   Contract Validator  │   (validate, view)
//!   └──────────┬────────────┘
//!              ▼
//!   ┌───────────────────────┐   resolved once, memoized
//!   │   Arc<dyn Kernel>     │◄── resolve: native → alternate → managed
//!   └───────────────────────┘        │
//!                                    └── materialize: resources/native/<os>-<arch>/
//! ```
//!
//! The facade crates (`netlib-blas`, `netlib-arpack`) own the routine
//! signatures and kernel traits; this crate owns everything they share.

pub mod config;
pub mod error;
pub mod materialize;
pub mod platform;
pub mod resolve;
pub mod scalar;
pub mod validate;
pub mod view;

pub use config::NativeConfig;
pub use error::{CandidateError, NetlibError, Result, Routine};
pub use materialize::NativeLibrary;
pub use platform::{Platform, RuntimeLevel};
pub use resolve::{first_success, BridgeRegistry, Candidate, Facade, ManagedFacade, ResolutionState, Selected};
pub use scalar::Real;
pub use validate::{lsame, lsame_word, Contract};
pub use view::{MatrixView, MatrixViewMut, StridedView, StridedViewMut};
