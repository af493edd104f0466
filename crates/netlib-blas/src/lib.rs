//! # netlib-blas - BLAS facade over interchangeable backends
//!
//! One call surface for the reference BLAS routine set, served by whichever
//! backend the process resolves first:
//!
//! ```text
//!   native (bundled library) ─► system bridge ─► simd ─► unrolled ─► reference
//!   └──────── native_blas() ─────────────┘     └───── managed_blas() ─────┘
//! ```
//!
//! Every routine validates its arguments the same way regardless of backend,
//! so an illegal call fails identically on a native library and on the
//! managed fallbacks.
//!
//! ## Example
//!
//! ```
//! use netlib_blas::blas;
//!
//! let blas = blas();
//! let mut x = [1.0_f64, 2.0, 3.0, 4.0];
//! blas.scal(4, 2.0, &mut x, 1)?;
//! assert_eq!(x, [2.0, 4.0, 6.0, 8.0]);
//!
//! // The extent implied by n = 5 does not fit
//! assert!(blas.scal(5, 2.0, &mut x, 1).is_err());
//! # Ok::<(), netlib_core::NetlibError>(())
//! ```
//!
//! ## Modules
//!
//! - [`facade`] - validated entry points, convenience and `*_at` forms
//! - [`kernel`] - the backend traits and the capability facet
//! - [`backends`] - native bridges and managed providers
//! - [`reference`] - reference algorithms shared by the managed providers
//! - [`flags`] - `TRANS`/`UPLO`/`DIAG`/`SIDE` mode flags

pub mod backends;
pub mod facade;
pub mod flags;
pub mod instance;
pub mod kernel;
pub mod reference;

pub use facade::Blas;
pub use flags::{Diag, Side, Transpose, Uplo};
pub use instance::{blas, managed_blas, native_blas};
pub use kernel::{BlasElement, BlasKernel, BlasKernels, BlasRoutine, Capabilities};
pub use netlib_core::{NetlibError, Result};
