//! # netlib-arpack - ARPACK facade over interchangeable backends
//!
//! The symmetric ARPACK drivers (`saupd`/`seupd`) and their utilities behind
//! one validated call surface:
//!
//! ```text
//!   native (bundled library) ─► system bridge ─► reference (Rust Lanczos)
//!   └──────── native_arpack() ─────────────┘     └─ managed_arpack() ─┘
//! ```
//!
//! The managed backend does its vector arithmetic through the managed BLAS
//! facade and keeps every bit of iteration state in the caller's `workl`,
//! `iparam` and `ipntr`, so independent problems may run on separate threads.
//!
//! ## Example
//!
//! The two largest eigenvalues of `diag(1, ..., 10)`:
//!
//! ```
//! use netlib_arpack::{codes::ido, managed_arpack, workl_len, PARAM_LEN};
//!
//! let arpack = managed_arpack();
//! let (n, nev, ncv) = (10, 2, 5);
//! let lworkl = workl_len(ncv);
//!
//! let mut resid = vec![0.0_f64; n];
//! let mut v = vec![0.0; n * ncv];
//! let mut iparam = [0; PARAM_LEN];
//! iparam[0] = 1; // exact shifts
//! iparam[2] = 300; // iteration limit
//! iparam[6] = 1; // regular mode
//! let mut ipntr = [0; PARAM_LEN];
//! let mut workd = vec![0.0; 3 * n];
//! let mut workl = vec![0.0; lworkl];
//!
//! let (mut request, mut tol, mut info) = (ido::START, 1e-10, 0);
//! loop {
//!     arpack.saupd(
//!         &mut request, "I", n as i32, "LA", nev as i32, &mut tol, &mut resid, ncv as i32, &mut v,
//!         n as i32, &mut iparam, &mut ipntr, &mut workd, &mut workl, lworkl as i32, &mut info,
//!     )?;
//!     if request == ido::DONE {
//!         break;
//!     }
//!     let (x, y) = (ipntr[0] as usize - 1, ipntr[1] as usize - 1);
//!     for i in 0..n {
//!         workd[y + i] = (i + 1) as f64 * workd[x + i];
//!     }
//! }
//! assert_eq!(info, 0);
//!
//! let mut select = vec![false; ncv];
//! let mut d = vec![0.0; nev];
//! let mut z = vec![0.0; n * nev];
//! arpack.seupd(
//!     false, "A", &mut select, &mut d, &mut z, n as i32, 0.0, "I", n as i32, "LA", nev as i32, tol,
//!     &mut resid, ncv as i32, &mut v, n as i32, &mut iparam, &mut ipntr, &mut workd, &mut workl,
//!     lworkl as i32, &mut info,
//! )?;
//! assert!((d[0] - 9.0).abs() < 1e-8 && (d[1] - 10.0).abs() < 1e-8);
//! # Ok::<(), netlib_core::NetlibError>(())
//! ```
//!
//! ## Modules
//!
//! - [`facade`] - validated entry points, convenience and `*_at` forms
//! - [`kernel`] - the backend traits and the capability facet
//! - [`backends`] - native bridges and the managed provider
//! - [`reference`] - the Lanczos driver and ARPACK utilities in Rust
//! - [`codes`] - `ido` requests and `info` values
//! - [`flags`] - `BMAT`/`WHICH`/`HOWMNY` option flags

pub mod backends;
pub mod codes;
pub mod facade;
pub mod flags;
pub mod instance;
pub mod kernel;
pub mod reference;

pub use facade::{workl_len, Arpack, PARAM_LEN};
pub use flags::{Bmat, Howmny, Which};
pub use instance::{arpack, managed_arpack, native_arpack};
pub use kernel::{ArpackElement, ArpackKernel, ArpackKernels, ArpackRoutine, Capabilities, LanczosWork};
pub use netlib_core::{NetlibError, Result};
