//! Portable ARPACK routines
//!
//! The symmetric Lanczos driver and the utilities it is built from. They are
//! the provided methods of [`ArpackKernels`](crate::kernel::ArpackKernels), and
//! the driver reaches BLAS through the managed BLAS facade so that its own
//! vector arithmetic is validated like any caller's.

pub mod convergence;
pub mod integer;
pub mod lanczos;
pub mod sort;
pub mod tridiagonal;
