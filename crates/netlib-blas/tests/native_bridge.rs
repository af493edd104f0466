//! The native bridge over libraries that export part of BLAS, or none of it

use std::sync::Arc;

use netlib_blas::backends::NativeBridgeBlas;
use netlib_blas::{Blas, BlasRoutine, Capabilities};
use netlib_core::{CandidateError, NativeLibrary, NetlibError, Routine};

type ScalFn = unsafe extern "C" fn(*const i32, *const f64, *mut f64, *const i32);
type SwapFn = unsafe extern "C" fn(*const i32, *mut f64, *const i32, *mut f64, *const i32);

/// Reference `DSCAL`
unsafe extern "C" fn dscal_(n: *const i32, alpha: *const f64, x: *mut f64, incx: *const i32) {
    let (n, incx) = (*n as isize, *incx as isize);
    if n <= 0 || incx <= 0 {
        return;
    }
    for i in 0..n {
        *x.offset(i * incx) *= *alpha;
    }
}

/// Reference `DSWAP`: a negative stride starts from the far end
unsafe extern "C" fn dswap_(n: *const i32, x: *mut f64, incx: *const i32, y: *mut f64, incy: *const i32) {
    let (n, incx, incy) = (*n as isize, *incx as isize, *incy as isize);
    if n <= 0 {
        return;
    }
    let start = |inc: isize| if inc < 0 { (1 - n) * inc } else { 0 };
    let (mut ix, mut iy) = (start(incx), start(incy));
    for _ in 0..n {
        std::ptr::swap(x.offset(ix), y.offset(iy));
        ix += incx;
        iy += incy;
    }
}

/// A library exporting `dscal_` and `dswap_` only
fn scal_and_swap_only() -> Blas {
    // SAFETY: both functions have the reference BLAS signature of their symbol.
    let library = unsafe {
        NativeLibrary::in_process(
            "scal-swap",
            [("dscal_", dscal_ as ScalFn as *const ()), ("dswap_", dswap_ as SwapFn as *const ())],
        )
    };
    let bridge = NativeBridgeBlas::from_library("partial", library).expect("two routines are enough to bind");
    Blas::new(Arc::new(bridge))
}

#[test]
fn capabilities_follow_exported_symbols() {
    let blas = scal_and_swap_only();
    assert_eq!(blas.name(), "partial");
    assert!(blas.has_dscal());
    assert!(blas.has_dswap());
    assert!(!blas.has_ddot());
    assert!(!blas.has_sscal());
    assert!(!blas.has_dgemm());

    let exported: Vec<_> = BlasRoutine::ALL.iter().copied().filter(|&routine| blas.has(routine)).collect();
    assert_eq!(exported, [BlasRoutine::Dscal, BlasRoutine::Dswap]);
}

#[test]
fn exported_routines_run_natively() -> netlib_core::Result<()> {
    let blas = scal_and_swap_only();

    let mut x = [1.0, 2.0, 3.0, 4.0];
    blas.scal(4, 2.0, &mut x, 1)?;
    assert_eq!(x, [2.0, 4.0, 6.0, 8.0]);

    let mut x = [1.0, 2.0, 3.0, 4.0];
    blas.scal(2, 2.0, &mut x, 2)?;
    assert_eq!(x, [2.0, 2.0, 6.0, 4.0]);

    let mut x = [1.0, 2.0, 3.0];
    let mut y = [4.0, 5.0, 6.0];
    blas.swap(3, &mut x, -1, &mut y, -1)?;
    assert_eq!((x, y), ([4.0, 5.0, 6.0], [1.0, 2.0, 3.0]));

    let mut x = [1.0, 2.0, 3.0];
    let mut y = [4.0, 5.0, 6.0];
    blas.swap(3, &mut x, 1, &mut y, -1)?;
    assert_eq!((x, y), ([6.0, 5.0, 4.0], [3.0, 2.0, 1.0]));
    Ok(())
}

#[test]
fn validation_runs_before_the_library() {
    let blas = scal_and_swap_only();
    let mut x = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(blas.scal(5, 2.0, &mut x, 1), Err(NetlibError::out_of_bounds(4, 4)));
    assert_eq!(x, [1.0, 2.0, 3.0, 4.0]);

    // Bounds fail before a missing symbol is noticed
    assert_eq!(blas.dot(4, &x, 1, &x[..3], 1), Err(NetlibError::out_of_bounds(3, 3)));
}

#[test]
fn missing_routines_are_unsupported() {
    let blas = scal_and_swap_only();
    let x = [1.0, 2.0, 3.0];
    assert_eq!(
        blas.dot(3, &x, 1, &x, 1),
        Err(NetlibError::unsupported(Routine::new('D', "DOT")))
    );

    let mut single = [1.0_f32, 2.0];
    assert_eq!(
        blas.scal(2, 2.0, &mut single, 1),
        Err(NetlibError::unsupported(Routine::new('S', "SCAL")))
    );
    assert_eq!(single, [1.0, 2.0]);

    // Quick returns never reach the library
    assert_eq!(blas.dot(0, &x, 1, &x, 1), Ok(0.0));
}

#[test]
fn library_without_blas_symbols_is_rejected() {
    // SAFETY: nothing is registered.
    let library = unsafe { NativeLibrary::in_process("empty", std::iter::empty::<(&str, *const ())>()) };
    match NativeBridgeBlas::from_library("empty", library) {
        Err(CandidateError::EmptyLibrary { library }) => assert_eq!(library, "empty"),
        other => panic!("expected an empty library, got {other:?}"),
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn system_library_without_blas_symbols_is_rejected() {
    let library = NativeLibrary::open_system("libc.so.6").expect("glibc is always loadable");
    assert!(matches!(
        NativeBridgeBlas::from_library("libc", library),
        Err(CandidateError::EmptyLibrary { .. })
    ));
}
