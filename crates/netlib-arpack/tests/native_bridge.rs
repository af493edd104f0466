//! The native bridge over libraries that export part of ARPACK, or none of it

use std::sync::Arc;

use netlib_arpack::backends::NativeBridgeArpack;
use netlib_arpack::{Arpack, ArpackRoutine, Capabilities};
use netlib_core::{CandidateError, NativeLibrary, NetlibError, Routine};

type IcnteqFn = unsafe extern "C" fn(*const i32, *const i32, *const i32) -> i32;
type IsetFn = unsafe extern "C" fn(*const i32, *const i32, *mut i32, *const i32);

/// ARPACK `ICNTEQ`
unsafe extern "C" fn icnteq_(n: *const i32, array: *const i32, value: *const i32) -> i32 {
    let array = std::slice::from_raw_parts(array, (*n).max(0) as usize);
    array.iter().filter(|&&entry| entry == *value).count() as i32
}

/// ARPACK `ISET`
unsafe extern "C" fn iset_(n: *const i32, value: *const i32, array: *mut i32, inc: *const i32) {
    let (n, inc) = (*n as isize, *inc as isize);
    if n <= 0 || inc <= 0 {
        return;
    }
    for i in 0..n {
        *array.offset(i * inc) = *value;
    }
}

/// A library exporting two of the integer utilities only
fn integer_utilities_only() -> Arpack {
    // SAFETY: both functions have the ARPACK signature of their symbol.
    let library = unsafe {
        NativeLibrary::in_process(
            "integer-utilities",
            [("icnteq_", icnteq_ as IcnteqFn as *const ()), ("iset_", iset_ as IsetFn as *const ())],
        )
    };
    let bridge = NativeBridgeArpack::from_library("partial", library).expect("two routines are enough to bind");
    Arpack::new(Arc::new(bridge))
}

#[test]
fn capabilities_follow_exported_symbols() {
    let arpack = integer_utilities_only();
    assert_eq!(arpack.name(), "partial");
    assert!(arpack.has_icnteq());
    assert!(arpack.has_iset());
    assert!(!arpack.has_icopy());
    assert!(!arpack.has_dsaupd());
    assert!(!arpack.has_sseupd());

    let exported: Vec<_> = ArpackRoutine::ALL.iter().copied().filter(|&routine| arpack.has(routine)).collect();
    assert_eq!(exported, [ArpackRoutine::Icnteq, ArpackRoutine::Iset]);
}

#[test]
fn exported_routines_run_natively() -> netlib_core::Result<()> {
    let arpack = integer_utilities_only();

    let mut array = [0; 6];
    arpack.iset(3, 7, &mut array, 2)?;
    assert_eq!(array, [7, 0, 7, 0, 7, 0]);
    assert_eq!(arpack.icnteq(6, &array, 7)?, 3);
    assert_eq!(arpack.icnteq(3, &array, 0)?, 1);
    Ok(())
}

#[test]
fn validation_runs_before_the_library() {
    let arpack = integer_utilities_only();
    let mut array = [1, 2, 3];
    assert_eq!(arpack.iset(3, 9, &mut array, 2), Err(NetlibError::out_of_bounds(4, 3)));
    assert_eq!(array, [1, 2, 3]);
}

#[test]
fn missing_routines_are_unsupported() {
    let arpack = integer_utilities_only();
    let ritz = [1.0, 2.0];
    let bounds = [1e-9, 1e-9];
    assert_eq!(
        arpack.sconv(2, &ritz, &bounds, 1e-6),
        Err(NetlibError::unsupported(Routine::new('D', "SCONV")))
    );

    let source = [1, 2];
    let mut target = [0; 2];
    assert_eq!(
        arpack.icopy(2, &source, 1, &mut target, 1),
        Err(NetlibError::unsupported(Routine::plain("ICOPY")))
    );
    assert_eq!(target, [0, 0]);
}

#[test]
fn library_without_arpack_symbols_is_rejected() {
    // SAFETY: nothing is registered.
    let library = unsafe { NativeLibrary::in_process("empty", std::iter::empty::<(&str, *const ())>()) };
    match NativeBridgeArpack::from_library("empty", library) {
        Err(CandidateError::EmptyLibrary { library }) => assert_eq!(library, "empty"),
        other => panic!("expected an empty library, got {other:?}"),
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn system_library_without_arpack_symbols_is_rejected() {
    let library = NativeLibrary::open_system("libc.so.6").expect("glibc is always loadable");
    assert!(matches!(
        NativeBridgeArpack::from_library("libc", library),
        Err(CandidateError::EmptyLibrary { .. })
    ));
}
