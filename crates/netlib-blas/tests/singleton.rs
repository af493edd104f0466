//! Process-wide handles resolve once and stay put

use std::thread;

use netlib_blas::{blas, managed_blas, native_blas, BlasRoutine, Capabilities};
use netlib_core::NetlibError;

#[test]
fn default_handle_is_stable() {
    let first = blas();
    for _ in 0..8 {
        assert!(blas().ptr_eq(&first));
    }
}

#[test]
fn managed_handle_is_stable_across_threads() {
    let first = managed_blas();
    let handles: Vec<_> = (0..8).map(|_| thread::spawn(managed_blas)).collect();
    for handle in handles {
        let other = handle.join().expect("thread panicked");
        assert!(other.ptr_eq(&first));
    }
}

#[test]
fn native_outcome_is_memoized() {
    netlib_tracing::init_for_tests();
    match (native_blas(), native_blas()) {
        (Ok(a), Ok(b)) => assert!(a.ptr_eq(&b)),
        (Err(a), Err(b)) => {
            assert_eq!(a, NetlibError::NativeUnavailable { facade: "BLAS" });
            assert_eq!(a, b);
            // The default handle falls back to the managed one
            assert!(blas().ptr_eq(&managed_blas()));
        }
        (a, b) => panic!("native resolution changed between calls: {a:?} then {b:?}"),
    }
}

#[test]
fn managed_backend_claims_every_routine() {
    let managed = managed_blas();
    assert!(["simd", "unrolled", "reference"].contains(&managed.name()));
    for &routine in BlasRoutine::ALL {
        assert!(managed.has(routine), "{} missing {:?}", managed.name(), routine);
    }
    assert!(managed.has_dgemm());
    assert!(managed.has_isamax());
}
