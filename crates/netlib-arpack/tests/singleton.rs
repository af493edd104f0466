//! Process-wide handles resolve once and stay put

use std::thread;

use netlib_arpack::{arpack, managed_arpack, native_arpack, ArpackRoutine, Capabilities};
use netlib_core::NetlibError;

#[test]
fn default_handle_is_stable() {
    let first = arpack();
    for _ in 0..8 {
        assert!(arpack().ptr_eq(&first));
    }
}

#[test]
fn managed_handle_is_stable_across_threads() {
    let first = managed_arpack();
    let handles: Vec<_> = (0..8).map(|_| thread::spawn(managed_arpack)).collect();
    for handle in handles {
        let other = handle.join().expect("thread panicked");
        assert!(other.ptr_eq(&first));
    }
}

#[test]
fn native_outcome_is_memoized() {
    netlib_tracing::init_for_tests();
    match (native_arpack(), native_arpack()) {
        (Ok(a), Ok(b)) => assert!(a.ptr_eq(&b)),
        (Err(a), Err(b)) => {
            assert_eq!(a, NetlibError::NativeUnavailable { facade: "ARPACK" });
            assert_eq!(a, b);
            assert!(arpack().ptr_eq(&managed_arpack()));
        }
        (a, b) => panic!("native resolution changed between calls: {a:?} then {b:?}"),
    }
}

#[test]
fn managed_backend_claims_every_routine() {
    let managed = managed_arpack();
    assert_eq!(managed.name(), "reference");
    for &routine in ArpackRoutine::ALL {
        assert!(managed.has(routine), "{} missing {:?}", managed.name(), routine);
    }
    assert!(managed.has_dsaupd());
    assert!(managed.has_iswap());
}
