//! Ritz value convergence test

use netlib_core::Real;

/// Count the Ritz values whose error bound satisfies
/// `bound <= tol * max(eps^(2/3), |ritz|)`
pub fn sconv<T: Real>(ritz: &[T], bounds: &[T], tol: T) -> usize {
    let eps23 = eps23::<T>();
    ritz.iter()
        .zip(bounds)
        .filter(|&(&value, &bound)| bound <= tol * eps23.max(value.abs()))
        .count()
}

/// Machine epsilon to the power 2/3, the floor of the relative test
pub(crate) fn eps23<T: Real>() -> T {
    T::epsilon().powf(T::lit(2.0 / 3.0))
}
