//! Reverse-communication requests and `info` values
//!
//! These are ARPACK's own numbers, so callers ported from Fortran can keep
//! their dispatch loops unchanged.

/// `ido` values exchanged with `saupd`
pub mod ido {
    /// First call of a new problem
    pub const START: i32 = 0;
    /// Compute `Y = OP·X`; returned for the first product of a run
    pub const FIRST_PRODUCT: i32 = -1;
    /// Compute `Y = OP·X`
    pub const PRODUCT: i32 = 1;
    /// Place `iparam[7]` shifts at `workl[ipntr[10] - 1..]`
    pub const SHIFTS: i32 = 3;
    /// Iteration finished; inspect `info`
    pub const DONE: i32 = 99;
}

/// `info` values reported by `saupd` and `seupd`
pub mod info {
    pub const NORMAL: i32 = 0;
    /// The iteration limit in `iparam[2]` was reached
    pub const MAX_ITERATIONS: i32 = 1;
    /// `n` must be positive
    pub const N_RANGE: i32 = -1;
    /// `nev` must be positive
    pub const NEV_RANGE: i32 = -2;
    /// `ncv` must satisfy `nev < ncv <= n`
    pub const NCV_RANGE: i32 = -3;
    /// The iteration limit must be positive
    pub const MAX_ITERATIONS_RANGE: i32 = -4;
    /// The tridiagonal eigensolver failed to converge
    pub const TRIDIAGONAL_FAILED: i32 = -8;
    /// The starting vector is zero
    pub const ZERO_START: i32 = -9;
    /// `iparam[6]` names a mode this backend does not run
    pub const MODE: i32 = -10;
    /// The generalized problem is not supported in this mode
    pub const GENERALIZED: i32 = -11;
    /// `iparam[0]` must be 0 or 1
    pub const SHIFT_STRATEGY: i32 = -12;
    /// `which = BE` needs `nev > 1`
    pub const BOTH_ENDS_SINGLE: i32 = -13;
    /// `seupd`: `nev` and `which = BE` are incompatible
    pub const BOTH_ENDS_SINGLE_EUPD: i32 = -12;
    /// `seupd`: negative converged count from `saupd`
    pub const NO_CONVERGED: i32 = -14;
    /// `seupd`: `howmny = S` is not implemented
    pub const HOWMNY_SELECT: i32 = -16;
    /// `seupd` counted a different number of converged values than `saupd`
    pub const CONVERGED_MISMATCH: i32 = -17;
    /// No Lanczos factorization could be built, or the call sequence was broken
    pub const NO_FACTORIZATION: i32 = -9999;
}
