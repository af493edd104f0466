//! Implicitly restarted Lanczos driver
//!
//! Reverse communication: `saupd` returns whenever it needs `OP·x`, and the
//! caller calls it again with the product in place.
//!
//! ```text
//!   ido = 0 ──► start vector ──► step j ◄───────────────┐
//!                                  │  ido = -1 / 1      │
//!                                  ▼  (Y := OP·X)       │
//!                           j + 1 < ncv ? ──yes─────────┘
//!                                  │ no
//!                                  ▼
//!                        Ritz pairs, convergence ──converged──► ido = 99
//!                                  │ not yet
//!                                  ▼ (ido = 3 when the caller picks shifts)
//!                    implicit QR restart to nev columns ──► step nev
//! ```
//!
//! All iteration state lives in the caller's `workl`, `ipntr` and `iparam`,
//! so independent problems can run concurrently. With `k = ncv`, `workl` is
//! laid out as:
//!
//! | range            | content                                          |
//! |------------------|--------------------------------------------------|
//! | `[0, k)`         | diagonal of the Lanczos matrix `T`               |
//! | `[k, 2k)`        | off-diagonal of `T`; entry `2k - 1` is the residual norm |
//! | `[2k, 3k)`       | Ritz values, ascending                           |
//! | `[3k, 4k)`       | Ritz error bounds                                |
//! | `[4k, 4k + k²)`  | eigenvectors of `T`                              |
//! | `[4k + k², 7k + k²)` | scratch; caller-supplied shifts go first     |

use std::cmp::Ordering;
use std::ops::Range;

use netlib_blas::Blas;
use netlib_core::{MatrixViewMut, Real, Result};

use super::convergence::eps23;
use super::tridiagonal::eigen;
use crate::codes::{ido, info as code};
use crate::flags::{Bmat, Howmny, Which};
use crate::kernel::{ArpackElement, LanczosWork};

// iparam slots
const ISHIFT: usize = 0;
const MAXITER: usize = 2;
const NCONV: usize = 4;
const MODE: usize = 6;
const NP: usize = 7;
const NUMOP: usize = 8;
const NUMOPB: usize = 9;
const NUMREO: usize = 10;

// ipntr slots
const X: usize = 0;
const Y: usize = 1;
const BX: usize = 2;
const NEXT: usize = 3;
const TRIDIAGONAL: usize = 4;
const RITZ: usize = 5;
const BOUNDS: usize = 6;
const PHASE: usize = 7;
const STEP: usize = 8;
const ITERATION: usize = 9;
const SCRATCH: usize = 10;

// Values of ipntr[PHASE]
const AWAITING_PRODUCT: i32 = 1;
const AWAITING_SHIFTS: i32 = 2;
const FINISHED: i32 = 3;

/// Attempts at a random direction before declaring the factorization stuck
const FRESH_ATTEMPTS: u64 = 3;

// Sizes reaching the driver were validated from `i32` arguments.
#[inline(always)]
fn int(value: usize) -> i32 {
    value as i32
}

/// Named regions of `workl`
struct Workspace<'w, T> {
    alpha: &'w mut [T],
    beta: &'w mut [T],
    ritz: &'w mut [T],
    bounds: &'w mut [T],
    q: &'w mut [T],
    scratch: &'w mut [T],
}

impl<'w, T: Real> Workspace<'w, T> {
    fn split(workl: &'w mut [T], k: usize) -> Self {
        let (alpha, rest) = workl.split_at_mut(k);
        let (beta, rest) = rest.split_at_mut(k);
        let (ritz, rest) = rest.split_at_mut(k);
        let (bounds, rest) = rest.split_at_mut(k);
        let (q, rest) = rest.split_at_mut(k * k);
        let scratch = &mut rest[..3 * k];
        Self {
            alpha,
            beta,
            ritz,
            bounds,
            q,
            scratch,
        }
    }

    /// Ritz values, eigenvectors of `T` and error bounds; returns the number
    /// of couplings the tridiagonal solver left unconverged
    fn ritz_pairs(&mut self) -> usize {
        let k = self.alpha.len();
        self.ritz.copy_from_slice(&self.alpha[..]);
        let e = &mut self.scratch[k..2 * k];
        e[..k - 1].copy_from_slice(&self.beta[..k - 1]);
        let unconverged = eigen(&mut self.ritz[..], e, &mut self.q[..]);
        if unconverged > 0 {
            return unconverged;
        }

        let rnorm = self.beta[k - 1];
        for (i, bound) in self.bounds.iter_mut().enumerate() {
            *bound = rnorm * self.q[(k - 1) + i * k].abs();
        }
        0
    }

    fn converged(&self, i: usize, tol: T, eps23: T) -> bool {
        self.bounds[i] <= tol * eps23.max(self.ritz[i].abs())
    }

    /// Largest Ritz value in magnitude, the scale for breakdown tests
    fn spectral_scale(&self) -> T {
        self.ritz.iter().fold(T::zero(), |scale, value| scale.max(value.abs()))
    }
}

/// Indices of the ascending `ritz` from least to most wanted; the last `nev`
/// are the wanted ones
fn preference<T: Real>(which: Which, ritz: &[T], nev: usize) -> Vec<usize> {
    let k = ritz.len();
    let mut order: Vec<usize> = (0..k).collect();
    let magnitude = |&i: &usize, &j: &usize| ritz[i].abs().partial_cmp(&ritz[j].abs()).unwrap_or(Ordering::Equal);
    match which {
        Which::LargestAlgebraic => {}
        Which::SmallestAlgebraic => order.reverse(),
        Which::LargestMagnitude => order.sort_by(magnitude),
        Which::SmallestMagnitude => {
            order.sort_by(magnitude);
            order.reverse();
        }
        Which::BothEnds => {
            // One more from the high end when nev is odd
            let low = nev / 2;
            let high = nev - low;
            order = (low..k - high).chain(0..low).chain(k - high..k).collect();
        }
    }
    order
}

/// One implicit QR step with shift `mu` on the tridiagonal `(a, b)` of order
/// `k`, accumulating the rotations into the columns of `q` (`k x k`)
fn qr_sweep<T: Real>(a: &mut [T], b: &mut [T], q: &mut [T], k: usize, mu: T) {
    let two = T::lit(2.0);
    let mut x = a[0] - mu;
    let mut z = b[0];
    for i in 0..k - 1 {
        let r = x.hypot(z);
        let (c, s) = if r.is_zero() { (T::one(), T::zero()) } else { (x / r, z / r) };
        if i > 0 {
            b[i - 1] = r;
        }

        let (ai, aj, bi) = (a[i], a[i + 1], b[i]);
        a[i] = c * c * ai + two * c * s * bi + s * s * aj;
        a[i + 1] = s * s * ai - two * c * s * bi + c * c * aj;
        b[i] = c * s * (aj - ai) + (c * c - s * s) * bi;

        // The rotation pushes a bulge to (i, i + 2)
        if i + 2 < k {
            x = b[i];
            z = s * b[i + 1];
            b[i + 1] *= c;
        }

        let (left, right) = q.split_at_mut((i + 1) * k);
        for (qi, qj) in left[i * k..].iter_mut().zip(&mut right[..k]) {
            let (u, w) = (*qi, *qj);
            *qi = c * u + s * w;
            *qj = c * w - s * u;
        }
    }
}

fn identity<T: Real>(q: &mut [T], k: usize) {
    q.fill(T::zero());
    for j in 0..k {
        q[j + j * k] = T::one();
    }
}

/// Uniform values in `[-1, 1)` from a xorshift stream; the seed is the only state
fn random_fill<T: Real>(x: &mut [T], seed: u64) {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    for value in x {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        *value = T::lit((state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0);
    }
}

fn seed(iteration: i32, column: usize, attempt: u64) -> u64 {
    ((iteration as u64) << 32) ^ ((column as u64) << 8) ^ attempt ^ 0x5EED
}

/// Set up the pointers `ipntr` exposes to the caller (1-based)
fn publish_pointers(ipntr: &mut [i32], n: usize, k: usize) {
    ipntr[X] = 1;
    ipntr[Y] = int(n + 1);
    ipntr[BX] = int(2 * n + 1);
    ipntr[TRIDIAGONAL] = 1;
    ipntr[RITZ] = int(2 * k + 1);
    ipntr[BOUNDS] = int(3 * k + 1);
    ipntr[SCRATCH] = int(k * k + 4 * k + 1);
    ipntr[NEXT] = int(k * k + 7 * k + 1);
}

/// `info` for the checks `saupd` runs on a new problem.
///
/// Checks run in ARPACK's order and the last failure wins.
fn setup_code(bmat: Bmat, n: usize, which: Which, nev: usize, ncv: usize, iparam: &[i32]) -> i32 {
    let mut status = code::NORMAL;
    if n == 0 {
        status = code::N_RANGE;
    }
    if nev == 0 {
        status = code::NEV_RANGE;
    }
    if ncv <= nev || ncv > n {
        status = code::NCV_RANGE;
    }
    if iparam[MAXITER] <= 0 {
        status = code::MAX_ITERATIONS_RANGE;
    }
    if !matches!(iparam[MODE], 1 | 3) {
        status = code::MODE;
    } else if bmat == Bmat::Generalized {
        status = code::GENERALIZED;
    } else if !matches!(iparam[ISHIFT], 0 | 1) {
        status = code::SHIFT_STRATEGY;
    } else if nev == 1 && which == Which::BothEnds {
        status = code::BOTH_ENDS_SINGLE;
    }
    status
}

/// One Lanczos run borrowed from the caller's arrays
struct Lanczos<'a, T> {
    blas: &'a Blas,
    n: usize,
    k: usize,
    nev: usize,
    which: Which,
    v: &'a mut [T],
    ldv: usize,
    resid: &'a mut [T],
    workd: &'a mut [T],
    iparam: &'a mut [i32],
    ipntr: &'a mut [i32],
    ws: Workspace<'a, T>,
}

impl<T: ArpackElement> Lanczos<'_, T> {
    fn column(&self, j: usize) -> Range<usize> {
        j * self.ldv..j * self.ldv + self.n
    }

    fn product_range(&self) -> Range<usize> {
        self.n..2 * self.n
    }

    fn start(&mut self, ido: &mut i32, info: &mut i32) -> Result<()> {
        if *info == 0 {
            random_fill(&mut self.resid[..], seed(0, 0, 0));
        }
        *info = code::NORMAL;

        let n = int(self.n);
        let rnorm = self.blas.nrm2(n, &self.resid[..], 1)?;
        if rnorm.is_zero() {
            *info = code::ZERO_START;
            return self.finish(ido, *info);
        }
        let w = self.product_range();
        self.blas.copy(n, &self.resid[..], 1, &mut self.workd[w], 1)?;
        self.set_column(0, rnorm)?;
        self.request_product(0, ido, true)
    }

    /// Hand `v_j` to the caller as `X`
    fn request_product(&mut self, j: usize, ido: &mut i32, first: bool) -> Result<()> {
        let column = self.column(j);
        self.blas.copy(int(self.n), &self.v[column], 1, &mut self.workd[..self.n], 1)?;
        self.ipntr[STEP] = int(j);
        self.ipntr[PHASE] = AWAITING_PRODUCT;
        self.iparam[NUMOP] += 1;
        *ido = if first { ido::FIRST_PRODUCT } else { ido::PRODUCT };
        Ok(())
    }

    /// Column `col` of `V` := `workd[n..2n] / norm`
    fn set_column(&mut self, col: usize, norm: T) -> Result<()> {
        let (n, w, column) = (int(self.n), self.product_range(), self.column(col));
        self.blas.copy(n, &self.workd[w], 1, &mut self.v[column.clone()], 1)?;
        self.blas.scal(n, T::one() / norm, &mut self.v[column], 1)
    }

    /// Remove from `workd[n..2n]` its components along the first `cols`
    /// columns of `V`, by classical Gram-Schmidt applied twice.
    ///
    /// Returns the total coefficient removed along the last column.
    fn orthogonalize(&mut self, cols: usize) -> Result<T> {
        if cols == 0 {
            return Ok(T::zero());
        }
        let (n, ldv) = (int(self.n), int(self.ldv));
        let w = self.n..2 * self.n;
        let h = &mut self.ws.scratch[..cols];
        let mut last = T::zero();
        for _ in 0..2 {
            self.blas.gemv("T", n, int(cols), T::one(), &self.v[..], ldv, &self.workd[w.clone()], 1, T::zero(), &mut h[..], 1)?;
            self.blas.gemv("N", n, int(cols), -T::one(), &self.v[..], ldv, &h[..], 1, T::one(), &mut self.workd[w.clone()], 1)?;
            last += h[cols - 1];
        }
        self.iparam[NUMREO] += 1;
        Ok(last)
    }

    /// Replace column `col` with a random unit vector orthogonal to the
    /// columns before it; false when every attempt collapsed
    fn fresh_direction(&mut self, col: usize) -> Result<bool> {
        let n = int(self.n);
        let w = self.product_range();
        for attempt in 0..FRESH_ATTEMPTS {
            random_fill(&mut self.workd[w.clone()], seed(self.ipntr[ITERATION], col, attempt));
            let before = self.blas.nrm2(n, &self.workd[w.clone()], 1)?;
            self.orthogonalize(col)?;
            let after = self.blas.nrm2(n, &self.workd[w.clone()], 1)?;
            if after > before * T::epsilon().sqrt() {
                self.set_column(col, after)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Continue the factorization into column `col` from the residual in
    /// `workd[n..2n]` of norm `norm`
    fn extend(&mut self, col: usize, norm: T, scale: T, ido: &mut i32, info: &mut i32) -> Result<()> {
        if norm > T::lit(10.0) * T::epsilon() * scale {
            self.ws.beta[col - 1] = norm;
            self.set_column(col, norm)?;
        } else {
            // Invariant subspace: restart the Krylov sequence orthogonally
            self.ws.beta[col - 1] = T::zero();
            if !self.fresh_direction(col)? {
                *info = code::NO_FACTORIZATION;
                return self.finish(ido, *info);
            }
        }
        self.request_product(col, ido, false)
    }

    /// Fold `Y = OP·v_j` into column `j` of the factorization
    fn absorb_product(&mut self, j: usize, tol: T, ido: &mut i32, info: &mut i32) -> Result<()> {
        let n = int(self.n);
        let w = self.product_range();
        let wnorm = self.blas.nrm2(n, &self.workd[w.clone()], 1)?;
        self.ws.alpha[j] = self.orthogonalize(j + 1)?;
        let beta = self.blas.nrm2(n, &self.workd[w.clone()], 1)?;

        if j + 1 < self.k {
            return self.extend(j + 1, beta, wnorm, ido, info);
        }

        self.ws.beta[j] = beta;
        self.blas.copy(n, &self.workd[w], 1, &mut self.resid[..], 1)?;
        self.converge_or_restart(tol, ido, info)
    }

    fn converge_or_restart(&mut self, tol: T, ido: &mut i32, info: &mut i32) -> Result<()> {
        let iteration = self.ipntr[ITERATION] + 1;
        self.ipntr[ITERATION] = iteration;

        if self.ws.ritz_pairs() > 0 {
            *info = code::TRIDIAGONAL_FAILED;
            return self.finish(ido, *info);
        }

        let order = preference(self.which, &self.ws.ritz[..], self.nev);
        let (unwanted, wanted) = order.split_at(self.k - self.nev);
        let eps23 = eps23::<T>();
        let nconv = wanted.iter().filter(|&&i| self.ws.converged(i, tol, eps23)).count();
        self.iparam[NCONV] = int(nconv);

        if nconv >= self.nev {
            *info = code::NORMAL;
            return self.finish(ido, *info);
        }
        if iteration >= self.iparam[MAXITER] {
            *info = code::MAX_ITERATIONS;
            return self.finish(ido, *info);
        }

        if self.iparam[ISHIFT] == 0 {
            self.iparam[NP] = int(unwanted.len());
            self.ipntr[PHASE] = AWAITING_SHIFTS;
            *ido = ido::SHIFTS;
            return Ok(());
        }
        // Exact shifts: the unwanted Ritz values, least wanted first
        for (slot, &i) in self.ws.scratch.iter_mut().zip(unwanted) {
            *slot = self.ws.ritz[i];
        }
        self.restart(ido, info)
    }

    /// Apply the shifts in `scratch[..ncv - nev]` as implicit QR steps, keep
    /// the leading `nev` columns and resume the factorization from there
    fn restart(&mut self, ido: &mut i32, info: &mut i32) -> Result<()> {
        let (n, k, nev) = (self.n, self.k, self.nev);
        let ws = &mut self.ws;
        identity(&mut *ws.q, k);
        for s in 0..k - nev {
            let shift = ws.scratch[s];
            qr_sweep(&mut *ws.alpha, &mut *ws.beta, &mut *ws.q, k, shift);
        }

        // V[:, ..=nev] := V·Q[:, ..=nev], one row at a time
        let ldv = int(self.ldv);
        for row in 0..n {
            let (gathered, combined) = self.ws.scratch[k..3 * k].split_at_mut(k);
            self.blas.copy(int(k), &self.v[row..], ldv, gathered, 1)?;
            self.blas.gemv("T", int(k), int(nev + 1), T::one(), &self.ws.q[..], int(k), &gathered[..], 1, T::zero(), combined, 1)?;
            self.blas.copy(int(nev + 1), &combined[..], 1, &mut self.v[row..], ldv)?;
        }

        // f := T[nev, nev - 1]·v_nev + Q[k - 1, nev - 1]·f
        let sigma = self.ws.q[(k - 1) + (nev - 1) * k];
        let coupling = self.ws.beta[nev - 1];
        let column = self.column(nev);
        self.blas.scal(int(n), sigma, &mut self.resid[..], 1)?;
        self.blas.axpy(int(n), coupling, &self.v[column], 1, &mut self.resid[..], 1)?;

        let rnorm = self.blas.nrm2(int(n), &self.resid[..], 1)?;
        let w = self.product_range();
        self.blas.copy(int(n), &self.resid[..], 1, &mut self.workd[w], 1)?;
        let scale = self.ws.spectral_scale();
        self.extend(nev, rnorm, scale, ido, info)
    }

    fn finish(&mut self, ido: &mut i32, status: i32) -> Result<()> {
        self.iparam[MAXITER] = self.ipntr[ITERATION];
        self.ipntr[PHASE] = FINISHED;
        *ido = ido::DONE;
        tracing::debug!(
            iterations = self.ipntr[ITERATION],
            converged = self.iparam[NCONV],
            products = self.iparam[NUMOP],
            info = status,
            "Lanczos iteration finished"
        );
        Ok(())
    }
}

/// One reverse-communication step; see the module documentation
pub fn saupd<T: ArpackElement>(
    blas: &Blas,
    ido: &mut i32,
    tol: &mut T,
    work: LanczosWork<'_, T>,
    info: &mut i32,
) -> Result<()> {
    let LanczosWork {
        bmat,
        n,
        which,
        nev,
        resid,
        ncv,
        mut v,
        iparam,
        ipntr,
        workd,
        workl,
    } = work;

    if *ido == ido::START {
        let status = setup_code(bmat, n, which, nev, ncv, iparam);
        if status != code::NORMAL {
            *info = status;
            *ido = ido::DONE;
            return Ok(());
        }
        if *tol <= T::zero() {
            *tol = T::epsilon();
        }
        publish_pointers(ipntr, n, ncv);
        ipntr[STEP] = 0;
        ipntr[ITERATION] = 0;
        for slot in [NCONV, NUMOP, NUMOPB, NUMREO] {
            iparam[slot] = 0;
        }
    }

    // Continuation calls must describe the problem the run started with
    if nev == 0 || ncv <= nev || ncv > n || ipntr[STEP] < 0 || ipntr[STEP] as usize >= ncv {
        *info = code::NO_FACTORIZATION;
        *ido = ido::DONE;
        return Ok(());
    }

    let ldv = v.ld();
    let phase = ipntr[PHASE];
    let mut lanczos = Lanczos {
        blas,
        n,
        k: ncv,
        nev,
        which,
        v: v.region_mut(),
        ldv,
        resid,
        workd,
        iparam,
        ipntr,
        ws: Workspace::split(workl, ncv),
    };

    match (*ido, phase) {
        (ido::START, _) => lanczos.start(ido, info),
        (ido::FIRST_PRODUCT | ido::PRODUCT, AWAITING_PRODUCT) => {
            let j = lanczos.ipntr[STEP] as usize;
            lanczos.absorb_product(j, *tol, ido, info)
        }
        (ido::SHIFTS, AWAITING_SHIFTS) => lanczos.restart(ido, info),
        _ => {
            *info = code::NO_FACTORIZATION;
            *ido = ido::DONE;
            Ok(())
        }
    }
}

/// Ritz values and vectors of a finished `saupd` run.
///
/// Writes the converged wanted values to `d` in ascending order (mapped back
/// through `λ = σ + 1/θ` in mode 3) and, with `rvec`, the matching Ritz
/// vectors to the columns of `z`. `select[i]` is set for each Ritz value used.
#[allow(clippy::too_many_arguments)]
pub fn seupd<T: ArpackElement>(
    blas: &Blas,
    rvec: bool,
    howmny: Howmny,
    select: &mut [bool],
    d: &mut [T],
    mut z: MatrixViewMut<'_, T>,
    sigma: T,
    tol: T,
    work: LanczosWork<'_, T>,
    info: &mut i32,
) -> Result<()> {
    let LanczosWork {
        bmat,
        n,
        which,
        nev,
        ncv,
        mut v,
        iparam,
        workl,
        ..
    } = work;

    *info = code::NORMAL;
    let nconv = iparam[NCONV];
    if nconv == 0 {
        return Ok(());
    }

    let mode = iparam[MODE];
    let mut status = code::NORMAL;
    if nconv < 0 {
        status = code::NO_CONVERGED;
    }
    if n == 0 {
        status = code::N_RANGE;
    }
    if nev == 0 {
        status = code::NEV_RANGE;
    }
    if ncv <= nev || ncv > n {
        status = code::NCV_RANGE;
    }
    if rvec && howmny == Howmny::Select {
        status = code::HOWMNY_SELECT;
    }
    if !matches!(mode, 1 | 3) {
        status = code::MODE;
    } else if bmat == Bmat::Generalized {
        status = code::GENERALIZED;
    } else if nev == 1 && which == Which::BothEnds {
        status = code::BOTH_ENDS_SINGLE_EUPD;
    }
    if status != code::NORMAL {
        *info = status;
        return Ok(());
    }

    let k = ncv;
    let mut ws = Workspace::split(workl, k);
    if ws.ritz_pairs() > 0 {
        *info = code::TRIDIAGONAL_FAILED;
        return Ok(());
    }

    let tol = if tol <= T::zero() { T::epsilon() } else { tol };
    let eps23 = eps23::<T>();
    let order = preference(which, &ws.ritz[..], nev);
    let mut chosen: Vec<usize> = order[k - nev..]
        .iter()
        .copied()
        .filter(|&i| ws.converged(i, tol, eps23))
        .collect();
    if chosen.len() != nconv as usize {
        *info = code::CONVERGED_MISMATCH;
        return Ok(());
    }

    select.fill(false);
    for &i in &chosen {
        select[i] = true;
    }

    let eigenvalue = |theta: T| if mode == 3 { sigma + T::one() / theta } else { theta };
    chosen.sort_by(|&i, &j| {
        eigenvalue(ws.ritz[i])
            .partial_cmp(&eigenvalue(ws.ritz[j]))
            .unwrap_or(Ordering::Equal)
    });
    for (value, &i) in d.iter_mut().zip(&chosen) {
        *value = eigenvalue(ws.ritz[i]);
    }

    if rvec {
        let ldv = int(v.ld());
        let v = v.region_mut();
        for (column, &i) in chosen.iter().enumerate() {
            let q = &ws.q[i * k..(i + 1) * k];
            blas.gemv("N", int(n), int(k), T::one(), &v[..], ldv, q, 1, T::zero(), z.column_mut(column), 1)?;
        }
    }
    Ok(())
}
