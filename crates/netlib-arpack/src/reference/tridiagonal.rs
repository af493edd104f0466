//! Symmetric tridiagonal eigensolver
//!
//! Implicit QL with Wilkinson shifts. The diagonal is `d`, and `e[i]` couples
//! rows `i` and `i + 1`. Each plane rotation is handed to a caller-supplied
//! closure, which lets the same sweep accumulate either the full eigenvector
//! matrix or only its last row.

use netlib_core::Real;

/// Sweeps allowed per eigenvalue before giving up
const MAX_SWEEPS: usize = 30;

/// Diagonalize `(d, e)` in place; `e` holds `d.len() - 1` couplings.
///
/// `rotate(i, c, s)` applies the rotation to columns `i` and `i + 1` of the
/// accumulated matrix. Returns the number of couplings left unconverged.
fn implicit_ql<T: Real>(d: &mut [T], e: &mut [T], mut rotate: impl FnMut(usize, T, T)) -> usize {
    let n = d.len();
    let eps = T::epsilon();
    let limit = MAX_SWEEPS * n;
    let coupling = |e: &[T], i: usize| if i + 1 < n { e[i] } else { T::zero() };

    let mut sweeps = 0;
    let mut shift = T::zero();
    let mut tst1 = T::zero();
    for l in 0..n {
        tst1 = tst1.max(d[l].abs() + coupling(e, l).abs());
        let mut m = l;
        while m + 1 < n && e[m].abs() > eps * tst1 {
            m += 1;
        }

        if m > l {
            loop {
                if sweeps == limit {
                    return e[l..].iter().filter(|value| !value.is_zero()).count();
                }
                sweeps += 1;

                let g = d[l];
                let mut p = (d[l + 1] - g) / (T::lit(2.0) * e[l]);
                let mut r = p.hypot(T::one());
                if p < T::zero() {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for value in &mut d[l + 2..] {
                    *value -= h;
                }
                shift += h;

                p = d[m];
                let el1 = coupling(e, l + 1);
                let (mut c, mut c2, mut c3) = (T::one(), T::one(), T::one());
                let (mut s, mut s2) = (T::zero(), T::zero());
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    let g = c * e[i];
                    h = c * p;
                    r = p.hypot(e[i]);
                    if i + 1 < n - 1 {
                        e[i + 1] = s * r;
                    }
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);
                    rotate(i, c, s);
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;
                if e[l].abs() <= eps * tst1 {
                    break;
                }
            }
        }
        d[l] += shift;
        if l + 1 < n {
            e[l] = T::zero();
        }
    }
    0
}

/// Rotate the pair `(x[i], x[i + 1])` of one row of the eigenvector matrix
#[inline(always)]
fn rotate_pair<T: Real>(x: &mut [T], i: usize, j: usize, c: T, s: T) {
    let h = x[j];
    x[j] = s * x[i] + c * h;
    x[i] = c * x[i] - s * h;
}

/// Eigenvalues of `(d, e)` in ascending order and the last component of each
/// normalized eigenvector in `z`.
///
/// `e` holds `n - 1` couplings and is destroyed. Returns 0, or the number of
/// couplings that failed to converge.
pub fn stqrb<T: Real>(d: &mut [T], e: &mut [T], z: &mut [T]) -> i32 {
    let n = d.len();
    if n == 0 {
        return 0;
    }
    z.fill(T::zero());
    z[n - 1] = T::one();
    if n == 1 {
        return 0;
    }

    let unconverged = implicit_ql(d, &mut e[..n - 1], |i, c, s| rotate_pair(z, i, i + 1, c, s));
    if unconverged > 0 {
        return unconverged as i32;
    }

    ascending(d, |j, k| z.swap(j, k));
    0
}

/// Eigenvalues of `(d, e)` in ascending order with the full `n x n`
/// eigenvector matrix in `q` (leading dimension `n`).
///
/// `e` holds at least `n - 1` couplings and is destroyed. Returns the number
/// of couplings that failed to converge.
pub(crate) fn eigen<T: Real>(d: &mut [T], e: &mut [T], q: &mut [T]) -> usize {
    let n = d.len();
    q[..n * n].fill(T::zero());
    for j in 0..n {
        q[j + j * n] = T::one();
    }
    if n < 2 {
        return 0;
    }

    let unconverged = implicit_ql(d, &mut e[..n - 1], |i, c, s| {
        let (left, right) = q.split_at_mut((i + 1) * n);
        let left = &mut left[i * n..];
        for (qi, qj) in left.iter_mut().zip(&mut right[..n]) {
            let h = *qj;
            *qj = s * *qi + c * h;
            *qi = c * *qi - s * h;
        }
    });
    if unconverged > 0 {
        return unconverged;
    }

    ascending(d, |j, k| {
        for row in 0..n {
            q.swap(row + j * n, row + k * n);
        }
    });
    0
}

/// Selection sort into ascending order, reporting each exchange
fn ascending<T: Real>(d: &mut [T], mut exchange: impl FnMut(usize, usize)) {
    for i in 0..d.len() {
        let mut smallest = i;
        for j in i + 1..d.len() {
            if d[j] < d[smallest] {
                smallest = j;
            }
        }
        if smallest != i {
            d.swap(i, smallest);
            exchange(i, smallest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-12, "expected {expected}, got {actual}");
    }

    #[test]
    fn two_by_two() {
        // [2 1; 1 2] has eigenvalues 1 and 3, eigenvectors (1, -1)/√2 and (1, 1)/√2
        let mut d = [2.0, 2.0];
        let mut e = [1.0];
        let mut z = [0.0; 2];
        assert_eq!(stqrb(&mut d, &mut e, &mut z), 0);
        assert_close(d[0], 1.0);
        assert_close(d[1], 3.0);
        assert_close(z[0].abs(), std::f64::consts::FRAC_1_SQRT_2);
        assert_close(z[1].abs(), std::f64::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn decoupled_blocks_keep_their_eigenvalues() {
        let mut d = [5.0, -1.0, 3.0];
        let mut e = [0.0, 0.0];
        let mut z = [0.0; 3];
        assert_eq!(stqrb(&mut d, &mut e, &mut z), 0);
        assert_eq!(d, [-1.0, 3.0, 5.0]);
        // The last row of the identity, permuted with the values
        assert_eq!(z, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn full_vectors_diagonalize_the_matrix() {
        // Second-difference matrix of order 4
        let n = 4;
        let (alpha, beta) = ([2.0; 4], [-1.0; 3]);
        let mut d = alpha;
        let mut e = beta;
        let mut q = [0.0; 16];
        assert_eq!(eigen(&mut d, &mut e, &mut q), 0);

        for (k, &lambda) in d.iter().enumerate() {
            let expected = 2.0 - 2.0 * ((k + 1) as f64 * std::f64::consts::PI / 5.0).cos();
            assert_close(lambda, expected);

            // T·q_k = λ·q_k
            let column = &q[k * n..(k + 1) * n];
            for i in 0..n {
                let mut tq = alpha[i] * column[i];
                if i > 0 {
                    tq += beta[i - 1] * column[i - 1];
                }
                if i + 1 < n {
                    tq += beta[i] * column[i + 1];
                }
                assert_close(tq, lambda * column[i]);
            }
        }
    }

    #[test]
    fn last_components_match_full_vectors() {
        let mut d = [4.0, 1.0, -2.0, 0.5, 3.0];
        let mut e = [1.0, 0.5, -0.25, 2.0];
        let (mut d2, mut e2) = (d, e);
        let mut z = [0.0; 5];
        let mut q = [0.0; 25];
        assert_eq!(stqrb(&mut d, &mut e, &mut z), 0);
        assert_eq!(eigen(&mut d2, &mut e2, &mut q), 0);
        for k in 0..5 {
            assert_close(d[k], d2[k]);
            assert_close(z[k].abs(), q[4 + 5 * k].abs());
        }
    }
}
