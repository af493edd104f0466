//! Shell sorts that put the wanted end of the spectrum last
//!
//! | which | order of the result          |
//! |-------|------------------------------|
//! | `LA`  | increasing algebraic         |
//! | `SA`  | decreasing algebraic         |
//! | `LM`  | increasing magnitude         |
//! | `SM`  | decreasing magnitude         |
//!
//! The gap sequence halves from `n / 2`, so ties end up in the same order as
//! in the Fortran routines.

use netlib_core::{MatrixViewMut, Real};

use crate::flags::Which;

/// Whether `a` must move behind `b`
fn out_of_order<T: Real>(which: Which) -> fn(T, T) -> bool {
    match which {
        Which::SmallestAlgebraic => |a: T, b: T| a < b,
        Which::LargestMagnitude => |a: T, b: T| a.abs() > b.abs(),
        Which::SmallestMagnitude => |a: T, b: T| a.abs() < b.abs(),
        Which::LargestAlgebraic | Which::BothEnds => |a: T, b: T| a > b,
    }
}

/// Sort `x` in place, reporting every exchange of positions `(j, k)`
fn shell_sort<T: Real>(which: Which, x: &mut [T], mut exchange: impl FnMut(usize, usize)) {
    let out_of_order = out_of_order::<T>(which);
    let mut gap = x.len() / 2;
    while gap > 0 {
        for i in gap..x.len() {
            let mut j = i - gap;
            while out_of_order(x[j], x[j + gap]) {
                x.swap(j, j + gap);
                exchange(j, j + gap);
                if j < gap {
                    break;
                }
                j -= gap;
            }
        }
        gap /= 2;
    }
}

/// Sort `x1`, applying the same permutation to `x2` when `apply` is set
pub fn sortr<T: Real>(which: Which, apply: bool, x1: &mut [T], x2: &mut [T]) {
    shell_sort(which, x1, |j, k| {
        if apply {
            x2.swap(j, k);
        }
    });
}

/// Sort `x`, applying the same permutation to the columns of `a` when `apply` is set
pub fn sesrt<T: Real>(which: Which, apply: bool, x: &mut [T], mut a: MatrixViewMut<'_, T>) {
    shell_sort(which, x, |j, k| {
        if apply {
            for i in 0..a.rows() {
                let held = a.get(i, j);
                a.set(i, j, a.get(i, k));
                a.set(i, k, held);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wanted_end_goes_last() {
        let values = [3.0, -5.0, 1.0, 4.0, -2.0];

        let mut x = values;
        sortr(Which::LargestAlgebraic, false, &mut x, &mut []);
        assert_eq!(x, [-5.0, -2.0, 1.0, 3.0, 4.0]);

        let mut x = values;
        sortr(Which::SmallestAlgebraic, false, &mut x, &mut []);
        assert_eq!(x, [4.0, 3.0, 1.0, -2.0, -5.0]);

        let mut x = values;
        sortr(Which::LargestMagnitude, false, &mut x, &mut []);
        assert_eq!(x, [1.0, -2.0, 3.0, 4.0, -5.0]);

        let mut x = values;
        sortr(Which::SmallestMagnitude, false, &mut x, &mut []);
        assert_eq!(x, [-5.0, 4.0, 3.0, -2.0, 1.0]);
    }

    #[test]
    fn companion_follows_the_permutation() {
        let mut x = [2.0, 0.5, 1.0];
        let mut tags = [20.0, 5.0, 10.0];
        sortr(Which::LargestAlgebraic, true, &mut x, &mut tags);
        assert_eq!(tags, [5.0, 10.0, 20.0]);
    }

    #[test]
    fn columns_follow_the_permutation() {
        let mut x = [2.0, 0.5];
        let mut a = [1.0, 2.0, 3.0, 4.0];
        let view = MatrixViewMut::new(&mut a, 0, 2, 2, 2).unwrap();
        sesrt(Which::LargestAlgebraic, true, &mut x, view);
        assert_eq!(x, [0.5, 2.0]);
        assert_eq!(a, [3.0, 4.0, 1.0, 2.0]);
    }
}
