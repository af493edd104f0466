//! Level 1: vector-vector operations

use netlib_core::{Real, StridedView, StridedViewMut};

pub fn asum<T: Real>(x: StridedView<'_, T>) -> T {
    x.iter().map(T::abs).sum()
}

pub fn axpy<T: Real>(alpha: T, x: StridedView<'_, T>, mut y: StridedViewMut<'_, T>) {
    for k in 0..y.len() {
        *y.get_mut(k) += alpha * x.get(k);
    }
}

pub fn copy<T: Real>(x: StridedView<'_, T>, mut y: StridedViewMut<'_, T>) {
    for k in 0..y.len() {
        y.set(k, x.get(k));
    }
}

pub fn dot<T: Real>(x: StridedView<'_, T>, y: StridedView<'_, T>) -> T {
    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}

/// `x·y` accumulated in double precision
pub fn dot_wide(x: StridedView<'_, f32>, y: StridedView<'_, f32>) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a as f64 * b as f64).sum()
}

/// Euclidean norm using a running scale so that no square overflows
pub fn nrm2<T: Real>(x: StridedView<'_, T>) -> T {
    let mut scale = T::zero();
    let mut ssq = T::one();
    for value in x.iter() {
        if value != T::zero() {
            let absxi = value.abs();
            if scale < absxi {
                let ratio = scale / absxi;
                ssq = T::one() + ssq * ratio * ratio;
                scale = absxi;
            } else {
                let ratio = absxi / scale;
                ssq += ratio * ratio;
            }
        }
    }
    scale * ssq.sqrt()
}

pub fn rot<T: Real>(mut x: StridedViewMut<'_, T>, mut y: StridedViewMut<'_, T>, c: T, s: T) {
    for k in 0..x.len() {
        let (xk, yk) = (x.get(k), y.get(k));
        x.set(k, c * xk + s * yk);
        y.set(k, c * yk - s * xk);
    }
}

/// Construct a Givens rotation zeroing `b`; `a` receives `r` and `b` receives `z`
pub fn rotg<T: Real>(a: &mut T, b: &mut T, c: &mut T, s: &mut T) {
    let roe = if a.abs() > b.abs() { *a } else { *b };
    let scale = a.abs() + b.abs();
    if scale == T::zero() {
        *c = T::one();
        *s = T::zero();
        *a = T::zero();
        *b = T::zero();
        return;
    }
    let (sa, sb) = (*a / scale, *b / scale);
    let r = (scale * (sa * sa + sb * sb).sqrt()).copysign(roe);
    *c = *a / r;
    *s = *b / r;
    let mut z = T::one();
    if a.abs() > b.abs() {
        z = *s;
    }
    if b.abs() >= a.abs() && *c != T::zero() {
        z = T::one() / *c;
    }
    *a = r;
    *b = z;
}

/// Apply a modified Givens transformation; `param` is `[flag, h11, h21, h12, h22]`
pub fn rotm<T: Real>(mut x: StridedViewMut<'_, T>, mut y: StridedViewMut<'_, T>, param: StridedView<'_, T>) {
    let flag = param.get(0);
    let two = T::lit(2.0);
    if flag == -two {
        return;
    }
    let (h11, h21, h12, h22) = if flag < T::zero() {
        (param.get(1), param.get(2), param.get(3), param.get(4))
    } else if flag == T::zero() {
        (T::one(), param.get(2), param.get(3), T::one())
    } else {
        (param.get(1), -T::one(), T::one(), param.get(4))
    };
    for k in 0..x.len() {
        let (w, z) = (x.get(k), y.get(k));
        x.set(k, w * h11 + z * h12);
        y.set(k, w * h21 + z * h22);
    }
}

/// Construct a modified Givens transformation zeroing the second component of
/// `(sqrt(d1)·x1, sqrt(d2)·y1)`
pub fn rotmg<T: Real>(d1: &mut T, d2: &mut T, x1: &mut T, y1: T, mut param: StridedViewMut<'_, T>) {
    let zero = T::zero();
    let one = T::one();
    let gam = T::lit(4096.0);
    let gamsq = gam * gam;
    let rgamsq = one / gamsq;

    let (mut flag, mut h11, mut h12, mut h21, mut h22) = (zero, zero, zero, zero, zero);

    let clear = |flag: &mut T, d1: &mut T, d2: &mut T, x1: &mut T| {
        *flag = -one;
        *d1 = zero;
        *d2 = zero;
        *x1 = zero;
    };

    if *d1 < zero {
        clear(&mut flag, d1, d2, x1);
    } else {
        let p2 = *d2 * y1;
        if p2 == zero {
            param.set(0, -T::lit(2.0));
            return;
        }
        let p1 = *d1 * *x1;
        let q2 = p2 * y1;
        let q1 = p1 * *x1;
        if q1.abs() > q2.abs() {
            h21 = -y1 / *x1;
            h12 = p2 / p1;
            let u = one - h12 * h21;
            if u > zero {
                flag = zero;
                *d1 /= u;
                *d2 /= u;
                *x1 *= u;
            } else {
                h21 = zero;
                h12 = zero;
                clear(&mut flag, d1, d2, x1);
            }
        } else if q2 < zero {
            clear(&mut flag, d1, d2, x1);
        } else {
            flag = one;
            h11 = p1 / p2;
            h22 = *x1 / y1;
            let u = one + h11 * h22;
            let temp = *d2 / u;
            *d2 = *d1 / u;
            *d1 = temp;
            *x1 = y1 * u;
        }

        // Materialize the implied entries before rescaling makes them explicit
        let make_explicit = |flag: &mut T, h11: &mut T, h12: &mut T, h21: &mut T, h22: &mut T| {
            if *flag == zero {
                *h11 = one;
                *h22 = one;
            } else if *flag == one {
                *h21 = -one;
                *h12 = one;
            }
            *flag = -one;
        };

        if *d1 != zero {
            while *d1 <= rgamsq || *d1 >= gamsq {
                make_explicit(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if *d1 <= rgamsq {
                    *d1 *= gamsq;
                    *x1 /= gam;
                    h11 /= gam;
                    h12 /= gam;
                } else {
                    *d1 /= gamsq;
                    *x1 *= gam;
                    h11 *= gam;
                    h12 *= gam;
                }
            }
        }

        if *d2 != zero {
            while d2.abs() <= rgamsq || d2.abs() >= gamsq {
                make_explicit(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if d2.abs() <= rgamsq {
                    *d2 *= gamsq;
                    h21 /= gam;
                    h22 /= gam;
                } else {
                    *d2 /= gamsq;
                    h21 *= gam;
                    h22 *= gam;
                }
            }
        }
    }

    if flag < zero {
        param.set(1, h11);
        param.set(2, h21);
        param.set(3, h12);
        param.set(4, h22);
    } else if flag == zero {
        param.set(2, h21);
        param.set(3, h12);
    } else {
        param.set(1, h11);
        param.set(4, h22);
    }
    param.set(0, flag);
}

pub fn scal<T: Real>(alpha: T, mut x: StridedViewMut<'_, T>) {
    for k in 0..x.len() {
        *x.get_mut(k) *= alpha;
    }
}

pub fn swap<T: Real>(mut x: StridedViewMut<'_, T>, mut y: StridedViewMut<'_, T>) {
    for k in 0..x.len() {
        let xk = x.get(k);
        x.set(k, y.get(k));
        y.set(k, xk);
    }
}

/// First position of the largest magnitude; 0 for an empty view
pub fn iamax<T: Real>(x: StridedView<'_, T>) -> usize {
    let mut best = 0;
    let mut max = T::neg_infinity();
    for (k, value) in x.iter().enumerate() {
        let magnitude = value.abs();
        if magnitude > max {
            max = magnitude;
            best = k;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nrm2_survives_large_values() {
        let x = [3.0e300_f64, 4.0e300];
        let norm = nrm2(StridedView::contiguous(&x));
        assert!((norm / 5.0e300 - 1.0).abs() < 1e-14);
    }

    #[test]
    fn rotg_zeroes_second_component() {
        let (mut a, mut b, mut c, mut s) = (3.0f64, 4.0, 0.0, 0.0);
        rotg(&mut a, &mut b, &mut c, &mut s);
        assert!((a - 5.0).abs() < 1e-12);
        assert!((c - 0.6).abs() < 1e-12);
        assert!((s - 0.8).abs() < 1e-12);
        // |b| >= |a|, so z = 1/c
        assert!((b - 1.0 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn rotg_of_zero_is_identity() {
        let (mut a, mut b, mut c, mut s) = (0.0f32, 0.0, 9.0, 9.0);
        rotg(&mut a, &mut b, &mut c, &mut s);
        assert_eq!((a, b, c, s), (0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn rotm_with_skip_flag_leaves_vectors() {
        let mut x = [1.0, 2.0];
        let mut y = [3.0, 4.0];
        let param = [-2.0, 9.0, 9.0, 9.0, 9.0];
        rotm(
            StridedViewMut::contiguous(&mut x),
            StridedViewMut::contiguous(&mut y),
            StridedView::contiguous(&param),
        );
        assert_eq!((x, y), ([1.0, 2.0], [3.0, 4.0]));
    }

    #[test]
    fn rotmg_then_rotm_zeroes_y() {
        let (mut d1, mut d2, mut x1, y1) = (2.0f64, 3.0, 1.5, 0.5);
        let mut param = [0.0; 5];
        rotmg(&mut d1, &mut d2, &mut x1, y1, StridedViewMut::contiguous(&mut param));
        let mut x = [1.5];
        let mut y = [0.5];
        rotm(
            StridedViewMut::contiguous(&mut x),
            StridedViewMut::contiguous(&mut y),
            StridedView::contiguous(&param),
        );
        assert!(y[0].abs() < 1e-12);
        assert!((x[0] - x1).abs() < 1e-12);
    }

    #[test]
    fn iamax_takes_first_maximum() {
        let x = [1.0, -5.0, 5.0, 2.0];
        assert_eq!(iamax(StridedView::contiguous(&x)), 1);
    }
}
