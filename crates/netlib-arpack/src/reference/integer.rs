//! Integer vector utilities

use netlib_core::{StridedView, StridedViewMut};

pub fn icnteq(array: StridedView<'_, i32>, value: i32) -> usize {
    array.iter().filter(|&element| element == value).count()
}

pub fn icopy(x: StridedView<'_, i32>, mut y: StridedViewMut<'_, i32>) {
    for k in 0..y.len() {
        y.set(k, x.get(k));
    }
}

pub fn iset(value: i32, mut array: StridedViewMut<'_, i32>) {
    for k in 0..array.len() {
        array.set(k, value);
    }
}

pub fn iswap(mut x: StridedViewMut<'_, i32>, mut y: StridedViewMut<'_, i32>) {
    for k in 0..x.len() {
        let held = x.get(k);
        x.set(k, y.get(k));
        y.set(k, held);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_integer_operations() {
        let a = [1, 7, 1, 7, 1];
        assert_eq!(icnteq(StridedView::new(&a, 0, 3, 2).unwrap(), 1), 3);
        assert_eq!(icnteq(StridedView::contiguous(&a), 7), 2);

        let source = [1, 2, 3];
        let mut b = [0; 3];
        icopy(StridedView::contiguous(&source), StridedViewMut::new(&mut b, 0, 3, -1).unwrap());
        assert_eq!(b, [3, 2, 1]);

        let mut c = [0; 4];
        iset(9, StridedViewMut::new(&mut c, 1, 2, 2).unwrap());
        assert_eq!(c, [0, 9, 0, 9]);

        let mut x = [1, 2];
        let mut y = [3, 4];
        iswap(StridedViewMut::contiguous(&mut x), StridedViewMut::contiguous(&mut y));
        assert_eq!((x, y), ([3, 4], [1, 2]));
    }
}
