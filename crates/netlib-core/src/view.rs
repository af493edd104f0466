//! Strided views over caller-owned flat buffers
//!
//! A view addresses a logical vector or column-major matrix embedded in a
//! slice without copying. Extents are computed algebraically when the view is
//! built, so element access afterwards can never leave the validated region.
//!
//! ```text
//!   buffer:  [ . . x . x . x . x . . ]
//!                  ^offset     ^offset + (n-1)*|inc|
//!
//!   inc > 0: logical element k at offset + k*inc
//!   inc < 0: logical element k at offset + (n-1-k)*|inc|
//! ```
//!
//! The negative-increment convention is the Fortran one: the caller always
//! passes the lowest address touched and the walk runs backwards from the
//! highest.

use crate::error::{NetlibError, Result};

/// Last index touched by `n` elements from `offset` with stride `inc`.
///
/// Returns `None` when `n == 0`, which carries no extent requirement.
#[inline]
pub fn vector_last_index(n: usize, offset: usize, inc: isize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    Some(
        (n - 1)
            .checked_mul(inc.unsigned_abs())
            .and_then(|span| span.checked_add(offset))
            .unwrap_or(usize::MAX),
    )
}

/// Last index touched by a `rows x cols` column-major operand with leading dimension `ld`.
#[inline]
pub fn matrix_last_index(rows: usize, cols: usize, offset: usize, ld: usize) -> Option<usize> {
    if rows == 0 || cols == 0 {
        return None;
    }
    Some(
        (cols - 1)
            .checked_mul(ld)
            .and_then(|span| span.checked_add(offset))
            .and_then(|start| start.checked_add(rows - 1))
            .unwrap_or(usize::MAX),
    )
}

/// Bounds check for an optional last index against a buffer length
#[inline]
pub fn check_last_index(last: Option<usize>, length: usize) -> Result<()> {
    match last {
        Some(index) if index >= length => Err(NetlibError::out_of_bounds(index, length)),
        _ => Ok(()),
    }
}

#[inline(always)]
fn strided_index(offset: usize, len: usize, inc: isize, k: usize) -> usize {
    if inc >= 0 {
        offset + k * inc as usize
    } else {
        offset + (len - 1 - k) * inc.unsigned_abs()
    }
}

/// Read-only strided vector
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a, T> {
    data: &'a [T],
    offset: usize,
    len: usize,
    inc: isize,
}

impl<'a, T: Copy> StridedView<'a, T> {
    /// Build a view, failing with a bounds error if the extent exceeds `data`
    pub fn new(data: &'a [T], offset: usize, len: usize, inc: isize) -> Result<Self> {
        check_last_index(vector_last_index(len, offset, inc), data.len())?;
        Ok(Self { data, offset, len, inc })
    }

    /// Contiguous view over a whole slice
    pub fn contiguous(data: &'a [T]) -> Self {
        Self {
            data,
            offset: 0,
            len: data.len(),
            inc: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn inc(&self) -> isize {
        self.inc
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    pub fn index(&self, k: usize) -> usize {
        strided_index(self.offset, self.len, self.inc, k)
    }

    /// Logical element `k`
    #[inline(always)]
    pub fn get(&self, k: usize) -> T {
        self.data[self.index(k)]
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(move |k| self.get(k))
    }

    /// Unit-stride elements as a plain slice
    pub fn as_contiguous(&self) -> Option<&'a [T]> {
        (self.inc == 1).then(|| &self.data[self.offset..self.offset + self.len])
    }

    /// Pointer to the lowest addressed element, as Fortran expects it
    pub fn base_ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.offset)
    }
}

/// Mutable strided vector
#[derive(Debug)]
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    offset: usize,
    len: usize,
    inc: isize,
}

impl<'a, T: Copy> StridedViewMut<'a, T> {
    pub fn new(data: &'a mut [T], offset: usize, len: usize, inc: isize) -> Result<Self> {
        check_last_index(vector_last_index(len, offset, inc), data.len())?;
        Ok(Self { data, offset, len, inc })
    }

    pub fn contiguous(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            data,
            offset: 0,
            len,
            inc: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn inc(&self) -> isize {
        self.inc
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    pub fn index(&self, k: usize) -> usize {
        strided_index(self.offset, self.len, self.inc, k)
    }

    #[inline(always)]
    pub fn get(&self, k: usize) -> T {
        self.data[self.index(k)]
    }

    #[inline(always)]
    pub fn set(&mut self, k: usize, value: T) {
        let index = self.index(k);
        self.data[index] = value;
    }

    #[inline(always)]
    pub fn get_mut(&mut self, k: usize) -> &mut T {
        let index = self.index(k);
        &mut self.data[index]
    }

    pub fn as_contiguous(&self) -> Option<&[T]> {
        (self.inc == 1).then(|| &self.data[self.offset..self.offset + self.len])
    }

    pub fn as_contiguous_mut(&mut self) -> Option<&mut [T]> {
        if self.inc == 1 {
            Some(&mut self.data[self.offset..self.offset + self.len])
        } else {
            None
        }
    }

    /// Shorter-lived mutable view over the same elements
    pub fn reborrow(&mut self) -> StridedViewMut<'_, T> {
        StridedViewMut {
            data: &mut *self.data,
            offset: self.offset,
            len: self.len,
            inc: self.inc,
        }
    }

    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &*self.data,
            offset: self.offset,
            len: self.len,
            inc: self.inc,
        }
    }

    pub fn base_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr().wrapping_add(self.offset)
    }
}

/// Read-only column-major matrix
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    offset: usize,
    rows: usize,
    cols: usize,
    ld: usize,
}

impl<'a, T: Copy> MatrixView<'a, T> {
    /// Build a view; `ld` must already have passed the routine's legality check
    pub fn new(data: &'a [T], offset: usize, rows: usize, cols: usize, ld: usize) -> Result<Self> {
        check_last_index(matrix_last_index(rows, cols, offset, ld), data.len())?;
        Ok(Self {
            data,
            offset,
            rows,
            cols,
            ld,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ld(&self) -> usize {
        self.ld
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[self.offset + i + j * self.ld]
    }

    /// Column `j` as a contiguous slice of `rows` elements
    #[inline(always)]
    pub fn column(&self, j: usize) -> &'a [T] {
        let start = self.offset + j * self.ld;
        &self.data[start..start + self.rows]
    }

    pub fn base_ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.offset)
    }
}

/// Mutable column-major matrix
#[derive(Debug)]
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    offset: usize,
    rows: usize,
    cols: usize,
    ld: usize,
}

impl<'a, T: Copy> MatrixViewMut<'a, T> {
    pub fn new(data: &'a mut [T], offset: usize, rows: usize, cols: usize, ld: usize) -> Result<Self> {
        check_last_index(matrix_last_index(rows, cols, offset, ld), data.len())?;
        Ok(Self {
            data,
            offset,
            rows,
            cols,
            ld,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ld(&self) -> usize {
        self.ld
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[self.offset + i + j * self.ld]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[self.offset + i + j * self.ld] = value;
    }

    #[inline(always)]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.data[self.offset + i + j * self.ld]
    }

    #[inline(always)]
    pub fn column_mut(&mut self, j: usize) -> &mut [T] {
        let start = self.offset + j * self.ld;
        &mut self.data[start..start + self.rows]
    }

    /// The validated region as one slice, starting at element `(0, 0)`.
    ///
    /// Chunking it by `ld` yields the columns, the last one `rows` long.
    pub fn region_mut(&mut self) -> &mut [T] {
        match matrix_last_index(self.rows, self.cols, self.offset, self.ld) {
            Some(last) => &mut self.data[self.offset..=last],
            None => &mut [],
        }
    }

    /// Column `j` as a mutable unit-stride vector of `rows` elements
    pub fn column_view_mut(&mut self, j: usize) -> StridedViewMut<'_, T> {
        StridedViewMut {
            data: &mut *self.data,
            offset: self.offset + j * self.ld,
            len: self.rows,
            inc: 1,
        }
    }

    /// Row `i` as a mutable vector of `cols` elements with stride `ld`
    pub fn row_view_mut(&mut self, i: usize) -> StridedViewMut<'_, T> {
        StridedViewMut {
            data: &mut *self.data,
            offset: self.offset + i,
            len: self.cols,
            inc: self.ld as isize,
        }
    }

    pub fn as_view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: &*self.data,
            offset: self.offset,
            rows: self.rows,
            cols: self.cols,
            ld: self.ld,
        }
    }

    pub fn base_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr().wrapping_add(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_has_no_extent() {
        assert_eq!(vector_last_index(0, 10, 3), None);
        assert!(StridedView::<f64>::new(&[], 10, 0, 3).is_ok());
    }

    #[test]
    fn extent_uses_absolute_increment() {
        assert_eq!(vector_last_index(3, 1, -2), Some(5));
        assert_eq!(vector_last_index(3, 1, 2), Some(5));
    }

    #[test]
    fn short_buffer_reports_last_index() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let err = StridedView::new(&data, 0, 5, 1).unwrap_err();
        assert_eq!(err, NetlibError::out_of_bounds(4, 4));
    }

    #[test]
    fn negative_increment_walks_backwards() {
        let data = [1, 2, 3, 4, 5];
        let view = StridedView::new(&data, 0, 3, -2).unwrap();
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![5, 3, 1]);
    }

    #[test]
    fn contiguous_only_for_unit_stride() {
        let data = [1, 2, 3, 4];
        assert_eq!(StridedView::new(&data, 1, 2, 1).unwrap().as_contiguous(), Some(&data[1..3]));
        assert!(StridedView::new(&data, 0, 2, 2).unwrap().as_contiguous().is_none());
    }

    #[test]
    fn matrix_extent_and_columns() {
        let data: Vec<i32> = (0..12).collect();
        let view = MatrixView::new(&data, 1, 2, 3, 4).unwrap();
        assert_eq!(view.get(1, 2), 10);
        assert_eq!(view.column(1), &[5, 6]);
        assert!(MatrixView::new(&data, 2, 3, 3, 4).is_err());
    }

    #[test]
    fn region_chunks_into_columns() {
        let mut data = vec![0; 10];
        let mut view = MatrixViewMut::new(&mut data, 1, 2, 3, 3).unwrap();
        let region = view.region_mut();
        assert_eq!(region.len(), 8);
        for column in region.chunks_mut(3) {
            column[0] = 1;
        }
        assert_eq!(data, vec![0, 1, 0, 0, 1, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn row_and_column_views() {
        let mut data: Vec<i32> = (0..6).collect();
        let mut view = MatrixViewMut::new(&mut data, 0, 2, 3, 2).unwrap();
        assert_eq!(view.row_view_mut(1).as_view().iter().collect::<Vec<_>>(), vec![1, 3, 5]);
        view.column_view_mut(2).set(0, 40);
        assert_eq!(data[4], 40);
    }

    #[test]
    fn mutable_view_sets_logical_elements() {
        let mut data = [0; 4];
        let mut view = StridedViewMut::new(&mut data, 0, 2, -2).unwrap();
        view.set(0, 7);
        assert_eq!(data, [0, 0, 7, 0]);
    }
}
