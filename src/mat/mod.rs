//! Column-major matrix views with an explicit column stride (leading dimension), and a minimal
//! owned matrix type.
//!
//! Element `(row, col)` of a view with column stride `ld` lives at offset `row + col * ld` from
//! the start of the underlying buffer. The column stride must be at least the number of rows, so
//! that distinct elements never alias.

use crate::assert;
use core::{marker::PhantomData, ptr::NonNull};
use reborrow::*;

mod matmut;
mod matown;
mod matref;

pub use matmut::MatMut;
pub use matown::Mat;
pub use matref::MatRef;

struct MatImpl<E> {
    ptr: NonNull<E>,
    nrows: usize,
    ncols: usize,
    col_stride: usize,
}

impl<E> Copy for MatImpl<E> {}
impl<E> Clone for MatImpl<E> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

unsafe impl<E: Sync> Sync for MatImpl<E> {}
unsafe impl<E: Send> Send for MatImpl<E> {}

impl<E> MatImpl<E> {
    #[inline(always)]
    fn offset(&self, row: usize, col: usize) -> usize {
        row + col * self.col_stride
    }
}

/// Minimum buffer length for an `nrows × ncols` column-major matrix with the given column stride.
#[inline]
pub fn min_slice_len(nrows: usize, ncols: usize, col_stride: usize) -> usize {
    if nrows == 0 || ncols == 0 {
        0
    } else {
        (ncols - 1) * col_stride + nrows
    }
}

#[track_caller]
#[inline]
fn check_slice_shape(len: usize, nrows: usize, ncols: usize, col_stride: usize) {
    assert!(all(
        col_stride >= nrows,
        len >= min_slice_len(nrows, ncols, col_stride),
    ));
}

/// Creates a `MatRef` from a column-major slice with the given column stride.
///
/// # Panics
/// The function panics if any of the following conditions are violated:
/// * `col_stride >= nrows`.
/// * `slice.len() >= (ncols - 1) * col_stride + nrows` when the matrix is not empty.
#[track_caller]
#[inline]
pub fn from_column_major_slice_with_stride<E>(
    slice: &[E],
    nrows: usize,
    ncols: usize,
    col_stride: usize,
) -> MatRef<'_, E> {
    check_slice_shape(slice.len(), nrows, ncols, col_stride);
    unsafe { MatRef::from_raw_parts(slice.as_ptr(), nrows, ncols, col_stride) }
}

/// Creates a `MatMut` from a mutable column-major slice with the given column stride.
///
/// # Panics
/// The function panics if any of the following conditions are violated:
/// * `col_stride >= nrows`.
/// * `slice.len() >= (ncols - 1) * col_stride + nrows` when the matrix is not empty.
#[track_caller]
#[inline]
pub fn from_column_major_slice_with_stride_mut<E>(
    slice: &mut [E],
    nrows: usize,
    ncols: usize,
    col_stride: usize,
) -> MatMut<'_, E> {
    check_slice_shape(slice.len(), nrows, ncols, col_stride);
    unsafe { MatMut::from_raw_parts_mut(slice.as_mut_ptr(), nrows, ncols, col_stride) }
}

impl<E: PartialEq> PartialEq<MatRef<'_, E>> for MatRef<'_, E> {
    fn eq(&self, other: &MatRef<'_, E>) -> bool {
        if self.nrows() != other.nrows() || self.ncols() != other.ncols() {
            return false;
        }
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                if self.get(i, j) != other.get(i, j) {
                    return false;
                }
            }
        }
        true
    }
}

impl<E: core::fmt::Debug> core::fmt::Debug for MatRef<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct Row<'a, E>(MatRef<'a, E>, usize);
        impl<E: core::fmt::Debug> core::fmt::Debug for Row<'_, E> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_list()
                    .entries((0..self.0.ncols()).map(|j| self.0.get(self.1, j)))
                    .finish()
            }
        }
        f.debug_list()
            .entries((0..self.nrows()).map(|i| Row(*self, i)))
            .finish()
    }
}

impl<E: core::fmt::Debug> core::fmt::Debug for MatMut<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.rb().fmt(f)
    }
}
