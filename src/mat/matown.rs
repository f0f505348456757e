use super::*;
use crate::{assert, RealField};
use alloc::vec::Vec;

/// Heap allocated column-major matrix, with a column stride that may exceed the number of rows.
#[derive(Clone)]
pub struct Mat<E> {
    data: Vec<E>,
    nrows: usize,
    ncols: usize,
    col_stride: usize,
}

impl<E: RealField> Mat<E> {
    /// Returns a new matrix with dimensions `(nrows, ncols)`, filled with zeros.
    #[inline]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::zeros_with_col_stride(nrows, ncols, nrows)
    }

    /// Returns a new matrix with dimensions `(nrows, ncols)` and the given column stride, filled
    /// with zeros. Padding elements between columns are zero as well.
    ///
    /// # Panics
    /// Panics if `col_stride < nrows`.
    #[track_caller]
    pub fn zeros_with_col_stride(nrows: usize, ncols: usize, col_stride: usize) -> Self {
        assert!(col_stride >= nrows);
        Self {
            data: alloc::vec![E::faer_zero(); col_stride * ncols],
            nrows,
            ncols,
            col_stride,
        }
    }

    /// Returns a new matrix with dimensions `(nrows, ncols)`, with ones on the diagonal and zeros
    /// everywhere else.
    pub fn identity(nrows: usize, ncols: usize) -> Self {
        Self::from_fn(nrows, ncols, |i, j| {
            if i == j {
                E::faer_one()
            } else {
                E::faer_zero()
            }
        })
    }

    /// Returns a new matrix with dimensions `(nrows, ncols)`, filled with the provided function.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl FnMut(usize, usize) -> E) -> Self {
        let mut f = f;
        let mut this = Self::zeros(nrows, ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                this.write(i, j, f(i, j));
            }
        }
        this
    }

    /// Returns the product `selfᵀ * rhs`.
    ///
    /// # Panics
    /// Panics if `self.nrows() != rhs.nrows()`.
    #[track_caller]
    pub fn transpose_mul(&self, rhs: MatRef<'_, E>) -> Self {
        assert!(self.nrows() == rhs.nrows());
        let lhs = self.as_ref();
        Self::from_fn(self.ncols(), rhs.ncols(), |i, j| {
            let mut acc = E::faer_zero();
            for k in 0..lhs.nrows() {
                acc = acc.faer_add(lhs.read(k, i).faer_mul(rhs.read(k, j)));
            }
            acc
        })
    }
}

impl<E> Mat<E> {
    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline(always)]
    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    /// Returns a view over the matrix.
    #[inline]
    pub fn as_ref(&self) -> MatRef<'_, E> {
        unsafe { MatRef::from_raw_parts(self.data.as_ptr(), self.nrows, self.ncols, self.col_stride) }
    }

    /// Returns a mutable view over the matrix.
    #[inline]
    pub fn as_mut(&mut self) -> MatMut<'_, E> {
        unsafe {
            MatMut::from_raw_parts_mut(
                self.data.as_mut_ptr(),
                self.nrows,
                self.ncols,
                self.col_stride,
            )
        }
    }
}

impl<E: Copy> Mat<E> {
    /// Reads the value of the element at the given indices, with bound checks.
    #[inline(always)]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> E {
        self.as_ref().read(row, col)
    }

    /// Writes the value to the element at the given indices, with bound checks.
    #[inline(always)]
    #[track_caller]
    pub fn write(&mut self, row: usize, col: usize, value: E) {
        self.as_mut().write(row, col, value)
    }
}

impl<E: PartialEq> PartialEq for Mat<E> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl<E: core::fmt::Debug> core::fmt::Debug for Mat<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.as_ref().fmt(f)
    }
}
