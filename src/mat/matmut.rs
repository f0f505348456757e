use super::*;
use crate::assert;

/// Mutable view over a column-major matrix, similar to a mutable reference to a 2D strided
/// [prim@slice].
///
/// # Move semantics
/// Since `MatMut` mutably borrows data, it cannot be [`Copy`]. The way to pass it to a function
/// without giving it up is the [`reborrow::ReborrowMut`] trait, which mutably borrows a `MatMut`
/// to obtain another `MatMut` for the lifetime of the borrow.
/// ```
/// use reborrow::*;
/// use tridiag_ql::{Mat, MatMut};
///
/// fn takes_matmut(view: MatMut<'_, f64>) {}
///
/// let mut matrix = Mat::<f64>::zeros(2, 2);
/// let mut view = matrix.as_mut();
///
/// takes_matmut(view.rb_mut());
/// takes_matmut(view.rb_mut());
/// // view is still usable here
/// ```
pub struct MatMut<'a, E> {
    pub(super) inner: MatImpl<E>,
    pub(super) __marker: PhantomData<&'a mut E>,
}

impl<'short, E> Reborrow<'short> for MatMut<'_, E> {
    type Target = MatRef<'short, E>;

    #[inline]
    fn rb(&'short self) -> Self::Target {
        MatRef {
            inner: self.inner,
            __marker: PhantomData,
        }
    }
}

impl<'short, E> ReborrowMut<'short> for MatMut<'_, E> {
    type Target = MatMut<'short, E>;

    #[inline]
    fn rb_mut(&'short mut self) -> Self::Target {
        MatMut {
            inner: self.inner,
            __marker: PhantomData,
        }
    }
}

impl<'a, E> IntoConst for MatMut<'a, E> {
    type Target = MatRef<'a, E>;

    #[inline]
    fn into_const(self) -> Self::Target {
        MatRef {
            inner: self.inner,
            __marker: PhantomData,
        }
    }
}

impl<'a, E> MatMut<'a, E> {
    /// Creates a `MatMut` from a pointer to the first element, the dimensions and the column
    /// stride.
    ///
    /// # Safety
    /// The behavior is undefined if any of the following conditions are violated:
    /// * `col_stride >= nrows`.
    /// * For each `i < nrows` and `j < ncols`, `ptr.add(i + j * col_stride)` must point to a valid
    /// initialized element that is not accessed through any other pointer for the lifetime `'a`,
    /// except through views that only touch disjoint elements.
    #[inline(always)]
    pub unsafe fn from_raw_parts_mut(
        ptr: *mut E,
        nrows: usize,
        ncols: usize,
        col_stride: usize,
    ) -> Self {
        Self {
            inner: MatImpl {
                ptr: NonNull::new_unchecked(ptr),
                nrows,
                ncols,
                col_stride,
            },
            __marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.inner.nrows
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.inner.ncols
    }

    /// Returns the distance between the starts of two consecutive columns, in elements.
    #[inline(always)]
    pub fn col_stride(&self) -> usize {
        self.inner.col_stride
    }

    #[inline(always)]
    pub fn as_ptr_mut(self) -> *mut E {
        self.inner.ptr.as_ptr()
    }
}

impl<E: Copy> MatMut<'_, E> {
    /// Reads the value of the element at the given indices.
    ///
    /// # Safety
    /// The behavior is undefined if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    pub unsafe fn read_unchecked(&self, row: usize, col: usize) -> E {
        self.rb().read_unchecked(row, col)
    }

    /// Reads the value of the element at the given indices, with bound checks.
    ///
    /// # Panics
    /// The function panics if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> E {
        self.rb().read(row, col)
    }

    /// Writes the value to the element at the given indices.
    ///
    /// # Safety
    /// The behavior is undefined if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    pub unsafe fn write_unchecked(&mut self, row: usize, col: usize, value: E) {
        debug_assert!(row < self.nrows() && col < self.ncols());
        *self.inner.ptr.as_ptr().add(self.inner.offset(row, col)) = value;
    }

    /// Writes the value to the element at the given indices, with bound checks.
    ///
    /// # Panics
    /// The function panics if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub fn write(&mut self, row: usize, col: usize, value: E) {
        assert!(all(row < self.nrows(), col < self.ncols()));
        unsafe { self.write_unchecked(row, col, value) };
    }

    /// Swaps the columns at indices `a` and `b`.
    ///
    /// # Panics
    /// Panics if either `a` or `b` is out of bounds.
    #[track_caller]
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        assert!(all(a < self.ncols(), b < self.ncols()));
        if a == b {
            return;
        }
        for i in 0..self.nrows() {
            unsafe {
                let xa = self.read_unchecked(i, a);
                let xb = self.read_unchecked(i, b);
                self.write_unchecked(i, a, xb);
                self.write_unchecked(i, b, xa);
            }
        }
    }
}
