use super::*;
use crate::assert;

/// Immutable view over a column-major matrix, similar to an immutable reference to a 2D strided
/// [prim@slice].
pub struct MatRef<'a, E> {
    pub(super) inner: MatImpl<E>,
    pub(super) __marker: PhantomData<&'a E>,
}

impl<E> Copy for MatRef<'_, E> {}
impl<E> Clone for MatRef<'_, E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'short, E> Reborrow<'short> for MatRef<'_, E> {
    type Target = MatRef<'short, E>;

    #[inline]
    fn rb(&'short self) -> Self::Target {
        *self
    }
}

impl<'short, E> ReborrowMut<'short> for MatRef<'_, E> {
    type Target = MatRef<'short, E>;

    #[inline]
    fn rb_mut(&'short mut self) -> Self::Target {
        *self
    }
}

impl<'a, E> IntoConst for MatRef<'a, E> {
    type Target = MatRef<'a, E>;

    #[inline]
    fn into_const(self) -> Self::Target {
        self
    }
}

impl<'a, E> MatRef<'a, E> {
    /// Creates a `MatRef` from a pointer to the first element, the dimensions and the column
    /// stride.
    ///
    /// # Safety
    /// The behavior is undefined if any of the following conditions are violated:
    /// * `col_stride >= nrows`.
    /// * For each `i < nrows` and `j < ncols`, `ptr.add(i + j * col_stride)` must point to a valid
    /// initialized element that is not mutated for the lifetime `'a`.
    #[inline(always)]
    pub unsafe fn from_raw_parts(
        ptr: *const E,
        nrows: usize,
        ncols: usize,
        col_stride: usize,
    ) -> Self {
        Self {
            inner: MatImpl {
                ptr: NonNull::new_unchecked(ptr as *mut E),
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

    /// Returns a reference to the element at the given indices, with bound checks.
    ///
    /// # Panics
    /// The function panics if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub fn get(self, row: usize, col: usize) -> &'a E {
        assert!(all(row < self.nrows(), col < self.ncols()));
        unsafe { &*self.inner.ptr.as_ptr().add(self.inner.offset(row, col)) }
    }
}

impl<E: Copy> MatRef<'_, E> {
    /// Reads the value of the element at the given indices.
    ///
    /// # Safety
    /// The behavior is undefined if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    pub unsafe fn read_unchecked(&self, row: usize, col: usize) -> E {
        debug_assert!(row < self.nrows() && col < self.ncols());
        *self.inner.ptr.as_ptr().add(self.inner.offset(row, col))
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
        *self.get(row, col)
    }
}
