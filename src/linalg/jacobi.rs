use crate::{assert, utils::thread::LaneRows, MatMut, RealField};

/// Plane rotation `[[c, s], [-s, c]]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct JacobiRotation<T> {
    pub c: T,
    pub s: T,
}

impl<E: RealField> JacobiRotation<E> {
    /// Returns `[x, y] * self`.
    #[inline(always)]
    pub fn apply_on_the_right_1x2(&self, x: E, y: E) -> (E, E) {
        let Self { c, s } = *self;
        (
            c.faer_mul(x).faer_sub(s.faer_mul(y)),
            s.faer_mul(x).faer_add(c.faer_mul(y)),
        )
    }

    /// Replaces the columns `col` and `col + 1` of `u` by their product with `self`, restricted
    /// to the rows owned by a lane.
    ///
    /// # Panics
    /// The function panics if any of the following conditions are violated:
    /// * `col + 1 < u.ncols()`.
    /// * `rows.end() <= u.nrows()`.
    #[inline]
    #[track_caller]
    pub fn apply_on_the_right_in_place(&self, u: MatMut<'_, E>, col: usize, rows: LaneRows) {
        let mut u = u;
        assert!(all(col + 1 < u.ncols(), rows.end() <= u.nrows()));
        for k in rows {
            unsafe {
                let (x, y) =
                    self.apply_on_the_right_1x2(u.read_unchecked(k, col), u.read_unchecked(k, col + 1));
                u.write_unchecked(k, col, x);
                u.write_unchecked(k, col + 1, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert,
        utils::thread::{LaneGroup, RowPartition},
        Mat,
    };
    use assert_approx_eq::assert_approx_eq;

    fn serial_rows(nrows: usize) -> LaneRows {
        LaneGroup::serial()
            .run(|lane| lane.rows(nrows, RowPartition::Strided))
            .swap_remove(0)
    }

    #[test]
    fn test_right_1x2() {
        let rot = JacobiRotation { c: 0.6f64, s: 0.8 };
        let (x, y) = rot.apply_on_the_right_1x2(1.0, 2.0);
        assert_approx_eq!(x, 0.6 - 1.6);
        assert_approx_eq!(y, 0.8 + 1.2);

        let back = JacobiRotation { c: 0.6f64, s: -0.8 };
        let (x, y) = back.apply_on_the_right_1x2(x, y);
        assert_approx_eq!(x, 1.0);
        assert_approx_eq!(y, 2.0);
    }

    #[test]
    fn test_apply_on_all_rows() {
        let n = 5;
        let rot = JacobiRotation { c: 0.6f64, s: 0.8 };
        let init = Mat::from_fn(n, 3, |i, j| (i * 3 + j) as f64);

        let mut target = init.clone();
        rot.apply_on_the_right_in_place(target.as_mut(), 1, serial_rows(n));

        for i in 0..n {
            let (x, y) = rot.apply_on_the_right_1x2(init.read(i, 1), init.read(i, 2));
            assert!(all(
                target.read(i, 0) == init.read(i, 0),
                target.read(i, 1) == x,
                target.read(i, 2) == y,
            ));
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_apply_on_lane_rows() {
        let n = 5;
        let rot = JacobiRotation { c: 0.6f64, s: 0.8 };
        let init = Mat::from_fn(n, 3, |i, j| (i * 3 + j) as f64);

        let mut group = LaneGroup::with_width(2).unwrap();
        let even = group
            .run(|lane| lane.rows(n, RowPartition::Strided))
            .swap_remove(0);

        let mut target = init.clone();
        rot.apply_on_the_right_in_place(target.as_mut(), 1, even);

        for i in 0..n {
            let (x, y) = rot.apply_on_the_right_1x2(init.read(i, 1), init.read(i, 2));
            assert!(target.read(i, 0) == init.read(i, 0));
            if i % 2 == 0 {
                assert!(all(target.read(i, 1) == x, target.read(i, 2) == y));
            } else {
                assert!(all(
                    target.read(i, 1) == init.read(i, 1),
                    target.read(i, 2) == init.read(i, 2),
                ));
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_last_column_panics() {
        let mut m = Mat::<f64>::identity(3, 3);
        let rot = JacobiRotation { c: 1.0, s: 0.0 };
        rot.apply_on_the_right_in_place(m.as_mut(), 2, serial_rows(3));
    }

    #[test]
    #[should_panic]
    fn test_rows_beyond_matrix_panic() {
        let mut m = Mat::<f64>::identity(3, 3);
        let rot = JacobiRotation { c: 1.0, s: 0.0 };
        rot.apply_on_the_right_in_place(m.as_mut(), 0, serial_rows(4));
    }
}
