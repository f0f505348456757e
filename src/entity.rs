//! Scalar abstraction over the real floating point types supported by the solver.

use core::fmt::Debug;

/// Real floating point scalar.
///
/// The solver only needs a handful of primitive operations, all of which map directly onto the
/// inherent methods of [`f32`] and [`f64`]. `faer_hypot` must not overflow or underflow for
/// intermediate results, and `faer_mul_add` must round once.
pub trait RealField: Copy + Debug + PartialOrd + Send + Sync + 'static {
    fn faer_zero() -> Self;
    fn faer_one() -> Self;
    fn faer_from_f64(value: f64) -> Self;

    fn faer_add(self, rhs: Self) -> Self;
    fn faer_sub(self, rhs: Self) -> Self;
    fn faer_mul(self, rhs: Self) -> Self;
    fn faer_div(self, rhs: Self) -> Self;
    fn faer_neg(self) -> Self;

    fn faer_abs(self) -> Self;
    /// Computes `sqrt(self² + rhs²)` without undue overflow or underflow.
    fn faer_hypot(self, rhs: Self) -> Self;
    /// Computes `self * a + b` with a single rounding.
    fn faer_mul_add(self, a: Self, b: Self) -> Self;

    /// Machine epsilon.
    fn faer_epsilon() -> Self;

    /// Default relative deflation tolerance of the QL iteration: the machine epsilon scaled by
    /// `512` for double precision, and by `16` for every other type.
    #[inline]
    fn faer_ql_tolerance() -> Self {
        let scale = if coe::is_same::<Self, f64>() {
            512.0
        } else {
            16.0
        };
        Self::faer_epsilon().faer_mul(Self::faer_from_f64(scale))
    }
}

macro_rules! impl_real_field {
    ($ty: ty) => {
        impl RealField for $ty {
            #[inline(always)]
            fn faer_zero() -> Self {
                0.0
            }

            #[inline(always)]
            fn faer_one() -> Self {
                1.0
            }

            #[inline(always)]
            fn faer_from_f64(value: f64) -> Self {
                value as _
            }

            #[inline(always)]
            fn faer_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn faer_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn faer_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn faer_div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline(always)]
            fn faer_neg(self) -> Self {
                -self
            }

            #[inline(always)]
            fn faer_abs(self) -> Self {
                self.abs()
            }

            #[inline(always)]
            fn faer_hypot(self, rhs: Self) -> Self {
                self.hypot(rhs)
            }

            #[inline(always)]
            fn faer_mul_add(self, a: Self, b: Self) -> Self {
                self.mul_add(a, b)
            }

            #[inline(always)]
            fn faer_epsilon() -> Self {
                Self::EPSILON
            }
        }
    };
}

impl_real_field!(f32);
impl_real_field!(f64);

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn test_default_tolerance() {
        assert!(f64::faer_ql_tolerance() == f64::EPSILON * 512.0);
        assert!(f32::faer_ql_tolerance() == f32::EPSILON * 16.0);
    }

    #[test]
    fn test_hypot_no_overflow() {
        let big = f64::MAX / 2.0;
        let h = big.faer_hypot(big);
        assert!(h.is_finite());
        assert!(h > big);

        let tiny = f64::MIN_POSITIVE;
        assert!(tiny.faer_hypot(tiny) > 0.0);
        assert!(3.0f32.faer_hypot(4.0) == 5.0);
    }

    #[test]
    fn test_mul_add_single_rounding() {
        // (1 + 2^-27)² = 1 + 2^-26 + 2^-54, the last term is lost by a rounded product
        let x = 1.0 + 2.0f64.powi(-27);
        let fused = x.faer_mul_add(x, -1.0);
        let split = x * x - 1.0;
        assert!(fused == 2.0f64.powi(-26) + 2.0f64.powi(-54));
        assert!(split == 2.0f64.powi(-26));
    }
}
