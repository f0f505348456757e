//! Eigenvalue decomposition of a real symmetric tridiagonal matrix.
//!
//! The eigenvalue decomposition of a symmetric tridiagonal matrix $T$ of shape $(n, n)$ is a
//! decomposition into two components $U$, $S$:
//!
//! - $U$ has shape $(n, n)$ and is orthogonal,
//! - $S$ has shape $(n, n)$ and is a real diagonal matrix,
//! - and finally:
//!
//! $$T = U S U^\top.$$
//!
//! The routines in this module use the implicit QL algorithm with Wilkinson shifts. The rotations
//! are accumulated into $U$ by a [`LaneGroup`], whose lanes each own a subset of the rows of $U$
//! and advance in lockstep with the scalar recurrence.
//!
//! # Storage
//! `diag` has length $n$ and holds the diagonal of $T$. `offdiag` also has length $n$: its first
//! element is ignored, and `offdiag[i]` holds $T_{i, i-1}$ for $i \ge 1$. On success `diag` holds
//! the eigenvalues and `offdiag` is zeroed.

use crate::{
    assert,
    sort::sort_with_permutation,
    utils::thread::{LaneGroup, RowPartition},
    MatMut, Parallelism, RealField,
};
use core::marker::PhantomData;
use reborrow::*;

#[doc(hidden)]
pub mod tridiag_ql;

/// Algorithm parameters.
#[derive(Copy, Clone, Debug)]
pub struct TridiagQlParams<E: RealField> {
    /// Number of extra sweeps allowed per eigenvalue, beyond the first one.
    pub max_sweeps: usize,
    /// Relative tolerance below which an off-diagonal element is considered negligible.
    pub tolerance: E,
    /// Whether the eigenvalues should be sorted in ascending order.
    ///
    /// Sorting requires a permutation buffer. The columns of the eigenvector matrix are not
    /// reordered: after the call, column `perm[k]` is the eigenvector of `diag[k]`.
    pub sort: bool,
    /// Assignment of the rows of the eigenvector matrix to the lanes.
    pub partition: RowPartition,

    #[doc(hidden)]
    pub __private: PhantomData<()>,
}

impl<E: RealField> Default for TridiagQlParams<E> {
    #[inline]
    fn default() -> Self {
        Self {
            max_sweeps: 10,
            tolerance: E::faer_ql_tolerance(),
            sort: false,
            partition: RowPartition::Strided,
            __private: PhantomData,
        }
    }
}

/// Algorithm result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TridiagQlInfo {
    /// Number of shifted sweeps executed, over all eigenvalues.
    pub sweep_count: usize,
    /// Number of Givens rotations applied to the eigenvector matrix.
    pub rotation_count: usize,

    #[doc(hidden)]
    pub __private: PhantomData<()>,
}

/// Algorithm error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TridiagQlError {
    /// Convergence failure.
    ///
    /// `diag`, `offdiag` and the eigenvector matrix are left in an unspecified state for the
    /// indices starting at `index`.
    NoConvergence {
        /// Index of the eigenvalue that exhausted its sweep budget.
        index: usize,
    },
}

impl TridiagQlError {
    /// Returns the 1-based index of the failing eigenvalue, as reported by the classic
    /// [`imtql2`] interface.
    #[inline]
    pub fn code(&self) -> usize {
        match *self {
            Self::NoConvergence { index } => index + 1,
        }
    }
}

impl core::fmt::Display for TridiagQlError {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for TridiagQlError {}

/// Computes the eigenvalue decomposition of a real symmetric tridiagonal matrix, and stores the
/// eigenvalues in `diag` and the eigenvectors in `u` if it is provided.
///
/// The lane group is built from `parallelism` for this call only. If the thread pool cannot be
/// created, the call logs a warning and runs on a single lane. Use
/// [`compute_tridiag_evd_ql_with_lanes`] to reuse a group across calls.
///
/// If `params.sort` is set, the eigenvalues are sorted in ascending order and `perm[k]` receives
/// the original index of `diag[k]`. The columns of `u` are left in their original order, see
/// [`crate::perm::permute_cols_in_place`].
///
/// # Panics
/// The function panics if any of the following conditions are violated:
/// * `offdiag.len() == diag.len()`.
/// * `u` has shape `(n, n)` if provided, with `n == diag.len()`.
/// * `perm` has length `n` if provided.
/// * `perm` is provided if `params.sort` is set.
#[track_caller]
pub fn compute_tridiag_evd_ql<E: RealField>(
    diag: &mut [E],
    offdiag: &mut [E],
    u: Option<MatMut<'_, E>>,
    perm: Option<&mut [usize]>,
    parallelism: Parallelism,
    params: TridiagQlParams<E>,
) -> Result<TridiagQlInfo, TridiagQlError> {
    let mut lanes = if u.is_some() {
        match LaneGroup::new(parallelism) {
            Ok(lanes) => lanes,
            Err(err) => {
                log::warn!("could not build a lane group for {parallelism:?} ({err}), falling back to a single lane");
                LaneGroup::serial()
            }
        }
    } else {
        LaneGroup::serial()
    };

    compute_tridiag_evd_ql_with_lanes(diag, offdiag, u, perm, &mut lanes, params)
}

/// Computes the eigenvalue decomposition of a real symmetric tridiagonal matrix, and stores the
/// eigenvalues in `diag` and the eigenvectors in `u` if it is provided.
///
/// The eigenvectors are accumulated by the lanes of `lanes`. The results are identical for every
/// lane count and row partition. When `u` is `None`, only the eigenvalues are computed, on the
/// calling thread.
///
/// See [`compute_tridiag_evd_ql`] for the meaning of the other parameters.
///
/// # Panics
/// The function panics if any of the following conditions are violated:
/// * `offdiag.len() == diag.len()`.
/// * `u` has shape `(n, n)` if provided, with `n == diag.len()`.
/// * `perm` has length `n` if provided.
/// * `perm` is provided if `params.sort` is set.
#[track_caller]
pub fn compute_tridiag_evd_ql_with_lanes<E: RealField>(
    diag: &mut [E],
    offdiag: &mut [E],
    u: Option<MatMut<'_, E>>,
    perm: Option<&mut [usize]>,
    lanes: &mut LaneGroup,
    params: TridiagQlParams<E>,
) -> Result<TridiagQlInfo, TridiagQlError> {
    let n = diag.len();
    assert!(offdiag.len() == n);
    if let Some(u) = u.rb() {
        assert!(all(u.nrows() == n, u.ncols() == n));
    }
    if let Some(perm) = perm.as_deref() {
        assert!(perm.len() == n);
    }
    if params.sort {
        assert!(perm.is_some());
    }

    if n == 0 {
        return Ok(TridiagQlInfo::default());
    }

    #[cfg(feature = "perf-warn")]
    if u.is_some() && lanes.width() > 1 {
        if lanes.width() > n && crate::__perf_warn!(IDLE_LANES_WARN) {
            log::warn!(
                target: "tridiag_ql_perf",
                "Lane group of width {} is wider than the {n}x{n} eigenvector matrix. Some lanes stay idle.",
                lanes.width(),
            );
        }
        if params.partition == RowPartition::Strided && crate::__perf_warn!(STRIDED_WARN) {
            log::warn!(
                target: "tridiag_ql_perf",
                "Strided row partition on several threads makes lanes share cache lines. Consider RowPartition::Blocked.",
            );
        }
    }

    let info = match u {
        Some(u) => tridiag_ql::ql_iterate_on_lanes(diag, offdiag, u, lanes, &params)?,
        None => tridiag_ql::ql_iterate(diag, offdiag, &params, |_, _| {})?,
    };

    if params.sort {
        if let Some(perm) = perm {
            sort_with_permutation(diag, perm);
        }
    }

    Ok(info)
}

/// Classic interface to [`compute_tridiag_evd_ql_with_lanes`].
///
/// `d` and `e` hold at least `n` elements, of which the first `n` are used. `z` is viewed as an
/// `n × n` column-major matrix with leading dimension `nm`. Elements of `z` outside that view are
/// not accessed.
///
/// Returns `0` on success, or the 1-based index of the eigenvalue that failed to converge.
///
/// # Panics
/// The function panics if any of the following conditions are violated:
/// * `d.len() >= n` and `e.len() >= n`.
/// * `nm >= n`, and `z` is long enough to hold the `n × n` view.
/// * `perm` holds at least `n` elements if provided.
/// * `perm` is provided if `params.sort` is set.
#[track_caller]
pub fn imtql2<E: RealField>(
    nm: usize,
    n: usize,
    d: &mut [E],
    e: &mut [E],
    z: &mut [E],
    perm: Option<&mut [usize]>,
    lanes: &mut LaneGroup,
    params: TridiagQlParams<E>,
) -> usize {
    assert!(all(d.len() >= n, e.len() >= n));
    let u = crate::mat::from_column_major_slice_with_stride_mut(z, n, n, nm);
    let perm = perm.map(|perm| {
        assert!(perm.len() >= n);
        &mut perm[..n]
    });

    match compute_tridiag_evd_ql_with_lanes(&mut d[..n], &mut e[..n], Some(u), perm, lanes, params)
    {
        Ok(_) => 0,
        Err(err) => err.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use crate::Mat;

    #[test]
    fn test_default_params() {
        let params = TridiagQlParams::<f64>::default();
        assert!(all(
            params.max_sweeps == 10,
            params.tolerance == f64::EPSILON * 512.0,
            !params.sort,
            params.partition == RowPartition::Strided,
        ));
        assert!(TridiagQlParams::<f32>::default().tolerance == f32::EPSILON * 16.0);
    }

    #[test]
    fn test_error_code() {
        let err = TridiagQlError::NoConvergence { index: 4 };
        assert!(err.code() == 5);
        assert!(alloc::format!("{err}") == "NoConvergence { index: 4 }");
    }

    #[test]
    fn test_entry_point() {
        let mut d = [2.0, 2.0];
        let mut e = [0.0, 1.0];
        let mut u = Mat::zeros(2, 2);
        let mut perm = [0; 2];
        let info = compute_tridiag_evd_ql(
            &mut d,
            &mut e,
            Some(u.as_mut()),
            Some(&mut perm),
            Parallelism::None,
            TridiagQlParams {
                sort: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(info.rotation_count == 1);
        assert!(d[0] < d[1]);
        assert!(crate::perm::is_permutation(&perm));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_entry_point_rayon() {
        let mut d = [1.0, 2.0, 3.0, 4.0];
        let mut e = [0.0, 0.5, 0.5, 0.5];
        let mut u = Mat::<f64>::zeros(4, 4);
        compute_tridiag_evd_ql(
            &mut d,
            &mut e,
            Some(u.as_mut()),
            None,
            Parallelism::Rayon(2),
            Default::default(),
        )
        .unwrap();
        let utu = u.transpose_mul(u.as_ref());
        for j in 0..4 {
            for i in 0..4 {
                let target: f64 = if i == j { 1.0 } else { 0.0 };
                assert!((utu.read(i, j) - target).abs() < 1e-12);
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_offdiag_length_mismatch() {
        let mut d = [1.0, 2.0];
        let mut e = [0.0];
        let _ = compute_tridiag_evd_ql_with_lanes(
            &mut d,
            &mut e,
            None,
            None,
            &mut LaneGroup::serial(),
            Default::default(),
        );
    }

    #[test]
    #[should_panic]
    fn test_wrong_u_shape() {
        let mut d = [1.0, 2.0];
        let mut e = [0.0, 1.0];
        let mut u = Mat::zeros(3, 2);
        let _ = compute_tridiag_evd_ql_with_lanes(
            &mut d,
            &mut e,
            Some(u.as_mut()),
            None,
            &mut LaneGroup::serial(),
            Default::default(),
        );
    }

    #[test]
    #[should_panic]
    fn test_sort_without_perm() {
        let mut d = [1.0, 2.0];
        let mut e = [0.0, 1.0];
        let _ = compute_tridiag_evd_ql_with_lanes(
            &mut d,
            &mut e,
            None,
            None,
            &mut LaneGroup::serial(),
            TridiagQlParams {
                sort: true,
                ..Default::default()
            },
        );
    }

    #[test]
    #[should_panic]
    fn test_small_leading_dimension() {
        let mut d = [1.0, 2.0, 3.0];
        let mut e = [0.0, 1.0, 1.0];
        let mut z = [0.0; 16];
        imtql2(
            2,
            3,
            &mut d,
            &mut e,
            &mut z,
            None,
            &mut LaneGroup::serial(),
            Default::default(),
        );
    }
}
