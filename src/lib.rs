//! `tridiag-ql` computes the eigenvalues, and optionally the eigenvectors, of real symmetric
//! tridiagonal matrices with the implicit QL algorithm using Wilkinson shifts.
//!
//! The rotations produced by the scalar recurrence are accumulated into the eigenvector matrix by
//! a [`LaneGroup`]: a fixed-width team of threads that advance in lockstep through a collective
//! barrier, each one owning a disjoint subset of the rows of the matrix.
//!
//! # Example
//! ```
//! use tridiag_ql::{compute_tridiag_evd_ql, Mat, Parallelism, TridiagQlParams};
//!
//! // T = [[2, 1], [1, 2]], offdiag[0] is ignored
//! let mut diag = [2.0, 2.0];
//! let mut offdiag = [0.0, 1.0];
//! let mut u = Mat::<f64>::zeros(2, 2);
//! let mut perm = [0usize; 2];
//!
//! let params = TridiagQlParams {
//!     sort: true,
//!     ..Default::default()
//! };
//! compute_tridiag_evd_ql(
//!     &mut diag,
//!     &mut offdiag,
//!     Some(u.as_mut()),
//!     Some(&mut perm),
//!     Parallelism::None,
//!     params,
//! )
//! .unwrap();
//!
//! assert!((diag[0] - 1.0).abs() < 1e-12);
//! assert!((diag[1] - 3.0).abs() < 1e-12);
//! // the eigenvector of diag[k] is column perm[k] of u
//! let v = [u.read(0, perm[0]), u.read(1, perm[0])];
//! assert!((v[0] + v[1]).abs() < 1e-12);
//! ```

#![allow(clippy::too_many_arguments)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use equator::{assert, debug_assert};

extern crate alloc;

pub mod entity;
pub mod linalg;
pub mod mat;
pub mod perm;
pub mod utils;

mod sort;

pub use reborrow;

pub use entity::RealField;
pub use linalg::evd::{
    compute_tridiag_evd_ql, compute_tridiag_evd_ql_with_lanes, imtql2, TridiagQlError,
    TridiagQlInfo, TridiagQlParams,
};
pub use mat::{Mat, MatMut, MatRef};
pub use utils::thread::{Lane, LaneGroup, LaneGroupError, LaneRows, RowPartition};

/// Parallelism strategy that can be passed to the routines in the library.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parallelism {
    /// No parallelism.
    ///
    /// The code is executed sequentially on the same thread that calls a function
    /// and passes this argument.
    None,
    /// Rayon parallelism. Only available with the `rayon` feature.
    ///
    /// The eigenvector accumulation runs on a dedicated rayon thread pool with exactly this many
    /// threads.
    ///
    /// A value of `0` is treated as equivalent to `rayon::current_num_threads()`.
    #[cfg(feature = "rayon")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rayon")))]
    Rayon(usize),
}

#[cfg(feature = "perf-warn")]
#[macro_export]
#[doc(hidden)]
macro_rules! __perf_warn {
    ($name: ident) => {{
        #[inline(always)]
        #[allow(non_snake_case)]
        fn $name() -> &'static ::core::sync::atomic::AtomicBool {
            static $name: ::core::sync::atomic::AtomicBool =
                ::core::sync::atomic::AtomicBool::new(false);
            &$name
        }
        ::core::matches!(
            $name().compare_exchange(
                false,
                true,
                ::core::sync::atomic::Ordering::Relaxed,
                ::core::sync::atomic::Ordering::Relaxed,
            ),
            Ok(_)
        )
    }};
}
