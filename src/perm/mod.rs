//! Permutations stored as index arrays.
//!
//! A permutation of `0..n` is a slice `perm` of length `n` where `perm[k]` is the source index
//! of the element that ends up at position `k`. This is the layout the sorted eigensolver writes.

use crate::{assert, MatMut, RealField};
use alloc::vec::Vec;

/// Returns `true` if `perm` is a bijection on `0..perm.len()`.
pub fn is_permutation(perm: &[usize]) -> bool {
    let n = perm.len();
    let mut seen = alloc::vec![false; n];
    for &p in perm {
        if p >= n || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}

/// Returns the inverse of the given permutation, such that `inverse[perm[k]] == k`.
///
/// # Panics
/// Panics if `perm` is not a valid permutation.
#[track_caller]
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let n = perm.len();
    let mut inverse = alloc::vec![usize::MAX; n];
    for (k, &p) in perm.iter().enumerate() {
        assert!(p < n);
        assert!(inverse[p] == usize::MAX);
        inverse[p] = k;
    }
    inverse
}

/// Reorders the columns of `matrix` so that column `k` of the result is column `perm[k]` of the
/// input.
///
/// Applied to an eigenvector matrix with the permutation produced by a sorted eigensolver call,
/// this brings the eigenvectors into the order of the sorted eigenvalues.
///
/// # Panics
/// The function panics if any of the following conditions are violated:
/// * `perm.len() == matrix.ncols()`.
/// * `perm` is a valid permutation.
#[track_caller]
pub fn permute_cols_in_place<E: RealField>(matrix: MatMut<'_, E>, perm: &[usize]) {
    let mut matrix = matrix;
    assert!(perm.len() == matrix.ncols());
    assert!(is_permutation(perm));

    // follow the cycles of the permutation, moving one column at a time
    let n = perm.len();
    let mut done = alloc::vec![false; n];
    for start in 0..n {
        if done[start] {
            continue;
        }
        done[start] = true;
        let mut k = start;
        while perm[k] != start {
            matrix.swap_cols(k, perm[k]);
            k = perm[k];
            done[k] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use crate::Mat;

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[]));
        assert!(is_permutation(&[0]));
        assert!(is_permutation(&[2, 0, 1]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, 3, 1]));
    }

    #[test]
    fn test_inverse() {
        let perm = [2, 0, 3, 1];
        let inverse = inverse_permutation(&perm);
        assert!(inverse == [1, 3, 0, 2]);
        for k in 0..perm.len() {
            assert!(inverse[perm[k]] == k);
        }
    }

    #[test]
    #[should_panic]
    fn test_inverse_rejects_duplicates() {
        inverse_permutation(&[1, 1]);
    }

    #[test]
    fn test_permute_cols() {
        for perm in [
            alloc::vec![0, 1, 2, 3, 4],
            alloc::vec![1, 0, 2, 3, 4],
            alloc::vec![4, 3, 2, 1, 0],
            alloc::vec![1, 2, 3, 4, 0],
            alloc::vec![2, 4, 0, 1, 3],
        ] {
            let src = Mat::from_fn(3, 5, |i, j| (10 * j + i) as f64);
            let mut dst = src.clone();
            permute_cols_in_place(dst.as_mut(), &perm);
            for j in 0..5 {
                for i in 0..3 {
                    assert!(dst.read(i, j) == src.read(i, perm[j]));
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_permute_cols_wrong_len() {
        let mut m = Mat::<f64>::identity(3, 3);
        permute_cols_in_place(m.as_mut(), &[0, 1]);
    }
}
