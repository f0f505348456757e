use crate::{assert, RealField};

/// Sorts `values` in ascending order with a selection sort, and records in `perm` the original
/// index of each value.
///
/// For each position, the scan keeps the first occurrence of the minimum among the remaining
/// values. The minimum is then moved into place by swapping it with the current occupant, so the
/// relative order of equal values is not preserved in general.
///
/// # Panics
/// Panics if `values.len() != perm.len()`.
#[track_caller]
pub(crate) fn sort_with_permutation<E: RealField>(values: &mut [E], perm: &mut [usize]) {
    let n = values.len();
    assert!(perm.len() == n);

    for (k, p) in perm.iter_mut().enumerate() {
        *p = k;
    }

    for l in 0..n.saturating_sub(1) {
        let mut min_value = values[l];
        let mut min_pos = l;
        for (j, &value) in values.iter().enumerate().skip(l + 1) {
            let replace = min_value > value;
            min_value = if replace { value } else { min_value };
            min_pos = if replace { j } else { min_pos };
        }

        if min_pos != l {
            perm.swap(l, min_pos);
            values[min_pos] = values[l];
            values[l] = min_value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use crate::perm::is_permutation;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[track_caller]
    fn check_sorted(original: &[f64], values: &[f64], perm: &[usize]) {
        assert!(is_permutation(perm));
        for k in 0..values.len() {
            assert!(values[k] == original[perm[k]]);
            if k > 0 {
                assert!(values[k - 1] <= values[k]);
            }
        }
    }

    #[test]
    fn test_small() {
        let mut values = [3.0, -1.0, 2.0];
        let mut perm = [usize::MAX; 3];
        sort_with_permutation(&mut values, &mut perm);
        assert!(values == [-1.0, 2.0, 3.0]);
        assert!(perm == [1, 2, 0]);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let mut values = [3.0, 1.0, 1.0];
        let mut perm = [0; 3];
        sort_with_permutation(&mut values, &mut perm);
        assert!(values == [1.0, 1.0, 3.0]);
        assert!(perm == [1, 2, 0]);

        let mut values = [1.0, 1.0];
        let mut perm = [0; 2];
        sort_with_permutation(&mut values, &mut perm);
        assert!(perm == [0, 1]);
    }

    #[test]
    fn test_trivial_sizes() {
        let mut values: [f64; 0] = [];
        let mut perm: [usize; 0] = [];
        sort_with_permutation(&mut values, &mut perm);

        let mut values = [4.0];
        let mut perm = [7];
        sort_with_permutation(&mut values, &mut perm);
        assert!(all(values == [4.0], perm == [0]));
    }

    #[test]
    fn test_random() {
        let rng = &mut StdRng::seed_from_u64(0);
        for n in [2, 5, 17, 64] {
            let original: Vec<f64> = (0..n).map(|_| rng.gen_range(-4..4) as f64).collect();
            let mut values = original.clone();
            let mut perm = vec![0; n];
            sort_with_permutation(&mut values, &mut perm);
            check_sorted(&original, &values, &perm);
        }
    }

    #[test]
    #[should_panic]
    fn test_length_mismatch() {
        let mut values = [1.0, 2.0];
        let mut perm = [0; 3];
        sort_with_permutation(&mut values, &mut perm);
    }
}
