//! Implicit QL iteration with Wilkinson shifts on a symmetric tridiagonal matrix.
//!
//! The scalar recurrence runs on a single thread (the leader lane). Each Givens rotation it
//! produces is handed to every lane of the group, which then applies it to the rows of the
//! eigenvector matrix that it owns.

use super::{TridiagQlError, TridiagQlInfo, TridiagQlParams};
use crate::{
    debug_assert,
    linalg::jacobi::JacobiRotation,
    utils::thread::{LaneGroup, Ptr},
    MatMut, RealField,
};
use reborrow::*;

/// Message sent from the leader lane to the rest of the group.
#[derive(Copy, Clone, Debug)]
enum Step<E> {
    /// Apply the rotation to the columns `col` and `col + 1`.
    Rotate { col: usize, rot: JacobiRotation<E> },
    /// The iteration is over.
    Halt,
}

/// Two-slot mailbox shared by the lanes. Each lane keeps its own cursor.
///
/// The leader posts into one slot and then waits on the barrier, after which the other lanes
/// read that same slot. The next post goes to the other slot, so a slot is only overwritten once
/// every lane has passed the barrier that follows its last read.
struct Mailbox<E> {
    slots: Ptr<Step<E>>,
    next: usize,
}

impl<E: Copy> Mailbox<E> {
    /// # Safety
    /// Must only be called by the leader, with the group synchronized between two posts.
    #[inline(always)]
    unsafe fn post(&mut self, step: Step<E>) {
        *self.slots.get().add(self.next) = step;
        self.next ^= 1;
    }

    /// # Safety
    /// Must be called after the barrier that follows the matching post.
    #[inline(always)]
    unsafe fn take(&mut self) -> Step<E> {
        let step = *self.slots.get().add(self.next);
        self.next ^= 1;
        step
    }
}

/// Returns the `m ≥ l` at which the block starting at `l` splits off, or `n - 1` if it extends
/// to the end of the matrix.
#[inline]
fn deflation_point<E: RealField>(diag: &[E], offdiag: &[E], l: usize, tol: E) -> usize {
    let n = diag.len();
    let mut m = l;
    let mut g = diag[l].faer_abs();
    while m + 1 < n {
        let f = diag[m + 1].faer_abs();
        if offdiag[m].faer_abs() <= g.faer_add(f).faer_mul(tol) {
            break;
        }
        g = f;
        m += 1;
    }
    m
}

/// One shifted QL sweep over the block `l..=m`. Returns the number of rotations performed.
fn ql_sweep<E: RealField>(
    diag: &mut [E],
    offdiag: &mut [E],
    l: usize,
    m: usize,
    on_rotation: &mut impl FnMut(usize, JacobiRotation<E>),
) -> usize {
    let zero = E::faer_zero();
    let one = E::faer_one();
    let two = E::faer_from_f64(2.0);

    // wilkinson shift from the leading 2×2 block
    let dl = diag[l];
    let el = offdiag[l];
    let mut f = diag[l + 1].faer_sub(dl).faer_div(two.faer_mul(el));
    let mut g = f.faer_hypot(one);
    let g_signed = if f >= zero {
        g.faer_abs()
    } else {
        g.faer_abs().faer_neg()
    };
    let mut held = diag[m];
    let mut r = held
        .faer_sub(dl)
        .faer_add(el.faer_div(f.faer_add(g_signed)));

    let mut s = one;
    let mut c = one;
    let mut delta = zero;

    let mut rotation_count = 0;
    let mut commit = l;
    let mut i = m;
    while i > l {
        i -= 1;

        let ei = offdiag[i];
        f = s.faer_mul(ei);
        let b = c.faer_mul(ei);
        g = r;
        r = f.faer_hypot(r);
        if r == zero {
            commit = i + 1;
            break;
        }
        s = f.faer_div(r);
        c = g.faer_div(r);

        let x = held.faer_sub(delta);
        held = diag[i];
        let q = held
            .faer_sub(x)
            .faer_mul(s)
            .faer_add(two.faer_mul(c).faer_mul(b));
        let y = s.faer_mul_add(q, x);
        delta = y.faer_sub(x);

        offdiag[i + 1] = r;
        diag[i + 1] = y;
        r = c.faer_mul(q).faer_sub(b);

        on_rotation(i, JacobiRotation { c, s });
        rotation_count += 1;
    }

    diag[commit] = diag[commit].faer_sub(delta);
    offdiag[commit] = r;
    offdiag[m] = zero;

    rotation_count
}

/// Runs the QL iteration on `diag`/`offdiag`, calling `on_rotation(i, rot)` for every rotation
/// of the columns `i` and `i + 1` in the order they must be applied to the eigenvector matrix.
///
/// `offdiag[0]` is ignored on input and `offdiag[i]` couples `diag[i - 1]` and `diag[i]`. On
/// success `diag` holds the unsorted eigenvalues and `offdiag` is zero.
///
/// Each index gets at most `params.max_sweeps + 1` sweeps. Running out fails the whole call with
/// the index, leaving the remaining indices unprocessed.
pub(crate) fn ql_iterate<E: RealField>(
    diag: &mut [E],
    offdiag: &mut [E],
    params: &TridiagQlParams<E>,
    on_rotation: impl FnMut(usize, JacobiRotation<E>),
) -> Result<TridiagQlInfo, TridiagQlError> {
    let mut on_rotation = on_rotation;
    let n = diag.len();
    debug_assert!(offdiag.len() == n);

    let mut info = TridiagQlInfo::default();
    if n == 0 {
        return Ok(info);
    }

    // from here on, offdiag[i] couples diag[i] and diag[i + 1]
    offdiag.copy_within(1.., 0);
    offdiag[n - 1] = E::faer_zero();

    for l in 0..n {
        let mut sweep_count = 0;
        loop {
            if sweep_count > params.max_sweeps {
                return Err(TridiagQlError::NoConvergence { index: l });
            }

            let m = deflation_point(diag, offdiag, l, params.tolerance);
            if m == l {
                offdiag[l] = E::faer_zero();
                break;
            }

            info.rotation_count += ql_sweep(diag, offdiag, l, m, &mut on_rotation);
            info.sweep_count += 1;
            sweep_count += 1;
        }
    }

    Ok(info)
}

/// Seeds `u` to the identity and runs the QL iteration, accumulating the rotations into `u` on
/// every lane of the group.
pub(crate) fn ql_iterate_on_lanes<E: RealField>(
    diag: &mut [E],
    offdiag: &mut [E],
    u: MatMut<'_, E>,
    lanes: &mut LaneGroup,
    params: &TridiagQlParams<E>,
) -> Result<TridiagQlInfo, TridiagQlError> {
    let n = diag.len();
    debug_assert!(all(
        offdiag.len() == n,
        u.nrows() == n,
        u.ncols() == n,
    ));

    let col_stride = u.col_stride();
    let partition = params.partition;
    let u = Ptr(u.as_ptr_mut());
    let diag = Ptr(diag.as_mut_ptr());
    let offdiag = Ptr(offdiag.as_mut_ptr());

    let mut slots = [Step::<E>::Halt; 2];
    let slots = Ptr(slots.as_mut_ptr());

    let mut results = lanes.run(|lane| {
        // SAFETY: every lane only touches the rows it owns
        let mut u = unsafe { MatMut::from_raw_parts_mut(u.get(), n, n, col_stride) };
        let mut mailbox = Mailbox { slots, next: 0 };

        let zero = E::faer_zero();
        let one = E::faer_one();
        for k in lane.rows(n, partition) {
            for j in 0..n {
                u.write(k, j, if k == j { one } else { zero });
            }
        }
        lane.sync();

        if lane.is_leader() {
            // SAFETY: only the leader accesses diag and offdiag
            let (diag, offdiag) = unsafe {
                (
                    core::slice::from_raw_parts_mut(diag.get(), n),
                    core::slice::from_raw_parts_mut(offdiag.get(), n),
                )
            };

            let result = ql_iterate(diag, offdiag, params, |col, rot| {
                unsafe { mailbox.post(Step::Rotate { col, rot }) };
                lane.sync();
                rot.apply_on_the_right_in_place(u.rb_mut(), col, lane.rows(n, partition));
            });

            unsafe { mailbox.post(Step::Halt) };
            lane.sync();
            Some(result)
        } else {
            loop {
                lane.sync();
                match unsafe { mailbox.take() } {
                    Step::Rotate { col, rot } => {
                        rot.apply_on_the_right_in_place(u.rb_mut(), col, lane.rows(n, partition))
                    }
                    Step::Halt => break None,
                }
            }
        }
    });

    match results.swap_remove(0) {
        Some(result) => result,
        None => unreachable!(),
    }
}
