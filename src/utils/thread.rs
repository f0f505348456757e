//! Lockstep lane groups.
//!
//! A [`LaneGroup`] is a fixed-width team of lanes that all execute the same routine and advance
//! together through a collective barrier. Lane `0` is the leader. Each lane owns a disjoint
//! subset of matrix rows, described by a [`RowPartition`], so that lanes can update shared
//! column-major buffers without locking.

use crate::Parallelism;
use alloc::vec::Vec;
use std::sync::Barrier;

/// Unsafe [`Send`] and [`Sync`] pointer type.
pub struct Ptr<T>(pub *mut T);
unsafe impl<T> Send for Ptr<T> {}
unsafe impl<T> Sync for Ptr<T> {}
impl<T> Copy for Ptr<T> {}
impl<T> Clone for Ptr<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Ptr<T> {
    /// Returns the wrapped pointer.
    ///
    /// Closures must go through this method rather than the field, so that they capture the
    /// `Ptr` itself instead of the raw pointer.
    #[inline(always)]
    pub fn get(self) -> *mut T {
        self.0
    }
}

/// The amount of threads that should ideally execute an operation with the given parallelism.
#[inline]
pub fn parallelism_degree(parallelism: Parallelism) -> usize {
    match parallelism {
        Parallelism::None => 1,
        #[cfg(feature = "rayon")]
        Parallelism::Rayon(0) => rayon::current_num_threads(),
        #[cfg(feature = "rayon")]
        Parallelism::Rayon(n_threads) => n_threads,
    }
}

/// Returns the start and length of a subsegment of `0..n`, split between `chunk_count` consumers,
/// for the consumer at index `idx`.
///
/// For the same `n` and `chunk_count`, different values of `idx` between in `0..chunk_count` will
/// represent distinct subsegments.
#[inline]
pub fn par_split_indices(n: usize, idx: usize, chunk_count: usize) -> (usize, usize) {
    let chunk_size = n / chunk_count;
    let rem = n % chunk_count;

    let idx_to_col_start = move |idx| {
        if idx < rem {
            idx * (chunk_size + 1)
        } else {
            rem + idx * chunk_size
        }
    };

    let start = idx_to_col_start(idx);
    let end = idx_to_col_start(idx + 1);
    (start, end - start)
}

/// Assignment of matrix rows to the lanes of a group.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RowPartition {
    /// Lane `p` of a group of width `w` owns the rows `p, p + w, p + 2w, ...`.
    #[default]
    Strided,
    /// Lane `p` owns a single contiguous block of rows. Block sizes differ by at most one.
    Blocked,
}

/// Iterator over the rows owned by one lane.
#[derive(Clone, Debug)]
pub struct LaneRows {
    next: usize,
    end: usize,
    step: usize,
}

impl LaneRows {
    /// Exclusive upper bound of the rows yielded by the iterator.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }
}

impl Iterator for LaneRows {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.next < self.end {
            let row = self.next;
            self.next += self.step;
            Some(row)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = if self.next < self.end {
            (self.end - self.next + self.step - 1) / self.step
        } else {
            0
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for LaneRows {}

/// One member of a running [`LaneGroup`].
#[derive(Copy, Clone, Debug)]
pub struct Lane<'a> {
    id: usize,
    width: usize,
    barrier: &'a Barrier,
}

impl Lane<'_> {
    /// Position of the lane in its group, in `0..self.width()`.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of lanes in the group.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether this lane is the group leader (lane `0`).
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.id == 0
    }

    /// Blocks until every lane of the group has reached this point.
    ///
    /// All lanes must call `sync` the same number of times during a run.
    #[inline]
    pub fn sync(&self) {
        if self.width > 1 {
            self.barrier.wait();
        }
    }

    /// Returns the rows in `0..nrows` owned by this lane.
    #[inline]
    pub fn rows(&self, nrows: usize, partition: RowPartition) -> LaneRows {
        match partition {
            RowPartition::Strided => LaneRows {
                next: self.id,
                end: nrows,
                step: self.width,
            },
            RowPartition::Blocked => {
                let (start, len) = par_split_indices(nrows, self.id, self.width);
                LaneRows {
                    next: start,
                    end: start + len,
                    step: 1,
                }
            }
        }
    }
}

/// Errors that can occur when building a lane group.
#[derive(Debug)]
#[non_exhaustive]
pub enum LaneGroupError {
    /// A lane group needs at least one lane.
    ZeroWidth,
    /// A width above one was requested without the `rayon` feature.
    ParallelismUnavailable,
    /// The dedicated thread pool could not be created.
    #[cfg(feature = "rayon")]
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl core::fmt::Display for LaneGroupError {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for LaneGroupError {}

/// Fixed-width team of lanes executing in lockstep.
///
/// A group of width one runs on the calling thread. Wider groups own a dedicated rayon thread
/// pool with exactly one thread per lane, so that every lane of a run is live at the same time
/// and barriers cannot deadlock.
#[derive(Debug)]
pub struct LaneGroup {
    width: usize,
    #[cfg(feature = "rayon")]
    pool: Option<rayon::ThreadPool>,
}

impl LaneGroup {
    /// Returns a group with a single lane, running on the calling thread.
    #[inline]
    pub fn serial() -> Self {
        Self {
            width: 1,
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Returns a group whose width is the degree of the given parallelism.
    #[inline]
    pub fn new(parallelism: Parallelism) -> Result<Self, LaneGroupError> {
        Self::with_width(parallelism_degree(parallelism))
    }

    /// Returns a group with exactly `width` lanes.
    pub fn with_width(width: usize) -> Result<Self, LaneGroupError> {
        match width {
            0 => Err(LaneGroupError::ZeroWidth),
            1 => Ok(Self::serial()),
            #[cfg(feature = "rayon")]
            width => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(width)
                    .thread_name(|idx| alloc::format!("tridiag-ql-lane-{idx}"))
                    .build()
                    .map_err(LaneGroupError::ThreadPool)?;
                Ok(Self {
                    width,
                    pool: Some(pool),
                })
            }
            #[cfg(not(feature = "rayon"))]
            _ => Err(LaneGroupError::ParallelismUnavailable),
        }
    }

    /// Number of lanes in the group.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Runs `op` once on every lane and returns the results, indexed by lane id.
    ///
    /// Every lane gets a fresh barrier of the group's width. `op` must call [`Lane::sync`] the
    /// same number of times on every lane.
    pub fn run<R: Send>(&mut self, op: impl Sync + Fn(Lane<'_>) -> R) -> Vec<R> {
        let width = self.width;
        let barrier = Barrier::new(width);

        #[cfg(feature = "rayon")]
        if let Some(pool) = &self.pool {
            return pool.broadcast(|ctx| {
                op(Lane {
                    id: ctx.index(),
                    width,
                    barrier: &barrier,
                })
            });
        }

        alloc::vec![op(Lane {
            id: 0,
            width,
            barrier: &barrier,
        })]
    }
}
