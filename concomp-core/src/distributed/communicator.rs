//! Collective-communication seam between ranks.

use std::{num::NonZeroUsize, ops::Range};

use crate::error::SyncFailure;

/// Collective operations over a fixed group of ranks.
///
/// Every operation is a blocking barrier: all ranks must call the same
/// operations in the same order with compatible arguments, including ranks
/// whose local share of the work is empty. Skipping a call on one rank
/// deadlocks the others.
///
/// Payloads are vertex ids, so the element type is fixed to `usize`.
pub trait Communicator {
    /// Returns this rank's index in `0..size`.
    fn rank(&self) -> usize;

    /// Returns the number of participating ranks.
    fn size(&self) -> NonZeroUsize;

    /// Replaces `buffer` on every rank with the contents held by `root`.
    ///
    /// # Errors
    /// Returns [`SyncFailure`] when `root` is not a valid rank or the
    /// exchange fails.
    fn broadcast(&self, root: usize, buffer: &mut Vec<usize>) -> Result<(), SyncFailure>;

    /// Concatenates every rank's `local`, in rank order. All ranks must
    /// contribute the same length.
    ///
    /// # Errors
    /// Returns [`SyncFailure::LengthMismatch`] when a rank contributes a
    /// different length, or another [`SyncFailure`] if the exchange fails.
    fn all_gather(&self, local: &[usize]) -> Result<Vec<usize>, SyncFailure>;

    /// Concatenates variable-length contributions at the offsets described
    /// by `layout`, which every rank must have computed from the same counts.
    ///
    /// # Errors
    /// Returns [`SyncFailure::LayoutMismatch`] when `layout` does not cover
    /// every rank, [`SyncFailure::LengthMismatch`] when a contribution
    /// disagrees with its count, or another [`SyncFailure`] if the exchange
    /// fails.
    fn all_gather_varcount(
        &self,
        local: &[usize],
        layout: &GatherLayout,
    ) -> Result<Vec<usize>, SyncFailure>;

    /// Logical OR of `local` across all ranks.
    ///
    /// # Errors
    /// Returns [`SyncFailure`] if the exchange fails.
    fn all_reduce_or(&self, local: bool) -> Result<bool, SyncFailure>;
}

/// Per-rank counts and displacements of a variable-length gather.
///
/// Built on every rank from the same counts (themselves obtained with a
/// fixed-size [`Communicator::all_gather`]), so every rank agrees on where
/// each contribution lands in the receive buffer.
///
/// # Examples
/// ```
/// use concomp_core::GatherLayout;
///
/// let layout = GatherLayout::from_counts(vec![2, 0, 3]);
/// assert_eq!(layout.displacements(), &[0, 2, 2]);
/// assert_eq!(layout.total(), 5);
/// assert_eq!(layout.range(2), 2..5);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GatherLayout {
    counts: Vec<usize>,
    displacements: Vec<usize>,
    total: usize,
}

impl GatherLayout {
    /// Computes displacements as the exclusive prefix sum of `counts`.
    #[must_use]
    pub fn from_counts(counts: Vec<usize>) -> Self {
        let mut total = 0usize;
        let displacements = counts
            .iter()
            .map(|count| {
                let offset = total;
                total += count;
                offset
            })
            .collect();
        Self {
            counts,
            displacements,
            total,
        }
    }

    /// Returns the contribution length of each rank.
    #[must_use]
    #[rustfmt::skip]
    pub fn counts(&self) -> &[usize] { &self.counts }

    /// Returns the receive-buffer offset of each rank's contribution.
    #[must_use]
    #[rustfmt::skip]
    pub fn displacements(&self) -> &[usize] { &self.displacements }

    /// Returns the receive-buffer length.
    #[must_use]
    #[rustfmt::skip]
    pub const fn total(&self) -> usize { self.total }

    /// Returns the receive-buffer range filled by `rank`, empty for unknown
    /// ranks.
    #[must_use]
    pub fn range(&self, rank: usize) -> Range<usize> {
        match (self.displacements.get(rank), self.counts.get(rank)) {
            (Some(&start), Some(&count)) => start..start + count,
            _ => self.total..self.total,
        }
    }
}
