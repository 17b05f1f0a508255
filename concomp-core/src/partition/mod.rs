//! Static contiguous partitioning of an index space.
//!
//! One [`Partition`] decides both who processes an index and whose result is
//! authoritative for it, so splitting work and reconciling results can never
//! disagree about a boundary. Ranges have `total / parts` elements each; the
//! last range absorbs the remainder.

use std::{num::NonZeroUsize, ops::Range};

/// Splits `[0, total)` into `parts` contiguous ranges.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use concomp_core::Partition;
///
/// let partition = Partition::new(10, NonZeroUsize::new(3).expect("non-zero"));
/// assert_eq!(partition.range(0), 0..3);
/// assert_eq!(partition.range(2), 6..10);
/// assert_eq!(partition.owner_of(9), 2);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Partition {
    total: usize,
    parts: NonZeroUsize,
}

impl Partition {
    /// Creates a partition of `total` indices into `parts` ranges.
    #[must_use]
    pub const fn new(total: usize, parts: NonZeroUsize) -> Self {
        Self { total, parts }
    }

    /// Returns the size of the partitioned index space.
    #[must_use]
    #[rustfmt::skip]
    pub const fn total(self) -> usize { self.total }

    /// Returns the number of ranges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn parts(self) -> NonZeroUsize { self.parts }

    const fn stride(self) -> usize {
        self.total / self.parts.get()
    }

    const fn last(self) -> usize {
        self.parts.get() - 1
    }

    /// Returns the index range owned by `part`.
    ///
    /// Parts beyond the last one own an empty range at the end of the space.
    #[must_use]
    pub const fn range(self, part: usize) -> Range<usize> {
        if part > self.last() {
            return self.total..self.total;
        }
        let start = part * self.stride();
        let end = if part == self.last() {
            self.total
        } else {
            start + self.stride()
        };
        start..end
    }

    /// Returns the part whose range contains `index`.
    ///
    /// Indices at or beyond `total` map to the last part, which is where an
    /// out-of-space index would land if the space grew.
    #[must_use]
    pub const fn owner_of(self, index: usize) -> usize {
        let stride = self.stride();
        if stride == 0 {
            return self.last();
        }
        let owner = index / stride;
        if owner > self.last() {
            self.last()
        } else {
            owner
        }
    }

    /// Iterates the ranges in part order.
    pub fn ranges(self) -> impl Iterator<Item = Range<usize>> {
        (0..self.parts.get()).map(move |part| self.range(part))
    }
}

#[cfg(test)]
mod tests;
