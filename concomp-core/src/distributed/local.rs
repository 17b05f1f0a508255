//! In-process collective substrate.
//!
//! Each [`LocalCommunicator`] is meant to be driven by its own thread and
//! stands in for a separate process: ranks share nothing but the exchange
//! area used to implement the collectives. Every collective deposits this
//! rank's contribution, waits for all ranks, reads what it needs, and waits
//! again before the area can be reused. Validation happens while reading,
//! on data every rank sees identically, so a malformed exchange fails on all
//! ranks at the same call.

use std::{
    num::NonZeroUsize,
    sync::{Arc, Barrier, Mutex},
};

use tracing::trace;

use super::communicator::{Communicator, GatherLayout};
use crate::error::SyncFailure;

struct Exchange {
    barrier: Barrier,
    slots: Mutex<Vec<Vec<usize>>>,
}

/// Factory for a group of connected [`LocalCommunicator`] endpoints.
///
/// # Examples
/// ```
/// use std::{num::NonZeroUsize, thread};
/// use concomp_core::{Communicator, LocalCluster};
///
/// let cluster = LocalCluster::new(NonZeroUsize::new(3).expect("non-zero"));
/// let sums: Vec<usize> = thread::scope(|scope| {
///     let handles: Vec<_> = cluster
///         .into_communicators()
///         .into_iter()
///         .map(|comm| {
///             scope.spawn(move || {
///                 let gathered = comm.all_gather(&[comm.rank()]).expect("gather succeeds");
///                 gathered.iter().sum()
///             })
///         })
///         .collect();
///     handles.into_iter().map(|handle| handle.join().expect("rank finished")).collect()
/// });
/// assert_eq!(sums, vec![3, 3, 3]);
/// ```
pub struct LocalCluster {
    communicators: Vec<LocalCommunicator>,
}

impl LocalCluster {
    /// Connects `size` endpoints with ranks `0..size`.
    #[must_use]
    pub fn new(size: NonZeroUsize) -> Self {
        let exchange = Arc::new(Exchange {
            barrier: Barrier::new(size.get()),
            slots: Mutex::new(vec![Vec::new(); size.get()]),
        });
        let communicators = (0..size.get())
            .map(|rank| LocalCommunicator {
                rank,
                size,
                exchange: Arc::clone(&exchange),
            })
            .collect();
        Self { communicators }
    }

    /// Returns the number of endpoints.
    #[must_use]
    pub fn size(&self) -> usize {
        self.communicators.len()
    }

    /// Releases the endpoints in rank order.
    #[must_use]
    pub fn into_communicators(self) -> Vec<LocalCommunicator> {
        self.communicators
    }
}

/// One rank of a [`LocalCluster`].
pub struct LocalCommunicator {
    rank: usize,
    size: NonZeroUsize,
    exchange: Arc<Exchange>,
}

impl LocalCommunicator {
    /// Deposits `contribution`, then evaluates `read` over every rank's
    /// contribution once all ranks have deposited.
    fn exchange<T>(
        &self,
        contribution: Vec<usize>,
        read: impl FnOnce(&[Vec<usize>]) -> Result<T, SyncFailure>,
    ) -> Result<T, SyncFailure> {
        let deposited = self
            .exchange
            .slots
            .lock()
            .map(|mut slots| slots[self.rank] = contribution)
            .map_err(|_| SyncFailure::Poisoned);
        self.exchange.barrier.wait();

        let outcome = self
            .exchange
            .slots
            .lock()
            .map_err(|_| SyncFailure::Poisoned)
            .and_then(|slots| read(slots.as_slice()));
        self.exchange.barrier.wait();

        deposited.and(outcome)
    }
}

fn concat_checked(
    slots: &[Vec<usize>],
    expected_len: impl Fn(usize) -> usize,
) -> Result<Vec<usize>, SyncFailure> {
    let mut gathered = Vec::with_capacity(slots.iter().map(Vec::len).sum());
    for (peer, slot) in slots.iter().enumerate() {
        let expected = expected_len(peer);
        if slot.len() != expected {
            return Err(SyncFailure::LengthMismatch {
                peer,
                expected,
                actual: slot.len(),
            });
        }
        gathered.extend_from_slice(slot);
    }
    Ok(gathered)
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> NonZeroUsize {
        self.size
    }

    fn broadcast(&self, root: usize, buffer: &mut Vec<usize>) -> Result<(), SyncFailure> {
        if root >= self.size.get() {
            return Err(SyncFailure::InvalidRoot {
                root,
                size: self.size.get(),
            });
        }
        trace!(rank = self.rank, root, operation = "broadcast", "collective");
        let contribution = if self.rank == root {
            buffer.clone()
        } else {
            Vec::new()
        };
        let received = self.exchange(contribution, |slots| Ok(slots[root].clone()))?;
        *buffer = received;
        Ok(())
    }

    fn all_gather(&self, local: &[usize]) -> Result<Vec<usize>, SyncFailure> {
        trace!(
            rank = self.rank,
            len = local.len(),
            operation = "all_gather",
            "collective"
        );
        let len = local.len();
        self.exchange(local.to_vec(), |slots| concat_checked(slots, |_| len))
    }

    fn all_gather_varcount(
        &self,
        local: &[usize],
        layout: &GatherLayout,
    ) -> Result<Vec<usize>, SyncFailure> {
        if layout.counts().len() != self.size.get() {
            return Err(SyncFailure::LayoutMismatch {
                expected: self.size.get(),
                actual: layout.counts().len(),
            });
        }
        trace!(
            rank = self.rank,
            len = local.len(),
            total = layout.total(),
            operation = "all_gather_varcount",
            "collective"
        );
        self.exchange(local.to_vec(), |slots| {
            let mut gathered = vec![0; layout.total()];
            for (peer, slot) in slots.iter().enumerate() {
                let range = layout.range(peer);
                if slot.len() != range.len() {
                    return Err(SyncFailure::LengthMismatch {
                        peer,
                        expected: range.len(),
                        actual: slot.len(),
                    });
                }
                gathered[range].copy_from_slice(slot);
            }
            Ok(gathered)
        })
    }

    fn all_reduce_or(&self, local: bool) -> Result<bool, SyncFailure> {
        trace!(
            rank = self.rank,
            local,
            operation = "all_reduce_or",
            "collective"
        );
        self.exchange(vec![usize::from(local)], |slots| {
            let flags = concat_checked(slots, |_| 1)?;
            Ok(flags.iter().any(|&flag| flag != 0))
        })
    }
}
