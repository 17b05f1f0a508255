//! Per-rank executor implementing the lock-step iteration protocol.
//!
//! Every rank holds a full parent array and the full edge list but only
//! computes over the ranges it owns. After each phase the ranks exchange
//! results so that all of them enter the next phase with identical state:
//!
//! 1. broadcast the root's parent array,
//! 2. Direct-Connect over the owned edge range, then all-gather and keep the
//!    per-vertex minimum across ranks,
//! 3. Shortcut over the owned vertex range, then all-gather and take each
//!    vertex from the rank that owns it,
//! 4. Alter over the owned edge range, then exchange edge counts and the
//!    variable-length edge payloads,
//! 5. OR-reduce the change flags so every rank stops on the same iteration.

use tracing::trace;

use super::{
    ROOT, SyncFailure,
    communicator::{Communicator, GatherLayout},
    decode_edges, encode_edges,
};
use crate::{
    Result, engine::Executor, error::ComponentsError, graph::Edge, partition::Partition, phases,
};

pub(super) struct Distributed<'c, C: Communicator + ?Sized> {
    communicator: &'c C,
    rank: usize,
    vertices: Partition,
    parent: Vec<usize>,
}

impl<'c, C: Communicator + ?Sized> Distributed<'c, C> {
    pub(super) fn new(communicator: &'c C, vertex_count: usize) -> Self {
        Self {
            communicator,
            rank: communicator.rank(),
            vertices: Partition::new(vertex_count, communicator.size()),
            parent: (0..vertex_count).collect(),
        }
    }

    /// Edge range owned by this rank for the current edge list.
    fn owned_edges<'e>(&self, edges: &'e [Edge]) -> &'e [Edge] {
        &edges[Partition::new(edges.len(), self.communicator.size()).range(self.rank)]
    }

    fn fail(&self, operation: &'static str, reason: SyncFailure) -> ComponentsError {
        ComponentsError::sync(operation, self.rank, reason)
    }

    fn gather_parents(&self, operation: &'static str) -> Result<Vec<usize>> {
        self.communicator
            .all_gather(&self.parent)
            .map_err(|reason| self.fail(operation, reason))
    }
}

impl<C: Communicator + ?Sized> Executor for Distributed<'_, C> {
    fn begin_iteration(&mut self) -> Result<()> {
        let expected = self.parent.len();
        self.communicator
            .broadcast(ROOT, &mut self.parent)
            .map_err(|reason| ComponentsError::sync("broadcast_parents", self.rank, reason))?;
        if self.parent.len() != expected {
            return Err(self.fail(
                "broadcast_parents",
                SyncFailure::LengthMismatch {
                    peer: ROOT,
                    expected,
                    actual: self.parent.len(),
                },
            ));
        }
        Ok(())
    }

    fn direct_connect(&mut self, edges: &[Edge]) -> Result<bool> {
        let owned = self.owned_edges(edges);
        let changed = phases::direct_connect(&mut self.parent, owned);
        trace!(rank = self.rank, edges = owned.len(), changed, "local direct-connect");

        let gathered = self.gather_parents("all_gather_connect")?;
        merge_minimum(&mut self.parent, &gathered);
        Ok(changed)
    }

    fn shortcut(&mut self) -> Result<bool> {
        let snapshot = self.parent.clone();
        let changed =
            phases::shortcut_range(&mut self.parent, &snapshot, self.vertices.range(self.rank));
        trace!(rank = self.rank, changed, "local shortcut");

        let gathered = self.gather_parents("all_gather_shortcut")?;
        merge_by_owner(&mut self.parent, &gathered, self.vertices);
        Ok(changed)
    }

    fn alter(&mut self, edges: &[Edge]) -> Result<Vec<Edge>> {
        let local = phases::alter(&self.parent, self.owned_edges(edges));
        let counts = self
            .communicator
            .all_gather(&[local.len()])
            .map_err(|reason| self.fail("all_gather_edge_counts", reason))?;
        let layout = GatherLayout::from_counts(counts.iter().map(|count| count * 2).collect());
        trace!(
            rank = self.rank,
            local = local.len(),
            total = layout.total() / 2,
            "exchanging altered edges"
        );

        let payload = self
            .communicator
            .all_gather_varcount(&encode_edges(&local), &layout)
            .map_err(|reason| self.fail("all_gather_edges", reason))?;
        decode_edges(&payload).map_err(|reason| self.fail("all_gather_edges", reason))
    }

    fn any_changed(&mut self, local: bool) -> Result<bool> {
        self.communicator
            .all_reduce_or(local)
            .map_err(|reason| self.fail("all_reduce_changed", reason))
    }

    fn into_parents(self) -> Vec<usize> {
        self.parent
    }
}

/// Keeps, per vertex, the smallest value held by any rank.
fn merge_minimum(parent: &mut [usize], gathered: &[usize]) {
    if parent.is_empty() {
        return;
    }
    for copy in gathered.chunks_exact(parent.len()) {
        for (mine, &theirs) in parent.iter_mut().zip(copy) {
            if theirs < *mine {
                *mine = theirs;
            }
        }
    }
}

/// Takes each vertex from the copy of the rank that owns it.
fn merge_by_owner(parent: &mut [usize], gathered: &[usize], vertices: Partition) {
    let vertex_count = parent.len();
    for (vertex, slot) in parent.iter_mut().enumerate() {
        *slot = gathered[vertices.owner_of(vertex) * vertex_count + vertex];
    }
}
