//! Distributed back-end: ranks that share no memory and synchronise only
//! through the collectives of a [`Communicator`].
//!
//! Rank [`ROOT`] supplies the input graph. It broadcasts a header of
//! `[present, vertex_count, edge_count]` followed by the flattened edge
//! list, after which every rank holds the same state and runs the same
//! lock-step loop (see [`run_distributed_rank`]). Ranks with no owned edges
//! or vertices still take part in every collective.
//!
//! [`LocalCluster`] provides an in-process substrate where each rank runs on
//! its own thread; a message-passing runtime can be plugged in by
//! implementing [`Communicator`].

mod communicator;
mod executor;
mod local;

use std::num::NonZeroUsize;

use tracing::{instrument, warn};

pub use self::{
    communicator::{Communicator, GatherLayout},
    local::{LocalCluster, LocalCommunicator},
};
pub use crate::error::SyncFailure;
use self::executor::Distributed;
use crate::{
    Result,
    engine::drive,
    error::ComponentsError,
    graph::{Edge, Graph},
    result::Components,
};

/// Rank that owns the input graph and whose parent array is authoritative
/// at the start of every iteration.
pub const ROOT: usize = 0;

/// Runs this rank's share of the computation to convergence.
///
/// Every rank of the communicator must call this concurrently. Only the
/// [`ROOT`] rank's `graph` is used; other ranks should pass `None` and
/// receive the graph by broadcast. On success every rank returns the same
/// [`Components`].
///
/// # Errors
/// Returns [`ComponentsError::DistributedSynchronizationFailure`] when a
/// collective fails or the root supplied no graph, and
/// [`ComponentsError::InvalidGraph`] when the edge list received by a
/// non-root rank does not describe a valid graph. Collective failures
/// surface on every rank at the same call.
///
/// # Examples
/// ```
/// use std::{num::NonZeroUsize, thread};
/// use concomp_core::{Graph, LocalCluster, run_distributed_rank};
///
/// let graph = Graph::try_from_edges(4, [(2, 3), (0, 2)])?;
/// let cluster = LocalCluster::new(NonZeroUsize::new(2).expect("non-zero"));
/// let mut communicators = cluster.into_communicators().into_iter();
/// let root = communicators.next().expect("rank 0");
/// let peer = communicators.next().expect("rank 1");
///
/// let (left, right) = thread::scope(|scope| {
///     let handle = scope.spawn(move || run_distributed_rank(&peer, None));
///     let left = run_distributed_rank(&root, Some(graph));
///     (left, handle.join().expect("rank 1 finished"))
/// });
/// assert_eq!(left?.parents(), &[0, 1, 0, 0]);
/// assert_eq!(right?.parents(), &[0, 1, 0, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_distributed_rank<C>(communicator: &C, graph: Option<Graph>) -> Result<Components>
where
    C: Communicator + ?Sized,
{
    execute_rank(communicator, graph, None)
}

#[instrument(
    name = "core.distributed_rank",
    err,
    skip(communicator, graph, max_iterations),
    fields(rank = communicator.rank(), size = communicator.size().get()),
)]
pub(crate) fn execute_rank<C>(
    communicator: &C,
    graph: Option<Graph>,
    max_iterations: Option<NonZeroUsize>,
) -> Result<Components>
where
    C: Communicator + ?Sized,
{
    let graph = if communicator.rank() == ROOT {
        graph
    } else {
        if graph.is_some() {
            warn!(
                rank = communicator.rank(),
                "ignoring graph supplied to a non-root rank"
            );
        }
        None
    };
    let (vertex_count, edges) = receive_graph(communicator, graph)?;
    drive(
        Distributed::new(communicator, vertex_count),
        edges,
        max_iterations,
    )
}

/// Broadcasts the root's graph so every rank holds the same vertex count and
/// edge list.
fn receive_graph<C>(communicator: &C, graph: Option<Graph>) -> Result<(usize, Vec<Edge>)>
where
    C: Communicator + ?Sized,
{
    let rank = communicator.rank();
    let mut header = graph.as_ref().map_or_else(
        || vec![0, 0, 0],
        |graph| vec![1, graph.vertex_count(), graph.edge_count()],
    );
    communicator
        .broadcast(ROOT, &mut header)
        .map_err(|reason| ComponentsError::sync("broadcast_header", rank, reason))?;
    let [present, vertex_count, edge_count] = header[..] else {
        return Err(ComponentsError::sync(
            "broadcast_header",
            rank,
            SyncFailure::LengthMismatch {
                peer: ROOT,
                expected: 3,
                actual: header.len(),
            },
        ));
    };
    if present == 0 {
        return Err(ComponentsError::sync(
            "broadcast_header",
            rank,
            SyncFailure::MissingRootGraph,
        ));
    }

    let mut payload = graph
        .as_ref()
        .map(|graph| encode_edges(graph.edges()))
        .unwrap_or_default();
    communicator
        .broadcast(ROOT, &mut payload)
        .map_err(|reason| ComponentsError::sync("broadcast_edges", rank, reason))?;
    if payload.len() != edge_count * 2 {
        return Err(ComponentsError::sync(
            "broadcast_edges",
            rank,
            SyncFailure::LengthMismatch {
                peer: ROOT,
                expected: edge_count * 2,
                actual: payload.len(),
            },
        ));
    }

    match graph {
        Some(graph) => Ok(graph.into_parts()),
        None => {
            let pairs = payload.chunks_exact(2).map(|pair| (pair[0], pair[1]));
            Ok(Graph::try_from_edges(vertex_count, pairs)?.into_parts())
        }
    }
}

/// Flattens edges into `[source, target, source, target, ..]`.
fn encode_edges(edges: &[Edge]) -> Vec<usize> {
    edges
        .iter()
        .flat_map(|edge| [edge.source(), edge.target()])
        .collect()
}

/// Inverse of [`encode_edges`] for payloads produced by Alter, whose edges
/// are already valid.
fn decode_edges(payload: &[usize]) -> core::result::Result<Vec<Edge>, SyncFailure> {
    if payload.len() % 2 != 0 {
        return Err(SyncFailure::MalformedPayload {
            len: payload.len(),
        });
    }
    Ok(payload
        .chunks_exact(2)
        .map(|pair| Edge::new_unchecked(pair[0], pair[1]))
        .collect())
}
