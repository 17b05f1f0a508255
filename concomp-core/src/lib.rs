//! Connected components of undirected graphs by iterative edge contraction.
//!
//! Every vertex starts as its own representative. Each iteration runs three
//! phases over a vertex → representative array:
//!
//! - **Direct-Connect** pulls the smaller endpoint of every edge onto the
//!   larger one,
//! - **Shortcut** halves pointer chains by following two hops at once, and
//! - **Alter** rewrites each edge in terms of representatives and drops the
//!   edges that have collapsed into self-loops.
//!
//! The loop stops once an iteration changes nothing, at which point every
//! vertex points at the minimum vertex id of its component.
//!
//! The same driver runs on three back-ends selected by [`ExecutionMode`]:
//! a sequential reference, a shared-memory Rayon pool (feature
//! `shared-memory`), and a distributed back-end that synchronises otherwise
//! independent ranks purely through the collectives of [`Communicator`].
//!
//! # Examples
//! ```
//! use concomp_core::{ExecutionMode, Graph, run};
//!
//! let graph = Graph::try_from_edges(5, [(0, 1), (3, 4)])?;
//! let components = run(graph, ExecutionMode::Sequential, 1)?;
//! assert_eq!(components.parents(), &[0, 0, 2, 3, 3]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
pub mod distributed;
mod engine;
mod error;
mod graph;
mod partition;
pub mod phases;
mod result;
mod sequential;
#[cfg(feature = "shared-memory")]
mod shared;
#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    builder::{ComponentsBuilder, ConnectedComponents, ExecutionMode, run},
    distributed::{Communicator, GatherLayout, LocalCluster, LocalCommunicator, run_distributed_rank},
    error::{
        ComponentsError, ComponentsErrorCode, GraphError, GraphErrorCode, InvalidEdgeReason,
        Result, SyncFailure, SyncFailureCode,
    },
    graph::{Edge, Graph},
    partition::Partition,
    result::Components,
};
