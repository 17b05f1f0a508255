//! Plain-text graph format.
//!
//! The input is a whitespace-separated stream of non-negative integers: the
//! vertex count `n`, the edge count `m`, then `m` endpoint pairs. Line breaks
//! carry no meaning. Edges are numbered from 1 in error messages.

use std::fmt;

use concomp_core::{Graph, GraphError};
use thiserror::Error;

/// Position in the input that a token was expected to fill.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    /// The leading vertex count.
    VertexCount,
    /// The edge count following the vertex count.
    EdgeCount,
    /// An endpoint of the 1-based `edge`.
    Endpoint {
        /// 1-based edge number.
        edge: usize,
    },
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VertexCount => f.write_str("vertex count"),
            Self::EdgeCount => f.write_str("edge count"),
            Self::Endpoint { edge } => write!(f, "endpoint of edge {edge}"),
        }
    }
}

/// Errors raised while parsing the graph format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The input ended before `slot` was read.
    #[error("input ended before the {slot}")]
    Truncated {
        /// Position that was still missing.
        slot: Slot,
    },
    /// A token was not a non-negative integer.
    #[error("expected a non-negative integer for the {slot}, found `{token}`")]
    InvalidNumber {
        /// Position the token was read for.
        slot: Slot,
        /// Offending token.
        token: String,
    },
    /// An edge was a self-loop or referenced a missing vertex.
    #[error("edge {edge} is invalid: {source}")]
    InvalidEdge {
        /// 1-based edge number.
        edge: usize,
        /// Validation failure reported by the graph model.
        #[source]
        source: GraphError,
    },
    /// Tokens remained after the declared number of edges.
    #[error("unexpected `{token}` after the {declared} declared edges")]
    TrailingInput {
        /// First surplus token.
        token: String,
        /// Edge count declared in the header.
        declared: usize,
    },
}

/// Parses `text` into a validated [`Graph`].
///
/// # Errors
/// Returns [`InputError`] when the text is truncated, contains a non-numeric
/// token, describes an invalid edge, or carries tokens past the last edge.
///
/// # Examples
/// ```
/// use concomp_cli::cli::parse_graph;
///
/// let graph = parse_graph("4 2\n0 1\n2 3\n")?;
/// assert_eq!(graph.vertex_count(), 4);
/// assert_eq!(graph.edge_count(), 2);
/// # Ok::<(), concomp_cli::cli::InputError>(())
/// ```
pub fn parse_graph(text: &str) -> Result<Graph, InputError> {
    let mut tokens = text.split_whitespace();
    let vertex_count = next_number(&mut tokens, Slot::VertexCount)?;
    let declared = next_number(&mut tokens, Slot::EdgeCount)?;

    let mut graph = Graph::new(vertex_count);
    for edge in 1..=declared {
        let slot = Slot::Endpoint { edge };
        let left = next_number(&mut tokens, slot)?;
        let right = next_number(&mut tokens, slot)?;
        graph
            .add_edge(left, right)
            .map_err(|source| InputError::InvalidEdge { edge, source })?;
    }

    match tokens.next() {
        Some(token) => Err(InputError::TrailingInput {
            token: token.to_owned(),
            declared,
        }),
        None => Ok(graph),
    }
}

fn next_number<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    slot: Slot,
) -> Result<usize, InputError> {
    let token = tokens.next().ok_or(InputError::Truncated { slot })?;
    token.parse().map_err(|_| InputError::InvalidNumber {
        slot,
        token: token.to_owned(),
    })
}
