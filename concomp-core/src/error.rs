//! Error types for the connected-components engine.
//!
//! Every public error enum carries a companion code enum with a stable,
//! machine-readable string so logging surfaces can key on it.

use std::{fmt, num::NonZeroUsize, sync::Arc};

use thiserror::Error;

use crate::builder::ExecutionMode;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Why an edge was refused by [`crate::Graph`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InvalidEdgeReason {
    /// Both endpoints name the same vertex.
    SelfLoop,
    /// At least one endpoint is not below the vertex count.
    OutOfRange,
}

impl fmt::Display for InvalidEdgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelfLoop => "self-loop",
            Self::OutOfRange => "endpoint out of range",
        })
    }
}

/// An error produced while constructing a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The edge is a self-loop or references a vertex outside `[0, n)`.
    #[error("invalid edge ({left}, {right}) for {vertex_count} vertices: {reason}")]
    InvalidEdge {
        /// First endpoint as supplied by the caller.
        left: usize,
        /// Second endpoint as supplied by the caller.
        right: usize,
        /// Vertex count of the graph being built.
        vertex_count: usize,
        /// Which rule the edge broke.
        reason: InvalidEdgeReason,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The edge is a self-loop or references a vertex outside `[0, n)`.
        InvalidEdge => InvalidEdge { .. } => "GRAPH_INVALID_EDGE",
    }
}

/// Failure raised by a collective operation of a [`crate::Communicator`].
///
/// Every variant is fatal for the whole computation; no rank continues after
/// observing one.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SyncFailure {
    /// The requested root rank does not exist.
    #[error("root rank {root} is outside a communicator of size {size}")]
    InvalidRoot {
        /// Requested root rank.
        root: usize,
        /// Number of participating ranks.
        size: usize,
    },
    /// A rank contributed a payload whose length disagrees with the layout.
    #[error("rank {peer} contributed {actual} values but {expected} were expected")]
    LengthMismatch {
        /// Rank whose contribution was malformed.
        peer: usize,
        /// Length every rank agreed on.
        expected: usize,
        /// Length actually contributed.
        actual: usize,
    },
    /// A variable-length layout did not describe every rank exactly once.
    #[error("gather layout lists {actual} ranks but the communicator has {expected}")]
    LayoutMismatch {
        /// Number of ranks in the communicator.
        expected: usize,
        /// Number of counts in the layout.
        actual: usize,
    },
    /// The exchange area became poisoned after a participant panicked.
    #[error("collective exchange is poisoned")]
    Poisoned,
    /// An edge payload could not be decoded into endpoint pairs.
    #[error("edge payload of {len} values is not a whole number of edges")]
    MalformedPayload {
        /// Length of the received payload.
        len: usize,
    },
    /// The root rank did not supply an input graph.
    #[error("root rank did not supply a graph")]
    MissingRootGraph,
    /// A rank thread panicked before finishing the protocol.
    #[error("rank {rank} panicked")]
    WorkerPanicked {
        /// Rank whose worker panicked.
        rank: usize,
    },
    /// Two ranks finished with different parent arrays.
    #[error("rank {rank} converged to a different parent array than the root")]
    Diverged {
        /// Rank whose result disagreed with the root.
        rank: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SyncFailure`] variants.
    enum SyncFailureCode for SyncFailure {
        /// The requested root rank does not exist.
        InvalidRoot => InvalidRoot { .. } => "SYNC_INVALID_ROOT",
        /// A rank contributed a payload whose length disagrees with the layout.
        LengthMismatch => LengthMismatch { .. } => "SYNC_LENGTH_MISMATCH",
        /// A variable-length layout did not describe every rank exactly once.
        LayoutMismatch => LayoutMismatch { .. } => "SYNC_LAYOUT_MISMATCH",
        /// The exchange area became poisoned.
        Poisoned => Poisoned => "SYNC_POISONED",
        /// An edge payload could not be decoded.
        MalformedPayload => MalformedPayload { .. } => "SYNC_MALFORMED_PAYLOAD",
        /// The root rank did not supply an input graph.
        MissingRootGraph => MissingRootGraph => "SYNC_MISSING_ROOT_GRAPH",
        /// A rank thread panicked.
        WorkerPanicked => WorkerPanicked { .. } => "SYNC_WORKER_PANICKED",
        /// Two ranks finished with different parent arrays.
        Diverged => Diverged { .. } => "SYNC_DIVERGED",
    }
}

/// Error type produced when configuring or running the engine.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ComponentsError {
    /// Parallelism degree must be at least one.
    #[error("parallelism must be at least 1 (got {parallelism})")]
    InvalidConfiguration {
        /// The rejected parallelism degree.
        parallelism: usize,
    },
    /// A graph received by a rank failed validation.
    #[error(transparent)]
    InvalidGraph(#[from] GraphError),
    /// The requested execution mode is not compiled into this build.
    #[error("execution mode `{requested}` is not available in this build")]
    BackendUnavailable {
        /// Mode that could not be satisfied.
        requested: ExecutionMode,
    },
    /// The shared-memory worker pool could not be created.
    #[error("failed to build worker pool: {message}")]
    ThreadPool {
        /// Message reported by the pool builder.
        message: Arc<str>,
    },
    /// The run hit the configured iteration cap before converging.
    #[error("no convergence within {limit} iterations")]
    IterationLimit {
        /// The configured cap.
        limit: NonZeroUsize,
    },
    /// A collective operation failed; every rank aborts.
    #[error("rank {rank} failed during `{operation}`: {reason}")]
    DistributedSynchronizationFailure {
        /// Collective operation that failed.
        operation: &'static str,
        /// Rank that observed the failure.
        rank: usize,
        #[source]
        /// Underlying collective failure.
        reason: SyncFailure,
    },
}

define_error_codes! {
    /// Stable codes describing [`ComponentsError`] variants.
    enum ComponentsErrorCode for ComponentsError {
        /// Parallelism degree must be at least one.
        InvalidConfiguration => InvalidConfiguration { .. } => "COMPONENTS_INVALID_CONFIGURATION",
        /// A graph received by a rank failed validation.
        InvalidGraph => InvalidGraph(..) => "COMPONENTS_INVALID_GRAPH",
        /// The requested execution mode is not compiled into this build.
        BackendUnavailable => BackendUnavailable { .. } => "COMPONENTS_BACKEND_UNAVAILABLE",
        /// The shared-memory worker pool could not be created.
        ThreadPool => ThreadPool { .. } => "COMPONENTS_THREAD_POOL",
        /// The run hit the configured iteration cap.
        IterationLimit => IterationLimit { .. } => "COMPONENTS_ITERATION_LIMIT",
        /// A collective operation failed.
        DistributedSynchronizationFailure => DistributedSynchronizationFailure { .. } => "COMPONENTS_DISTRIBUTED_SYNC_FAILURE",
    }
}

impl ComponentsError {
    /// Retrieve the inner [`SyncFailureCode`] when a collective failed.
    #[must_use]
    pub const fn sync_failure_code(&self) -> Option<SyncFailureCode> {
        match self {
            Self::DistributedSynchronizationFailure { reason, .. } => Some(reason.code()),
            _ => None,
        }
    }

    pub(crate) const fn sync(operation: &'static str, rank: usize, reason: SyncFailure) -> Self {
        Self::DistributedSynchronizationFailure {
            operation,
            rank,
            reason,
        }
    }
}

/// Convenient alias for results returned by the engine.
pub type Result<T> = core::result::Result<T, ComponentsError>;
