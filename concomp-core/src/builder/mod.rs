//! Configuration surface and the run entry points.
//!
//! [`ComponentsBuilder`] validates settings into an immutable
//! [`ConnectedComponents`] runner which dispatches to the back-end selected
//! by [`ExecutionMode`].

use std::{fmt, num::NonZeroUsize, thread};

use tracing::{Span, instrument};

#[cfg(feature = "shared-memory")]
use crate::shared::SharedMemory;
use crate::{
    Result,
    distributed::{Communicator, LocalCluster, execute_rank},
    engine::drive,
    error::{ComponentsError, SyncFailure},
    graph::Graph,
    result::Components,
    sequential::Sequential,
};

/// Selects the back-end that executes the phases.
///
/// # Examples
/// ```
/// use concomp_core::ExecutionMode;
///
/// assert_eq!(ExecutionMode::SharedMemory.to_string(), "shared-memory");
/// assert_eq!(ExecutionMode::default(), ExecutionMode::Sequential);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ExecutionMode {
    /// Single-threaded reference execution.
    #[default]
    Sequential,
    /// A fixed-size worker pool over one shared parent array.
    SharedMemory,
    /// Independent ranks synchronised through collectives, hosted in-process
    /// by a [`LocalCluster`].
    Distributed,
}

impl ExecutionMode {
    /// Returns the kebab-case name used in logs and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::SharedMemory => "shared-memory",
            Self::Distributed => "distributed",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configures and constructs [`ConnectedComponents`] runners.
///
/// # Examples
/// ```
/// use concomp_core::{ComponentsBuilder, ExecutionMode};
///
/// let runner = ComponentsBuilder::new()
///     .with_execution_mode(ExecutionMode::Distributed)
///     .with_parallelism(4)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(runner.execution_mode(), ExecutionMode::Distributed);
/// assert_eq!(runner.parallelism().get(), 4);
/// assert!(runner.max_iterations().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ComponentsBuilder {
    execution_mode: ExecutionMode,
    parallelism: usize,
    max_iterations: Option<NonZeroUsize>,
}

impl Default for ComponentsBuilder {
    fn default() -> Self {
        Self {
            execution_mode: ExecutionMode::Sequential,
            parallelism: 1,
            max_iterations: None,
        }
    }
}

impl ComponentsBuilder {
    /// Creates a builder for a sequential run with no iteration cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the back-end.
    #[must_use]
    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// Returns the configured back-end.
    #[must_use]
    #[rustfmt::skip]
    pub fn execution_mode(&self) -> ExecutionMode { self.execution_mode }

    /// Sets the worker-thread count (shared memory) or rank count
    /// (distributed). Ignored by the sequential back-end.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Returns the configured parallelism degree.
    #[must_use]
    #[rustfmt::skip]
    pub fn parallelism(&self) -> usize { self.parallelism }

    /// Caps the number of iterations; a run that has not converged by then
    /// fails with [`ComponentsError::IterationLimit`].
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroUsize;
    /// use concomp_core::{ComponentsBuilder, ComponentsError, Graph};
    ///
    /// let graph = Graph::try_from_edges(4, [(0, 1), (1, 2), (2, 3)])?;
    /// let runner = ComponentsBuilder::new()
    ///     .with_max_iterations(NonZeroUsize::new(1).expect("non-zero"))
    ///     .build()?;
    /// let err = runner.run(graph).expect_err("a path needs more than one iteration");
    /// assert!(matches!(err, ComponentsError::IterationLimit { .. }));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn with_max_iterations(mut self, limit: NonZeroUsize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    /// Returns the iteration cap, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_iterations(&self) -> Option<NonZeroUsize> { self.max_iterations }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`ComponentsError::InvalidConfiguration`] when the parallelism
    /// degree is zero.
    pub fn build(self) -> Result<ConnectedComponents> {
        let parallelism = NonZeroUsize::new(self.parallelism).ok_or(
            ComponentsError::InvalidConfiguration {
                parallelism: self.parallelism,
            },
        )?;
        Ok(ConnectedComponents {
            execution_mode: self.execution_mode,
            parallelism,
            max_iterations: self.max_iterations,
        })
    }
}

/// A validated runner; reusable across graphs.
#[derive(Clone, Debug)]
pub struct ConnectedComponents {
    execution_mode: ExecutionMode,
    parallelism: NonZeroUsize,
    max_iterations: Option<NonZeroUsize>,
}

impl ConnectedComponents {
    /// Returns the back-end this runner dispatches to.
    #[must_use]
    #[rustfmt::skip]
    pub fn execution_mode(&self) -> ExecutionMode { self.execution_mode }

    /// Returns the validated parallelism degree.
    #[must_use]
    #[rustfmt::skip]
    pub fn parallelism(&self) -> NonZeroUsize { self.parallelism }

    /// Returns the iteration cap, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_iterations(&self) -> Option<NonZeroUsize> { self.max_iterations }

    /// Computes the connected components of `graph`.
    ///
    /// In [`ExecutionMode::Distributed`] the ranks are threads of this process
    /// connected by a [`LocalCluster`]; rank 0 runs on the calling thread.
    ///
    /// # Errors
    /// Returns [`ComponentsError::BackendUnavailable`] when the shared-memory
    /// back-end is compiled out, [`ComponentsError::ThreadPool`] when its
    /// pool cannot be built, [`ComponentsError::IterationLimit`] when the cap
    /// is reached, and
    /// [`ComponentsError::DistributedSynchronizationFailure`] when a
    /// distributed rank fails.
    #[instrument(
        name = "core.run",
        err,
        skip(self, graph),
        fields(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            mode = %self.execution_mode,
            parallelism = self.parallelism.get(),
        ),
    )]
    pub fn run(&self, graph: Graph) -> Result<Components> {
        match self.execution_mode {
            ExecutionMode::Sequential => self.run_sequential(graph),
            #[cfg(feature = "shared-memory")]
            ExecutionMode::SharedMemory => self.run_shared_memory(graph),
            #[cfg(not(feature = "shared-memory"))]
            ExecutionMode::SharedMemory => Err(ComponentsError::BackendUnavailable {
                requested: ExecutionMode::SharedMemory,
            }),
            ExecutionMode::Distributed => self.run_distributed(graph),
        }
    }

    /// Runs one rank of a distributed computation over an external
    /// [`Communicator`], honouring this runner's iteration cap.
    ///
    /// See [`crate::run_distributed_rank`] for the calling contract.
    ///
    /// # Errors
    /// Returns the same errors as [`crate::run_distributed_rank`], plus
    /// [`ComponentsError::IterationLimit`] when the cap is reached.
    pub fn run_rank<C>(&self, communicator: &C, graph: Option<Graph>) -> Result<Components>
    where
        C: Communicator + ?Sized,
    {
        execute_rank(communicator, graph, self.max_iterations)
    }

    #[instrument(name = "core.run_sequential", err, skip(self, graph))]
    fn run_sequential(&self, graph: Graph) -> Result<Components> {
        let (vertex_count, edges) = graph.into_parts();
        drive(Sequential::new(vertex_count), edges, self.max_iterations)
    }

    #[cfg(feature = "shared-memory")]
    #[instrument(
        name = "core.run_shared_memory",
        err,
        skip(self, graph),
        fields(threads = self.parallelism.get()),
    )]
    fn run_shared_memory(&self, graph: Graph) -> Result<Components> {
        let (vertex_count, edges) = graph.into_parts();
        let executor = SharedMemory::new(vertex_count, self.parallelism)?;
        drive(executor, edges, self.max_iterations)
    }

    #[instrument(
        name = "core.run_distributed",
        err,
        skip(self, graph),
        fields(ranks = self.parallelism.get()),
    )]
    fn run_distributed(&self, graph: Graph) -> Result<Components> {
        let mut communicators = LocalCluster::new(self.parallelism)
            .into_communicators()
            .into_iter();
        let root = communicators.next().ok_or_else(|| {
            ComponentsError::sync(
                "spawn_ranks",
                0,
                SyncFailure::InvalidRoot {
                    root: 0,
                    size: 0,
                },
            )
        })?;
        let max_iterations = self.max_iterations;
        let parent = Span::current();

        thread::scope(|scope| {
            let handles: Vec<_> = communicators
                .map(|communicator| {
                    let span = parent.clone();
                    scope.spawn(move || {
                        span.in_scope(|| execute_rank(&communicator, None, max_iterations))
                    })
                })
                .collect();
            let root_result = execute_rank(&root, Some(graph), max_iterations);
            let peer_results: Vec<_> = handles
                .into_iter()
                .enumerate()
                .map(|(index, handle)| (index + 1, handle.join()))
                .collect();
            reconcile(root_result, peer_results)
        })
    }
}

/// Checks that every rank finished with the root's parent array.
fn reconcile(
    root: Result<Components>,
    peers: Vec<(usize, thread::Result<Result<Components>>)>,
) -> Result<Components> {
    let root = root?;
    for (rank, joined) in peers {
        let outcome = joined.map_err(|_| {
            ComponentsError::sync("join_rank", rank, SyncFailure::WorkerPanicked { rank })
        })?;
        let components = outcome?;
        if components.parents() != root.parents() {
            return Err(ComponentsError::sync(
                "reconcile",
                rank,
                SyncFailure::Diverged { rank },
            ));
        }
    }
    Ok(root)
}

/// Computes connected components with a one-off runner.
///
/// # Errors
/// Returns [`ComponentsError::InvalidConfiguration`] when `parallelism` is
/// zero, otherwise the errors of [`ConnectedComponents::run`].
///
/// # Examples
/// ```
/// use concomp_core::{ExecutionMode, Graph, run};
///
/// let graph = Graph::try_from_edges(6, (1..6).map(|leaf| (0, leaf)))?;
/// let components = run(graph, ExecutionMode::SharedMemory, 3)?;
/// assert_eq!(components.parents(), &[0; 6]);
/// assert!(components.iterations() <= 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run(graph: Graph, mode: ExecutionMode, parallelism: usize) -> Result<Components> {
    ComponentsBuilder::new()
        .with_execution_mode(mode)
        .with_parallelism(parallelism)
        .build()?
        .run(graph)
}
