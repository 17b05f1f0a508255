//! Iteration driver shared by every execution back-end.
//!
//! A back-end owns its parent array and decides how each phase executes;
//! the driver owns the edge list, the iteration count and the stopping rule.

use std::num::NonZeroUsize;

use tracing::{debug, info};

use crate::{
    Result,
    error::ComponentsError,
    graph::Edge,
    result::Components,
};

/// One way of executing the three phases over a parent array.
pub(crate) trait Executor {
    /// Runs before Direct-Connect on every iteration.
    fn begin_iteration(&mut self) -> Result<()> {
        Ok(())
    }

    /// Direct-Connect over `edges`; `true` when this executor lowered any
    /// entry.
    fn direct_connect(&mut self, edges: &[Edge]) -> Result<bool>;

    /// Shortcut over the whole parent array; `true` when any entry changed.
    fn shortcut(&mut self) -> Result<bool>;

    /// Alter: the next iteration's edge list.
    fn alter(&mut self, edges: &[Edge]) -> Result<Vec<Edge>>;

    /// Combines this executor's change flag with every other participant's.
    fn any_changed(&mut self, local: bool) -> Result<bool> {
        Ok(local)
    }

    /// Releases the parent array once the loop has stopped.
    fn into_parents(self) -> Vec<usize>;
}

/// Repeats Direct-Connect, Shortcut and Alter until an iteration changes
/// nothing.
pub(crate) fn drive<E: Executor>(
    mut executor: E,
    mut edges: Vec<Edge>,
    max_iterations: Option<NonZeroUsize>,
) -> Result<Components> {
    let mut iterations = 0usize;
    loop {
        if let Some(limit) = max_iterations.filter(|limit| iterations >= limit.get()) {
            return Err(ComponentsError::IterationLimit { limit });
        }
        iterations += 1;

        executor.begin_iteration()?;
        let connect_changed = executor.direct_connect(&edges)?;
        let shortcut_changed = executor.shortcut()?;
        edges = executor.alter(&edges)?;
        debug!(
            iteration = iterations,
            edges = edges.len(),
            connect_changed,
            shortcut_changed,
            "iteration completed"
        );

        if !executor.any_changed(connect_changed || shortcut_changed)? {
            break;
        }
    }

    let components = Components::new(executor.into_parents(), iterations);
    info!(
        iterations,
        components = components.component_count(),
        "converged"
    );
    Ok(components)
}
