//! Shared-memory back-end: each phase runs on a fixed-size Rayon pool.
//!
//! Work is split into one contiguous range per worker by [`Partition`].
//! The parent array is a slice of atomics so that concurrent Direct-Connect
//! updates to the same vertex never tear.
//!
//! Direct-Connect combines racing updates with `fetch_min`. The result is
//! the minimum of every value offered, independent of interleaving, which is
//! the same value the sequential phase produces. Relaxed ordering suffices:
//! the phases never read a value written in the same phase, and the pool's
//! join at the end of each phase orders all writes before the next phase.
//!
//! Shortcut copies the array into a second buffer and only starts writing
//! once the copy has finished, so every worker reads the same pre-phase
//! snapshot.

use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

use crate::{
    Result, engine::Executor, error::ComponentsError, graph::Edge, partition::Partition, phases,
};

pub(crate) struct SharedMemory {
    pool: ThreadPool,
    threads: NonZeroUsize,
    parent: Vec<AtomicUsize>,
    snapshot: Vec<usize>,
}

impl SharedMemory {
    pub(crate) fn new(vertex_count: usize, threads: NonZeroUsize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.get())
            .thread_name(|index| format!("concomp-worker-{index}"))
            .build()
            .map_err(|error| ComponentsError::ThreadPool {
                message: Arc::from(error.to_string()),
            })?;

        Ok(Self {
            pool,
            threads,
            parent: (0..vertex_count).map(AtomicUsize::new).collect(),
            snapshot: vec![0; vertex_count],
        })
    }
}

impl Executor for SharedMemory {
    fn direct_connect(&mut self, edges: &[Edge]) -> Result<bool> {
        let partition = Partition::new(edges.len(), self.threads);
        let parent = &self.parent;
        let changed = self.pool.install(|| {
            (0..partition.parts().get())
                .into_par_iter()
                .map(|worker| {
                    let mut changed = false;
                    for edge in &edges[partition.range(worker)] {
                        let (hi, lo) = edge.ordered();
                        if parent[hi].fetch_min(lo, Ordering::Relaxed) > lo {
                            changed = true;
                        }
                    }
                    changed
                })
                .reduce(|| false, |left, right| left || right)
        });
        Ok(changed)
    }

    fn shortcut(&mut self) -> Result<bool> {
        let Self {
            pool,
            threads,
            parent,
            snapshot,
        } = self;
        let partition = Partition::new(parent.len(), *threads);
        let changed = pool.install(|| {
            snapshot
                .par_iter_mut()
                .zip(parent.par_iter())
                .for_each(|(copy, cell)| *copy = cell.load(Ordering::Relaxed));

            let snapshot = &*snapshot;
            (0..partition.parts().get())
                .into_par_iter()
                .map(|worker| {
                    let range = partition.range(worker);
                    let mut changed = false;
                    for (cell, &current) in parent[range.clone()].iter().zip(&snapshot[range]) {
                        let grandparent = snapshot[current];
                        if grandparent != current {
                            cell.store(grandparent, Ordering::Relaxed);
                            changed = true;
                        }
                    }
                    changed
                })
                .reduce(|| false, |left, right| left || right)
        });
        Ok(changed)
    }

    fn alter(&mut self, edges: &[Edge]) -> Result<Vec<Edge>> {
        let partition = Partition::new(edges.len(), self.threads);
        let parent: &[AtomicUsize] = &self.parent;
        let altered = self.pool.install(|| {
            (0..partition.parts().get())
                .into_par_iter()
                .flat_map_iter(move |worker| {
                    edges[partition.range(worker)].iter().filter_map(move |edge| {
                        phases::relabel(*edge, |vertex| parent[vertex].load(Ordering::Relaxed))
                    })
                })
                .collect()
        });
        Ok(altered)
    }

    fn into_parents(self) -> Vec<usize> {
        self.parent
            .into_iter()
            .map(AtomicUsize::into_inner)
            .collect()
    }
}

#[cfg(test)]
mod tests;
