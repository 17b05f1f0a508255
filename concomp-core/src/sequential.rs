//! Single-threaded reference back-end.

use crate::{Result, engine::Executor, graph::Edge, phases};

pub(crate) struct Sequential {
    parent: Vec<usize>,
}

impl Sequential {
    pub(crate) fn new(vertex_count: usize) -> Self {
        Self {
            parent: (0..vertex_count).collect(),
        }
    }
}

impl Executor for Sequential {
    fn direct_connect(&mut self, edges: &[Edge]) -> Result<bool> {
        Ok(phases::direct_connect(&mut self.parent, edges))
    }

    fn shortcut(&mut self) -> Result<bool> {
        Ok(phases::shortcut(&mut self.parent))
    }

    fn alter(&mut self, edges: &[Edge]) -> Result<Vec<Edge>> {
        Ok(phases::alter(&self.parent, edges))
    }

    fn into_parents(self) -> Vec<usize> {
        self.parent
    }
}
