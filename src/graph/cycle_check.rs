use crate::dependency::Dependency;
use crate::error::{SchedulingError, SchedulingResult};
use crate::task::TaskId;
use std::collections::HashMap;

/// Incremental guard run before an edit commits one new dependency edge.
///
/// Works directly on the existing edge list; no task set, topological sort or
/// pass is involved. Each check is O(V + E) and uses an explicit stack.
#[derive(Debug, Clone, Copy)]
pub struct CycleChecker<'a> {
    dependencies: &'a [Dependency],
}

/// Task ids interned to dense indices with predecessor -> successor adjacency.
#[derive(Default)]
struct EdgeArena {
    index: HashMap<TaskId, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl EdgeArena {
    fn intern(&mut self, task_id: TaskId) -> usize {
        if let Some(&idx) = self.index.get(&task_id) {
            return idx;
        }
        let idx = self.adjacency.len();
        self.index.insert(task_id, idx);
        self.adjacency.push(Vec::new());
        idx
    }

    fn link(&mut self, dep: &Dependency) {
        let from = self.intern(dep.predecessor_id);
        let to = self.intern(dep.successor_id);
        self.adjacency[from].push(to);
    }
}

impl<'a> CycleChecker<'a> {
    pub fn new(dependencies: &'a [Dependency]) -> Self {
        Self { dependencies }
    }

    /// True when adding `proposed` would close a cycle.
    ///
    /// Searches depth-first from the proposed predecessor along existing
    /// edges plus the proposed one; reaching the predecessor again means the
    /// new edge would sit on a cycle.
    pub fn would_create_cycle(&self, proposed: &Dependency) -> bool {
        if proposed.successor_id == proposed.predecessor_id {
            return true;
        }

        let mut arena = EdgeArena::default();
        for dep in self.dependencies {
            arena.link(dep);
        }
        arena.link(proposed);

        let start = arena.intern(proposed.predecessor_id);
        let mut visited = vec![false; arena.adjacency.len()];
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(node) = stack.pop() {
            for &next in &arena.adjacency[node] {
                if next == start {
                    return true;
                }
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        false
    }

    pub fn check(&self, proposed: &Dependency) -> SchedulingResult<()> {
        if self.would_create_cycle(proposed) {
            return Err(SchedulingError::CycleWouldBeCreated {
                successor_id: proposed.successor_id,
                predecessor_id: proposed.predecessor_id,
            });
        }
        Ok(())
    }
}
