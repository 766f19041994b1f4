use super::DependencyGraph;
use crate::error::{SchedulingError, SchedulingResult};
use petgraph::graph::NodeIndex;
use std::collections::VecDeque;
use tracing::error;

/// Kahn's algorithm over the graph's in-degree map.
///
/// Ready tasks are served first-in first-out, seeded in input order, so the
/// result is deterministic. If any task is left unordered the graph has a
/// cycle and no ordering is returned.
pub fn topological_sort(graph: &DependencyGraph) -> SchedulingResult<Vec<NodeIndex>> {
    let mut in_degree = graph.in_degrees().to_vec();
    let mut queue: VecDeque<NodeIndex> = graph
        .nodes()
        .filter(|node| in_degree[node.index()] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for adj in graph.successors(node) {
            let remaining = &mut in_degree[adj.node.index()];
            *remaining -= 1;
            if *remaining == 0 {
                queue.push_back(adj.node);
            }
        }
    }

    if order.len() < graph.node_count() {
        let unresolved: Vec<_> = graph
            .nodes()
            .filter(|node| in_degree[node.index()] > 0)
            .map(|node| graph.task_id(node))
            .collect();
        error!(?unresolved, "circular dependency detected");
        return Err(SchedulingError::CircularDependency { unresolved });
    }

    Ok(order)
}
