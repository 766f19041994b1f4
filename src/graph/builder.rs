use crate::config::ReferencePolicy;
use crate::dependency::{Dependency, DependencyType};
use crate::error::{SchedulingError, SchedulingResult};
use crate::task::TaskId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::warn;

/// Edge weight: how the successor is tied to the predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub kind: DependencyType,
    pub lag_days: i64,
}

/// One entry of an adjacency list: the node on the other end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    pub node: NodeIndex,
    pub link: Link,
}

/// Arena-indexed dependency graph.
///
/// Tasks become dense `NodeIndex` values in input order; edges run
/// predecessor -> successor. Adjacency lists and in-degrees are indexed by
/// `NodeIndex::index()` and keep edge insertion order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    pub graph: DiGraph<TaskId, Link>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
    predecessors: Vec<Vec<Adjacent>>,
    successors: Vec<Vec<Adjacent>>,
    in_degree: Vec<usize>,
    dropped: Vec<Dependency>,
}

impl DependencyGraph {
    pub fn build(
        task_ids: &[TaskId],
        dependencies: &[Dependency],
        policy: ReferencePolicy,
    ) -> SchedulingResult<Self> {
        let mut graph: DiGraph<TaskId, Link> =
            DiGraph::with_capacity(task_ids.len(), dependencies.len());
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::with_capacity(task_ids.len());

        // Add nodes first
        for &task_id in task_ids {
            id_to_index
                .entry(task_id)
                .or_insert_with(|| graph.add_node(task_id));
        }

        // Add edges: pred -> successor
        let mut dropped = Vec::new();
        for dep in dependencies {
            let endpoints = (
                id_to_index.get(&dep.predecessor_id),
                id_to_index.get(&dep.successor_id),
            );
            match endpoints {
                (Some(&u), Some(&v)) => {
                    graph.add_edge(
                        u,
                        v,
                        Link {
                            kind: dep.kind,
                            lag_days: dep.lag_days,
                        },
                    );
                }
                (pred, _) => {
                    if policy == ReferencePolicy::Reject {
                        let missing_id = if pred.is_none() {
                            dep.predecessor_id
                        } else {
                            dep.successor_id
                        };
                        return Err(SchedulingError::InvalidTaskReference {
                            successor_id: dep.successor_id,
                            predecessor_id: dep.predecessor_id,
                            missing_id,
                        });
                    }
                    dropped.push(*dep);
                }
            }
        }

        if !dropped.is_empty() {
            warn!(
                count = dropped.len(),
                edges = ?dropped
                    .iter()
                    .map(|dep| (dep.successor_id, dep.predecessor_id))
                    .collect::<Vec<_>>(),
                "dropping dependencies that reference unknown tasks"
            );
        }

        let node_count = graph.node_count();
        let mut predecessors = vec![Vec::new(); node_count];
        let mut successors = vec![Vec::new(); node_count];
        let mut in_degree = vec![0usize; node_count];
        for edge in graph.edge_references() {
            let (pred, succ, link) = (edge.source(), edge.target(), *edge.weight());
            successors[pred.index()].push(Adjacent { node: succ, link });
            predecessors[succ.index()].push(Adjacent { node: pred, link });
            in_degree[succ.index()] += 1;
        }

        Ok(Self {
            graph,
            id_to_index,
            predecessors,
            successors,
            in_degree,
            dropped,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn task_id(&self, node: NodeIndex) -> TaskId {
        self.graph[node]
    }

    pub fn index_of(&self, task_id: TaskId) -> Option<NodeIndex> {
        self.id_to_index.get(&task_id).copied()
    }

    pub fn predecessors(&self, node: NodeIndex) -> &[Adjacent] {
        &self.predecessors[node.index()]
    }

    pub fn successors(&self, node: NodeIndex) -> &[Adjacent] {
        &self.successors[node.index()]
    }

    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.in_degree[node.index()]
    }

    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    /// Edges skipped under [`ReferencePolicy::Drop`].
    pub fn dropped(&self) -> &[Dependency] {
        &self.dropped
    }

    /// successor id -> `(predecessor id, lag, type)` for every kept edge.
    pub fn predecessor_map(&self) -> HashMap<TaskId, Vec<(TaskId, i64, DependencyType)>> {
        self.keyed_map(&self.predecessors)
    }

    /// predecessor id -> `(successor id, lag, type)` for every kept edge.
    pub fn successor_map(&self) -> HashMap<TaskId, Vec<(TaskId, i64, DependencyType)>> {
        self.keyed_map(&self.successors)
    }

    /// task id -> number of incoming edges, duplicates included.
    pub fn in_degree_map(&self) -> HashMap<TaskId, usize> {
        self.nodes()
            .map(|node| (self.task_id(node), self.in_degree(node)))
            .collect()
    }

    fn keyed_map(
        &self,
        lists: &[Vec<Adjacent>],
    ) -> HashMap<TaskId, Vec<(TaskId, i64, DependencyType)>> {
        self.nodes()
            .filter(|node| !lists[node.index()].is_empty())
            .map(|node| {
                let entries = lists[node.index()]
                    .iter()
                    .map(|adj| (self.task_id(adj.node), adj.link.lag_days, adj.link.kind))
                    .collect();
                (self.task_id(node), entries)
            })
            .collect()
    }
}
