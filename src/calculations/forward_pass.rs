use crate::calendar::WorkdayCalendar;
use crate::graph::DependencyGraph;
use chrono::NaiveDate;
use petgraph::graph::NodeIndex;

/// Earliest start / earliest finish, one entry per graph node.
pub struct ForwardPass<'a, C: ?Sized> {
    graph: &'a DependencyGraph,
    spans: &'a [u32],
    calendar: &'a C,
}

impl<'a, C> ForwardPass<'a, C>
where
    C: WorkdayCalendar + ?Sized,
{
    /// `spans[i]` is node `i`'s duration minus one workday (zero for milestones).
    pub fn new(graph: &'a DependencyGraph, spans: &'a [u32], calendar: &'a C) -> Self {
        Self {
            graph,
            spans,
            calendar,
        }
    }

    /// Walk `order` (a topological order of the graph) and return `(ES, EF)`
    /// indexed by `NodeIndex::index()`.
    pub fn execute(&self, order: &[NodeIndex], project_start: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
        let mut early: Vec<Option<(NaiveDate, NaiveDate)>> = vec![None; self.graph.node_count()];

        for &node in order {
            // Every predecessor must be satisfied, and nothing starts before the project.
            let early_start = self
                .graph
                .predecessors(node)
                .iter()
                .filter_map(|adj| {
                    early[adj.node.index()].map(|(pred_start, pred_finish)| {
                        adj.link
                            .kind
                            .forward(self.calendar, pred_start, pred_finish, adj.link.lag_days)
                    })
                })
                .fold(project_start, std::cmp::max);

            let early_finish = self
                .calendar
                .add_workdays(early_start, self.spans[node.index()]);
            early[node.index()] = Some((early_start, early_finish));
        }

        early
            .into_iter()
            .map(|dates| dates.unwrap_or((project_start, project_start)))
            .collect()
    }
}
