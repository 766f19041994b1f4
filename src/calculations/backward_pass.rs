use crate::calendar::WorkdayCalendar;
use crate::graph::DependencyGraph;
use chrono::NaiveDate;
use petgraph::graph::NodeIndex;

/// Latest start / latest finish, one entry per graph node.
pub struct BackwardPass<'a, C: ?Sized> {
    graph: &'a DependencyGraph,
    spans: &'a [u32],
    calendar: &'a C,
}

impl<'a, C> BackwardPass<'a, C>
where
    C: WorkdayCalendar + ?Sized,
{
    pub fn new(graph: &'a DependencyGraph, spans: &'a [u32], calendar: &'a C) -> Self {
        Self {
            graph,
            spans,
            calendar,
        }
    }

    /// Walk `order` in reverse and return `(LS, LF)` indexed by
    /// `NodeIndex::index()`. Tasks without successors finish at `project_end`.
    pub fn execute(&self, order: &[NodeIndex], project_end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
        let mut late: Vec<Option<(NaiveDate, NaiveDate)>> = vec![None; self.graph.node_count()];

        for &node in order.iter().rev() {
            let span = self.spans[node.index()];

            // Determine allowed late finish from successors' late starts
            let late_finish = self
                .graph
                .successors(node)
                .iter()
                .filter_map(|adj| {
                    late[adj.node.index()].map(|(succ_start, _)| {
                        adj.link
                            .kind
                            .backward(self.calendar, succ_start, adj.link.lag_days, span)
                    })
                })
                .min()
                .unwrap_or(project_end);

            let late_start = self.calendar.sub_workdays(late_finish, span);
            late[node.index()] = Some((late_start, late_finish));
        }

        late.into_iter()
            .map(|dates| dates.unwrap_or((project_end, project_end)))
            .collect()
    }
}
