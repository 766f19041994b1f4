use crate::calendar::WorkdayCalendar;
use crate::graph::DependencyGraph;
use chrono::NaiveDate;
use petgraph::graph::NodeIndex;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPathAnalysis {
    /// Float in workdays, indexed by `NodeIndex::index()`.
    pub float_days: Vec<i64>,
    pub is_critical: Vec<bool>,
    /// Zero-float nodes ordered by earliest start, ties in topological order.
    pub critical_path: Vec<NodeIndex>,
    pub project_duration: i64,
}

pub struct CriticalPathExtractor<'a, C: ?Sized> {
    graph: &'a DependencyGraph,
    calendar: &'a C,
}

impl<'a, C> CriticalPathExtractor<'a, C>
where
    C: WorkdayCalendar + ?Sized,
{
    pub fn new(graph: &'a DependencyGraph, calendar: &'a C) -> Self {
        Self { graph, calendar }
    }

    pub fn execute(
        &self,
        order: &[NodeIndex],
        early: &[(NaiveDate, NaiveDate)],
        late: &[(NaiveDate, NaiveDate)],
        project_start: NaiveDate,
        project_end: NaiveDate,
    ) -> CriticalPathAnalysis {
        let node_count = self.graph.node_count();
        let mut float_days = vec![0i64; node_count];
        let mut is_critical = vec![false; node_count];

        for node in self.graph.nodes() {
            let (early_start, _) = early[node.index()];
            let (late_start, _) = late[node.index()];
            if late_start < early_start {
                warn!(
                    task_id = self.graph.task_id(node),
                    %early_start,
                    %late_start,
                    "late start precedes early start; float clamped to zero"
                );
            }
            let float = self.calendar.workdays_between(early_start, late_start);
            float_days[node.index()] = float;
            is_critical[node.index()] = float == 0;
        }

        let mut critical_path: Vec<NodeIndex> = order
            .iter()
            .copied()
            .filter(|node| is_critical[node.index()])
            .collect();
        critical_path.sort_by_key(|node| early[node.index()].0);

        CriticalPathAnalysis {
            float_days,
            is_critical,
            critical_path,
            project_duration: self.calendar.workdays_between(project_start, project_end),
        }
    }
}
