use crate::calculations::{BackwardPass, CriticalPathExtractor, ForwardPass};
use crate::calendar::{WorkCalendar, WorkdayCalendar};
use crate::config::{ReferencePolicy, SchedulerConfig};
use crate::dependency::Dependency;
use crate::error::{Error, SchedulingError, SchedulingResult};
use crate::graph::{CycleChecker, DependencyGraph, topological_sort};
use crate::persistence::{PersistenceError, ProjectStore};
use crate::project::Project;
use crate::report::{ScheduleReport, TaskSchedule};
use crate::task::TaskId;
use crate::validation;
use rayon::prelude::*;
use tracing::{debug, info};

/// Runs the full critical-path pipeline for a project.
///
/// The scheduler holds no per-project state: the calendar and reference
/// policy are fixed at construction and every call works on its own
/// snapshot, so one instance can serve many projects concurrently.
#[derive(Debug, Clone)]
pub struct AutoScheduler<C = WorkCalendar> {
    calendar: C,
    reference_policy: ReferencePolicy,
}

impl Default for AutoScheduler<WorkCalendar> {
    fn default() -> Self {
        Self::new(WorkCalendar::new())
    }
}

impl AutoScheduler<WorkCalendar> {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.calendar()).with_reference_policy(config.reference_policy)
    }
}

impl<C: WorkdayCalendar> AutoScheduler<C> {
    pub fn new(calendar: C) -> Self {
        Self {
            calendar,
            reference_policy: ReferencePolicy::default(),
        }
    }

    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.reference_policy = policy;
        self
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn reference_policy(&self) -> ReferencePolicy {
        self.reference_policy
    }

    /// Compute the schedule without touching `project`.
    pub fn compute(&self, project: &Project) -> SchedulingResult<ScheduleReport> {
        let project_start = project.start_date();
        info!(
            project = %project.metadata.project_name,
            tasks = project.tasks.len(),
            dependencies = project.dependencies.len(),
            %project_start,
            "computing schedule"
        );

        validation::validate_task_collection(&project.tasks)?;

        let task_ids: Vec<TaskId> = project.tasks.iter().map(|task| task.id).collect();
        let graph =
            DependencyGraph::build(&task_ids, &project.dependencies, self.reference_policy)?;
        let order = topological_sort(&graph)?;

        let mut spans = vec![0u32; graph.node_count()];
        for task in &project.tasks {
            if let Some(node) = graph.index_of(task.id) {
                spans[node.index()] = task.span();
            }
        }

        let early = ForwardPass::new(&graph, &spans, &self.calendar).execute(&order, project_start);
        let project_end = early
            .iter()
            .map(|&(_, early_finish)| early_finish)
            .max()
            .unwrap_or(project_start);
        debug!(%project_end, "forward pass complete");

        let late = BackwardPass::new(&graph, &spans, &self.calendar).execute(&order, project_end);
        let analysis = CriticalPathExtractor::new(&graph, &self.calendar).execute(
            &order,
            &early,
            &late,
            project_start,
            project_end,
        );

        let tasks = project
            .tasks
            .iter()
            .filter_map(|task| {
                let idx = graph.index_of(task.id)?.index();
                Some(TaskSchedule {
                    task_id: task.id,
                    name: task.name.clone(),
                    code: task.code.clone(),
                    duration_days: task.duration_days,
                    earliest_start: early[idx].0,
                    earliest_finish: early[idx].1,
                    latest_start: late[idx].0,
                    latest_finish: late[idx].1,
                    float_days: analysis.float_days[idx],
                    is_critical: analysis.is_critical[idx],
                })
            })
            .collect();

        let report = ScheduleReport {
            critical_path: analysis
                .critical_path
                .iter()
                .map(|&node| graph.task_id(node))
                .collect(),
            project_duration: analysis.project_duration,
            project_start,
            project_end,
            tasks,
        };
        info!(summary = %report.to_cli_summary(), "schedule computed");
        Ok(report)
    }

    /// Compute the schedule and write the computed fields onto every task.
    ///
    /// On error no task is modified.
    pub fn run(&self, project: &mut Project) -> SchedulingResult<ScheduleReport> {
        let report = self.compute(project)?;
        for (task, detail) in project.tasks.iter_mut().zip(&report.tasks) {
            detail.apply_to(task);
        }
        Ok(report)
    }

    /// Add `dependency` to the project unless it would create a cycle.
    pub fn try_add_dependency(
        &self,
        project: &mut Project,
        dependency: Dependency,
    ) -> SchedulingResult<()> {
        if self.reference_policy == ReferencePolicy::Reject {
            for task_id in [dependency.predecessor_id, dependency.successor_id] {
                if project.task(task_id).is_none() {
                    return Err(SchedulingError::InvalidTaskReference {
                        successor_id: dependency.successor_id,
                        predecessor_id: dependency.predecessor_id,
                        missing_id: task_id,
                    });
                }
            }
        }
        CycleChecker::new(&project.dependencies).check(&dependency)?;
        project.push_dependency(dependency);
        Ok(())
    }

    /// Load a project from `store`, schedule it and persist the annotated tasks.
    pub fn run_with_store<S>(&self, store: &S) -> Result<ScheduleReport, Error>
    where
        S: ProjectStore + ?Sized,
    {
        let mut project = store.load_project()?.ok_or(PersistenceError::NotFound)?;
        let report = self.run(&mut project)?;
        store.save_project(&project)?;
        Ok(report)
    }
}

impl<C: WorkdayCalendar + Sync> AutoScheduler<C> {
    /// Schedule independent projects in parallel. Results are in input order.
    pub fn run_many(&self, projects: &mut [Project]) -> Vec<SchedulingResult<ScheduleReport>> {
        projects
            .par_iter_mut()
            .map(|project| self.run(project))
            .collect()
    }
}

