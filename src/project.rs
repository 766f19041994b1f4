use crate::dependency::Dependency;
use crate::metadata::ProjectMetadata;
use crate::task::{Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot of one project's inputs: metadata, tasks and dependency edges.
///
/// A scheduling run reads the snapshot and writes computed dates back onto
/// `tasks`; nothing else is mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub metadata: ProjectMetadata,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Project {
    pub fn new(metadata: ProjectMetadata) -> Self {
        Self {
            metadata,
            tasks: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn starting(project_start_date: NaiveDate) -> Self {
        let metadata = ProjectMetadata {
            project_start_date,
            ..ProjectMetadata::default()
        };
        Self::new(metadata)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.metadata.project_start_date
    }

    /// Insert a task, or replace the inputs (name, code, duration) of an existing one.
    pub fn upsert_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                existing.name = task.name;
                existing.code = task.code;
                existing.duration_days = task.duration_days;
            }
            None => self.tasks.push(task),
        }
    }

    /// Remove a task and every edge touching it.
    pub fn remove_task(&mut self, task_id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        if self.tasks.len() == before {
            return false;
        }
        self.dependencies
            .retain(|dep| dep.successor_id != task_id && dep.predecessor_id != task_id);
        true
    }

    /// Append an edge without any cycle check. See
    /// [`crate::AutoScheduler::try_add_dependency`] for the guarded variant.
    pub fn push_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn next_task_id(&self) -> TaskId {
        self.tasks
            .iter()
            .map(|task| task.id)
            .max()
            .map(|max| max + 1)
            .unwrap_or(1)
    }
}
