use crate::dependency::Dependency;
use crate::task::{Task, TaskId};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    #[error("task {task_id} has negative duration {duration_days}")]
    NegativeDuration { task_id: TaskId, duration_days: i64 },
    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),
    #[error("unknown dependency type '{0}' (expected FS, SS, FF or SF)")]
    UnknownDependencyType(String),
    #[error("malformed predecessor '{0}'")]
    MalformedPredecessor(String),
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.duration_days < 0 {
        return Err(TaskValidationError::NegativeDuration {
            task_id: task.id,
            duration_days: task.duration_days,
        });
    }
    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id) {
            return Err(TaskValidationError::DuplicateTaskId(task.id));
        }
        validate_task(task)?;
    }
    Ok(())
}

/// Edges whose endpoints are not both in `tasks`, in input order.
pub fn dangling_dependencies<'a>(
    tasks: &[Task],
    dependencies: &'a [Dependency],
) -> Vec<&'a Dependency> {
    let known: HashSet<TaskId> = tasks.iter().map(|task| task.id).collect();
    dependencies
        .iter()
        .filter(|dep| !known.contains(&dep.successor_id) || !known.contains(&dep.predecessor_id))
        .collect()
}
