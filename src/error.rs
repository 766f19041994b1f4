use crate::persistence::PersistenceError;
use crate::task::TaskId;
use crate::validation::TaskValidationError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    /// The dependency graph contains a cycle. `unresolved` lists the tasks the
    /// topological sort could not order, in input order.
    #[error("circular dependency detected among tasks {unresolved:?}")]
    CircularDependency { unresolved: Vec<TaskId> },
    #[error(
        "making task {successor_id} depend on task {predecessor_id} would create a circular dependency"
    )]
    CycleWouldBeCreated {
        successor_id: TaskId,
        predecessor_id: TaskId,
    },
    #[error(
        "dependency {successor_id} <- {predecessor_id} references task {missing_id}, which is not in the project"
    )]
    InvalidTaskReference {
        successor_id: TaskId,
        predecessor_id: TaskId,
        missing_id: TaskId,
    },
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Failures at the load/compute/persist boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
