pub mod calculations;
pub mod calendar;
pub mod config;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod persistence;
pub mod project;
pub mod report;
pub mod scheduler;
pub mod task;
pub mod validation;

pub use calendar::{IndexedCalendar, WorkCalendar, WorkCalendarConfig, WorkdayCalendar};
pub use config::{ReferencePolicy, SchedulerConfig};
pub use dependency::{Dependency, DependencyType};
pub use error::{Error, SchedulingError, SchedulingResult};
pub use metadata::ProjectMetadata;
pub use persistence::{PersistenceError, PersistenceResult, ProjectStore};
pub use project::Project;
pub use report::{ScheduleReport, TaskSchedule};
pub use scheduler::AutoScheduler;
pub use task::{Task, TaskId};
pub use validation::TaskValidationError;

#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteProjectStore;
