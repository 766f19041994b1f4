use crate::calendar::{WorkCalendar, WorkCalendarConfig};
use crate::persistence::PersistenceResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// What to do with a dependency edge whose endpoint is not in the task set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Skip the edge and log a warning. Tolerates partial or filtered views.
    #[default]
    Drop,
    /// Fail the run with `SchedulingError::InvalidTaskReference`.
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub reference_policy: ReferencePolicy,
    #[serde(default)]
    pub calendar: WorkCalendarConfig,
}

impl SchedulerConfig {
    pub fn from_json_str(json: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn calendar(&self) -> WorkCalendar {
        WorkCalendar::from_config(&self.calendar)
    }
}
