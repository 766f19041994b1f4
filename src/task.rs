use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = i32;

/// A schedulable unit of work.
///
/// The caller owns the task; a scheduling run only overwrites the computed
/// fields below `duration_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    /// Duration in workdays. Zero marks a milestone.
    pub duration_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_finish: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_finish: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>, duration_days: i64) -> Self {
        Self {
            id,
            name: name.into(),
            code: String::new(),
            duration_days,
            earliest_start: None,
            earliest_finish: None,
            latest_start: None,
            latest_finish: None,
            float_days: None,
            is_critical: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Workdays between a task's start and finish dates; zero for milestones.
    pub(crate) fn span(&self) -> u32 {
        u32::try_from(self.duration_days.saturating_sub(1).max(0)).unwrap_or(u32::MAX)
    }
}
