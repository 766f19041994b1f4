use crate::task::{Task, TaskId};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Computed dates for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSchedule {
    pub task_id: TaskId,
    pub name: String,
    pub code: String,
    pub duration_days: i64,
    pub earliest_start: NaiveDate,
    pub earliest_finish: NaiveDate,
    pub latest_start: NaiveDate,
    pub latest_finish: NaiveDate,
    pub float_days: i64,
    pub is_critical: bool,
}

impl TaskSchedule {
    /// Overwrite every computed field of `task`.
    pub fn apply_to(&self, task: &mut Task) {
        task.earliest_start = Some(self.earliest_start);
        task.earliest_finish = Some(self.earliest_finish);
        task.latest_start = Some(self.latest_start);
        task.latest_finish = Some(self.latest_finish);
        task.float_days = Some(self.float_days);
        task.is_critical = Some(self.is_critical);
    }
}

/// Result of one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub critical_path: Vec<TaskId>,
    pub project_duration: i64,
    pub project_start: NaiveDate,
    pub project_end: NaiveDate,
    /// Per-task detail in input order.
    pub tasks: Vec<TaskSchedule>,
}

impl ScheduleReport {
    pub fn task(&self, task_id: TaskId) -> Option<&TaskSchedule> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn critical_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_critical).count()
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.tasks.len()));
        parts.push(format!("critical={}", self.critical_count()));
        parts.push(format!("start={}", self.project_start));
        parts.push(format!("finish={}", self.project_end));
        parts.push(format!("duration={}", self.project_duration));
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("path={chain}"));
        }
        parts.join(", ")
    }

    /// Per-task detail as a polars table, one row per task in input order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let ids: Vec<i32> = self.tasks.iter().map(|t| t.task_id).collect();
        let names: Vec<&str> = self.tasks.iter().map(|t| t.name.as_str()).collect();
        let codes: Vec<&str> = self.tasks.iter().map(|t| t.code.as_str()).collect();
        let durations: Vec<i64> = self.tasks.iter().map(|t| t.duration_days).collect();
        let floats: Vec<i64> = self.tasks.iter().map(|t| t.float_days).collect();
        let critical: Vec<bool> = self.tasks.iter().map(|t| t.is_critical).collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static("id"), ids).into_column(),
            Series::new(PlSmallStr::from_static("name"), names).into_column(),
            Series::new(PlSmallStr::from_static("code"), codes).into_column(),
            Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
            self.date_series("earliest_start", |t| t.earliest_start)?
                .into_column(),
            self.date_series("earliest_finish", |t| t.earliest_finish)?
                .into_column(),
            self.date_series("latest_start", |t| t.latest_start)?
                .into_column(),
            self.date_series("latest_finish", |t| t.latest_finish)?
                .into_column(),
            Series::new(PlSmallStr::from_static("float_days"), floats).into_column(),
            Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
        ];
        DataFrame::new(columns)
    }

    fn date_series<F>(&self, name: &'static str, pick: F) -> PolarsResult<Series>
    where
        F: Fn(&TaskSchedule) -> NaiveDate,
    {
        let days: Vec<i32> = self
            .tasks
            .iter()
            .map(|t| date_to_i32(pick(t)))
            .collect();
        Series::new(PlSmallStr::from_static(name), days).cast(&DataType::Date)
    }
}

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}
