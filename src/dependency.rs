use crate::calendar::WorkdayCalendar;
use crate::task::TaskId;
use crate::validation::TaskValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Precedence relation between a predecessor and its successor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Finish-to-Start
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    /// Start-to-Start
    #[serde(rename = "SS")]
    StartToStart,
    /// Finish-to-Finish
    #[serde(rename = "FF")]
    FinishToFinish,
    /// Start-to-Finish
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyType {
    pub const ALL: [DependencyType; 4] = [
        DependencyType::FinishToStart,
        DependencyType::StartToStart,
        DependencyType::FinishToFinish,
        DependencyType::StartToFinish,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "FS",
            DependencyType::StartToStart => "SS",
            DependencyType::FinishToFinish => "FF",
            DependencyType::StartToFinish => "SF",
        }
    }

    /// Earliest start this edge allows the successor, given the predecessor's
    /// early dates.
    pub fn forward<C>(
        self,
        calendar: &C,
        pred_start: NaiveDate,
        pred_finish: NaiveDate,
        lag_days: i64,
    ) -> NaiveDate
    where
        C: WorkdayCalendar + ?Sized,
    {
        match self {
            DependencyType::FinishToStart => {
                calendar.shift_workdays(pred_finish, lag_days.saturating_add(1))
            }
            DependencyType::StartToStart => calendar.shift_workdays(pred_start, lag_days),
            DependencyType::FinishToFinish => calendar.shift_workdays(pred_finish, lag_days),
            DependencyType::StartToFinish => calendar.shift_workdays(pred_start, lag_days),
        }
    }

    /// Latest finish this edge allows the predecessor, given the successor's
    /// late start. Each arm inverts the matching arm of [`Self::forward`]:
    /// start-anchored rows bound the predecessor's start, which is then
    /// carried to a finish using `pred_span` workdays.
    pub fn backward<C>(
        self,
        calendar: &C,
        succ_late_start: NaiveDate,
        lag_days: i64,
        pred_span: u32,
    ) -> NaiveDate
    where
        C: WorkdayCalendar + ?Sized,
    {
        match self {
            DependencyType::FinishToStart => {
                calendar.shift_workdays(succ_late_start, -lag_days.saturating_add(1))
            }
            DependencyType::FinishToFinish => calendar.shift_workdays(succ_late_start, -lag_days),
            DependencyType::StartToStart | DependencyType::StartToFinish => {
                let latest_start = calendar.shift_workdays(succ_late_start, -lag_days);
                calendar.add_workdays(latest_start, pred_span)
            }
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FS" => Ok(DependencyType::FinishToStart),
            "SS" => Ok(DependencyType::StartToStart),
            "FF" => Ok(DependencyType::FinishToFinish),
            "SF" => Ok(DependencyType::StartToFinish),
            other => Err(TaskValidationError::UnknownDependencyType(other.to_string())),
        }
    }
}

/// A directed edge: `successor_id` depends on `predecessor_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub successor_id: TaskId,
    pub predecessor_id: TaskId,
    #[serde(default)]
    pub lag_days: i64,
    #[serde(rename = "type", default)]
    pub kind: DependencyType,
}

impl Dependency {
    pub fn new(successor_id: TaskId, predecessor_id: TaskId) -> Self {
        Self {
            successor_id,
            predecessor_id,
            lag_days: 0,
            kind: DependencyType::FinishToStart,
        }
    }

    pub fn typed(
        successor_id: TaskId,
        predecessor_id: TaskId,
        kind: DependencyType,
        lag_days: i64,
    ) -> Self {
        Self {
            successor_id,
            predecessor_id,
            lag_days,
            kind,
        }
    }

    /// Predecessor in `12FS+2` notation (type and lag omitted when FS+0).
    pub fn predecessor_notation(&self) -> String {
        let mut out = self.predecessor_id.to_string();
        if self.kind != DependencyType::FinishToStart || self.lag_days != 0 {
            out.push_str(self.kind.as_str());
        }
        if self.lag_days != 0 {
            out.push_str(&format!("{:+}", self.lag_days));
        }
        out
    }
}

/// Parse one predecessor token such as `7`, `7SS`, `7FF-2` or `7FS+3` into an
/// edge pointing at `successor_id`.
pub fn parse_predecessor(
    successor_id: TaskId,
    token: &str,
) -> Result<Dependency, TaskValidationError> {
    let token = token.trim();
    let malformed = || TaskValidationError::MalformedPredecessor(token.to_string());

    let id_len = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(token.len());
    if id_len == 0 {
        return Err(malformed());
    }
    let predecessor_id: TaskId = token[..id_len].parse().map_err(|_| malformed())?;

    let rest = &token[id_len..];
    if rest.is_empty() {
        return Ok(Dependency::new(successor_id, predecessor_id));
    }

    let (kind_part, lag_part) = rest.split_at(rest.find(['+', '-']).unwrap_or(rest.len()));
    let kind = if kind_part.is_empty() {
        DependencyType::FinishToStart
    } else {
        kind_part.parse()?
    };
    let lag_days = if lag_part.is_empty() {
        0
    } else {
        lag_part.parse::<i64>().map_err(|_| malformed())?
    };

    Ok(Dependency::typed(successor_id, predecessor_id, kind, lag_days))
}

/// Parse a comma-separated predecessor list (`"1,2SS+1,4FF-2"`).
pub fn parse_predecessor_list(
    successor_id: TaskId,
    list: &str,
) -> Result<Vec<Dependency>, TaskValidationError> {
    list.split(',')
        .filter(|token| !token.trim().is_empty())
        .map(|token| parse_predecessor(successor_id, token))
        .collect()
}

/// Render every edge whose successor is `successor_id`, in edge order.
pub fn format_predecessor_list(successor_id: TaskId, dependencies: &[Dependency]) -> String {
    dependencies
        .iter()
        .filter(|dep| dep.successor_id == successor_id)
        .map(Dependency::predecessor_notation)
        .collect::<Vec<_>>()
        .join(",")
}
