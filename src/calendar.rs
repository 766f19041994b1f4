use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod indexed;

pub use indexed::IndexedCalendar;

/// Workday arithmetic used by every scheduling pass.
///
/// A workday is any Monday-Friday date that is not a holiday. Implementations
/// must agree on all four primitives; `shift_workdays` is derived from them.
pub trait WorkdayCalendar {
    fn is_workday(&self, date: NaiveDate) -> bool;

    /// The date `n` workdays after `date`. `n == 0` returns `date` unchanged.
    fn add_workdays(&self, date: NaiveDate, n: u32) -> NaiveDate;

    /// The date `n` workdays before `date`. `n == 0` returns `date` unchanged.
    fn sub_workdays(&self, date: NaiveDate, n: u32) -> NaiveDate;

    /// Workdays in `(start, end]`; zero when `start >= end`.
    fn workdays_between(&self, start: NaiveDate, end: NaiveDate) -> i64;

    /// Signed offset: forward for `n >= 0`, backward otherwise.
    fn shift_workdays(&self, date: NaiveDate, n: i64) -> NaiveDate {
        let steps = u32::try_from(n.unsigned_abs()).unwrap_or(u32::MAX);
        if n >= 0 {
            self.add_workdays(date, steps)
        } else {
            self.sub_workdays(date, steps)
        }
    }
}

pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Mon-Fri calendar with an injected holiday set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendarConfig {
    #[serde(default)]
    holidays: Vec<NaiveDate>,
}

impl WorkCalendar {
    /// Pure Mon-Fri calendar without holidays.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Mon-Fri calendar preloaded with US federal holidays for an inclusive year range.
    pub fn with_us_holidays(start_year: i32, end_year: i32) -> Self {
        let (start, end) = if start_year <= end_year {
            (start_year, end_year)
        } else {
            (end_year, start_year)
        };

        let mut calendar = Self::new();
        for year in start..=end {
            calendar.add_us_holidays(year);
        }
        calendar
    }

    pub fn from_config(config: &WorkCalendarConfig) -> Self {
        Self::with_holidays(config.holidays.iter().copied())
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    fn add_us_holidays(&mut self, year: i32) {
        let fixed = [(1, 1), (7, 4), (11, 11), (12, 25)];
        for (month, day) in fixed {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.holidays.insert(date);
            }
        }

        // MLK, Presidents', Labor, Columbus, Thanksgiving
        let floating = [
            (1, Weekday::Mon, 3),
            (2, Weekday::Mon, 3),
            (9, Weekday::Mon, 1),
            (10, Weekday::Mon, 2),
            (11, Weekday::Thu, 4),
        ];
        for (month, weekday, n) in floating {
            if let Some(date) = Self::nth_weekday(year, month, weekday, n) {
                self.holidays.insert(date);
            }
        }

        // Memorial Day
        if let Some(date) = Self::last_weekday(year, 5, Weekday::Mon) {
            self.holidays.insert(date);
        }
    }

    /// Helper: Find the nth occurrence of a weekday in a month
    fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
        let date = first + Duration::days(i64::from(offset + 7 * (n.checked_sub(1)?)));
        (date.month() == month).then_some(date)
    }

    /// Helper: Find the last occurrence of a weekday in a month
    fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let mut date = next_month.pred_opt()?;
        while date.weekday() != weekday {
            date = date.pred_opt()?;
        }
        Some(date)
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    /// Add the same month/day as a holiday for every year in the inclusive range.
    /// Invalid dates (Feb 29 in common years) are skipped.
    pub fn add_recurring_holiday(&mut self, month: u32, day: u32, start_year: i32, end_year: i32) {
        for year in start_year..=end_year {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.holidays.insert(date);
            }
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl WorkdayCalendar for WorkCalendar {
    fn is_workday(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.holidays.contains(&date)
    }

    fn add_workdays(&self, date: NaiveDate, n: u32) -> NaiveDate {
        let mut current = date;
        let mut count = 0;
        while count < n {
            current = current + Duration::days(1);
            if self.is_workday(current) {
                count += 1;
            }
        }
        current
    }

    fn sub_workdays(&self, date: NaiveDate, n: u32) -> NaiveDate {
        let mut current = date;
        let mut count = 0;
        while count < n {
            current = current - Duration::days(1);
            if self.is_workday(current) {
                count += 1;
            }
        }
        current
    }

    fn workdays_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        let mut current = start;
        while current < end {
            current = current + Duration::days(1);
            if self.is_workday(current) {
                count += 1;
            }
        }
        count
    }
}

impl WorkCalendarConfig {
    pub fn new<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();
        Self { holidays }
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        WorkCalendarConfig::new(calendar.holidays.iter().copied())
    }
}
