use super::{WorkCalendar, WorkdayCalendar};
use chrono::{Duration, NaiveDate};

/// A [`WorkCalendar`] with a precomputed, sorted index of the workdays in a
/// fixed date range.
///
/// Queries that stay inside the indexed range are answered with binary
/// searches instead of day-by-day walks. Anything that leaves the range falls
/// back to the wrapped calendar, so results are identical either way.
#[derive(Debug, Clone)]
pub struct IndexedCalendar {
    base: WorkCalendar,
    range_start: NaiveDate,
    range_end: NaiveDate,
    workdays: Vec<NaiveDate>,
}

impl IndexedCalendar {
    pub fn new(base: WorkCalendar, range_start: NaiveDate, range_end: NaiveDate) -> Self {
        let (range_start, range_end) = if range_start <= range_end {
            (range_start, range_end)
        } else {
            (range_end, range_start)
        };

        let mut workdays = Vec::new();
        let mut current = range_start;
        while current <= range_end {
            if base.is_workday(current) {
                workdays.push(current);
            }
            current = current + Duration::days(1);
        }

        Self {
            base,
            range_start,
            range_end,
            workdays,
        }
    }

    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.range_start, self.range_end)
    }

    fn covers(&self, date: NaiveDate) -> bool {
        self.range_start <= date && date <= self.range_end
    }

    /// Number of indexed workdays on or before `date`.
    fn rank_inclusive(&self, date: NaiveDate) -> usize {
        self.workdays.partition_point(|d| *d <= date)
    }

    /// Number of indexed workdays strictly before `date`.
    fn rank_exclusive(&self, date: NaiveDate) -> usize {
        self.workdays.partition_point(|d| *d < date)
    }
}

impl WorkdayCalendar for IndexedCalendar {
    fn is_workday(&self, date: NaiveDate) -> bool {
        if self.covers(date) {
            self.workdays.binary_search(&date).is_ok()
        } else {
            self.base.is_workday(date)
        }
    }

    fn add_workdays(&self, date: NaiveDate, n: u32) -> NaiveDate {
        if n == 0 {
            return date;
        }
        if self.covers(date) {
            let target = self.rank_inclusive(date) + n as usize - 1;
            if let Some(found) = self.workdays.get(target) {
                return *found;
            }
        }
        self.base.add_workdays(date, n)
    }

    fn sub_workdays(&self, date: NaiveDate, n: u32) -> NaiveDate {
        if n == 0 {
            return date;
        }
        if self.covers(date) {
            let before = self.rank_exclusive(date);
            if let Some(target) = before.checked_sub(n as usize) {
                return self.workdays[target];
            }
        }
        self.base.sub_workdays(date, n)
    }

    fn workdays_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        if start >= end {
            return 0;
        }
        if self.covers(start) && self.covers(end) {
            return (self.rank_inclusive(end) - self.rank_inclusive(start)) as i64;
        }
        self.base.workdays_between(start, end)
    }
}
