use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar month of a specific year: the aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl Month {
    /// Returns `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month of `timestamp` as seen from the given UTC offset.
    pub fn of_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::from_date(timestamp.with_timezone(&offset).date_naive())
    }

    /// Month containing "now" at the given UTC offset.
    pub fn current(offset: FixedOffset) -> Self {
        Self::of_timestamp(Utc::now(), offset)
    }

    pub fn first_day(&self) -> NaiveDate {
        // year/month are validated on construction; day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Move the window by `delta` months (negative goes back in time).
    /// Saturates at the first and last month representable by an `i32` year.
    pub fn shift(&self, delta: i32) -> Self {
        let index = i64::from(self.year) * 12 + (i64::from(self.month) - 1) + i64::from(delta);
        match i32::try_from(index.div_euclid(12)) {
            Ok(year) => Self {
                year,
                month: index.rem_euclid(12) as u32 + 1,
            },
            Err(_) if index < 0 => Self { year: i32::MIN, month: 1 },
            Err(_) => Self { year: i32::MAX, month: 12 },
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>, offset: FixedOffset) -> bool {
        Self::of_timestamp(timestamp, offset) == *self
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Advance a reference date by `delta` months.
///
/// The day of month is clamped to the length of the target month, so
/// `2025-01-31 + 1` is `2025-02-28`. Out-of-range results (beyond chrono's
/// supported years) leave the date unchanged.
pub fn shift_month(current: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        current.checked_add_months(months)
    } else {
        current.checked_sub_months(months)
    };
    shifted.unwrap_or(current)
}
