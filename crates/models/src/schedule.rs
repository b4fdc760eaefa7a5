use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` booking window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new `TimeWindow` if `start` is before `end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }
}

/// Inclusive calendar bounds used to filter reservation listings.
///
/// A reservation matches when its interval intersects the bounds; a missing
/// side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DayRange {
    /// Builds the bounds from the listing query parameters.
    ///
    /// `from` and `to` win over a single `day`, which only applies when
    /// neither of them is given.
    pub fn from_params(
        day: Option<NaiveDate>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        if from.is_none()
            && to.is_none()
            && let Some(day) = day
        {
            return Self::between(day, day);
        }

        Self {
            start: from.map(start_of_day),
            end: to.map(end_of_day),
        }
    }

    /// Bounds covering every instant of the days `from..=to`
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            start: Some(start_of_day(from)),
            end: Some(end_of_day(to)),
        }
    }

    /// Whether the bounds are inverted and can therefore match nothing
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if end < start)
    }
}

/// Returns `[first instant of the month, first instant of the next month)`
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((start_of_day(first), start_of_day(next)))
}

fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    // Second precision, as stored timestamps carry no fractional part
    day.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN))
}
