use chrono::{Datelike, Months, NaiveDate};

use crate::calendar::error::CalendarError;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First to last day of `month` in `year`.
    pub fn month(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::invalid("month must be 1-12"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::invalid(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}"
            )));
        }

        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CalendarError::invalid("Invalid month/year"))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| CalendarError::invalid("Invalid month/year"))?;

        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Overlap with `[start, end]`, if any.
    pub fn intersect(&self, start: NaiveDate, end: NaiveDate) -> Option<Self> {
        let start = start.max(self.start);
        let end = end.min(self.end);
        (start <= end).then_some(Self { start, end })
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }

    /// Distinct (year, month) pairs touched by the range, ascending.
    pub fn months(self) -> Vec<(i32, u32)> {
        let mut months: Vec<(i32, u32)> = Vec::new();
        for date in self.days() {
            let key = (date.year(), date.month());
            if months.last() != Some(&key) {
                months.push(key);
            }
        }
        months
    }
}

/// Parses the `YYYY-MM` form used by the calendar endpoint.
pub fn parse_month(value: &str) -> Result<(i32, u32), CalendarError> {
    let invalid = || CalendarError::invalid("Invalid month format. Use YYYY-MM format");

    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let well_formed = year.len() == 4
        && month.len() == 2
        && year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    Ok((year, month))
}
