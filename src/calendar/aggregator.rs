use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::calendar::duration;
use crate::model::punch::{Punch, PunchType};

/// Earliest IN and latest OUT of one employee's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub first_in: Option<NaiveDateTime>,
    pub last_out: Option<NaiveDateTime>,
}

impl DayWindow {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            first_in: None,
            last_out: None,
        }
    }

    /// Both ends present.
    pub fn is_complete(&self) -> bool {
        self.first_in.is_some() && self.last_out.is_some()
    }

    pub fn has_punch(&self) -> bool {
        self.first_in.is_some() || self.last_out.is_some()
    }

    pub fn working_minutes(&self) -> u32 {
        duration::working_minutes(self.first_in, self.last_out)
    }

    fn absorb(&mut self, punch: &Punch) {
        match punch.punch_type {
            PunchType::In => {
                if self.first_in.is_none_or(|current| punch.timestamp < current) {
                    self.first_in = Some(punch.timestamp);
                }
            }
            PunchType::Out => {
                if self.last_out.is_none_or(|current| punch.timestamp > current) {
                    self.last_out = Some(punch.timestamp);
                }
            }
            PunchType::Other(_) => {}
        }
    }

    /// Drops an OUT that precedes the first IN, leaving the day open.
    fn settle(mut self) -> Self {
        if let (Some(first_in), Some(last_out)) = (self.first_in, self.last_out) {
            if last_out < first_in {
                tracing::debug!(date = %self.date, %first_in, %last_out, "Discarding OUT before first IN");
                self.last_out = None;
            }
        }
        self
    }
}

/// Partitions punches by attendance date. Input order does not matter;
/// punches of unknown type are skipped and never open a window. A window never
/// ends before it starts: an OUT earlier than the first IN is discarded.
pub fn group_by_date(punches: &[Punch]) -> HashMap<NaiveDate, DayWindow> {
    let mut by_date: HashMap<NaiveDate, DayWindow> = HashMap::new();

    for punch in punches {
        if let PunchType::Other(raw) = &punch.punch_type {
            tracing::debug!(
                employee_id = punch.employee_id,
                date = %punch.date,
                punch_type = %raw,
                "Ignoring punch of unknown type"
            );
            continue;
        }

        by_date
            .entry(punch.date)
            .or_insert_with(|| DayWindow::empty(punch.date))
            .absorb(punch);
    }

    by_date
        .into_iter()
        .map(|(date, window)| (date, window.settle()))
        .collect()
}
