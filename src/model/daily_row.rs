use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::calendar::aggregator::DayWindow;
use crate::model::day_status::DayStatus;

/// One row of `employee_attendance_daily`, keyed by (employee_id, attendance_date).
/// `updated_at` is assigned by the store on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedDailyRow {
    pub employee_id: u64,
    pub attendance_date: NaiveDate,
    pub day_name: String,
    pub in_time: Option<NaiveTime>,
    pub out_time: Option<NaiveTime>,
    pub in_out_display: Option<String>,
    pub day_status: String,
    pub status_color: String,
    pub working_minutes: u32,
}

impl CachedDailyRow {
    pub fn new(employee_id: u64, window: &DayWindow, status: &DayStatus) -> Self {
        let in_out_display = if status.display_string.is_empty() {
            None
        } else {
            Some(status.display_string.clone())
        };

        Self {
            employee_id,
            attendance_date: status.date,
            day_name: status.day_name.clone(),
            in_time: window.first_in.map(|ts| ts.time()),
            out_time: window.last_out.map(|ts| ts.time()),
            in_out_display,
            day_status: status.status_code.to_string(),
            status_color: status.color.clone(),
            working_minutes: status.working_minutes,
        }
    }
}
