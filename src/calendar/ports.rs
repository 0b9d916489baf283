// Data-access capabilities the calendar core depends on.
//
// MySQL adapters live in `store::mysql`; tests use the in-memory fakes in
// `store::memory`.

use async_trait::async_trait;

use crate::calendar::error::SourceError;
use crate::calendar::range::DateRange;
use crate::model::daily_row::CachedDailyRow;
use crate::model::holiday::HolidayRecord;
use crate::model::leave::LeaveRecord;
use crate::model::punch::Punch;

#[async_trait]
pub trait PunchSource: Send + Sync {
    async fn punches(&self, employee_id: u64, range: DateRange) -> Result<Vec<Punch>, SourceError>;
}

#[async_trait]
pub trait PunchRecorder: Send + Sync {
    async fn record(&self, punch: &Punch) -> Result<(), SourceError>;
}

/// Read and write side of the punch log, as the punch endpoint needs both.
pub trait PunchLog: PunchSource + PunchRecorder {}

impl<T: PunchSource + PunchRecorder> PunchLog for T {}

#[async_trait]
pub trait LeaveSource: Send + Sync {
    /// `employee_id` may be ignored by sources that are not employee-scoped.
    async fn leaves(
        &self,
        employee_id: Option<u64>,
        range: DateRange,
    ) -> Result<Vec<LeaveRecord>, SourceError>;
}

#[async_trait]
pub trait HolidaySource: Send + Sync {
    async fn holidays(&self, year: i32, month: u32) -> Result<Vec<HolidayRecord>, SourceError>;
}

#[async_trait]
pub trait DailyCacheStore: Send + Sync {
    /// Insert or replace the row for (employee_id, attendance_date).
    async fn upsert(&self, row: &CachedDailyRow) -> Result<(), SourceError>;
}
