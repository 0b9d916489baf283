// In-memory implementation of every calendar port.
//
// Each port can be taken offline independently, and read ports count how
// often they were queried, so tests can observe disabled sources.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::calendar::error::SourceError;
use crate::calendar::ports::{
    DailyCacheStore, HolidaySource, LeaveSource, PunchRecorder, PunchSource,
};
use crate::calendar::range::DateRange;
use crate::model::daily_row::CachedDailyRow;
use crate::model::holiday::HolidayRecord;
use crate::model::leave::LeaveRecord;
use crate::model::punch::Punch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    Punches,
    Leaves,
    Holidays,
    DailyCache,
}

#[derive(Default)]
struct PortState {
    offline: AtomicBool,
    queries: AtomicUsize,
}

impl PortState {
    fn enter(&self, name: &str) -> Result<(), SourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable(format!("{name} offline")));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    punches: Mutex<Vec<Punch>>,
    leaves: Mutex<Vec<LeaveRecord>>,
    holidays: Mutex<Vec<HolidayRecord>>,
    daily: Mutex<HashMap<(u64, NaiveDate), CachedDailyRow>>,
    punch_port: PortState,
    leave_port: PortState,
    holiday_port: PortState,
    daily_port: PortState,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_punch(&self, punch: Punch) {
        self.punches.lock().unwrap().push(punch);
    }

    pub fn add_leave(&self, leave: LeaveRecord) {
        self.leaves.lock().unwrap().push(leave);
    }

    pub fn add_holiday(&self, holiday: HolidayRecord) {
        self.holidays.lock().unwrap().push(holiday);
    }

    pub fn set_offline(&self, port: Port, offline: bool) {
        self.port(port).offline.store(offline, Ordering::SeqCst);
    }

    pub fn queries(&self, port: Port) -> usize {
        self.port(port).queries.load(Ordering::SeqCst)
    }

    pub fn cached(&self, employee_id: u64, date: NaiveDate) -> Option<CachedDailyRow> {
        self.daily.lock().unwrap().get(&(employee_id, date)).cloned()
    }

    pub fn cached_rows(&self) -> usize {
        self.daily.lock().unwrap().len()
    }

    pub fn punch_count(&self) -> usize {
        self.punches.lock().unwrap().len()
    }

    fn port(&self, port: Port) -> &PortState {
        match port {
            Port::Punches => &self.punch_port,
            Port::Leaves => &self.leave_port,
            Port::Holidays => &self.holiday_port,
            Port::DailyCache => &self.daily_port,
        }
    }
}

#[async_trait]
impl PunchSource for InMemoryStore {
    async fn punches(&self, employee_id: u64, range: DateRange) -> Result<Vec<Punch>, SourceError> {
        self.punch_port.enter("punch log")?;
        let mut punches: Vec<Punch> = self
            .punches
            .lock()
            .unwrap()
            .iter()
            .filter(|punch| punch.employee_id == employee_id && range.contains(punch.date))
            .cloned()
            .collect();
        punches.sort_by_key(|punch| punch.timestamp);
        Ok(punches)
    }
}

#[async_trait]
impl PunchRecorder for InMemoryStore {
    async fn record(&self, punch: &Punch) -> Result<(), SourceError> {
        self.punch_port.enter("punch log")?;
        self.add_punch(punch.clone());
        Ok(())
    }
}

#[async_trait]
impl LeaveSource for InMemoryStore {
    async fn leaves(
        &self,
        employee_id: Option<u64>,
        range: DateRange,
    ) -> Result<Vec<LeaveRecord>, SourceError> {
        self.leave_port.enter("leave table")?;
        Ok(self
            .leaves
            .lock()
            .unwrap()
            .iter()
            .filter(|leave| employee_id.is_none_or(|id| leave.applies_to(id)))
            .filter(|leave| leave.from_date <= range.end && leave.to_date >= range.start)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl HolidaySource for InMemoryStore {
    async fn holidays(&self, year: i32, month: u32) -> Result<Vec<HolidayRecord>, SourceError> {
        use chrono::Datelike;

        self.holiday_port.enter("holiday table")?;
        Ok(self
            .holidays
            .lock()
            .unwrap()
            .iter()
            .filter(|holiday| holiday.date.year() == year && holiday.date.month() == month)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DailyCacheStore for InMemoryStore {
    async fn upsert(&self, row: &CachedDailyRow) -> Result<(), SourceError> {
        self.daily_port.enter("daily table")?;
        self.daily
            .lock()
            .unwrap()
            .insert((row.employee_id, row.attendance_date), row.clone());
        Ok(())
    }
}
