//! Builds one employee's month (or a single day) from the data-access ports.
//!
//! Every entry point fetches its inputs concurrently, resolves each date with
//! the configured [`DayStatusResolver`], and only then touches the daily
//! cache. Either the whole table is produced or the call fails.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::calendar::aggregator::{DayWindow, group_by_date};
use crate::calendar::error::CalendarError;
use crate::calendar::index::{HolidayIndex, LeaveIndex};
use crate::calendar::ports::{HolidaySource, LeaveSource, PunchSource};
use crate::calendar::range::{DateRange, MAX_YEAR, MIN_YEAR, parse_month};
use crate::calendar::resolver::{DayFacts, DayStatusResolver};
use crate::calendar::sync::DailyCacheSynchronizer;
use crate::model::day_status::DayStatus;
use crate::model::holiday::HolidayRecord;
use crate::model::leave::LeaveRecord;
use crate::model::punch::Punch;

/// Month table, one entry per date in ascending order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Calendar {
    pub table: Vec<DayStatus>,
}

/// Result of a single-day backfill.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySync {
    pub day: DayStatus,
    /// Whether a row was written to the daily table. Days without any punch
    /// are never cached.
    pub cached: bool,
}

/// A resolved date together with the punch window it was resolved from.
#[derive(Debug, Clone)]
pub struct ResolvedDay {
    pub status: DayStatus,
    pub window: Option<DayWindow>,
}

struct Sources {
    punches: Vec<Punch>,
    leaves: Vec<LeaveRecord>,
    holidays: Vec<HolidayRecord>,
}

/// Lookup structures for one employee over one range.
struct DayIndexes {
    windows: HashMap<NaiveDate, DayWindow>,
    holidays: HolidayIndex,
    leaves: LeaveIndex,
}

impl DayIndexes {
    fn build(employee_id: u64, range: DateRange, sources: Sources) -> Self {
        let indexes = Self {
            windows: group_by_date(&sources.punches),
            holidays: HolidayIndex::build(sources.holidays),
            leaves: LeaveIndex::build(sources.leaves, employee_id, range),
        };
        debug!(
            employee_id,
            punched_days = indexes.windows.len(),
            holidays = indexes.holidays.count(),
            leave_days = indexes.leaves.covered_days(),
            "Indexed calendar sources"
        );
        indexes
    }

    fn resolve(&self, resolver: &DayStatusResolver, date: NaiveDate) -> ResolvedDay {
        let window = self.windows.get(&date).copied();
        let facts = DayFacts {
            date,
            holiday: self.holidays.get(date),
            leave: self.leaves.get(date),
            window: window.as_ref(),
        };
        ResolvedDay {
            status: resolver.resolve(&facts),
            window,
        }
    }
}

pub struct CalendarAssembler {
    punches: Arc<dyn PunchSource>,
    leaves: Option<Arc<dyn LeaveSource>>,
    holidays: Option<Arc<dyn HolidaySource>>,
    resolver: DayStatusResolver,
    cache: Option<DailyCacheSynchronizer>,
}

impl CalendarAssembler {
    /// Punches only; leaves, holidays and the daily cache start disabled.
    pub fn new(punches: Arc<dyn PunchSource>, resolver: DayStatusResolver) -> Self {
        Self {
            punches,
            leaves: None,
            holidays: None,
            resolver,
            cache: None,
        }
    }

    pub fn with_leaves(mut self, leaves: Arc<dyn LeaveSource>) -> Self {
        self.leaves = Some(leaves);
        self
    }

    pub fn with_holidays(mut self, holidays: Arc<dyn HolidaySource>) -> Self {
        self.holidays = Some(holidays);
        self
    }

    pub fn with_cache(mut self, cache: DailyCacheSynchronizer) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolves every day of the month without writing anything.
    #[instrument(skip(self))]
    pub async fn assemble_month(
        &self,
        employee_id: u64,
        year: i32,
        month: u32,
    ) -> Result<Calendar, CalendarError> {
        let days = self.resolve_month(employee_id, year, month).await?;
        Ok(into_calendar(days))
    }

    /// [`assemble_month`](Self::assemble_month) followed by a best-effort
    /// write of every punched day to the daily cache.
    #[instrument(skip(self))]
    pub async fn get_calendar(
        &self,
        employee_id: u64,
        year: i32,
        month: u32,
    ) -> Result<Calendar, CalendarError> {
        let days = self.resolve_month(employee_id, year, month).await?;

        if let Some(cache) = &self.cache {
            let report = cache.sync_table(employee_id, &days).await;
            debug!(
                employee_id,
                written = report.written,
                failed = report.failed,
                "Daily cache synced"
            );
        }

        Ok(into_calendar(days))
    }

    /// Same as [`get_calendar`](Self::get_calendar) with the month given as `YYYY-MM`.
    pub async fn get_calendar_for(
        &self,
        employee_id: u64,
        month: &str,
    ) -> Result<Calendar, CalendarError> {
        let (year, month) = parse_month(month)?;
        self.get_calendar(employee_id, year, month).await
    }

    /// Recomputes one date and writes it to the daily cache if it has a punch.
    /// Unlike [`get_calendar`](Self::get_calendar), a failed write is returned.
    #[instrument(skip(self))]
    pub async fn sync_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<DaySync, CalendarError> {
        validate_employee(employee_id)?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            return Err(CalendarError::invalid(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}"
            )));
        }

        let range = DateRange::day(date);
        let sources = self.fetch(employee_id, range).await?;
        let resolved = DayIndexes::build(employee_id, range, sources).resolve(&self.resolver, date);

        let cached = match (&self.cache, resolved.window.filter(DayWindow::has_punch)) {
            (Some(cache), Some(window)) => {
                cache.upsert(employee_id, &window, &resolved.status).await?;
                true
            }
            _ => false,
        };

        info!(
            employee_id,
            %date,
            status = %resolved.status.status_code,
            cached,
            "Daily attendance synced"
        );

        Ok(DaySync {
            day: resolved.status,
            cached,
        })
    }

    async fn resolve_month(
        &self,
        employee_id: u64,
        year: i32,
        month: u32,
    ) -> Result<Vec<ResolvedDay>, CalendarError> {
        validate_employee(employee_id)?;
        let range = DateRange::month(year, month)?;

        let sources = self.fetch(employee_id, range).await?;
        let indexes = DayIndexes::build(employee_id, range, sources);

        Ok(range
            .days()
            .map(|date| indexes.resolve(&self.resolver, date))
            .collect())
    }

    async fn fetch(&self, employee_id: u64, range: DateRange) -> Result<Sources, CalendarError> {
        let (punches, leaves, holidays) = futures::try_join!(
            self.fetch_punches(employee_id, range),
            self.fetch_leaves(employee_id, range),
            self.fetch_holidays(range),
        )?;

        Ok(Sources {
            punches,
            leaves,
            holidays,
        })
    }

    async fn fetch_punches(
        &self,
        employee_id: u64,
        range: DateRange,
    ) -> Result<Vec<Punch>, CalendarError> {
        self.punches
            .punches(employee_id, range)
            .await
            .map_err(CalendarError::fetch("punches"))
    }

    async fn fetch_leaves(
        &self,
        employee_id: u64,
        range: DateRange,
    ) -> Result<Vec<LeaveRecord>, CalendarError> {
        let Some(source) = &self.leaves else {
            return Ok(Vec::new());
        };
        source
            .leaves(Some(employee_id), range)
            .await
            .map_err(CalendarError::fetch("leaves"))
    }

    async fn fetch_holidays(&self, range: DateRange) -> Result<Vec<HolidayRecord>, CalendarError> {
        let Some(source) = &self.holidays else {
            return Ok(Vec::new());
        };

        let mut holidays = Vec::new();
        for (year, month) in range.months() {
            let batch = source
                .holidays(year, month)
                .await
                .map_err(CalendarError::fetch("holidays"))?;
            holidays.extend(batch.into_iter().filter(|holiday| range.contains(holiday.date)));
        }
        Ok(holidays)
    }
}

fn validate_employee(employee_id: u64) -> Result<(), CalendarError> {
    if employee_id == 0 {
        return Err(CalendarError::invalid("employeeId must be a positive integer"));
    }
    Ok(())
}

fn into_calendar(days: Vec<ResolvedDay>) -> Calendar {
    Calendar {
        table: days.into_iter().map(|day| day.status).collect(),
    }
}
