use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::warn;

use crate::calendar::aggregator::DayWindow;
use crate::calendar::assembler::ResolvedDay;
use crate::calendar::error::CalendarError;
use crate::calendar::ports::DailyCacheStore;
use crate::model::daily_row::CachedDailyRow;
use crate::model::day_status::DayStatus;

/// Outcome of writing one calendar's punched days to the daily table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub written: usize,
    pub failed: usize,
}

/// Write-through of resolved days into `employee_attendance_daily`.
#[derive(Clone)]
pub struct DailyCacheSynchronizer {
    store: Arc<dyn DailyCacheStore>,
}

impl DailyCacheSynchronizer {
    pub fn new(store: Arc<dyn DailyCacheStore>) -> Self {
        Self { store }
    }

    pub async fn upsert(
        &self,
        employee_id: u64,
        window: &DayWindow,
        status: &DayStatus,
    ) -> Result<(), CalendarError> {
        let row = CachedDailyRow::new(employee_id, window, status);
        self.store.upsert(&row).await.map_err(CalendarError::Cache)
    }

    /// Upserts every day that has at least one punch, all at once. Failures are
    /// logged and counted; they never abort the other writes.
    pub async fn sync_table(&self, employee_id: u64, days: &[ResolvedDay]) -> SyncReport {
        let writes = days.iter().filter_map(|day| {
            let window = day.window.filter(DayWindow::has_punch)?;
            Some(async move {
                let outcome = self.upsert(employee_id, &window, &day.status).await;
                (day.status.date, outcome)
            })
        });

        let mut report = SyncReport::default();
        for (date, outcome) in join_all(writes).await {
            record(&mut report, employee_id, date, outcome);
        }
        report
    }
}

fn record(
    report: &mut SyncReport,
    employee_id: u64,
    date: NaiveDate,
    outcome: Result<(), CalendarError>,
) {
    match outcome {
        Ok(()) => report.written += 1,
        Err(error) => {
            report.failed += 1;
            warn!(employee_id, %date, error = %error, "Failed to cache daily attendance row");
        }
    }
}
