use async_trait::async_trait;
use futures_util::StreamExt;
use sqlx::MySqlPool;

use crate::calendar::error::SourceError;
use crate::calendar::ports::{
    DailyCacheStore, HolidaySource, LeaveSource, PunchRecorder, PunchSource,
};
use crate::calendar::range::DateRange;
use crate::config::LeaveScope;
use crate::model::daily_row::CachedDailyRow;
use crate::model::holiday::HolidayRecord;
use crate::model::leave::LeaveRecord;
use crate::model::punch::{Punch, PunchRow};

/// `attendance_punch`, read and append.
#[derive(Clone)]
pub struct MySqlPunches {
    pool: MySqlPool,
}

impl MySqlPunches {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PunchSource for MySqlPunches {
    async fn punches(&self, employee_id: u64, range: DateRange) -> Result<Vec<Punch>, SourceError> {
        let mut stream = sqlx::query_as::<_, PunchRow>(
            r#"
            SELECT employee_id, attendance_date, punch_time, punch_type
            FROM attendance_punch
            WHERE employee_id = ? AND attendance_date BETWEEN ? AND ?
            ORDER BY punch_time ASC
            "#,
        )
        .bind(employee_id)
        .bind(range.start)
        .bind(range.end)
        .fetch(&self.pool);

        let mut punches = Vec::new();
        while let Some(row) = stream.next().await {
            punches.push(Punch::from(row?));
        }
        Ok(punches)
    }
}

#[async_trait]
impl PunchRecorder for MySqlPunches {
    async fn record(&self, punch: &Punch) -> Result<(), SourceError> {
        sqlx::query(
            r#"
            INSERT INTO attendance_punch (employee_id, attendance_date, punch_time, punch_type)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(punch.employee_id)
        .bind(punch.date)
        .bind(punch.timestamp)
        .bind(punch.punch_type.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// `leaves`. Older schemas have no `employee_id` column; with
/// [`LeaveScope::Organization`] every overlapping row is returned unscoped.
#[derive(Clone)]
pub struct MySqlLeaves {
    pool: MySqlPool,
    scope: LeaveScope,
}

impl MySqlLeaves {
    pub fn new(pool: MySqlPool, scope: LeaveScope) -> Self {
        Self { pool, scope }
    }
}

#[async_trait]
impl LeaveSource for MySqlLeaves {
    async fn leaves(
        &self,
        employee_id: Option<u64>,
        range: DateRange,
    ) -> Result<Vec<LeaveRecord>, SourceError> {
        let query = match (self.scope, employee_id) {
            (LeaveScope::Employee, Some(employee_id)) => sqlx::query_as::<_, LeaveRecord>(
                r#"
                SELECT employee_id, from_date, to_date, leave_type, status
                FROM leaves
                WHERE employee_id = ? AND from_date <= ? AND to_date >= ?
                ORDER BY id ASC
                "#,
            )
            .bind(employee_id),
            (LeaveScope::Employee, None) => {
                return Err(SourceError::Unavailable(
                    "employee-scoped leave table queried without an employee".to_string(),
                ));
            }
            (LeaveScope::Organization, _) => sqlx::query_as::<_, LeaveRecord>(
                r#"
                SELECT CAST(NULL AS UNSIGNED) AS employee_id, from_date, to_date, leave_type, status
                FROM leaves
                WHERE from_date <= ? AND to_date >= ?
                ORDER BY id ASC
                "#,
            ),
        };

        let leaves = query
            .bind(range.end)
            .bind(range.start)
            .fetch_all(&self.pool)
            .await?;
        Ok(leaves)
    }
}

/// `holidays`, organization wide.
#[derive(Clone)]
pub struct MySqlHolidays {
    pool: MySqlPool,
}

impl MySqlHolidays {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HolidaySource for MySqlHolidays {
    async fn holidays(&self, year: i32, month: u32) -> Result<Vec<HolidayRecord>, SourceError> {
        let holidays = sqlx::query_as::<_, HolidayRecord>(
            r#"
            SELECT holiday_date AS date,
                   COALESCE(holiday_name, '') AS name,
                   holiday_type
            FROM holidays
            WHERE YEAR(holiday_date) = ? AND MONTH(holiday_date) = ?
            ORDER BY holiday_date ASC
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;
        Ok(holidays)
    }
}

/// `employee_attendance_daily`, unique on (employee_id, attendance_date).
#[derive(Clone)]
pub struct MySqlDailyCache {
    pool: MySqlPool,
}

impl MySqlDailyCache {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyCacheStore for MySqlDailyCache {
    async fn upsert(&self, row: &CachedDailyRow) -> Result<(), SourceError> {
        sqlx::query(
            r#"
            INSERT INTO employee_attendance_daily
                (employee_id, attendance_date, day_name, in_time, out_time,
                 in_out_display, day_status, status_color, working_minutes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                day_name = VALUES(day_name),
                in_time = VALUES(in_time),
                out_time = VALUES(out_time),
                in_out_display = VALUES(in_out_display),
                day_status = VALUES(day_status),
                status_color = VALUES(status_color),
                working_minutes = VALUES(working_minutes),
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(row.employee_id)
        .bind(row.attendance_date)
        .bind(&row.day_name)
        .bind(row.in_time)
        .bind(row.out_time)
        .bind(row.in_out_display.as_deref())
        .bind(&row.day_status)
        .bind(&row.status_color)
        .bind(row.working_minutes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
