use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Direction of a single swipe as stored in `attendance_punch.punch_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumString)]
pub enum PunchType {
    #[strum(serialize = "IN")]
    In,
    #[strum(serialize = "OUT")]
    Out,
    /// Anything else the device wrote. Carried through, ignored by aggregation.
    #[strum(default)]
    Other(String),
}

impl PunchType {
    pub fn as_str(&self) -> &str {
        match self {
            PunchType::In => "IN",
            PunchType::Out => "OUT",
            PunchType::Other(raw) => raw,
        }
    }
}

/// One clock event. Append-only; several per employee per day are normal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    pub employee_id: u64,
    /// Attendance date the punch counts towards (not necessarily `timestamp`'s date).
    pub date: NaiveDate,
    pub timestamp: NaiveDateTime,
    pub punch_type: PunchType,
}

impl Punch {
    pub fn new(employee_id: u64, timestamp: NaiveDateTime, punch_type: PunchType) -> Self {
        Self {
            employee_id,
            date: timestamp.date(),
            timestamp,
            punch_type,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PunchRow {
    pub employee_id: u64,
    pub attendance_date: NaiveDate,
    pub punch_time: NaiveDateTime,
    pub punch_type: String,
}

impl From<PunchRow> for Punch {
    fn from(row: PunchRow) -> Self {
        // EnumString with a default variant never fails
        let punch_type = row
            .punch_type
            .trim()
            .parse()
            .unwrap_or(PunchType::Other(row.punch_type.clone()));

        Self {
            employee_id: row.employee_id,
            date: row.attendance_date,
            timestamp: row.punch_time,
            punch_type,
        }
    }
}
