use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Canonical attendance code of one calendar day.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
pub enum DayCode {
    #[serde(rename = "PH")]
    #[strum(serialize = "PH")]
    PublicHoliday,
    #[serde(rename = "RH")]
    #[strum(serialize = "RH")]
    RestrictedHoliday,
    #[serde(rename = "CL")]
    #[strum(serialize = "CL")]
    CasualLeave,
    #[serde(rename = "SL")]
    #[strum(serialize = "SL")]
    SickLeave,
    #[serde(rename = "CL/2")]
    #[strum(serialize = "CL/2")]
    HalfDay,
    #[serde(rename = "WO")]
    #[strum(serialize = "WO")]
    WeeklyOff,
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Present,
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    Absent,
    #[serde(rename = "MP")]
    #[strum(serialize = "MP")]
    MissingPunch,
}

impl DayCode {
    /// Background color the calendar UI paints for this code.
    pub fn color(self) -> &'static str {
        match self {
            DayCode::Present => "#03be3c",
            DayCode::Absent => "#ff0000",
            DayCode::WeeklyOff => "#097af3",
            DayCode::PublicHoliday => "#9796F2",
            DayCode::RestrictedHoliday => "#C2977D",
            DayCode::CasualLeave | DayCode::SickLeave => "#f9a597",
            DayCode::HalfDay => "#343C19",
            DayCode::MissingPunch => "#ff3300",
        }
    }
}

/// Resolved calendar entry for one employee and one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "date": "2026-01-06",
    "dayName": "Tuesday",
    "displayString": "IN 09:15 AM\nOUT 06:30 PM",
    "statusCode": "P",
    "color": "#03be3c",
    "workingMinutes": 555
}))]
pub struct DayStatus {
    #[schema(example = "2026-01-06", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Tuesday")]
    pub day_name: String,

    #[schema(example = "IN 09:15 AM\nOUT 06:30 PM")]
    pub display_string: String,

    pub status_code: DayCode,

    #[schema(example = "#03be3c")]
    pub color: String,

    #[schema(example = 555)]
    pub working_minutes: u32,
}
