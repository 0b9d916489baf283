use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Organization-wide holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HolidayRecord {
    pub date: NaiveDate,
    pub name: String,
    /// Free text from the holiday table; `restricted`/`rh` mark restricted holidays.
    pub holiday_type: Option<String>,
}

impl HolidayRecord {
    pub fn is_restricted(&self) -> bool {
        self.holiday_type.as_deref().map(str::trim).is_some_and(|kind| {
            kind.eq_ignore_ascii_case("restricted") || kind.eq_ignore_ascii_case("rh")
        })
    }
}
