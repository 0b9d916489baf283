use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Leave request as read from the leave source.
///
/// `employee_id` is `None` when the deployment's leave table is not
/// employee-scoped; such a record applies to whoever's calendar is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRecord {
    pub employee_id: Option<u64>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub leave_type: String,
    pub status: Option<String>,
}

impl LeaveRecord {
    /// Approved, or no status recorded at all.
    pub fn is_effective(&self) -> bool {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(status) => {
                status.eq_ignore_ascii_case("approved") || status.eq_ignore_ascii_case("approve")
            }
        }
    }

    pub fn is_sick(&self) -> bool {
        self.leave_type.to_lowercase().contains("sick")
    }

    pub fn applies_to(&self, employee_id: u64) -> bool {
        self.employee_id.is_none_or(|id| id == employee_id)
    }
}
