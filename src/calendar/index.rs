use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDate;

use crate::calendar::range::DateRange;
use crate::model::holiday::HolidayRecord;
use crate::model::leave::LeaveRecord;

/// Holidays by date. The first record seen for a date wins.
#[derive(Debug, Default)]
pub struct HolidayIndex {
    by_date: HashMap<NaiveDate, HolidayRecord>,
}

impl HolidayIndex {
    pub fn build(holidays: Vec<HolidayRecord>) -> Self {
        let mut by_date = HashMap::with_capacity(holidays.len());
        for holiday in holidays {
            match by_date.entry(holiday.date) {
                Entry::Vacant(slot) => {
                    slot.insert(holiday);
                }
                Entry::Occupied(kept) => {
                    let kept = kept.get();
                    tracing::warn!(
                        date = %holiday.date,
                        kept = %kept.name,
                        dropped = %holiday.name,
                        "Duplicate holiday for date"
                    );
                }
            }
        }
        Self { by_date }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&HolidayRecord> {
        self.by_date.get(&date)
    }

    pub fn count(&self) -> usize {
        self.by_date.len()
    }
}

/// Effective leave of one employee by date, limited to a window.
///
/// Overlapping requests resolve first-seen-wins, so the outcome depends only
/// on the order the source returned them in.
#[derive(Debug, Default)]
pub struct LeaveIndex {
    records: Vec<LeaveRecord>,
    by_date: HashMap<NaiveDate, usize>,
}

impl LeaveIndex {
    pub fn build(leaves: Vec<LeaveRecord>, employee_id: u64, window: DateRange) -> Self {
        let mut records = Vec::new();
        let mut by_date = HashMap::new();

        for leave in leaves {
            if !leave.is_effective() {
                tracing::debug!(
                    employee_id,
                    status = ?leave.status,
                    from = %leave.from_date,
                    to = %leave.to_date,
                    "Skipping non-approved leave"
                );
                continue;
            }
            if !leave.applies_to(employee_id) {
                continue;
            }
            let Some(span) = window.intersect(leave.from_date, leave.to_date) else {
                continue;
            };

            let slot = records.len();
            let mut claimed = false;
            for date in span.days() {
                if let Entry::Vacant(entry) = by_date.entry(date) {
                    entry.insert(slot);
                    claimed = true;
                }
            }
            if claimed {
                records.push(leave);
            }
        }

        Self { records, by_date }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&LeaveRecord> {
        self.by_date.get(&date).map(|&slot| &self.records[slot])
    }

    /// Number of dates covered by some leave.
    pub fn covered_days(&self) -> usize {
        self.by_date.len()
    }
}
