//! Day status precedence.
//!
//! Each half-day strategy is a single ordered table of named rules, evaluated
//! top to bottom; the first rule that matches decides the day. The order of
//! these tables is the business rule itself: changing it changes every
//! historical calendar.

use chrono::{Datelike, NaiveDate, Weekday};
use strum_macros::{Display, EnumString};

use crate::calendar::aggregator::DayWindow;
use crate::calendar::duration::{FULL_DAY_MINUTES, format_in_out_display};
use crate::model::day_status::{DayCode, DayStatus};
use crate::model::holiday::HolidayRecord;
use crate::model::leave::LeaveRecord;

/// How a worked day becomes a half day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum HalfDayRule {
    /// Only leave plus a complete punch pair gives CL/2.
    #[default]
    #[strum(serialize = "leave-driven")]
    LeaveDriven,
    /// Additionally, a complete pair shorter than [`FULL_DAY_MINUTES`] gives CL/2
    /// on days no leave, holiday or weekly off already classified.
    #[strum(serialize = "duration-threshold")]
    DurationThreshold,
}

/// Everything known about one date for one employee.
#[derive(Debug, Clone, Copy)]
pub struct DayFacts<'a> {
    pub date: NaiveDate,
    pub holiday: Option<&'a HolidayRecord>,
    pub leave: Option<&'a LeaveRecord>,
    pub window: Option<&'a DayWindow>,
}

impl DayFacts<'_> {
    fn has_complete_attendance(&self) -> bool {
        self.window.is_some_and(DayWindow::is_complete)
    }

    fn has_any_punch(&self) -> bool {
        self.window.is_some_and(DayWindow::has_punch)
    }

    fn working_minutes(&self) -> u32 {
        self.window.map_or(0, DayWindow::working_minutes)
    }
}

/// Weekly-off policy. Fixed to Sunday for every employee.
pub fn is_weekly_off(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    classify: fn(&DayFacts<'_>) -> Option<DayCode>,
}

impl Rule {
    const fn new(name: &'static str, classify: fn(&DayFacts<'_>) -> Option<DayCode>) -> Self {
        Self { name, classify }
    }
}

fn holiday(facts: &DayFacts<'_>) -> Option<DayCode> {
    facts.holiday.map(|holiday| {
        if holiday.is_restricted() {
            DayCode::RestrictedHoliday
        } else {
            DayCode::PublicHoliday
        }
    })
}

fn half_day_leave(facts: &DayFacts<'_>) -> Option<DayCode> {
    (facts.leave.is_some() && facts.has_complete_attendance()).then_some(DayCode::HalfDay)
}

fn leave(facts: &DayFacts<'_>) -> Option<DayCode> {
    facts.leave.map(|leave| {
        if leave.is_sick() {
            DayCode::SickLeave
        } else {
            DayCode::CasualLeave
        }
    })
}

fn weekly_off(facts: &DayFacts<'_>) -> Option<DayCode> {
    is_weekly_off(facts.date).then_some(DayCode::WeeklyOff)
}

fn short_day(facts: &DayFacts<'_>) -> Option<DayCode> {
    (facts.has_complete_attendance() && facts.working_minutes() < FULL_DAY_MINUTES)
        .then_some(DayCode::HalfDay)
}

fn present(facts: &DayFacts<'_>) -> Option<DayCode> {
    facts.has_complete_attendance().then_some(DayCode::Present)
}

fn missing_punch(facts: &DayFacts<'_>) -> Option<DayCode> {
    facts.has_any_punch().then_some(DayCode::MissingPunch)
}

fn absent(_: &DayFacts<'_>) -> Option<DayCode> {
    Some(DayCode::Absent)
}

const LEAVE_DRIVEN: &[Rule] = &[
    Rule::new("holiday", holiday),
    Rule::new("half-day-leave", half_day_leave),
    Rule::new("leave", leave),
    Rule::new("weekly-off", weekly_off),
    Rule::new("present", present),
    Rule::new("missing-punch", missing_punch),
    Rule::new("absent", absent),
];

const DURATION_THRESHOLD: &[Rule] = &[
    Rule::new("holiday", holiday),
    Rule::new("half-day-leave", half_day_leave),
    Rule::new("leave", leave),
    Rule::new("weekly-off", weekly_off),
    Rule::new("short-day", short_day),
    Rule::new("present", present),
    Rule::new("missing-punch", missing_punch),
    Rule::new("absent", absent),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DayStatusResolver {
    half_day_rule: HalfDayRule,
}

impl DayStatusResolver {
    pub fn new(half_day_rule: HalfDayRule) -> Self {
        Self { half_day_rule }
    }

    pub fn rules(&self) -> &'static [Rule] {
        match self.half_day_rule {
            HalfDayRule::LeaveDriven => LEAVE_DRIVEN,
            HalfDayRule::DurationThreshold => DURATION_THRESHOLD,
        }
    }

    pub fn classify(&self, facts: &DayFacts<'_>) -> DayCode {
        self.rules()
            .iter()
            .find_map(|rule| {
                let code = (rule.classify)(facts)?;
                tracing::trace!(date = %facts.date, rule = rule.name, %code, "Day classified");
                Some(code)
            })
            .unwrap_or(DayCode::Absent)
    }

    /// Classifies the day and fills in the presentation fields.
    pub fn resolve(&self, facts: &DayFacts<'_>) -> DayStatus {
        let status_code = self.classify(facts);
        let (first_in, last_out) = facts
            .window
            .map_or((None, None), |window| (window.first_in, window.last_out));

        DayStatus {
            date: facts.date,
            day_name: facts.date.format("%A").to_string(),
            display_string: format_in_out_display(first_in, last_out),
            status_code,
            color: status_code.color().to_string(),
            working_minutes: facts.working_minutes(),
        }
    }
}
