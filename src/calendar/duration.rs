//! Worked-time arithmetic and the 12-hour labels shown in calendar cells.
//!
//! Timestamps are naive local wall-clock values exactly as stored; nothing
//! here converts between time zones.

use chrono::NaiveDateTime;

use crate::model::punch::{Punch, PunchType};

/// Worked minutes at or above which a punched day counts as a full day
/// under the duration-threshold half-day rule.
pub const FULL_DAY_MINUTES: u32 = 270;

/// Minutes between first IN and last OUT, rounded to the nearest minute.
/// Zero when either end is missing or the pair is inverted.
pub fn working_minutes(first_in: Option<NaiveDateTime>, last_out: Option<NaiveDateTime>) -> u32 {
    match (first_in, last_out) {
        (Some(start), Some(end)) => minutes_between(start, end),
        _ => 0,
    }
}

/// Sum of every IN → next OUT interval, in time order. A second IN while a
/// pair is open is ignored, as is an OUT with no open pair.
pub fn paired_minutes(punches: &[Punch]) -> u32 {
    pair_up(punches).0
}

/// Start of the pair still waiting for its OUT, if any.
pub fn open_in(punches: &[Punch]) -> Option<NaiveDateTime> {
    pair_up(punches).1
}

fn pair_up(punches: &[Punch]) -> (u32, Option<NaiveDateTime>) {
    let mut ordered: Vec<&Punch> = punches.iter().collect();
    ordered.sort_by_key(|punch| punch.timestamp);

    let mut open: Option<NaiveDateTime> = None;
    let mut total: u32 = 0;
    for punch in ordered {
        match punch.punch_type {
            PunchType::In => {
                open.get_or_insert(punch.timestamp);
            }
            PunchType::Out => {
                if let Some(start) = open.take() {
                    total = total.saturating_add(minutes_between(start, punch.timestamp));
                }
            }
            PunchType::Other(_) => {}
        }
    }
    (total, open)
}

/// `7h 5m`
pub fn format_hours_minutes(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    u32::try_from((millis + 30_000) / 60_000).unwrap_or(u32::MAX)
}

/// `hh:mm AM/PM`, e.g. `09:48 AM`.
pub fn format_clock_12h(timestamp: NaiveDateTime) -> String {
    timestamp.format("%I:%M %p").to_string()
}

/// Two-line cell label, `IN 09:48 AM\nOUT 06:05 PM`. Missing ends drop their
/// line; no punches at all gives an empty string.
pub fn format_in_out_display(
    first_in: Option<NaiveDateTime>,
    last_out: Option<NaiveDateTime>,
) -> String {
    let lines: Vec<String> = [("IN", first_in), ("OUT", last_out)]
        .into_iter()
        .filter_map(|(label, ts)| ts.map(|ts| format!("{label} {}", format_clock_12h(ts))))
        .collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn punch(h: u32, m: u32, punch_type: PunchType) -> Punch {
        Punch::new(1, at(h, m, 0), punch_type)
    }

    #[rstest]
    #[case(Some(at(9, 15, 0)), Some(at(18, 30, 0)), 555)]
    #[case(Some(at(9, 0, 0)), Some(at(13, 0, 0)), 240)]
    #[case(Some(at(9, 0, 0)), Some(at(9, 0, 29)), 0)]
    #[case(Some(at(9, 0, 0)), Some(at(9, 0, 30)), 1)]
    #[case(Some(at(18, 0, 0)), Some(at(9, 0, 0)), 0)]
    #[case(Some(at(9, 0, 0)), None, 0)]
    #[case(None, Some(at(18, 0, 0)), 0)]
    #[case(None, None, 0)]
    fn working_minutes_rounds_and_never_goes_negative(
        #[case] first_in: Option<NaiveDateTime>,
        #[case] last_out: Option<NaiveDateTime>,
        #[case] expected: u32,
    ) {
        assert_eq!(working_minutes(first_in, last_out), expected);
    }

    #[test]
    fn paired_minutes_sums_each_in_out_pair() {
        let punches = vec![
            punch(13, 30, PunchType::In),
            punch(9, 0, PunchType::In),
            punch(12, 30, PunchType::Out),
            punch(17, 0, PunchType::Out),
            punch(17, 5, PunchType::Out),
            punch(12, 45, PunchType::Other("BREAK".into())),
        ];
        // 09:00-12:30 and 13:30-17:00
        assert_eq!(paired_minutes(&punches), 420);
    }

    #[test]
    fn paired_minutes_ignores_an_open_pair() {
        let punches = vec![punch(9, 0, PunchType::In), punch(9, 30, PunchType::In)];
        assert_eq!(paired_minutes(&punches), 0);
        assert_eq!(open_in(&punches), Some(at(9, 0, 0)));
    }

    #[test]
    fn open_in_clears_once_paired() {
        let mut punches = vec![punch(9, 0, PunchType::In), punch(12, 0, PunchType::Out)];
        assert_eq!(open_in(&punches), None);

        punches.push(punch(13, 0, PunchType::In));
        assert_eq!(open_in(&punches), Some(at(13, 0, 0)));
        assert_eq!(open_in(&[punch(8, 0, PunchType::Out)]), None);
        assert_eq!(open_in(&[]), None);
    }

    #[rstest]
    #[case(0, "0h 0m")]
    #[case(59, "0h 59m")]
    #[case(425, "7h 5m")]
    fn hours_minutes_label(#[case] minutes: u32, #[case] expected: &str) {
        assert_eq!(format_hours_minutes(minutes), expected);
    }

    #[rstest]
    #[case(at(0, 5, 0), "12:05 AM")]
    #[case(at(9, 48, 0), "09:48 AM")]
    #[case(at(12, 0, 0), "12:00 PM")]
    #[case(at(18, 5, 0), "06:05 PM")]
    fn clock_is_twelve_hour(#[case] ts: NaiveDateTime, #[case] expected: &str) {
        assert_eq!(format_clock_12h(ts), expected);
    }

    #[test]
    fn display_omits_missing_lines() {
        assert_eq!(
            format_in_out_display(Some(at(9, 15, 0)), Some(at(18, 30, 0))),
            "IN 09:15 AM\nOUT 06:30 PM"
        );
        assert_eq!(format_in_out_display(Some(at(9, 15, 0)), None), "IN 09:15 AM");
        assert_eq!(format_in_out_display(None, Some(at(18, 30, 0))), "OUT 06:30 PM");
        assert_eq!(format_in_out_display(None, None), "");
    }
}
