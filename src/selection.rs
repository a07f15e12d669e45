//! Selection state - the four wheel values and their string forms.
//!
//! Holds the year/month/day/time picked so far, the optional min/max
//! bounds, and the conversions to the canonical (`YYYY-MM-DD HH:MM`) and
//! display (`DD/MM/YYYY HH:MM`) strings. The canonical string is the value
//! exchanged with the host form; the display string is derived-only and is
//! never parsed back in.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::calendar::days_in_month;

/// Minutes in a day; the time wheel table is `1440 / step` entries long.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Error type for canonical-string parsing
///
/// Callers treat every variant the same way: ignore the input and leave the
/// current selection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Input does not have the exact `YYYY-MM-DD HH:MM` shape
    Malformed,
    /// Shape was right but the fields do not name a real calendar date
    InvalidDate,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed => write!(f, "input is not a canonical date-time string"),
            ParseError::InvalidDate => write!(f, "fields do not form a valid date-time"),
        }
    }
}

impl std::error::Error for ParseError {}

/// One entry of the time wheel, a zero-padded `HH:MM` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
}

impl TimeSlot {
    /// Builds a slot, rejecting out-of-range components.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Slot at the given number of minutes past midnight.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then(|| Self {
            hour: minutes / 60,
            minute: minutes % 60,
        })
    }

    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeSlot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        let b = s.as_bytes();
        if b.len() != 5 || b[2] != b':' {
            return Err(ParseError::Malformed);
        }
        let hour = parse_digits(&s[0..2])?;
        let minute = parse_digits(&s[3..5])?;
        TimeSlot::new(hour, minute).ok_or(ParseError::Malformed)
    }
}

/// Generates the table of selectable times for a given minute step.
///
/// `1440 / step` entries starting at midnight; a step that does not divide
/// the day evenly truncates the remainder. A zero step yields an empty
/// table rather than dividing by zero.
pub fn time_slots(step_minutes: u32) -> Vec<TimeSlot> {
    if step_minutes == 0 {
        return Vec::new();
    }
    (0..MINUTES_PER_DAY / step_minutes)
        .filter_map(|i| TimeSlot::from_minutes(i * step_minutes))
        .collect()
}

/// Optional min/max instants limiting which day/time combinations are
/// selectable. Out-of-bounds days are still rendered, just disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<NaiveDateTime>,
    pub max: Option<NaiveDateTime>,
}

impl Bounds {
    pub fn new(min: Option<NaiveDateTime>, max: Option<NaiveDateTime>) -> Self {
        Self { min, max }
    }

    /// True when the instant is selectable under the configured bounds.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.min.map_or(true, |min| instant >= min) && self.max.map_or(true, |max| instant <= max)
    }
}

/// The four current wheel values; unset fields are `None`.
///
/// After any committed update `day` is valid for `(year, month)`, and
/// `time` is always drawn from the generated slot table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub time: Option<TimeSlot>,
}

impl SelectionState {
    /// Partial update: `None` arguments leave the current value untouched.
    pub fn apply(
        &mut self,
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
        time: Option<TimeSlot>,
    ) {
        if let Some(y) = year {
            self.year = Some(y);
        }
        if let Some(m) = month {
            self.month = Some(m);
        }
        if let Some(d) = day {
            self.day = Some(d);
        }
        if let Some(t) = time {
            self.time = Some(t);
        }
    }

    /// True once all four fields are set.
    pub fn is_complete(&self) -> bool {
        self.year.is_some() && self.month.is_some() && self.day.is_some() && self.time.is_some()
    }

    /// The instant named by the selection, or `None` while incomplete or
    /// while the fields do not form a real date.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)?;
        let time = self.time?;
        date.and_hms_opt(time.hour, time.minute, 0)
    }

    /// Canonical `YYYY-MM-DD HH:MM` form, or `None` while incomplete.
    pub fn to_canonical(&self) -> Option<String> {
        let (y, m, d, t) = (self.year?, self.month?, self.day?, self.time?);
        Some(format!("{:04}-{:02}-{:02} {}", y, m, d, t))
    }

    /// Display `DD/MM/YYYY HH:MM` form, or `None` while incomplete.
    pub fn to_display(&self) -> Option<String> {
        let (y, m, d, t) = (self.year?, self.month?, self.day?, self.time?);
        Some(format!("{:02}/{:02}/{:04} {}", d, m, y, t))
    }

    /// Parses a canonical string into a complete selection.
    ///
    /// Accepts the exact `YYYY-MM-DD HH:MM` shape, plus the variant with a
    /// trailing `:SS` that some hosts store; seconds are discarded. Any
    /// other input is an error, which callers ignore without state change.
    pub fn parse_canonical(s: &str) -> Result<Self, ParseError> {
        if !s.is_ascii() {
            return Err(ParseError::Malformed);
        }
        let b = s.as_bytes();
        let s = match b.len() {
            16 => s,
            19 if b[16] == b':'
                && b[17].is_ascii_digit()
                && b[18].is_ascii_digit() =>
            {
                &s[..16]
            }
            _ => return Err(ParseError::Malformed),
        };
        let b = s.as_bytes();
        if b[4] != b'-' || b[7] != b'-' || b[10] != b' ' {
            return Err(ParseError::Malformed);
        }
        let year = parse_digits(&s[0..4])? as i32;
        let month = parse_digits(&s[5..7])?;
        let day = parse_digits(&s[8..10])?;
        let time: TimeSlot = s[11..16].parse()?;
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(ParseError::InvalidDate);
        }
        Ok(Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            time: Some(time),
        })
    }
}

fn parse_digits(s: &str) -> Result<u32, ParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::Malformed);
    }
    s.parse().map_err(|_| ParseError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> SelectionState {
        SelectionState {
            year: Some(2021),
            month: Some(5),
            day: Some(20),
            time: TimeSlot::new(18, 0),
        }
    }

    #[test]
    fn test_canonical_round_trip() {
        let state = complete();
        let canonical = state.to_canonical().unwrap();
        assert_eq!(canonical, "2021-05-20 18:00");
        assert_eq!(SelectionState::parse_canonical(&canonical).unwrap(), state);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(complete().to_display().unwrap(), "20/05/2021 18:00");
    }

    #[test]
    fn test_incomplete_state_emits_nothing() {
        let mut state = complete();
        state.time = None;
        assert!(!state.is_complete());
        assert_eq!(state.to_canonical(), None);
        assert_eq!(state.to_display(), None);
    }

    #[test]
    fn test_parse_tolerates_trailing_seconds() {
        let state = SelectionState::parse_canonical("2021-05-20 18:00:30").unwrap();
        assert_eq!(state, complete());
    }

    #[test]
    fn test_parse_rejects_malformed_shapes() {
        for input in [
            "",
            "2021-05-20",
            "2021/05/20 18:00",
            "2021-05-20T18:00",
            "21-05-2020 18:00",
            "2021-05-20 18:00:3x",
            "2021-05-20  8:00",
            "não é uma data válida",
        ] {
            assert_eq!(
                SelectionState::parse_canonical(input),
                Err(ParseError::Malformed),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        for input in ["2021-13-01 10:00", "2021-02-29 10:00", "2021-04-31 10:00", "2021-00-10 10:00", "2021-05-00 10:00"] {
            assert_eq!(
                SelectionState::parse_canonical(input),
                Err(ParseError::InvalidDate),
                "accepted {input:?}"
            );
        }
        // 2024 is a leap year, so the same February date parses
        assert!(SelectionState::parse_canonical("2024-02-29 10:00").is_ok());
    }

    #[test]
    fn test_time_slot_minute_arithmetic() {
        let slot = TimeSlot::new(18, 0).unwrap();
        assert_eq!(slot.minutes_from_midnight(), 1080);
        assert_eq!(TimeSlot::from_minutes(1080), Some(slot));
        assert_eq!(TimeSlot::from_minutes(MINUTES_PER_DAY), None);
    }

    #[test]
    fn test_time_slot_table() {
        let slots = time_slots(10);
        assert_eq!(slots.len(), 144);
        assert_eq!(slots[0].to_string(), "00:00");
        assert_eq!(slots[143].to_string(), "23:50");
    }

    #[test]
    fn test_time_slot_table_truncates_uneven_steps() {
        // 700 does not divide 1440; the remainder is dropped
        assert_eq!(time_slots(700).len(), 2);
        assert!(time_slots(0).is_empty());
    }

    #[test]
    fn test_bounds_contains() {
        let min = NaiveDate::from_ymd_opt(2021, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bounds = Bounds::new(Some(min), None);
        let before = NaiveDate::from_ymd_opt(2021, 4, 30)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let after = NaiveDate::from_ymd_opt(2021, 5, 2)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        assert!(!bounds.contains(before));
        assert!(bounds.contains(min));
        assert!(bounds.contains(after));
    }

    #[test]
    fn test_apply_skips_none() {
        let mut state = complete();
        state.apply(None, Some(6), None, None);
        assert_eq!(state.year, Some(2021));
        assert_eq!(state.month, Some(6));
        assert_eq!(state.day, Some(20));
    }
}
