//! Separator counting and range checks for individual date/time segments.

/// Whether an hour segment fixes the clock notation on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourNotation {
    /// Hours `0..=12`: needs an AM/PM period to be unambiguous.
    TwelveHour,
    /// Hours `13..=23`: afternoon or evening without a period.
    TwentyFourHour,
}

impl HourNotation {
    pub fn is_24_hour(self) -> bool {
        matches!(self, HourNotation::TwentyFourHour)
    }
}

/// Number of `separator` characters in `value`.
pub fn count_separators(value: &str, separator: char) -> usize {
    value.matches(separator).count()
}

/// Parse a segment made only of ASCII digits.
pub(crate) fn numeric(segment: &str) -> Option<u32> {
    if segment.is_empty() || segment.len() > 9 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn is_short_segment(segment: &str) -> bool {
    matches!(segment.len(), 1 | 2)
}

fn in_range(segment: &str, min: u32, max: u32) -> bool {
    numeric(segment).is_some_and(|v| (min..=max).contains(&v))
}

/// `MM/YYYY` segments: month `1..=12` in one or two characters, four-character year.
pub fn validate_two_matches(month: &str, year: &str) -> bool {
    in_range(month, 1, 12) && is_short_segment(month) && year.len() == 4
}

/// `DD/MM/YYYY` segments.
///
/// Days run `1..=31` for every month; whether the day exists in that month is
/// checked separately when the date is built.
pub fn validate_three_matches(day: &str, month: &str, year: &str) -> bool {
    in_range(day, 1, 31)
        && in_range(month, 1, 12)
        && is_short_segment(day)
        && is_short_segment(month)
        && year.len() == 4
}

/// `None` when the hour is not in `0..=23`.
pub fn validate_hour_segment(hour: &str) -> Option<HourNotation> {
    match numeric(hour)? {
        13..=23 => Some(HourNotation::TwentyFourHour),
        0..=12 => Some(HourNotation::TwelveHour),
        _ => None,
    }
}

pub fn validate_minute_segment(minute: &str) -> bool {
    in_range(minute, 0, 59)
}

/// Split `HH:MM` into its hour and minute segments.
pub fn get_time_segments(time: &str) -> Option<(&str, &str)> {
    let (hour, minute) = time.split_once(':')?;
    if hour.is_empty() || minute.is_empty() {
        return None;
    }
    Some((hour, minute))
}
