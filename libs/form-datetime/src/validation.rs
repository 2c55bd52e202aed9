//! Keystroke validation of date and time inputs.
//!
//! Both validators walk a fixed sequence of checks and report the first one
//! that fails as a feedback value. `None` means the input is acceptable or
//! empty; an empty field is a cleared answer, not an error.

use std::fmt;

use serde::Serialize;

use crate::date::{
    display_parts_to_date, split_display, DateGranularity, MonthStyle, FHIR_SEPARATOR,
};
use crate::segments::{
    count_separators, get_time_segments, validate_hour_segment, validate_minute_segment,
    validate_three_matches, validate_two_matches,
};
use crate::time::Period;

/// Why a date input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFeedback {
    /// A `-` was typed; only `/` separates display segments.
    WrongSeparator,
    /// Two separators, but not shaped like `DD/MM/YYYY`.
    NotFullDate,
    /// One separator, but not shaped like `MM/YYYY`.
    NotMonthYear,
    /// Shaped correctly, but the day or month does not exist.
    InvalidDate,
    NoMatchingFormat,
    /// A time was entered without a date.
    DateRequired,
}

impl DateFeedback {
    pub fn message(self) -> &'static str {
        match self {
            DateFeedback::WrongSeparator => {
                "Input does not match the required format with \"/\" as the separator."
            }
            DateFeedback::NotFullDate => "Input does not match the format DD/MM/YYYY.",
            DateFeedback::NotMonthYear => {
                "Input does not match the formats MM/YYYY or DD/MM/YYYY."
            }
            DateFeedback::InvalidDate => "Input is an invalid date.",
            DateFeedback::NoMatchingFormat => "Input does not match any date format.",
            DateFeedback::DateRequired => "Date is required",
        }
    }
}

impl fmt::Display for DateFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Why a time input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFeedback {
    /// A `.` was typed; only `:` separates hours and minutes.
    WrongSeparator,
    WrongFormat,
    /// Five characters with one `:`, but the segments are not two digits each.
    NotTwelveHour,
    /// Hour or minute out of range.
    InvalidTime,
    /// Hour is `0..=12` and no AM/PM was chosen.
    PeriodRequired,
}

impl TimeFeedback {
    pub fn message(self) -> &'static str {
        match self {
            TimeFeedback::WrongSeparator => {
                "Input does not match the required format with \":\" as the separator."
            }
            TimeFeedback::WrongFormat => "Input does not match the format HH:MM.",
            TimeFeedback::NotTwelveHour => "Input does not match the format hh:mm.",
            TimeFeedback::InvalidTime => "Input is an invalid time.",
            TimeFeedback::PeriodRequired => "Specify the period as AM or PM.",
        }
    }
}

impl fmt::Display for TimeFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Validate a display date.
///
/// The `/` count picks the only pattern that is tried. `parse_failed` marks
/// input that came from a stored value which could not be read, and turns the
/// final "no format" feedback into "invalid date".
pub fn validate_date_input(input: &str, parse_failed: bool) -> Option<DateFeedback> {
    if input.is_empty() {
        return None;
    }

    if input.contains(FHIR_SEPARATOR) {
        return Some(DateFeedback::WrongSeparator);
    }

    match count_separators(input, '/') {
        2 => {
            let Some(parts) = split_display(input, DateGranularity::Full, MonthStyle::Numeric)
            else {
                return Some(DateFeedback::NotFullDate);
            };
            let segments_valid = match (parts.day, parts.month) {
                (Some(day), Some(month)) => validate_three_matches(day, month, parts.year),
                _ => false,
            };
            if !segments_valid || display_parts_to_date(&parts).is_none() {
                return Some(DateFeedback::InvalidDate);
            }
            return None;
        }
        1 => {
            let Some(parts) = split_display(input, DateGranularity::YearMonth, MonthStyle::Numeric)
            else {
                return Some(DateFeedback::NotMonthYear);
            };
            let segments_valid = parts
                .month
                .is_some_and(|month| validate_two_matches(month, parts.year));
            if !segments_valid {
                return Some(DateFeedback::InvalidDate);
            }
            return None;
        }
        0 if input.len() == 4 => {
            if split_display(input, DateGranularity::Year, MonthStyle::Numeric).is_some() {
                return None;
            }
        }
        _ => {}
    }

    if parse_failed {
        Some(DateFeedback::InvalidDate)
    } else {
        Some(DateFeedback::NoMatchingFormat)
    }
}

/// A non-empty date input with no feedback.
pub fn date_input_is_valid(input: &str) -> bool {
    !input.is_empty() && validate_date_input(input, false).is_none()
}

/// Date feedback for a date-time item.
///
/// Existing feedback wins. Otherwise a time without a date asks for the date,
/// unless the time itself already has feedback. Any non-empty time counts,
/// even whitespace.
pub fn date_required_feedback(
    date_input: &str,
    time_input: &str,
    date_feedback: Option<DateFeedback>,
    time_feedback: Option<TimeFeedback>,
) -> Option<DateFeedback> {
    if date_feedback.is_some() {
        return date_feedback;
    }
    if time_feedback.is_some() {
        return None;
    }
    if date_input.is_empty() && !time_input.is_empty() {
        return Some(DateFeedback::DateRequired);
    }
    None
}

/// Segment-level validity of an `HH:MM` time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeSegments {
    pub time_is_valid: bool,
    /// The hour alone is in `13..=23`.
    pub is_24_hour_notation: bool,
}

/// Check the hour and minute ranges of `HH:MM`.
pub fn validate_time_segments(time_input: &str) -> TimeSegments {
    let Some((hour, minute)) = get_time_segments(time_input) else {
        return TimeSegments::default();
    };
    let notation = validate_hour_segment(hour);
    TimeSegments {
        time_is_valid: notation.is_some() && validate_minute_segment(minute),
        is_24_hour_notation: notation.is_some_and(|n| n.is_24_hour()),
    }
}

/// Result of validating a time input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeValidation {
    pub feedback: Option<TimeFeedback>,
    pub is_24_hour_notation: bool,
}

impl TimeValidation {
    fn rejected(feedback: TimeFeedback) -> Self {
        Self {
            feedback: Some(feedback),
            is_24_hour_notation: false,
        }
    }
}

fn is_two_digits(segment: &str) -> bool {
    segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a time input and the chosen period.
///
/// Unlike dates, `parse_failed` does not change the final feedback.
pub fn validate_time_input(
    time_input: &str,
    period: Option<Period>,
    parse_failed: bool,
) -> TimeValidation {
    if time_input.is_empty() {
        return TimeValidation::default();
    }

    if time_input.contains('.') {
        return TimeValidation::rejected(TimeFeedback::WrongSeparator);
    }

    if time_input.len() != 5 || !time_input.contains(':') {
        return TimeValidation::rejected(TimeFeedback::WrongFormat);
    }

    if count_separators(time_input, ':') == 1 {
        let shaped = get_time_segments(time_input)
            .is_some_and(|(hour, minute)| is_two_digits(hour) && is_two_digits(minute));
        if !shaped {
            return TimeValidation::rejected(TimeFeedback::NotTwelveHour);
        }

        let segments = validate_time_segments(time_input);
        if !segments.time_is_valid {
            return TimeValidation::rejected(TimeFeedback::InvalidTime);
        }
        if !segments.is_24_hour_notation && period.is_none() {
            return TimeValidation::rejected(TimeFeedback::PeriodRequired);
        }
        return TimeValidation {
            feedback: None,
            is_24_hour_notation: segments.is_24_hour_notation,
        };
    }

    tracing::trace!(time_input, parse_failed, "time input matched no format");
    TimeValidation::rejected(TimeFeedback::WrongFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_date_has_no_feedback() {
        assert_eq!(validate_date_input("", false), None);
        assert_eq!(validate_date_input("", true), None);
    }

    #[test]
    fn dash_is_always_wrong_separator() {
        for input in ["2024-01-01", "01-01-2024-extra", "abc-123/456", "-"] {
            assert_eq!(
                validate_date_input(input, false),
                Some(DateFeedback::WrongSeparator),
                "{input}"
            );
        }
    }

    #[test]
    fn full_dates() {
        assert_eq!(validate_date_input("15/03/2024", false), None);
        assert_eq!(validate_date_input("1/1/2024", false), None);
        assert_eq!(validate_date_input("//", false), Some(DateFeedback::NotFullDate));
        assert_eq!(
            validate_date_input("15/03/24", false),
            Some(DateFeedback::NotFullDate)
        );
        assert_eq!(
            validate_date_input("32/13/2024", false),
            Some(DateFeedback::InvalidDate)
        );
        assert_eq!(
            validate_date_input("31/02/2024", false),
            Some(DateFeedback::InvalidDate)
        );
        assert_eq!(validate_date_input("29/02/2024", false), None);
    }

    #[test]
    fn month_year_dates() {
        assert_eq!(validate_date_input("03/2024", false), None);
        assert_eq!(validate_date_input("1/2024", false), None);
        assert_eq!(
            validate_date_input("abc/def", false),
            Some(DateFeedback::NotMonthYear)
        );
        assert_eq!(
            validate_date_input("00/2024", false),
            Some(DateFeedback::InvalidDate)
        );
        assert_eq!(
            validate_date_input("13/2024", false),
            Some(DateFeedback::InvalidDate)
        );
    }

    #[test]
    fn years_and_fallthrough() {
        assert_eq!(validate_date_input("2024", false), None);
        assert_eq!(validate_date_input("1900", true), None);
        assert_eq!(
            validate_date_input("abcd", false),
            Some(DateFeedback::NoMatchingFormat)
        );
        assert_eq!(validate_date_input("abcd", true), Some(DateFeedback::InvalidDate));
        assert_eq!(
            validate_date_input("24", false),
            Some(DateFeedback::NoMatchingFormat)
        );
        assert_eq!(
            validate_date_input("2024 ", false),
            Some(DateFeedback::NoMatchingFormat)
        );
        assert_eq!(
            validate_date_input("1/2/3/4", false),
            Some(DateFeedback::NoMatchingFormat)
        );
    }

    #[test]
    fn feedback_messages() {
        assert_eq!(
            DateFeedback::WrongSeparator.to_string(),
            "Input does not match the required format with \"/\" as the separator."
        );
        assert_eq!(
            TimeFeedback::PeriodRequired.to_string(),
            "Specify the period as AM or PM."
        );
    }

    #[test]
    fn date_required_only_without_other_feedback() {
        assert_eq!(
            date_required_feedback("", "10:30", None, None),
            Some(DateFeedback::DateRequired)
        );
        assert_eq!(
            date_required_feedback("", "   ", None, None),
            Some(DateFeedback::DateRequired)
        );
        assert_eq!(
            date_required_feedback("", "10:30", Some(DateFeedback::InvalidDate), None),
            Some(DateFeedback::InvalidDate)
        );
        assert_eq!(date_required_feedback("", "", None, None), None);
        assert_eq!(date_required_feedback("   ", "10:30", None, None), None);
    }

    #[test]
    fn time_feedback_suppresses_date_required() {
        assert_eq!(
            date_required_feedback("", "10:30", None, Some(TimeFeedback::WrongFormat)),
            None
        );
        assert_eq!(
            date_required_feedback(
                "15-03",
                "10:30",
                Some(DateFeedback::WrongSeparator),
                Some(TimeFeedback::PeriodRequired)
            ),
            Some(DateFeedback::WrongSeparator)
        );
    }

    #[test]
    fn time_format_checks() {
        assert_eq!(validate_time_input("", None, true), TimeValidation::default());
        assert_eq!(
            validate_time_input("10.30", None, false).feedback,
            Some(TimeFeedback::WrongSeparator)
        );
        assert_eq!(
            validate_time_input("10:3", None, false).feedback,
            Some(TimeFeedback::WrongFormat)
        );
        assert_eq!(
            validate_time_input("12:30:45", None, true).feedback,
            Some(TimeFeedback::WrongFormat)
        );
        assert_eq!(
            validate_time_input("10300", None, false).feedback,
            Some(TimeFeedback::WrongFormat)
        );
        assert_eq!(
            validate_time_input("ab:cd", None, false).feedback,
            Some(TimeFeedback::NotTwelveHour)
        );
    }

    #[test]
    fn time_fallback_ignores_parse_failed() {
        assert_eq!(
            validate_time_input("1:2:3", None, true),
            validate_time_input("1:2:3", None, false)
        );
        assert_eq!(
            validate_time_input("1:2:3", None, true).feedback,
            Some(TimeFeedback::WrongFormat)
        );
    }

    #[test]
    fn time_ranges_and_periods() {
        assert_eq!(
            validate_time_input("25:00", None, false).feedback,
            Some(TimeFeedback::InvalidTime)
        );
        assert_eq!(
            validate_time_input("25:00", Some(Period::Pm), false).feedback,
            Some(TimeFeedback::InvalidTime)
        );
        assert_eq!(
            validate_time_input("10:60", Some(Period::Am), false).feedback,
            Some(TimeFeedback::InvalidTime)
        );
        assert_eq!(
            validate_time_input("09:00", None, false).feedback,
            Some(TimeFeedback::PeriodRequired)
        );

        let afternoon = validate_time_input("13:00", None, false);
        assert_eq!(afternoon.feedback, None);
        assert!(afternoon.is_24_hour_notation);

        let morning = validate_time_input("09:00", Some(Period::Am), false);
        assert_eq!(morning.feedback, None);
        assert!(!morning.is_24_hour_notation);
    }
}
