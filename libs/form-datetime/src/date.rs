//! Conversion between FHIR `date` values and the slash-separated display format.
//!
//! The number of separators alone decides the granularity: a display value
//! with two `/` is only ever read as `DD/MM/YYYY`, a FHIR value with one `-`
//! only as `YYYY-MM`, and so on. There is no fallback to a coarser
//! granularity once a separator count has been seen.

use chrono::{DateTime, NaiveDate};

use crate::error::{Error, Result};
use crate::options::month_from_name;
use crate::segments::{count_separators, numeric};

/// Display separator.
pub const DISPLAY_SEPARATOR: char = '/';
/// FHIR wire separator.
pub const FHIR_SEPARATOR: char = '-';

/// Precision of a date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateGranularity {
    Year,
    YearMonth,
    Full,
}

impl DateGranularity {
    /// Granularity implied by a separator count (0, 1 or 2).
    pub fn from_separator_count(count: usize) -> Option<Self> {
        match count {
            0 => Some(DateGranularity::Year),
            1 => Some(DateGranularity::YearMonth),
            2 => Some(DateGranularity::Full),
            _ => None,
        }
    }

    pub fn display_format(self) -> &'static str {
        match self {
            DateGranularity::Year => "YYYY",
            DateGranularity::YearMonth => "MM/YYYY",
            DateGranularity::Full => "DD/MM/YYYY",
        }
    }

    pub fn fhir_format(self) -> &'static str {
        match self {
            DateGranularity::Year => "YYYY",
            DateGranularity::YearMonth => "YYYY-MM",
            DateGranularity::Full => "YYYY-MM-DD",
        }
    }
}

/// A FHIR date prepared for a text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayDate {
    pub display_date: String,
    /// The stored value could not be read at its granularity and is shown as-is.
    pub parse_failed: bool,
}

/// How month segments of display input may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonthStyle {
    Numeric,
    NumericOrName,
}

/// Segments of a display date, matched by shape only.
///
/// Day and month are one or two digits, the year exactly four. Ranges are
/// left to the segment validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DisplayParts<'a> {
    pub day: Option<&'a str>,
    pub month: Option<&'a str>,
    pub year: &'a str,
}

impl DisplayParts<'_> {
    /// Month as a number, accepting an abbreviated name such as `Mar`.
    fn month_number(&self) -> Option<u32> {
        let month = self.month?;
        numeric(month).or_else(|| month_from_name(month))
    }
}

fn is_digits(segment: &str, lengths: &[usize]) -> bool {
    lengths.contains(&segment.len()) && segment.bytes().all(|b| b.is_ascii_digit())
}

fn month_matches(segment: &str, style: MonthStyle) -> bool {
    is_digits(segment, &[1, 2])
        || (style == MonthStyle::NumericOrName && month_from_name(segment).is_some())
}

/// Match display input against the pattern of `granularity`.
pub(crate) fn split_display(
    input: &str,
    granularity: DateGranularity,
    style: MonthStyle,
) -> Option<DisplayParts<'_>> {
    let segments: Vec<&str> = input.split(DISPLAY_SEPARATOR).collect();
    let parts = match (granularity, segments.as_slice()) {
        (DateGranularity::Year, &[year]) => DisplayParts {
            day: None,
            month: None,
            year,
        },
        (DateGranularity::YearMonth, &[month, year]) => DisplayParts {
            day: None,
            month: Some(month),
            year,
        },
        (DateGranularity::Full, &[day, month, year]) => DisplayParts {
            day: Some(day),
            month: Some(month),
            year,
        },
        _ => return None,
    };

    if !is_digits(parts.year, &[4]) {
        return None;
    }
    if let Some(month) = parts.month {
        if !month_matches(month, style) {
            return None;
        }
    }
    if let Some(day) = parts.day {
        if !is_digits(day, &[1, 2]) {
            return None;
        }
    }
    Some(parts)
}

/// Calendar date of a full display date, if that day exists.
pub(crate) fn display_parts_to_date(parts: &DisplayParts<'_>) -> Option<NaiveDate> {
    let year = numeric(parts.year)? as i32;
    let month = parts.month_number()?;
    let day = numeric(parts.day?)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_fhir_date(wire: &str, granularity: DateGranularity) -> Option<String> {
    let segments: Vec<&str> = wire.split(FHIR_SEPARATOR).collect();
    match (granularity, segments.as_slice()) {
        (DateGranularity::Year, [year]) if is_digits(year, &[4]) => Some((*year).to_string()),
        (DateGranularity::YearMonth, [year, month])
            if is_digits(year, &[4]) && is_digits(month, &[2]) =>
        {
            let m = numeric(month)?;
            (1..=12).contains(&m).then(|| format!("{month}/{year}"))
        }
        (DateGranularity::Full, [year, month, day])
            if is_digits(year, &[4]) && is_digits(month, &[2]) && is_digits(day, &[2]) =>
        {
            let date =
                NaiveDate::from_ymd_opt(numeric(year)? as i32, numeric(month)?, numeric(day)?)?;
            Some(date.format("%d/%m/%Y").to_string())
        }
        _ => None,
    }
}

/// FHIR `date` to display text.
///
/// The stored value is returned unchanged with `parse_failed` set when it does
/// not match the granularity its separators imply.
pub fn parse_fhir_date_to_display_date(fhir_date: &str) -> DisplayDate {
    if fhir_date.is_empty() {
        return DisplayDate::default();
    }

    let parsed = DateGranularity::from_separator_count(count_separators(fhir_date, FHIR_SEPARATOR))
        .and_then(|granularity| parse_fhir_date(fhir_date, granularity));

    match parsed {
        Some(display_date) => DisplayDate {
            display_date,
            parse_failed: false,
        },
        None => {
            tracing::debug!(fhir_date, "stored date does not match its granularity");
            DisplayDate {
                display_date: fhir_date.to_string(),
                parse_failed: true,
            }
        }
    }
}

/// Display text to FHIR `date`.
///
/// Falls back to reading the raw text as an ISO date, an RFC 3339 date-time or
/// a `DD MMM YYYY` label, which always yields a full `YYYY-MM-DD`.
pub fn parse_input_date_to_fhir_date(display_date: &str) -> Result<String> {
    let granularity =
        DateGranularity::from_separator_count(count_separators(display_date, DISPLAY_SEPARATOR));

    match granularity {
        Some(DateGranularity::Full) => {
            let parts =
                split_display(display_date, DateGranularity::Full, MonthStyle::NumericOrName);
            if let Some(date) = parts.as_ref().and_then(display_parts_to_date) {
                return Ok(date.format("%Y-%m-%d").to_string());
            }
        }
        Some(DateGranularity::YearMonth) => {
            if let Some(parts) =
                split_display(display_date, DateGranularity::YearMonth, MonthStyle::NumericOrName)
            {
                if let Some(month) = parts.month_number().filter(|m| (1..=12).contains(m)) {
                    return Ok(format!("{}-{month:02}", parts.year));
                }
            }
        }
        Some(DateGranularity::Year) if display_date.len() == 4 => {
            if split_display(display_date, DateGranularity::Year, MonthStyle::Numeric).is_some() {
                return Ok(display_date.to_string());
            }
        }
        _ => {}
    }

    parse_generic_date(display_date)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| Error::InvalidDate(display_date.to_string()))
}

fn parse_generic_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(input, "%d %b %Y").ok())
}
