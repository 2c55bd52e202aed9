//! Conversion between FHIR `dateTime` values and `HH:MM` + AM/PM time inputs.

use std::fmt;

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::segments::{get_time_segments, numeric};

/// AM/PM designator of a 12-hour time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    /// `AM` or `PM` in any case; anything else, including empty input, is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("AM") {
            Some(Period::Am)
        } else if input.eq_ignore_ascii_case("PM") {
            Some(Period::Pm)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }

    /// Period of a 24-hour clock hour.
    pub fn of_hour(hour: u32) -> Self {
        if hour >= 12 {
            Period::Pm
        } else {
            Period::Am
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A FHIR date-time prepared for the time input and period selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTime {
    /// `HH:MM` on the 24-hour clock.
    pub display_time: String,
    pub display_period: Option<Period>,
    pub parse_failed: bool,
}

/// Time of day of a FHIR `dateTime`, in the value's own offset.
fn parse_fhir_date_time_time(fhir_date_time: &str) -> Option<NaiveTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(fhir_date_time) {
        return Some(dt.time());
    }
    NaiveDateTime::parse_from_str(fhir_date_time, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(fhir_date_time, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|dt| dt.time())
}

/// Offset carried by a FHIR `dateTime`, if it has one.
pub fn fhir_date_time_offset(fhir_date_time: &str) -> Option<FixedOffset> {
    DateTime::parse_from_rfc3339(fhir_date_time)
        .ok()
        .map(|dt| *dt.offset())
}

/// FHIR `dateTime` to display time.
///
/// `None` means the stored answer carries no time. A value that is present but
/// unreadable yields empty inputs with `parse_failed` set.
pub fn parse_date_time_to_display_time(fhir_date_time: Option<&str>) -> DisplayTime {
    let Some(fhir_date_time) = fhir_date_time else {
        return DisplayTime::default();
    };

    match parse_fhir_date_time_time(fhir_date_time) {
        Some(time) => DisplayTime {
            display_time: time.format("%H:%M").to_string(),
            display_period: Some(Period::of_hour(time.hour())),
            parse_failed: false,
        },
        None => {
            tracing::debug!(fhir_date_time, "stored dateTime could not be read");
            DisplayTime {
                parse_failed: true,
                ..DisplayTime::default()
            }
        }
    }
}

/// Compose a FHIR `dateTime` from a FHIR `date` and a time input.
///
/// In 24-hour notation the hour is used as typed and the period is ignored.
/// Otherwise the hour is read on the 12-hour clock (`12` is the start of the
/// period) and a period is required.
pub fn parse_input_date_time_to_fhir_date_time(
    fhir_date: &str,
    time_input: &str,
    period: Option<Period>,
    is_24_hour_notation: bool,
    offset: &FixedOffset,
) -> Result<String> {
    let invalid = || Error::InvalidDateTime {
        date: fhir_date.to_string(),
        time: time_input.to_string(),
    };

    let date = NaiveDate::parse_from_str(fhir_date, "%Y-%m-%d").map_err(|_| invalid())?;
    let (hour, minute) = get_time_segments(time_input).ok_or_else(invalid)?;
    let hour = numeric(hour).filter(|h| *h <= 23).ok_or_else(invalid)?;
    let minute = numeric(minute).filter(|m| *m <= 59).ok_or_else(invalid)?;

    let hour = if is_24_hour_notation {
        hour
    } else {
        match period.ok_or_else(invalid)? {
            Period::Am => hour % 12,
            Period::Pm => hour % 12 + 12,
        }
    };

    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;
    let local = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(invalid)?;

    Ok(local.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

/// Parse a UTC offset: `Z`, `+HH:MM`, `-HH:MM` or `+HHMM`.
pub fn parse_utc_offset(input: &str) -> Option<FixedOffset> {
    let tz = input.trim();
    if !tz.is_ascii() {
        return None;
    }
    if tz == "Z" {
        return FixedOffset::east_opt(0);
    }

    let sign = match tz.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits = &tz[1..];
    let (hours, minutes) = match digits.len() {
        5 if digits.as_bytes()[2] == b':' => (&digits[0..2], &digits[3..5]),
        4 => (&digits[0..2], &digits[2..4]),
        _ => return None,
    };
    let hours = numeric(hours)? as i32;
    let minutes = numeric(minutes)? as i32;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Offset of the local time zone right now.
pub fn local_offset() -> FixedOffset {
    *Local::now().offset()
}
