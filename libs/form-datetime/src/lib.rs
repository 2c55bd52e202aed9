//! Date and time input handling for FHIR Questionnaire forms
//!
//! Form fields accept dates and times as free text in a display format and
//! store them as FHIR `date` / `dateTime` values:
//!
//! ```text
//! display            wire (FHIR)
//! YYYY          <->  YYYY
//! MM/YYYY       <->  YYYY-MM
//! DD/MM/YYYY    <->  YYYY-MM-DD
//! HH:MM + AM|PM  ->  YYYY-MM-DDTHH:mm:ss+hh:mm
//! ```
//!
//! Validation is reported as values (`Option<Feedback>`) so it can run on
//! every keystroke; only conversions of already-validated input return
//! [`Result`].
//!
//! [`field`] ties the pieces together as explicit state transitions for a
//! date item and a date-time item.

#![forbid(unsafe_code)]

pub mod calculated;
pub mod date;
pub mod error;
pub mod field;
pub mod options;
pub mod segments;
pub mod time;
pub mod validation;

pub use calculated::{
    resolve_calculated_update, CalculatedExpression, CalculatedUpdate, UpdateHighlight,
};
pub use date::{
    parse_fhir_date_to_display_date, parse_input_date_to_fhir_date, DateGranularity, DisplayDate,
};
pub use error::{Error, Result};
pub use field::{AnswerValue, DateField, DateTimeField, FieldUpdate};
pub use options::{
    date_option_label, parse_input_to_date_options, replace_month_name_with_number,
    selected_date_format, DateOptions,
};
pub use segments::{
    count_separators, get_time_segments, validate_hour_segment, validate_minute_segment,
    validate_three_matches, validate_two_matches, HourNotation,
};
pub use time::{
    fhir_date_time_offset, parse_date_time_to_display_time,
    parse_input_date_time_to_fhir_date_time, DisplayTime, Period,
};
pub use validation::{
    date_input_is_valid, date_required_feedback, validate_date_input, validate_time_input,
    validate_time_segments, DateFeedback, TimeFeedback, TimeSegments, TimeValidation,
};
