//! Subcommand implementations
//!
//! Every command produces a [`Report`]; `main` decides whether to print it as
//! text or JSON and maps it to an exit status.

use chrono::FixedOffset;
use serde::Serialize;

use ferrum_form_datetime::{
    date_option_label, parse_date_time_to_display_time, parse_fhir_date_to_display_date,
    parse_input_date_to_fhir_date, parse_input_to_date_options, validate_date_input,
    validate_time_input, DateFeedback, DateTimeField, FieldUpdate, Period, TimeFeedback,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeedbackCode {
    Date(DateFeedback),
    Time(TimeFeedback),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub code: FeedbackCode,
    pub message: &'static str,
}

impl From<DateFeedback> for Feedback {
    fn from(feedback: DateFeedback) -> Self {
        Self {
            code: FeedbackCode::Date(feedback),
            message: feedback.message(),
        }
    }
}

impl From<TimeFeedback> for Feedback {
    fn from(feedback: TimeFeedback) -> Self {
        Self {
            code: FeedbackCode::Time(feedback),
            message: feedback.message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub value: String,
    pub label: String,
}

/// Result of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_24_hour_notation: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.feedback.is_none() && self.error.is_none()
    }

    pub fn to_text(&self) -> String {
        if let Some(feedback) = &self.feedback {
            return feedback.message.to_string();
        }
        if let Some(error) = &self.error {
            return error.clone();
        }
        if !self.suggestions.is_empty() {
            return self
                .suggestions
                .iter()
                .map(|s| format!("{}\t{}", s.value, s.label))
                .collect::<Vec<_>>()
                .join("\n");
        }
        match (&self.value, self.period) {
            (Some(value), Some(period)) => format!("{value} {period}"),
            (Some(value), None) => value.clone(),
            _ => "ok".to_string(),
        }
    }
}

pub fn validate_date(input: &str, parse_failed: bool) -> Report {
    let mut report = Report::new(input);
    report.feedback = validate_date_input(input, parse_failed).map(Feedback::from);
    if report.feedback.is_none() && !input.is_empty() {
        report.value = parse_input_date_to_fhir_date(input).ok();
    }
    report
}

pub fn validate_time(input: &str, period: Option<Period>) -> Report {
    let validation = validate_time_input(input, period, false);
    Report {
        is_24_hour_notation: Some(validation.is_24_hour_notation),
        feedback: validation.feedback.map(Feedback::from),
        ..Report::new(input)
    }
}

pub fn to_fhir_date(input: &str) -> Report {
    let mut report = Report::new(input);
    match parse_input_date_to_fhir_date(input) {
        Ok(value) => report.value = Some(value),
        Err(err) => report.error = Some(err.to_string()),
    }
    report
}

pub fn to_display_date(fhir_date: &str) -> Report {
    let display = parse_fhir_date_to_display_date(fhir_date);
    let mut report = Report::new(fhir_date);
    if display.parse_failed {
        report.error = Some(format!("Stored date '{fhir_date}' could not be read"));
    } else {
        report.value = Some(display.display_date);
    }
    report
}

/// Compose a FHIR `dateTime` the way a date-time item does.
pub fn to_fhir_date_time(
    date: &str,
    time: &str,
    period: Option<Period>,
    offset: FixedOffset,
) -> Report {
    let mut field = DateTimeField::new(None, offset);
    field.on_time_input(time, period);
    let update = field.on_date_input(date);

    let mut report = Report::new(format!("{date} {time}"));
    match update {
        FieldUpdate::Answer(answer) => report.value = Some(answer.as_str().to_string()),
        FieldUpdate::Cleared | FieldUpdate::Unchanged => {
            report.feedback = field
                .date_feedback()
                .map(Feedback::from)
                .or_else(|| field.time_validation().feedback.map(Feedback::from));
            if report.feedback.is_none() {
                report.error = Some(format!(
                    "Could not compose a date-time from '{date}' and '{time}'"
                ));
            }
        }
    }
    report
}

pub fn to_display_time(fhir_date_time: &str) -> Report {
    let display = parse_date_time_to_display_time(Some(fhir_date_time));
    let mut report = Report::new(fhir_date_time);
    if display.parse_failed {
        report.error = Some(format!("Stored date-time '{fhir_date_time}' could not be read"));
    } else {
        report.value = Some(display.display_time);
        report.period = display.display_period;
    }
    report
}

pub fn suggest(input: &str, current_year: i32) -> Report {
    let options = parse_input_to_date_options(input, current_year);
    let mut report = Report::new(input);
    report.suggestions = options
        .options
        .iter()
        .map(|option| Suggestion {
            value: option.clone(),
            label: date_option_label(option, options.separator),
        })
        .collect();
    tracing::debug!(input, count = report.suggestions.len(), "suggestions computed");
    report
}
