//! State of date and date-time form items.
//!
//! A field owns the raw text the user typed, which may be invalid, alongside
//! the last committed FHIR value. Every event returns a [`FieldUpdate`] telling
//! the caller whether the stored answer changes.

use std::time::Instant;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculated::{
    resolve_calculated_update, CalculatedExpression, CalculatedUpdate, UpdateHighlight,
};
use crate::date::{parse_fhir_date_to_display_date, parse_input_date_to_fhir_date, DisplayDate};
use crate::error::{Error, Result};
use crate::time::{
    fhir_date_time_offset, parse_date_time_to_display_time,
    parse_input_date_time_to_fhir_date_time, DisplayTime, Period,
};
use crate::validation::{
    date_input_is_valid, date_required_feedback, validate_date_input, validate_time_input,
    validate_time_segments, DateFeedback, TimeValidation,
};

/// A date or date-time answer as it appears in a QuestionnaireResponse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerValue {
    #[serde(rename = "valueDate")]
    Date(String),
    #[serde(rename = "valueDateTime")]
    DateTime(String),
}

impl AnswerValue {
    pub fn as_str(&self) -> &str {
        match self {
            AnswerValue::Date(value) | AnswerValue::DateTime(value) => value,
        }
    }

    /// Read `valueDate` or `valueDateTime` from an answer object, ignoring its
    /// other members. `valueDate` wins when both are present.
    pub fn from_answer_json(answer: &Value) -> Option<Self> {
        let object = answer.as_object()?;
        if let Some(value) = object.get("valueDate").and_then(Value::as_str) {
            return Some(AnswerValue::Date(value.to_string()));
        }
        object
            .get("valueDateTime")
            .and_then(Value::as_str)
            .map(|value| AnswerValue::DateTime(value.to_string()))
    }
}

/// Effect of a field event on the stored answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Unchanged,
    Cleared,
    Answer(AnswerValue),
}

fn date_part(wire: &str) -> &str {
    wire.split_once('T').map_or(wire, |(date, _)| date)
}

/// Options may be separated by `-` or a space; the input always uses `/`.
fn option_to_display(selected: &str) -> String {
    selected.replace(['-', ' '], "/")
}

/// A date-only item.
#[derive(Debug, Clone, Default)]
pub struct DateField {
    input: String,
    parse_failed: bool,
    value: Option<String>,
    highlight: UpdateHighlight,
}

impl DateField {
    pub fn new(answer: Option<&AnswerValue>) -> Self {
        let mut field = Self::default();
        field.load(answer.map(AnswerValue::as_str).unwrap_or_default());
        field
    }

    fn load(&mut self, wire: &str) {
        let DisplayDate {
            display_date,
            parse_failed,
        } = parse_fhir_date_to_display_date(date_part(wire));
        self.input = display_date;
        self.parse_failed = parse_failed;
        self.value = (!wire.is_empty()).then(|| wire.to_string());
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Last committed FHIR value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn feedback(&self) -> Option<DateFeedback> {
        validate_date_input(&self.input, self.parse_failed)
    }

    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight.is_active(now)
    }

    pub fn on_date_input(&mut self, input: &str) -> FieldUpdate {
        self.input = input.to_string();
        if input.is_empty() {
            return self.clear();
        }
        if !date_input_is_valid(input) {
            return FieldUpdate::Unchanged;
        }
        self.commit()
    }

    /// An autocomplete option was picked; it is committed without validation.
    pub fn on_select_date(&mut self, selected: &str) -> FieldUpdate {
        self.input = option_to_display(selected);
        self.commit()
    }

    pub fn apply_calculated(
        &mut self,
        expressions: &[CalculatedExpression],
        now: Instant,
    ) -> FieldUpdate {
        let current = self.value.clone().unwrap_or_default();
        match resolve_calculated_update(expressions, &current) {
            Some(CalculatedUpdate::Set(value)) => {
                self.highlight.start(now);
                self.load(&value);
                tracing::debug!(value = %value, "calculated date applied");
                if value.is_empty() {
                    FieldUpdate::Cleared
                } else {
                    FieldUpdate::Answer(AnswerValue::Date(value))
                }
            }
            Some(CalculatedUpdate::Clear) => {
                self.highlight.start(now);
                self.input.clear();
                self.clear()
            }
            None => FieldUpdate::Unchanged,
        }
    }

    fn commit(&mut self) -> FieldUpdate {
        match parse_input_date_to_fhir_date(&self.input) {
            Ok(value) => {
                tracing::debug!(value = %value, "date answer updated");
                self.parse_failed = false;
                self.value = Some(value.clone());
                FieldUpdate::Answer(AnswerValue::Date(value))
            }
            Err(err) => {
                tracing::debug!(error = %err, "date input not committed");
                FieldUpdate::Unchanged
            }
        }
    }

    fn clear(&mut self) -> FieldUpdate {
        self.parse_failed = false;
        self.value = None;
        FieldUpdate::Cleared
    }
}

/// A date-time item: a date input, an `HH:MM` time input and a period.
///
/// Answers are always written as `valueDateTime`, even when only the date is
/// filled in.
#[derive(Debug, Clone)]
pub struct DateTimeField {
    date_input: String,
    time_input: String,
    period: Option<Period>,
    date_parse_failed: bool,
    time_parse_failed: bool,
    value: Option<String>,
    offset: FixedOffset,
    /// Offset of the loaded answer; edits keep it so the instant stays put.
    stored_offset: Option<FixedOffset>,
    highlight: UpdateHighlight,
}

impl DateTimeField {
    /// `offset` is applied to composed values unless the loaded answer
    /// carries its own.
    pub fn new(answer: Option<&AnswerValue>, offset: FixedOffset) -> Self {
        let mut field = Self {
            date_input: String::new(),
            time_input: String::new(),
            period: None,
            date_parse_failed: false,
            time_parse_failed: false,
            value: None,
            offset,
            stored_offset: None,
            highlight: UpdateHighlight::default(),
        };
        field.load(answer.map(AnswerValue::as_str).unwrap_or_default());
        field
    }

    fn load(&mut self, wire: &str) {
        let DisplayDate {
            display_date,
            parse_failed,
        } = parse_fhir_date_to_display_date(date_part(wire));
        let DisplayTime {
            display_time,
            display_period,
            parse_failed: time_parse_failed,
        } = parse_date_time_to_display_time(wire.contains('T').then_some(wire));

        self.date_input = display_date;
        self.date_parse_failed = parse_failed;
        self.time_input = display_time;
        self.period = display_period;
        self.time_parse_failed = time_parse_failed;
        self.stored_offset = fhir_date_time_offset(wire);
        self.value = (!wire.is_empty()).then(|| wire.to_string());
    }

    pub fn date_input(&self) -> &str {
        &self.date_input
    }

    pub fn time_input(&self) -> &str {
        &self.time_input
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Date feedback, including the request for a date when only a valid time
    /// is set.
    pub fn date_feedback(&self) -> Option<DateFeedback> {
        let feedback = validate_date_input(&self.date_input, self.date_parse_failed);
        date_required_feedback(
            &self.date_input,
            &self.time_input,
            feedback,
            self.time_validation().feedback,
        )
    }

    pub fn time_validation(&self) -> TimeValidation {
        validate_time_input(&self.time_input, self.period, self.time_parse_failed)
    }

    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight.is_active(now)
    }

    /// Clearing the date clears the whole answer, time included.
    pub fn on_date_input(&mut self, input: &str) -> FieldUpdate {
        self.date_input = input.to_string();
        if input.is_empty() {
            return self.clear();
        }
        if !date_input_is_valid(input) {
            return FieldUpdate::Unchanged;
        }
        self.commit()
    }

    pub fn on_select_date(&mut self, selected: &str) -> FieldUpdate {
        self.date_input = option_to_display(selected);
        self.commit()
    }

    /// A new time and period. An empty time commits the date alone.
    pub fn on_time_input(&mut self, time_input: &str, period: Option<Period>) -> FieldUpdate {
        self.time_input = time_input.to_string();
        self.period = period;

        if time_input.is_empty() {
            self.period = None;
            return self.commit();
        }

        let segments = validate_time_segments(time_input);
        if !date_input_is_valid(&self.date_input) || !segments.time_is_valid {
            return FieldUpdate::Unchanged;
        }
        self.commit()
    }

    pub fn apply_calculated(
        &mut self,
        expressions: &[CalculatedExpression],
        now: Instant,
    ) -> FieldUpdate {
        let current = self.value.clone().unwrap_or_default();
        match resolve_calculated_update(expressions, &current) {
            Some(CalculatedUpdate::Set(value)) => {
                self.highlight.start(now);
                self.load(&value);
                tracing::debug!(value = %value, "calculated date-time applied");
                if value.is_empty() {
                    FieldUpdate::Cleared
                } else {
                    FieldUpdate::Answer(AnswerValue::DateTime(value))
                }
            }
            Some(CalculatedUpdate::Clear) => {
                self.highlight.start(now);
                self.load("");
                FieldUpdate::Cleared
            }
            None => FieldUpdate::Unchanged,
        }
    }

    fn compose(&self) -> Result<String> {
        let fhir_date = parse_input_date_to_fhir_date(&self.date_input)?;
        if self.time_input.is_empty() {
            return Ok(fhir_date);
        }
        let time = self.time_validation();
        if time.feedback.is_some() {
            return Err(Error::InvalidDateTime {
                date: fhir_date,
                time: self.time_input.clone(),
            });
        }
        parse_input_date_time_to_fhir_date_time(
            &fhir_date,
            &self.time_input,
            self.period,
            time.is_24_hour_notation,
            &self.stored_offset.unwrap_or(self.offset),
        )
    }

    fn commit(&mut self) -> FieldUpdate {
        match self.compose() {
            Ok(value) => {
                tracing::debug!(value = %value, "date-time answer updated");
                self.date_parse_failed = false;
                self.time_parse_failed = false;
                self.value = Some(value.clone());
                FieldUpdate::Answer(AnswerValue::DateTime(value))
            }
            Err(err) => {
                tracing::debug!(error = %err, "date-time input not committed");
                FieldUpdate::Unchanged
            }
        }
    }

    fn clear(&mut self) -> FieldUpdate {
        self.date_parse_failed = false;
        self.time_parse_failed = false;
        self.stored_offset = None;
        self.value = None;
        FieldUpdate::Cleared
    }
}
