//! Values pushed into a field by calculated expressions.
//!
//! Expressions are evaluated elsewhere; this module only decides whether a
//! computed value should replace the field's answer, and for how long the
//! field stays highlighted afterwards.

use std::time::{Duration, Instant};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How long a field stays highlighted after a calculated update.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(500);

/// Where a calculated expression is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculatedSource {
    /// On the item itself; the only source that writes the item's answer.
    Item,
    #[serde(other)]
    Other,
}

/// A calculated expression and its latest result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedExpression {
    pub from: CalculatedSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// `None` when the expression has not produced a value yet;
    /// `Some(Value::Null)` when it evaluated to nothing.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Change a calculated value asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculatedUpdate {
    Set(String),
    Clear,
}

/// Decide whether the first item-level expression changes the current FHIR value.
///
/// Strings replace a different current value, including with an empty string.
/// An explicit `null` clears a non-empty value. Other JSON types are ignored.
pub fn resolve_calculated_update(
    expressions: &[CalculatedExpression],
    current: &str,
) -> Option<CalculatedUpdate> {
    let expression = expressions
        .iter()
        .find(|e| e.from == CalculatedSource::Item)?;

    match expression.value.as_ref()? {
        Value::String(value) if value != current => Some(CalculatedUpdate::Set(value.clone())),
        Value::Null if !current.is_empty() => Some(CalculatedUpdate::Clear),
        _ => None,
    }
}

/// Highlight shown after a calculated update, as an explicit deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateHighlight {
    until: Option<Instant>,
}

impl UpdateHighlight {
    pub fn start(&mut self, now: Instant) {
        self.until = Some(now + HIGHLIGHT_DURATION);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}
