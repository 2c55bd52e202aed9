//! Error types for date/time conversion

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion failures.
///
/// Input validation never produces these; it reports feedback values instead.
/// An `Error` means a value that passed validation could still not be turned
/// into a FHIR wire value, so the caller must leave the stored answer alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    #[error("Invalid date-time: '{date} {time}'")]
    InvalidDateTime { date: String, time: String },
}
