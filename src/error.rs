use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while editing or submitting a booking form.
///
/// Webhook failures are not errors: they become a `SubmissionOutcome::Error`
/// shown to the patient. These cover requests the form refuses outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("All fields must be filled in before booking")]
    NotSubmittable,

    #[error("A booking request is already in progress")]
    SubmissionInProgress,

    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Date {0} is not available for booking")]
    DateNotSelectable(NaiveDate),

    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Too many booking forms are open, try again later")]
    TooManyOpenForms,
}
