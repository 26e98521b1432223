use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use crate::error::BookingError;
use crate::models::time_slot::TimeSlot;

/// Field values of one booking form, exactly as the patient entered them.
///
/// Text fields keep surrounding whitespace; it is trimmed when validating
/// and when building the webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub full_name: String,
    pub mobile_number: String,
    pub email: String,
    pub appointment_date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
}

impl FormState {
    /// Every text field is non-blank and both a date and a slot are chosen.
    pub fn is_submittable(&self) -> bool {
        !self.full_name.trim().is_empty()
            && !self.mobile_number.trim().is_empty()
            && !self.email.trim().is_empty()
            && self.appointment_date.is_some()
            && self.time_slot.is_some()
    }

    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::FullName(value) => self.full_name = value,
            FieldUpdate::MobileNumber(value) => self.mobile_number = value,
            FieldUpdate::Email(value) => self.email = value,
            FieldUpdate::AppointmentDate(value) => self.appointment_date = value,
            FieldUpdate::TimeSlot(value) => self.time_slot = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FullName,
    MobileNumber,
    Email,
    AppointmentDate,
    TimeSlot,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            FormField::FullName => "fullName",
            FormField::MobileNumber => "mobileNumber",
            FormField::Email => "email",
            FormField::AppointmentDate => "appointmentDate",
            FormField::TimeSlot => "timeSlot",
        }
    }
}

impl FromStr for FormField {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullName" | "full_name" => Ok(FormField::FullName),
            "mobileNumber" | "mobile_number" => Ok(FormField::MobileNumber),
            "email" => Ok(FormField::Email),
            "appointmentDate" | "appointment_date" => Ok(FormField::AppointmentDate),
            "timeSlot" | "time_slot" => Ok(FormField::TimeSlot),
            other => Err(BookingError::UnknownField(other.to_string())),
        }
    }
}

/// A new value for a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FullName(String),
    MobileNumber(String),
    Email(String),
    AppointmentDate(Option<NaiveDate>),
    TimeSlot(Option<TimeSlot>),
}

impl FieldUpdate {
    /// Build an update from a field name and its raw input value.
    ///
    /// Dates use `YYYY-MM-DD` and slots their display label. A blank value
    /// clears the date or slot selection.
    pub fn parse(field: &str, value: &str) -> Result<Self, BookingError> {
        let field = field.parse::<FormField>()?;
        let update = match field {
            FormField::FullName => FieldUpdate::FullName(value.to_string()),
            FormField::MobileNumber => FieldUpdate::MobileNumber(value.to_string()),
            FormField::Email => FieldUpdate::Email(value.to_string()),
            FormField::AppointmentDate if value.trim().is_empty() => {
                FieldUpdate::AppointmentDate(None)
            }
            FormField::AppointmentDate => {
                let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                    BookingError::InvalidValue {
                        field: field.name().to_string(),
                        value: value.to_string(),
                    }
                })?;
                FieldUpdate::AppointmentDate(Some(date))
            }
            FormField::TimeSlot if value.trim().is_empty() => FieldUpdate::TimeSlot(None),
            FormField::TimeSlot => FieldUpdate::TimeSlot(Some(value.parse()?)),
        };
        Ok(update)
    }

    pub fn field(&self) -> FormField {
        match self {
            FieldUpdate::FullName(_) => FormField::FullName,
            FieldUpdate::MobileNumber(_) => FormField::MobileNumber,
            FieldUpdate::Email(_) => FormField::Email,
            FieldUpdate::AppointmentDate(_) => FormField::AppointmentDate,
            FieldUpdate::TimeSlot(_) => FormField::TimeSlot,
        }
    }
}
