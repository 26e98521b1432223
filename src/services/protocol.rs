use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::client::RawResponse;
use crate::models::form::FormState;
use crate::models::outcome::{
    ParsedResponse, SubmissionOutcome, DEFAULT_CONFLICT_MESSAGE, DEFAULT_ERROR_MESSAGE,
    DEFAULT_SUCCESS_MESSAGE,
};

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire contract spoken with the booking webhook.
///
/// `Rich` sends `{name, phone, email, date, slot}` and reads a body-level
/// `status` that can report a conflict with suggested slots. `Simple` sends
/// `{fullName, mobileNumber, email, appointmentDate, timeSlot}` and decides
/// between success and error by HTTP status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionProtocol {
    #[default]
    Rich,
    Simple,
}

// Reply fields are read one by one so a mistyped side field never hides the status
fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

// Appointment ids arrive as either JSON strings or numbers
fn id_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn slot_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|slots| {
            slots
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// Server messages count only when they say something
fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

impl SubmissionProtocol {
    pub fn name(self) -> &'static str {
        match self {
            SubmissionProtocol::Rich => "rich",
            SubmissionProtocol::Simple => "simple",
        }
    }

    /// Serialize the form with this protocol's field names.
    pub fn payload(self, form: &FormState) -> Value {
        let date = form
            .appointment_date
            .map(|d| d.format(WIRE_DATE_FORMAT).to_string())
            .unwrap_or_default();
        let slot = form.time_slot.map(|s| s.label()).unwrap_or_default();

        match self {
            SubmissionProtocol::Rich => json!({
                "name": form.full_name.trim(),
                "phone": form.mobile_number.trim(),
                "email": form.email.trim(),
                "date": date,
                "slot": slot,
            }),
            SubmissionProtocol::Simple => json!({
                "fullName": form.full_name.trim(),
                "mobileNumber": form.mobile_number.trim(),
                "email": form.email.trim(),
                "appointmentDate": date,
                "timeSlot": slot,
            }),
        }
    }

    /// Classify a webhook reply. Bodies that are not JSON are handed back
    /// as `UnrecognizedFallback` for the caller to resolve.
    pub fn interpret(self, response: &RawResponse) -> ParsedResponse {
        let http_ok = response.is_success();
        let value: Value = match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(_) => {
                debug!(
                    "Webhook reply with status {} is not JSON, using text fallback",
                    response.status
                );
                return ParsedResponse::UnrecognizedFallback {
                    raw_text: response.body.clone(),
                    http_ok,
                };
            }
        };

        let outcome = match self {
            SubmissionProtocol::Rich => interpret_rich(value, http_ok),
            SubmissionProtocol::Simple => interpret_simple(value, http_ok),
        };
        ParsedResponse::Recognized(outcome)
    }
}

fn interpret_rich(value: Value, http_ok: bool) -> SubmissionOutcome {
    let message = non_blank(text_field(&value, "message"));

    // A conflict is reported whatever the HTTP status, so a 409 still carries
    // its suggestions; success needs a 2xx.
    match value.get("status").and_then(Value::as_str) {
        Some("success") if http_ok => SubmissionOutcome::Success {
            message: message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            appointment_id: id_field(&value, "appointment_id"),
            date: text_field(&value, "date"),
            slot: text_field(&value, "slot"),
        },
        Some("conflict") => SubmissionOutcome::Conflict {
            message: message.unwrap_or_else(|| DEFAULT_CONFLICT_MESSAGE.to_string()),
            suggested_slots: slot_list(&value, "suggested_slots"),
        },
        other => {
            match other {
                Some("success") => warn!("Webhook reported success with a non-2xx status"),
                None => warn!("Webhook reply carries no status field"),
                Some(_) => {}
            }
            SubmissionOutcome::error(message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()))
        }
    }
}

fn interpret_simple(value: Value, http_ok: bool) -> SubmissionOutcome {
    let message = non_blank(text_field(&value, "message"));

    if http_ok {
        SubmissionOutcome::success(message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()))
    } else {
        SubmissionOutcome::error(message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()))
    }
}

impl fmt::Display for SubmissionProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SubmissionProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rich" | "a" => Ok(SubmissionProtocol::Rich),
            "simple" | "b" => Ok(SubmissionProtocol::Simple),
            other => Err(format!("unknown submission protocol: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_slot::TimeSlot;
    use chrono::NaiveDate;

    fn form() -> FormState {
        FormState {
            full_name: "  Jane Doe ".to_string(),
            mobile_number: "0400000000".to_string(),
            email: " jane@example.com".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            time_slot: Some(TimeSlot::Nine),
        }
    }

    fn rich(status: u16, body: &str) -> SubmissionOutcome {
        SubmissionProtocol::Rich
            .interpret(&RawResponse::new(status, body))
            .into_outcome()
    }

    fn simple(status: u16, body: &str) -> SubmissionOutcome {
        SubmissionProtocol::Simple
            .interpret(&RawResponse::new(status, body))
            .into_outcome()
    }

    #[test]
    fn test_rich_payload() {
        assert_eq!(
            SubmissionProtocol::Rich.payload(&form()),
            json!({
                "name": "Jane Doe",
                "phone": "0400000000",
                "email": "jane@example.com",
                "date": "2024-01-01",
                "slot": "9:00 AM - 9:30 AM"
            })
        );
    }

    #[test]
    fn test_simple_payload() {
        assert_eq!(
            SubmissionProtocol::Simple.payload(&form()),
            json!({
                "fullName": "Jane Doe",
                "mobileNumber": "0400000000",
                "email": "jane@example.com",
                "appointmentDate": "2024-01-01",
                "timeSlot": "9:00 AM - 9:30 AM"
            })
        );
    }

    #[test]
    fn test_rich_success() {
        let outcome = rich(
            200,
            r#"{"status":"success","message":"ok","appointment_id":"A1","date":"2024-01-01","slot":"9:00 AM - 9:30 AM"}"#,
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                message: "ok".to_string(),
                appointment_id: Some("A1".to_string()),
                date: Some("2024-01-01".to_string()),
                slot: Some("9:00 AM - 9:30 AM".to_string()),
            }
        );
    }

    #[test]
    fn test_rich_numeric_appointment_id() {
        let outcome = rich(200, r#"{"status":"success","message":"ok","appointment_id":42}"#);
        match outcome {
            SubmissionOutcome::Success { appointment_id, .. } => {
                assert_eq!(appointment_id.as_deref(), Some("42"))
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_rich_success_without_message_uses_default() {
        assert_eq!(
            rich(200, r#"{"status":"success"}"#).message(),
            DEFAULT_SUCCESS_MESSAGE
        );
    }

    #[test]
    fn test_rich_conflict() {
        let outcome = rich(
            200,
            r#"{"status":"conflict","message":"Slot taken","suggested_slots":["10:00 AM - 10:30 AM"]}"#,
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Conflict {
                message: "Slot taken".to_string(),
                suggested_slots: vec!["10:00 AM - 10:30 AM".to_string()],
            }
        );
    }

    #[test]
    fn test_rich_conflict_reported_on_non_2xx_status() {
        assert_eq!(
            rich(409, r#"{"status":"conflict","message":"Slot taken"}"#),
            SubmissionOutcome::Conflict {
                message: "Slot taken".to_string(),
                suggested_slots: vec![],
            }
        );
    }

    #[test]
    fn test_rich_success_with_mistyped_side_fields() {
        let outcome = rich(
            200,
            r#"{"status":"success","message":"Booked","appointment_id":"A1","date":20240101}"#,
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                message: "Booked".to_string(),
                appointment_id: Some("A1".to_string()),
                date: None,
                slot: None,
            }
        );

        let outcome = rich(200, r#"{"status":"success","message":7,"slot":["x"]}"#);
        assert_eq!(outcome, SubmissionOutcome::success(DEFAULT_SUCCESS_MESSAGE));
    }

    #[test]
    fn test_rich_conflict_skips_non_string_suggestions() {
        assert_eq!(
            rich(
                200,
                r#"{"status":"conflict","message":"Slot taken","suggested_slots":[null,"3:00 PM - 3:30 PM",5]}"#,
            ),
            SubmissionOutcome::Conflict {
                message: "Slot taken".to_string(),
                suggested_slots: vec!["3:00 PM - 3:30 PM".to_string()],
            }
        );
        assert_eq!(
            rich(200, r#"{"status":"conflict","suggested_slots":"none"}"#),
            SubmissionOutcome::Conflict {
                message: DEFAULT_CONFLICT_MESSAGE.to_string(),
                suggested_slots: vec![],
            }
        );
    }

    #[test]
    fn test_rich_unknown_status_is_error() {
        assert_eq!(
            rich(200, r#"{"status":"rejected","message":"Clinic closed"}"#),
            SubmissionOutcome::error("Clinic closed")
        );
        assert_eq!(
            rich(200, r#"{"message":"hello"}"#),
            SubmissionOutcome::error("hello")
        );
        assert_eq!(
            rich(200, r#"{"status":"failed","message":""}"#),
            SubmissionOutcome::error(DEFAULT_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_rich_non_object_json_is_error() {
        assert_eq!(rich(200, "[1,2,3]"), SubmissionOutcome::error(DEFAULT_ERROR_MESSAGE));
        assert_eq!(rich(200, "42"), SubmissionOutcome::error(DEFAULT_ERROR_MESSAGE));
    }

    #[test]
    fn test_rich_success_on_server_error_is_error() {
        assert_eq!(
            rich(500, r#"{"status":"success","message":"ok"}"#),
            SubmissionOutcome::error("ok")
        );
    }

    #[test]
    fn test_rich_plain_text_fallback() {
        assert_eq!(
            SubmissionProtocol::Rich.interpret(&RawResponse::new(500, "Server error")),
            ParsedResponse::UnrecognizedFallback {
                raw_text: "Server error".to_string(),
                http_ok: false,
            }
        );
        assert_eq!(rich(500, "Server error"), SubmissionOutcome::error("Server error"));
        assert_eq!(rich(200, "Accepted"), SubmissionOutcome::success("Accepted"));
        assert_eq!(rich(200, ""), SubmissionOutcome::success(DEFAULT_SUCCESS_MESSAGE));
    }

    #[test]
    fn test_simple_uses_http_status() {
        assert_eq!(
            simple(201, r#"{"message":"See you soon"}"#),
            SubmissionOutcome::success("See you soon")
        );
        assert_eq!(simple(200, "{}"), SubmissionOutcome::success(DEFAULT_SUCCESS_MESSAGE));
        assert_eq!(
            simple(400, r#"{"message":"Invalid phone"}"#),
            SubmissionOutcome::error("Invalid phone")
        );
        assert_eq!(simple(503, "{}"), SubmissionOutcome::error(DEFAULT_ERROR_MESSAGE));
    }

    #[test]
    fn test_simple_ignores_status_field() {
        assert_eq!(
            simple(200, r#"{"status":"conflict","message":"Slot taken"}"#),
            SubmissionOutcome::success("Slot taken")
        );
    }

    #[test]
    fn test_parse_protocol_name() {
        assert_eq!("rich".parse::<SubmissionProtocol>(), Ok(SubmissionProtocol::Rich));
        assert_eq!("B".parse::<SubmissionProtocol>(), Ok(SubmissionProtocol::Simple));
        assert_eq!(" Simple ".parse::<SubmissionProtocol>(), Ok(SubmissionProtocol::Simple));
        assert!("soap".parse::<SubmissionProtocol>().is_err());
    }
}
