use serde::Serialize;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Your appointment has been booked successfully.";
pub const DEFAULT_CONFLICT_MESSAGE: &str =
    "The selected time slot is no longer available. Please choose another slot.";
pub const DEFAULT_ERROR_MESSAGE: &str = "Unable to process your request. Please try again.";
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "Unable to connect to the server. Please check your connection and try again.";

/// Result of one booking attempt, as shown to the patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        appointment_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        slot: Option<String>,
    },
    Conflict {
        message: String,
        suggested_slots: Vec<String>,
    },
    Error {
        message: String,
    },
}

impl SubmissionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        SubmissionOutcome::Success {
            message: message.into(),
            appointment_id: None,
            date: None,
            slot: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SubmissionOutcome::Error {
            message: message.into(),
        }
    }

    /// The webhook could not be reached at all.
    pub fn connectivity_error() -> Self {
        Self::error(CONNECTIVITY_ERROR_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Success { message, .. }
            | SubmissionOutcome::Conflict { message, .. }
            | SubmissionOutcome::Error { message } => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionOutcome::Success { .. } => "success",
            SubmissionOutcome::Conflict { .. } => "conflict",
            SubmissionOutcome::Error { .. } => "error",
        }
    }
}

/// What a protocol made of a webhook reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// The body was understood and maps to an outcome directly.
    Recognized(SubmissionOutcome),
    /// The body was not JSON; only the raw text and HTTP status are known.
    UnrecognizedFallback { raw_text: String, http_ok: bool },
}

impl ParsedResponse {
    pub fn into_outcome(self) -> SubmissionOutcome {
        match self {
            ParsedResponse::Recognized(outcome) => outcome,
            ParsedResponse::UnrecognizedFallback { raw_text, http_ok } => {
                // The text is shown as received; only a blank body falls back.
                let blank = raw_text.trim().is_empty();
                match (http_ok, blank) {
                    (true, false) => SubmissionOutcome::success(raw_text),
                    (true, true) => SubmissionOutcome::success(DEFAULT_SUCCESS_MESSAGE),
                    (false, false) => SubmissionOutcome::error(raw_text),
                    (false, true) => SubmissionOutcome::error(DEFAULT_ERROR_MESSAGE),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_resolution() {
        let ok_text = ParsedResponse::UnrecognizedFallback {
            raw_text: "Booked!".to_string(),
            http_ok: true,
        };
        assert_eq!(ok_text.into_outcome(), SubmissionOutcome::success("Booked!"));

        let ok_empty = ParsedResponse::UnrecognizedFallback {
            raw_text: String::new(),
            http_ok: true,
        };
        assert_eq!(
            ok_empty.into_outcome(),
            SubmissionOutcome::success(DEFAULT_SUCCESS_MESSAGE)
        );

        let failed_text = ParsedResponse::UnrecognizedFallback {
            raw_text: "Server error".to_string(),
            http_ok: false,
        };
        assert_eq!(
            failed_text.into_outcome(),
            SubmissionOutcome::error("Server error")
        );

        let padded = ParsedResponse::UnrecognizedFallback {
            raw_text: "  Server error\n".to_string(),
            http_ok: false,
        };
        assert_eq!(
            padded.into_outcome(),
            SubmissionOutcome::error("  Server error\n")
        );

        let failed_empty = ParsedResponse::UnrecognizedFallback {
            raw_text: "  ".to_string(),
            http_ok: false,
        };
        assert_eq!(
            failed_empty.into_outcome(),
            SubmissionOutcome::error(DEFAULT_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = SubmissionOutcome::Success {
            message: "ok".to_string(),
            appointment_id: Some("A1".to_string()),
            date: Some("2024-01-01".to_string()),
            slot: None,
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "status": "success",
                "message": "ok",
                "appointment_id": "A1",
                "date": "2024-01-01"
            })
        );

        let conflict = SubmissionOutcome::Conflict {
            message: "Slot taken".to_string(),
            suggested_slots: vec![],
        };
        assert_eq!(
            serde_json::to_value(&conflict).unwrap(),
            json!({ "status": "conflict", "message": "Slot taken", "suggested_slots": [] })
        );
    }
}
