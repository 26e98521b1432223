use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{RawResponse, TransportError, WebhookTransport};
use crate::error::BookingError;
use crate::models::form::{FieldUpdate, FormState};
use crate::models::outcome::SubmissionOutcome;
use crate::services::protocol::SubmissionProtocol;

/// Request prepared by `begin_submission`, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub endpoint: String,
    pub payload: Value,
}

/// State of one booking form: its fields, whether a request is in flight,
/// and the outcome of the latest attempt.
#[derive(Debug, Clone)]
pub struct BookingFormController {
    protocol: SubmissionProtocol,
    endpoint: String,
    form: FormState,
    submitting: bool,
    outcome: Option<SubmissionOutcome>,
}

impl BookingFormController {
    pub fn new(protocol: SubmissionProtocol, endpoint: impl Into<String>) -> Self {
        Self {
            protocol,
            endpoint: endpoint.into(),
            form: FormState::default(),
            submitting: false,
            outcome: None,
        }
    }

    pub fn protocol(&self) -> SubmissionProtocol {
        self.protocol
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn outcome(&self) -> Option<&SubmissionOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_submittable(&self) -> bool {
        self.form.is_submittable()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.is_submittable() && !self.submitting
    }

    pub fn update_field(&mut self, update: FieldUpdate) {
        let field = update.field();
        self.form.apply(update);
        debug!(
            "Updated field {}, form submittable: {}",
            field.name(),
            self.is_submittable()
        );
    }

    /// Mark the form as submitting and build the webhook request.
    ///
    /// Clears the previous outcome. Every successful call must be followed
    /// by exactly one `complete_submission`.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, BookingError> {
        if self.submitting {
            warn!("Ignoring booking submission while another is in flight");
            return Err(BookingError::SubmissionInProgress);
        }
        if !self.is_submittable() {
            return Err(BookingError::NotSubmittable);
        }

        self.submitting = true;
        self.outcome = None;
        info!("Submitting booking with {} protocol", self.protocol);

        Ok(PendingSubmission {
            endpoint: self.endpoint.clone(),
            payload: self.protocol.payload(&self.form),
        })
    }

    /// Apply the result of the request started by `begin_submission`.
    pub fn complete_submission(
        &mut self,
        result: Result<RawResponse, TransportError>,
    ) -> SubmissionOutcome {
        if !self.submitting {
            warn!("Booking result arrived with no submission in flight");
        }

        let outcome = match result {
            Ok(response) => self.protocol.interpret(&response).into_outcome(),
            Err(err) => {
                warn!("Booking submission failed: {}", err);
                SubmissionOutcome::connectivity_error()
            }
        };

        if outcome.is_success() {
            self.form.clear();
        }
        info!("Booking submission finished with {} outcome", outcome.kind());

        self.outcome = Some(outcome.clone());
        self.submitting = false;
        outcome
    }

    /// Submit the form through `transport` and wait for the outcome.
    pub async fn submit<T>(&mut self, transport: &T) -> Result<SubmissionOutcome, BookingError>
    where
        T: WebhookTransport + ?Sized,
    {
        let pending = self.begin_submission()?;
        let result = transport
            .post_json(&pending.endpoint, &pending.payload)
            .await;
        Ok(self.complete_submission(result))
    }
}
