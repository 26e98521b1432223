use axum::{
    extract::{Json as ExtractJson, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::client::WebhookTransport;
use crate::error::BookingError;
use crate::models::common::{DatesQuery, FieldUpdateRequest};
use crate::models::form::{FieldUpdate, FormState};
use crate::models::outcome::SubmissionOutcome;
use crate::models::time_slot::{TimeSlot, CLINIC_HOURS};
use crate::services::booking_form::BookingFormController;
use crate::services::calendar::DatePolicy;
use crate::services::forms::{lock_form, FormRegistry};

// AppState struct containing shared resources
pub struct AppState {
    pub transport: Arc<dyn WebhookTransport>,
    pub forms: FormRegistry,
    pub date_policy: DatePolicy,
}

// Snapshot of a form returned by every form endpoint
#[derive(Debug, Serialize)]
pub struct FormView {
    pub form_id: String,
    pub form: FormState,
    pub submittable: bool,
    pub submitting: bool,
    pub outcome: Option<SubmissionOutcome>,
}

impl FormView {
    pub fn new(form_id: &str, controller: &BookingFormController) -> Self {
        Self {
            form_id: form_id.to_string(),
            form: controller.form().clone(),
            submittable: controller.is_submittable(),
            submitting: controller.is_submitting(),
            outcome: controller.outcome().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimeSlotsResponse {
    pub slots: Vec<&'static str>,
    pub clinic_hours: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AvailableDatesResponse {
    pub weekend_policy: String,
    pub dates: Vec<NaiveDate>,
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::FormNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::SubmissionInProgress => StatusCode::CONFLICT,
            BookingError::TooManyOpenForms => StatusCode::SERVICE_UNAVAILABLE,
            BookingError::NotSubmittable
            | BookingError::UnknownField(_)
            | BookingError::InvalidValue { .. }
            | BookingError::DateNotSelectable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// List the bookable time slots
pub async fn list_time_slots() -> Json<TimeSlotsResponse> {
    Json(TimeSlotsResponse {
        slots: TimeSlot::labels(),
        clinic_hours: CLINIC_HOURS,
    })
}

// List the dates the booking calendar offers
pub async fn list_available_dates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DatesQuery>,
) -> Json<AvailableDatesResponse> {
    let dates = state
        .date_policy
        .selectable_dates(today(), params.horizon());
    Json(AvailableDatesResponse {
        weekend_policy: state.date_policy.weekend_policy().to_string(),
        dates,
    })
}

// Open a new booking form
pub async fn create_form(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<FormView>), BookingError> {
    let (form_id, form) = state.forms.create()?;
    let view = FormView::new(&form_id, &lock_form(&form));
    Ok((StatusCode::CREATED, Json(view)))
}

// Fetch the current state of a form
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<FormView>, BookingError> {
    let form = state.forms.get(&form_id)?;
    let view = FormView::new(&form_id, &lock_form(&form));
    Ok(Json(view))
}

// Update a single form field
pub async fn update_form_field(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    ExtractJson(request): ExtractJson<FieldUpdateRequest>,
) -> Result<Json<FormView>, BookingError> {
    let form = state.forms.get(&form_id)?;
    let update = FieldUpdate::parse(&request.field, &request.value)?;

    if let FieldUpdate::AppointmentDate(Some(date)) = &update {
        if !state.date_policy.is_selectable(*date, today()) {
            warn!("Rejected unavailable date {} for form {}", date, form_id);
            return Err(BookingError::DateNotSelectable(*date));
        }
    }

    let mut controller = lock_form(&form);
    controller.update_field(update);
    Ok(Json(FormView::new(&form_id, &controller)))
}

// Submit a form to the booking webhook and report the outcome
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<FormView>, BookingError> {
    let form = state.forms.get(&form_id)?;
    let pending = lock_form(&form).begin_submission()?;
    info!("Received booking submission for form {}", form_id);

    // Runs on its own task so the result is applied even if this request is dropped
    let transport = Arc::clone(&state.transport);
    let task_form = Arc::clone(&form);
    let task = tokio::spawn(async move {
        let result = transport.post_json(&pending.endpoint, &pending.payload).await;
        lock_form(&task_form).complete_submission(result);
    });

    if let Err(err) = task.await {
        error!("Booking submission task for form {} failed: {}", form_id, err);
    }

    let view = FormView::new(&form_id, &lock_form(&form));
    Ok(Json(view))
}

// Close a form
pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<StatusCode, BookingError> {
    state.forms.remove(&form_id)?;
    Ok(StatusCode::NO_CONTENT)
}
