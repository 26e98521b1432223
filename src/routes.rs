use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::api::{
    create_form, delete_form, get_form, list_available_dates, list_time_slots, submit_form,
    update_form_field, AppState,
};
use crate::handlers::health::health_check;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let catalogue_routes = Router::new()
        .route("/health", get(health_check))
        .route("/time-slots", get(list_time_slots))
        .route("/dates", get(list_available_dates));

    let form_routes = Router::new()
        .route("/forms", post(create_form))
        .route(
            "/forms/:form_id",
            get(get_form).patch(update_form_field).delete(delete_form),
        )
        .route("/forms/:form_id/submit", post(submit_form));

    catalogue_routes.merge(form_routes).with_state(app_state)
}
