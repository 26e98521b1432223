//! Clinic Booking Service
//!
//! This library provides the booking form controller for a small clinic and a
//! web service that hosts booking forms over JSON. A completed form is posted
//! once to the clinic's booking webhook and the reply is classified into a
//! success, conflict or error outcome.
//!
//! # Modules
//!
//! - `client`: `WebhookTransport` seam and the reqwest-backed `BookingWebhookClient`
//! - `services::booking_form`: `BookingFormController`, field state and submission
//! - `services::protocol`: the two webhook wire protocols
//! - `services::calendar`: which dates the booking calendar offers
//!
//! # Protocols
//!
//! The webhook speaks one of two payload shapes. The rich protocol reports a
//! body-level `status` (`success`, `conflict`, ...) and may suggest alternative
//! slots; the simple protocol relies on the HTTP status code alone. The
//! protocol is chosen when the service starts.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
pub mod client_mock;

#[cfg(test)]
mod tests;

// Re-export the main API types for ease of use
pub use client::{BookingWebhookClient, RawResponse, TransportError, WebhookTransport};
pub use config::{ConfigError, ServiceConfig};
pub use error::BookingError;
pub use handlers::api::AppState;
pub use models::form::{FieldUpdate, FormField, FormState};
pub use models::outcome::{ParsedResponse, SubmissionOutcome};
pub use models::time_slot::TimeSlot;
pub use routes::create_router;
pub use services::booking_form::{BookingFormController, PendingSubmission};
pub use services::calendar::{DatePolicy, WeekendPolicy};
pub use services::protocol::SubmissionProtocol;
