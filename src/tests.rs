// Include client tests
#[path = "client_test.rs"]
mod client_tests;

// Include controller tests
#[path = "services/booking_form_test.rs"]
mod booking_form_tests;

// Include handler tests
#[path = "handlers/api_test.rs"]
mod api_tests;

// Include integration tests
#[path = "integration_tests.rs"]
mod integration_tests;
