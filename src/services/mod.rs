pub mod booking_form;
pub mod calendar;
pub mod forms;
pub mod protocol;
