pub mod common;
pub mod form;
pub mod outcome;
pub mod time_slot;
