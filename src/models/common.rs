use serde::Deserialize;

/// Upper bound on how far ahead the calendar looks.
pub const MAX_HORIZON_DAYS: u32 = 90;

// Query parameters for the available dates endpoint
#[derive(Debug, Deserialize)]
pub struct DatesQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

impl DatesQuery {
    pub fn horizon(&self) -> u32 {
        self.days.min(MAX_HORIZON_DAYS)
    }
}

pub fn default_days() -> u32 {
    30
}

// Body of a field update request
#[derive(Debug, Deserialize)]
pub struct FieldUpdateRequest {
    pub field: String,
    #[serde(default)]
    pub value: String,
}
