pub mod course;
pub mod form;
pub mod misc;
pub mod payment;
pub mod user;

use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `{ success, message }` body for operations with nothing else to return.
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Parse a path id; a malformed id is a client error, not a lookup miss.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("invalid {what} id")))
}
