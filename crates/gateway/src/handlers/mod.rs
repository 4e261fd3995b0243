//! API handlers module

pub mod citations;
pub mod contributions;
pub mod demo;
pub mod graph;
pub mod health;
pub mod stats;

use aicif_common::errors::{AppError, Result};
use validator::Validate;

/// `status` value of every successful response body
pub const SUCCESS: &str = "success";

/// Run derived validation, mapping failures to a 400
pub fn validate_request<T: Validate>(request: &T) -> Result<()> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: e.field_errors().keys().next().map(|field| field.to_string()),
    })
}
