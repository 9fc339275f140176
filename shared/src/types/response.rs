//! Standard API response envelope
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! {
//!     "success": true,
//!     "message": "Login successful",
//!     "data": { ... },
//!     "timestamp": "2025-01-01T00:00:00Z"
//! }
//! ```
//!
//! Failures replace `data` with `error`, carrying a stable machine-readable
//! code and optional field-level details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,

    /// Human-readable summary of the outcome
    pub message: String,

    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a failed response
    pub fn error(message: impl Into<String>, error: ErrorBody) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl ApiResponse<()> {
    /// Create a successful response without a data payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
            timestamp: Utc::now(),
        }
    }
}

/// Machine-readable error details attached to failed responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code for client-side handling, e.g. `INVALID_OTP`
    pub code: String,

    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<HashMap<String, Vec<String>>>,

    /// Additional context, only populated outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Create an error body with just a code
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            fields: None,
            details: None,
        }
    }

    /// Attach field-level validation errors
    pub fn with_fields(mut self, fields: HashMap<String, Vec<String>>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Attach debug details (stripped in production by the API boundary)
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success("ok", serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "ok");
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("error").is_none());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse<()> =
            ApiResponse::error("Invalid OTP", ErrorBody::new("INVALID_OTP"));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "INVALID_OTP");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_message_only() {
        let response = ApiResponse::message("Logout successful");
        assert!(response.success);
        assert!(response.data.is_none());
        assert!(response.error.is_none());
    }
}
