//! The JSON error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// One violated field of a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

/// `{ error, status, details?, msg?, retryAfter? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message, safe to show to the client.
    pub error: String,

    /// The HTTP status code.
    pub status: u16,

    /// Per-field failures of a validation error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldDetail>>,

    /// Every validation message joined with `"; "`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    /// Seconds until a rate-limited client may retry.
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
            details: None,
            msg: None,
            retry_after: None,
        }
    }

    pub fn with_details(mut self, details: Vec<FieldDetail>) -> Self {
        self.msg = Some(
            details
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        );
        self.details = Some(details);
        self
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    // Common error constructors
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(400, error)
    }

    pub fn validation(details: Vec<FieldDetail>) -> Self {
        Self::new(400, "Validation failed").with_details(details)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(401, error)
    }

    pub fn forbidden(error: impl Into<String>) -> Self {
        Self::new(403, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(404, error)
    }

    pub fn too_many_requests(error: impl Into<String>, retry_after: u64) -> Self {
        Self::new(429, error).with_retry_after(retry_after)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_shape() {
        let body = ErrorResponse::validation(vec![
            FieldDetail {
                field: "name".into(),
                message: "Name is required".into(),
            },
            FieldDetail {
                field: "message".into(),
                message: "Message is required".into(),
            },
        ]);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["status"], 400);
        assert_eq!(json["details"][1]["field"], "message");
        assert_eq!(json["msg"], "Name is required; Message is required");
        assert!(json.get("retryAfter").is_none());
    }

    #[test]
    fn test_rate_limit_body_carries_retry_after() {
        let json = serde_json::to_value(ErrorResponse::too_many_requests("slow down", 42)).unwrap();
        assert_eq!(json["retryAfter"], 42);
        assert!(json.get("details").is_none());
    }
}
