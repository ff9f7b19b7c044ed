//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login body. Missing fields deserialize as `None` and fail as bad credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Returned by `/api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub username: String,
}

/// Returned by `/api/auth/check`. Never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A row was inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CreatedResponse {
    pub fn new(id: i32) -> Self {
        Self {
            success: true,
            id,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Page metadata for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// `GET /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage<T> {
    pub posts: Vec<T>,
    pub pagination: Pagination,
}

/// `GET /api/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPage<T> {
    pub jobs: Vec<T>,
    pub pagination: Pagination,
}

/// `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store does not answer.
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    /// `up` or `down`.
    pub database: String,
}

/// `GET /api/csrf-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_uses_camel_case() {
        let json = serde_json::to_value(Pagination {
            page: 2,
            limit: 5,
            total: 12,
            total_pages: 3,
        })
        .unwrap();
        assert_eq!(json["totalPages"], 3);
    }

    #[test]
    fn test_login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"admin"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("admin"));
        assert!(req.password.is_none());
    }
}
