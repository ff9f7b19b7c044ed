//! Handler error type and its mapping onto JSON error bodies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use technex_core::ValidationErrors;
use technex_core::error::RepoError;
use technex_core::ports::AuthError;
use technex_infra::UploadError;
use technex_shared::{ErrorResponse, FieldDetail};

/// Application-level error type. Every variant renders as an `ErrorResponse`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation. The message is safe to show.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Upload rejected: {0}")]
    Upload(UploadError),

    /// Already logged; the client only sees the public message.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Log `cause` and hide it behind `public`.
    pub fn internal(public: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let public = public.into();
        tracing::error!(error = %cause, "{public}");
        AppError::Internal(public)
    }

    /// Map a store failure, keeping the recognised kinds and hiding the rest.
    pub fn from_repo(err: RepoError, public: &str) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Duplicate(msg) => AppError::Duplicate(msg),
            other => AppError::internal(public, other),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Duplicate(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upload(UploadError::Io(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Upload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Validation(errors) => ErrorResponse::validation(
                errors
                    .errors()
                    .iter()
                    .map(|e| FieldDetail {
                        field: e.field.to_string(),
                        message: e.message.to_string(),
                    })
                    .collect(),
            ),
            AppError::BadRequest(msg) | AppError::Duplicate(msg) => ErrorResponse::bad_request(msg),
            AppError::Unauthorized(msg) => ErrorResponse::unauthorized(msg),
            AppError::NotFound(msg) => ErrorResponse::not_found(msg),
            AppError::Upload(UploadError::Io(e)) => {
                tracing::error!(error = %e, "Failed to write uploaded file");
                ErrorResponse::internal_error()
            }
            AppError::Upload(e) => ErrorResponse::bad_request(e.to_string()),
            AppError::Internal(msg) => ErrorResponse::new(500, msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::from_repo(err, "Internal server error")
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
            other => AppError::internal("Internal server error", other),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use technex_core::validation::ContactForm;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_validation_lists_every_field() {
        let errors = ContactForm::default().validate().unwrap_err();
        let (status, body) = body_of(errors.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        let fields: Vec<_> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
        assert!(body["msg"].as_str().unwrap().contains("; "));
    }

    #[actix_web::test]
    async fn test_store_failures_hide_their_cause() {
        let err = AppError::from_repo(
            RepoError::Connection("password authentication failed".into()),
            "Failed to fetch posts.",
        );
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch posts.");
        assert!(!body.to_string().contains("password"));
    }

    #[actix_web::test]
    async fn test_duplicate_is_a_bad_request() {
        let err = AppError::from(RepoError::Duplicate(
            "A post with this slug already exists.".into(),
        ));
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "A post with this slug already exists.");
    }

    #[actix_web::test]
    async fn test_upload_type_rejection_is_descriptive() {
        let (status, body) = body_of(UploadError::UnsupportedType.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Only .pdf, .doc and .docx files are allowed!");
    }
}
