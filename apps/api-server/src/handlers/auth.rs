//! Authentication handlers.

use actix_web::{HttpResponse, web};

use technex_shared::dto::{AuthStatus, LoginRequest, LoginResponse, SuccessResponse};

use super::Submission;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: Submission<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .credentials
        .login(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Logged in successfully".to_string(),
        token: session.token,
        username: session.username,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(SuccessResponse::with_message("Logged out successfully"))
}

/// GET /api/auth/check
pub async fn check(identity: OptionalIdentity) -> HttpResponse {
    let status = match identity.0 {
        Some(identity) => AuthStatus {
            authenticated: true,
            username: Some(identity.username),
        },
        None => AuthStatus {
            authenticated: false,
            username: None,
        },
    };

    HttpResponse::Ok().json(status)
}
