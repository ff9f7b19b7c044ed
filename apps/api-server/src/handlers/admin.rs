//! Admin inbox: received contact messages and job applications.

use actix_web::{HttpResponse, web};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/admin/contacts
pub async fn contacts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let contacts = state
        .contacts
        .list_newest_first()
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to fetch contacts."))?;

    tracing::debug!(admin = %identity.username, count = contacts.len(), "Listed contacts");
    Ok(HttpResponse::Ok().json(contacts))
}

/// GET /api/admin/applications
pub async fn applications(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let applications = state
        .applications
        .list_newest_first()
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to fetch applications."))?;

    tracing::debug!(admin = %identity.username, count = applications.len(), "Listed applications");
    Ok(HttpResponse::Ok().json(applications))
}
