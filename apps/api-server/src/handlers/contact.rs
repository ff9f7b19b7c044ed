//! Contact form handler.

use actix_web::{HttpResponse, web};

use technex_core::ports::{BaseRepository, TemplateKey};
use technex_core::validation::ContactForm;
use technex_shared::dto::CreatedResponse;

use super::{Submission, notify};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const THANK_YOU: &str = "Thank you for your message! We'll get back to you within 24 hours.";

/// POST /api/contact
pub async fn submit(
    state: web::Data<AppState>,
    body: Submission<ContactForm>,
) -> AppResult<HttpResponse> {
    let contact = body.into_inner().validate()?;

    let saved = state
        .contacts
        .create(contact)
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to save contact message."))?;

    tracing::info!(contact_id = saved.id, "Contact message received");
    notify(&state, TemplateKey::CONTACT, &saved);

    Ok(HttpResponse::Created().json(CreatedResponse::new(saved.id).with_message(THANK_YOU)))
}
