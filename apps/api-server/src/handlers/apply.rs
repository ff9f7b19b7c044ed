//! Job application handler (multipart with a resume upload).

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use technex_core::ports::{BaseRepository, TemplateKey};
use technex_core::validation::ApplicationForm;
use technex_infra::{IncomingFile, ResumeStore, UploadError};
use technex_shared::dto::CreatedResponse;

use super::notify;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const SUBMITTED: &str =
    "Application submitted successfully! We'll review it and get back to you soon.";
const RESUME_FIELD: &str = "resume";
/// Ceiling for a single text field.
const MAX_TEXT_FIELD: usize = 64 * 1024;

/// POST /api/apply
pub async fn submit(state: web::Data<AppState>, payload: Multipart) -> AppResult<HttpResponse> {
    let (form, resume) = read_parts(payload, &state.resumes).await?;

    let resume = resume.ok_or(UploadError::Missing)?;
    state.resumes.inspect(&resume)?;
    let draft = form.validate()?;

    let resume_path = state.resumes.store(&resume).await?;
    let saved = state
        .applications
        .create(draft.attach_resume(resume_path))
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to submit application."))?;

    tracing::info!(application_id = saved.id, "Job application received");
    notify(&state, TemplateKey::APPLICATION, &saved);

    Ok(HttpResponse::Created().json(CreatedResponse::new(saved.id).with_message(SUBMITTED)))
}

/// Collect the text fields and at most one file part.
async fn read_parts(
    mut payload: Multipart,
    store: &ResumeStore,
) -> AppResult<(ApplicationForm, Option<IncomingFile>)> {
    let mut form = ApplicationForm::default();
    let mut resume: Option<IncomingFile> = None;

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        match file_name {
            Some(file_name) => {
                if name != RESUME_FIELD {
                    return Err(UploadError::UnexpectedField(name).into());
                }
                if resume.is_some() {
                    return Err(UploadError::TooManyFiles.into());
                }
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let bytes = read_field(&mut field, store.max_bytes())
                    .await?
                    .ok_or_else(|| store.too_large())?;
                resume = Some(IncomingFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            None => {
                let bytes = read_field(&mut field, MAX_TEXT_FIELD)
                    .await?
                    .ok_or_else(|| AppError::BadRequest(format!("Field {name} is too long")))?;
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest(format!("Field {name} is not UTF-8")))?;
                if !form.set_field(&name, value) {
                    tracing::debug!(field = %name, "Ignoring unknown application field");
                }
            }
        }
    }

    Ok((form, resume))
}

/// Read a part into memory. `None` once it grows past `limit`.
async fn read_field(field: &mut Field, limit: usize) -> AppResult<Option<Vec<u8>>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

fn malformed(cause: actix_multipart::MultipartError) -> AppError {
    tracing::debug!(error = %cause, "Malformed multipart body");
    AppError::BadRequest("Invalid multipart body".to_string())
}
