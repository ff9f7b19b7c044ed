//! Job listing handlers.

use actix_web::{HttpResponse, web};

use technex_core::error::RepoError;
use technex_core::ports::BaseRepository;
use technex_core::validation::JobForm;
use technex_shared::dto::{CreatedResponse, JobPage, Pagination, SuccessResponse};

use super::{PageQuery, Submission, parse_id};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const NOT_FOUND: &str = "Job not found.";

/// GET /api/jobs
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .jobs
        .list_page(query.into_inner().into_request())
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to fetch jobs."))?;

    let pagination = Pagination {
        page: page.request.page,
        limit: page.request.limit,
        total: page.total,
        total_pages: page.total_pages(),
    };

    Ok(HttpResponse::Ok().json(JobPage {
        jobs: page.items,
        pagination,
    }))
}

/// POST /api/jobs
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: Submission<JobForm>,
) -> AppResult<HttpResponse> {
    let job = body.into_inner().validate()?;

    let saved = state
        .jobs
        .create(job)
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to create job."))?;

    tracing::info!(job_id = saved.id, admin = %identity.username, "Job created");
    Ok(HttpResponse::Created().json(CreatedResponse::new(saved.id)))
}

/// DELETE /api/jobs/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path).ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    match state.jobs.delete(id).await {
        Ok(()) => {
            tracing::info!(job_id = id, admin = %identity.username, "Job deleted");
            Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
        }
        Err(RepoError::NotFound) => Err(AppError::NotFound(NOT_FOUND.to_string())),
        Err(e) => Err(AppError::from_repo(e, "Failed to delete job.")),
    }
}
