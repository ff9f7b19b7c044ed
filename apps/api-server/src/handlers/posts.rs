//! Blog post handlers.

use actix_web::{HttpResponse, web};

use technex_core::error::RepoError;
use technex_core::ports::BaseRepository;
use technex_core::validation::PostForm;
use technex_shared::dto::{CreatedResponse, Pagination, PostPage, SuccessResponse};

use super::{PageQuery, Submission, parse_id};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const NOT_FOUND: &str = "Post not found.";

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list_page(query.into_inner().into_request())
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to fetch posts."))?;

    let pagination = Pagination {
        page: page.request.page,
        limit: page.request.limit,
        total: page.total,
        total_pages: page.total_pages(),
    };

    Ok(HttpResponse::Ok().json(PostPage {
        posts: page.items,
        pagination,
    }))
}

/// GET /api/posts/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_slug(&path)
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to fetch post."))?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: Submission<PostForm>,
) -> AppResult<HttpResponse> {
    let post = body.into_inner().validate()?;

    let saved = state
        .posts
        .create(post)
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to create post."))?;

    tracing::info!(post_id = saved.id, slug = %saved.slug, admin = %identity.username, "Post created");
    Ok(HttpResponse::Created().json(CreatedResponse::new(saved.id)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path).ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    match state.posts.delete(id).await {
        Ok(()) => {
            tracing::info!(post_id = id, admin = %identity.username, "Post deleted");
            Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
        }
        Err(RepoError::NotFound) => Err(AppError::NotFound(NOT_FOUND.to_string())),
        Err(e) => Err(AppError::from_repo(e, "Failed to delete post.")),
    }
}
