//! HTTP handlers and route configuration.

mod admin;
mod apply;
mod auth;
mod contact;
mod csrf;
mod health;
mod jobs;
mod posts;

use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, dev::Payload, web};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use technex_core::domain::PageRequest;
use technex_core::ports::{Notification, TemplateKey};
use technex_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::{AppState, RateLimiters};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limiters: &RateLimiters) {
    cfg.service(
        web::scope("/api")
            .wrap(
                RateLimitMiddleware::api(limiters.api.clone()).client_addr(limiters.client_addr),
            )
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/csrf-token", web::get().to(csrf::issue_token))
            .service(
                web::resource("/contact")
                    .wrap(
                        RateLimitMiddleware::form(limiters.form.clone())
                            .client_addr(limiters.client_addr),
                    )
                    .route(web::post().to(contact::submit)),
            )
            .service(
                web::resource("/apply")
                    .wrap(
                        RateLimitMiddleware::upload(limiters.upload.clone())
                            .client_addr(limiters.client_addr),
                    )
                    .route(web::post().to(apply::submit)),
            )
            // Content
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list))
                    .route(web::post().to(posts::create)),
            )
            .service(
                web::resource("/posts/{key}")
                    .route(web::get().to(posts::get_by_slug))
                    .route(web::delete().to(posts::delete)),
            )
            .service(
                web::resource("/jobs")
                    .route(web::get().to(jobs::list))
                    .route(web::post().to(jobs::create)),
            )
            .route("/jobs/{id}", web::delete().to(jobs::delete))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/check", web::get().to(auth::check))
                    .default_service(web::to(api_not_found)),
            )
            // Admin routes
            .service(
                web::scope("/admin")
                    .route("/contacts", web::get().to(admin::contacts))
                    .route("/applications", web::get().to(admin::applications))
                    .default_service(web::to(api_not_found)),
            )
            .default_service(web::to(api_not_found)),
    );
}

async fn api_not_found(req: HttpRequest) -> HttpResponse {
    tracing::debug!(path = %req.path(), "No API route matched");
    HttpResponse::NotFound().json(ErrorResponse::not_found("Not found"))
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Raw `?page=&limit=` values, parsed leniently by [`PageRequest::from_query`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn into_request(self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// A request body accepted either as JSON or as an urlencoded form,
/// chosen by `Content-Type`.
pub struct Submission<T>(pub T);

impl<T> Submission<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for Submission<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if req.content_type() == FORM_CONTENT_TYPE {
            let form = web::Form::<T>::from_request(req, payload);
            Box::pin(async move {
                form.await
                    .map(|f| Submission(f.into_inner()))
                    .map_err(body_error)
            })
        } else {
            let json = web::Json::<T>::from_request(req, payload);
            Box::pin(async move {
                json.await
                    .map(|j| Submission(j.into_inner()))
                    .map_err(body_error)
            })
        }
    }
}

fn body_error(cause: actix_web::Error) -> AppError {
    tracing::debug!(error = %cause, "Rejected request body");
    AppError::BadRequest("Invalid request body".to_string())
}

/// Queue one notification per template for a freshly stored record.
/// Failures are logged; the response is already decided.
fn notify<T: Serialize>(state: &AppState, templates: [TemplateKey; 2], record: &T) {
    let payload = match serde_json::to_value(record) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize notification payload");
            return;
        }
    };

    for template in templates {
        if let Err(e) = state
            .notifier
            .dispatch(Notification::new(template, payload.clone()))
        {
            tracing::error!(error = %e, template = template.as_str(), "Notification dropped");
        }
    }
}

/// Row ids are positive integers; anything else names no row.
fn parse_id(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|id| *id > 0)
}
