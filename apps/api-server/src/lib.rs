//! # TechNex API Server
//!
//! Actix-web application for the TechNex website: public contact and job
//! application intake, the blog and careers listings, and the admin API.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{
    App, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    middleware::DefaultHeaders,
    web,
};
use tracing_actix_web::TracingLogger;

use technex_core::ports::TokenService;
use technex_shared::ErrorResponse;

use config::AppConfig;
use state::AppState;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     style-src 'self' 'unsafe-inline' https://cdnjs.cloudflare.com https://fonts.googleapis.com; \
     font-src 'self' https://fonts.gstatic.com https://cdnjs.cloudflare.com; \
     script-src 'self' 'unsafe-inline'; \
     img-src 'self' data: https:; \
     connect-src 'self'";

/// Build the application with every route, middleware and static mount.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let config = state.config.clone();
    let limiters = state.limiters.clone();
    let tokens: web::Data<dyn TokenService> = web::Data::from(state.tokens.clone());

    App::new()
        .wrap(cors(&config))
        .wrap(security_headers())
        .wrap(TracingLogger::default())
        .app_data(web::Data::new(state))
        .app_data(tokens)
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected query string");
            bad_request("Invalid query string")
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected path parameter");
            bad_request("Invalid path parameter")
        }))
        .configure(|cfg| handlers::configure_routes(cfg, &limiters))
        .service(Files::new("/uploads", &config.upload.dir))
        .service(Files::new("/admin", &config.admin_static_dir).index_file("index.html"))
}

fn bad_request(message: &str) -> Error {
    actix_web::error::InternalError::from_response(
        message.to_string(),
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(message)),
    )
    .into()
}

fn cors(config: &AppConfig) -> Cors {
    config
        .cors_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-csrf-token"),
        ])
        .supports_credentials()
        .max_age(3600)
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "DENY"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY))
        .add(("Cross-Origin-Resource-Policy", "cross-origin"))
}
