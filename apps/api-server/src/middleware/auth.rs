//! Authentication extractors.

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, http::StatusCode,
    http::header, web,
};
use std::future::{Ready, ready};

use technex_core::ports::{AuthError, TokenClaims, TokenService};
use technex_shared::ErrorResponse;

/// Page that unauthenticated browsers are sent to.
pub const LOGIN_PAGE: &str = "/admin-login.html";

/// Authenticated admin extracted from a valid bearer token.
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub admin_id: i32,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            admin_id: claims.admin_id,
            username: claims.username,
        }
    }
}

/// Rejection raised by [`Identity`].
///
/// API callers get a JSON 401 (no token) or 403 (anything wrong with the
/// token). Page requests are redirected to the login page.
#[derive(Debug)]
pub struct AuthenticationError {
    kind: AuthError,
    api: bool,
}

impl AuthenticationError {
    fn new(kind: AuthError, req: &HttpRequest) -> Self {
        Self {
            kind,
            api: req.path().starts_with("/api"),
        }
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match (&self.kind, self.api) {
            (_, false) => StatusCode::FOUND,
            (AuthError::MissingAuth, true) => StatusCode::UNAUTHORIZED,
            (_, true) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if !self.api {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, LOGIN_PAGE))
                .finish();
        }

        let error = match &self.kind {
            AuthError::MissingAuth => ErrorResponse::unauthorized("Unauthorized: No token provided"),
            _ => ErrorResponse::forbidden("Forbidden: Invalid token"),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// The token is the second space-separated part of the Authorization header.
fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;
    let raw = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Authorization header is not ASCII".into()))?;

    raw.split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingAuth)
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let tokens = req
        .app_data::<web::Data<dyn TokenService>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AuthError::InvalidToken("Server configuration error".into())
        })?;

    let token = bearer_token(req)?;
    tokens.validate_token(token).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(|kind| {
            tracing::debug!(path = %req.path(), reason = %kind, "Request not authenticated");
            AuthenticationError::new(kind, req)
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use std::sync::Arc;
    use technex_infra::{JwtConfig, JwtTokenService};

    fn token_data() -> (web::Data<dyn TokenService>, Arc<JwtTokenService>) {
        let service = Arc::new(JwtTokenService::new(JwtConfig::default()));
        let shared: Arc<dyn TokenService> = service.clone();
        (web::Data::from(shared), service)
    }

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(identity.username)
    }

    #[actix_web::test]
    async fn test_page_requests_are_redirected_to_login() {
        let (data, _) = token_data();
        let app = test::init_service(
            App::new()
                .app_data(data)
                .route("/dashboard", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), LOGIN_PAGE);
    }

    #[actix_web::test]
    async fn test_api_requests_get_401_then_403() {
        let (data, _) = token_data();
        let app = test::init_service(
            App::new()
                .app_data(data)
                .route("/api/me", web::get().to(whoami)),
        )
        .await;

        let missing = test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let bare_scheme = test::TestRequest::get()
            .uri("/api/me")
            .insert_header((header::AUTHORIZATION, "Bearer"))
            .to_request();
        assert_eq!(
            test::call_service(&app, bare_scheme).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let garbage = test::TestRequest::get()
            .uri("/api/me")
            .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .to_request();
        let res = test::call_service(&app, garbage).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Forbidden: Invalid token");
    }

    #[actix_web::test]
    async fn test_valid_token_yields_identity() {
        let (data, service) = token_data();
        let token = service.generate_token(7, "admin").unwrap();
        let app = test::init_service(
            App::new()
                .app_data(data)
                .route("/api/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "admin");
    }
}
