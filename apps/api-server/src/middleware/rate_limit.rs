//! Rate limiting middleware.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::Arc;

use technex_core::ports::{RateLimitResult, RateLimiter};
use technex_shared::ErrorResponse;

pub const API_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
pub const FORM_LIMIT_MESSAGE: &str = "Too many form submissions. Please try again in 15 minutes.";
pub const UPLOAD_LIMIT_MESSAGE: &str = "Too many file uploads. Please try again in 1 hour.";

const RATELIMIT_LIMIT: &str = "ratelimit-limit";
const RATELIMIT_REMAINING: &str = "ratelimit-remaining";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Picks the address a request is counted against.
///
/// With no trusted proxies this is the socket peer and forwarding headers
/// are ignored. With `n` trusted proxies it is the `n`th `X-Forwarded-For`
/// entry from the right, the one appended by the outermost trusted proxy;
/// anything further left is client-controlled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientAddr {
    trusted_hops: usize,
}

impl ClientAddr {
    pub fn new(trusted_hops: usize) -> Self {
        Self { trusted_hops }
    }

    pub fn key(&self, peer: Option<SocketAddr>, headers: &HeaderMap) -> String {
        if self.trusted_hops > 0 {
            let forwarded: Vec<&str> = headers
                .get_all(X_FORWARDED_FOR)
                .filter_map(|value| value.to_str().ok())
                .flat_map(|value| value.split(','))
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .collect();

            // A shorter chain than configured: take the furthest hop seen.
            if let Some(client) = forwarded
                .iter()
                .rev()
                .nth(self.trusted_hops - 1)
                .or(forwarded.first())
            {
                return client.to_string();
            }
        }

        peer.map(|addr| addr.ip().to_string()).unwrap_or_else(|| "unknown".to_string())
    }
}

/// Rate limiting middleware factory. One instance per tier.
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    message: &'static str,
    client: ClientAddr,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>, message: &'static str) -> Self {
        Self {
            limiter,
            message,
            client: ClientAddr::default(),
        }
    }

    pub fn client_addr(mut self, client: ClientAddr) -> Self {
        self.client = client;
        self
    }

    pub fn api(limiter: Arc<dyn RateLimiter>) -> Self {
        Self::new(limiter, API_LIMIT_MESSAGE)
    }

    pub fn form(limiter: Arc<dyn RateLimiter>) -> Self {
        Self::new(limiter, FORM_LIMIT_MESSAGE)
    }

    pub fn upload(limiter: Arc<dyn RateLimiter>) -> Self {
        Self::new(limiter, UPLOAD_LIMIT_MESSAGE)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            message: self.message,
            client: self.client,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    message: &'static str,
    client: ClientAddr,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        let message = self.message;
        let key = self.client.key(req.peer_addr(), req.headers());

        Box::pin(async move {
            let decision = match limiter.check(&key).await {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::error!(error = %e, "Rate limiter error, failing open");
                    None
                }
            };

            if let Some(result) = decision.as_ref().filter(|r| !r.allowed) {
                let retry_after = result.reset_after.as_secs_f64().ceil().max(1.0) as u64;
                tracing::warn!(key = %key, path = %req.path(), retry_after, "Rate limit exceeded");

                let response = HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", retry_after.to_string()))
                    .insert_header((RATELIMIT_LIMIT, result.limit.to_string()))
                    .insert_header((RATELIMIT_REMAINING, "0"))
                    .json(ErrorResponse::too_many_requests(message, retry_after));

                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            if let Some(result) = decision {
                annotate(res.headers_mut(), &result);
            }
            Ok(res.map_into_left_body())
        })
    }
}

/// Tiers nest; the innermost (most specific) tier reports its quota.
fn annotate(headers: &mut HeaderMap, result: &RateLimitResult) {
    if headers.contains_key(RATELIMIT_LIMIT) {
        return;
    }
    headers.insert(
        HeaderName::from_static(RATELIMIT_LIMIT),
        HeaderValue::from(result.limit),
    );
    headers.insert(
        HeaderName::from_static(RATELIMIT_REMAINING),
        HeaderValue::from(result.remaining),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};
    use async_trait::async_trait;
    use std::time::Duration;
    use technex_core::ports::RateLimitError;
    use technex_infra::{InMemoryRateLimiter, RateLimitConfig};

    struct BrokenLimiter;

    #[async_trait]
    impl RateLimiter for BrokenLimiter {
        async fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
            Err(RateLimitError::Backend("unavailable".into()))
        }
    }

    fn limiter(max_requests: u32) -> Arc<dyn RateLimiter> {
        Arc::new(
            InMemoryRateLimiter::new(RateLimitConfig {
                max_requests,
                window: Duration::from_secs(60),
            })
            .unwrap(),
        )
    }

    fn from(addr: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri("/ping")
            .peer_addr(addr.parse().unwrap())
    }

    #[actix_web::test]
    async fn test_rejects_after_ceiling_with_retry_hint() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::form(limiter(2)))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        for remaining in ["1", "0"] {
            let res = test::call_service(&app, from("10.0.0.1:4000").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(res.headers().get("ratelimit-limit").unwrap(), "2");
            assert_eq!(res.headers().get("ratelimit-remaining").unwrap(), remaining);
        }

        let res = test::call_service(&app, from("10.0.0.1:4000").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(res.headers().contains_key("retry-after"));
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], FORM_LIMIT_MESSAGE);
        assert!(body["retryAfter"].as_u64().unwrap() >= 1);

        // A different address has its own counter.
        let other = test::call_service(&app, from("10.0.0.2:4000").to_request()).await;
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_forwarded_header_does_not_change_the_key() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::form(limiter(5)))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let mut allowed = 0;
        for i in 0..50 {
            let req = from("10.0.0.1:4000")
                .insert_header(("X-Forwarded-For", format!("198.51.100.{i}")))
                .insert_header(("Forwarded", format!("for=198.51.100.{i}")))
                .to_request();
            if test::call_service(&app, req).await.status() == StatusCode::OK {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);
    }

    #[::core::prelude::v1::test]
    fn test_client_addr_trusts_only_configured_hops() {
        let peer = Some("10.0.0.1:4000".parse().unwrap());
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(X_FORWARDED_FOR),
            HeaderValue::from_static("6.6.6.6, 203.0.113.5, 192.0.2.10"),
        );

        assert_eq!(ClientAddr::default().key(peer, &headers), "10.0.0.1");
        assert_eq!(ClientAddr::new(1).key(peer, &headers), "192.0.2.10");
        assert_eq!(ClientAddr::new(2).key(peer, &headers), "203.0.113.5");
        assert_eq!(ClientAddr::new(5).key(peer, &headers), "6.6.6.6");

        assert_eq!(ClientAddr::new(1).key(peer, &HeaderMap::new()), "10.0.0.1");
        assert_eq!(ClientAddr::new(1).key(None, &HeaderMap::new()), "unknown");
    }

    #[actix_web::test]
    async fn test_limiter_errors_fail_open() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::api(Arc::new(BrokenLimiter)))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res = test::call_service(&app, from("10.0.0.1:4000").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.headers().contains_key("ratelimit-limit"));
    }
}
