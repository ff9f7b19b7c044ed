//! CSRF token issuance.

use actix_web::HttpResponse;

use technex_shared::dto::CsrfTokenResponse;

/// GET /api/csrf-token
///
/// Issues a fresh random token. Nothing is checked against it server side.
pub async fn issue_token() -> HttpResponse {
    let bytes: [u8; 32] = rand::random();
    let csrf_token = bytes.iter().map(|b| format!("{b:02x}")).collect();

    HttpResponse::Ok().json(CsrfTokenResponse { csrf_token })
}
