//! Authentication and authorization ports.

use crate::error::RepoError;

/// Claims carried by an admin session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub admin_id: i32,
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Token service trait for signed bearer tokens.
pub trait TokenService: Send + Sync {
    /// Mint a token for an admin.
    fn generate_token(&self, admin_id: i32, username: &str) -> Result<String, AuthError>;

    /// Validate signature, issuer and expiry, then decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly minted tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Credential store error: {0}")]
    Store(#[from] RepoError),
}
