//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use technex_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "technex-api".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("APP_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Wire claims of an admin session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // admin id
    username: String,
    iat: i64,
    exp: i64,
    iss: String,
}

/// HS256 session tokens. Stateless: nothing is recorded server-side, so a
/// token stays valid until it expires.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, admin_id: i32, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: admin_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let admin_id = data
            .claims
            .sub
            .parse::<i32>()
            .map_err(|e| AuthError::InvalidToken(format!("subject: {e}")))?;

        Ok(TokenClaims {
            admin_id,
            username: data.claims.username,
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(expiration_hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours,
            issuer: "test-issuer".to_string(),
        })
    }

    #[test]
    fn test_token_carries_admin_identity() {
        let service = service(24);
        let token = service.generate_token(42, "admin").unwrap();

        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.admin_id, 42);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.expires_at - claims.issued_at, 24 * 3600);
    }

    #[test]
    fn test_token_older_than_a_day_is_expired() {
        let stale = service(-25).generate_token(1, "admin").unwrap();

        let result = service(24).validate_token(&stale);

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let result = service(1).validate_token("not.a.token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_foreign_secret_or_issuer_is_rejected() {
        let ours = service(1);
        let other_secret = JwtTokenService::new(JwtConfig {
            secret: "someone-else".to_string(),
            ..JwtConfig::default()
        });
        let other_issuer = JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "elsewhere".to_string(),
        });

        for token in [
            other_secret.generate_token(1, "admin").unwrap(),
            other_issuer.generate_token(1, "admin").unwrap(),
        ] {
            assert!(matches!(
                ours.validate_token(&token),
                Err(AuthError::InvalidToken(_))
            ));
        }
    }

    #[test]
    fn test_expiration_seconds() {
        assert_eq!(service(24).expiration_seconds(), 86400);
    }
}
