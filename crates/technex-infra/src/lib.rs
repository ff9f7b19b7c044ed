//! # TechNex Infrastructure
//!
//! Concrete implementations of the ports defined in `technex-core`:
//! the SeaORM persistence gateway, authentication, rate limiting,
//! resume storage and notification delivery.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `postgres` / `sqlite` - Store backends for SeaORM
//! - `auth` - JWT + Argon2 authentication and the credential verifier
//! - `rate-limit` - Keyed rate limiting via governor

pub mod database;
pub mod notify;
pub mod redact;
pub mod upload;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use database::{DatabaseConfig, SqlStoreProbe};
pub use notify::{MailConfig, NotificationQueue, NotificationQueueConfig, TemplateRenderer};
pub use upload::{IncomingFile, ResumeStore, UploadConfig, UploadError};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, CredentialVerifier, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
