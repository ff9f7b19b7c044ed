//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod mail;
mod notification;
mod rate_limit;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use mail::{DeliveryReceipt, MailError, MailSender, OutgoingMail};
pub use notification::{
    DispatchError, Notification, NotificationDispatcher, QueueStats, TemplateKey,
};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    AdminRepository, ApplicationRepository, BaseRepository, ContactRepository, JobRepository,
    PostRepository, StoreProbe,
};
