//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{DbConn, DbErr};
use technex_core::ports::{
    ApplicationRepository, AuthError, ContactRepository, JobRepository, NotificationDispatcher,
    PasswordService, PostRepository, RateLimitError, RateLimiter, StoreProbe, TokenService,
};
use technex_infra::database::{
    SqlAdminRepository, SqlApplicationRepository, SqlContactRepository, SqlJobRepository,
    SqlPostRepository,
};
use technex_infra::{
    Argon2PasswordService, CredentialVerifier, InMemoryRateLimiter, JwtTokenService, ResumeStore,
    SqlStoreProbe,
};
use tokio::task::JoinHandle;

use crate::config::{AppConfig, BootstrapAdmin, RateLimitSettings};
use crate::middleware::rate_limit::ClientAddr;

/// Failures that abort start-up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Authentication setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Rate limiter setup failed: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One limiter per tier.
#[derive(Clone)]
pub struct RateLimiters {
    pub api: Arc<dyn RateLimiter>,
    pub form: Arc<dyn RateLimiter>,
    pub upload: Arc<dyn RateLimiter>,
    pub client_addr: ClientAddr,
}

impl RateLimiters {
    pub fn new(settings: &RateLimitSettings) -> Result<Self, RateLimitError> {
        Ok(Self {
            api: Arc::new(InMemoryRateLimiter::new(settings.api.clone())?),
            form: Arc::new(InMemoryRateLimiter::new(settings.form.clone())?),
            upload: Arc::new(InMemoryRateLimiter::new(settings.upload.clone())?),
            client_addr: ClientAddr::new(settings.trusted_proxy_hops),
        })
    }

    /// Periodically drop keys whose counters have fully recovered.
    pub fn spawn_pruning(&self, every: Duration) -> JoinHandle<()> {
        let limiters = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiters.api.prune();
                limiters.form.prune();
                limiters.upload.prune();
                tracing::debug!("Pruned idle rate limit keys");
            }
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<dyn ContactRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub store: Arc<dyn StoreProbe>,
    pub tokens: Arc<dyn TokenService>,
    pub credentials: Arc<CredentialVerifier>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub resumes: Arc<ResumeStore>,
    pub limiters: RateLimiters,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the SeaORM repositories and the auth, upload and rate limit
    /// services around an open connection pool.
    pub fn new(
        db: DbConn,
        config: AppConfig,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Result<Self, StartupError> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let credentials = CredentialVerifier::new(
            Arc::new(SqlAdminRepository::new(db.clone())),
            passwords,
            tokens.clone(),
        )?;

        let state = Self {
            contacts: Arc::new(SqlContactRepository::new(db.clone())),
            applications: Arc::new(SqlApplicationRepository::new(db.clone())),
            posts: Arc::new(SqlPostRepository::new(db.clone())),
            jobs: Arc::new(SqlJobRepository::new(db.clone())),
            store: Arc::new(SqlStoreProbe::new(db)),
            tokens,
            credentials: Arc::new(credentials),
            notifier,
            resumes: Arc::new(ResumeStore::new(config.upload.clone())),
            limiters: RateLimiters::new(&config.rate_limits)?,
            config: Arc::new(config),
        };

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Create the configured bootstrap admin if it does not exist yet.
    pub async fn provision_admin(&self, admin: &BootstrapAdmin) -> Result<bool, AuthError> {
        self.credentials
            .ensure_admin(&admin.username, &admin.password, admin.email.clone())
            .await
    }
}
