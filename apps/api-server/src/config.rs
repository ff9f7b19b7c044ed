//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use technex_infra::{
    DatabaseConfig, JwtConfig, MailConfig, NotificationQueueConfig, RateLimitConfig, UploadConfig,
};

const DEFAULT_CORS_ORIGINS: [&str; 5] = [
    "http://localhost:3000",
    "http://localhost:5000",
    "http://localhost:5500",
    "http://127.0.0.1:5500",
    "https://technex-solutions.netlify.app",
];

/// The three rate limit tiers and how clients are told apart.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub api: RateLimitConfig,
    pub form: RateLimitConfig,
    pub upload: RateLimitConfig,
    /// Reverse proxies in front of the server. Zero keys limits on the
    /// socket peer and ignores `X-Forwarded-For`.
    pub trusted_proxy_hops: usize,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            api: RateLimitConfig::api(),
            form: RateLimitConfig::form(),
            upload: RateLimitConfig::upload(),
            trusted_proxy_hops: 0,
        }
    }
}

impl RateLimitSettings {
    pub fn from_env() -> Self {
        Self {
            api: RateLimitConfig::from_env("RATE_LIMIT", RateLimitConfig::api()),
            form: RateLimitConfig::from_env("FORM_RATE_LIMIT", RateLimitConfig::form()),
            upload: RateLimitConfig::from_env("UPLOAD_RATE_LIMIT", RateLimitConfig::upload()),
            trusted_proxy_hops: std::env::var("TRUST_PROXY_HOPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        }
    }
}

/// Admin account provisioned at start-up.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Deployment name reported by the health endpoint.
    pub environment: String,
    pub database: DatabaseConfig,
    /// Run pending migrations on start.
    pub init_db: bool,
    pub jwt: JwtConfig,
    pub rate_limits: RateLimitSettings,
    pub upload: UploadConfig,
    pub admin_static_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub mail: MailConfig,
    pub notifications: NotificationQueueConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: "development".to_string(),
            database: DatabaseConfig::default(),
            init_db: true,
            jwt: JwtConfig::default(),
            rate_limits: RateLimitSettings::default(),
            upload: UploadConfig::default(),
            admin_static_dir: PathBuf::from("admin"),
            cors_origins: DEFAULT_CORS_ORIGINS.map(String::from).to_vec(),
            mail: MailConfig::default(),
            notifications: NotificationQueueConfig::default(),
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = env::var("CORS_ORIGINS")
            .ok()
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_USERNAME"),
            env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin {
                    username,
                    password,
                    email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok().filter(|e| !e.is_empty()),
                })
            }
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            environment: env::var("APP_ENV").unwrap_or(defaults.environment),
            database: DatabaseConfig::from_env(),
            init_db: env::var("INIT_DB")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            jwt: JwtConfig::from_env(),
            rate_limits: RateLimitSettings::from_env(),
            upload: UploadConfig::from_env(),
            admin_static_dir: env::var("ADMIN_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.admin_static_dir),
            cors_origins,
            mail: MailConfig::from_env(),
            notifications: NotificationQueueConfig::from_env(),
            bootstrap_admin,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(" https://a.example/ ,, http://localhost:3000");
        assert_eq!(origins, vec!["https://a.example", "http://localhost:3000"]);
    }

    #[test]
    fn test_defaults_match_documented_tiers() {
        let config = AppConfig::default();
        assert_eq!(config.rate_limits.api.max_requests, 100);
        assert_eq!(config.rate_limits.form.max_requests, 5);
        assert_eq!(config.rate_limits.upload.max_requests, 3);
        assert!(config.init_db);
        assert!(
            config
                .cors_origins
                .contains(&"https://technex-solutions.netlify.app".to_string())
        );
    }

    #[test]
    fn test_bootstrap_admin_debug_hides_password() {
        let admin = BootstrapAdmin {
            username: "root".into(),
            password: "hunter22".into(),
            email: None,
        };
        assert!(!format!("{admin:?}").contains("hunter22"));
    }
}
