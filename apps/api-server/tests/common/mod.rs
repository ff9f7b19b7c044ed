//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::http::header;
use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DbConn};
use tempfile::TempDir;

use api_server::config::{AppConfig, BootstrapAdmin};
use api_server::state::AppState;
use technex_core::ports::{DeliveryReceipt, MailError, MailSender, OutgoingMail};
use technex_infra::NotificationQueue;

pub const ADMIN_EMAIL: &str = "inbox@technex.test";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Mail sender that keeps every message in memory.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(DeliveryReceipt {
            message_id: "recorded".to_string(),
        })
    }
}

/// Everything one test needs, isolated from every other test.
pub struct TestContext {
    pub state: AppState,
    pub db: DbConn,
    pub queue: Arc<NotificationQueue>,
    pub mailbox: Arc<RecordingMailer>,
    pub uploads: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let opts = ConnectOptions::new("sqlite::memory:")
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false)
            .to_owned();
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let uploads = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.upload.dir = uploads.path().to_path_buf();
        config.mail.admin_email = Some(ADMIN_EMAIL.to_string());
        config.notifications.retry_backoff = Duration::from_millis(10);
        customize(&mut config);

        let mailbox = Arc::new(RecordingMailer::default());
        let queue = Arc::new(NotificationQueue::start(
            config.notifications.clone(),
            mailbox.clone(),
            config.mail.build_renderer(),
        ));
        let state = AppState::new(db.clone(), config, queue.clone()).unwrap();

        Self {
            state,
            db,
            queue,
            mailbox,
            uploads,
        }
    }

    pub async fn with_admin(self) -> Self {
        let created = self
            .state
            .provision_admin(&BootstrapAdmin {
                username: ADMIN_USER.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                email: Some("admin@technex.test".to_string()),
            })
            .await
            .unwrap();
        assert!(created);
        self
    }

    /// A session token for the provisioned admin.
    pub async fn token(&self) -> String {
        self.state
            .credentials
            .login(ADMIN_USER, ADMIN_PASSWORD)
            .await
            .unwrap()
            .token
    }

    /// Drain the notification workers and return what they delivered.
    pub async fn delivered(&self) -> Vec<OutgoingMail> {
        self.queue.shutdown().await;
        self.mailbox.sent()
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

pub fn valid_contact() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "Ada@Example.com",
        "company": "Analytical Engines",
        "message": "We would like a quote for a new website."
    })
}

pub fn valid_post(slug: &str) -> serde_json::Value {
    serde_json::json!({
        "title": "Shipping Rust services",
        "excerpt": "What we learned moving our backend.",
        "content": "A long enough body of text for the post. ".repeat(3),
        "author": "TechNex Team",
        "category": "Engineering",
        "icon": "fa-code",
        "slug": slug
    })
}

/// A hand-built multipart body: text fields, then an optional resume part.
pub struct MultipartBody {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "technex-test-boundary",
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn applicant(self) -> Self {
        self.text("job_title", "Backend Engineer")
            .text("name", "Grace Hopper")
            .text("email", "grace@example.com")
            .text("portfolio", "github.com/grace")
    }

    /// Request headers and payload for `TestRequest`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
