//! Notification port - fire-and-forget messages sent after a submission is stored.

use serde::{Deserialize, Serialize};

/// Which template renders a notification, and for whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKey {
    /// New contact message, to the site admin.
    ContactNotification,
    /// Receipt for the person who wrote in.
    ContactConfirmation,
    /// New job application, to the site admin.
    ApplicationNotification,
    /// Receipt for the applicant.
    ApplicationConfirmation,
}

impl TemplateKey {
    pub const CONTACT: [TemplateKey; 2] = [
        TemplateKey::ContactNotification,
        TemplateKey::ContactConfirmation,
    ];

    pub const APPLICATION: [TemplateKey; 2] = [
        TemplateKey::ApplicationNotification,
        TemplateKey::ApplicationConfirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::ContactNotification => "contactNotification",
            TemplateKey::ContactConfirmation => "contactConfirmation",
            TemplateKey::ApplicationNotification => "applicationNotification",
            TemplateKey::ApplicationConfirmation => "applicationConfirmation",
        }
    }

    /// Admin-facing templates go to the operator mailbox, the rest to the submitter.
    pub fn is_admin_facing(&self) -> bool {
        matches!(
            self,
            TemplateKey::ContactNotification | TemplateKey::ApplicationNotification
        )
    }
}

/// A notification waiting to be rendered and delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: String,
    pub template: TemplateKey,
    /// The submission the template is populated from.
    pub payload: serde_json::Value,
    /// Number of delivery attempts so far.
    pub attempts: u32,
    /// Maximum delivery attempts.
    pub max_attempts: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn new(template: TemplateKey, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            template,
            payload,
            attempts: 0,
            max_attempts: 3,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }
}

/// Dispatcher trait. `dispatch` must never wait on delivery.
pub trait NotificationDispatcher: Send + Sync {
    /// Hand a notification to the background workers.
    fn dispatch(&self, notification: Notification) -> Result<(), DispatchError>;

    /// Snapshot of the delivery counters.
    fn stats(&self) -> QueueStats;
}

/// Queue statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Notification queue is full")]
    QueueFull,

    #[error("Notification queue is closed")]
    Closed,
}
