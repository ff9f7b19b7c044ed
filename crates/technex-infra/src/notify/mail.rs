//! Mail transports.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use technex_core::ports::{DeliveryReceipt, MailError, MailSender, OutgoingMail};

use super::TemplateRenderer;

/// Admin recipient used in mock mode when `ADMIN_EMAIL` is unset.
const MOCK_ADMIN_RECIPIENT: &str = "Admin";

/// Mail settings. Without `api_url` the backend runs in mock mode.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
    /// Recipient of admin-facing notifications.
    pub admin_email: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            from: "TechNex Solutions <no-reply@technex.example>".to_string(),
            admin_email: None,
        }
    }
}

impl MailConfig {
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            api_url: non_empty("MAIL_API_URL"),
            api_key: non_empty("MAIL_API_KEY"),
            from: non_empty("MAIL_FROM").unwrap_or_else(|| Self::default().from),
            admin_email: non_empty("ADMIN_EMAIL"),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.api_url.is_none()
    }

    /// Renderer addressed at the configured admin. Mock mode never fails
    /// for want of an admin address.
    pub fn build_renderer(&self) -> TemplateRenderer {
        let admin = self
            .admin_email
            .clone()
            .or_else(|| self.is_mock().then(|| MOCK_ADMIN_RECIPIENT.to_string()));
        TemplateRenderer::new(admin)
    }

    /// Pick the transport: HTTP when an API URL is configured, logging otherwise.
    pub fn build_sender(&self) -> Arc<dyn MailSender> {
        match &self.api_url {
            Some(url) => {
                tracing::info!(url = %url, "Mail transport configured");
                Arc::new(HttpMailSender::new(
                    url.clone(),
                    self.api_key.clone(),
                    self.from.clone(),
                ))
            }
            None => {
                tracing::warn!("Mail transport not configured, notifications run in mock mode");
                Arc::new(LogMailSender)
            }
        }
    }
}

/// Mock transport: logs the envelope and reports success.
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, MailError> {
        tracing::info!(
            to = %crate::redact::mask_email(&mail.to),
            subject = %mail.subject,
            "[MOCK EMAIL] not sent"
        );
        Ok(DeliveryReceipt {
            message_id: "mock-id".to_string(),
        })
    }
}

/// Posts messages as JSON to an HTTP mail API using a bearer key.
pub struct HttpMailSender {
    url: String,
    api_key: Option<String>,
    from: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    #[serde(alias = "messageId")]
    id: Option<String>,
}

impl HttpMailSender {
    pub fn new(url: String, api_key: Option<String>, from: String) -> Self {
        Self {
            url,
            api_key,
            from,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, MailError> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": mail.to,
            "subject": mail.subject,
            "text": mail.body,
        });

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }

        let reply = response.json::<ApiReply>().await.ok();
        let message_id = reply
            .and_then(|r| r.id)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(DeliveryReceipt { message_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_mode_reports_success() {
        let sender = MailConfig::default().build_sender();
        let receipt = sender
            .send(OutgoingMail {
                to: "jane@example.com".to_string(),
                subject: "Hello".to_string(),
                body: "Hi".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(receipt.message_id, "mock-id");
    }

    #[test]
    fn test_admin_recipient_placeholder_only_in_mock_mode() {
        let notification = technex_core::ports::Notification::new(
            technex_core::ports::TemplateKey::ContactNotification,
            serde_json::json!({
                "name": "Jane",
                "email": "jane@example.com",
                "message": "Hello there!"
            }),
        );

        let mock = MailConfig::default().build_renderer();
        assert_eq!(mock.render(&notification).unwrap().to, MOCK_ADMIN_RECIPIENT);

        let live = MailConfig {
            api_url: Some("https://mail.example/send".to_string()),
            ..MailConfig::default()
        };
        assert!(matches!(
            live.build_renderer().render(&notification),
            Err(MailError::MissingRecipient(_))
        ));

        let addressed = MailConfig {
            admin_email: Some("ops@technex.example".to_string()),
            ..MailConfig::default()
        };
        assert_eq!(
            addressed.build_renderer().render(&notification).unwrap().to,
            "ops@technex.example"
        );
    }
}
