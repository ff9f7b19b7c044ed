//! Mail delivery port.

use async_trait::async_trait;

/// A rendered message ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Transport acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

/// Mail transport abstraction (HTTP mail API, or a logging mock).
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Mail API rejected the message with status {0}")]
    Rejected(u16),

    #[error("No recipient configured for {0}")]
    MissingRecipient(&'static str),

    #[error("Template error: {0}")]
    Template(String),
}
