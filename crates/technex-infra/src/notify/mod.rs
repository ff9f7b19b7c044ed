//! Notification delivery: queue, templates and mail transports.

mod mail;
mod queue;
mod templates;

pub use mail::{HttpMailSender, LogMailSender, MailConfig};
pub use queue::{NotificationQueue, NotificationQueueConfig};
pub use templates::TemplateRenderer;
