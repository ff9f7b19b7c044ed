//! In-memory notification queue.
//!
//! Notifications are held in a bounded channel and delivered by a fixed set
//! of worker tasks. Nothing is persisted: queued notifications are lost if
//! the process dies before they drain.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use technex_core::ports::{
    DispatchError, MailError, MailSender, Notification, NotificationDispatcher, QueueStats,
};

use super::templates::TemplateRenderer;

/// Notification queue configuration.
#[derive(Debug, Clone)]
pub struct NotificationQueueConfig {
    /// Channel capacity; dispatches beyond it are refused.
    pub max_size: usize,
    /// Number of worker tasks.
    pub workers: usize,
    /// Base delay between attempts, multiplied by the attempt number.
    pub retry_backoff: Duration,
}

impl Default for NotificationQueueConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            workers: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl NotificationQueueConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_size: std::env::var("NOTIFY_QUEUE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_size),
            workers: std::env::var("NOTIFY_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.workers),
            ..defaults
        }
    }
}

#[derive(Default)]
struct Counters {
    pending: AtomicUsize,
    processing: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

/// Bounded background delivery of notifications.
pub struct NotificationQueue {
    counters: Arc<Counters>,
    sender: StdMutex<Option<mpsc::Sender<Notification>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl NotificationQueue {
    /// Spawn the workers. Must be called inside a Tokio runtime.
    pub fn start(
        config: NotificationQueueConfig,
        mailer: Arc<dyn MailSender>,
        renderer: TemplateRenderer,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.max_size.max(1));
        let receiver = Arc::new(Mutex::new(rx));
        let counters = Arc::new(Counters::default());
        let renderer = Arc::new(renderer);

        let workers = (0..config.workers.max(1))
            .map(|worker_id| {
                let worker = Worker {
                    id: worker_id,
                    receiver: receiver.clone(),
                    counters: counters.clone(),
                    mailer: mailer.clone(),
                    renderer: renderer.clone(),
                    retry_backoff: config.retry_backoff,
                };
                tokio::spawn(worker.run())
            })
            .collect();

        tracing::info!(workers = config.workers, capacity = config.max_size, "Notification queue started");

        Self {
            counters,
            sender: StdMutex::new(Some(tx)),
            workers: Mutex::new(workers),
        }
    }

    /// Stop accepting notifications and wait for the workers to drain the queue.
    pub async fn shutdown(&self) {
        let sender = match self.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(sender);

        let handles = std::mem::take(&mut *self.workers.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Notification worker panicked");
            }
        }

        let stats = self.stats();
        tracing::info!(
            completed = stats.completed,
            failed = stats.failed,
            "Notification queue drained"
        );
    }
}

impl NotificationDispatcher for NotificationQueue {
    fn dispatch(&self, notification: Notification) -> Result<(), DispatchError> {
        let guard = self.sender.lock().map_err(|_| DispatchError::Closed)?;
        let sender = guard.as_ref().ok_or(DispatchError::Closed)?;

        // Count before sending so a fast worker never decrements below zero.
        self.counters.pending.fetch_add(1, Ordering::Relaxed);
        match sender.try_send(notification) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.counters.pending.fetch_sub(1, Ordering::Relaxed);
                match e {
                    mpsc::error::TrySendError::Full(_) => Err(DispatchError::QueueFull),
                    mpsc::error::TrySendError::Closed(_) => Err(DispatchError::Closed),
                }
            }
        }
    }

    fn stats(&self) -> QueueStats {
        QueueStats {
            pending: self.counters.pending.load(Ordering::Relaxed),
            processing: self.counters.processing.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

struct Worker {
    id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<Notification>>>,
    counters: Arc<Counters>,
    mailer: Arc<dyn MailSender>,
    renderer: Arc<TemplateRenderer>,
    retry_backoff: Duration,
}

impl Worker {
    async fn run(self) {
        tracing::debug!(worker = self.id, "Notification worker started");

        loop {
            let next = {
                let mut rx = self.receiver.lock().await;
                rx.recv().await
            };

            let Some(notification) = next else {
                tracing::debug!(worker = self.id, "Notification worker shutting down");
                break;
            };

            self.counters.pending.fetch_sub(1, Ordering::Relaxed);
            self.counters.processing.fetch_add(1, Ordering::Relaxed);

            let delivered = self.deliver(notification).await;

            self.counters.processing.fetch_sub(1, Ordering::Relaxed);
            if delivered {
                self.counters.completed.fetch_add(1, Ordering::Relaxed);
            } else {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Render and send, retrying transient transport failures.
    async fn deliver(&self, mut notification: Notification) -> bool {
        let mail = match self.renderer.render(&notification) {
            Ok(mail) => mail,
            Err(e) => {
                tracing::error!(
                    notification_id = %notification.id,
                    template = notification.template.as_str(),
                    error = %e,
                    "Notification could not be rendered"
                );
                return false;
            }
        };

        loop {
            notification.attempts += 1;

            match self.mailer.send(mail.clone()).await {
                Ok(receipt) => {
                    tracing::info!(
                        notification_id = %notification.id,
                        template = notification.template.as_str(),
                        message_id = %receipt.message_id,
                        "Notification sent"
                    );
                    return true;
                }
                Err(e) if is_transient(&e) && notification.attempts < notification.max_attempts => {
                    tracing::warn!(
                        notification_id = %notification.id,
                        attempt = notification.attempts,
                        max_attempts = notification.max_attempts,
                        error = %e,
                        "Notification failed, will retry"
                    );
                    tokio::time::sleep(self.retry_backoff * notification.attempts).await;
                }
                Err(e) => {
                    tracing::error!(
                        notification_id = %notification.id,
                        template = notification.template.as_str(),
                        attempts = notification.attempts,
                        error = %e,
                        "Notification failed permanently"
                    );
                    return false;
                }
            }
        }
    }
}

fn is_transient(err: &MailError) -> bool {
    match err {
        MailError::Transport(_) => true,
        MailError::Rejected(status) => *status == 429 || *status >= 500,
        MailError::MissingRecipient(_) | MailError::Template(_) => false,
    }
}
