//! Notification emitter seam

use crate::error::{LeagueError, Result};
use crate::metrics::MetricsCollector;
use crate::types::{NotificationIntent, NotificationKind};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Trait for handing notification intents to the delivery side.
///
/// Implementations must return quickly: they are called on the mutation path
/// right after a transaction commits.
#[async_trait]
pub trait NotificationEmitter: Send + Sync {
    async fn emit(&self, intent: NotificationIntent) -> Result<()>;

    /// Emit, waiting for queue capacity instead of failing when the queue
    /// is full. Only for callers that hold no lock.
    async fn emit_waiting(&self, intent: NotificationIntent) -> Result<()> {
        self.emit(intent).await
    }
}

/// Emit an intent, logging instead of propagating any failure.
///
/// Returns whether the intent was accepted.
pub async fn emit_best_effort(
    emitter: &dyn NotificationEmitter,
    metrics: &MetricsCollector,
    intent: NotificationIntent,
) -> bool {
    let kind = intent.kind;
    let recipient = intent.recipient.clone();
    let outcome = emitter.emit(intent).await;
    record_outcome(metrics, kind, &recipient, outcome)
}

/// Like [`emit_best_effort`], but waits for queue capacity
pub async fn emit_with_backpressure(
    emitter: &dyn NotificationEmitter,
    metrics: &MetricsCollector,
    intent: NotificationIntent,
) -> bool {
    let kind = intent.kind;
    let recipient = intent.recipient.clone();
    let outcome = emitter.emit_waiting(intent).await;
    record_outcome(metrics, kind, &recipient, outcome)
}

fn record_outcome(
    metrics: &MetricsCollector,
    kind: NotificationKind,
    recipient: &str,
    outcome: Result<()>,
) -> bool {
    match outcome {
        Ok(()) => {
            debug!("Emitted {:?} notification for '{}'", kind, recipient);
            metrics.record_notification(kind, "emitted");
            true
        }
        Err(e) => {
            warn!(
                "Dropping {:?} notification for '{}': {}",
                kind, recipient, e
            );
            metrics.record_notification(kind, "dropped");
            false
        }
    }
}

/// Emitter backed by a bounded channel drained by the dispatcher
#[derive(Debug, Clone)]
pub struct ChannelNotificationEmitter {
    sender: mpsc::Sender<NotificationIntent>,
}

impl ChannelNotificationEmitter {
    /// Create an emitter and the receiving end for the dispatcher
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NotificationIntent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotificationEmitter for ChannelNotificationEmitter {
    async fn emit(&self, intent: NotificationIntent) -> Result<()> {
        self.sender.try_send(intent).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                LeagueError::internal("Notification queue is full")
            }
            mpsc::error::TrySendError::Closed(_) => {
                LeagueError::internal("Notification dispatcher has stopped")
            }
        })
    }

    async fn emit_waiting(&self, intent: NotificationIntent) -> Result<()> {
        self.sender
            .send(intent)
            .await
            .map_err(|_| LeagueError::internal("Notification dispatcher has stopped"))
    }
}

/// Emitter used when notifications are disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotificationEmitter;

#[async_trait]
impl NotificationEmitter for NoopNotificationEmitter {
    async fn emit(&self, _intent: NotificationIntent) -> Result<()> {
        Ok(())
    }
}

/// Emitter that keeps every intent in memory (for testing)
#[derive(Debug, Default)]
pub struct RecordingNotificationEmitter {
    intents: std::sync::Mutex<Vec<NotificationIntent>>,
}

impl RecordingNotificationEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All intents emitted so far
    pub fn intents(&self) -> Vec<NotificationIntent> {
        self.intents
            .lock()
            .map(|intents| intents.clone())
            .unwrap_or_default()
    }

    /// Intents addressed to one recipient
    pub fn intents_for(&self, recipient: &str) -> Vec<NotificationIntent> {
        self.intents()
            .into_iter()
            .filter(|i| i.recipient == recipient)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut intents) = self.intents.lock() {
            intents.clear();
        }
    }
}

#[async_trait]
impl NotificationEmitter for RecordingNotificationEmitter {
    async fn emit(&self, intent: NotificationIntent) -> Result<()> {
        if let Ok(mut intents) = self.intents.lock() {
            intents.push(intent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::messages::system_notice;

    #[tokio::test]
    async fn test_channel_emitter_delivers_to_receiver() {
        let (emitter, mut receiver) = ChannelNotificationEmitter::channel(4);
        emitter
            .emit(system_notice("user-1", "Welcome", "Hello"))
            .await
            .unwrap();

        let intent = receiver.recv().await.unwrap();
        assert_eq!(intent.recipient, "user-1");
        assert_eq!(intent.kind, NotificationKind::System);
    }

    #[tokio::test]
    async fn test_channel_emitter_full_queue_fails_fast() {
        let (emitter, _receiver) = ChannelNotificationEmitter::channel(1);
        emitter.emit(system_notice("a", "t", "m")).await.unwrap();

        let err = emitter.emit(system_notice("b", "t", "m")).await.unwrap_err();
        assert!(err.to_string().contains("full"));
    }

    #[tokio::test]
    async fn test_channel_emitter_closed_queue_fails() {
        let (emitter, receiver) = ChannelNotificationEmitter::channel(1);
        drop(receiver);

        assert!(emitter.emit(system_notice("a", "t", "m")).await.is_err());
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failures() {
        let (emitter, receiver) = ChannelNotificationEmitter::channel(1);
        drop(receiver);
        let metrics = MetricsCollector::new().unwrap();

        let accepted = emit_best_effort(&emitter, &metrics, system_notice("a", "t", "m")).await;

        assert!(!accepted);

        assert_eq!(
            metrics
                .notifications()
                .notifications_total
                .with_label_values(&["system", "dropped"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn test_waiting_emit_resumes_once_receiver_drains() {
        let (emitter, mut receiver) = ChannelNotificationEmitter::channel(1);
        let metrics = MetricsCollector::new().unwrap();
        let drain = tokio::spawn(async move {
            let mut received = 0;
            while receiver.recv().await.is_some() {
                received += 1;
            }
            received
        });

        let mut accepted = 0;
        for recipient in ["a", "b", "c", "d"] {
            if emit_with_backpressure(&emitter, &metrics, system_notice(recipient, "t", "m")).await {
                accepted += 1;
            }
        }
        drop(emitter);

        assert_eq!(accepted, 4);
        assert_eq!(drain.await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_recording_emitter() {
        let emitter = RecordingNotificationEmitter::new();
        emitter.emit(system_notice("a", "t", "m")).await.unwrap();
        emitter.emit(system_notice("b", "t", "m")).await.unwrap();

        assert_eq!(emitter.intents().len(), 2);
        assert_eq!(emitter.intents_for("b").len(), 1);

        emitter.clear();
        assert!(emitter.intents().is_empty());
    }
}
