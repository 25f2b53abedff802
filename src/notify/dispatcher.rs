//! Background delivery of notification intents

use super::inbox::NotificationInbox;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::types::NotificationIntent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A delivery channel for notifications (in-app inbox, web push, email)
#[async_trait]
pub trait NotificationDelivery: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn deliver(&self, intent: &NotificationIntent) -> Result<()>;
}

#[async_trait]
impl NotificationDelivery for NotificationInbox {
    fn name(&self) -> &'static str {
        "inbox"
    }

    async fn deliver(&self, intent: &NotificationIntent) -> Result<()> {
        self.store(intent.clone()).map(|_| ())
    }
}

/// Drains the intent channel into every configured delivery
pub struct NotificationDispatcher {
    deliveries: Vec<Arc<dyn NotificationDelivery>>,
    metrics: Arc<MetricsCollector>,
}

impl NotificationDispatcher {
    pub fn new(metrics: Arc<MetricsCollector>) -> Self {
        Self {
            deliveries: Vec::new(),
            metrics,
        }
    }

    /// Add a delivery channel
    pub fn with_delivery(mut self, delivery: Arc<dyn NotificationDelivery>) -> Self {
        self.deliveries.push(delivery);
        self
    }

    /// Spawn the dispatch loop.
    ///
    /// The loop ends when every emitter is dropped, or when `shutdown` flips
    /// to `true`; in the latter case intents already queued are still
    /// delivered.
    pub fn spawn(
        self,
        receiver: mpsc::Receiver<NotificationIntent>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(receiver, shutdown).await })
    }

    async fn run(
        self,
        mut receiver: mpsc::Receiver<NotificationIntent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            "Notification dispatcher started with {} delivery channel(s)",
            self.deliveries.len()
        );

        loop {
            tokio::select! {
                maybe_intent = receiver.recv() => {
                    match maybe_intent {
                        Some(intent) => self.dispatch(intent).await,
                        None => break,
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        receiver.close();
                        while let Some(intent) = receiver.recv().await {
                            self.dispatch(intent).await;
                        }
                        break;
                    }
                }
            }
        }

        info!("Notification dispatcher stopped");
    }

    /// Deliver one intent to every channel; failures are logged, never retried
    pub async fn dispatch(&self, intent: NotificationIntent) {
        for delivery in &self.deliveries {
            match delivery.deliver(&intent).await {
                Ok(()) => {
                    debug!(
                        "Delivered {:?} notification to '{}' via {}",
                        intent.kind,
                        intent.recipient,
                        delivery.name()
                    );
                    self.metrics.record_notification(intent.kind, "delivered");
                }
                Err(e) => {
                    warn!(
                        "Delivery of {:?} notification to '{}' via {} failed: {}",
                        intent.kind,
                        intent.recipient,
                        delivery.name(),
                        e
                    );
                    self.metrics.record_notification(intent.kind, "failed");
                }
            }
        }
    }
}
