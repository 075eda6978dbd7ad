use crate::metrics::chat::CHAT_MESSAGES_TOTAL;
use crate::realtime::protocol::{NotificationKind, OutboundEvent};
use tokio::sync::broadcast;
use tracing::{debug, error};

/// Fan-out point for chat events. Cloning shares the same channel.
#[derive(Clone)]
pub struct ChatHub {
    tx: broadcast::Sender<String>,
}

impl ChatHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Serialise and broadcast an event. Returns how many sessions it reached.
    pub fn publish(&self, event: &OutboundEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to serialise chat event");
                return 0;
            }
        };

        CHAT_MESSAGES_TOTAL.with_label_values(&[event.kind()]).inc();

        // Err only means nobody is listening
        match self.tx.send(payload) {
            Ok(n) => n,
            Err(_) => {
                debug!(kind = event.kind(), "no chat sessions connected");
                0
            }
        }
    }

    pub fn notify(&self, kind: NotificationKind, user: &str, text: impl Into<String>) -> usize {
        self.publish(&OutboundEvent::Notification {
            kind,
            user: user.to_string(),
            text: text.into(),
        })
    }
}
