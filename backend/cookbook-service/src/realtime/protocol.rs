use crate::models::ChatMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events sent by chat clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    SendMessage { content: String },
    UpdateMessage { id: Uuid, content: String },
    DeleteMessage { id: Uuid },
}

impl InboundEvent {
    /// Rejects blank message content.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            InboundEvent::SendMessage { content } | InboundEvent::UpdateMessage { content, .. }
                if content.trim().is_empty() =>
            {
                Err("message content must not be blank")
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
}

/// Events pushed to chat clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    ChatMessage { message: ChatMessage },
    MessageUpdated { message: ChatMessage },
    MessageDeleted { id: Uuid },
    Notification { kind: NotificationKind, user: String, text: String },
    /// Sent only to the session that caused it
    Error { message: String },
}

impl OutboundEvent {
    /// Metric label for this event.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::ChatMessage { .. } => "message",
            OutboundEvent::MessageUpdated { .. } => "update",
            OutboundEvent::MessageDeleted { .. } => "delete",
            OutboundEvent::Notification { .. } => "notification",
            OutboundEvent::Error { .. } => "error",
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        OutboundEvent::Error {
            message: message.into(),
        }
    }
}
