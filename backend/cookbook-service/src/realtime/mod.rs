//! Group chat and live notifications over WebSocket
//!
//! All sessions share one [`ChatHub`]; every published event reaches every
//! connected session.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::ChatHub;
pub use protocol::{InboundEvent, NotificationKind, OutboundEvent};
pub use session::chat_websocket;
