use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge};

lazy_static! {
    /// Open chat WebSocket sessions.
    pub static ref CHAT_SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "cookbook_chat_sessions_active",
        "Currently connected chat sessions"
    )
    .expect("failed to register cookbook_chat_sessions_active");

    /// Hub events by kind (message, update, delete, notification).
    pub static ref CHAT_MESSAGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "cookbook_chat_messages_total",
        "Events published to the chat hub segmented by kind",
        &["kind"]
    )
    .expect("failed to register cookbook_chat_messages_total");
}
