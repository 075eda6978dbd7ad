use crate::metrics::chat::CHAT_SESSIONS_ACTIVE;
use crate::realtime::hub::ChatHub;
use crate::realtime::protocol::{InboundEvent, OutboundEvent};
use crate::repository::{ChatRepository, UserRepository};
use actix::{Actor, ActorContext, AsyncContext, Handler, Message as ActixMessage, StreamHandler};
use actix_middleware::{bearer_token, Principal, SessionVerifier};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use sqlx::PgPool;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

// Text for this session only
#[derive(ActixMessage)]
#[rtype(result = "()")]
struct TextMessage(String);

struct WsSession {
    principal: Principal,
    hub: ChatHub,
    chat: ChatRepository,
    users: UserRepository,
    hb: Instant,
    /// Client events waiting for the session worker
    inbound: mpsc::UnboundedSender<InboundEvent>,
    pending: Option<mpsc::UnboundedReceiver<InboundEvent>>,
}

impl WsSession {
    fn new(principal: Principal, hub: ChatHub, pool: PgPool) -> Self {
        let (inbound, pending) = mpsc::unbounded_channel();
        Self {
            principal,
            hub,
            chat: ChatRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            hb: Instant::now(),
            inbound,
            pending: Some(pending),
        }
    }

    /// Start the worker that applies this session's events one at a time.
    /// It ends when the session drops its sender.
    fn start_worker(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(rx) = self.pending.take() else {
            return;
        };
        let principal = self.principal.clone();
        let chat = self.chat.clone();
        let users = self.users.clone();
        let hub = self.hub.clone();
        let addr = ctx.address();

        actix::spawn(process_in_order(rx, move |evt| {
            let principal = principal.clone();
            let chat = chat.clone();
            let users = users.clone();
            let hub = hub.clone();
            let addr = addr.clone();
            async move {
                if let Err(message) = handle_inbound(principal, evt, chat, users, hub).await {
                    addr.do_send(TextMessage(error_frame(message)));
                }
            }
        }));
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                warn!(user_id = %act.principal.user_id, "WebSocket heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

/// Awaits `apply` for each queued event before taking the next, so events
/// take effect in the order they arrived.
async fn process_in_order<E, F, Fut>(mut rx: mpsc::UnboundedReceiver<E>, mut apply: F)
where
    F: FnMut(E) -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(evt) = rx.recv().await {
        apply(evt).await;
    }
}

/// Apply one client event. Errors are reported to the sending session only.
async fn handle_inbound(
    principal: Principal,
    evt: InboundEvent,
    chat: ChatRepository,
    users: UserRepository,
    hub: ChatHub,
) -> Result<(), String> {
    evt.validate().map_err(str::to_string)?;

    match evt {
        InboundEvent::SendMessage { content } => {
            users
                .ensure(principal.user_id, &principal.username, principal.email.as_deref())
                .await
                .map_err(|e| {
                    warn!(error = %e, "failed to provision chat sender");
                    "could not send message".to_string()
                })?;
            let message = chat
                .insert(principal.user_id, &principal.username, content.trim())
                .await
                .map_err(|e| {
                    warn!(error = %e, "failed to store chat message");
                    "could not send message".to_string()
                })?;
            hub.publish(&OutboundEvent::ChatMessage { message });
        }
        InboundEvent::UpdateMessage { id, content } => {
            let updated = chat
                .update_own(id, principal.user_id, content.trim())
                .await
                .map_err(|e| {
                    warn!(error = %e, message_id = %id, "failed to update chat message");
                    "could not update message".to_string()
                })?;
            match updated {
                Some(message) => {
                    hub.publish(&OutboundEvent::MessageUpdated { message });
                }
                None => return Err("message not found or not yours".to_string()),
            }
        }
        InboundEvent::DeleteMessage { id } => {
            let deleted = chat.delete_own(id, principal.user_id).await.map_err(|e| {
                warn!(error = %e, message_id = %id, "failed to delete chat message");
                "could not delete message".to_string()
            })?;
            if !deleted {
                return Err("message not found or not yours".to_string());
            }
            hub.publish(&OutboundEvent::MessageDeleted { id });
        }
    }

    Ok(())
}

fn error_frame(message: String) -> String {
    serde_json::to_string(&OutboundEvent::error(message))
        .unwrap_or_else(|_| r#"{"type":"error","message":"internal error"}"#.to_string())
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(user_id = %self.principal.user_id, "chat session started");
        CHAT_SESSIONS_ACTIVE.inc();

        self.hb(ctx);
        self.start_worker(ctx);
        ctx.add_stream(BroadcastStream::new(self.hub.subscribe()));
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        CHAT_SESSIONS_ACTIVE.dec();
        info!(user_id = %self.principal.user_id, "chat session stopped");
    }
}

impl Handler<TextMessage> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: TextMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// Hub events
impl StreamHandler<Result<String, BroadcastStreamRecvError>> for WsSession {
    fn handle(&mut self, item: Result<String, BroadcastStreamRecvError>, ctx: &mut Self::Context) {
        match item {
            Ok(payload) => ctx.text(payload),
            Err(e) => {
                warn!(user_id = %self.principal.user_id, error = %e, "chat session lagging, events dropped");
            }
        }
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        ctx.stop();
    }
}

// Client frames
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.hb = Instant::now();
                match serde_json::from_str::<InboundEvent>(&text) {
                    Ok(evt) => {
                        if self.inbound.send(evt).is_err() {
                            warn!(user_id = %self.principal.user_id, "chat worker gone, closing session");
                            ctx.stop();
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "unparseable chat frame");
                        ctx.text(error_frame(format!("invalid event: {}", e)));
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                ctx.text(error_frame("binary frames are not supported".to_string()));
            }
            Ok(ws::Message::Close(reason)) => {
                debug!("WebSocket close message received: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                warn!(error = %e, "WebSocket protocol error");
                ctx.stop();
            }
            _ => {}
        }
    }
}

/// `GET /chat-websocket?token=...`
///
/// Browsers cannot set headers on a WebSocket handshake, so the session
/// token may come from the query string; a bearer header also works.
pub async fn chat_websocket(
    req: HttpRequest,
    stream: web::Payload,
    params: web::Query<WsParams>,
    verifier: web::Data<SessionVerifier>,
    hub: web::Data<ChatHub>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, Error> {
    let token = match params.token.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(token) => token,
        None => bearer_token(&req)?,
    };
    let principal = verifier.authenticate(token)?;

    ws::start(
        WsSession::new(principal, hub.get_ref().clone(), pool.get_ref().clone()),
        &req,
        stream,
    )
}
