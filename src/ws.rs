use std::sync::Arc;

use actix::prelude::*;
use actix_web::{error::ErrorUnauthorized, get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::decode_jwt;
use crate::engine;
use crate::models::{Chat, Message};
use crate::types::{ClientEvent, ServerEvent};
use crate::AppState;

#[derive(Message)]
#[rtype(result = "()")]
struct Outbound(String);

/// One authenticated push-channel session. Each inbound event is handled on
/// its own task; the reply comes back to this session only.
pub struct WsSession {
    user_id: Uuid,
    state: Arc<AppState>,
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("Client connected: {}", self.user_id);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("Client disconnected: {}", self.user_id);
    }
}

impl WsSession {
    fn dispatch(&self, event: ClientEvent, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.state.clone();
        let user_id = self.user_id;
        let addr = ctx.address();

        actix::spawn(async move {
            let reply = handle_event(&state, user_id, event).await;
            match serde_json::to_string(&reply) {
                Ok(json) => addr.do_send(Outbound(json)),
                Err(e) => error!("Failed to serialize server event: {:?}", e),
            }
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => self.dispatch(event, ctx),
                Err(e) => {
                    error!("Unrecognized client event: {:?}", e);
                    if let Ok(json) = serde_json::to_string(&ServerEvent::Error {
                        message: "Unrecognized event".to_string(),
                    }) {
                        ctx.text(json);
                    }
                }
            },
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

async fn handle_event(state: &AppState, user_id: Uuid, event: ClientEvent) -> ServerEvent {
    match event {
        ClientEvent::SendMessage {
            message,
            chat_id,
            is_new_chat,
        } => {
            if message.trim().is_empty() {
                return ServerEvent::Error {
                    message: "Message is required".to_string(),
                };
            }
            match engine::handle_send(state, user_id, &message, chat_id, is_new_chat).await {
                Ok(exchange) => ServerEvent::ReceiveMessage {
                    message: exchange.reply,
                    chat_id: exchange.chat_id,
                    label: exchange.label,
                },
                Err(e) => {
                    error!("Error handling message: {:?}", e);
                    ServerEvent::Error {
                        message: "Error processing message".to_string(),
                    }
                }
            }
        }
        ClientEvent::LoadChat { chat_id } => load_chat(state, user_id, chat_id).await,
        ClientEvent::NewChat => match Chat::create(&state.pool, user_id).await {
            Ok(chat) => ServerEvent::ChatCreated { chat_id: chat.id },
            Err(e) => {
                error!("Error creating new chat: {:?}", e);
                ServerEvent::Error {
                    message: "Error creating new chat".to_string(),
                }
            }
        },
    }
}

async fn load_chat(state: &AppState, user_id: Uuid, chat_id: Uuid) -> ServerEvent {
    let owned = match Chat::get_owned(&state.pool, chat_id, user_id).await {
        Ok(chat) => chat,
        Err(e) => {
            error!("Error loading chat: {:?}", e);
            return ServerEvent::Error {
                message: "Error loading chat".to_string(),
            };
        }
    };

    if owned.is_none() {
        return ServerEvent::Error {
            message: "Chat not found".to_string(),
        };
    }

    match Message::list_for_chat(&state.pool, chat_id).await {
        Ok(messages) => ServerEvent::ChatLoaded { messages },
        Err(e) => {
            error!("Error loading chat: {:?}", e);
            ServerEvent::Error {
                message: "Error loading chat".to_string(),
            }
        }
    }
}

#[derive(Deserialize)]
struct WsQuery {
    token: String,
}

/// Browsers cannot set headers on a WebSocket handshake, so the token rides
/// in the query string.
#[get("/ws")]
pub async fn connect(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<WsQuery>,
) -> Result<HttpResponse, Error> {
    let user_id = decode_jwt(&query.token, &app_state.config.jwt_secret)
        .ok_or_else(|| ErrorUnauthorized("Authentication required"))?;

    ws::start(
        WsSession {
            user_id,
            state: app_state.get_ref().clone(),
        },
        &req,
        stream,
    )
}
