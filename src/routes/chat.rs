use std::sync::Arc;

use actix_web::{
    error::{ErrorBadRequest, ErrorInternalServerError, ErrorNotFound},
    get, post, web, Error, Responder,
};
use tracing::error;
use uuid::Uuid;

use crate::engine;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Chat, Message};
use crate::types::{MessagesResponse, NewChatResponse, SendMessageRequest, SendMessageResponse};
use crate::AppState;

#[post("/send")]
pub async fn send_message(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    web::Json(req): web::Json<SendMessageRequest>,
) -> Result<impl Responder, Error> {
    if req.message.trim().is_empty() {
        return Err(ErrorBadRequest("Message is required"));
    }

    let exchange = engine::handle_send(
        &app_state,
        authenticated_user.user_id,
        &req.message,
        req.chat_id,
        req.is_new_chat,
    )
    .await
    .map_err(|e| {
        error!("Failed to handle message: {:?}", e);
        ErrorInternalServerError("Failed to process chat")
    })?;

    Ok(web::Json(SendMessageResponse {
        response: exchange.reply,
        chat_id: exchange.chat_id,
        label: exchange.label,
    }))
}

#[post("/new")]
pub async fn new_chat(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
) -> Result<impl Responder, Error> {
    let chat = Chat::create(&app_state.pool, authenticated_user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to create chat: {:?}", e);
            ErrorInternalServerError("Error creating new chat")
        })?;

    Ok(web::Json(NewChatResponse { chat_id: chat.id }))
}

#[get("/history")]
pub async fn history(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
) -> Result<impl Responder, Error> {
    let summaries = Chat::summaries_for_user(&app_state.pool, authenticated_user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to get chat history: {:?}", e);
            ErrorInternalServerError("Error getting chat history")
        })?;

    Ok(web::Json(summaries))
}

#[get("/{chat_id}/messages")]
pub async fn messages(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    chat_id: web::Path<Uuid>,
) -> Result<impl Responder, Error> {
    let chat_id = chat_id.into_inner();

    // The read path verifies ownership; unknown and foreign chats look alike.
    Chat::get_owned(&app_state.pool, chat_id, authenticated_user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch chat: {:?}", e);
            ErrorInternalServerError("Error getting chat history")
        })?
        .ok_or_else(|| ErrorNotFound("Chat not found"))?;

    let messages = Message::list_for_chat(&app_state.pool, chat_id)
        .await
        .map_err(|e| {
            error!("Failed to list messages: {:?}", e);
            ErrorInternalServerError("Error getting chat history")
        })?;

    Ok(web::Json(MessagesResponse { messages }))
}
