use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::Label;
use crate::models::Message;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub chat_id: Option<Uuid>,
    #[serde(default)]
    pub is_new_chat: bool,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub response: String,
    pub chat_id: Uuid,
    pub label: Label,
}

#[derive(Serialize)]
pub struct NewChatResponse {
    pub chat_id: Uuid,
}

#[derive(Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}
