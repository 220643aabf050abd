use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::Label;
use crate::models::Message;

/// Events the client sends over the push channel. The JSON surface mirrors
/// the HTTP one: send a message, load a chat, open a new chat.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    SendMessage {
        message: String,
        chat_id: Option<Uuid>,
        #[serde(default)]
        is_new_chat: bool,
    },
    LoadChat {
        chat_id: Uuid,
    },
    NewChat,
}

/// Events pushed back to the originating session.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    ReceiveMessage {
        message: String,
        chat_id: Uuid,
        label: Label,
    },
    ChatLoaded {
        messages: Vec<Message>,
    },
    ChatCreated {
        chat_id: Uuid,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_event_parses_with_defaults() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"send_message","message":"hi"}"#).unwrap();
        match event {
            ClientEvent::SendMessage {
                message,
                chat_id,
                is_new_chat,
            } => {
                assert_eq!(message, "hi");
                assert!(chat_id.is_none());
                assert!(!is_new_chat);
            }
            _ => panic!("wrong event variant"),
        }
    }

    #[test]
    fn new_chat_event_parses() {
        let event: ClientEvent = serde_json::from_str(r#"{"type":"new_chat"}"#).unwrap();
        assert!(matches!(event, ClientEvent::NewChat));
    }

    #[test]
    fn server_event_is_tagged() {
        let chat_id = Uuid::new_v4();
        let json = serde_json::to_value(ServerEvent::ChatCreated { chat_id }).unwrap();
        assert_eq!(json["type"], "chat_created");
        assert_eq!(json["chat_id"], chat_id.to_string());
    }

    #[test]
    fn receive_message_carries_label() {
        let json = serde_json::to_value(ServerEvent::ReceiveMessage {
            message: "ok".into(),
            chat_id: Uuid::new_v4(),
            label: Label::General,
        })
        .unwrap();
        assert_eq!(json["type"], "receive_message");
        assert_eq!(json["label"], "general");
    }
}
