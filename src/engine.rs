use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use rand::seq::SliceRandom;
use tokio::time::timeout;
use tracing::error;
use uuid::Uuid;

use crate::classifier::{classify, Label};
use crate::errors::StoreError;
use crate::models::{Chat, Message};
use crate::prompts::Prompts;
use crate::AppState;

/// Vocabulary a reply must touch to count as on-topic; otherwise the
/// redirect disclaimer is appended.
const REPLY_DOMAIN_KEYWORDS: &[&str] = &[
    "iot", "internet of things", "embedded", "esp32", "arduino", "raspberry pi",
    "sensor", "actuator", "mqtt", "wifi", "bluetooth", "microcontroller",
    "circuit", "electronics", "hardware", "firmware", "protocol", "wireless",
    "network", "data", "analytics", "automation", "control", "monitoring",
    "device", "system", "programming", "code", "development", "project",
];

/// The outcome of one send-message interaction, shared by the HTTP and
/// WebSocket transports.
pub struct Exchange {
    pub chat_id: Uuid,
    pub reply: String,
    pub label: Label,
}

/// Resolves the target chat, produces a reply, and persists the exchange.
pub async fn handle_send(
    state: &AppState,
    user_id: Uuid,
    text: &str,
    chat_id: Option<Uuid>,
    is_new: bool,
) -> Result<Exchange, StoreError> {
    let chat_id = Chat::ensure(&state.pool, user_id, chat_id, is_new).await?;
    let (reply, label) = respond(state, chat_id, text).await;
    Ok(Exchange {
        chat_id,
        reply,
        label,
    })
}

/// Produces a reply for `text` and records the exchange. Greetings are
/// answered locally; everything else goes to the provider. Provider failures
/// become the fixed apology with the `error` label. The exchange is persisted
/// in every case, and a persistence failure never blocks the reply.
pub async fn respond(state: &AppState, chat_id: Uuid, text: &str) -> (String, Label) {
    let label = classify(text);

    let (reply, label) = if label == Label::Greeting {
        (greeting_reply(), Label::Greeting)
    } else {
        match complete(state, label, text).await {
            Ok(raw) => (apply_domain_disclaimer(raw), label),
            Err(e) => {
                error!("Provider call failed: {:?}", e);
                (Prompts::APOLOGY.to_string(), Label::Error)
            }
        }
    };

    if let Err(e) = Message::append(&state.pool, chat_id, text, &reply).await {
        // Reply delivery is prioritized over durability of history.
        error!("Failed to persist exchange for chat {}: {:?}", chat_id, e);
    }

    (reply, label)
}

fn greeting_reply() -> String {
    Prompts::GREETING_REPLIES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&Prompts::GREETING_REPLIES[0])
        .to_string()
}

fn user_prompt(label: Label, text: &str) -> String {
    format!("Question Type: {}\n{}", label, text)
}

fn apply_domain_disclaimer(reply: String) -> String {
    let lower = reply.to_lowercase();
    if REPLY_DOMAIN_KEYWORDS.iter().any(|k| lower.contains(k)) {
        reply
    } else {
        format!("{}{}", reply, Prompts::DOMAIN_DISCLAIMER)
    }
}

/// One chat-completion round trip: fixed persona, the user message annotated
/// with its classification, no streaming, no retries.
async fn complete(state: &AppState, label: Label, text: &str) -> Result<String> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(state.config.model.clone())
        .messages([
            ChatCompletionRequestSystemMessageArgs::default()
                .content(Prompts::SYSTEM)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt(label, text))
                .build()?
                .into(),
        ])
        .temperature(0.7)
        .max_tokens(4096u32)
        .top_p(0.9)
        .frequency_penalty(0.5)
        .presence_penalty(0.5)
        .build()?;

    let response = timeout(
        Duration::from_secs(state.config.provider_timeout_secs),
        state.llm_client.chat().create(request),
    )
    .await
    .context("provider call timed out")??;

    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .map(|content| content.trim().to_string())
        .ok_or_else(|| anyhow!("provider returned no completion"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_openai::config::OpenAIConfig;
    use async_openai::Client;
    use sqlx::PgPool;

    use super::*;
    use crate::models::User;
    use crate::AppConfig;

    fn unreachable_provider_state(pool: PgPool) -> AppState {
        // Discard port plus a zero-second timeout, so the call can never
        // complete regardless of the local network.
        let api_base = "http://127.0.0.1:9";
        AppState {
            pool,
            config: Arc::new(AppConfig {
                database_url: String::new(),
                jwt_secret: "test-secret".to_string(),
                provider_api_key: "test-key".to_string(),
                provider_api_base: api_base.to_string(),
                model: "test-model".to_string(),
                provider_timeout_secs: 0,
                bind_addr: String::new(),
            }),
            llm_client: Client::with_config(
                OpenAIConfig::new()
                    .with_api_key("test-key")
                    .with_api_base(api_base),
            ),
        }
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn provider_failure_yields_apology_and_still_persists(pool: PgPool) {
        let user = User::register(&pool, "carol", "carol@example.com", "hunter2")
            .await
            .unwrap();
        let chat = Chat::create(&pool, user.id).await.unwrap();
        let state = unreachable_provider_state(pool.clone());

        let question = "why does my esp32 reboot when wifi connects";
        let (reply, label) = respond(&state, chat.id, question).await;

        assert_eq!(reply, Prompts::APOLOGY);
        assert_eq!(label, Label::Error);

        let messages = Message::list_for_chat(&pool, chat.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user_text, question);
        assert_eq!(messages[0].bot_text, Prompts::APOLOGY);
    }

    #[test]
    fn greeting_reply_comes_from_fixed_set() {
        for _ in 0..20 {
            let reply = greeting_reply();
            assert!(Prompts::GREETING_REPLIES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn user_prompt_carries_label_annotation() {
        let prompt = user_prompt(Label::Code, "blink an led on esp32");
        assert_eq!(prompt, "Question Type: code\nblink an led on esp32");
    }

    #[test]
    fn off_topic_reply_gets_disclaimer() {
        let reply = apply_domain_disclaimer("The capital of France is Paris.".to_string());
        assert!(reply.ends_with(Prompts::DOMAIN_DISCLAIMER));
    }

    #[test]
    fn on_topic_reply_is_untouched() {
        let text = "An ESP32 reads the sensor over I2C.".to_string();
        assert_eq!(apply_domain_disclaimer(text.clone()), text);
    }

    #[test]
    fn domain_keywords_are_lowercase() {
        // The check lower-cases the reply only, so the table must be
        // lowercase to match.
        for keyword in REPLY_DOMAIN_KEYWORDS {
            assert_eq!(*keyword, keyword.to_lowercase());
        }
    }
}
