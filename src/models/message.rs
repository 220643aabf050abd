use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::StoreError;

/// One immutable exchange: the user's utterance and the bot's reply,
/// written together in a single insert.
#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_text: String,
    pub bot_text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub async fn append(
        pool: &PgPool,
        chat_id: Uuid,
        user_text: &str,
        bot_text: &str,
    ) -> Result<Self, StoreError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, chat_id, user_text, bot_text)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(chat_id)
        .bind(user_text)
        .bind(bot_text)
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_message_insert)?;

        Ok(message)
    }

    /// All messages of a chat, oldest first. Empty vec if there are none.
    pub async fn list_for_chat(pool: &PgPool, chat_id: Uuid) -> Result<Vec<Self>, StoreError> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE chat_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(chat_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chat, User};

    async fn fixture_chat(pool: &PgPool) -> Uuid {
        let user = User::register(pool, "alice", "a@x.com", "pw").await.unwrap();
        Chat::create(pool, user.id).await.unwrap().id
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn append_then_list_round_trips(pool: PgPool) {
        let chat_id = fixture_chat(&pool).await;

        Message::append(&pool, chat_id, "first q", "first a")
            .await
            .unwrap();
        Message::append(&pool, chat_id, "second q", "second a")
            .await
            .unwrap();

        let messages = Message::list_for_chat(&pool, chat_id).await.unwrap();
        assert_eq!(messages.len(), 2);

        let last = messages.last().unwrap();
        assert_eq!(last.user_text, "second q");
        assert_eq!(last.bot_text, "second a");
        assert!(messages[0].created_at <= messages[1].created_at);
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn list_of_empty_chat_is_empty(pool: PgPool) {
        let chat_id = fixture_chat(&pool).await;
        assert!(Message::list_for_chat(&pool, chat_id).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn append_to_missing_chat_fails(pool: PgPool) {
        let err = Message::append(&pool, Uuid::new_v4(), "q", "a")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ChatNotFound));
    }
}
