use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::errors::StoreError;

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user with a bcrypt-hashed password. Fails with
    /// `DuplicateUser` if the username or email is already taken.
    pub async fn register(
        pool: &PgPool,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, StoreError> {
        let taken: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE username = $1 OR email = $2")
                .bind(username)
                .bind(email)
                .fetch_optional(pool)
                .await?;
        if taken.is_some() {
            return Err(StoreError::DuplicateUser);
        }

        let password_hash = hash(password, DEFAULT_COST)?;

        // The unique constraints still hold if a concurrent registration
        // slipped past the pre-check.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_unique_violation)?;

        debug!("User registered: {}", user.id);
        Ok(user)
    }

    /// Looks up by email and compares the bcrypt hash. Returns `None` for
    /// both an unknown email and a wrong password, so the caller cannot
    /// distinguish the two.
    pub async fn authenticate(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        match user {
            Some(user) if verify(password, &user.password_hash).unwrap_or(false) => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn change_username(
        pool: &PgPool,
        user_id: Uuid,
        new_username: &str,
    ) -> Result<Self, StoreError> {
        let taken: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE username = $1 AND id != $2")
                .bind(new_username)
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        if taken.is_some() {
            return Err(StoreError::DuplicateUser);
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET username = $1 WHERE id = $2 RETURNING *",
        )
        .bind(new_username)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_unique_violation)?;

        debug!("Username updated for user: {}", user.id);
        Ok(user)
    }

    /// Re-verifies the current password before storing the new hash.
    pub async fn change_password(
        pool: &PgPool,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        let user = Self::get(pool, user_id)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        if !verify(current_password, &user.password_hash).unwrap_or(false) {
            return Err(StoreError::InvalidCredentials);
        }

        let password_hash = hash(new_password, DEFAULT_COST)?;
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(pool)
            .await?;

        debug!("Password updated for user: {}", user_id);
        Ok(())
    }

    /// Re-verifies the password, then deletes the user. Chats and messages
    /// go with it via the cascading foreign keys.
    pub async fn delete(
        pool: &PgPool,
        user_id: Uuid,
        password: &str,
    ) -> Result<(), StoreError> {
        let user = Self::get(pool, user_id)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        if !verify(password, &user.password_hash).unwrap_or(false) {
            return Err(StoreError::InvalidCredentials);
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        debug!("User deleted: {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chat, Message};

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn register_rejects_duplicate_username(pool: PgPool) {
        User::register(&pool, "alice", "a@x.com", "pw").await.unwrap();

        let err = User::register(&pool, "alice", "b@x.com", "pw2")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUser));
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn register_rejects_duplicate_email(pool: PgPool) {
        User::register(&pool, "alice", "a@x.com", "pw").await.unwrap();

        let err = User::register(&pool, "bob", "a@x.com", "pw2")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUser));
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn authenticate_gives_one_generic_failure(pool: PgPool) {
        let user = User::register(&pool, "alice", "a@x.com", "hunter2")
            .await
            .unwrap();

        let found = User::authenticate(&pool, "a@x.com", "hunter2").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        // Wrong password and unknown email are indistinguishable.
        assert!(User::authenticate(&pool, "a@x.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(User::authenticate(&pool, "nobody@x.com", "hunter2")
            .await
            .unwrap()
            .is_none());
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn change_password_reverifies_current(pool: PgPool) {
        let user = User::register(&pool, "alice", "a@x.com", "old-pw")
            .await
            .unwrap();

        let err = User::change_password(&pool, user.id, "bad-guess", "new-pw")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));

        User::change_password(&pool, user.id, "old-pw", "new-pw")
            .await
            .unwrap();
        assert!(User::authenticate(&pool, "a@x.com", "new-pw")
            .await
            .unwrap()
            .is_some());
        assert!(User::authenticate(&pool, "a@x.com", "old-pw")
            .await
            .unwrap()
            .is_none());
    }

    #[sqlx::test]
    #[ignore = "needs a running Postgres"]
    async fn delete_cascades_to_chats_and_messages(pool: PgPool) {
        let user = User::register(&pool, "alice", "a@x.com", "pw").await.unwrap();
        let chat = Chat::create(&pool, user.id).await.unwrap();
        Message::append(&pool, chat.id, "hi", "hello").await.unwrap();

        let err = User::delete(&pool, user.id, "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));

        User::delete(&pool, user.id, "pw").await.unwrap();

        assert!(User::get(&pool, user.id).await.unwrap().is_none());
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
