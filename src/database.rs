// src/database.rs

//! Postgres-backed [`ChatStore`].
//!
//! Chats are keyed by the normalized user pair; messages carry a serial
//! ordering column and a JSONB map of per-reader read timestamps. The
//! schema is bootstrapped at connect time.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use crate::models::{ChatId, Message, MessageId, UserId, UserProfile};
use crate::storage::{ChatStore, StorageError, StoreResult};

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and creates the tables if they do not exist.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chats (
                user_lo UUID NOT NULL,
                user_hi UUID NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (user_lo, user_hi)
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                id UUID PRIMARY KEY,
                user_lo UUID NOT NULL,
                user_hi UUID NOT NULL,
                author UUID NOT NULL,
                text TEXT NOT NULL,
                sent_at TIMESTAMPTZ NOT NULL,
                read_status JSONB NOT NULL DEFAULT '{}',
                seq BIGSERIAL
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS messages_chat_seq
                ON messages (user_lo, user_hi, seq)",
        )
        .execute(&pool)
        .await?;

        info!("database schema ready");
        Ok(Self { pool })
    }
}

fn decode_message(row: &PgRow) -> StoreResult<Message> {
    let read_status: serde_json::Value = row.try_get("read_status")?;
    let read_status = serde_json::from_value(read_status)
        .map_err(|err| StorageError::Backend(err.to_string()))?;
    Ok(Message {
        id: row.try_get("id")?,
        author: row.try_get("author")?,
        text: row.try_get("text")?,
        sent_at: row.try_get("sent_at")?,
        read_status,
    })
}

#[async_trait]
impl ChatStore for PgStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(UserProfile {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })),
            None => Ok(None),
        }
    }

    async fn find_chat(&self, a: UserId, b: UserId) -> StoreResult<Option<ChatId>> {
        let chat_id = ChatId::of(a, b);
        let [lo, hi] = chat_id.participants();
        let row = sqlx::query("SELECT 1 FROM chats WHERE user_lo = $1 AND user_hi = $2")
            .bind(lo)
            .bind(hi)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|_| chat_id))
    }

    async fn append_message(
        &self,
        author: UserId,
        receiver: UserId,
        text: &str,
    ) -> StoreResult<(ChatId, Message)> {
        let chat_id = ChatId::of(author, receiver);
        let [lo, hi] = chat_id.participants();
        let message = Message {
            id: Uuid::new_v4(),
            author,
            text: text.to_string(),
            sent_at: Utc::now(),
            read_status: Default::default(),
        };

        let mut tx = self.pool.begin().await?;
        // First contact creates the chat; the normalized pair key makes
        // concurrent creations from both directions converge.
        sqlx::query(
            "INSERT INTO chats (user_lo, user_hi) VALUES ($1, $2)
                ON CONFLICT DO NOTHING",
        )
        .bind(lo)
        .bind(hi)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO messages (id, user_lo, user_hi, author, text, sent_at)
                VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(lo)
        .bind(hi)
        .bind(author)
        .bind(&message.text)
        .bind(message.sent_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok((chat_id, message))
    }

    async fn messages(&self, chat_id: ChatId) -> StoreResult<Vec<Message>> {
        let [lo, hi] = chat_id.participants();
        let rows = sqlx::query(
            "SELECT id, author, text, sent_at, read_status FROM messages
                WHERE user_lo = $1 AND user_hi = $2 ORDER BY seq",
        )
        .bind(lo)
        .bind(hi)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(decode_message).collect()
    }

    async fn stamp_read(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reader: UserId,
    ) -> StoreResult<Option<Message>> {
        if !chat_id.includes(reader) {
            return Ok(None);
        }
        let [lo, hi] = chat_id.participants();
        let row = sqlx::query(
            "SELECT id, author, text, sent_at, read_status FROM messages
                WHERE id = $1 AND user_lo = $2 AND user_hi = $3",
        )
        .bind(message_id)
        .bind(lo)
        .bind(hi)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut message = decode_message(&row)?;
        if message.author == reader {
            return Ok(None);
        }
        if message.read_status.contains_key(&reader) {
            return Ok(Some(message));
        }

        let read_at = Utc::now();
        sqlx::query(
            "UPDATE messages
                SET read_status = read_status || jsonb_build_object($1::text, to_jsonb($2::timestamptz))
                WHERE id = $3 AND NOT jsonb_exists(read_status, $1::text)",
        )
        .bind(reader.to_string())
        .bind(read_at)
        .bind(message_id)
        .execute(&self.pool)
        .await?;
        message.read_status.insert(reader, read_at);
        Ok(Some(message))
    }

    async fn stamp_all_unread(&self, chat_id: ChatId, reader: UserId) -> StoreResult<usize> {
        if !chat_id.includes(reader) {
            return Ok(0);
        }
        let [lo, hi] = chat_id.participants();
        let result = sqlx::query(
            "UPDATE messages
                SET read_status = read_status || jsonb_build_object($1::text, to_jsonb($2::timestamptz))
                WHERE user_lo = $3 AND user_hi = $4
                  AND author <> $5
                  AND NOT jsonb_exists(read_status, $1::text)",
        )
        .bind(reader.to_string())
        .bind(Utc::now())
        .bind(lo)
        .bind(hi)
        .bind(reader)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() as usize)
    }
}
