//! Message log repository backed by SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use emberhall_domain::{Message, MessageId, MessageKind, RoomCode};

use crate::infrastructure::ports::{MessageRepo, NewMessage, RepoError};

pub struct SqliteMessageRepo {
    pool: SqlitePool,
}

impl SqliteMessageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &SqliteRow) -> Result<Message, RepoError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepoError::database("message_from_row", e))?;
    let room_code: String = row
        .try_get("room_code")
        .map_err(|e| RepoError::database("message_from_row", e))?;
    let kind: String = row
        .try_get("kind")
        .map_err(|e| RepoError::database("message_from_row", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| RepoError::database("message_from_row", e))?;

    Ok(Message {
        id: MessageId::from_uuid(Uuid::parse_str(&id).map_err(|e| RepoError::serialization(e))?),
        seq: row
            .try_get("seq")
            .map_err(|e| RepoError::database("message_from_row", e))?,
        room_code: RoomCode::parse(&room_code).map_err(|e| RepoError::serialization(e))?,
        player_name: row
            .try_get("player_name")
            .map_err(|e| RepoError::database("message_from_row", e))?,
        kind: kind
            .parse::<MessageKind>()
            .map_err(|e| RepoError::serialization(e))?,
        body: row
            .try_get("body")
            .map_err(|e| RepoError::database("message_from_row", e))?,
        created_at,
    })
}

#[async_trait]
impl MessageRepo for SqliteMessageRepo {
    async fn append(&self, message: &NewMessage) -> Result<u64, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("append_message", e))?;

        sqlx::query(
            "INSERT INTO messages (id, room_code, player_name, kind, body, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(MessageId::new().to_string())
        .bind(message.room_code.as_str())
        .bind(&message.player_name)
        .bind(message.kind.as_str())
        .bind(&message.body)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("append_message", e))?;

        // Bump the room counter in the same transaction so the count can
        // never drift from the log.
        let new_count: Option<i64> = sqlx::query_scalar(
            "UPDATE rooms SET message_count = message_count + 1
             WHERE code = ? RETURNING message_count",
        )
        .bind(message.room_code.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepoError::database("append_message", e))?;

        let Some(new_count) = new_count else {
            return Err(RepoError::not_found("Room", &message.room_code));
        };

        tx.commit()
            .await
            .map_err(|e| RepoError::database("append_message", e))?;

        Ok(new_count.max(0) as u64)
    }

    async fn list(&self, code: &RoomCode) -> Result<Vec<Message>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE room_code = ? ORDER BY created_at ASC, seq ASC",
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_messages", e))?;

        rows.iter().map(message_from_row).collect()
    }

    async fn list_recent(&self, code: &RoomCode, limit: u32) -> Result<Vec<Message>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE room_code = ?
             ORDER BY created_at DESC, seq DESC LIMIT ?",
        )
        .bind(code.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_recent_messages", e))?;

        let mut messages = rows
            .iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }
}
