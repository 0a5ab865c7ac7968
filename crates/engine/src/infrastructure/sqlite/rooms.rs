//! Room repository backed by SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use emberhall_domain::{Room, RoomCode, RoomStatus};

use crate::infrastructure::ports::{RepoError, RoomRepo};

pub struct SqliteRoomRepo {
    pool: SqlitePool,
}

impl SqliteRoomRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn room_from_row(row: &SqliteRow) -> Result<Room, RepoError> {
    let code: String = row
        .try_get("code")
        .map_err(|e| RepoError::database("room_from_row", e))?;
    let status: String = row
        .try_get("status")
        .map_err(|e| RepoError::database("room_from_row", e))?;
    let message_count: i64 = row
        .try_get("message_count")
        .map_err(|e| RepoError::database("room_from_row", e))?;
    let summary_count: i64 = row
        .try_get("summary_count")
        .map_err(|e| RepoError::database("room_from_row", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| RepoError::database("room_from_row", e))?;

    Ok(Room {
        code: RoomCode::parse(&code).map_err(|e| RepoError::serialization(e))?,
        leader_name: row
            .try_get("leader_name")
            .map_err(|e| RepoError::database("room_from_row", e))?,
        status: status
            .parse::<RoomStatus>()
            .map_err(|e| RepoError::serialization(e))?,
        turn_mode: row
            .try_get("turn_mode")
            .map_err(|e| RepoError::database("room_from_row", e))?,
        dm_active: row
            .try_get("dm_active")
            .map_err(|e| RepoError::database("room_from_row", e))?,
        message_count: message_count.max(0) as u64,
        summary: row
            .try_get("summary")
            .map_err(|e| RepoError::database("room_from_row", e))?,
        summary_count: summary_count.max(0) as u64,
        created_at,
    })
}

#[async_trait]
impl RoomRepo for SqliteRoomRepo {
    async fn get_by_code(&self, code: &RoomCode) -> Result<Option<Room>, RepoError> {
        let row = sqlx::query("SELECT * FROM rooms WHERE code = ?")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_room_by_code", e))?;

        row.as_ref().map(room_from_row).transpose()
    }

    async fn insert(&self, room: &Room) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO rooms (code, leader_name, status, turn_mode, dm_active,
                                message_count, summary, summary_count, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(room.code.as_str())
        .bind(&room.leader_name)
        .bind(room.status.as_str())
        .bind(room.turn_mode)
        .bind(room.dm_active)
        .bind(room.message_count as i64)
        .bind(&room.summary)
        .bind(room.summary_count as i64)
        .bind(room.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("insert_room", e))?;

        Ok(())
    }

    async fn set_turn_mode(&self, code: &RoomCode, enabled: bool) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE rooms SET turn_mode = ? WHERE code = ?")
            .bind(enabled)
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("set_turn_mode", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Room", code));
        }
        Ok(())
    }

    async fn set_status(&self, code: &RoomCode, status: RoomStatus) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE rooms SET status = ? WHERE code = ?")
            .bind(status.as_str())
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("set_status", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Room", code));
        }
        Ok(())
    }

    async fn set_dm_active(&self, code: &RoomCode, active: bool) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE rooms SET dm_active = ? WHERE code = ?")
            .bind(active)
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("set_dm_active", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Room", code));
        }
        Ok(())
    }

    async fn update_summary(
        &self,
        code: &RoomCode,
        summary: &str,
        summary_count: u64,
    ) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE rooms SET summary = ?, summary_count = ? WHERE code = ?")
            .bind(summary)
            .bind(summary_count as i64)
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_summary", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Room", code));
        }
        Ok(())
    }
}
