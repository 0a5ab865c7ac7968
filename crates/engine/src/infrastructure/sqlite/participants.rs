//! Participant repository backed by SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use emberhall_domain::{Participant, ParticipantId, RoomCode};

use crate::infrastructure::ports::{ParticipantRepo, RepoError};

pub struct SqliteParticipantRepo {
    pool: SqlitePool,
}

impl SqliteParticipantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn participant_from_row(row: &SqliteRow) -> Result<Participant, RepoError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepoError::database("participant_from_row", e))?;
    let room_code: String = row
        .try_get("room_code")
        .map_err(|e| RepoError::database("participant_from_row", e))?;
    let joined_at: DateTime<Utc> = row
        .try_get("joined_at")
        .map_err(|e| RepoError::database("participant_from_row", e))?;

    Ok(Participant {
        id: ParticipantId::from_uuid(
            Uuid::parse_str(&id).map_err(|e| RepoError::serialization(e))?,
        ),
        room_code: RoomCode::parse(&room_code).map_err(|e| RepoError::serialization(e))?,
        player_name: row
            .try_get("player_name")
            .map_err(|e| RepoError::database("participant_from_row", e))?,
        joined_at,
    })
}

#[async_trait]
impl ParticipantRepo for SqliteParticipantRepo {
    async fn get(&self, id: ParticipantId) -> Result<Option<Participant>, RepoError> {
        let row = sqlx::query("SELECT * FROM participants WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_participant", e))?;

        row.as_ref().map(participant_from_row).transpose()
    }

    async fn list_by_room(&self, code: &RoomCode) -> Result<Vec<Participant>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM participants WHERE room_code = ? ORDER BY joined_at ASC, id ASC",
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_participants", e))?;

        rows.iter().map(participant_from_row).collect()
    }

    async fn insert_if_capacity(
        &self,
        participant: &Participant,
        max: u32,
    ) -> Result<bool, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("insert_participant", e))?;

        let occupied: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM participants WHERE room_code = ?")
                .bind(participant.room_code.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| RepoError::database("insert_participant", e))?;

        if occupied >= i64::from(max) {
            tx.rollback()
                .await
                .map_err(|e| RepoError::database("insert_participant", e))?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO participants (id, room_code, player_name, joined_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(participant.id.to_string())
        .bind(participant.room_code.as_str())
        .bind(&participant.player_name)
        .bind(participant.joined_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("insert_participant", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("insert_participant", e))?;

        Ok(true)
    }

    async fn delete(&self, id: ParticipantId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM participants WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_participant", e))?;

        Ok(())
    }
}
