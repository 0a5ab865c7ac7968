//! Character-sheet repository backed by SQLite.
//!
//! Structured columns for the fields queries filter on; JSON columns for
//! the nested stat block, skills, and equipment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use emberhall_domain::{CharacterSheet, PlayerId, RoomCode, UserId};

use crate::infrastructure::ports::{PlayerRepo, RepoError};

pub struct SqlitePlayerRepo {
    pool: SqlitePool,
}

impl SqlitePlayerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn sheet_from_row(row: &SqliteRow) -> Result<CharacterSheet, RepoError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;
    let room_code: String = row
        .try_get("room_code")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;
    let stats_json: String = row
        .try_get("stats_json")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;
    let skills_json: String = row
        .try_get("skills_json")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;
    let equipment_json: String = row
        .try_get("equipment_json")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;
    let hp: i64 = row
        .try_get("hp")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| RepoError::database("sheet_from_row", e))?;

    Ok(CharacterSheet {
        id: PlayerId::from_uuid(Uuid::parse_str(&id).map_err(|e| RepoError::serialization(e))?),
        room_code: RoomCode::parse(&room_code).map_err(|e| RepoError::serialization(e))?,
        user_id: UserId::new(user_id),
        player_name: row
            .try_get("player_name")
            .map_err(|e| RepoError::database("sheet_from_row", e))?,
        character_name: row
            .try_get("character_name")
            .map_err(|e| RepoError::database("sheet_from_row", e))?,
        gender: row
            .try_get("gender")
            .map_err(|e| RepoError::database("sheet_from_row", e))?,
        race: row
            .try_get("race")
            .map_err(|e| RepoError::database("sheet_from_row", e))?,
        stats: serde_json::from_str(&stats_json).map_err(|e| RepoError::serialization(e))?,
        status: row
            .try_get("status")
            .map_err(|e| RepoError::database("sheet_from_row", e))?,
        class_name: row
            .try_get("class_name")
            .map_err(|e| RepoError::database("sheet_from_row", e))?,
        hp: hp.max(0) as u32,
        skills: serde_json::from_str(&skills_json).map_err(|e| RepoError::serialization(e))?,
        backstory: row
            .try_get("backstory")
            .map_err(|e| RepoError::database("sheet_from_row", e))?,
        equipment: serde_json::from_str(&equipment_json)
            .map_err(|e| RepoError::serialization(e))?,
        updated_at,
    })
}

struct SheetColumns {
    stats_json: String,
    skills_json: String,
    equipment_json: String,
}

fn sheet_columns(sheet: &CharacterSheet) -> Result<SheetColumns, RepoError> {
    Ok(SheetColumns {
        stats_json: serde_json::to_string(&sheet.stats)
            .map_err(|e| RepoError::serialization(e))?,
        skills_json: serde_json::to_string(&sheet.skills)
            .map_err(|e| RepoError::serialization(e))?,
        equipment_json: serde_json::to_string(&sheet.equipment)
            .map_err(|e| RepoError::serialization(e))?,
    })
}

#[async_trait]
impl PlayerRepo for SqlitePlayerRepo {
    async fn get_by_room_and_user(
        &self,
        code: &RoomCode,
        user_id: &UserId,
    ) -> Result<Option<CharacterSheet>, RepoError> {
        let row = sqlx::query("SELECT * FROM players WHERE room_code = ? AND user_id = ?")
            .bind(code.as_str())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_player_by_user", e))?;

        row.as_ref().map(sheet_from_row).transpose()
    }

    async fn get_by_room_and_name(
        &self,
        code: &RoomCode,
        player_name: &str,
    ) -> Result<Option<CharacterSheet>, RepoError> {
        let row = sqlx::query("SELECT * FROM players WHERE room_code = ? AND player_name = ?")
            .bind(code.as_str())
            .bind(player_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_player_by_name", e))?;

        row.as_ref().map(sheet_from_row).transpose()
    }

    async fn list_by_room(&self, code: &RoomCode) -> Result<Vec<CharacterSheet>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM players WHERE room_code = ? ORDER BY updated_at ASC, id ASC",
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_players", e))?;

        rows.iter().map(sheet_from_row).collect()
    }

    async fn insert(&self, sheet: &CharacterSheet) -> Result<(), RepoError> {
        let columns = sheet_columns(sheet)?;

        sqlx::query(
            "INSERT INTO players (id, room_code, user_id, player_name, character_name,
                                  gender, race, stats_json, status, class_name, hp,
                                  skills_json, backstory, equipment_json, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(sheet.id.to_string())
        .bind(sheet.room_code.as_str())
        .bind(sheet.user_id.as_str())
        .bind(&sheet.player_name)
        .bind(&sheet.character_name)
        .bind(&sheet.gender)
        .bind(&sheet.race)
        .bind(&columns.stats_json)
        .bind(&sheet.status)
        .bind(&sheet.class_name)
        .bind(i64::from(sheet.hp))
        .bind(&columns.skills_json)
        .bind(&sheet.backstory)
        .bind(&columns.equipment_json)
        .bind(sheet.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::ConstraintViolation(
                "A character already exists for this user in this room".to_string(),
            ),
            _ => RepoError::database("insert_player", e),
        })?;

        Ok(())
    }

    async fn upsert(&self, sheet: &CharacterSheet) -> Result<(), RepoError> {
        let columns = sheet_columns(sheet)?;

        sqlx::query(
            "INSERT INTO players (id, room_code, user_id, player_name, character_name,
                                  gender, race, stats_json, status, class_name, hp,
                                  skills_json, backstory, equipment_json, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (room_code, user_id) DO UPDATE SET
                 player_name = excluded.player_name,
                 character_name = excluded.character_name,
                 gender = excluded.gender,
                 race = excluded.race,
                 stats_json = excluded.stats_json,
                 status = excluded.status,
                 class_name = excluded.class_name,
                 hp = excluded.hp,
                 skills_json = excluded.skills_json,
                 backstory = excluded.backstory,
                 equipment_json = excluded.equipment_json,
                 updated_at = excluded.updated_at",
        )
        .bind(sheet.id.to_string())
        .bind(sheet.room_code.as_str())
        .bind(sheet.user_id.as_str())
        .bind(&sheet.player_name)
        .bind(&sheet.character_name)
        .bind(&sheet.gender)
        .bind(&sheet.race)
        .bind(&columns.stats_json)
        .bind(&sheet.status)
        .bind(&sheet.class_name)
        .bind(i64::from(sheet.hp))
        .bind(&columns.skills_json)
        .bind(&sheet.backstory)
        .bind(&columns.equipment_json)
        .bind(sheet.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("upsert_player", e))?;

        Ok(())
    }

    async fn set_hp(
        &self,
        id: PlayerId,
        hp: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE players SET hp = ?, updated_at = ? WHERE id = ?")
            .bind(i64::from(hp))
            .bind(updated_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("set_hp", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Player", id));
        }
        Ok(())
    }
}
