//! SQLite persistence for rooms, participants, players, and messages.
//!
//! One pool, one repository struct per table. The schema is created on
//! connect so a fresh database file works out of the box.

mod messages;
mod participants;
mod players;
mod rooms;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

pub use messages::SqliteMessageRepo;
pub use participants::SqliteParticipantRepo;
pub use players::SqlitePlayerRepo;
pub use rooms::SqliteRoomRepo;

/// All repositories sharing one connection pool.
pub struct SqliteRepositories {
    pub room: Arc<SqliteRoomRepo>,
    pub participant: Arc<SqliteParticipantRepo>,
    pub player: Arc<SqlitePlayerRepo>,
    pub message: Arc<SqliteMessageRepo>,
}

impl SqliteRepositories {
    /// Open (creating if needed) the database at `db_path` and run the schema.
    pub async fn connect(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{db_path}?mode=rwc"))
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self {
            room: Arc::new(SqliteRoomRepo::new(pool.clone())),
            participant: Arc::new(SqliteParticipantRepo::new(pool.clone())),
            player: Arc::new(SqlitePlayerRepo::new(pool.clone())),
            message: Arc::new(SqliteMessageRepo::new(pool)),
        }
    }
}

/// Create tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS rooms (
            code          TEXT PRIMARY KEY,
            leader_name   TEXT NOT NULL,
            status        TEXT NOT NULL,
            turn_mode     INTEGER NOT NULL DEFAULT 0,
            dm_active     INTEGER NOT NULL DEFAULT 0,
            message_count INTEGER NOT NULL DEFAULT 0,
            summary       TEXT NOT NULL DEFAULT '',
            summary_count INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS participants (
            id          TEXT PRIMARY KEY,
            room_code   TEXT NOT NULL,
            player_name TEXT NOT NULL,
            joined_at   TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_participants_room
            ON participants (room_code)",
        "CREATE TABLE IF NOT EXISTS players (
            id             TEXT PRIMARY KEY,
            room_code      TEXT NOT NULL,
            user_id        TEXT NOT NULL,
            player_name    TEXT NOT NULL,
            character_name TEXT NOT NULL,
            gender         TEXT NOT NULL,
            race           TEXT NOT NULL,
            stats_json     TEXT NOT NULL,
            status         TEXT NOT NULL,
            class_name     TEXT NOT NULL,
            hp             INTEGER NOT NULL,
            skills_json    TEXT NOT NULL,
            backstory      TEXT NOT NULL,
            equipment_json TEXT NOT NULL,
            updated_at     TEXT NOT NULL,
            UNIQUE (room_code, user_id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_players_room
            ON players (room_code)",
        "CREATE INDEX IF NOT EXISTS idx_players_room_name
            ON players (room_code, player_name)",
        // seq is the tie-break for messages inserted within one clock tick
        "CREATE TABLE IF NOT EXISTS messages (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            id          TEXT NOT NULL UNIQUE,
            room_code   TEXT NOT NULL,
            player_name TEXT NOT NULL,
            kind        TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_messages_room_time
            ON messages (room_code, created_at, seq)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    Ok(())
}
