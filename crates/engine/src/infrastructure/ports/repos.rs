//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use emberhall_domain::{
    CharacterSheet, Message, MessageKind, Participant, ParticipantId, PlayerId, Room, RoomCode,
    RoomStatus, UserId,
};

use super::error::RepoError;

/// A message about to be appended. The store assigns `seq` and `id`.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub room_code: RoomCode,
    pub player_name: String,
    pub kind: MessageKind,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepo: Send + Sync {
    async fn get_by_code(&self, code: &RoomCode) -> Result<Option<Room>, RepoError>;
    async fn insert(&self, room: &Room) -> Result<(), RepoError>;
    async fn set_turn_mode(&self, code: &RoomCode, enabled: bool) -> Result<(), RepoError>;
    async fn set_status(&self, code: &RoomCode, status: RoomStatus) -> Result<(), RepoError>;
    async fn set_dm_active(&self, code: &RoomCode, active: bool) -> Result<(), RepoError>;
    /// Overwrite the campaign summary and record the message count it covers.
    async fn update_summary(
        &self,
        code: &RoomCode,
        summary: &str,
        summary_count: u64,
    ) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepo: Send + Sync {
    async fn get(&self, id: ParticipantId) -> Result<Option<Participant>, RepoError>;
    async fn list_by_room(&self, code: &RoomCode) -> Result<Vec<Participant>, RepoError>;
    /// Seat the participant only if the room has fewer than `max` members.
    /// The occupancy check and the insert run in one transaction. Returns
    /// false when the room is full.
    async fn insert_if_capacity(
        &self,
        participant: &Participant,
        max: u32,
    ) -> Result<bool, RepoError>;
    async fn delete(&self, id: ParticipantId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    async fn get_by_room_and_user(
        &self,
        code: &RoomCode,
        user_id: &UserId,
    ) -> Result<Option<CharacterSheet>, RepoError>;
    async fn get_by_room_and_name(
        &self,
        code: &RoomCode,
        player_name: &str,
    ) -> Result<Option<CharacterSheet>, RepoError>;
    async fn list_by_room(&self, code: &RoomCode) -> Result<Vec<CharacterSheet>, RepoError>;
    /// Insert a new sheet. Fails on a duplicate (room, user) pair.
    async fn insert(&self, sheet: &CharacterSheet) -> Result<(), RepoError>;
    /// Insert or overwrite the sheet keyed by (room, user).
    async fn upsert(&self, sheet: &CharacterSheet) -> Result<(), RepoError>;
    async fn set_hp(
        &self,
        id: PlayerId,
        hp: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepo: Send + Sync {
    /// Append a message and bump the room's message counter atomically.
    /// Returns the room's new message count.
    async fn append(&self, message: &NewMessage) -> Result<u64, RepoError>;
    /// Full log in chronological order.
    async fn list(&self, code: &RoomCode) -> Result<Vec<Message>, RepoError>;
    /// The most recent `limit` messages, still in chronological order.
    async fn list_recent(&self, code: &RoomCode, limit: u32) -> Result<Vec<Message>, RepoError>;
}
