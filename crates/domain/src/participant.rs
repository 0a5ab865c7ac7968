//! Participant presence record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ParticipantId;
use crate::room::RoomCode;

/// Ephemeral presence in a room: created on join, deleted on leave.
///
/// Distinct from a persisted character sheet - a participant may be present
/// without ever saving a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub room_code: RoomCode,
    pub player_name: String,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(
        room_code: RoomCode,
        player_name: impl Into<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ParticipantId::new(),
            room_code,
            player_name: player_name.into(),
            joined_at,
        }
    }
}
