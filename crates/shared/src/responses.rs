//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberhall_domain::{
    CharacterSheet, EquipmentItem, Message, MessageId, Participant, ParticipantId, Room, StatBlock,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomResponse {
    pub participant_id: ParticipantId,
    pub room_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message_count: u64,
    pub needs_summary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResponse {
    pub result: u32,
    pub message_count: u64,
    pub needs_summary: bool,
}

/// Public room snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub code: String,
    pub leader_name: String,
    pub status: String,
    pub turn_mode: bool,
    pub dm_active: bool,
    pub message_count: u64,
    pub summary: String,
    pub summary_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            code: room.code.to_string(),
            leader_name: room.leader_name,
            status: room.status.as_str().to_string(),
            turn_mode: room.turn_mode,
            dm_active: room.dm_active,
            message_count: room.message_count,
            summary: room.summary,
            summary_count: room.summary_count,
            created_at: room.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: ParticipantId,
    pub player_name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            player_name: p.player_name,
            joined_at: p.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: MessageId,
    pub player_name: String,
    pub kind: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            player_name: m.player_name,
            kind: m.kind.as_str().to_string(),
            body: m.body,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheetResponse {
    pub player_name: String,
    pub character_name: String,
    pub gender: String,
    pub race: String,
    pub stats: StatBlock,
    pub status: String,
    pub class_name: String,
    pub hp: u32,
    pub skills: Vec<String>,
    pub backstory: String,
    pub equipment: Vec<EquipmentItem>,
    pub updated_at: DateTime<Utc>,
}

impl From<CharacterSheet> for CharacterSheetResponse {
    fn from(sheet: CharacterSheet) -> Self {
        Self {
            player_name: sheet.player_name,
            character_name: sheet.character_name,
            gender: sheet.gender,
            race: sheet.race,
            stats: sheet.stats,
            status: sheet.status,
            class_name: sheet.class_name,
            hp: sheet.hp,
            skills: sheet.skills,
            backstory: sheet.backstory,
            equipment: sheet.equipment,
            updated_at: sheet.updated_at,
        }
    }
}

/// Generated character details, constrained to the fixed schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDetailsResponse {
    pub backstory: String,
    pub skills: Vec<String>,
    pub equipment: Vec<EquipmentItem>,
}
