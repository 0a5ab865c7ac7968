//! Message log entries.
//!
//! Messages are append-only: no edits, no deletes. Replay order is
//! (`created_at`, `seq`) - the store-assigned sequence number breaks ties
//! between messages inserted within the same clock tick.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::MessageId;
use crate::room::RoomCode;

/// Synthetic sender names used for non-player entries.
pub mod sender {
    /// Join/leave notices and dice rolls.
    pub const SYSTEM: &str = "System";
    /// The opening prolog inserted at room creation.
    pub const WORLD: &str = "World";
    /// The AI narrator.
    pub const DUNGEON_MASTER: &str = "Dungeon Master";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Chat,
    System,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::System => "system",
        }
    }
}

impl FromStr for MessageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "system" => Ok(Self::System),
            other => Err(DomainError::parse(format!("Unknown message kind: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    /// Store-assigned insertion order; tie-break for identical timestamps.
    pub seq: i64,
    pub room_code: RoomCode,
    pub player_name: String,
    pub kind: MessageKind,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether this entry was spoken by the AI narrator.
    pub fn is_dungeon_master(&self) -> bool {
        self.player_name == sender::DUNGEON_MASTER
    }

    /// The sender prefix used when flattening history into a transcript:
    /// system entries are surfaced as "System Event", everything else under
    /// the sender's own name.
    pub fn transcript_prefix(&self) -> &str {
        match self.kind {
            MessageKind::System => "System Event",
            MessageKind::Chat => &self.player_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, kind: MessageKind) -> Message {
        Message {
            id: MessageId::new(),
            seq: 1,
            room_code: RoomCode::parse("ABCDEF").expect("code"),
            player_name: name.to_string(),
            kind,
            body: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn kind_round_trips_through_str() {
        assert_eq!("chat".parse::<MessageKind>().expect("kind"), MessageKind::Chat);
        assert_eq!(MessageKind::System.as_str(), "system");
        assert!("roll".parse::<MessageKind>().is_err());
    }

    #[test]
    fn transcript_prefix_labels_system_events() {
        let roll = message("Borin", MessageKind::System);
        assert_eq!(roll.transcript_prefix(), "System Event");

        let chat = message("Borin", MessageKind::Chat);
        assert_eq!(chat.transcript_prefix(), "Borin");
    }

    #[test]
    fn dungeon_master_messages_are_recognized() {
        let dm = message(sender::DUNGEON_MASTER, MessageKind::Chat);
        assert!(dm.is_dungeon_master());
        assert!(!message("Astra", MessageKind::Chat).is_dungeon_master());
    }
}
