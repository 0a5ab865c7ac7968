//! Room entity and room-code value object.
//!
//! A room is a single campaign session identified by a short code. The
//! creating participant is the leader and is the sole authority for
//! turn-mode changes and the lobby -> playing transition.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Characters allowed in a room code. Ambiguous glyphs (I, O, 0, 1) are
/// excluded so codes can be read aloud at the table.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every room code.
pub const CODE_LENGTH: usize = 6;

/// Maximum concurrent participants in one room.
pub const MAX_PARTICIPANTS: u32 = 4;

/// A validated 6-character room code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Generate a code by sampling the alphabet via the injected index
    /// source. `pick` receives the alphabet length and must return an index
    /// below it.
    pub fn generate(mut pick: impl FnMut(usize) -> usize) -> Self {
        let code: String = (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[pick(CODE_ALPHABET.len()) % CODE_ALPHABET.len()] as char)
            .collect();
        Self(code)
    }

    /// Parse user input: trims, uppercases, and validates length/charset.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.len() != CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "Room code must be {CODE_LENGTH} characters."
            )));
        }
        if !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(DomainError::validation(
                "Room code contains invalid characters.",
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Room lifecycle state. The transition is one-way: lobby -> playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Lobby,
    Playing,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Playing => "playing",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lobby" => Ok(Self::Lobby),
            "playing" => Ok(Self::Playing),
            other => Err(DomainError::parse(format!("Unknown room status: {other}"))),
        }
    }
}

/// A campaign session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: RoomCode,
    pub leader_name: String,
    pub status: RoomStatus,
    /// When true, the AI DM is invoked only on the leader's explicit
    /// end-turn action rather than after every message.
    pub turn_mode: bool,
    /// Advisory busy flag while a DM response is being generated.
    pub dm_active: bool,
    /// Count of all messages ever inserted into the room.
    pub message_count: u64,
    /// Running narrative digest of the campaign so far.
    pub summary: String,
    /// The `message_count` at which `summary` was last regenerated.
    pub summary_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(code: RoomCode, leader_name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            leader_name: leader_name.into(),
            status: RoomStatus::Lobby,
            turn_mode: false,
            dm_active: false,
            message_count: 0,
            summary: String::new(),
            summary_count: 0,
            created_at,
        }
    }

    pub fn is_leader(&self, name: &str) -> bool {
        self.leader_name == name
    }

    /// Whether the summarizer should run for the current counters.
    ///
    /// The authoritative idempotence guard: independent of (and more
    /// conservative than) the `needs_summary` hint computed at send time.
    pub fn summary_due(&self) -> bool {
        self.message_count >= 20 && self.message_count > self.summary_count
    }

    /// The `needs_summary` hint for a send that advanced the counter to
    /// `message_count`. Re-derived from the live count each time, so each
    /// multiple-of-20 threshold fires at most once.
    pub fn needs_summary_at(message_count: u64, summary_count: u64) -> bool {
        message_count % 20 == 0 && message_count > summary_count
    }
}
