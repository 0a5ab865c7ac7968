//! Emberhall domain layer.
//!
//! Entities, value objects, and invariants for the room/turn/message core.
//! This crate performs no I/O; randomness is injected via closure so the
//! rules stay deterministic under test.

pub mod character_sheet;
pub mod dice;
pub mod error;
pub mod ids;
pub mod message;
pub mod participant;
pub mod room;

pub use character_sheet::{
    point_buy_cost, AbilityScores, CharacterSheet, CharacterSheetDraft, DraftEquipmentItem,
    EquipmentItem, StatBlock, DEFAULT_CLASS, POINT_BUY_BUDGET,
};
pub use dice::{RollCommand, RollParseError};
pub use error::DomainError;
pub use ids::{MessageId, ParticipantId, PlayerId, UserId};
pub use message::{sender, Message, MessageKind};
pub use participant::Participant;
pub use room::{Room, RoomCode, RoomStatus, CODE_ALPHABET, CODE_LENGTH, MAX_PARTICIPANTS};
