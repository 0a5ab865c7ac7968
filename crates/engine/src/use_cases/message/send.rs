//! Send message use case.
//!
//! Appends a chat or system entry and reports whether the new message count
//! crossed a summary threshold.

use std::sync::Arc;

use emberhall_domain::{MessageKind, Room, RoomCode};

use crate::infrastructure::ports::{ClockPort, MessageRepo, NewMessage, RepoError, RoomRepo};

#[derive(Debug, Clone, Copy)]
pub struct SendOutcome {
    pub message_count: u64,
    /// Hint that the caller should kick off summarization.
    pub needs_summary: bool,
}

pub struct SendMessage {
    room: Arc<dyn RoomRepo>,
    message: Arc<dyn MessageRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SendMessage {
    pub fn new(
        room: Arc<dyn RoomRepo>,
        message: Arc<dyn MessageRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            room,
            message,
            clock,
        }
    }

    pub async fn execute(
        &self,
        room_code: &str,
        player_name: &str,
        body: &str,
        kind: MessageKind,
    ) -> Result<SendOutcome, SendMessageError> {
        let Ok(code) = RoomCode::parse(room_code) else {
            return Err(SendMessageError::RoomNotFound);
        };
        let room = self
            .room
            .get_by_code(&code)
            .await?
            .ok_or(SendMessageError::RoomNotFound)?;

        // Whitespace-only input appends nothing; the current count is
        // reported unchanged.
        let body = body.trim();
        if body.is_empty() {
            return Ok(SendOutcome {
                message_count: room.message_count,
                needs_summary: false,
            });
        }

        let message_count = self
            .message
            .append(&NewMessage {
                room_code: code,
                player_name: player_name.to_string(),
                kind,
                body: body.to_string(),
                created_at: self.clock.now(),
            })
            .await?;

        Ok(SendOutcome {
            message_count,
            needs_summary: Room::needs_summary_at(message_count, room.summary_count),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
    #[error("Room not found.")]
    RoomNotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}
