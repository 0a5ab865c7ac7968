//! Create room use case.
//!
//! Allocates a fresh room code, persists the room with the creator as
//! leader, and seeds the log with the opening prolog.

use std::sync::Arc;

use emberhall_domain::{sender, MessageKind, Room, RoomCode};

use crate::infrastructure::ports::{
    ClockPort, MessageRepo, NewMessage, RandomPort, RepoError, RoomRepo,
};
use crate::use_cases::prolog;

/// How many collisions we tolerate before giving up on code allocation.
const MAX_CODE_ATTEMPTS: u32 = 5;

pub struct CreateRoom {
    room: Arc<dyn RoomRepo>,
    message: Arc<dyn MessageRepo>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl CreateRoom {
    pub fn new(
        room: Arc<dyn RoomRepo>,
        message: Arc<dyn MessageRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            room,
            message,
            clock,
            random,
        }
    }

    pub async fn execute(&self, leader_name: &str) -> Result<RoomCode, CreateRoomError> {
        let leader_name = leader_name.trim();
        if leader_name.is_empty() {
            return Err(CreateRoomError::LeaderNameRequired);
        }

        for attempt in 0..MAX_CODE_ATTEMPTS {
            let code = RoomCode::generate(|len| {
                self.random.gen_range(0, len as i32 - 1).max(0) as usize
            });

            if self.room.get_by_code(&code).await?.is_some() {
                tracing::debug!(%code, attempt, "room code collision, retrying");
                continue;
            }

            let room = Room::new(code.clone(), leader_name, self.clock.now());
            self.room.insert(&room).await?;

            // The prolog counts toward the room's message total like any
            // other entry.
            self.message
                .append(&NewMessage {
                    room_code: code.clone(),
                    player_name: sender::WORLD.to_string(),
                    kind: MessageKind::System,
                    body: prolog::compose(self.random.as_ref()),
                    created_at: self.clock.now(),
                })
                .await?;

            tracing::info!(%code, leader = leader_name, "room created");
            return Ok(code);
        }

        Err(CreateRoomError::CodeAllocationExhausted)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateRoomError {
    #[error("Leader name is required.")]
    LeaderNameRequired,
    #[error("Unable to allocate a room code. Try again.")]
    CodeAllocationExhausted,
    #[error(transparent)]
    Repo(#[from] RepoError),
}
