//! Join room use case.
//!
//! Seats a participant if the room exists and has a free seat, then
//! announces the arrival in the log.

use std::sync::Arc;

use emberhall_domain::{
    sender, MessageKind, Participant, ParticipantId, RoomCode, MAX_PARTICIPANTS,
};

use crate::infrastructure::ports::{
    ClockPort, MessageRepo, NewMessage, ParticipantRepo, RepoError, RoomRepo,
};

#[derive(Debug, Clone)]
pub struct JoinedRoom {
    pub participant_id: ParticipantId,
    pub room_code: RoomCode,
}

pub struct JoinRoom {
    room: Arc<dyn RoomRepo>,
    participant: Arc<dyn ParticipantRepo>,
    message: Arc<dyn MessageRepo>,
    clock: Arc<dyn ClockPort>,
}

impl JoinRoom {
    pub fn new(
        room: Arc<dyn RoomRepo>,
        participant: Arc<dyn ParticipantRepo>,
        message: Arc<dyn MessageRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            room,
            participant,
            message,
            clock,
        }
    }

    pub async fn execute(
        &self,
        room_code: &str,
        player_name: &str,
    ) -> Result<JoinedRoom, JoinRoomError> {
        // Malformed codes cannot name an existing room.
        let Ok(code) = RoomCode::parse(room_code) else {
            return Err(JoinRoomError::RoomNotFound);
        };
        if self.room.get_by_code(&code).await?.is_none() {
            return Err(JoinRoomError::RoomNotFound);
        }

        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(JoinRoomError::PlayerNameRequired);
        }

        let participant = Participant::new(code.clone(), player_name, self.clock.now());
        let seated = self
            .participant
            .insert_if_capacity(&participant, MAX_PARTICIPANTS)
            .await?;
        if !seated {
            return Err(JoinRoomError::RoomFull);
        }

        self.message
            .append(&NewMessage {
                room_code: code.clone(),
                player_name: sender::SYSTEM.to_string(),
                kind: MessageKind::System,
                body: format!("{player_name} joined the room."),
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(%code, player = player_name, "participant joined");
        Ok(JoinedRoom {
            participant_id: participant.id,
            room_code: code,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinRoomError {
    #[error("Room not found.")]
    RoomNotFound,
    #[error("Room is full.")]
    RoomFull,
    #[error("Player name is required.")]
    PlayerNameRequired,
    #[error(transparent)]
    Repo(#[from] RepoError),
}
