//! Leave room use case.
//!
//! Deleting an unknown participant is a no-op so repeated leave calls
//! (e.g. a tab closing twice) stay silent.

use std::sync::Arc;

use emberhall_domain::{sender, MessageKind, ParticipantId};

use crate::infrastructure::ports::{
    ClockPort, MessageRepo, NewMessage, ParticipantRepo, RepoError,
};

pub struct LeaveRoom {
    participant: Arc<dyn ParticipantRepo>,
    message: Arc<dyn MessageRepo>,
    clock: Arc<dyn ClockPort>,
}

impl LeaveRoom {
    pub fn new(
        participant: Arc<dyn ParticipantRepo>,
        message: Arc<dyn MessageRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            participant,
            message,
            clock,
        }
    }

    pub async fn execute(&self, participant_id: ParticipantId) -> Result<(), LeaveRoomError> {
        let Some(participant) = self.participant.get(participant_id).await? else {
            return Ok(());
        };

        self.participant.delete(participant_id).await?;

        let announce = self
            .message
            .append(&NewMessage {
                room_code: participant.room_code.clone(),
                player_name: sender::SYSTEM.to_string(),
                kind: MessageKind::System,
                body: format!("{} left the room.", participant.player_name),
                created_at: self.clock.now(),
            })
            .await;

        match announce {
            Ok(_) => {}
            // The room may already be gone; the departure still succeeded.
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!(code = %participant.room_code, player = %participant.player_name, "participant left");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeaveRoomError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}
