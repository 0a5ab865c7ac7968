//! Leader-gated room settings: turn mode and the lobby -> playing start.

use std::sync::Arc;

use emberhall_domain::{RoomCode, RoomStatus};

use crate::infrastructure::ports::{RepoError, RoomRepo};

pub struct RoomSettings {
    room: Arc<dyn RoomRepo>,
}

impl RoomSettings {
    pub fn new(room: Arc<dyn RoomRepo>) -> Self {
        Self { room }
    }

    /// Flip turn mode. Only the leader may do this.
    pub async fn set_turn_mode(
        &self,
        room_code: &str,
        leader_name: &str,
        enabled: bool,
    ) -> Result<(), RoomSettingsError> {
        let (code, _) = self.leader_room(room_code, leader_name, "change Turn Mode").await?;
        self.room.set_turn_mode(&code, enabled).await?;
        tracing::info!(%code, enabled, "turn mode changed");
        Ok(())
    }

    /// Move the room from lobby to playing. Idempotent: starting an already
    /// started adventure succeeds without touching the store.
    pub async fn start_adventure(
        &self,
        room_code: &str,
        leader_name: &str,
    ) -> Result<(), RoomSettingsError> {
        let (code, room) = self
            .leader_room(room_code, leader_name, "start the adventure")
            .await?;
        if room.status == RoomStatus::Playing {
            return Ok(());
        }
        self.room.set_status(&code, RoomStatus::Playing).await?;
        tracing::info!(%code, "adventure started");
        Ok(())
    }

    async fn leader_room(
        &self,
        room_code: &str,
        leader_name: &str,
        action: &'static str,
    ) -> Result<(RoomCode, emberhall_domain::Room), RoomSettingsError> {
        let Ok(code) = RoomCode::parse(room_code) else {
            return Err(RoomSettingsError::RoomNotFound);
        };
        let room = self
            .room
            .get_by_code(&code)
            .await?
            .ok_or(RoomSettingsError::RoomNotFound)?;
        if !room.is_leader(leader_name) {
            return Err(RoomSettingsError::NotLeader { action });
        }
        Ok((code, room))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoomSettingsError {
    #[error("Room not found.")]
    RoomNotFound,
    #[error("Only the party leader can {action}.")]
    NotLeader { action: &'static str },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockRoomRepo;
    use chrono::Utc;
    use emberhall_domain::Room;

    fn lobby_room(leader: &'static str) -> MockRoomRepo {
        let mut room = MockRoomRepo::new();
        room.expect_get_by_code()
            .returning(move |code| Ok(Some(Room::new(code.clone(), leader, Utc::now()))));
        room
    }

    #[tokio::test]
    async fn leader_can_toggle_turn_mode() {
        let mut room = lobby_room("Astra");
        room.expect_set_turn_mode()
            .withf(|_, enabled| *enabled)
            .times(1)
            .returning(|_, _| Ok(()));

        RoomSettings::new(Arc::new(room))
            .set_turn_mode("ABCDEF", "Astra", true)
            .await
            .expect("toggled");
    }

    #[tokio::test]
    async fn non_leader_cannot_toggle_turn_mode() {
        let err = RoomSettings::new(Arc::new(lobby_room("Astra")))
            .set_turn_mode("ABCDEF", "Borin", true)
            .await
            .expect_err("forbidden");
        assert!(matches!(err, RoomSettingsError::NotLeader { .. }));
    }

    #[tokio::test]
    async fn leader_starts_adventure_once() {
        let mut room = lobby_room("Astra");
        room.expect_set_status()
            .withf(|_, status| *status == RoomStatus::Playing)
            .times(1)
            .returning(|_, _| Ok(()));

        RoomSettings::new(Arc::new(room))
            .start_adventure("ABCDEF", "Astra")
            .await
            .expect("started");
    }

    #[tokio::test]
    async fn starting_twice_is_idempotent() {
        let mut room = MockRoomRepo::new();
        room.expect_get_by_code().returning(|code| {
            let mut r = Room::new(code.clone(), "Astra", Utc::now());
            r.status = RoomStatus::Playing;
            Ok(Some(r))
        });
        // No set_status expectation: the store must not be touched.

        RoomSettings::new(Arc::new(room))
            .start_adventure("ABCDEF", "Astra")
            .await
            .expect("idempotent start");
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let mut room = MockRoomRepo::new();
        room.expect_get_by_code().returning(|_| Ok(None));

        let err = RoomSettings::new(Arc::new(room))
            .start_adventure("ABCDEF", "Astra")
            .await
            .expect_err("missing room");
        assert!(matches!(err, RoomSettingsError::RoomNotFound));
    }
}
