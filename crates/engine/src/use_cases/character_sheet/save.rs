//! Save character sheet use case.
//!
//! Two modes mirror the two client flows: point-buy creation refuses to
//! overwrite an existing sheet, while the sheet editor upserts freely.

use std::sync::Arc;

use emberhall_domain::{CharacterSheet, CharacterSheetDraft, DomainError, RoomCode, UserId};

use crate::infrastructure::ports::{ClockPort, PlayerRepo, RepoError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Fail if this user already has a sheet in the room.
    Create,
    /// Insert or overwrite.
    Upsert,
}

pub struct SaveCharacter {
    player: Arc<dyn PlayerRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SaveCharacter {
    pub fn new(player: Arc<dyn PlayerRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { player, clock }
    }

    pub async fn execute(
        &self,
        room_code: &str,
        user_id: Option<UserId>,
        draft: CharacterSheetDraft,
        mode: SaveMode,
    ) -> Result<CharacterSheet, SaveCharacterError> {
        let user_id = user_id.ok_or(SaveCharacterError::NotAuthenticated)?;
        let code = RoomCode::parse(room_code)?;

        if mode == SaveMode::Create
            && self
                .player
                .get_by_room_and_user(&code, &user_id)
                .await?
                .is_some()
        {
            return Err(SaveCharacterError::AlreadyExists);
        }

        let sheet = CharacterSheet::from_draft(code, user_id, draft, self.clock.now())?;

        match mode {
            SaveMode::Create => self.player.insert(&sheet).await?,
            SaveMode::Upsert => self.player.upsert(&sheet).await?,
        }

        tracing::info!(
            code = %sheet.room_code,
            player = %sheet.player_name,
            "character sheet saved"
        );
        Ok(sheet)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveCharacterError {
    #[error("Not authenticated.")]
    NotAuthenticated,
    #[error("Character already exists for this room.")]
    AlreadyExists,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}
