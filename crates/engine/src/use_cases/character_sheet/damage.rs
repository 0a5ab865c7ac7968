//! Apply damage use case.
//!
//! Damage comes from DM directives and the debug panel; amounts are floored
//! and hp clamps at zero.

use std::sync::Arc;

use emberhall_domain::{RoomCode, UserId};

use crate::infrastructure::ports::{ClockPort, PlayerRepo, RepoError};

pub struct ApplyDamage {
    player: Arc<dyn PlayerRepo>,
    clock: Arc<dyn ClockPort>,
}

impl ApplyDamage {
    pub fn new(player: Arc<dyn PlayerRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { player, clock }
    }

    /// `user_id` gates the debug-panel entry point; internal callers (DM
    /// directives) pass the sheet owner lookup result instead and use
    /// [`apply_to_sheet`](Self::apply_to_sheet).
    pub async fn execute(
        &self,
        room_code: &str,
        user_id: Option<UserId>,
        player_name: &str,
        amount: f64,
    ) -> Result<(), ApplyDamageError> {
        if user_id.is_none() {
            return Err(ApplyDamageError::NotAuthenticated);
        }
        let code = RoomCode::parse(room_code).map_err(|_| ApplyDamageError::PlayerNotFound)?;
        self.apply_to_sheet(&code, player_name, amount).await
    }

    /// Look the sheet up by display name and subtract the damage.
    pub async fn apply_to_sheet(
        &self,
        code: &RoomCode,
        player_name: &str,
        amount: f64,
    ) -> Result<(), ApplyDamageError> {
        let amount = amount.floor().max(0.0) as u32;
        if amount == 0 {
            return Ok(());
        }

        let mut sheet = self
            .player
            .get_by_room_and_name(code, player_name)
            .await?
            .ok_or(ApplyDamageError::PlayerNotFound)?;

        sheet.apply_damage(amount);
        self.player
            .set_hp(sheet.id, sheet.hp, self.clock.now())
            .await?;

        tracing::info!(%code, player = player_name, amount, hp = sheet.hp, "damage applied");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyDamageError {
    #[error("Not authenticated.")]
    NotAuthenticated,
    #[error("Player not found.")]
    PlayerNotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}
