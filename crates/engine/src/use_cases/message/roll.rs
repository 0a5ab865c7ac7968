//! Dice roll use case.
//!
//! Parses a `/roll` command, rolls with the injected randomness, and logs
//! the result as a system message so the DM can read it.

use std::sync::Arc;

use emberhall_domain::{MessageKind, RollCommand, RollParseError};

use crate::infrastructure::ports::RandomPort;
use crate::use_cases::message::{SendMessage, SendMessageError, SendOutcome};

#[derive(Debug, Clone, Copy)]
pub struct RollOutcome {
    pub result: u32,
    pub message_count: u64,
    pub needs_summary: bool,
}

pub struct RollDice {
    send: Arc<SendMessage>,
    random: Arc<dyn RandomPort>,
}

impl RollDice {
    pub fn new(send: Arc<SendMessage>, random: Arc<dyn RandomPort>) -> Self {
        Self { send, random }
    }

    pub async fn execute(
        &self,
        room_code: &str,
        player_name: &str,
        command: &str,
    ) -> Result<RollOutcome, RollError> {
        let roll = RollCommand::parse(command)?
            .ok_or(RollError::Parse(RollParseError::InvalidFormat))?;

        let result = self.random.gen_range(1, roll.sides as i32).clamp(1, roll.sides as i32) as u32;

        let SendOutcome {
            message_count,
            needs_summary,
        } = self
            .send
            .execute(
                room_code,
                player_name,
                &roll.result_body(result),
                MessageKind::System,
            )
            .await?;

        Ok(RollOutcome {
            result,
            message_count,
            needs_summary,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RollError {
    #[error(transparent)]
    Parse(#[from] RollParseError),
    #[error(transparent)]
    Send(#[from] SendMessageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::ports::{MockMessageRepo, MockRoomRepo};
    use chrono::Utc;
    use emberhall_domain::Room;

    fn use_case(message: MockMessageRepo, random: FixedRandom) -> RollDice {
        let mut room = MockRoomRepo::new();
        room.expect_get_by_code()
            .returning(|code| Ok(Some(Room::new(code.clone(), "Astra", Utc::now()))));

        let send = SendMessage::new(
            Arc::new(room),
            Arc::new(message),
            Arc::new(FixedClock(Utc::now())),
        );
        RollDice::new(Arc::new(send), Arc::new(random))
    }

    #[tokio::test]
    async fn logs_roll_as_system_message() {
        let mut message = MockMessageRepo::new();
        message
            .expect_append()
            .withf(|m| m.body == "rolled d20: 15" && m.kind == MessageKind::System)
            .returning(|_| Ok(3));

        let outcome = use_case(message, FixedRandom(15))
            .execute("ABCDEF", "Borin", "/roll d20")
            .await
            .expect("rolled");
        assert_eq!(outcome.result, 15);
        assert_eq!(outcome.message_count, 3);
    }

    #[tokio::test]
    async fn rejects_non_roll_input() {
        let err = use_case(MockMessageRepo::new(), FixedRandom(1))
            .execute("ABCDEF", "Borin", "hello there")
            .await
            .expect_err("not a roll");
        assert!(matches!(
            err,
            RollError::Parse(RollParseError::InvalidFormat)
        ));
    }

    #[tokio::test]
    async fn rejects_unsupported_die() {
        let err = use_case(MockMessageRepo::new(), FixedRandom(1))
            .execute("ABCDEF", "Borin", "/roll d6")
            .await
            .expect_err("unsupported die");
        assert!(matches!(
            err,
            RollError::Parse(RollParseError::UnsupportedDie(6))
        ));
    }
}
