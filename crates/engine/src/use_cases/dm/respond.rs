//! DM response use case.
//!
//! Streams the AI narrator's reply token by token while a background task
//! accumulates the full text, applies damage directives, appends the
//! narrative to the log, and triggers summarization when due. The room's
//! `dm_active` flag is set for the duration and cleared on every exit path.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;

use emberhall_domain::{sender, CharacterSheet, MessageKind, Room, RoomCode};

use crate::infrastructure::ports::{
    ChatMessage, ClockPort, LlmError, LlmPort, LlmRequest, MessageRepo, NewMessage, PlayerRepo,
    RepoError, RoomRepo,
};
use crate::prompt_templates;
use crate::use_cases::character_sheet::ApplyDamage;
use crate::use_cases::dm::directives;
use crate::use_cases::summary::SummarizeRoom;

/// How many log entries feed the DM's context.
const DM_CONTEXT_WINDOW: u32 = 10;

/// Token stream handed to the HTTP layer.
pub type DmStream = futures_channel::mpsc::Receiver<Result<String, LlmError>>;

/// Compact party entry for the persona prompt's JSON block.
#[derive(Serialize)]
struct PartyMember<'a> {
    name: &'a str,
    class: &'a str,
    hp: u32,
}

pub struct RespondAsDm {
    room: Arc<dyn RoomRepo>,
    player: Arc<dyn PlayerRepo>,
    message: Arc<dyn MessageRepo>,
    llm: Arc<dyn LlmPort>,
    clock: Arc<dyn ClockPort>,
    damage: Arc<ApplyDamage>,
    summarize: Arc<SummarizeRoom>,
}

impl RespondAsDm {
    pub fn new(
        room: Arc<dyn RoomRepo>,
        player: Arc<dyn PlayerRepo>,
        message: Arc<dyn MessageRepo>,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        damage: Arc<ApplyDamage>,
        summarize: Arc<SummarizeRoom>,
    ) -> Self {
        Self {
            room,
            player,
            message,
            llm,
            clock,
            damage,
            summarize,
        }
    }

    pub async fn execute(
        &self,
        room_code: &str,
        player_name: &str,
        prompt: Option<String>,
    ) -> Result<DmStream, DmError> {
        if player_name.trim().is_empty() {
            return Err(DmError::MissingPlayerName);
        }
        let Ok(code) = RoomCode::parse(room_code) else {
            return Err(DmError::RoomNotFound);
        };
        let (room, history, party) = tokio::join!(
            self.room.get_by_code(&code),
            self.message.list_recent(&code, DM_CONTEXT_WINDOW),
            self.player.list_by_room(&code),
        );
        let room = room?.ok_or(DmError::RoomNotFound)?;
        let history = history?;
        let party = party?;
        let request = build_request(&room, &history, &party, prompt);

        self.room.set_dm_active(&code, true).await?;

        let token_stream = match self.llm.generate_stream(request).await {
            Ok(stream) => stream,
            Err(e) => {
                self.clear_busy(&code).await;
                return Err(e.into());
            }
        };

        let (mut tx, rx) = futures_channel::mpsc::channel(32);
        let completion = Completion {
            room: Arc::clone(&self.room),
            message: Arc::clone(&self.message),
            clock: Arc::clone(&self.clock),
            damage: Arc::clone(&self.damage),
            summarize: Arc::clone(&self.summarize),
            code: code.clone(),
            summary_count: room.summary_count,
        };

        tokio::spawn(async move {
            let mut token_stream = token_stream;
            let mut full_text = String::new();
            let mut interrupted = false;

            while let Some(item) = token_stream.next().await {
                match item {
                    Ok(token) => {
                        full_text.push_str(&token);
                        // A closed receiver just means the client hung up;
                        // the reply is still persisted below.
                        let _ = tx.send(Ok(token)).await;
                    }
                    Err(e) => {
                        tracing::warn!(code = %completion.code, error = %e, "DM stream interrupted");
                        let _ = tx.send(Err(e)).await;
                        interrupted = true;
                        break;
                    }
                }
            }

            if !interrupted {
                if let Err(e) = completion.finish(&full_text).await {
                    tracing::warn!(code = %completion.code, error = %e, "DM completion failed");
                }
            }
            completion.clear_busy().await;
        });

        Ok(rx)
    }

    async fn clear_busy(&self, code: &RoomCode) {
        if let Err(e) = self.room.set_dm_active(code, false).await {
            tracing::warn!(%code, error = %e, "failed to clear dm_active");
        }
    }
}

fn build_request(
    room: &Room,
    history: &[emberhall_domain::Message],
    party: &[CharacterSheet],
    prompt: Option<String>,
) -> LlmRequest {
    let party_summary = if party.is_empty() {
        "No character sheets yet".to_string()
    } else {
        party
            .iter()
            .map(CharacterSheet::roster_line)
            .collect::<Vec<_>>()
            .join("; ")
    };

    let members: Vec<PartyMember<'_>> = party
        .iter()
        .map(|member| PartyMember {
            name: &member.player_name,
            class: &member.class_name,
            hp: member.hp,
        })
        .collect();
    let party_json = serde_json::to_string(&members).unwrap_or_else(|_| "[]".to_string());

    let campaign_summary = if room.summary.trim().is_empty() {
        "No campaign summary yet"
    } else {
        room.summary.trim()
    };

    let mut messages: Vec<ChatMessage> = history
        .iter()
        .map(|m| {
            let content = format!("{}: {}", m.transcript_prefix(), m.body);
            if m.is_dungeon_master() {
                ChatMessage::assistant(content)
            } else {
                ChatMessage::user(content)
            }
        })
        .collect();

    if let Some(prompt) = prompt.filter(|p| !p.trim().is_empty()) {
        messages.push(ChatMessage::user(prompt));
    }

    LlmRequest::new(messages).with_system_prompt(prompt_templates::dungeon_master(
        &party_summary,
        campaign_summary,
        &party_json,
    ))
}

/// Everything the spawned completion task needs after the HTTP handler has
/// already returned the stream.
struct Completion {
    room: Arc<dyn RoomRepo>,
    message: Arc<dyn MessageRepo>,
    clock: Arc<dyn ClockPort>,
    damage: Arc<ApplyDamage>,
    summarize: Arc<SummarizeRoom>,
    code: RoomCode,
    summary_count: u64,
}

impl Completion {
    async fn finish(&self, full_text: &str) -> Result<(), DmError> {
        let full_text = full_text.trim();
        if full_text.is_empty() {
            return Ok(());
        }

        let (narrative, damage_directives) = directives::extract(full_text);

        for directive in &damage_directives {
            let applied = self
                .damage
                .apply_to_sheet(
                    &self.code,
                    &directive.player_name,
                    f64::from(directive.amount),
                )
                .await;
            if let Err(e) = applied {
                // A directive naming an unknown sheet is the model's
                // mistake; the narrative still goes out.
                tracing::warn!(
                    code = %self.code,
                    player = %directive.player_name,
                    error = %e,
                    "damage directive skipped"
                );
            }
        }

        if narrative.is_empty() {
            return Ok(());
        }

        let message_count = self
            .message
            .append(&NewMessage {
                room_code: self.code.clone(),
                player_name: sender::DUNGEON_MASTER.to_string(),
                kind: MessageKind::Chat,
                body: narrative,
                created_at: self.clock.now(),
            })
            .await?;

        if Room::needs_summary_at(message_count, self.summary_count) {
            if let Err(e) = self.summarize.execute(self.code.as_str()).await {
                tracing::warn!(code = %self.code, error = %e, "post-reply summarization failed");
            }
        }

        Ok(())
    }

    async fn clear_busy(&self) {
        if let Err(e) = self.room.set_dm_active(&self.code, false).await {
            tracing::warn!(code = %self.code, error = %e, "failed to clear dm_active");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DmError {
    #[error("Missing roomCode or playerName")]
    MissingPlayerName,
    #[error("Room not found.")]
    RoomNotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        MockLlmPort, MockMessageRepo, MockPlayerRepo, MockRoomRepo,
    };
    use chrono::Utc;
    use emberhall_domain::{AbilityScores, CharacterSheetDraft, StatBlock, UserId};
    use futures_util::stream;

    fn sheet(player_name: &str, hp: f64) -> CharacterSheet {
        CharacterSheet::from_draft(
            RoomCode::parse("ABCDEF").expect("code"),
            UserId::new("user-1"),
            CharacterSheetDraft {
                player_name: player_name.to_string(),
                character_name: format!("{player_name} the Bold"),
                gender: "male".to_string(),
                race: "Dwarf".to_string(),
                stats: StatBlock::PointBuy {
                    stats: AbilityScores {
                        strength: 15,
                        dexterity: 10,
                        constitution: 14,
                        intelligence: 10,
                        wisdom: 12,
                        charisma: 10,
                    },
                },
                status: "healthy".to_string(),
                class_name: "Fighter".to_string(),
                hp,
                skills: vec![],
                backstory: String::new(),
                equipment: vec![],
            },
            Utc::now(),
        )
        .expect("sheet")
    }

    struct Mocks {
        room: MockRoomRepo,
        player: MockPlayerRepo,
        message: MockMessageRepo,
        llm: MockLlmPort,
    }

    fn mocks() -> Mocks {
        let mut room = MockRoomRepo::new();
        room.expect_get_by_code()
            .returning(|code| Ok(Some(Room::new(code.clone(), "Astra", Utc::now()))));
        // Busy flag set, then cleared, exactly once each.
        room.expect_set_dm_active()
            .withf(|_, active| *active)
            .times(1)
            .returning(|_, _| Ok(()));
        room.expect_set_dm_active()
            .withf(|_, active| !*active)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut message = MockMessageRepo::new();
        message.expect_list_recent().returning(|_, _| Ok(vec![]));

        let mut player = MockPlayerRepo::new();
        player.expect_list_by_room().returning(|_| Ok(vec![]));

        Mocks {
            room,
            player,
            message,
            llm: MockLlmPort::new(),
        }
    }

    fn use_case(m: Mocks) -> RespondAsDm {
        let room: Arc<dyn RoomRepo> = Arc::new(m.room);
        let player: Arc<dyn PlayerRepo> = Arc::new(m.player);
        let message: Arc<dyn MessageRepo> = Arc::new(m.message);
        let llm: Arc<dyn LlmPort> = Arc::new(m.llm);
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(Utc::now()));

        let damage = Arc::new(ApplyDamage::new(Arc::clone(&player), Arc::clone(&clock)));
        let summarize = Arc::new(SummarizeRoom::new(
            Arc::clone(&room),
            Arc::clone(&message),
            Arc::clone(&llm),
        ));

        RespondAsDm::new(room, player, message, llm, clock, damage, summarize)
    }

    async fn drain(mut stream: DmStream) -> Vec<Result<String, LlmError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn streams_tokens_and_persists_reply() {
        let mut m = mocks();
        m.llm.expect_generate_stream().returning(|_| {
            Ok(Box::pin(stream::iter(vec![
                Ok("The door ".to_string()),
                Ok("creaks open.".to_string()),
            ])) as _)
        });
        m.message
            .expect_append()
            .withf(|msg| {
                msg.player_name == sender::DUNGEON_MASTER
                    && msg.body == "The door creaks open."
                    && msg.kind == MessageKind::Chat
            })
            .times(1)
            .returning(|_| Ok(7));

        let stream = use_case(m)
            .execute("ABCDEF", "Borin", None)
            .await
            .expect("stream");

        let tokens = drain(stream).await;
        let text: String = tokens.into_iter().filter_map(|t| t.ok()).collect();
        assert_eq!(text, "The door creaks open.");
    }

    #[tokio::test]
    async fn applies_and_strips_damage_directives() {
        let mut m = mocks();
        m.llm.expect_generate_stream().returning(|_| {
            Ok(Box::pin(stream::iter(vec![Ok(
                "The blade bites. [DAMAGE: Borin 3]".to_string(),
            )])) as _)
        });
        m.player
            .expect_get_by_room_and_name()
            .withf(|_, name| name == "Borin")
            .returning(|_, _| Ok(Some(sheet("Borin", 12.0))));
        m.player
            .expect_set_hp()
            .withf(|_, hp, _| *hp == 9)
            .times(1)
            .returning(|_, _, _| Ok(()));
        m.message
            .expect_append()
            .withf(|msg| msg.body == "The blade bites.")
            .times(1)
            .returning(|_| Ok(8));

        let stream = use_case(m)
            .execute("ABCDEF", "Borin", None)
            .await
            .expect("stream");
        drain(stream).await;
    }

    #[tokio::test]
    async fn clears_busy_flag_when_stream_fails_midway() {
        let mut m = mocks();
        m.llm.expect_generate_stream().returning(|_| {
            Ok(Box::pin(stream::iter(vec![
                Ok("The ".to_string()),
                Err(LlmError::RequestFailed("connection reset".to_string())),
            ])) as _)
        });
        // No append expectation: an interrupted reply is not persisted.

        let stream = use_case(m)
            .execute("ABCDEF", "Borin", None)
            .await
            .expect("stream");

        let tokens = drain(stream).await;
        assert!(tokens.iter().any(|t| t.is_err()));
    }

    #[tokio::test]
    async fn clears_busy_flag_when_request_fails_up_front() {
        let mut m = mocks();
        m.llm
            .expect_generate_stream()
            .returning(|_| Err(LlmError::RequestFailed("refused".to_string())));

        let err = use_case(m)
            .execute("ABCDEF", "Borin", None)
            .await
            .expect_err("llm down");
        assert!(matches!(err, DmError::Llm(_)));
    }

    #[tokio::test]
    async fn blank_reply_is_not_persisted() {
        let mut m = mocks();
        m.llm.expect_generate_stream().returning(|_| {
            Ok(Box::pin(stream::iter(vec![Ok("   ".to_string())])) as _)
        });
        // No append expectation.

        let stream = use_case(m)
            .execute("ABCDEF", "Borin", None)
            .await
            .expect("stream");
        drain(stream).await;
    }

    #[tokio::test]
    async fn missing_player_name_is_rejected() {
        // Rejected before any repo call, so none of the mocks expect traffic.
        let m = Mocks {
            room: MockRoomRepo::new(),
            player: MockPlayerRepo::new(),
            message: MockMessageRepo::new(),
            llm: MockLlmPort::new(),
        };

        let err = use_case(m)
            .execute("ABCDEF", "  ", None)
            .await
            .expect_err("missing name");
        assert!(matches!(err, DmError::MissingPlayerName));
    }
}
