//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    ports::{ClockPort, LlmPort, MessageRepo, ParticipantRepo, PlayerRepo, RandomPort, RoomRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases::{
    character_sheet::{ApplyDamage, GenerateCharacterDetails, SaveCharacter},
    dm::RespondAsDm,
    message::{RollDice, SendMessage},
    room::{CreateRoom, JoinRoom, LeaveRoom, RoomSettings},
    summary::SummarizeRoom,
};

/// Main application state.
///
/// Holds all repositories and use cases. Passed to HTTP handlers via Axum
/// state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Port traits injected directly; handlers read through these for queries.
pub struct Repositories {
    pub room: Arc<dyn RoomRepo>,
    pub participant: Arc<dyn ParticipantRepo>,
    pub player: Arc<dyn PlayerRepo>,
    pub message: Arc<dyn MessageRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub create_room: CreateRoom,
    pub join_room: JoinRoom,
    pub leave_room: LeaveRoom,
    pub room_settings: RoomSettings,
    pub send_message: Arc<SendMessage>,
    pub roll_dice: RollDice,
    pub save_character: SaveCharacter,
    pub apply_damage: Arc<ApplyDamage>,
    pub character_details: GenerateCharacterDetails,
    pub summarize: Arc<SummarizeRoom>,
    pub dm_respond: RespondAsDm,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repos: SqliteRepositories,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let room: Arc<dyn RoomRepo> = repos.room.clone();
        let participant: Arc<dyn ParticipantRepo> = repos.participant.clone();
        let player: Arc<dyn PlayerRepo> = repos.player.clone();
        let message: Arc<dyn MessageRepo> = repos.message.clone();

        let send_message = Arc::new(SendMessage::new(
            room.clone(),
            message.clone(),
            clock.clone(),
        ));
        let apply_damage = Arc::new(ApplyDamage::new(player.clone(), clock.clone()));
        let summarize = Arc::new(SummarizeRoom::new(
            room.clone(),
            message.clone(),
            llm.clone(),
        ));

        let use_cases = UseCases {
            create_room: CreateRoom::new(
                room.clone(),
                message.clone(),
                clock.clone(),
                random.clone(),
            ),
            join_room: JoinRoom::new(
                room.clone(),
                participant.clone(),
                message.clone(),
                clock.clone(),
            ),
            leave_room: LeaveRoom::new(participant.clone(), message.clone(), clock.clone()),
            room_settings: RoomSettings::new(room.clone()),
            send_message: send_message.clone(),
            roll_dice: RollDice::new(send_message.clone(), random),
            save_character: SaveCharacter::new(player.clone(), clock.clone()),
            apply_damage: apply_damage.clone(),
            character_details: GenerateCharacterDetails::new(llm.clone()),
            summarize: summarize.clone(),
            dm_respond: RespondAsDm::new(
                room.clone(),
                player.clone(),
                message.clone(),
                llm.clone(),
                clock,
                apply_damage,
                summarize,
            ),
        };

        Self {
            repositories: Repositories {
                room,
                participant,
                player,
                message,
            },
            use_cases,
        }
    }
}
