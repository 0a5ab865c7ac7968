use std::sync::Arc;

use chrono::{TimeZone, Utc};

use emberhall_domain::{
    sender, AbilityScores, CharacterSheetDraft, DraftEquipmentItem, MessageKind, RoomCode,
    StatBlock, UserId, MAX_PARTICIPANTS,
};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use emberhall_shared::SummaryRequest;

use crate::app::App;
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::http::{dm_routes, message_routes};
use crate::infrastructure::ports::{
    ClockPort, FinishReason, LlmResponse, MessageRepo, MockLlmPort, ParticipantRepo, PlayerRepo,
    RandomPort, RoomRepo,
};
use crate::infrastructure::sqlite::SqliteRepositories;
use crate::use_cases::character_sheet::{ApplyDamage, SaveCharacter, SaveCharacterError, SaveMode};
use crate::use_cases::message::SendMessage;
use crate::use_cases::room::{CreateRoom, JoinRoom, JoinRoomError};

async fn open_repos(dir: &tempfile::TempDir) -> SqliteRepositories {
    let db_path = dir.path().join("emberhall.db");
    SqliteRepositories::connect(&db_path.to_string_lossy())
        .await
        .expect("connect sqlite")
}

fn fixed_clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap()))
}

fn draft(player_name: &str, hp: f64) -> CharacterSheetDraft {
    CharacterSheetDraft {
        player_name: player_name.to_string(),
        character_name: "Seren".to_string(),
        gender: "she/her".to_string(),
        race: "Elf".to_string(),
        stats: StatBlock::PointBuy {
            stats: AbilityScores {
                strength: 15,
                dexterity: 14,
                constitution: 13,
                intelligence: 12,
                wisdom: 10,
                charisma: 8,
            },
        },
        status: "Ready".to_string(),
        class_name: "Wizard".to_string(),
        hp,
        skills: vec!["Arcana".to_string()],
        backstory: "Raised in the vale.".to_string(),
        equipment: vec![DraftEquipmentItem {
            name: "Spellbook".to_string(),
            kind: "tool".to_string(),
            quantity: 1.0,
        }],
    }
}

#[tokio::test]
async fn create_join_and_capacity_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repos = open_repos(&dir).await;
    let clock = fixed_clock();
    let random: Arc<dyn RandomPort> = Arc::new(FixedRandom(0));

    let create = CreateRoom::new(
        repos.room.clone(),
        repos.message.clone(),
        clock.clone(),
        random,
    );
    let join = JoinRoom::new(
        repos.room.clone(),
        repos.participant.clone(),
        repos.message.clone(),
        clock.clone(),
    );

    let code = create.execute("Astra").await.expect("create room");

    let room = repos
        .room
        .get_by_code(&code)
        .await
        .expect("get room")
        .expect("room exists");
    assert_eq!(room.leader_name, "Astra");

    // The prolog is seeded as the first message.
    let messages = repos.message.list(&code).await.expect("list messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].player_name, sender::WORLD);
    assert_eq!(messages[0].kind, MessageKind::System);

    for i in 0..MAX_PARTICIPANTS {
        join.execute(&code.to_string(), &format!("Player{i}"))
            .await
            .expect("join within capacity");
    }

    let err = join
        .execute(&code.to_string(), "Latecomer")
        .await
        .expect_err("room is full");
    assert!(matches!(err, JoinRoomError::RoomFull));

    let participants = repos
        .participant
        .list_by_room(&code)
        .await
        .expect("list participants");
    assert_eq!(participants.len(), MAX_PARTICIPANTS as usize);
}

#[tokio::test]
async fn message_counter_survives_reconnect_and_flags_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("emberhall.db");
    let db_path_str = db_path.to_string_lossy().to_string();
    let clock = fixed_clock();

    let code = {
        let repos = SqliteRepositories::connect(&db_path_str)
            .await
            .expect("connect");
        let random: Arc<dyn RandomPort> = Arc::new(FixedRandom(0));
        let create = CreateRoom::new(
            repos.room.clone(),
            repos.message.clone(),
            clock.clone(),
            random,
        );
        create.execute("Astra").await.expect("create room")
    };

    // Reopen to simulate a restart; the counter must pick up where it left off.
    let repos = SqliteRepositories::connect(&db_path_str)
        .await
        .expect("reconnect");
    let send = SendMessage::new(repos.room.clone(), repos.message.clone(), clock);

    let code_str = code.to_string();
    let mut last = None;
    // Prolog already counts as message 1.
    for i in 0..19 {
        let outcome = send
            .execute(&code_str, "Astra", &format!("turn {i}"), MessageKind::Chat)
            .await
            .expect("send");
        last = Some(outcome);
    }

    let last = last.expect("sent messages");
    assert_eq!(last.message_count, 20);
    assert!(last.needs_summary);

    let messages = repos.message.list(&code).await.expect("list");
    assert_eq!(messages.len(), 20);
    // seq values are strictly increasing in listing order.
    assert!(messages.windows(2).all(|pair| pair[0].seq < pair[1].seq));
}

#[tokio::test]
async fn sheet_create_upsert_and_damage_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repos = open_repos(&dir).await;
    let clock = fixed_clock();

    let code = RoomCode::parse("ABCDEF").expect("code");
    let save = SaveCharacter::new(repos.player.clone(), clock.clone());
    let damage = ApplyDamage::new(repos.player.clone(), clock);

    let user = UserId::new("user_1");
    let sheet = save
        .execute(
            &code.to_string(),
            Some(user.clone()),
            draft("Astra", 12.0),
            SaveMode::Create,
        )
        .await
        .expect("create sheet");
    assert_eq!(sheet.hp, 12);

    let err = save
        .execute(
            &code.to_string(),
            Some(user.clone()),
            draft("Astra", 12.0),
            SaveMode::Create,
        )
        .await
        .expect_err("duplicate create");
    assert!(matches!(err, SaveCharacterError::AlreadyExists));

    let sheet = save
        .execute(
            &code.to_string(),
            Some(user.clone()),
            draft("Astra", 20.0),
            SaveMode::Upsert,
        )
        .await
        .expect("upsert sheet");
    assert_eq!(sheet.hp, 20);

    damage
        .execute(&code.to_string(), Some(user.clone()), "Astra", 7.0)
        .await
        .expect("apply damage");

    let stored = repos
        .player
        .get_by_room_and_user(&code, &user)
        .await
        .expect("get sheet")
        .expect("sheet exists");
    assert_eq!(stored.hp, 13);
    assert_eq!(stored.equipment.len(), 1);
    assert_eq!(stored.equipment[0].name, "Spellbook");
}

#[tokio::test]
async fn summary_endpoint_returns_no_content_either_way() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repos = open_repos(&dir).await;

    let mut llm = MockLlmPort::new();
    // One call total: the second trigger finds nothing due.
    llm.expect_generate().times(1).returning(|_| {
        Ok(LlmResponse {
            content: "The party descended into the vault.".to_string(),
            finish_reason: FinishReason::Stop,
            usage: None,
        })
    });

    let app = Arc::new(App::new(
        repos,
        Arc::new(llm),
        fixed_clock(),
        Arc::new(FixedRandom(0)),
    ));

    let code = app
        .use_cases
        .create_room
        .execute("Astra")
        .await
        .expect("create room");
    let code_str = code.to_string();
    // Prolog counts as message 1; 19 more reach the threshold.
    for i in 0..19 {
        app.use_cases
            .send_message
            .execute(&code_str, "Astra", &format!("turn {i}"), MessageKind::Chat)
            .await
            .expect("send");
    }

    let response = dm_routes::summarize(
        State(app.clone()),
        Json(SummaryRequest {
            room_code: code_str.clone(),
        }),
    )
    .await
    .expect("summarize");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let room = app
        .repositories
        .room
        .get_by_code(&code)
        .await
        .expect("get room")
        .expect("room exists");
    assert_eq!(room.summary, "The party descended into the vault.");
    assert_eq!(room.summary_count, 20);

    // Nothing new since the last summary: still 204, no second LLM call.
    let response = dm_routes::summarize(
        State(app.clone()),
        Json(SummaryRequest {
            room_code: code_str,
        }),
    )
    .await
    .expect("summarize again");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn messages_endpoint_honors_limit_query() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repos = open_repos(&dir).await;
    let app = Arc::new(App::new(
        repos,
        Arc::new(MockLlmPort::new()),
        fixed_clock(),
        Arc::new(FixedRandom(0)),
    ));

    let code = app
        .use_cases
        .create_room
        .execute("Astra")
        .await
        .expect("create room");
    let code_str = code.to_string();
    for i in 0..5 {
        app.use_cases
            .send_message
            .execute(&code_str, "Astra", &format!("turn {i}"), MessageKind::Chat)
            .await
            .expect("send");
    }

    let Json(all) = message_routes::list_messages(
        State(app.clone()),
        Path(code_str.clone()),
        Query(message_routes::ListMessagesQuery { limit: None }),
    )
    .await
    .expect("full list");
    assert_eq!(all.len(), 6);

    let Json(recent) = message_routes::list_messages(
        State(app.clone()),
        Path(code_str),
        Query(message_routes::ListMessagesQuery { limit: Some(3) }),
    )
    .await
    .expect("limited list");
    assert_eq!(recent.len(), 3);
    // The last three, still oldest first.
    assert_eq!(recent[0].body, "turn 2");
    assert_eq!(recent[2].body, "turn 4");
}
