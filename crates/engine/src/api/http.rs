//! HTTP routes.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::app::App;
use crate::infrastructure::http::{dm_routes, message_routes, player_routes, room_routes};
use crate::infrastructure::ports::RepoError;
use crate::use_cases::character_sheet::{ApplyDamageError, DetailsError, SaveCharacterError};
use crate::use_cases::dm::DmError;
use crate::use_cases::message::{RollError, SendMessageError};
use crate::use_cases::room::{CreateRoomError, JoinRoomError, LeaveRoomError, RoomSettingsError};
use crate::use_cases::summary::SummarizeError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/rooms", post(room_routes::create_room))
        .route("/api/rooms/{code}", get(room_routes::get_room))
        .route(
            "/api/rooms/{code}/participants",
            get(room_routes::list_participants),
        )
        .route("/api/rooms/{code}/join", post(room_routes::join_room))
        .route("/api/rooms/{code}/leave", post(room_routes::leave_room))
        .route(
            "/api/rooms/{code}/turn-mode",
            put(room_routes::set_turn_mode),
        )
        .route("/api/rooms/{code}/start", post(room_routes::start_adventure))
        .route(
            "/api/rooms/{code}/messages",
            get(message_routes::list_messages).post(message_routes::send_message),
        )
        .route("/api/rooms/{code}/roll", post(message_routes::roll_dice))
        .route(
            "/api/rooms/{code}/characters",
            get(player_routes::list_players)
                .post(player_routes::create_player)
                .put(player_routes::upsert_player),
        )
        .route(
            "/api/rooms/{code}/characters/me",
            get(player_routes::get_my_player),
        )
        .route("/api/rooms/{code}/damage", post(player_routes::apply_damage))
        .route(
            "/api/character-details",
            post(player_routes::character_details),
        )
        .route("/api/dm", post(dm_routes::dm_response))
        .route("/api/summary", post(dm_routes::summarize))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<CreateRoomError> for ApiError {
    fn from(e: CreateRoomError) -> Self {
        match e {
            CreateRoomError::LeaderNameRequired => ApiError::BadRequest(e.to_string()),
            CreateRoomError::CodeAllocationExhausted => ApiError::Unavailable(e.to_string()),
            CreateRoomError::Repo(inner) => inner.into(),
        }
    }
}

impl From<JoinRoomError> for ApiError {
    fn from(e: JoinRoomError) -> Self {
        match e {
            JoinRoomError::RoomNotFound => ApiError::NotFound(e.to_string()),
            JoinRoomError::RoomFull => ApiError::Conflict(e.to_string()),
            JoinRoomError::PlayerNameRequired => ApiError::BadRequest(e.to_string()),
            JoinRoomError::Repo(inner) => inner.into(),
        }
    }
}

impl From<LeaveRoomError> for ApiError {
    fn from(e: LeaveRoomError) -> Self {
        match e {
            LeaveRoomError::Repo(inner) => inner.into(),
        }
    }
}

impl From<RoomSettingsError> for ApiError {
    fn from(e: RoomSettingsError) -> Self {
        match e {
            RoomSettingsError::RoomNotFound => ApiError::NotFound(e.to_string()),
            RoomSettingsError::NotLeader { .. } => ApiError::Forbidden(e.to_string()),
            RoomSettingsError::Repo(inner) => inner.into(),
        }
    }
}

impl From<SendMessageError> for ApiError {
    fn from(e: SendMessageError) -> Self {
        match e {
            SendMessageError::RoomNotFound => ApiError::NotFound(e.to_string()),
            SendMessageError::Repo(inner) => inner.into(),
        }
    }
}

impl From<RollError> for ApiError {
    fn from(e: RollError) -> Self {
        match e {
            RollError::Parse(inner) => ApiError::BadRequest(inner.to_string()),
            RollError::Send(inner) => inner.into(),
        }
    }
}

impl From<SaveCharacterError> for ApiError {
    fn from(e: SaveCharacterError) -> Self {
        match e {
            SaveCharacterError::NotAuthenticated => ApiError::Unauthorized(e.to_string()),
            SaveCharacterError::AlreadyExists => ApiError::Conflict(e.to_string()),
            SaveCharacterError::Domain(inner) => ApiError::BadRequest(inner.to_string()),
            // A concurrent create can slip past the existence pre-check and
            // hit the unique index instead; same duplicate, same status.
            SaveCharacterError::Repo(RepoError::ConstraintViolation(_)) => {
                ApiError::Conflict("Character already exists for this room.".to_string())
            }
            SaveCharacterError::Repo(inner) => inner.into(),
        }
    }
}

impl From<ApplyDamageError> for ApiError {
    fn from(e: ApplyDamageError) -> Self {
        match e {
            ApplyDamageError::NotAuthenticated => ApiError::Unauthorized(e.to_string()),
            ApplyDamageError::PlayerNotFound => ApiError::NotFound(e.to_string()),
            ApplyDamageError::Repo(inner) => inner.into(),
        }
    }
}

impl From<DetailsError> for ApiError {
    fn from(e: DetailsError) -> Self {
        match e {
            DetailsError::MissingClassOrRace => ApiError::BadRequest(e.to_string()),
            DetailsError::InvalidJson | DetailsError::Llm(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<SummarizeError> for ApiError {
    fn from(e: SummarizeError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<DmError> for ApiError {
    fn from(e: DmError) -> Self {
        match e {
            DmError::MissingPlayerName => ApiError::BadRequest(e.to_string()),
            DmError::RoomNotFound => ApiError::NotFound(e.to_string()),
            DmError::Repo(inner) => inner.into(),
            DmError::Llm(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}
