//! Room lifecycle routes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use emberhall_domain::RoomCode;
use emberhall_shared::{
    CreateRoomRequest, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse, LeaveRoomRequest,
    ParticipantResponse, RoomResponse, StartAdventureRequest, TurnModeRequest,
};

use crate::api::http::ApiError;
use crate::app::App;

pub async fn create_room(
    State(app): State<Arc<App>>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    let code = app.use_cases.create_room.execute(&req.leader_name).await?;
    Ok(Json(CreateRoomResponse {
        code: code.to_string(),
    }))
}

pub async fn get_room(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
) -> Result<Json<RoomResponse>, ApiError> {
    let code = parse_code(&code)?;
    let room = app
        .repositories
        .room
        .get_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Room not found.".to_string()))?;
    Ok(Json(room.into()))
}

pub async fn list_participants(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
) -> Result<Json<Vec<ParticipantResponse>>, ApiError> {
    let code = parse_code(&code)?;
    let participants = app.repositories.participant.list_by_room(&code).await?;
    Ok(Json(
        participants.into_iter().map(Into::into).collect(),
    ))
}

pub async fn join_room(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let joined = app
        .use_cases
        .join_room
        .execute(&code, &req.player_name)
        .await?;
    Ok(Json(JoinRoomResponse {
        participant_id: joined.participant_id,
        room_code: joined.room_code.to_string(),
    }))
}

pub async fn leave_room(
    State(app): State<Arc<App>>,
    Path(_code): Path<String>,
    Json(req): Json<LeaveRoomRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    app.use_cases.leave_room.execute(req.participant_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub async fn set_turn_mode(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    Json(req): Json<TurnModeRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    app.use_cases
        .room_settings
        .set_turn_mode(&code, &req.leader_name, req.enabled)
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub async fn start_adventure(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    Json(req): Json<StartAdventureRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    app.use_cases
        .room_settings
        .start_adventure(&code, &req.leader_name)
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub(super) fn parse_code(code: &str) -> Result<RoomCode, ApiError> {
    RoomCode::parse(code).map_err(|_| ApiError::NotFound("Room not found.".to_string()))
}
