//! Character sheet routes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use emberhall_shared::{
    ApplyDamageRequest, CharacterDetailsRequest, CharacterDetailsResponse, CharacterSheetResponse,
    SaveCharacterRequest,
};

use crate::api::http::ApiError;
use crate::app::App;
use crate::infrastructure::http::{room_routes::parse_code, user_id_from};
use crate::use_cases::character_sheet::SaveMode;

pub async fn list_players(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
) -> Result<Json<Vec<CharacterSheetResponse>>, ApiError> {
    let code = parse_code(&code)?;
    let sheets = app.repositories.player.list_by_room(&code).await?;
    Ok(Json(sheets.into_iter().map(Into::into).collect()))
}

pub async fn get_my_player(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CharacterSheetResponse>, ApiError> {
    let user_id =
        user_id_from(&headers).ok_or_else(|| ApiError::Unauthorized("Not authenticated.".to_string()))?;
    let code = parse_code(&code)?;
    let sheet = app
        .repositories
        .player
        .get_by_room_and_user(&code, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found.".to_string()))?;
    Ok(Json(sheet.into()))
}

pub async fn create_player(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SaveCharacterRequest>,
) -> Result<Json<CharacterSheetResponse>, ApiError> {
    let sheet = app
        .use_cases
        .save_character
        .execute(&code, user_id_from(&headers), req.draft, SaveMode::Create)
        .await?;
    Ok(Json(sheet.into()))
}

pub async fn upsert_player(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SaveCharacterRequest>,
) -> Result<Json<CharacterSheetResponse>, ApiError> {
    let sheet = app
        .use_cases
        .save_character
        .execute(&code, user_id_from(&headers), req.draft, SaveMode::Upsert)
        .await?;
    Ok(Json(sheet.into()))
}

pub async fn apply_damage(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(req): Json<ApplyDamageRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    app.use_cases
        .apply_damage
        .execute(&code, user_id_from(&headers), &req.player_name, req.amount)
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub async fn character_details(
    State(app): State<Arc<App>>,
    Json(req): Json<CharacterDetailsRequest>,
) -> Result<Json<CharacterDetailsResponse>, ApiError> {
    let details = app
        .use_cases
        .character_details
        .execute(&req.class_name, &req.race)
        .await?;
    Ok(Json(CharacterDetailsResponse {
        backstory: details.backstory,
        skills: details.skills,
        equipment: details.equipment,
    }))
}
