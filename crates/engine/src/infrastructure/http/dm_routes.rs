//! AI Dungeon Master routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use emberhall_shared::{DmRequest, SummaryRequest};

use crate::api::http::ApiError;
use crate::app::App;

/// Stream the DM's reply as plain text. Persistence of the full reply
/// happens in the background after the stream ends.
pub async fn dm_response(
    State(app): State<Arc<App>>,
    Json(req): Json<DmRequest>,
) -> Result<Response, ApiError> {
    if req.room_code.trim().is_empty() || req.player_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Missing roomCode or playerName".to_string(),
        ));
    }

    let stream = app
        .use_cases
        .dm_respond
        .execute(&req.room_code, &req.player_name, req.prompt)
        .await?;

    let response = (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response();
    Ok(response)
}

/// Explicit summarization trigger. Responds 204 whether or not a summary
/// was due; clients poll the room snapshot for the text.
pub async fn summarize(
    State(app): State<Arc<App>>,
    Json(req): Json<SummaryRequest>,
) -> Result<Response, ApiError> {
    if req.room_code.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing roomCode".to_string()));
    }

    app.use_cases.summarize.execute(&req.room_code).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
