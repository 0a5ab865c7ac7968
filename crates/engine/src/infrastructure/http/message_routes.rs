//! Message log routes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use emberhall_domain::MessageKind;
use emberhall_shared::{
    MessageResponse, RollRequest, RollResponse, SendMessageRequest, SendMessageResponse,
};

use crate::api::http::ApiError;
use crate::app::App;
use crate::infrastructure::http::room_routes::parse_code;

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<u32>,
}

/// Full log by default; `?limit=N` returns the N most recent entries, still
/// in chronological order.
pub async fn list_messages(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let code = parse_code(&code)?;
    let messages = match query.limit {
        Some(limit) => app.repositories.message.list_recent(&code, limit).await?,
        None => app.repositories.message.list(&code).await?,
    };
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

pub async fn send_message(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let kind = match req.kind.as_deref() {
        Some("system") => MessageKind::System,
        _ => MessageKind::Chat,
    };

    let outcome = app
        .use_cases
        .send_message
        .execute(&code, &req.player_name, &req.body, kind)
        .await?;

    // The summary hint is resolved server-side; clients only observe the
    // counters.
    if outcome.needs_summary {
        if let Err(e) = app.use_cases.summarize.execute(&code).await {
            tracing::warn!(code, error = %e, "summarization after send failed");
        }
    }

    Ok(Json(SendMessageResponse {
        message_count: outcome.message_count,
        needs_summary: outcome.needs_summary,
    }))
}

pub async fn roll_dice(
    State(app): State<Arc<App>>,
    Path(code): Path<String>,
    Json(req): Json<RollRequest>,
) -> Result<Json<RollResponse>, ApiError> {
    let outcome = app
        .use_cases
        .roll_dice
        .execute(&code, &req.player_name, &req.command)
        .await?;

    if outcome.needs_summary {
        if let Err(e) = app.use_cases.summarize.execute(&code).await {
            tracing::warn!(code, error = %e, "summarization after roll failed");
        }
    }

    Ok(Json(RollResponse {
        result: outcome.result,
        message_count: outcome.message_count,
        needs_summary: outcome.needs_summary,
    }))
}
