//! Campaign summarization use case.
//!
//! Rolls the last stretch of the log into a 3-5 sentence digest. All the
//! "should we even run" guards live here so concurrent triggers collapse
//! into one summary per threshold.

use std::sync::Arc;

use emberhall_domain::RoomCode;

use crate::infrastructure::ports::{
    ChatMessage, LlmError, LlmPort, LlmRequest, MessageRepo, RepoError, RoomRepo,
};
use crate::prompt_templates;

/// How much history feeds one summary pass.
const SUMMARY_WINDOW: u32 = 20;

pub struct SummarizeRoom {
    room: Arc<dyn RoomRepo>,
    message: Arc<dyn MessageRepo>,
    llm: Arc<dyn LlmPort>,
}

impl SummarizeRoom {
    pub fn new(
        room: Arc<dyn RoomRepo>,
        message: Arc<dyn MessageRepo>,
        llm: Arc<dyn LlmPort>,
    ) -> Self {
        Self { room, message, llm }
    }

    /// Returns the new summary, or `None` when nothing was due.
    pub async fn execute(&self, room_code: &str) -> Result<Option<String>, SummarizeError> {
        let Ok(code) = RoomCode::parse(room_code) else {
            return Ok(None);
        };
        let Some(room) = self.room.get_by_code(&code).await? else {
            return Ok(None);
        };
        if !room.summary_due() {
            return Ok(None);
        }

        // Pin the count before the slow LLM call; messages arriving during
        // generation stay pending for the next threshold.
        let count_at_start = room.message_count;

        let history = self.message.list_recent(&code, SUMMARY_WINDOW).await?;
        let transcript = history
            .iter()
            .map(|m| format!("{}: {}", m.transcript_prefix(), m.body))
            .collect::<Vec<_>>()
            .join("\n");

        let previous = if room.summary.is_empty() {
            "None"
        } else {
            room.summary.as_str()
        };

        let request = LlmRequest::new(vec![ChatMessage::user(format!(
            "Previous summary: {previous}\nRecent log:\n{transcript}"
        ))])
        .with_system_prompt(prompt_templates::chronicler());

        let response = self.llm.generate(request).await?;
        let summary = response.content.trim();
        if summary.is_empty() {
            return Ok(None);
        }

        self.room
            .update_summary(&code, summary, count_at_start)
            .await?;

        tracing::info!(%code, summary_count = count_at_start, "campaign summary updated");
        Ok(Some(summary.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}
