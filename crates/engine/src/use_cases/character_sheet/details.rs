//! Character details generation use case.
//!
//! Asks the LLM for a backstory, skills, and equipment constrained to a
//! fixed JSON schema, then normalizes the payload the same way a sheet
//! draft is normalized.

use std::sync::Arc;

use serde::Deserialize;

use emberhall_domain::EquipmentItem;

use crate::infrastructure::ports::{ChatMessage, LlmError, LlmPort, LlmRequest};
use crate::prompt_templates;

#[derive(Debug, Clone)]
pub struct CharacterDetails {
    pub backstory: String,
    pub skills: Vec<String>,
    pub equipment: Vec<EquipmentItem>,
}

/// Raw payload as the model emits it; quantities arrive as JSON numbers.
#[derive(Debug, Deserialize)]
struct RawDetails {
    #[serde(default)]
    backstory: String,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    equipment: Vec<RawEquipmentItem>,
}

#[derive(Debug, Deserialize)]
struct RawEquipmentItem {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default = "default_quantity")]
    quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

pub struct GenerateCharacterDetails {
    llm: Arc<dyn LlmPort>,
}

impl GenerateCharacterDetails {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn execute(
        &self,
        class_name: &str,
        race: &str,
    ) -> Result<CharacterDetails, DetailsError> {
        let class_name = class_name.trim();
        let race = race.trim();
        if class_name.is_empty() || race.is_empty() {
            return Err(DetailsError::MissingClassOrRace);
        }

        let request = LlmRequest::new(vec![ChatMessage::user(format!(
            "Class: {class_name}. Race: {race}."
        ))])
        .with_system_prompt(prompt_templates::character_details());

        let response = self.llm.generate(request).await?;
        let raw: RawDetails = serde_json::from_str(response.content.trim())
            .map_err(|_| DetailsError::InvalidJson)?;

        Ok(normalize(raw))
    }
}

fn normalize(raw: RawDetails) -> CharacterDetails {
    CharacterDetails {
        backstory: raw.backstory.trim().to_string(),
        skills: raw
            .skills
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect(),
        equipment: raw
            .equipment
            .into_iter()
            .map(|item| EquipmentItem {
                name: item.name.trim().to_string(),
                kind: item.kind.trim().to_string(),
                quantity: item.quantity.floor().max(1.0) as u32,
            })
            .filter(|item| !item.name.is_empty())
            .collect(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetailsError {
    #[error("Missing class or race")]
    MissingClassOrRace,
    #[error("Failed to parse details JSON")]
    InvalidJson,
    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{FinishReason, LlmResponse, MockLlmPort};

    fn llm_returning(content: &str) -> MockLlmPort {
        let content = content.to_string();
        let mut llm = MockLlmPort::new();
        llm.expect_generate().returning(move |_| {
            Ok(LlmResponse {
                content: content.clone(),
                finish_reason: FinishReason::Stop,
                usage: None,
            })
        });
        llm
    }

    #[tokio::test]
    async fn parses_and_normalizes_payload() {
        let llm = llm_returning(
            r#"{"backstory":" Raised by wolves. Sworn to the moon. ",
                "skills":[" Stealth ", "", "Survival"],
                "equipment":[
                    {"name":" Dagger ","type":"weapon","quantity":2.7},
                    {"name":"","type":"junk","quantity":1},
                    {"name":"Lucky coin","type":"trinket","quantity":0}
                ]}"#,
        );

        let details = GenerateCharacterDetails::new(Arc::new(llm))
            .execute("Rogue", "Elf")
            .await
            .expect("details");

        assert_eq!(details.backstory, "Raised by wolves. Sworn to the moon.");
        assert_eq!(details.skills, vec!["Stealth", "Survival"]);
        assert_eq!(details.equipment.len(), 2);
        assert_eq!(details.equipment[0].quantity, 2);
        // quantity is clamped up to 1
        assert_eq!(details.equipment[1].quantity, 1);
    }

    #[tokio::test]
    async fn non_json_reply_is_an_error() {
        let llm = llm_returning("Once upon a time...");

        let err = GenerateCharacterDetails::new(Arc::new(llm))
            .execute("Rogue", "Elf")
            .await
            .expect_err("not json");
        assert!(matches!(err, DetailsError::InvalidJson));
    }

    #[tokio::test]
    async fn blank_class_or_race_is_rejected() {
        let err = GenerateCharacterDetails::new(Arc::new(MockLlmPort::new()))
            .execute("  ", "Elf")
            .await
            .expect_err("blank class");
        assert!(matches!(err, DetailsError::MissingClassOrRace));
    }
}
