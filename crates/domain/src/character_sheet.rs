//! Character sheets and the point-buy rules engine.
//!
//! One sheet per (room, authenticated identity). Stat blocks are versioned:
//! the current point-buy variant carries six abilities validated against a
//! fixed cost table, while the legacy scalar variant is kept readable for
//! sheets that predate point-buy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{PlayerId, UserId};
use crate::room::RoomCode;

/// Total points a point-buy spread may spend.
pub const POINT_BUY_BUDGET: u32 = 27;

/// Class assigned when the player leaves the field blank.
pub const DEFAULT_CLASS: &str = "Adventurer";

/// Point-buy cost of a single ability score.
///
/// Scores outside [8, 15] have no cost - they are always invalid.
pub fn point_buy_cost(score: u8) -> Option<u32> {
    match score {
        8 => Some(0),
        9 => Some(1),
        10 => Some(2),
        11 => Some(3),
        12 => Some(4),
        13 => Some(5),
        14 => Some(7),
        15 => Some(9),
        _ => None,
    }
}

/// The six D&D ability scores. Wire keys are the short D&D forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "str")]
    pub strength: u8,
    #[serde(rename = "dex")]
    pub dexterity: u8,
    #[serde(rename = "con")]
    pub constitution: u8,
    #[serde(rename = "int")]
    pub intelligence: u8,
    #[serde(rename = "wis")]
    pub wisdom: u8,
    #[serde(rename = "cha")]
    pub charisma: u8,
}

impl AbilityScores {
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        ]
    }

    /// Total point-buy cost, or `None` when any score is out of range.
    pub fn total_cost(&self) -> Option<u32> {
        self.as_array()
            .iter()
            .try_fold(0u32, |sum, &score| Some(sum + point_buy_cost(score)?))
    }

    /// Validate the point-buy invariant: every score in [8, 15] and total
    /// cost within budget.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.total_cost() {
            Some(cost) if cost <= POINT_BUY_BUDGET => Ok(()),
            Some(cost) => Err(DomainError::StatBudget {
                cost,
                budget: POINT_BUY_BUDGET,
            }),
            None => Err(DomainError::validation(
                "Ability scores must be between 8 and 15.",
            )),
        }
    }
}

/// Versioned stat block.
///
/// `PointBuy` is the current ruleset; `Legacy` preserves early sheets that
/// stored three scalar attributes and is exempt from budget validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum StatBlock {
    PointBuy { stats: AbilityScores },
    Legacy {
        strength: u8,
        dexterity: u8,
        intelligence: u8,
    },
}

impl StatBlock {
    /// Validate whatever rules apply to this variant.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::PointBuy { stats } => stats.validate(),
            Self::Legacy { .. } => Ok(()),
        }
    }
}

/// A carried item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    pub name: String,
    /// Loose category label ("weapon", "tool", "flavor", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: u32,
}

/// Raw sheet input before normalization.
///
/// Numeric fields arrive as `f64` because the wire format is JSON; they are
/// floored and clamped during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheetDraft {
    pub player_name: String,
    pub character_name: String,
    pub gender: String,
    pub race: String,
    pub stats: StatBlock,
    pub status: String,
    pub class_name: String,
    pub hp: f64,
    pub skills: Vec<String>,
    pub backstory: String,
    pub equipment: Vec<DraftEquipmentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEquipmentItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: f64,
}

/// A persisted character sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    pub id: PlayerId,
    pub room_code: RoomCode,
    pub user_id: UserId,
    pub player_name: String,
    pub character_name: String,
    pub gender: String,
    pub race: String,
    pub stats: StatBlock,
    pub status: String,
    pub class_name: String,
    pub hp: u32,
    pub skills: Vec<String>,
    pub backstory: String,
    pub equipment: Vec<EquipmentItem>,
    pub updated_at: DateTime<Utc>,
}

impl CharacterSheet {
    /// Validate and normalize a draft into a sheet.
    ///
    /// - blank display name, character name, or gender is rejected
    /// - class defaults to "Adventurer" when blank
    /// - hp is floored and clamped at 0
    /// - skills are trimmed, empties dropped
    /// - equipment quantities are floored and clamped at 1; unnamed items
    ///   are dropped
    pub fn from_draft(
        room_code: RoomCode,
        user_id: UserId,
        draft: CharacterSheetDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let player_name = draft.player_name.trim().to_string();
        let character_name = draft.character_name.trim().to_string();
        let gender = draft.gender.trim().to_string();
        let class_name = draft.class_name.trim().to_string();

        if player_name.is_empty() {
            return Err(DomainError::validation("Player name is required."));
        }
        if character_name.is_empty() {
            return Err(DomainError::validation("Character name is required."));
        }
        if gender.is_empty() {
            return Err(DomainError::validation("Gender is required."));
        }

        draft.stats.validate()?;

        let skills = draft
            .skills
            .iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect();

        let equipment = draft
            .equipment
            .iter()
            .map(|item| EquipmentItem {
                name: item.name.trim().to_string(),
                kind: item.kind.trim().to_string(),
                quantity: (item.quantity.floor().max(1.0)) as u32,
            })
            .filter(|item| !item.name.is_empty())
            .collect();

        Ok(Self {
            id: PlayerId::new(),
            room_code,
            user_id,
            player_name,
            character_name,
            gender,
            race: draft.race,
            stats: draft.stats,
            status: draft.status,
            class_name: if class_name.is_empty() {
                DEFAULT_CLASS.to_string()
            } else {
                class_name
            },
            hp: draft.hp.floor().max(0.0) as u32,
            skills,
            backstory: draft.backstory.trim().to_string(),
            equipment,
            updated_at: now,
        })
    }

    /// Apply damage, clamping hp at 0.
    pub fn apply_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// One roster line for the DM prompt: name, class, hp, carried items.
    pub fn roster_line(&self) -> String {
        let inventory = if self.equipment.is_empty() {
            "empty".to_string()
        } else {
            self.equipment
                .iter()
                .map(|item| item.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} the {} (HP {}, inventory: {})",
            self.player_name, self.class_name, self.hp, inventory
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_scores() -> AbilityScores {
        // 9 + 7 + 5 + 4 + 2 + 0 = 27, exactly on budget
        AbilityScores {
            strength: 15,
            dexterity: 14,
            constitution: 13,
            intelligence: 12,
            wisdom: 10,
            charisma: 8,
        }
    }

    fn draft(stats: StatBlock) -> CharacterSheetDraft {
        CharacterSheetDraft {
            player_name: "Astra".to_string(),
            character_name: "Seren".to_string(),
            gender: "she/her".to_string(),
            race: "Elf".to_string(),
            stats,
            status: "Ready".to_string(),
            class_name: "Wizard".to_string(),
            hp: 12.0,
            skills: vec!["Arcana".to_string(), "  ".to_string()],
            backstory: " Raised in the vale. ".to_string(),
            equipment: vec![
                DraftEquipmentItem {
                    name: " Spellbook ".to_string(),
                    kind: "tool".to_string(),
                    quantity: 0.4,
                },
                DraftEquipmentItem {
                    name: "".to_string(),
                    kind: "weapon".to_string(),
                    quantity: 2.0,
                },
            ],
        }
    }

    #[test]
    fn cost_table_matches_fixed_values() {
        assert_eq!(point_buy_cost(8), Some(0));
        assert_eq!(point_buy_cost(13), Some(5));
        assert_eq!(point_buy_cost(14), Some(7));
        assert_eq!(point_buy_cost(15), Some(9));
        assert_eq!(point_buy_cost(7), None);
        assert_eq!(point_buy_cost(16), None);
    }

    #[test]
    fn exact_budget_spread_is_accepted() {
        assert_eq!(valid_scores().total_cost(), Some(27));
        assert!(valid_scores().validate().is_ok());
    }

    #[test]
    fn over_budget_spread_is_rejected() {
        // 9 + 7 + 5 + 4 + 2 + 1 = 28: one point over
        let scores = AbilityScores {
            strength: 15,
            dexterity: 14,
            constitution: 13,
            intelligence: 12,
            wisdom: 10,
            charisma: 9,
        };
        assert!(matches!(
            scores.validate(),
            Err(DomainError::StatBudget { cost: 28, .. })
        ));
    }

    #[test]
    fn out_of_range_score_is_always_invalid() {
        let scores = AbilityScores {
            strength: 16,
            dexterity: 8,
            constitution: 8,
            intelligence: 8,
            wisdom: 8,
            charisma: 8,
        };
        assert_eq!(scores.total_cost(), None);
        assert!(matches!(
            scores.validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn legacy_stat_block_skips_budget_validation() {
        let block = StatBlock::Legacy {
            strength: 18,
            dexterity: 3,
            intelligence: 11,
        };
        assert!(block.validate().is_ok());
    }

    #[test]
    fn stat_block_variant_tag_round_trips() {
        let block = StatBlock::PointBuy {
            stats: valid_scores(),
        };
        let json = serde_json::to_string(&block).expect("serialize");
        assert!(json.contains("\"variant\":\"pointBuy\""));
        let back: StatBlock = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, block);
    }

    #[test]
    fn from_draft_normalizes_fields() {
        let sheet = CharacterSheet::from_draft(
            RoomCode::parse("ABCDEF").expect("code"),
            UserId::new("user_1"),
            draft(StatBlock::PointBuy {
                stats: valid_scores(),
            }),
            Utc::now(),
        )
        .expect("valid draft");

        assert_eq!(sheet.skills, vec!["Arcana".to_string()]);
        assert_eq!(sheet.backstory, "Raised in the vale.");
        assert_eq!(sheet.equipment.len(), 1);
        assert_eq!(sheet.equipment[0].name, "Spellbook");
        assert_eq!(sheet.equipment[0].quantity, 1);
    }

    #[test]
    fn blank_class_defaults_to_adventurer() {
        let mut d = draft(StatBlock::PointBuy {
            stats: valid_scores(),
        });
        d.class_name = "  ".to_string();
        let sheet = CharacterSheet::from_draft(
            RoomCode::parse("ABCDEF").expect("code"),
            UserId::new("user_1"),
            d,
            Utc::now(),
        )
        .expect("valid draft");
        assert_eq!(sheet.class_name, DEFAULT_CLASS);
    }

    #[test]
    fn blank_character_name_is_rejected() {
        let mut d = draft(StatBlock::PointBuy {
            stats: valid_scores(),
        });
        d.character_name = " ".to_string();
        let err = CharacterSheet::from_draft(
            RoomCode::parse("ABCDEF").expect("code"),
            UserId::new("user_1"),
            d,
            Utc::now(),
        )
        .expect_err("blank name");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_hp_is_clamped_to_zero() {
        let mut d = draft(StatBlock::PointBuy {
            stats: valid_scores(),
        });
        d.hp = -3.0;
        let sheet = CharacterSheet::from_draft(
            RoomCode::parse("ABCDEF").expect("code"),
            UserId::new("user_1"),
            d,
            Utc::now(),
        )
        .expect("valid draft");
        assert_eq!(sheet.hp, 0);
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut sheet = CharacterSheet::from_draft(
            RoomCode::parse("ABCDEF").expect("code"),
            UserId::new("user_1"),
            draft(StatBlock::PointBuy {
                stats: valid_scores(),
            }),
            Utc::now(),
        )
        .expect("valid draft");
        sheet.hp = 5;
        sheet.apply_damage(999);
        assert_eq!(sheet.hp, 0);
    }

    #[test]
    fn roster_line_lists_inventory() {
        let sheet = CharacterSheet::from_draft(
            RoomCode::parse("ABCDEF").expect("code"),
            UserId::new("user_1"),
            draft(StatBlock::PointBuy {
                stats: valid_scores(),
            }),
            Utc::now(),
        )
        .expect("valid draft");
        assert_eq!(
            sheet.roster_line(),
            "Astra the Wizard (HP 12, inventory: Spellbook)"
        );
    }
}
