//! Slash-command dice parsing.
//!
//! The composer accepts `/roll d20`. Only the d20 is supported: rolls feed
//! DC checks the DM narrates, and the DC scale assumes a twenty-sided die.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when parsing a `/roll` command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollParseError {
    /// The input is empty or not a `/roll` command at all
    #[error("Empty roll command")]
    Empty,
    /// Not of the form `/roll dN`
    #[error("Use /roll d20 to roll a twenty-sided die.")]
    InvalidFormat,
    /// Die size parsed but is not playable
    #[error("Invalid die size.")]
    InvalidDieSize,
    /// A die other than the d20
    #[error("Only d20 rolls are supported right now.")]
    UnsupportedDie(u32),
}

/// A parsed roll command like `/roll d20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollCommand {
    pub sides: u32,
}

impl RollCommand {
    /// Parse a composer line.
    ///
    /// Returns `Ok(None)` when the input is not a roll command at all (it
    /// should be sent as ordinary chat), and an error when it starts with
    /// `/roll` but is malformed or asks for an unsupported die.
    pub fn parse(input: &str) -> Result<Option<Self>, RollParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RollParseError::Empty);
        }
        if !trimmed.starts_with("/roll") {
            return Ok(None);
        }

        let rest = trimmed["/roll".len()..].trim();
        let sides = rest
            .strip_prefix(['d', 'D'])
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or(RollParseError::InvalidFormat)?;

        if sides == 0 {
            return Err(RollParseError::InvalidDieSize);
        }
        if sides != 20 {
            return Err(RollParseError::UnsupportedDie(sides));
        }

        Ok(Some(Self { sides }))
    }

    /// The system-message body for a result of this roll.
    pub fn result_body(&self, result: u32) -> String {
        format!("rolled d{}: {}", self.sides, result)
    }
}

impl fmt::Display for RollCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/roll d{}", self.sides)
    }
}
