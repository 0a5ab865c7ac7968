//! Unified error types for the domain layer.
//!
//! Provides a common error type used across all domain operations, so
//! adapters and use cases never fall back to String or anyhow.

use thiserror::Error;

use crate::dice::RollParseError;

/// Unified error type for domain operations.
///
/// Presence, capacity, and authorization failures are reported by the
/// use-case layer; the domain only rejects malformed values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., empty name, malformed room code)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Point-buy stat budget violated
    #[error("Stats do not match the point buy rules (cost {cost} of budget {budget})")]
    StatBudget { cost: u32, budget: u32 },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants are violated: required fields empty,
    /// values outside allowed ranges, malformed identifiers.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<RollParseError> for DomainError {
    fn from(err: RollParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("Player name is required.");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: Player name is required.");
    }

    #[test]
    fn test_stat_budget_error() {
        let err = DomainError::StatBudget {
            cost: 28,
            budget: 27,
        };
        assert_eq!(
            err.to_string(),
            "Stats do not match the point buy rules (cost 28 of budget 27)"
        );
    }

    #[test]
    fn test_from_roll_parse_error() {
        let roll_err = RollParseError::Empty;
        let domain_err: DomainError = roll_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
    }
}
