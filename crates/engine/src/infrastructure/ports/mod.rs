//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - LLM calls (could swap Ollama -> Claude/OpenAI)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{MessageRepo, NewMessage, ParticipantRepo, PlayerRepo, RoomRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, FinishReason, LlmPort, LlmRequest, LlmResponse, MessageRole, TokenStream,
    TokenUsage,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockLlmPort;
#[cfg(test)]
pub use repos::{MockMessageRepo, MockParticipantRepo, MockPlayerRepo, MockRoomRepo};
#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{LlmError, RepoError};
