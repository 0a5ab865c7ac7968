//! Message log use cases.

mod roll;
mod send;

pub use roll::{RollDice, RollError, RollOutcome};
pub use send::{SendMessage, SendMessageError, SendOutcome};
