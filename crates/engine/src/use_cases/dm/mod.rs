//! AI Dungeon Master use cases.

pub mod directives;
mod respond;

pub use respond::{DmError, DmStream, RespondAsDm};
