//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod http;
pub mod ollama;
pub mod ports;
pub mod sqlite;

#[cfg(test)]
mod sqlite_integration_tests;
