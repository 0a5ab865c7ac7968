//! Emberhall wire contracts.
//!
//! Request and response DTOs exchanged between the engine's HTTP API and
//! its clients. All payloads are camelCase JSON.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
