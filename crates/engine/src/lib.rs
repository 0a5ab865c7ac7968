//! Emberhall Engine - room orchestration, message log, and the AI Dungeon
//! Master behind the HTTP API.

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod prompt_templates;
pub mod use_cases;

pub use app::App;
