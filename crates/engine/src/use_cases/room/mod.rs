//! Room lifecycle use cases.

mod create;
mod join;
mod leave;
mod settings;

pub use create::{CreateRoom, CreateRoomError};
pub use join::{JoinRoom, JoinRoomError, JoinedRoom};
pub use leave::{LeaveRoom, LeaveRoomError};
pub use settings::{RoomSettings, RoomSettingsError};
