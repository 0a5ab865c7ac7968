//! HTTP route handlers, grouped by resource.

pub mod dm_routes;
pub mod message_routes;
pub mod player_routes;
pub mod room_routes;

use axum::http::HeaderMap;
use emberhall_domain::UserId;

/// Header carrying the auth provider's subject for sheet operations.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extract the caller's identity, if any.
pub fn user_id_from(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(UserId::new)
}
