// HTTP handlers, one module per resource

pub mod auth;
pub mod children;
pub mod employees;
pub mod groups;
pub mod organizations;
pub mod parents;
pub mod users;

use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::domain::TelegramId;

/// Parses an id path segment
///
/// A segment that is not a UUID cannot name an existing record, so it is
/// reported as not found rather than as a malformed request.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} {} not found", kind, raw)))
}

/// Parses a telegram id path segment
pub(crate) fn parse_tg_id(raw: &str) -> Result<TelegramId, ApiError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid telegram id: {}", raw)))?;
    Ok(TelegramId::new(id)?)
}
