use thiserror::Error;

/// Validation failures raised while constructing domain entities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid telegram id: {0}")]
    InvalidTelegramId(i64),
}

/// Trims `value` and rejects it if nothing is left
pub(crate) fn required(field: &'static str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
