use thiserror::Error;

/// Upper bound the backend enforces for one chat message.
pub const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Message cannot be empty")]
    Empty,
    #[error("Message is too long (max 5000 characters)")]
    TooLong,
}

/// Returns the trimmed message when it is sendable. The session
/// controller trusts this precondition and does not re-check it.
pub fn validate_message(message: &str) -> Result<&str, ValidationError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() > MAX_MESSAGE_LEN {
        return Err(ValidationError::TooLong);
    }
    Ok(trimmed)
}
