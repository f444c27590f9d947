//! Maps typed exchange failures onto the fixed, user-safe sentences the
//! presentation layer shows. Raw transport internals never pass through.

use shared::error::{ChatApiError, ErrorCode};

pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// The user-facing sentence for one classified failure. Known codes map
/// to fixed text regardless of the original message; unknown failures
/// fall back to their own message when one exists.
pub fn user_message(error: &ChatApiError) -> String {
    match error.code {
        ErrorCode::NetworkError => "Unable to connect. Please check your internet connection.",
        ErrorCode::TimeoutError => "Request timed out. Please try again.",
        ErrorCode::ServerError => "Something went wrong on our end. Please try again later.",
        ErrorCode::ValidationError => "Please check your input and try again.",
        ErrorCode::NotFound => "The requested resource was not found.",
        ErrorCode::Unauthorized => "You are not authorized to perform this action.",
        ErrorCode::UnknownError => {
            return if error.message.is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                error.message.clone()
            };
        }
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_ignore_the_original_message() {
        let error = ChatApiError::new(ErrorCode::Unauthorized, "jwt expired at 2026-01-01");
        assert_eq!(
            user_message(&error),
            "You are not authorized to perform this action."
        );
    }

    #[test]
    fn unknown_code_prefers_its_own_message() {
        let error = ChatApiError::new(ErrorCode::UnknownError, "the backend said no");
        assert_eq!(user_message(&error), "the backend said no");
    }

    #[test]
    fn unknown_code_without_message_gets_generic_fallback() {
        let error = ChatApiError::new(ErrorCode::UnknownError, "");
        assert_eq!(user_message(&error), FALLBACK_MESSAGE);
    }

    #[test]
    fn every_known_code_has_fixed_text() {
        for code in [
            ErrorCode::NetworkError,
            ErrorCode::TimeoutError,
            ErrorCode::ServerError,
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
        ] {
            let text = user_message(&ChatApiError::new(code, "raw detail"));
            assert!(!text.contains("raw detail"), "{code:?} leaked raw detail");
            assert!(!text.is_empty());
        }
    }
}
