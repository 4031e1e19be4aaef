//! Error types for the Biblio admin console

use thiserror::Error;

/// Main application error type
///
/// API failures split into two cases the screens treat differently:
/// [`AppError::Transport`] means the request never completed, while
/// [`AppError::Api`] means the server answered with `results == "0"` and the
/// message comes from the response envelope.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { message: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl AppError {
    /// Whether this is a handled server-side rejection rather than a
    /// transport-level failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, AppError::Api { .. })
    }

    /// Message suitable for a user-facing toast
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { message } => message.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_classification() {
        let err = AppError::Api {
            message: "Member already has an open borrowing".to_string(),
        };
        assert!(err.is_rejection());
        assert_eq!(err.user_message(), "Member already has an open borrowing");
    }

    #[test]
    fn test_generic_user_message() {
        let err = AppError::Validation("Quantity must be positive".to_string());
        assert!(!err.is_rejection());
        assert_eq!(err.user_message(), "Quantity must be positive");
    }
}
