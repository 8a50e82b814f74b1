use thiserror::Error;

/// Errors returned by profile store operations.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile: invalid input: {0}")]
    Validation(String),

    #[error("profile: not found: {0}")]
    NotFound(String),

    #[error("profile: store is inconsistent: {0}")]
    Corrupt(String),

    #[error("profile: partial delete of '{id}': {reason}")]
    PartialDelete { id: String, reason: String },

    #[error("profile: invalid format: {0}")]
    InvalidFormat(String),

    #[error("profile: io: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile: registry: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for profile store operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
