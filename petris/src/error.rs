/// Error types for the petris library
use thiserror::Error;

/// Result type alias for petris operations
pub type Result<T> = std::result::Result<T, PetrisError>;

/// Errors that can occur outside of gameplay
///
/// Illegal moves and board overflow are game states, not errors. These
/// variants only cover configuration and the I/O around the game.
#[derive(Debug, Error)]
pub enum PetrisError {
    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
