use thiserror::Error;

/// Result type for code generation and validation.
pub type Result<T> = std::result::Result<T, CodeError>;

/// Failures reported by a [`UniquenessGuard`](crate::UniquenessGuard) backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("guard backend unavailable: {0}")]
    Unavailable(String),
    #[error("guard operation timed out: {0}")]
    Timeout(String),
    #[error("guard operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("invalid code length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid character {character:?}{}", describe_position(.position))]
    InvalidCharacter {
        character: char,
        position: Option<usize>,
    },
    #[error("check value mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("no unused code found after {attempts} attempts")]
    SpaceExhausted { attempts: u32 },
    #[error("index {index} is outside an alphabet of {size} characters")]
    IndexOutOfRange { index: usize, size: usize },
    #[error(transparent)]
    Guard(#[from] GuardError),
}

impl CodeError {
    /// Shorthand for an [`CodeError::InvalidCharacter`] at a known position.
    pub fn invalid_character_at(character: char, position: usize) -> Self {
        Self::InvalidCharacter {
            character,
            position: Some(position),
        }
    }
}

fn describe_position(position: &Option<usize>) -> String {
    match position {
        Some(position) => format!(" at position {position}"),
        None => String::new(),
    }
}
