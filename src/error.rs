//! Error types for the rating service
//!
//! Domain failures are typed with thiserror so callers can map them onto
//! responses; service plumbing (startup, config files, HTTP) uses anyhow.

use crate::types::PlayerId;

/// Result type alias for service plumbing
pub type Result<T> = anyhow::Result<T>;

/// Result type alias for the rating core
pub type MmrResult<T> = std::result::Result<T, MmrError>;

/// Problems with the shape of a match or team request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Player ID {0} is duplicated")]
    DuplicatePlayerId(PlayerId),

    #[error("There must be exactly {expected} unique players, got {got}")]
    WrongPlayerCount { expected: usize, got: usize },

    #[error("Team {team} must have exactly 2 players, got {got}")]
    MalformedTeam { team: u8, got: usize },
}

impl ValidationError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::DuplicatePlayerId(_) => "duplicate_player",
            ValidationError::WrongPlayerCount { .. } => "wrong_player_count",
            ValidationError::MalformedTeam { .. } => "malformed_team",
        }
    }
}

/// Errors surfaced by the rating core and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum MmrError {
    #[error("Invalid match request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Batch request {index} failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<MmrError>,
    },

    #[error("Rating calculation failed: {reason}")]
    InternalRating { reason: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl MmrError {
    /// Wrap an error with the position of the batch entry that produced it
    pub fn at_index(self, index: usize) -> Self {
        MmrError::Batch {
            index,
            source: Box::new(self),
        }
    }

    /// The validation failure behind this error, looking through batch wrapping
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            MmrError::Validation(e) => Some(e),
            MmrError::Batch { source, .. } => source.validation(),
            _ => None,
        }
    }

    /// Index of the failing batch entry, if this came from a batch
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            MmrError::Batch { index, .. } => Some(*index),
            _ => None,
        }
    }
}
