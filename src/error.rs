//! Error types for deck loading and settings.

use thiserror::Error;

/// Anything that can stop a deck from reaching the board.
///
/// The UI does not distinguish between these; every variant ends in the
/// same "reload" banner. The variants exist for the log.
#[derive(Debug, Error)]
pub enum DeckError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("deck request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("deck server answered {status} for {url}")]
    Status { status: u16, url: String },

    /// The deck JSON (fresh or cached) did not parse.
    #[error("failed to parse deck JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API reported `success: false`.
    #[error("deck API rejected the draw")]
    Rejected,

    /// The draw did not contain the expected number of cards.
    #[error("expected {expected} cards, got {found}")]
    CardCount { expected: usize, found: usize },

    /// The same card code was drawn twice.
    #[error("card {0} appears more than once in the deck")]
    DuplicateCard(String),

    /// The session cache could not be read or written.
    #[error("deck cache I/O failed: {0}")]
    Cache(#[from] std::io::Error),
}

impl From<reqwest::Error> for DeckError {
    fn from(err: reqwest::Error) -> Self {
        match (err.status(), err.url()) {
            (Some(status), Some(url)) => DeckError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            },
            _ => DeckError::Request(err.to_string()),
        }
    }
}

/// Errors while loading `settings.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T, E = DeckError> = std::result::Result<T, E>;
