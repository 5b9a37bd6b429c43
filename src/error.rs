//! Error types for voxrelay

use thiserror::Error;

/// Result type alias for voxrelay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while listening, transcribing, or dispatching
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text service error
    #[error("STT error: {0}")]
    Stt(String),

    /// Speech was captured but the STT service returned no usable text
    #[error("could not understand audio")]
    NotUnderstood,

    /// Relay server answered with a non-success status
    #[error("relay server returned {status}: {body}")]
    Relay {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether the voice loop can keep going after this error
    ///
    /// Only an unintelligible utterance is recoverable at the transcription
    /// stage; everything else there ends the loop.
    #[must_use]
    pub const fn is_recoverable_transcription(&self) -> bool {
        matches!(self, Self::NotUnderstood)
    }
}
