//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// The chosen (or bundled) audio could not be turned into a playable clip
#[derive(Debug, Error)]
pub enum PlaybackInitError {
    #[error("Sound file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read sound file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode audio in {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Audio output not available: {0}")]
    OutputUnavailable(String),
}

pub type PlaybackResult<T> = std::result::Result<T, PlaybackInitError>;

/// A resolved clip could not be started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("Failed to open audio sink: {0}")]
    Sink(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),
}

/// Errors surfaced by the application state
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Playback(#[from] PlaybackInitError),

    #[error("Failed to lock {0} state")]
    Lock(&'static str),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
