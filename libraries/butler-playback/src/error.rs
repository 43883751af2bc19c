//! Error types for the playback engine

use thiserror::Error;

/// Failure reported by a backend track's transport operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("Failed to load track: {0}")]
    Load(String),

    #[error("Failed to unload track: {0}")]
    Unload(String),

    #[error("Failed to prefetch track: {0}")]
    Prefetch(String),

    #[error("Failed to change play state: {0}")]
    Play(String),

    #[error("Seek failed: {0}")]
    Seek(String),

    /// Backend session is gone (logged out, connection dropped)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Insertion position outside the lineup, unparsable, or nothing to insert
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// A transport call failed; queue and history are already updated
    #[error("Transport error: {0}")]
    Transport(#[from] TrackError),

    /// Long-poll wait elapsed before the version advanced past `known`
    #[error("Timed out waiting for state newer than version {known}")]
    WaitTimeout { known: u64 },

    /// A source could not resolve a query into tracks
    #[error("Source error: {0}")]
    Source(String),

    /// The player task is no longer running
    #[error("Player service closed")]
    ServiceClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlayerError {
    /// Whether this is a long-poll timeout rather than a failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}

impl From<::config::ConfigError> for PlayerError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
