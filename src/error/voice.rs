use thiserror::Error;

use crate::model::voice::DenialReason;

/// Failure reported by the underlying voice transport.
///
/// The transport's own error types (join failures, gateway drops, driver
/// errors) are flattened into a message; callers only ever need to know that
/// the physical operation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A channel lookup could not be answered right now.
///
/// Distinct from a channel that is gone: the guild may be unavailable or the
/// bot's member could not be fetched, and a later lookup may succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DirectoryError(pub String);

impl DirectoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Outcome classification for a single sticky voice placement attempt.
///
/// The reconnection supervisor folds these into its backoff policy:
/// - `PermissionDenied` ends the current attempt only, a later retry may succeed
///   once permissions change
/// - `Transport` is always retryable up to the ceiling, including lookups that
///   failed for a transient reason
/// - `ChannelUnreachable` ends the session immediately
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Permission denied: {0}")]
    PermissionDenied(DenialReason),

    #[error("Voice transport error: {0}")]
    Transport(String),

    /// The channel id no longer resolves, or resolves to a channel that cannot
    /// hold a voice connection.
    #[error("Voice channel is no longer reachable")]
    ChannelUnreachable,
}

impl From<DirectoryError> for VoiceError {
    fn from(err: DirectoryError) -> Self {
        VoiceError::Transport(format!("channel lookup failed: {}", err.0))
    }
}

impl From<TransportError> for VoiceError {
    fn from(err: TransportError) -> Self {
        VoiceError::Transport(err.0)
    }
}
