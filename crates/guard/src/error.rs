use crate::model::{ChannelId, MessageId};
use thiserror::Error;

/// Result type for guard operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors raised inside the guard
#[derive(Error, Debug)]
pub enum GuardError {
    /// Messaging collaborator failed
    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl GuardError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Failures reported by the messaging platform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// The message is already gone (deleted by the author, a moderator or expiry)
    #[error("Message {message_id} not found in channel {channel_id}")]
    NotFound {
        channel_id: ChannelId,
        message_id: MessageId,
    },

    /// The platform refused the action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Connection or API failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl MessagingError {
    pub fn not_found(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self::NotFound {
            channel_id,
            message_id,
        }
    }

    /// The target no longer exists; nothing left to do
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
