//! Collaborators the guard talks to but does not implement.

use crate::error::MessagingError;
use crate::model::{CategoryId, ChannelId, MessageHandle, MessageId, UserId};
use async_trait::async_trait;
use std::time::Duration;

/// Result type for messenger calls
pub type MessagingResult<T> = std::result::Result<T, MessagingError>;

/// Chat platform operations. The only places where handlers yield.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post `text` and return a handle to the new message
    async fn send_message(&self, channel: ChannelId, text: &str) -> MessagingResult<MessageHandle>;

    /// Look up an existing message
    async fn fetch_message(&self, channel: ChannelId, id: MessageId) -> MessagingResult<MessageHandle>;

    /// Remove a message
    async fn delete_message(&self, handle: &MessageHandle) -> MessagingResult<()>;

    /// Delete `handle` after `delay`, or earlier when one of `dismissers` asks.
    /// Fire-and-forget: the guard never waits for it.
    fn schedule_expiry(&self, handle: MessageHandle, delay: Duration, dismissers: Vec<UserId>);
}

/// Channel to category lookup
pub trait ChannelDirectory: Send + Sync {
    fn channel_category(&self, channel: ChannelId) -> Option<CategoryId>;
}

/// Detects pasted credentials; such messages are handled elsewhere
pub trait CredentialScanner: Send + Sync {
    fn contains_credential(&self, text: &str) -> bool;
}
