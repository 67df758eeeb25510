use async_trait::async_trait;
use codeblock_guard::model::{ChannelId, MessageHandle, MessageId, UserId};
use codeblock_guard::ports::{Messenger, MessagingResult};
use codeblock_guard::MessagingError;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// First id handed out to advisories, far above ids used in event files
const FIRST_ADVISORY_ID: u64 = 1 << 60;

/// Messenger that prints every action as a JSON line instead of calling a platform
pub struct ConsoleMessenger {
    next_id: AtomicU64,
    live: Mutex<HashSet<MessageId>>,
}

impl Default for ConsoleMessenger {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(FIRST_ADVISORY_ID),
            live: Mutex::new(HashSet::new()),
        }
    }
}

impl ConsoleMessenger {
    fn emit(value: &Value) {
        if let Err(e) = crate::print_stdout(&value.to_string()) {
            log::warn!("Failed to write action: {e}");
        }
    }

    fn live(&self) -> MessagingResult<std::sync::MutexGuard<'_, HashSet<MessageId>>> {
        self.live
            .lock()
            .map_err(|_| MessagingError::Transport("console state poisoned".to_string()))
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_message(&self, channel: ChannelId, text: &str) -> MessagingResult<MessageHandle> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.live()?.insert(id);
        Self::emit(&json!({
            "action": "send",
            "channel_id": channel,
            "message_id": id,
            "text": text,
        }));
        Ok(MessageHandle::new(channel, id))
    }

    async fn fetch_message(&self, channel: ChannelId, id: MessageId) -> MessagingResult<MessageHandle> {
        if self.live()?.contains(&id) {
            Ok(MessageHandle::new(channel, id))
        } else {
            Err(MessagingError::not_found(channel, id))
        }
    }

    async fn delete_message(&self, handle: &MessageHandle) -> MessagingResult<()> {
        if !self.live()?.remove(&handle.message_id) {
            return Err(MessagingError::not_found(handle.channel_id, handle.message_id));
        }
        Self::emit(&json!({
            "action": "delete",
            "channel_id": handle.channel_id,
            "message_id": handle.message_id,
        }));
        Ok(())
    }

    fn schedule_expiry(&self, handle: MessageHandle, delay: Duration, dismissers: Vec<UserId>) {
        Self::emit(&json!({
            "action": "schedule_expiry",
            "message_id": handle.message_id,
            "delay_secs": delay.as_secs(),
            "dismissers": dismissers,
        }));
    }
}
