use crate::config::GuardConfig;
use crate::eligibility::{Admission, CooldownLedger, EligibilityGate};
use crate::error::{MessagingError, Result};
use crate::model::{ChannelId, IncomingMessage, MessageEdit, MessageHandle, MessageId};
use crate::ports::{ChannelDirectory, CredentialScanner, Messenger};
use crate::tracker::{CorrectionTracker, Reconciliation};
use codeblock_inspector::{preview, AdvisoryComposer};
use std::sync::Arc;
use tokio::time::Instant;

/// Mutable state shared by the gate and the tracker.
///
/// Built once at startup and moved into [`Guard`]; nothing is persisted.
#[derive(Debug, Default)]
pub struct GuardState {
    pub cooldowns: CooldownLedger,
    pub corrections: CorrectionTracker,
}

impl GuardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// External services the guard depends on
#[derive(Clone)]
pub struct Collaborators {
    pub messenger: Arc<dyn Messenger>,
    pub directory: Arc<dyn ChannelDirectory>,
    pub scanner: Arc<dyn CredentialScanner>,
}

/// Entry point for message notifications.
///
/// Handlers take `&mut self`: notifications are processed one at a time, and
/// the only suspension points are messenger calls.
pub struct Guard {
    config: GuardConfig,
    gate: EligibilityGate,
    composer: AdvisoryComposer,
    state: GuardState,
    collaborators: Collaborators,
}

impl Guard {
    #[must_use]
    pub fn new(config: GuardConfig, state: GuardState, collaborators: Collaborators) -> Self {
        let gate = EligibilityGate::new(&config);
        Self {
            config,
            gate,
            composer: AdvisoryComposer::default(),
            state,
            collaborators,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Inspect a new message and post an advisory if its code is badly formatted
    pub async fn on_new_message(&mut self, message: &IncomingMessage) {
        if let Err(e) = self.handle_new_message(message).await {
            log::warn!("Failed to post advisory for message {}: {e}", message.id);
        }
    }

    /// Remove the advisory for an edited message once every block is fixed
    pub async fn on_message_edited(&mut self, edit: &MessageEdit) {
        if let Err(e) = self.handle_edit(edit).await {
            log::warn!("Failed to remove advisory for message {}: {e}", edit.message_id);
        }
    }

    async fn handle_new_message(&mut self, message: &IncomingMessage) -> Result<Option<MessageHandle>> {
        let channel = message.channel_id;

        if self.state.corrections.is_flagged(message.id) {
            log::debug!("Skipping message {}: advisory already posted", message.id);
            return Ok(None);
        }

        let now = Instant::now().into_std();
        let admission = self.gate.screen(
            message,
            self.collaborators.directory.as_ref(),
            self.collaborators.scanner.as_ref(),
            &self.state.cooldowns,
            now,
        );
        if let Admission::Rejected(reason) = admission {
            log::debug!("Skipping message {}: {}", message.id, reason.as_str());
            return Ok(None);
        }

        let Some(advisory) = self.composer.compose(&message.content) else {
            return Ok(None);
        };

        let text = format!("Hey {}!\n\n{}", message.author.mention(), advisory.text);
        let handle = self.collaborators.messenger.send_message(channel, &text).await?;

        self.state.corrections.flag(message.id, handle.message_id);
        self.collaborators
            .messenger
            .schedule_expiry(handle, self.config.expiry(), vec![message.author.id]);
        self.gate.record_advisory(&mut self.state.cooldowns, channel, now);

        log::info!(
            "Posted {} advisory {} for message {} in channel {channel}",
            advisory.kind.as_str(),
            handle.message_id,
            message.id
        );
        log::trace!("Offending content:\n{}", preview(&message.content));
        Ok(Some(handle))
    }

    async fn handle_edit(&mut self, edit: &MessageEdit) -> Result<()> {
        if !self.state.corrections.is_flagged(edit.message_id) {
            return Ok(());
        }
        let (Some(channel), Some(content)) = (edit.channel_id, edit.content.as_deref()) else {
            log::debug!("Ignoring edit of {} without channel or content", edit.message_id);
            return Ok(());
        };

        let advisory = match self.state.corrections.reconcile(edit.message_id, content) {
            Reconciliation::Untracked => return Ok(()),
            Reconciliation::Standing => {
                log::debug!("Message {} still has formatting issues", edit.message_id);
                return Ok(());
            }
            Reconciliation::Resolved(advisory) => advisory,
        };

        match self.remove_advisory(channel, advisory).await {
            Ok(()) => {
                log::info!("Message {} fixed, removed advisory {advisory}", edit.message_id);
            }
            Err(e) if e.is_stale() => {
                log::debug!("Advisory {advisory} was already gone: {e}");
            }
            Err(e) => return Err(e.into()),
        }

        self.state.corrections.clear(edit.message_id);
        Ok(())
    }

    async fn remove_advisory(
        &self,
        channel: ChannelId,
        advisory: MessageId,
    ) -> std::result::Result<(), MessagingError> {
        let messenger = &self.collaborators.messenger;
        let handle = messenger.fetch_message(channel, advisory).await?;
        messenger.delete_message(&handle).await
    }
}
