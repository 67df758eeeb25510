use crate::config::GuardConfig;
use crate::model::{CategoryId, ChannelId, IncomingMessage};
use crate::ports::{ChannelDirectory, CredentialScanner};
use codeblock_inspector::spans_more_than;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Messages this short are never inspected
const MIN_MESSAGE_LINES: usize = 3;

/// Why a message was not inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Written by a bot
    Automated,
    /// Not a help, cooldown-tracked or allow-listed channel
    IneligibleChannel,
    /// Three lines or fewer
    TooShort,
    /// Holds a credential; another component deals with it
    Credential,
    /// An advisory was posted in this channel too recently
    CoolingDown,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::Automated => "automated author",
            Rejection::IneligibleChannel => "ineligible channel",
            Rejection::TooShort => "too short",
            Rejection::Credential => "contains a credential",
            Rejection::CoolingDown => "channel cooling down",
        }
    }
}

/// Gate verdict for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected(Rejection),
}

impl Admission {
    #[must_use]
    pub const fn is_admitted(self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// When each channel last received an advisory.
///
/// Entries are never evicted, so the ledger grows with the number of distinct
/// channels that ever got an advisory. That set is small and bounded in
/// practice.
#[derive(Debug, Default)]
pub struct CooldownLedger {
    last_advisory: HashMap<ChannelId, Instant>,
}

impl CooldownLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_advisory(&self, channel: ChannelId) -> Option<Instant> {
        self.last_advisory.get(&channel).copied()
    }

    pub fn stamp(&mut self, channel: ChannelId, at: Instant) {
        self.last_advisory.insert(channel, at);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.last_advisory.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_advisory.is_empty()
    }
}

/// Channel admission and cooldown policy
#[derive(Debug, Clone)]
pub struct EligibilityGate {
    help_categories: HashSet<CategoryId>,
    cooldown_channels: HashSet<ChannelId>,
    allow_list: HashSet<ChannelId>,
    cooldown: Duration,
    debug_mode: bool,
}

impl EligibilityGate {
    #[must_use]
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            help_categories: config.help_categories.iter().copied().collect(),
            cooldown_channels: config.cooldown_channels.iter().copied().collect(),
            allow_list: config.allow_list.iter().copied().collect(),
            cooldown: config.cooldown(),
            debug_mode: config.debug_mode,
        }
    }

    /// Content and channel checks, in order: author, channel, length, credential
    pub fn evaluate(
        &self,
        message: &IncomingMessage,
        directory: &dyn ChannelDirectory,
        scanner: &dyn CredentialScanner,
    ) -> Admission {
        let rejection = if message.author.bot {
            Some(Rejection::Automated)
        } else if !self.is_eligible_channel(message.channel_id, directory) {
            Some(Rejection::IneligibleChannel)
        } else if !spans_more_than(&message.content, MIN_MESSAGE_LINES) {
            Some(Rejection::TooShort)
        } else if scanner.contains_credential(&message.content) {
            Some(Rejection::Credential)
        } else {
            None
        };

        rejection.map_or(Admission::Admitted, Admission::Rejected)
    }

    /// [`Self::evaluate`] followed by the channel cooldown
    pub fn screen(
        &self,
        message: &IncomingMessage,
        directory: &dyn ChannelDirectory,
        scanner: &dyn CredentialScanner,
        ledger: &CooldownLedger,
        now: Instant,
    ) -> Admission {
        match self.evaluate(message, directory, scanner) {
            Admission::Admitted if !self.cooldown_allows(ledger, message.channel_id, now) => {
                Admission::Rejected(Rejection::CoolingDown)
            }
            admission => admission,
        }
    }

    pub fn admit(
        &self,
        message: &IncomingMessage,
        directory: &dyn ChannelDirectory,
        scanner: &dyn CredentialScanner,
    ) -> bool {
        self.evaluate(message, directory, scanner).is_admitted()
    }

    /// Help channel, cooldown-tracked channel or allow-listed channel
    pub fn is_eligible_channel(&self, channel: ChannelId, directory: &dyn ChannelDirectory) -> bool {
        self.cooldown_channels.contains(&channel)
            || self.allow_list.contains(&channel)
            || directory
                .channel_category(channel)
                .is_some_and(|category| self.help_categories.contains(&category))
    }

    #[must_use]
    pub fn is_allow_listed(&self, channel: ChannelId) -> bool {
        self.allow_list.contains(&channel)
    }

    /// False while the channel's last advisory is younger than the cooldown.
    /// Allow-listed channels and debug mode are never held back.
    #[must_use]
    pub fn cooldown_allows(&self, ledger: &CooldownLedger, channel: ChannelId, now: Instant) -> bool {
        if self.debug_mode || self.is_allow_listed(channel) {
            return true;
        }
        ledger
            .last_advisory(channel)
            .map_or(true, |last| now.saturating_duration_since(last) >= self.cooldown)
    }

    /// Arm the cooldown after an advisory went out
    pub fn record_advisory(&self, ledger: &mut CooldownLedger, channel: ChannelId, now: Instant) {
        if !self.is_allow_listed(channel) {
            ledger.stamp(channel, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, MessageId, UserId};

    const HELP: CategoryId = CategoryId(10);
    const HELP_CHANNEL: ChannelId = ChannelId(1);
    const TRACKED: ChannelId = ChannelId(2);
    const ALLOWED: ChannelId = ChannelId(3);
    const OFF_TOPIC: ChannelId = ChannelId(4);

    struct Directory;

    impl ChannelDirectory for Directory {
        fn channel_category(&self, channel: ChannelId) -> Option<CategoryId> {
            (channel == HELP_CHANNEL).then_some(HELP)
        }
    }

    struct Scanner;

    impl CredentialScanner for Scanner {
        fn contains_credential(&self, text: &str) -> bool {
            text.contains("SECRET")
        }
    }

    fn gate(debug_mode: bool) -> EligibilityGate {
        EligibilityGate::new(&GuardConfig {
            help_categories: vec![HELP],
            cooldown_channels: vec![TRACKED],
            allow_list: vec![ALLOWED],
            debug_mode,
            ..GuardConfig::default()
        })
    }

    fn message(channel: ChannelId, content: &str, bot: bool) -> IncomingMessage {
        IncomingMessage {
            id: MessageId(100),
            channel_id: channel,
            author: Author { id: UserId(7), bot },
            content: content.to_string(),
        }
    }

    const LONG: &str = "a = 1\nb = 2\nc = 3\nd = 4";

    #[test]
    fn test_admits_each_kind_of_channel() {
        let gate = gate(false);
        for channel in [HELP_CHANNEL, TRACKED, ALLOWED] {
            assert!(gate.admit(&message(channel, LONG, false), &Directory, &Scanner));
        }
    }

    #[test]
    fn test_rejections() {
        let gate = gate(false);
        let verdict = |m: &IncomingMessage| gate.evaluate(m, &Directory, &Scanner);

        assert_eq!(
            verdict(&message(TRACKED, LONG, true)),
            Admission::Rejected(Rejection::Automated)
        );
        assert_eq!(
            verdict(&message(OFF_TOPIC, LONG, false)),
            Admission::Rejected(Rejection::IneligibleChannel)
        );
        assert_eq!(
            verdict(&message(TRACKED, "a\nb\nc", false)),
            Admission::Rejected(Rejection::TooShort)
        );
        assert_eq!(
            verdict(&message(TRACKED, "a\nb\nc\nSECRET", false)),
            Admission::Rejected(Rejection::Credential)
        );
    }

    #[test]
    fn test_cooldown_window() {
        let gate = gate(false);
        let mut ledger = CooldownLedger::new();
        let start = Instant::now();

        assert!(gate.cooldown_allows(&ledger, TRACKED, start));
        gate.record_advisory(&mut ledger, TRACKED, start);

        assert!(!gate.cooldown_allows(&ledger, TRACKED, start + Duration::from_secs(299)));
        assert!(gate.cooldown_allows(&ledger, TRACKED, start + Duration::from_secs(300)));
    }

    #[test]
    fn test_screen_reports_cooldown() {
        let gate = gate(false);
        let mut ledger = CooldownLedger::new();
        let now = Instant::now();
        let paste = message(TRACKED, LONG, false);

        assert_eq!(gate.screen(&paste, &Directory, &Scanner, &ledger, now), Admission::Admitted);
        gate.record_advisory(&mut ledger, TRACKED, now);
        assert_eq!(
            gate.screen(&paste, &Directory, &Scanner, &ledger, now + Duration::from_secs(10)),
            Admission::Rejected(Rejection::CoolingDown)
        );

        // Content rejections take precedence over the cooldown.
        assert_eq!(
            gate.screen(&message(TRACKED, LONG, true), &Directory, &Scanner, &ledger, now),
            Admission::Rejected(Rejection::Automated)
        );
    }

    #[test]
    fn test_allow_list_never_cools_down() {
        let gate = gate(false);
        let mut ledger = CooldownLedger::new();
        let now = Instant::now();

        gate.record_advisory(&mut ledger, ALLOWED, now);
        assert!(ledger.is_empty());
        assert!(gate.cooldown_allows(&ledger, ALLOWED, now));
    }

    #[test]
    fn test_help_channel_cools_down_after_first_advisory() {
        let gate = gate(false);
        let mut ledger = CooldownLedger::new();
        let now = Instant::now();

        gate.record_advisory(&mut ledger, HELP_CHANNEL, now);
        assert_eq!(ledger.len(), 1);
        assert!(!gate.cooldown_allows(&ledger, HELP_CHANNEL, now + Duration::from_secs(1)));
    }

    #[test]
    fn test_debug_mode_bypasses_cooldown() {
        let gate = gate(true);
        let mut ledger = CooldownLedger::new();
        let now = Instant::now();

        gate.record_advisory(&mut ledger, TRACKED, now);
        assert!(gate.cooldown_allows(&ledger, TRACKED, now));
    }
}
