use crate::error::{GuardError, Result};
use crate::model::{CategoryId, ChannelId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Environment variable that turns on debug mode regardless of the file
pub const DEBUG_ENV: &str = "CODEBLOCK_GUARD_DEBUG";

/// Where and how often advisories may be posted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Categories whose channels are help channels
    pub help_categories: Vec<CategoryId>,

    /// Channels inspected with a per-channel cooldown
    pub cooldown_channels: Vec<ChannelId>,

    /// Channels inspected without any cooldown
    pub allow_list: Vec<ChannelId>,

    /// Minimum seconds between two advisories in one channel
    pub cooldown_secs: u64,

    /// Seconds before a posted advisory removes itself
    pub expiry_secs: u64,

    /// Ignore cooldowns (local testing)
    pub debug_mode: bool,

    /// Static channel → category table, for drivers without a live directory
    pub channels: Vec<ChannelEntry>,
}

/// One row of the static channel directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub id: ChannelId,
    pub category: CategoryId,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            help_categories: vec![],
            cooldown_channels: vec![],
            allow_list: vec![],
            cooldown_secs: 300,
            expiry_secs: 300,
            debug_mode: false,
            channels: vec![],
        }
    }
}

impl GuardConfig {
    /// Read a TOML config file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_debug_override(std::env::var(DEBUG_ENV).ok().as_deref());
    }

    /// Turn debug mode on for `1` or `true`; anything else leaves it as configured
    pub fn apply_debug_override(&mut self, value: Option<&str>) {
        if value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
            self.debug_mode = true;
        }
    }

    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    #[must_use]
    pub const fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.expiry_secs == 0 {
            return Err(GuardError::invalid_config("expiry_secs must be > 0"));
        }

        let allowed: HashSet<_> = self.allow_list.iter().collect();
        if let Some(both) = self.cooldown_channels.iter().find(|c| allowed.contains(c)) {
            return Err(GuardError::invalid_config(format!(
                "channel {both} is listed in both cooldown_channels and allow_list"
            )));
        }

        Ok(())
    }
}
