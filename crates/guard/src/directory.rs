use crate::config::GuardConfig;
use crate::model::{CategoryId, ChannelId};
use crate::ports::ChannelDirectory;
use std::collections::HashMap;

/// Channel categories read from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    categories: HashMap<ChannelId, CategoryId>,
}

impl StaticDirectory {
    #[must_use]
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            categories: config
                .channels
                .iter()
                .map(|entry| (entry.id, entry.category))
                .collect(),
        }
    }
}

impl ChannelDirectory for StaticDirectory {
    fn channel_category(&self, channel: ChannelId) -> Option<CategoryId> {
        self.categories.get(&channel).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelEntry;

    #[test]
    fn test_lookup() {
        let config = GuardConfig {
            channels: vec![ChannelEntry {
                id: ChannelId(1),
                category: CategoryId(9),
            }],
            ..GuardConfig::default()
        };
        let directory = StaticDirectory::new(&config);
        assert_eq!(directory.channel_category(ChannelId(1)), Some(CategoryId(9)));
        assert_eq!(directory.channel_category(ChannelId(2)), None);
    }
}
