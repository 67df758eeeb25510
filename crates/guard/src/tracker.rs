use crate::model::MessageId;
use codeblock_inspector::extract;
use std::collections::HashMap;

/// What an edit means for a message's outstanding advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// No advisory was posted for this message
    Untracked,
    /// Issues remain; the advisory stays as it is
    Standing,
    /// Every block is fixed; this advisory should go
    Resolved(MessageId),
}

/// Links each flagged message to the advisory posted about it.
///
/// A message is flagged at most once and unflagged only when an edit leaves no
/// blocks needing correction. Partial fixes leave the advisory standing.
#[derive(Debug, Default)]
pub struct CorrectionTracker {
    advisories: HashMap<MessageId, MessageId>,
}

impl CorrectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `advisory` for `original`. Returns false if `original` was already flagged.
    pub fn flag(&mut self, original: MessageId, advisory: MessageId) -> bool {
        if self.advisories.contains_key(&original) {
            return false;
        }
        self.advisories.insert(original, advisory);
        true
    }

    #[must_use]
    pub fn advisory_for(&self, original: MessageId) -> Option<MessageId> {
        self.advisories.get(&original).copied()
    }

    #[must_use]
    pub fn is_flagged(&self, original: MessageId) -> bool {
        self.advisories.contains_key(&original)
    }

    /// Decide what the edited `content` of `original` means. Only the block
    /// scan is re-run; eligibility and composition are not.
    #[must_use]
    pub fn reconcile(&self, original: MessageId, content: &str) -> Reconciliation {
        let Some(advisory) = self.advisory_for(original) else {
            return Reconciliation::Untracked;
        };

        if extract(content).is_empty() {
            Reconciliation::Resolved(advisory)
        } else {
            Reconciliation::Standing
        }
    }

    /// Forget `original` once its advisory is gone
    pub fn clear(&mut self, original: MessageId) -> Option<MessageId> {
        self.advisories.remove(&original)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.advisories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.advisories.is_empty()
    }
}
