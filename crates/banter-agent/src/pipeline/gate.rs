//! Conversation-channel gate for inbound messages.
//!
//! Direct messages are always in scope; guild channels only when allow-listed.
//! An empty list means the bot only converses in DMs.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct ChannelScope {
    channels: BTreeSet<u64>,
}

impl ChannelScope {
    pub fn new(channels: impl IntoIterator<Item = u64>) -> Self {
        Self {
            channels: channels.into_iter().collect(),
        }
    }

    /// Parse a comma-separated id list, e.g. `"100, 200"`. Entries that are
    /// not purely numeric are skipped.
    pub fn from_csv(list: &str) -> Self {
        Self::new(
            list.split(',')
                .filter_map(|entry| entry.trim().parse::<u64>().ok()),
        )
    }

    /// `true` when the bot should converse in this context. Pure predicate.
    pub fn accepts(&self, channel_id: u64, is_direct: bool) -> bool {
        is_direct || self.channels.contains(&channel_id)
    }

    /// Allow-listed channel ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.channels.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
