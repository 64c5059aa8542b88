//! Capability interface over the chat platform.
//!
//! The pipeline only ever talks to this trait — the serenity-backed
//! implementation lives in the Discord adapter crate, and tests substitute a
//! scripted double that returns canned history and records sends.

use async_trait::async_trait;

/// A raw platform message, as needed by history reconstruction.
#[derive(Debug, Clone)]
pub struct PlatformMessage {
    /// Authored by this bot account.
    pub author_is_self: bool,
    /// Authored by any bot account (including this one).
    pub author_is_bot: bool,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("platform API error: {0}")]
    Api(String),
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// The bot's current display name.
    fn current_name(&self) -> String;

    /// Up to `limit` most recent messages of a channel, newest first
    /// (platform-native order).
    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> Result<Vec<PlatformMessage>, PlatformError>;

    /// Send text to a channel. Implementations handle platform length limits.
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<(), PlatformError>;

    /// Refresh the "composing" indicator; the platform expires it on its own
    /// after a few seconds.
    async fn notify_composing(&self, channel_id: u64) -> Result<(), PlatformError>;

    /// Change the bot's display name. Subject to platform rate limits.
    async fn set_display_name(&self, name: &str) -> Result<(), PlatformError>;

    /// Replace the bot's avatar with the given image bytes.
    async fn set_avatar(&self, image: &[u8]) -> Result<(), PlatformError>;
}
