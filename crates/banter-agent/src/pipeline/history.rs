//! History reconstruction — the bot is stateless, so the context window is
//! rebuilt from the platform's own recent log on every inbound message.

use tracing::warn;

use crate::pipeline::commands::COMMAND_PREFIX;
use crate::platform::ChatPlatform;
use crate::provider::{ChatMessage, Role};

/// Pull up to `limit` recent messages and shape them into a role-tagged
/// window, oldest first.
///
/// Dropped along the way: messages from bots other than this one, and
/// command-prefixed text. The bot's own messages become `assistant` entries,
/// everything else `user`.
///
/// A failed fetch degrades to an empty window — logged, never propagated.
pub async fn reconstruct(
    platform: &dyn ChatPlatform,
    channel_id: u64,
    limit: u8,
) -> Vec<ChatMessage> {
    let raw = match platform.recent_messages(channel_id, limit).await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(channel_id, error = %e, "history fetch failed, continuing without context");
            return Vec::new();
        }
    };

    let mut window: Vec<ChatMessage> = raw
        .into_iter()
        .filter(|m| m.author_is_self || !m.author_is_bot)
        .filter(|m| !m.content.starts_with(COMMAND_PREFIX))
        .map(|m| ChatMessage {
            role: if m.author_is_self {
                Role::Assistant
            } else {
                Role::User
            },
            content: m.content,
        })
        .collect();

    // Platform order is newest-first; the completion endpoint wants
    // chronological.
    window.reverse();
    window
}
