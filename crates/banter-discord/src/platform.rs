//! [`ChatPlatform`] implementation over the serenity REST client.
//!
//! Built in the `ready` handler once the bot's own identity is known; the
//! pipeline crate never sees a serenity type.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::{CreateAttachment, EditProfile, GetMessages};
use serenity::http::Http;
use serenity::model::id::{ChannelId, UserId};

use banter_agent::platform::{ChatPlatform, PlatformError, PlatformMessage};

use crate::send;

pub struct DiscordPlatform {
    http: Arc<Http>,
    bot_id: UserId,
    bot_name: String,
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>, bot_id: UserId, bot_name: String) -> Self {
        Self {
            http,
            bot_id,
            bot_name,
        }
    }

    pub fn bot_id(&self) -> UserId {
        self.bot_id
    }
}

fn api_err(e: serenity::Error) -> PlatformError {
    PlatformError::Api(e.to_string())
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    fn current_name(&self) -> String {
        self.bot_name.clone()
    }

    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> Result<Vec<PlatformMessage>, PlatformError> {
        let messages = ChannelId::new(channel_id)
            .messages(&self.http, GetMessages::new().limit(limit))
            .await
            .map_err(api_err)?;

        Ok(messages
            .into_iter()
            .map(|m| PlatformMessage {
                author_is_self: m.author.id == self.bot_id,
                author_is_bot: m.author.bot,
                content: m.content,
            })
            .collect())
    }

    async fn send_text(&self, channel_id: u64, text: &str) -> Result<(), PlatformError> {
        send::send_chunked(&self.http, ChannelId::new(channel_id), text)
            .await
            .map_err(api_err)
    }

    async fn notify_composing(&self, channel_id: u64) -> Result<(), PlatformError> {
        ChannelId::new(channel_id)
            .broadcast_typing(&self.http)
            .await
            .map_err(api_err)
    }

    async fn set_display_name(&self, name: &str) -> Result<(), PlatformError> {
        let mut user = self.http.get_current_user().await.map_err(api_err)?;
        user.edit(&self.http, EditProfile::new().username(name))
            .await
            .map_err(api_err)
    }

    async fn set_avatar(&self, image: &[u8]) -> Result<(), PlatformError> {
        let attachment = CreateAttachment::bytes(image.to_vec(), "avatar.png");
        let mut user = self.http.get_current_user().await.map_err(api_err)?;
        user.edit(&self.http, EditProfile::new().avatar(&attachment))
            .await
            .map_err(api_err)
    }
}
