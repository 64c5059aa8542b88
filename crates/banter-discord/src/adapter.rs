use std::sync::{Arc, OnceLock};

use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use tracing::info;

use banter_agent::pipeline::Relay;
use banter_agent::profile::ProfileSynchronizer;
use banter_core::config::DiscordConfig;

use crate::error::DiscordError;
use crate::handler::BanterHandler;

/// Discord channel adapter.
///
/// Wraps a serenity `Client` and drives the event loop for one session. A
/// login failure or a dropped gateway is returned to the caller for logging;
/// the session is not restarted automatically.
pub struct DiscordAdapter {
    config: DiscordConfig,
    relay: Arc<Relay>,
    profile: ProfileSynchronizer,
    persona_name: String,
}

impl DiscordAdapter {
    pub fn new(
        config: &DiscordConfig,
        relay: Arc<Relay>,
        profile: ProfileSynchronizer,
        persona_name: String,
    ) -> Self {
        Self {
            config: config.clone(),
            relay,
            profile,
            persona_name,
        }
    }

    /// Connect to Discord and run until the gateway stops.
    pub async fn run(self) -> Result<(), DiscordError> {
        if self.config.bot_token.is_empty() {
            return Err(DiscordError::NoToken);
        }

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = BanterHandler {
            relay: self.relay,
            profile: self.profile,
            persona_name: self.persona_name,
            config: self.config.clone(),
            platform: OnceLock::new(),
        };

        let mut client = Client::builder(&self.config.bot_token, intents)
            .event_handler(handler)
            .await?;

        info!("Discord: gateway connecting");
        client.start().await?;
        info!("Discord: gateway stopped cleanly");
        Ok(())
    }
}
