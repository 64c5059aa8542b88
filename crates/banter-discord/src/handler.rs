use std::sync::{Arc, OnceLock};

use serenity::all::ActivityData;
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::user::OnlineStatus;
use serenity::prelude::{Context, EventHandler};
use tracing::{info, warn};

use banter_agent::pipeline::{InboundMessage, Relay};
use banter_agent::platform::ChatPlatform;
use banter_agent::profile::ProfileSynchronizer;
use banter_core::config::DiscordConfig;

use crate::platform::DiscordPlatform;

/// Announced in every conversation channel once the gateway is up.
const ONLINE_NOTICE: &str = "\u{1f916} Bot is online!";

/// Serenity event handler wired to the relay pipeline.
pub struct BanterHandler {
    pub relay: Arc<Relay>,
    pub profile: ProfileSynchronizer,
    pub persona_name: String,
    pub config: DiscordConfig,
    pub platform: OnceLock<Arc<DiscordPlatform>>,
}

#[async_trait]
impl EventHandler for BanterHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let platform = self
            .platform
            .get_or_init(|| {
                Arc::new(DiscordPlatform::new(
                    Arc::clone(&ctx.http),
                    ready.user.id,
                    ready.user.name.clone(),
                ))
            })
            .clone();

        // Config-driven presence.
        let status = parse_online_status(&self.config.status);
        ctx.set_presence(build_activity(&self.config), status);

        info!(name = %ready.user.name, "Discord bot connected");

        // Announce availability in every conversation channel.
        for channel_id in self.relay.scope.ids() {
            if let Err(e) = platform.send_text(channel_id, ONLINE_NOTICE).await {
                warn!(channel_id, error = %e, "failed to send online notice");
            }
        }

        // Profile sync happens before message traffic is answered; rerunning
        // after a gateway resume is a no-op for the name.
        self.profile
            .sync(platform.as_ref(), &self.persona_name)
            .await;

        info!("bot is fully ready");
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        // No identity before `ready`; nothing useful can be done yet.
        let Some(platform) = self.platform.get() else {
            return;
        };

        // Never answer ourselves — that way lies an infinite loop.
        if msg.author.id == platform.bot_id() {
            return;
        }

        let inbound = InboundMessage {
            channel_id: msg.channel_id.get(),
            is_direct: msg.guild_id.is_none(),
            content: msg.content,
        };

        // Each message is an independent task; concurrent messages in one
        // channel may race on history, which the pipeline documents as
        // accepted behavior.
        let relay = Arc::clone(&self.relay);
        let platform: Arc<dyn ChatPlatform> = platform.clone();
        tokio::spawn(async move {
            relay.handle_message(platform, inbound).await;
        });
    }
}

/// Parse a config status string into serenity's `OnlineStatus`.
fn parse_online_status(s: &str) -> OnlineStatus {
    match s.to_lowercase().as_str() {
        "idle" => OnlineStatus::Idle,
        "dnd" | "do_not_disturb" => OnlineStatus::DoNotDisturb,
        "invisible" => OnlineStatus::Invisible,
        _ => OnlineStatus::Online,
    }
}

/// Build an `ActivityData` from the Discord config.
fn build_activity(config: &DiscordConfig) -> Option<ActivityData> {
    let name = config.activity_name.as_deref()?;
    let kind = config.activity_type.as_deref().unwrap_or("playing");
    Some(match kind.to_lowercase().as_str() {
        "listening" => ActivityData::listening(name),
        "watching" => ActivityData::watching(name),
        "competing" => ActivityData::competing(name),
        "custom" => ActivityData::custom(name),
        _ => ActivityData::playing(name),
    })
}
