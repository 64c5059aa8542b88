use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use banter_agent::generate::ResponseGenerator;
use banter_agent::pipeline::{ChannelScope, Relay};
use banter_agent::profile::ProfileSynchronizer;
use banter_agent::provider::OpenAiCompatProvider;
use banter_core::config::BanterConfig;
use banter_discord::DiscordAdapter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=info".into()),
        )
        .init();

    // load config: explicit BANTER_CONFIG path > ~/.banter/banter.toml
    let config_path = std::env::var("BANTER_CONFIG").ok();
    let config = BanterConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        BanterConfig::default()
    });

    // The one fatal startup error: no way to reach the chat platform.
    // Abort before any network activity.
    if config.discord.bot_token.is_empty() {
        anyhow::bail!("no Discord bot token configured (set discord.bot_token or DISCORD_BOT_TOKEN)");
    }

    let scope = ChannelScope::from_csv(&config.discord.conversation_channels);
    info!(
        model = %config.persona.model,
        channels = ?scope.ids().collect::<Vec<_>>(),
        "bot initialized"
    );

    let provider = Arc::new(OpenAiCompatProvider::new(
        config.provider.api_token.clone(),
        config.provider.base_url.clone(),
    ));
    info!(
        base_url = %config.provider.base_url,
        has_token = config.provider.api_token.is_some(),
        "completion provider ready"
    );

    let generator = ResponseGenerator::new(
        provider,
        config.persona.clone(),
        Duration::from_secs(config.agent.request_timeout_secs),
    );
    let relay = Arc::new(Relay {
        scope,
        generator,
        history_limit: config.agent.history_limit,
    });

    let persona_name = config.persona.display_name().to_string();
    let adapter = DiscordAdapter::new(
        &config.discord,
        relay,
        ProfileSynchronizer::new(),
        persona_name,
    );

    // Session failures (bad login, gateway drop) are logged, not propagated —
    // the process still shuts down cleanly.
    if let Err(e) = adapter.run().await {
        error!(error = %e, "Discord session ended with error");
    }

    info!("shutdown complete");
    Ok(())
}
