use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// How many recent channel messages are pulled to rebuild the context window.
pub const DEFAULT_HISTORY_LIMIT: u8 = 5;
/// Hard deadline for a single completion request. No retry afterwards.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 50;

/// Top-level config (banter.toml + BANTER_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BanterConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot gateway token. Empty means "not configured" — startup aborts.
    #[serde(default)]
    pub bot_token: String,
    /// Comma-separated numeric channel ids where the bot converses without
    /// being addressed. DMs are always in scope.
    #[serde(default)]
    pub conversation_channels: String,
    /// Presence activity text, e.g. "chatting". No activity when unset.
    pub activity_name: Option<String>,
    /// Activity kind: playing | listening | watching | competing | custom.
    pub activity_type: Option<String>,
    /// Online status: online | idle | dnd | invisible.
    #[serde(default = "default_status")]
    pub status: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            conversation_channels: String::new(),
            activity_name: None,
            activity_type: None,
            status: default_status(),
        }
    }
}

/// The identity the bot presents: model, system prompt, display name.
/// Immutable for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Display name shown on the platform. Falls back to the model id.
    pub name: Option<String>,
}

impl PersonaConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.model)
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: default_system_prompt(),
            name: None,
        }
    }
}

/// OpenAI-compatible completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL without trailing slash; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token attached to completion requests when set.
    pub api_token: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: u8,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_status() -> String {
    "online".to_string()
}
fn default_model() -> String {
    "deepseek-reasoning".to_string()
}
fn default_system_prompt() -> String {
    "You are a helpful AI assistant. Be friendly and concise.".to_string()
}
fn default_base_url() -> String {
    "https://text.pollinations.ai/openai".to_string()
}
fn default_history_limit() -> u8 {
    DEFAULT_HISTORY_LIMIT
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl BanterConfig {
    /// Load config from a TOML file with BANTER_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.banter/banter.toml
    ///
    /// Bare env vars (DISCORD_BOT_TOKEN, COMPLETION_API_TOKEN,
    /// CONVERSATION_CHANNELS) fill any slot the file left empty, so the bot
    /// can run without a config file at all.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: BanterConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("BANTER_").split("_"))
            .extract()
            .map_err(|e| crate::error::BanterError::Config(e.to_string()))?;

        Ok(config.with_env_fallbacks())
    }

    fn with_env_fallbacks(mut self) -> Self {
        if self.discord.bot_token.is_empty() {
            if let Ok(token) = std::env::var("DISCORD_BOT_TOKEN") {
                self.discord.bot_token = token;
            }
        }
        if self.provider.api_token.is_none() {
            self.provider.api_token = std::env::var("COMPLETION_API_TOKEN").ok();
        }
        if self.discord.conversation_channels.is_empty() {
            if let Ok(channels) = std::env::var("CONVERSATION_CHANNELS") {
                self.discord.conversation_channels = channels;
            }
        }
        self
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.banter/banter.toml", home)
}
