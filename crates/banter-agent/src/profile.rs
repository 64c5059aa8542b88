//! One-time bot profile synchronization — display name and generated avatar.
//!
//! Runs after the platform connection becomes ready. The rename is skipped
//! when the name already matches (the platform rate-limits renames to about
//! two per hour and this component does not track that — a failed rename is
//! logged and forgotten). The avatar is regenerated and re-applied on every
//! sync, with no comparison against the previous one.

use tracing::{debug, info, warn};

use crate::platform::ChatPlatform;

/// Image generation endpoint the avatar prompt is sent to.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.pollinations.ai";

pub struct ProfileSynchronizer {
    client: reqwest::Client,
    image_base_url: String,
}

impl Default for ProfileSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileSynchronizer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    /// Point avatar generation at a different endpoint (tests).
    pub fn with_image_base(mut self, base_url: String) -> Self {
        self.image_base_url = base_url;
        self
    }

    /// Make the bot's platform profile match the persona. Nothing here is
    /// fatal; every failure is logged and swallowed.
    pub async fn sync(&self, platform: &dyn ChatPlatform, persona_name: &str) {
        if platform.current_name() != persona_name {
            match platform.set_display_name(persona_name).await {
                Ok(()) => info!(name = persona_name, "display name updated"),
                Err(e) => {
                    warn!(name = persona_name, error = %e, "failed to update display name")
                }
            }
        } else {
            info!(name = persona_name, "display name already set, skipping");
        }

        let url = avatar_url(&self.image_base_url, persona_name);
        debug!(url = %url, "fetching generated avatar");
        match self.fetch_avatar(&url).await {
            Ok(image) => match platform.set_avatar(&image).await {
                Ok(()) => info!(name = persona_name, bytes = image.len(), "avatar updated"),
                Err(e) => warn!(error = %e, "failed to set avatar"),
            },
            Err(e) => warn!(error = %e, "avatar generation failed"),
        }
    }

    async fn fetch_avatar(&self, url: &str) -> Result<Vec<u8>, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("avatar fetch failed: {}", resp.status()));
        }
        let bytes = resp.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}

/// Deterministic avatar-generation URL for a persona name.
pub fn avatar_url(base_url: &str, persona_name: &str) -> String {
    let prompt = format!("portrait of {persona_name}, digital art, minimal style, icon, avatar");
    format!(
        "{base_url}/prompt/{}?width=512&height=512&model=gptimage&nologo=true&referrer=pollinations.github.io",
        urlencoding::encode(&prompt)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_url_is_deterministic_and_encoded() {
        let url = avatar_url("https://image.pollinations.ai", "deepseek-reasoning");
        assert_eq!(
            url,
            avatar_url("https://image.pollinations.ai", "deepseek-reasoning")
        );
        assert!(url.starts_with("https://image.pollinations.ai/prompt/portrait%20of%20deepseek-reasoning"));
        assert!(url.contains("width=512"));
        assert!(url.contains("height=512"));
        assert!(url.contains("model=gptimage"));
        assert!(url.contains("nologo=true"));
        // The raw prompt must not leak unencoded spaces or commas.
        let query_start = url.find('?').unwrap();
        assert!(!url[..query_start].contains(' '));
        assert!(!url[..query_start].contains(','));
    }
}
