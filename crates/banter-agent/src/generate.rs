//! Response generation — one completion attempt, hard timeout, and a
//! user-safe string on every path. Callers never see an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use banter_core::config::PersonaConfig;

use crate::provider::{ChatMessage, CompletionProvider, CompletionRequest, ProviderError};

/// Shown when the endpoint answers with a non-success status.
pub const FALLBACK_UNAVAILABLE: &str = "Sorry, I'm having trouble right now.";
/// Shown when the completion call exceeds the configured deadline.
pub const FALLBACK_TIMEOUT: &str = "Sorry, my response timed out. Please try again.";
/// Shown on transport failures and malformed response bodies.
pub const FALLBACK_ERROR: &str = "Sorry, I encountered an error.";

pub struct ResponseGenerator {
    provider: Arc<dyn CompletionProvider>,
    persona: PersonaConfig,
    timeout: Duration,
}

impl ResponseGenerator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        persona: PersonaConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            persona,
            timeout,
        }
    }

    /// Turn a conversation window into reply text.
    ///
    /// The persona system prompt always becomes the first wire-level message.
    /// Exactly one request is made; a timeout abandons the in-flight call and
    /// substitutes the timeout fallback, with no retry.
    pub async fn generate(&self, window: &[ChatMessage]) -> String {
        let request = CompletionRequest {
            model: self.persona.model.clone(),
            system: self.persona.system_prompt.clone(),
            messages: window.to_vec(),
        };

        match tokio::time::timeout(self.timeout, self.provider.complete(&request)).await {
            Ok(Ok(content)) => content,
            Ok(Err(e @ ProviderError::Api { .. })) => {
                error!(provider = self.provider.name(), error = %e, "completion rejected");
                FALLBACK_UNAVAILABLE.to_string()
            }
            Ok(Err(e)) => {
                error!(provider = self.provider.name(), error = %e, "completion failed");
                FALLBACK_ERROR.to_string()
            }
            Err(_) => {
                error!(
                    provider = self.provider.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "completion timed out"
                );
                FALLBACK_TIMEOUT.to_string()
            }
        }
    }
}
