use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fixed referer attached to every completion request — the endpoint uses it
/// for request attribution.
pub const COMPLETIONS_REFERER: &str = "roblox";

/// A single message in the conversation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Request to the completion endpoint. `system` is prepended to `messages`
/// as the first wire-level entry.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

/// Common interface for completion backends, so tests can script responses.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Backend name for logging and error messages.
    fn name(&self) -> &str;

    /// Send one chat request, wait for the full response. No retries.
    async fn complete(&self, req: &CompletionRequest) -> Result<String, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// OpenAI-compatible chat completions client (`POST {base_url}/chat/completions`).
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    api_token: Option<String>,
    base_url: String,
}

impl OpenAiCompatProvider {
    pub fn new(api_token: Option<String>, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token,
            base_url,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = build_request_body(req);

        debug!(
            model = %req.model,
            messages = req.messages.len() + 1,
            has_token = self.api_token.is_some(),
            "sending completion request"
        );

        let mut request = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("referer", COMPLETIONS_REFERER)
            .json(&body);
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "completion API error");
            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        first_choice_content(api_resp)
    }
}

/// Flat messages array with the system prompt as the first entry.
fn build_request_body(req: &CompletionRequest) -> serde_json::Value {
    let mut messages = Vec::with_capacity(req.messages.len() + 1);
    messages.push(ChatMessage {
        role: Role::System,
        content: req.system.clone(),
    });
    messages.extend(req.messages.iter().cloned());

    serde_json::json!({
        "model": req.model,
        "messages": messages,
    })
}

/// A 200 with no usable choice is a protocol error, not an empty reply.
fn first_choice_content(resp: ApiResponse) -> Result<String, ProviderError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::Parse("response contained no choices".to_string()))
}

// Completion API response types (deserialization only)

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
