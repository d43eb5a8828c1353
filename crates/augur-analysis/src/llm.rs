use std::future::Future;
use std::time::Duration;

use augur_core::{AugurError, LlmConfig};
use serde::{Deserialize, Serialize};

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use augur_analysis::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Assess this diff".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use augur_analysis::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// The completion-call seam the analysis engine is written against.
///
/// The engine's retry policy branches only on the [`AugurError`] variant a
/// `chat` call returns, so implementations must classify their failures:
/// [`AugurError::SizeLimit`] for payload-too-large and quota errors,
/// [`AugurError::Transport`] for everything network- or auth-shaped, and
/// [`AugurError::Schema`] for responses the provider itself mangled.
/// Tests script this trait; production uses [`CompletionClient`].
pub trait Completion {
    /// Model identifier, reported in run stats.
    fn model(&self) -> &str;

    /// Send a chat completion request and return the text response.
    fn chat(
        &self,
        messages: Vec<ChatMessage>,
    ) -> impl Future<Output = Result<String, AugurError>>;
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes the `/v1/chat/completions`
/// endpoint: OpenAI, Ollama, vLLM, LiteLLM, etc.
///
/// # Examples
///
/// ```
/// use augur_analysis::llm::CompletionClient;
/// use augur_core::LlmConfig;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = CompletionClient::new(&config).unwrap();
/// ```
pub struct CompletionClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl CompletionClient {
    /// Create a new completion client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AugurError::Transport`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use augur_analysis::llm::CompletionClient;
    /// use augur_core::LlmConfig;
    ///
    /// let client = CompletionClient::new(&LlmConfig::default()).unwrap();
    /// ```
    pub fn new(config: &LlmConfig) -> Result<Self, AugurError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AugurError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl Completion for CompletionClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    /// Builds a request to `{base_url}/v1/chat/completions` with the given
    /// messages, temperature 0.1, and JSON response format, then classifies
    /// any failure into the engine's error taxonomy.
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, AugurError> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        let url = format!("{base_url}/v1/chat/completions");

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": 0.1,
            "response_format": { "type": "json_object" },
        });

        let mut request = self.client.post(&url);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }
        request = request.header("Content-Type", "application/json");

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| AugurError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &body_text));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AugurError::Schema(format!("failed to parse response envelope: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                AugurError::Schema(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}

/// Error codes providers use for the size/rate-limit class in the
/// OpenAI-style `{"error": {"code": ...}}` body.
const SIZE_LIMIT_CODES: &[&str] = &[
    "context_length_exceeded",
    "rate_limit_exceeded",
    "request_too_large",
];

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Map a failed completion response to the engine's error taxonomy.
///
/// Only the HTTP status and the provider's structured `error.code` field
/// are consulted. Free-text error messages are carried along for humans
/// but never matched against, so a message that merely mentions "large"
/// cannot be misrouted into the re-split path.
pub fn classify_api_error(status: u16, body: &str) -> AugurError {
    if status == 413 || status == 429 {
        return AugurError::SizeLimit(format!("completion API returned {status}: {body}"));
    }

    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(code) = parsed.error.code.as_deref() {
            if SIZE_LIMIT_CODES.contains(&code) {
                let detail = parsed.error.message.unwrap_or_else(|| code.to_string());
                return AugurError::SizeLimit(format!("provider rejected request: {detail}"));
            }
        }
    }

    AugurError::Transport(format!("completion API error {status}: {body}"))
}
