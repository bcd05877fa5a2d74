//! Completion adapter: wraps the external model call behind a trait so the
//! pipeline (and tests) never touch the network directly.
//!
//! The provider is asked for a single structured call to
//! `classify_legal_area(category, plain_english)`. Replies arrive in several
//! shapes depending on provider/model vintage; the adapter tags the shape and
//! hands the raw payload to the extractor without interpreting it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::category::Category;
use crate::config::ai::AiConfig;
use crate::error::ProviderError;

pub const FUNCTION_NAME: &str = "classify_legal_area";

/// The shapes a provider reply can take, consumed exhaustively by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionReply {
    /// Modern tool-call array; `arguments` is the raw JSON-ish string.
    ToolCall { arguments: String },
    /// Legacy single function-call field.
    FunctionCall { arguments: String },
    /// No structured call; plain assistant content only.
    Content { text: String },
    /// Nothing usable at all.
    Absent,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request the structured classification call. Transport and provider
    /// errors are fatal for the request; there is no retry at this layer.
    async fn classify(
        &self,
        system_prompt: &str,
        text: &str,
    ) -> Result<CompletionReply, ProviderError>;

    /// Provider name for diagnostics/headers.
    fn provider_name(&self) -> &'static str;
}

pub type DynCompletionClient = Arc<dyn CompletionClient>;

/// Factory: build a client according to config and environment variables.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if `config.enabled==false`, returns a disabled client.
/// * Else builds the real provider (OpenAI; claude is stubbed for now).
pub fn build_client_from_config(config: &AiConfig) -> DynCompletionClient {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockClient::echoing(Category::Other));
    }

    if !config.enabled {
        return Arc::new(DisabledClient);
    }

    match config.provider.as_str() {
        "openai" => Arc::new(OpenAiClient::new(config)),
        "claude" => {
            // Stub: return disabled until implemented.
            warn!("claude provider is not implemented yet; completions disabled");
            Arc::new(DisabledClient)
        }
        other => {
            warn!(provider = other, "unknown provider; completions disabled");
            Arc::new(DisabledClient)
        }
    }
}

/* ----------------------------
OpenAI provider
---------------------------- */

/// OpenAI provider (Chat Completions API). Requires an API key.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(cfg: &AiConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("legalese-simplifier/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        }
    }

    /// JSON schema for the single tool the model is forced to call.
    fn tool_schema() -> serde_json::Value {
        let labels: Vec<&str> = Category::NAMED_PRIORITY
            .iter()
            .map(|c| c.label())
            .chain(std::iter::once("Other"))
            .collect();
        json!({
            "type": "function",
            "function": {
                "name": FUNCTION_NAME,
                "description": "Classifies the legal area and translates legal language into plain English.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "enum": labels,
                            "description": "The legal area of the text."
                        },
                        "plain_english": {
                            "type": "string",
                            "description": "The plain English translation of the legal text."
                        }
                    },
                    "required": ["category", "plain_english"]
                }
            }
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Default)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallEntry>>,
    #[serde(default)]
    function_call: Option<FunctionCallEntry>,
}

#[derive(Deserialize)]
struct ToolCallEntry {
    function: FunctionCallEntry,
}

#[derive(Deserialize)]
struct FunctionCallEntry {
    #[serde(default)]
    arguments: String,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn classify(
        &self,
        system_prompt: &str,
        text: &str,
    ) -> Result<CompletionReply, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey("openai".into()));
        }

        let req = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": text },
            ],
            "tools": [Self::tool_schema()],
            "tool_choice": { "type": "function", "function": { "name": FUNCTION_NAME } },
            "temperature": 0.2,
        });

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        let body: ChatResponse = resp.json().await?;
        let message = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(ProviderError::EmptyChoices)?;

        Ok(reply_from_message(message))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Shape detection, in order of preference: tool calls, legacy function
/// call, plain content, nothing.
fn reply_from_message(msg: ChoiceMessage) -> CompletionReply {
    if let Some(calls) = msg.tool_calls {
        if let Some(first) = calls.into_iter().next() {
            return CompletionReply::ToolCall {
                arguments: first.function.arguments,
            };
        }
    }
    if let Some(fc) = msg.function_call {
        return CompletionReply::FunctionCall {
            arguments: fc.arguments,
        };
    }
    match msg.content {
        Some(text) => CompletionReply::Content { text },
        None => CompletionReply::Absent,
    }
}

/* ----------------------------
Disabled + mock clients
---------------------------- */

/// Fails every request; used when completions are switched off in config.
pub struct DisabledClient;

#[async_trait]
impl CompletionClient for DisabledClient {
    async fn classify(&self, _: &str, _: &str) -> Result<CompletionReply, ProviderError> {
        Err(ProviderError::Disabled)
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic client for tests/local runs.
#[derive(Clone)]
pub struct MockClient {
    pub reply: CompletionReply,
}

impl MockClient {
    pub fn new(reply: CompletionReply) -> Self {
        Self { reply }
    }

    /// A well-formed tool call declaring `category` and a canned translation.
    pub fn echoing(category: Category) -> Self {
        let arguments = json!({
            "category": category.label(),
            "plain_english": "This is a plain-English mock translation.",
        })
        .to_string();
        Self::new(CompletionReply::ToolCall { arguments })
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn classify(&self, _: &str, _: &str) -> Result<CompletionReply, ProviderError> {
        Ok(self.reply.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_calls_win_over_legacy_and_content() {
        let msg = ChoiceMessage {
            content: Some("freeform".into()),
            tool_calls: Some(vec![ToolCallEntry {
                function: FunctionCallEntry {
                    arguments: "{\"category\":\"Contract\"}".into(),
                },
            }]),
            function_call: Some(FunctionCallEntry {
                arguments: "legacy".into(),
            }),
        };
        assert!(matches!(
            reply_from_message(msg),
            CompletionReply::ToolCall { .. }
        ));
    }

    #[test]
    fn legacy_function_call_wins_over_content() {
        let msg = ChoiceMessage {
            content: Some("freeform".into()),
            tool_calls: None,
            function_call: Some(FunctionCallEntry {
                arguments: "not a json".into(),
            }),
        };
        assert_eq!(
            reply_from_message(msg),
            CompletionReply::FunctionCall {
                arguments: "not a json".into()
            }
        );
    }

    #[test]
    fn bare_content_and_nothing() {
        let msg = ChoiceMessage {
            content: Some("just text".into()),
            tool_calls: None,
            function_call: None,
        };
        assert_eq!(
            reply_from_message(msg),
            CompletionReply::Content {
                text: "just text".into()
            }
        );
        assert_eq!(reply_from_message(ChoiceMessage::default()), CompletionReply::Absent);
    }
}
