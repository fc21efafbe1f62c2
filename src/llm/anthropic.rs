//! Anthropic Messages API client.

use super::{ContentBlock, LanguageModel, Message, ModelRequest, ModelResponse, StopReason, ToolChoice, ToolDefinition};
use crate::error::{Result, SyllabusError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic client.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 800,
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Anthropic API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    config: AnthropicConfig,
}

impl AnthropicClient {
    /// Create a client, reading `ANTHROPIC_API_KEY` from the environment.
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| SyllabusError::Config("ANTHROPIC_API_KEY not set".to_string()))?;
        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(api_key: String, config: AnthropicConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SyllabusError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(self.api_key.trim())
                .map_err(|_| SyllabusError::Config("Invalid Anthropic API key".to_string()))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn build_body<'a>(&'a self, request: &'a ModelRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &request.system,
            messages: &request.messages,
            tools: &request.tools,
            tool_choice: request.tool_choice.as_ref(),
        }
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    #[instrument(skip(self, request), fields(model = %self.config.model, messages = request.messages.len(), tools = request.tools.len()))]
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .headers(self.headers()?)
            .json(&self.build_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(SyllabusError::Llm(format!("Anthropic returned {}: {}", status, body)));
        }

        let parsed: MessagesResponse = response.json().await?;
        let response = parsed.into_model_response();
        debug!("Model stopped with {:?}", response.stop_reason);
        Ok(response)
    }
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "is_empty_slice")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a ToolChoice>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
    #[serde(default)]
    stop_reason: Option<StopReason>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    /// Keep only text and tool_use blocks.
    ///
    /// Other block types (thinking, for one) are dropped, so the assistant turn replayed
    /// in a follow-up call is not byte-for-byte what the API returned. Thinking is never
    /// enabled on requests, and the follow-up only needs the tool_use ids.
    fn into_model_response(self) -> ModelResponse {
        let content = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(ContentBlock::Text { text }),
                ResponseBlock::ToolUse { id, name, input } => Some(ContentBlock::ToolUse { id, name, input }),
                ResponseBlock::Other => None,
            })
            .collect();

        ModelResponse {
            stop_reason: self.stop_reason.unwrap_or_default(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> AnthropicClient {
        AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default()).unwrap()
    }

    #[test]
    fn test_body_omits_tools_when_not_offered() {
        let client = client();
        let request = ModelRequest {
            system: "Be brief.".to_string(),
            messages: vec![Message::user("What is MCP?")],
            ..Default::default()
        };

        let body = serde_json::to_value(client.build_body(&request)).unwrap();
        assert_eq!(body["model"], json!("claude-sonnet-4-20250514"));
        assert_eq!(body["max_tokens"], json!(800));
        assert_eq!(body["temperature"], json!(0.0));
        assert_eq!(body["system"], json!("Be brief."));
        assert_eq!(body["messages"][0]["content"][0]["text"], json!("What is MCP?"));
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_body_includes_tools_and_choice() {
        let client = client();
        let request = ModelRequest {
            system: String::new(),
            messages: vec![Message::user("q")],
            tools: vec![ToolDefinition::new("t", "a tool", json!({"type": "object"}))],
            tool_choice: Some(ToolChoice::Auto),
        };

        let body = serde_json::to_value(client.build_body(&request)).unwrap();
        assert!(body.get("system").is_none());
        assert_eq!(body["tools"][0]["name"], json!("t"));
        assert_eq!(body["tool_choice"], json!({"type": "auto"}));
    }

    #[test]
    fn test_parse_tool_use_response() {
        let parsed: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "stop_reason": "tool_use",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Searching."},
                {"type": "tool_use", "id": "toolu_1", "name": "search_course_content", "input": {"query": "MCP"}}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();

        let response = parsed.into_model_response();
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.text(), "Searching.");
        let (id, name, input) = response.tool_uses().next().unwrap();
        assert_eq!(id, "toolu_1");
        assert_eq!(name, "search_course_content");
        assert_eq!(input["query"], json!("MCP"));
    }
}
