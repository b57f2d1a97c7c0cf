use crate::error::{AgroError, Result};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage, LlmToolCall, MessageRole};
use crate::llm::tools::LlmTool;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Google Generative Language REST API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GEMINI_API_BASE.to_string(),
            timeout: Some(Duration::from_secs(60)),
        }
    }

    /// Reads `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| AgroError::Config("GEMINI_API_KEY is not set".to_string()))
    }
}

pub struct GeminiGateway {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        Ok(Self {
            client: client_builder.build()?,
            config,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    async fn generate_content(&self, model: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.config.base_url, model))
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        Ok(response.json().await?)
    }
}

/// Rate limits and server faults are worth retrying; other statuses are not.
fn status_error(status: StatusCode, body: &str) -> AgroError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        AgroError::Gateway(format!("gemini rate limit exceeded: {body}"))
    } else if status.is_server_error() {
        AgroError::Gateway(format!("gemini request failed with {status}: {body}"))
    } else {
        AgroError::Api(format!("gemini request failed with {status}: {body}"))
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to Gemini for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let mut body = request_body(messages, config);
        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            let declarations: Vec<Value> = tools
                .iter()
                .map(|t| {
                    let f = t.descriptor().function;
                    json!({ "name": f.name, "description": f.description, "parameters": f.parameters })
                })
                .collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }

        let response = self.generate_content(model, &body).await?;
        parse_candidate(&response)
    }

    async fn complete_json(
        &self,
        model: &str,
        messages: &[LlmMessage],
        schema: Value,
        config: &CompletionConfig,
    ) -> Result<Value> {
        info!("Requesting structured output from Gemini");

        let mut body = request_body(messages, config);
        body["generationConfig"]["responseMimeType"] = json!("application/json");
        body["generationConfig"]["responseSchema"] = schema;

        let response = self.generate_content(model, &body).await?;
        let content = parse_candidate(&response)?
            .content
            .ok_or_else(|| AgroError::Gateway("No content in response".to_string()))?;

        Ok(serde_json::from_str(&content)?)
    }

    async fn get_available_models(&self) -> Result<Vec<String>> {
        debug!("Fetching available Gemini models");

        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: Value = response.json().await?;
        let models = body["models"]
            .as_array()
            .ok_or_else(|| AgroError::Gateway("Invalid response format".to_string()))?
            .iter()
            .filter_map(|m| m["name"].as_str())
            .map(|name| name.trim_start_matches("models/").to_string())
            .collect();

        Ok(models)
    }
}

/// System messages become `systemInstruction`; the rest map onto `contents`.
fn request_body(messages: &[LlmMessage], config: &CompletionConfig) -> Value {
    let system: Vec<Value> = messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .filter_map(|m| m.content.as_deref())
        .map(|text| json!({ "text": text }))
        .collect();

    let contents: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(to_content)
        .collect();

    let mut generation_config = json!({ "temperature": config.temperature });
    let max_output = config.num_predict.filter(|n| *n > 0).map(|n| n as usize).unwrap_or(config.max_tokens);
    if max_output > 0 {
        generation_config["maxOutputTokens"] = json!(max_output);
    }

    let mut body = json!({
        "contents": contents,
        "generationConfig": generation_config,
    });
    if !system.is_empty() {
        body["systemInstruction"] = json!({ "parts": system });
    }
    body
}

fn to_content(message: &LlmMessage) -> Value {
    match (message.role, &message.tool_calls) {
        (MessageRole::Assistant, Some(calls)) => {
            let parts: Vec<Value> = calls
                .iter()
                .map(|c| json!({ "functionCall": { "name": c.name, "args": c.arguments } }))
                .collect();
            json!({ "role": "model", "parts": parts })
        }
        (MessageRole::Tool, calls) => {
            let name = calls
                .as_ref()
                .and_then(|c| c.first())
                .map(|c| c.name.as_str())
                .unwrap_or_default();
            let text = message.content.as_deref().unwrap_or_default();
            // functionResponse.response must be an object
            let response = match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Value::Object(map),
                Ok(other) => json!({ "result": other }),
                Err(_) => json!({ "result": text }),
            };
            json!({
                "role": "user",
                "parts": [{ "functionResponse": { "name": name, "response": response } }]
            })
        }
        (role, _) => json!({
            "role": if role == MessageRole::Assistant { "model" } else { "user" },
            "parts": [{ "text": message.content.as_deref().unwrap_or_default() }]
        }),
    }
}

fn parse_candidate(response: &Value) -> Result<LlmGatewayResponse> {
    let parts = response["candidates"][0]["content"]["parts"].as_array().ok_or_else(|| {
        let reason = response["promptFeedback"]["blockReason"].as_str().unwrap_or("no candidates");
        AgroError::Gateway(format!("Gemini returned no content: {reason}"))
    })?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    let tool_calls = parts
        .iter()
        .filter_map(|p| p.get("functionCall"))
        .filter_map(|call| {
            let name = call["name"].as_str()?.to_string();
            let arguments = call["args"].as_object().cloned().unwrap_or_else(Map::new);
            Some(LlmToolCall {
                id: None,
                name,
                arguments: arguments.into_iter().collect(),
            })
        })
        .collect();

    Ok(LlmGatewayResponse {
        content: (!text.is_empty()).then_some(text),
        tool_calls,
    })
}
