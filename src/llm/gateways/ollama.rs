use crate::error::{AgroError, Result};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage, LlmToolCall, MessageRole};
use crate::llm::tools::LlmTool;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Where the Ollama server lives; `OLLAMA_HOST` overrides the local default.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub host: String,
    pub timeout: Option<std::time::Duration>,
    pub headers: HashMap<String, String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            timeout: None,
            headers: HashMap::new(),
        }
    }
}

/// Gateway for a local Ollama server, used when no Gemini key is available.
pub struct OllamaGateway {
    client: Client,
    config: OllamaConfig,
}

impl OllamaGateway {
    pub fn new() -> Result<Self> {
        Self::with_config(OllamaConfig::default())
    }

    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    /// Shorthand for a gateway on another host with no extra headers.
    pub fn with_host(host: impl Into<String>) -> Result<Self> {
        Self::with_config(OllamaConfig {
            host: host.into(),
            ..Default::default()
        })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.config
            .headers
            .iter()
            .fold(self.client.post(format!("{}{}", self.config.host, path)), |req, (k, v)| {
                req.header(k, v)
            })
    }

    async fn chat(&self, body: &Value) -> Result<Value> {
        let response = self.post("/api/chat").json(body).send().await?;

        if !response.status().is_success() {
            return Err(AgroError::Gateway(format!("Ollama API error: {}", response.status())));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to Ollama for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let mut body = serde_json::json!({
            "model": model,
            "messages": adapt_messages_to_ollama(messages),
            "options": extract_ollama_options(config),
            "stream": false
        });

        if let Some(tools) = tools {
            let tool_defs: Vec<_> = tools.iter().map(|t| t.descriptor()).collect();
            body["tools"] = serde_json::to_value(tool_defs)?;
        }

        let response_body = self.chat(&body).await?;

        let content = response_body["message"]["content"].as_str().map(String::from);
        let tool_calls = response_body["message"]["tool_calls"]
            .as_array()
            .map(|calls| calls.iter().filter_map(parse_tool_call).collect())
            .unwrap_or_default();

        Ok(LlmGatewayResponse { content, tool_calls })
    }

    async fn complete_json(
        &self,
        model: &str,
        messages: &[LlmMessage],
        schema: Value,
        config: &CompletionConfig,
    ) -> Result<Value> {
        info!("Requesting structured output from Ollama");

        let body = serde_json::json!({
            "model": model,
            "messages": adapt_messages_to_ollama(messages),
            "options": extract_ollama_options(config),
            "format": schema,
            "stream": false
        });

        let response_body = self.chat(&body).await?;
        let content = response_body["message"]["content"]
            .as_str()
            .ok_or_else(|| AgroError::Gateway("No content in response".to_string()))?;

        Ok(serde_json::from_str(content)?)
    }

    async fn get_available_models(&self) -> Result<Vec<String>> {
        debug!("Fetching available Ollama models");

        let response = self.client.get(format!("{}/api/tags", self.config.host)).send().await?;

        if !response.status().is_success() {
            return Err(AgroError::Gateway(format!("Failed to get models: {}", response.status())));
        }

        let body: Value = response.json().await?;

        let models = body["models"]
            .as_array()
            .ok_or_else(|| AgroError::Gateway("Invalid response format".to_string()))?
            .iter()
            .filter_map(|m| m["name"].as_str().map(String::from))
            .collect();

        Ok(models)
    }
}

fn parse_tool_call(call: &Value) -> Option<LlmToolCall> {
    let name = call["function"]["name"].as_str()?.to_string();
    let arguments = call["function"]["arguments"]
        .as_object()?
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Some(LlmToolCall {
        id: call["id"].as_str().map(String::from),
        name,
        arguments,
    })
}

fn adapt_messages_to_ollama(messages: &[LlmMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| {
            let mut ollama_msg = serde_json::json!({
                "role": match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                    MessageRole::Tool => "tool",
                },
                "content": msg.content.as_deref().unwrap_or("")
            });

            if let (MessageRole::Assistant, Some(tool_calls)) = (msg.role, &msg.tool_calls) {
                ollama_msg["tool_calls"] = tool_calls
                    .iter()
                    .map(|tc| {
                        serde_json::json!({
                            "type": "function",
                            "function": {
                                "name": tc.name,
                                "arguments": tc.arguments
                            }
                        })
                    })
                    .collect();
            }

            ollama_msg
        })
        .collect()
}

fn extract_ollama_options(config: &CompletionConfig) -> Value {
    let mut options = serde_json::json!({
        "temperature": config.temperature,
        "num_ctx": config.num_ctx,
    });

    if let Some(num_predict) = config.num_predict {
        if num_predict > 0 {
            options["num_predict"] = serde_json::json!(num_predict);
        }
    } else if config.max_tokens > 0 {
        options["num_predict"] = serde_json::json!(config.max_tokens);
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tools::ToolDescriptor;

    #[test]
    fn test_timeout_and_headers_are_kept() {
        let mut headers = HashMap::new();
        headers.insert("X-Custom".to_string(), "value".to_string());

        let config = OllamaConfig {
            host: "http://test:9999".to_string(),
            timeout: Some(std::time::Duration::from_secs(30)),
            headers,
        };

        let gateway = OllamaGateway::with_config(config).unwrap();
        assert_eq!(gateway.config.host, "http://test:9999");
        assert_eq!(gateway.config.timeout, Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn test_with_host_overrides_environment() {
        let gateway = OllamaGateway::with_host("http://example.com:8080").unwrap();
        assert_eq!(gateway.config.host, "http://example.com:8080");
    }

    #[test]
    fn test_roles_map_to_ollama_names() {
        let messages = vec![
            LlmMessage::system("Tu es agronome"),
            LlmMessage::user("Bonjour"),
            LlmMessage::assistant("Bonjour !"),
        ];

        let result = adapt_messages_to_ollama(&messages);

        assert_eq!(result.len(), 3);
        assert_eq!(result[0]["role"], "system");
        assert_eq!(result[0]["content"], "Tu es agronome");
        assert_eq!(result[1]["role"], "user");
        assert_eq!(result[2]["role"], "assistant");
    }

    #[test]
    fn test_tool_requests_carry_their_arguments() {
        let tool_call = LlmToolCall {
            id: Some("call_123".to_string()),
            name: "analyze_profitability".to_string(),
            arguments: HashMap::from([("crop".to_string(), serde_json::json!("cacao"))]),
        };

        let messages = vec![
            LlmMessage::tool_request(vec![tool_call.clone()]),
            LlmMessage::tool_result(&tool_call, "{}"),
        ];

        let result = adapt_messages_to_ollama(&messages);

        assert_eq!(result[0]["role"], "assistant");
        assert_eq!(result[0]["content"], "");
        assert_eq!(result[0]["tool_calls"][0]["function"]["name"], "analyze_profitability");
        assert_eq!(result[0]["tool_calls"][0]["function"]["arguments"]["crop"], "cacao");
        // tool results carry only their content
        assert_eq!(result[1]["role"], "tool");
        assert!(result[1].get("tool_calls").is_none());
    }

    #[test]
    fn test_max_tokens_becomes_num_predict() {
        let config = CompletionConfig {
            temperature: 0.3,
            num_ctx: 4096,
            max_tokens: 2048,
            num_predict: None,
        };

        let options = extract_ollama_options(&config);

        assert!((options["temperature"].as_f64().unwrap() - 0.3).abs() < 0.01);
        assert_eq!(options["num_ctx"], 4096);
        assert_eq!(options["num_predict"], 2048);
    }

    #[test]
    fn test_explicit_num_predict_wins() {
        let config = CompletionConfig {
            num_predict: Some(500),
            ..Default::default()
        };

        let options = extract_ollama_options(&config);

        assert_eq!(options["num_predict"], 500);
    }

    #[test]
    fn test_zero_num_predict_means_unbounded() {
        let config = CompletionConfig {
            num_predict: Some(0),
            ..Default::default()
        };

        let options = extract_ollama_options(&config);

        assert!(options.get("num_predict").is_none());
    }

    #[tokio::test]
    async fn test_complete_returns_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"message":{"role":"assistant","content":"Semez en mars."}}"#)
            .create();

        let gateway = OllamaGateway::with_host(server.url()).unwrap();
        let messages = vec![LlmMessage::user("Quand semer ?")];

        let response = gateway
            .complete("qwen3:8b", &messages, None, &CompletionConfig::default())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.content.as_deref(), Some("Semez en mars."));
        assert!(response.tool_calls.is_empty());
    }

    struct PriceTool;

    impl LlmTool for PriceTool {
        fn run(&self, _args: &HashMap<String, Value>) -> Result<Value> {
            Ok(serde_json::json!({}))
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor::function("market_price", "A test", serde_json::json!({}))
        }
    }

    #[tokio::test]
    async fn test_complete_sends_tool_schemas() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(mockito::Matcher::JsonString(
                r#"{"model":"qwen3:8b","messages":[{"role":"user","content":"Prix ?"}],"options":{"temperature":1.0,"num_ctx":32768,"num_predict":16384},"stream":false,"tools":[{"type":"function","function":{"name":"market_price","description":"A test","parameters":{}}}]}"#.to_string()
            ))
            .with_status(200)
            .with_body(
                r#"{"message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"market_price","arguments":{"crop":"cacao","month":3}}}]}}"#,
            )
            .create();

        let gateway = OllamaGateway::with_host(server.url()).unwrap();
        let tools: Vec<Box<dyn LlmTool>> = vec![Box::new(PriceTool)];

        let response = gateway
            .complete(
                "qwen3:8b",
                &[LlmMessage::user("Prix ?")],
                Some(tools.as_slice()),
                &CompletionConfig::default(),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "market_price");
        assert_eq!(response.tool_calls[0].arguments["month"], 3);
        assert!(response.tool_calls[0].id.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_gateway_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/api/chat").with_status(500).create();

        let gateway = OllamaGateway::with_host(server.url()).unwrap();

        let result = gateway
            .complete("qwen3:8b", &[LlmMessage::user("Hi")], None, &CompletionConfig::default())
            .await;

        mock.assert();
        assert!(matches!(result, Err(AgroError::Gateway(_))));
    }

    #[tokio::test]
    async fn test_complete_json_parses_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"message":{"content":"{\"domain\":\"crops\",\"score\":3}"}}"#)
            .create();

        let gateway = OllamaGateway::with_host(server.url()).unwrap();
        let schema = serde_json::json!({"type": "object"});

        let json = gateway
            .complete_json(
                "qwen3:8b",
                &[LlmMessage::user("Classe")],
                schema,
                &CompletionConfig::default(),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(json["domain"], "crops");
        assert_eq!(json["score"], 3);
    }

    #[tokio::test]
    async fn test_lists_installed_models() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[{"name":"qwen3:8b"},{"name":"mistral"}]}"#)
            .create();

        let gateway = OllamaGateway::with_host(server.url()).unwrap();
        let models = gateway.get_available_models().await.unwrap();

        mock.assert();
        assert_eq!(models, vec!["qwen3:8b".to_string(), "mistral".to_string()]);
    }

    #[tokio::test]
    async fn test_custom_headers_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_body(r#"{"message":{"content":"ok"}}"#)
            .create();

        let gateway = OllamaGateway::with_config(OllamaConfig {
            host: server.url(),
            timeout: None,
            headers: HashMap::from([("x-api-key".to_string(), "secret".to_string())]),
        })
        .unwrap();

        gateway
            .complete("qwen3:8b", &[LlmMessage::user("Hi")], None, &CompletionConfig::default())
            .await
            .unwrap();

        mock.assert();
    }
}
