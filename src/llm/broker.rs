use crate::error::{AgroError, Result};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use crate::llm::tools::LlmTool;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tool-call rounds allowed before a conversation is abandoned.
pub const MAX_TOOL_ROUNDS: usize = 8;

/// Wait before the first retry; doubled for each further attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Main interface for LLM interactions
pub struct LlmBroker {
    model: String,
    gateway: Arc<dyn LlmGateway>,
    max_retries: u32,
    retry_delay: Duration,
}

impl LlmBroker {
    /// Create a new LLM broker
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Retry transport failures up to `max_retries` extra times.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text response from LLM, running any requested tools.
    pub async fn generate(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: Option<CompletionConfig>,
    ) -> Result<String> {
        let config = config.unwrap_or_default();
        self.generate_round(messages.to_vec(), tools, &config, 0).await
    }

    fn generate_round<'a>(
        &'a self,
        messages: Vec<LlmMessage>,
        tools: Option<&'a [Box<dyn LlmTool>]>,
        config: &'a CompletionConfig,
        round: usize,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.complete_with_retries(&messages, tools, config).await?;

            match tools {
                Some(tools) if !response.tool_calls.is_empty() => {
                    if round >= MAX_TOOL_ROUNDS {
                        return Err(AgroError::Agent(format!(
                            "model still requesting tools after {MAX_TOOL_ROUNDS} rounds"
                        )));
                    }
                    let messages = self.handle_tool_calls(messages, response, tools)?;
                    self.generate_round(messages, Some(tools), config, round + 1).await
                }
                _ => Ok(response.content.unwrap_or_default()),
            }
        })
    }

    fn handle_tool_calls(
        &self,
        mut messages: Vec<LlmMessage>,
        response: LlmGatewayResponse,
        tools: &[Box<dyn LlmTool>],
    ) -> Result<Vec<LlmMessage>> {
        info!("Tool calls requested: {}", response.tool_calls.len());
        messages.push(LlmMessage::tool_request(response.tool_calls.clone()));

        for tool_call in &response.tool_calls {
            let output = match tools.iter().find(|t| t.matches(&tool_call.name)) {
                Some(tool) => {
                    info!("Executing tool: {}", tool_call.name);
                    // Input errors go back to the model so it can correct its arguments.
                    tool.run(&tool_call.arguments).unwrap_or_else(|e| {
                        warn!("Tool {} failed: {}", tool_call.name, e);
                        json!({ "error": e.to_string() })
                    })
                }
                None => {
                    warn!("Tool not found: {}", tool_call.name);
                    json!({ "error": format!("unknown tool {}", tool_call.name) })
                }
            };
            messages.push(LlmMessage::tool_result(tool_call, serde_json::to_string(&output)?));
        }

        Ok(messages)
    }

    async fn complete_with_retries(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        let mut attempt = 0;
        loop {
            match self.gateway.complete(&self.model, messages, tools, config).await {
                Err(e @ (AgroError::Http(_) | AgroError::Gateway(_) | AgroError::Timeout(_)))
                    if attempt < self.max_retries =>
                {
                    let delay = self.backoff(attempt);
                    attempt += 1;
                    debug!(
                        "Retrying {} in {:?} after error ({}/{}): {}",
                        self.model, delay, attempt, self.max_retries, e
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}
