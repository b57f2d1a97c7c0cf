use crate::error::Result;
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use crate::llm::tools::LlmTool;
use async_trait::async_trait;
use serde_json::Value;

/// Sampling and length settings sent with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub temperature: f32,
    /// Context window, honoured by Ollama only.
    pub num_ctx: usize,
    pub max_tokens: usize,
    /// Ollama override of `max_tokens`; `Some(0)` means no limit.
    pub num_predict: Option<i32>,
}

impl CompletionConfig {
    /// Settings for the coordinator, which phrases answers for farmers.
    pub fn coordinator() -> Self {
        Self {
            temperature: 0.7,
            ..Default::default()
        }
    }

    /// Settings for the domain agents, which should stay close to the numbers.
    pub fn domain_agent() -> Self {
        Self {
            temperature: 0.3,
            ..Default::default()
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            num_ctx: 32768,
            max_tokens: 16384,
            num_predict: None,
        }
    }
}

/// A chat-completion backend (Gemini, Ollama, or a test double).
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// One model turn: text, tool calls, or both.
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse>;

    /// One model turn constrained to a JSON document matching `schema`.
    async fn complete_json(
        &self,
        model: &str,
        messages: &[LlmMessage],
        schema: Value,
        config: &CompletionConfig,
    ) -> Result<Value>;

    /// Model names the backend can serve.
    async fn get_available_models(&self) -> Result<Vec<String>>;
}
