//! Agronomy calculators and LLM-backed advisory agents for Cameroonian farmers.
//!
//! The deterministic core lives in [`knowledge`] (static tables) and
//! [`calculators`] (pure functions over them). [`narrative`] attaches optional,
//! timeout-bounded commentary to calculator results, and [`agents`] routes
//! free-text questions to domain agents that call the calculators as tools.

pub mod agents;
pub mod calculators;
pub mod config;
pub mod context;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod narrative;
pub mod units;

pub use error::{AgroError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agents::{AdvisoryAnswer, Coordinator, Domain};
    pub use crate::config::AdvisorConfig;
    pub use crate::context::SessionState;
    pub use crate::error::{AgroError, Result};
    pub use crate::knowledge::{Crop, Region};
    #[cfg(feature = "gemini")]
    pub use crate::llm::gateways::GeminiGateway;
    #[cfg(feature = "ollama")]
    pub use crate::llm::gateways::OllamaGateway;
    pub use crate::llm::tools::{FunctionDescriptor, LlmTool, ToolDescriptor};
    pub use crate::llm::{CompletionConfig, LlmBroker, LlmGateway, LlmMessage, MessageRole};
    pub use crate::narrative::{Advised, BrokerNarrator, NarrativeStatus, Narrator};
}
