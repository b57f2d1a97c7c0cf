//! Optional LLM commentary on calculator results.
//!
//! Calculators stay pure. A [`Narrator`] takes a finished result, asks a
//! [`NarrativeService`] to explain it, and wraps both in [`Advised`]. The call is
//! bounded by a timeout; a slow or failing service only costs the narrative,
//! never the numbers.

mod prompts;

pub use prompts::Narratable;

use crate::error::Result;
use crate::llm::{CompletionConfig, LlmBroker, LlmMessage};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Turns a prompt into free text.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

const NARRATOR_BEHAVIOUR: &str = "Tu es un conseiller agricole camerounais. \
Tu expliques des résultats chiffrés à des agriculteurs, en français simple. \
Ne modifie jamais les chiffres fournis.";

/// [`NarrativeService`] backed by an [`LlmBroker`].
pub struct BrokerNarrator {
    broker: Arc<LlmBroker>,
    config: CompletionConfig,
}

impl BrokerNarrator {
    pub fn new(broker: Arc<LlmBroker>) -> Self {
        Self {
            broker,
            config: CompletionConfig::domain_agent(),
        }
    }

    pub fn with_config(mut self, config: CompletionConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl NarrativeService for BrokerNarrator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = [LlmMessage::system(NARRATOR_BEHAVIOUR), LlmMessage::user(prompt)];
        self.broker.generate(&messages, None, Some(self.config.clone())).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStatus {
    Generated,
    /// No service configured.
    Skipped,
    Failed,
    TimedOut,
}

/// A calculator result with its optional narrative.
#[derive(Debug, Clone, Serialize)]
pub struct Advised<T> {
    pub result: T,
    pub narrative: Option<String>,
    pub status: NarrativeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Advised<T> {
    fn plain(result: T, status: NarrativeStatus, error: Option<String>) -> Self {
        Self {
            result,
            narrative: None,
            status,
            error,
        }
    }
}

#[derive(Clone)]
pub struct Narrator {
    service: Option<Arc<dyn NarrativeService>>,
    timeout: Duration,
}

impl Narrator {
    pub fn new(service: Arc<dyn NarrativeService>, timeout: Duration) -> Self {
        Self {
            service: Some(service),
            timeout,
        }
    }

    /// A narrator that never calls out; every result comes back `Skipped`.
    pub fn disabled() -> Self {
        Self {
            service: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attach a narrative to `result`, degrading to the bare result on failure.
    pub async fn advise<T: Narratable>(&self, result: T) -> Advised<T> {
        let Some(service) = &self.service else {
            return Advised::plain(result, NarrativeStatus::Skipped, None);
        };

        let prompt = result.narrative_prompt();
        debug!("Narrative prompt: {} chars", prompt.len());

        match tokio::time::timeout(self.timeout, service.generate(&prompt)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Advised {
                result,
                narrative: Some(text),
                status: NarrativeStatus::Generated,
                error: None,
            },
            Ok(Ok(_)) => {
                warn!("Narrative service returned empty text");
                Advised::plain(result, NarrativeStatus::Failed, Some("empty narrative".to_string()))
            }
            Ok(Err(e)) => {
                warn!("Narrative generation failed: {}", e);
                Advised::plain(result, NarrativeStatus::Failed, Some(e.to_string()))
            }
            Err(_) => {
                warn!("Narrative generation timed out after {:?}", self.timeout);
                Advised::plain(
                    result,
                    NarrativeStatus::TimedOut,
                    Some(format!("no narrative after {}s", self.timeout.as_secs_f64())),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::finance::{calculate_roi, RoiSummary};
    use crate::error::AgroError;
    use crate::llm::{LlmGateway, LlmGatewayResponse, LlmTool};
    use serde_json::Value;
    use std::sync::Mutex;

    struct CannedService(&'static str);

    #[async_trait]
    impl NarrativeService for CannedService {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingService;

    #[async_trait]
    impl NarrativeService for FailingService {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(AgroError::Gateway("quota exceeded".to_string()))
        }
    }

    struct SlowService;

    #[async_trait]
    impl NarrativeService for SlowService {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("trop tard".to_string())
        }
    }

    fn roi() -> RoiSummary {
        calculate_roi(1_000_000.0, 250_000.0, 5).unwrap()
    }

    #[tokio::test]
    async fn test_generated_narrative_is_attached() {
        let narrator = Narrator::new(Arc::new(CannedService("Bon investissement.")), Duration::from_secs(5));

        let advised = narrator.advise(roi()).await;

        assert_eq!(advised.status, NarrativeStatus::Generated);
        assert_eq!(advised.narrative.as_deref(), Some("Bon investissement."));
        assert_eq!(advised.result, roi());
    }

    #[tokio::test]
    async fn test_disabled_narrator_skips() {
        let advised = Narrator::disabled().advise(roi()).await;

        assert_eq!(advised.status, NarrativeStatus::Skipped);
        assert!(advised.narrative.is_none());
        assert!(advised.error.is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_result() {
        let narrator = Narrator::new(Arc::new(FailingService), Duration::from_secs(5));

        let advised = narrator.advise(roi()).await;

        assert_eq!(advised.status, NarrativeStatus::Failed);
        assert!(advised.narrative.is_none());
        assert!(advised.error.unwrap().contains("quota exceeded"));
        assert_eq!(advised.result.payback_years, Some(4.0));
    }

    #[tokio::test]
    async fn test_blank_narrative_counts_as_failure() {
        let narrator = Narrator::new(Arc::new(CannedService("  \n")), Duration::from_secs(5));

        let advised = narrator.advise(roi()).await;

        assert_eq!(advised.status, NarrativeStatus::Failed);
        assert!(advised.narrative.is_none());
    }

    #[tokio::test]
    async fn test_timeout_returns_result_without_narrative() {
        let narrator = Narrator::new(Arc::new(SlowService), Duration::from_millis(50));

        let advised = narrator.advise(roi()).await;

        assert_eq!(advised.status, NarrativeStatus::TimedOut);
        assert!(advised.narrative.is_none());
        assert_eq!(advised.result, roi());
    }

    #[tokio::test]
    async fn test_advised_serialization() {
        let advised = Narrator::disabled().advise(roi()).await;
        let json = serde_json::to_value(&advised).unwrap();

        assert_eq!(json["status"], "skipped");
        assert_eq!(json["narrative"], Value::Null);
        assert!(json.get("error").is_none());
        assert_eq!(json["result"]["payback_years"], 4.0);
    }

    struct RecordingGateway {
        seen: Mutex<Vec<LlmMessage>>,
    }

    #[async_trait]
    impl LlmGateway for RecordingGateway {
        async fn complete(
            &self,
            _model: &str,
            messages: &[LlmMessage],
            _tools: Option<&[Box<dyn LlmTool>]>,
            config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            assert_eq!(config.temperature, 0.3);
            self.seen.lock().unwrap().extend_from_slice(messages);
            Ok(LlmGatewayResponse::text("Explication"))
        }

        async fn complete_json(
            &self,
            _model: &str,
            _messages: &[LlmMessage],
            _schema: Value,
            _config: &CompletionConfig,
        ) -> Result<Value> {
            Ok(Value::Null)
        }

        async fn get_available_models(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_broker_narrator_sends_behaviour_and_prompt() {
        let gateway = Arc::new(RecordingGateway { seen: Mutex::new(vec![]) });
        let broker = Arc::new(LlmBroker::new("gemini-2.0-flash-001", gateway.clone()));
        let narrator = BrokerNarrator::new(broker);

        let text = narrator.generate("Analyse du cacao").await.unwrap();

        assert_eq!(text, "Explication");
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].content.as_deref().unwrap().contains("conseiller agricole"));
        assert_eq!(seen[1].content.as_deref(), Some("Analyse du cacao"));
    }
}
