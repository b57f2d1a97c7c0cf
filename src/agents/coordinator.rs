//! Routes a farmer's question to one domain advisor.
//!
//! Routing is a keyword vote over the normalised question: each word that
//! matches one of a domain's keywords scores a point for that domain. The
//! best score wins, ties go to the domain listed first in [`Domain::ALL`] and
//! a question with no hit goes to the crops agent.

use super::domain::{Advisor, Domain, DomainAgent, SETTINGS_KEY};
use super::prompts::COORDINATOR_INSTRUCTIONS;
use crate::config::{AdvisorConfig, DEFAULT_NARRATIVE_TIMEOUT_SECS};
use crate::context::SessionState;
use crate::error::{AgroError, Result};
use crate::knowledge::seasons::season_for;
use crate::knowledge::{normalize_key, Crop, Region};
use crate::llm::{CompletionConfig, LlmBroker, LlmGateway, LlmMessage};
use crate::units::{InputSanitizer, CURRENCY};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Domain used when no keyword matches.
pub const DEFAULT_DOMAIN: Domain = Domain::Crops;

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryAnswer {
    pub domain: Domain,
    pub answer: String,
    pub correlation_id: Uuid,
    /// Everything the question's agents and tools recorded.
    pub session: Value,
}

/// Pick the domain whose keywords best match `question`.
pub fn route_question(question: &str) -> Domain {
    let normalised = normalize_key(question);
    let words: Vec<&str> = normalised
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut best = (DEFAULT_DOMAIN, 0);
    for domain in Domain::ALL {
        let score = words
            .iter()
            .filter(|word| domain.keywords().iter().any(|k| Domain::keyword_matches(k, word)))
            .count();
        debug!("Routing score for {}: {}", domain, score);
        if score > best.1 {
            best = (domain, score);
        }
    }
    best.0
}

pub struct Coordinator {
    advisors: Vec<Arc<dyn Advisor>>,
    synthesizer: Option<Arc<LlmBroker>>,
    default_region: Region,
    language: String,
    sanitizer: InputSanitizer,
    /// Bound on each model stage: the domain agent, then synthesis.
    timeout: Duration,
}

impl Coordinator {
    pub fn new(
        advisors: Vec<Arc<dyn Advisor>>,
        default_region: Region,
        language: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            advisors,
            synthesizer: None,
            default_region,
            language: language.into(),
            sanitizer: InputSanitizer::new()?,
            timeout: Duration::from_secs(DEFAULT_NARRATIVE_TIMEOUT_SECS),
        })
    }

    /// One [`DomainAgent`] per domain on its configured model, with the root
    /// model rewriting each answer into the final format.
    pub fn from_config(gateway: Arc<dyn LlmGateway>, config: &AdvisorConfig) -> Result<Self> {
        let broker = |model: &str| {
            Arc::new(LlmBroker::new(model, gateway.clone()).with_max_retries(config.max_retries))
        };

        let advisors = Domain::ALL
            .into_iter()
            .map(|domain| {
                let agent = DomainAgent::new(domain, broker(config.models.for_domain(domain)), config.default_region);
                Arc::new(agent) as Arc<dyn Advisor>
            })
            .collect();

        Ok(Self::new(advisors, config.default_region, config.default_language.clone())?
            .with_synthesis(broker(&config.models.root))
            .with_timeout(config.narrative_timeout))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_synthesis(mut self, broker: Arc<LlmBroker>) -> Self {
        self.synthesizer = Some(broker);
        self
    }

    /// Settings every agent sees for the question.
    pub fn settings(&self, today: NaiveDate, correlation_id: Uuid) -> Value {
        json!({
            "correlation_id": correlation_id.to_string(),
            "current_date": today.format("%Y-%m-%d").to_string(),
            "default_region": self.default_region,
            "season": season_for(self.default_region, today.month()),
            "language": self.language,
            "currency": CURRENCY,
            "crops": Crop::ALL.iter().map(|c| c.name()).collect::<Vec<_>>(),
            "regions": Region::ALL.iter().map(|r| r.name()).collect::<Vec<_>>(),
        })
    }

    pub async fn ask(&self, question: &str) -> Result<AdvisoryAnswer> {
        let question = self.sanitizer.clean(question);
        if question.is_empty() {
            return Err(AgroError::invalid("question", "nothing to answer"));
        }

        let correlation_id = Uuid::new_v4();
        let session = SessionState::default();
        session.set(SETTINGS_KEY, self.settings(Local::now().date_naive(), correlation_id));

        let domain = route_question(&question);
        info!("[{}] Delegating to {} agent", correlation_id, domain);

        let advisor = self
            .advisors
            .iter()
            .find(|a| a.domain() == domain)
            .ok_or_else(|| AgroError::Agent(format!("no advisor registered for {domain}")))?;

        let mut answer = match tokio::time::timeout(self.timeout, advisor.ask(&question, &session)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("[{}] {} agent timed out after {:?}", correlation_id, domain, self.timeout);
                return Err(AgroError::Timeout(format!(
                    "{domain} agent gave no answer within {:?}",
                    self.timeout
                )));
            }
        };

        if let Some(broker) = &self.synthesizer {
            let synthesis = self.synthesize(broker, &question, domain, &answer);
            match tokio::time::timeout(self.timeout, synthesis).await {
                Ok(Ok(text)) if !text.trim().is_empty() => answer = text,
                Ok(Ok(_)) => warn!("[{}] Empty synthesis, keeping {} answer", correlation_id, domain),
                Ok(Err(e)) => warn!("[{}] Synthesis failed, keeping {} answer: {}", correlation_id, domain, e),
                Err(_) => warn!(
                    "[{}] Synthesis timed out after {:?}, keeping {} answer",
                    correlation_id, self.timeout, domain
                ),
            }
        }
        session.set("final_response", Value::String(answer.clone()));

        Ok(AdvisoryAnswer {
            domain,
            answer,
            correlation_id,
            session: session.snapshot(),
        })
    }

    async fn synthesize(&self, broker: &LlmBroker, question: &str, domain: Domain, advice: &str) -> Result<String> {
        let messages = [
            LlmMessage::system(COORDINATOR_INSTRUCTIONS),
            LlmMessage::user(format!(
                "Question de l'agriculteur: {question}\n\nAvis du conseiller {domain}:\n{advice}"
            )),
        ];
        broker
            .generate(&messages, None, Some(CompletionConfig::coordinator()))
            .await
    }
}
