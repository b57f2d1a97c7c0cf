//! The five advisory domains and the LLM agent that serves each one.

use super::prompts::domain_instructions;
use crate::context::SessionState;
use crate::error::Result;
use crate::knowledge::Region;
use crate::llm::tools::{crops, economics, health, resources, weather};
use crate::llm::{CompletionConfig, LlmBroker, LlmMessage, LlmTool, ToolContext};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Session key under which the coordinator seeds the question's settings.
pub const SETTINGS_KEY: &str = "agriculture_settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Weather,
    Crops,
    Health,
    Economics,
    Resources,
}

impl Domain {
    /// Routing order; earlier domains win ties.
    pub const ALL: [Domain; 5] = [
        Domain::Weather,
        Domain::Crops,
        Domain::Health,
        Domain::Economics,
        Domain::Resources,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Weather => "weather",
            Domain::Crops => "crops",
            Domain::Health => "health",
            Domain::Economics => "economic",
            Domain::Resources => "resources",
        }
    }

    /// Session key holding this domain's latest answer.
    pub fn response_key(&self) -> String {
        format!("{}_response", self.name())
    }

    /// Routing keywords, already normalised (see [`crate::knowledge::normalize_key`]).
    ///
    /// Keywords of five letters or more also match as prefixes, so `pluie`
    /// matches `pluies`. Shorter ones must match a whole word.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Domain::Weather => &[
                "meteo", "pluie", "pluvio", "climat", "saison", "temperature", "chaleur",
                "secheresse", "prevision", "orage", "humidite", "froid", "vent", "temps",
            ],
            Domain::Crops => &[
                "planter", "plantation", "semis", "semer", "recolte", "variete", "rotation",
                "cultiver", "calendrier", "bouture", "pepiniere", "cycle",
            ],
            Domain::Health => &[
                "maladie", "malade", "parasite", "ravageur", "insecte", "champignon", "taches",
                "tache", "pourri", "symptome", "traitement", "traiter", "chenille", "puceron",
                "virus", "mildiou", "rouille", "jaunissement", "fletri",
            ],
            Domain::Economics => &[
                "prix", "marche", "vendre", "vente", "rentab", "cout", "couts", "benefice",
                "profit", "argent", "fcfa", "investi", "revenu", "credit", "budget",
            ],
            Domain::Resources => &[
                "sol", "sols", "engrais", "fertili", "irrig", "eau", "compost", "fumier",
                "terrain", "ph", "amendement", "chaux", "nutriment", "azote", "arrosage",
            ],
        }
    }

    /// Whether a normalised word counts as a hit for `keyword`.
    pub(crate) fn keyword_matches(keyword: &str, word: &str) -> bool {
        word == keyword || (keyword.len() >= 5 && word.starts_with(keyword))
    }

    /// The tools this domain's agent may call, bound to one question's context.
    pub fn tools(&self, ctx: &ToolContext) -> Vec<Box<dyn LlmTool>> {
        let ctx = ctx.clone();
        match self {
            Domain::Weather => vec![
                Box::new(weather::ClimateNormalsTool::new(ctx.clone())) as Box<dyn LlmTool>,
                Box::new(weather::SeasonalOutlookTool::new(ctx)),
            ],
            Domain::Crops => vec![
                Box::new(crops::CropProfileTool::new(ctx.clone())) as Box<dyn LlmTool>,
                Box::new(crops::PlantingCalendarTool::new(ctx.clone())),
                Box::new(crops::RegionalCropsTool::new(ctx)),
            ],
            Domain::Health => vec![
                Box::new(health::DiagnoseDiseaseTool::new(ctx.clone())) as Box<dyn LlmTool>,
                Box::new(health::IdentifyPestTool::new(ctx.clone())),
                Box::new(health::TreatmentTool::new(ctx.clone())),
                Box::new(health::PreventionTool::new(ctx)),
            ],
            Domain::Economics => vec![
                Box::new(economics::MarketPriceTool::new(ctx.clone())) as Box<dyn LlmTool>,
                Box::new(economics::ProfitabilityTool::new(ctx.clone())),
                Box::new(economics::SalesStrategyTool::new(ctx.clone())),
                Box::new(economics::ProductionCostTool::new(ctx.clone())),
                Box::new(economics::MarketOpportunityTool::new(ctx.clone())),
                Box::new(economics::RoiTool::new(ctx)),
            ],
            Domain::Resources => vec![
                Box::new(resources::SoilRequirementTool::new(ctx.clone())) as Box<dyn LlmTool>,
                Box::new(resources::FertilizerTool::new(ctx.clone())),
                Box::new(resources::IrrigationTool::new(ctx.clone())),
                Box::new(resources::LandSuitabilityTool::new(ctx.clone())),
                Box::new(resources::NutrientNeedsTool::new(ctx.clone())),
                Box::new(resources::SoilAmendmentTool::new(ctx)),
            ],
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that can answer a farmer's question for one domain.
#[async_trait]
pub trait Advisor: Send + Sync {
    fn domain(&self) -> Domain;

    /// Answer `question`, reading and writing the question's session.
    async fn ask(&self, question: &str, session: &SessionState) -> Result<String>;
}

/// An LLM agent with its domain's instructions and tools.
///
/// Tools are instantiated per question so that their results land in that
/// question's session.
pub struct DomainAgent {
    domain: Domain,
    broker: Arc<LlmBroker>,
    behaviour: String,
    default_region: Region,
    config: CompletionConfig,
}

impl DomainAgent {
    pub fn new(domain: Domain, broker: Arc<LlmBroker>, default_region: Region) -> Self {
        Self {
            domain,
            broker,
            behaviour: domain_instructions(domain).to_string(),
            default_region,
            config: CompletionConfig::domain_agent(),
        }
    }

    pub fn with_behaviour(mut self, behaviour: impl Into<String>) -> Self {
        self.behaviour = behaviour.into();
        self
    }

    pub fn with_config(mut self, config: CompletionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn behaviour(&self) -> &str {
        &self.behaviour
    }

    fn messages(&self, question: &str, session: &SessionState) -> Vec<LlmMessage> {
        let mut messages = vec![LlmMessage::system(&self.behaviour)];
        if let Some(settings) = session.get(SETTINGS_KEY) {
            messages.push(LlmMessage::system(format!("Contexte de la session: {settings}")));
        }
        messages.push(LlmMessage::user(question));
        messages
    }
}

#[async_trait]
impl Advisor for DomainAgent {
    fn domain(&self) -> Domain {
        self.domain
    }

    async fn ask(&self, question: &str, session: &SessionState) -> Result<String> {
        let ctx = ToolContext::new(session.clone(), self.default_region);
        let tools = self.domain.tools(&ctx);
        let messages = self.messages(question, session);

        info!("Agent {} answering with model {}", self.domain, self.broker.model());
        debug!("Agent {} has {} tools", self.domain, tools.len());

        let answer = self
            .broker
            .generate(&messages, Some(tools.as_slice()), Some(self.config.clone()))
            .await?;

        session.set(&self.domain.response_key(), serde_json::Value::String(answer.clone()));
        Ok(answer)
    }
}
