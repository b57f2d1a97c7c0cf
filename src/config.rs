//! Runtime settings read from the environment (and `.env`, via `dotenv`).

use crate::agents::Domain;
use crate::error::{AgroError, Result};
use crate::knowledge::Region;
use std::time::Duration;

pub const DEFAULT_AGENT_MODEL: &str = "gemini-2.0-flash-001";
pub const DEFAULT_LANGUAGE: &str = "fr";
pub const DEFAULT_NARRATIVE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Model name for the coordinator and each domain agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentModels {
    pub root: String,
    pub weather: String,
    pub crops: String,
    pub health: String,
    pub economic: String,
    pub resources: String,
}

impl AgentModels {
    pub fn for_domain(&self, domain: Domain) -> &str {
        match domain {
            Domain::Weather => &self.weather,
            Domain::Crops => &self.crops,
            Domain::Health => &self.health,
            Domain::Economics => &self.economic,
            Domain::Resources => &self.resources,
        }
    }
}

impl Default for AgentModels {
    fn default() -> Self {
        Self {
            root: DEFAULT_AGENT_MODEL.to_string(),
            weather: DEFAULT_AGENT_MODEL.to_string(),
            crops: DEFAULT_AGENT_MODEL.to_string(),
            health: DEFAULT_AGENT_MODEL.to_string(),
            economic: DEFAULT_AGENT_MODEL.to_string(),
            resources: DEFAULT_AGENT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Only needed by the Gemini gateway.
    pub gemini_api_key: Option<String>,
    pub models: AgentModels,
    pub default_region: Region,
    pub default_language: String,
    pub narrative_timeout: Duration,
    pub max_retries: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            models: AgentModels::default(),
            default_region: Region::Centre,
            default_language: DEFAULT_LANGUAGE.to_string(),
            narrative_timeout: Duration::from_secs(DEFAULT_NARRATIVE_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl AdvisorConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let model = |key: &str| get(key).unwrap_or_else(|| DEFAULT_AGENT_MODEL.to_string());

        let default_region = match get("DEFAULT_REGION") {
            Some(name) => Region::from_name(&name)
                .ok_or_else(|| AgroError::Config(format!("DEFAULT_REGION: unknown region '{name}'")))?,
            None => Region::Centre,
        };

        let timeout_secs = match get("NARRATIVE_TIMEOUT_SECONDS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(AgroError::Config(format!(
                        "NARRATIVE_TIMEOUT_SECONDS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => DEFAULT_NARRATIVE_TIMEOUT_SECS,
        };

        let max_retries = match get("MAX_RETRIES") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| AgroError::Config(format!("MAX_RETRIES must be an integer, got '{raw}'")))?,
            None => DEFAULT_MAX_RETRIES,
        };

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY"),
            models: AgentModels {
                root: model("ROOT_AGENT_MODEL"),
                weather: model("WEATHER_AGENT_MODEL"),
                crops: model("CROPS_AGENT_MODEL"),
                health: model("HEALTH_AGENT_MODEL"),
                economic: model("ECONOMIC_AGENT_MODEL"),
                resources: model("RESOURCES_AGENT_MODEL"),
            },
            default_region,
            default_language: get("DEFAULT_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            narrative_timeout: Duration::from_secs(timeout_secs),
            max_retries,
        })
    }
}
