use crate::context::SessionState;
use crate::error::Result;
use crate::knowledge::Region;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;

/// What every advisory tool shares: the question's session and the region
/// assumed when the farmer names none.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub session: SessionState,
    pub default_region: Region,
}

impl ToolContext {
    pub fn new(session: SessionState, default_region: Region) -> Self {
        Self {
            session,
            default_region,
        }
    }

    /// Named region, or the default when the argument is absent.
    /// Unknown names fall back to Centre.
    pub fn region(&self, name: Option<&str>) -> Region {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Region::resolve(name),
            None => self.default_region,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Serialize a tool result, keep it in the session under `key` and hand it
    /// back for the model.
    pub fn publish<T: Serialize>(&self, key: &str, result: &T) -> Result<Value> {
        let value = serde_json::to_value(result)?;
        self.session.set(key, value.clone());
        Ok(value)
    }
}
