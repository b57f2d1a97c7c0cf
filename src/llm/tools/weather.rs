//! Climate tools. Figures are regional normals, not live observations.

use super::context::ToolContext;
use super::tool::{object_schema, parse_args, LlmTool, ToolDescriptor};
use crate::error::Result;
use crate::knowledge::seasons::{climate_normals, season_for, seasonal_activities, Season};
use crate::knowledge::Region;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct NormalsArgs {
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    month: Option<u32>,
}

/// Temperature, rainfall and season expected for a region and month.
pub struct ClimateNormalsTool {
    ctx: ToolContext,
}

impl ClimateNormalsTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for ClimateNormalsTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: NormalsArgs = parse_args(args)?;
        let region = self.ctx.region(args.region.as_deref());
        let month = args.month.unwrap_or_else(|| self.ctx.today().month());
        let normals = climate_normals(region, month)?;
        self.ctx.publish("get_climate_normals", &normals)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_climate_normals",
            "Normales climatiques d'une région pour un mois: saison, températures, pluviométrie attendue.",
            object_schema(
                json!({
                    "region": {"type": "string", "description": "Région du Cameroun"},
                    "month": {"type": "integer", "minimum": 1, "maximum": 12}
                }),
                &[],
            ),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct MonthOutlook {
    month: u32,
    season: Season,
    activities: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SeasonalOutlook {
    region: Region,
    today: String,
    months: Vec<MonthOutlook>,
}

fn default_months() -> u32 {
    3
}

#[derive(Debug, Deserialize)]
struct OutlookArgs {
    #[serde(default)]
    region: Option<String>,
    #[serde(default = "default_months")]
    months: u32,
}

/// Season and field work for the coming months, starting with the current one.
pub struct SeasonalOutlookTool {
    ctx: ToolContext,
}

impl SeasonalOutlookTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for SeasonalOutlookTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: OutlookArgs = parse_args(args)?;
        let region = self.ctx.region(args.region.as_deref());
        let today = self.ctx.today();
        let start = today.month0();

        let months = (0..args.months.clamp(1, 12))
            .map(|offset| {
                let month = (start + offset) % 12 + 1;
                MonthOutlook {
                    month,
                    season: season_for(region, month),
                    activities: seasonal_activities(region, month),
                }
            })
            .collect();

        let outlook = SeasonalOutlook {
            region,
            today: today.format("%Y-%m-%d").to_string(),
            months,
        };
        self.ctx.publish("get_seasonal_outlook", &outlook)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_seasonal_outlook",
            "Saisons et travaux agricoles conseillés pour les prochains mois dans une région.",
            object_schema(
                json!({
                    "region": {"type": "string"},
                    "months": {"type": "integer", "minimum": 1, "maximum": 12, "description": "Nombre de mois, 3 par défaut"}
                }),
                &[],
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionState;
    use crate::error::AgroError;

    fn context() -> ToolContext {
        ToolContext::new(SessionState::default(), Region::Littoral)
    }

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_climate_normals_for_named_month() {
        let ctx = context();
        let result = ClimateNormalsTool::new(ctx.clone())
            .run(&args(json!({"region": "Extrême-Nord", "month": 8})))
            .unwrap();

        assert_eq!(result["region"], "Extrême-Nord");
        assert_eq!(result["season"], "saison_des_pluies");
        assert!(result["rainfall_mm"].as_f64().unwrap() > 0.0);
        assert_eq!(ctx.session.get("get_climate_normals"), Some(result));
    }

    #[test]
    fn test_climate_normals_default_region() {
        let result = ClimateNormalsTool::new(context()).run(&HashMap::new()).unwrap();
        assert_eq!(result["region"], "Littoral");
    }

    #[test]
    fn test_climate_normals_bad_month() {
        let err = ClimateNormalsTool::new(context())
            .run(&args(json!({"month": 0})))
            .unwrap_err();
        assert!(matches!(err, AgroError::Validation(_)));
    }

    #[test]
    fn test_seasonal_outlook_wraps_year() {
        let result = SeasonalOutlookTool::new(context())
            .run(&args(json!({"months": 12})))
            .unwrap();

        let months: Vec<u64> = result["months"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["month"].as_u64().unwrap())
            .collect();
        assert_eq!(months.len(), 12);
        let mut sorted = months.clone();
        sorted.sort();
        assert_eq!(sorted, (1..=12).collect::<Vec<u64>>());
    }

    #[test]
    fn test_seasonal_outlook_default_length() {
        let result = SeasonalOutlookTool::new(context()).run(&HashMap::new()).unwrap();
        assert_eq!(result["months"].as_array().unwrap().len(), 3);
    }
}
