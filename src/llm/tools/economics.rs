//! Market and farm-finance tools.

use super::context::ToolContext;
use super::tool::{object_schema, parse_args, LlmTool, ToolDescriptor};
use crate::calculators::finance::{
    analyze_profitability, calculate_production_costs, calculate_roi, market_price_quote,
    rank_market_opportunities, recommend_sales_strategy, Urgency,
};
use crate::error::Result;
use crate::knowledge::inputs::{InputLevel, ProductionSystem};
use crate::knowledge::market::MarketType;
use chrono::Datelike;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

fn default_market_type() -> String {
    "gros".to_string()
}

#[derive(Debug, Deserialize)]
struct PriceArgs {
    crop: String,
    #[serde(default = "default_market_type")]
    market_type: String,
    /// Defaults to the current month.
    #[serde(default)]
    month: Option<u32>,
}

pub struct MarketPriceTool {
    ctx: ToolContext,
}

impl MarketPriceTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for MarketPriceTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: PriceArgs = parse_args(args)?;
        let month = args.month.unwrap_or_else(|| self.ctx.today().month());
        let quote = market_price_quote(&args.crop, MarketType::parse(&args.market_type)?, month)?;
        self.ctx.publish("get_market_prices", &quote)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_market_prices",
            "Prix courant, minimum et maximum d'une culture en FCFA/kg selon le marché et le mois.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "market_type": {"type": "string", "enum": ["producteur", "gros", "détail", "export"]},
                    "month": {"type": "integer", "minimum": 1, "maximum": 12}
                }),
                &["crop"],
            ),
        )
    }
}

fn default_production_system() -> String {
    "traditionnel".to_string()
}

#[derive(Debug, Deserialize)]
struct ProfitabilityArgs {
    crop: String,
    area_ha: f64,
    #[serde(default = "default_production_system")]
    production_system: String,
}

pub struct ProfitabilityTool {
    ctx: ToolContext,
}

impl ProfitabilityTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for ProfitabilityTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: ProfitabilityArgs = parse_args(args)?;
        let system = ProductionSystem::parse(&args.production_system)?;
        let report = analyze_profitability(&args.crop, args.area_ha, system)?;
        self.ctx.publish("analyze_profitability", &report)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "analyze_profitability",
            "Rendement, recettes, coûts, marge et seuil de rentabilité d'une culture.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "area_ha": {"type": "number", "description": "Surface en hectares"},
                    "production_system": {
                        "type": "string",
                        "enum": ["traditionnel", "amélioré", "intensif"]
                    }
                }),
                &["crop", "area_ha"],
            ),
        )
    }
}

fn default_urgency() -> String {
    "normal".to_string()
}

#[derive(Debug, Deserialize)]
struct SalesArgs {
    crop: String,
    quantity_kg: f64,
    #[serde(default = "default_urgency")]
    urgency: String,
}

pub struct SalesStrategyTool {
    ctx: ToolContext,
}

impl SalesStrategyTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for SalesStrategyTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: SalesArgs = parse_args(args)?;
        let strategy = recommend_sales_strategy(&args.crop, args.quantity_kg, Urgency::parse(&args.urgency)?)?;
        self.ctx.publish("recommend_sales_strategy", &strategy)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "recommend_sales_strategy",
            "Compare les circuits de vente et recommande celui au meilleur revenu net.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "quantity_kg": {"type": "number"},
                    "urgency": {"type": "string", "enum": ["urgent", "normal", "patient"]}
                }),
                &["crop", "quantity_kg"],
            ),
        )
    }
}

fn default_input_level() -> String {
    "standard".to_string()
}

#[derive(Debug, Deserialize)]
struct CostArgs {
    crop: String,
    area_ha: f64,
    #[serde(default = "default_input_level")]
    input_level: String,
}

pub struct ProductionCostTool {
    ctx: ToolContext,
}

impl ProductionCostTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for ProductionCostTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: CostArgs = parse_args(args)?;
        let report = calculate_production_costs(&args.crop, args.area_ha, InputLevel::parse(&args.input_level)?)?;
        self.ctx.publish("calculate_production_costs", &report)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "calculate_production_costs",
            "Décompte détaillé des coûts de production par hectare et pour la surface.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "area_ha": {"type": "number"},
                    "input_level": {"type": "string", "enum": ["minimal", "standard", "intensif"]}
                }),
                &["crop", "area_ha"],
            ),
        )
    }
}

#[derive(Debug, Deserialize)]
struct OpportunityArgs {
    #[serde(default)]
    investment_budget: Option<f64>,
}

pub struct MarketOpportunityTool {
    ctx: ToolContext,
}

impl MarketOpportunityTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for MarketOpportunityTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: OpportunityArgs = parse_args(args)?;
        let ranked = rank_market_opportunities(args.investment_budget)?;
        self.ctx.publish("analyze_market_opportunities", &ranked)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "analyze_market_opportunities",
            "Meilleures opportunités de marché accessibles avec le budget d'investissement.",
            object_schema(
                json!({
                    "investment_budget": {"type": "number", "description": "Budget en FCFA, sans limite si absent"}
                }),
                &[],
            ),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RoiArgs {
    investment: f64,
    annual_return: f64,
    years: u32,
}

pub struct RoiTool {
    ctx: ToolContext,
}

impl RoiTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for RoiTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: RoiArgs = parse_args(args)?;
        let summary = calculate_roi(args.investment, args.annual_return, args.years)?;
        self.ctx.publish("calculate_roi", &summary)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "calculate_roi",
            "Retour sur investissement sur plusieurs années et délai de récupération.",
            object_schema(
                json!({
                    "investment": {"type": "number"},
                    "annual_return": {"type": "number"},
                    "years": {"type": "integer", "minimum": 0}
                }),
                &["investment", "annual_return", "years"],
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionState;
    use crate::error::AgroError;
    use crate::knowledge::Region;
    use approx::assert_relative_eq;

    fn context() -> ToolContext {
        ToolContext::new(SessionState::default(), Region::Centre)
    }

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_market_price_defaults_to_wholesale() {
        let ctx = context();
        let result = MarketPriceTool::new(ctx.clone())
            .run(&args(json!({"crop": "cacao", "month": 6})))
            .unwrap();

        assert_eq!(result["market_type"], "gros");
        assert_eq!(result["month"], 6);
        assert_eq!(result["currency"], "FCFA");
        assert!(ctx.session.get("get_market_prices").is_some());
    }

    #[test]
    fn test_market_price_uses_current_month() {
        let result = MarketPriceTool::new(context()).run(&args(json!({"crop": "maïs"}))).unwrap();
        let month = result["month"].as_u64().unwrap();
        assert!((1..=12).contains(&month));
    }

    #[test]
    fn test_market_price_rejects_bad_month() {
        let err = MarketPriceTool::new(context())
            .run(&args(json!({"crop": "maïs", "month": 13})))
            .unwrap_err();
        assert!(matches!(err, AgroError::Validation(_)));
    }

    #[test]
    fn test_production_costs_tool() {
        let result = ProductionCostTool::new(context())
            .run(&args(json!({"crop": "maïs", "area_ha": 2.0})))
            .unwrap();

        let per_hectare = result["per_hectare"].as_f64().unwrap();
        assert_relative_eq!(result["total"].as_f64().unwrap(), per_hectare * 2.0);
        assert_eq!(result["input_level"], "standard");
    }

    #[test]
    fn test_profitability_rejects_zero_area() {
        let err = ProfitabilityTool::new(context())
            .run(&args(json!({"crop": "maïs", "area_ha": 0.0})))
            .unwrap_err();
        assert!(matches!(err, AgroError::Validation(_)));
    }

    #[test]
    fn test_sales_strategy_tool() {
        let result = SalesStrategyTool::new(context())
            .run(&args(json!({"crop": "cacao", "quantity_kg": 500.0, "urgency": "urgent"})))
            .unwrap();
        assert_eq!(result["scenarios"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_opportunities_without_budget() {
        let result = MarketOpportunityTool::new(context()).run(&HashMap::new()).unwrap();
        assert!(!result.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_roi_tool() {
        let ctx = context();
        let result = RoiTool::new(ctx.clone())
            .run(&args(json!({"investment": 1000000.0, "annual_return": 250000.0, "years": 5})))
            .unwrap();

        assert_eq!(result["payback_years"], 4.0);
        assert_eq!(ctx.session.get("calculate_roi"), Some(result));
    }
}
