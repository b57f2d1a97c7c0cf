//! Plant health tools: disease and pest diagnosis, treatment and prevention.

use super::context::ToolContext;
use super::tool::{object_schema, parse_args, LlmTool, ToolDescriptor};
use crate::calculators::diagnosis::{diagnose_disease, diagnose_pest, DiagnosisQuery, PestQuery};
use crate::calculators::treatment::{plan_prevention, plan_treatment, FarmingSystem};
use crate::calculators::Budget;
use crate::error::Result;
use crate::knowledge::health::Severity;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

pub struct DiagnoseDiseaseTool {
    ctx: ToolContext,
}

impl DiagnoseDiseaseTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for DiagnoseDiseaseTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let query: DiagnosisQuery = parse_args(args)?;
        let report = diagnose_disease(&query);
        self.ctx.publish("diagnose_plant_disease", &report)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "diagnose_plant_disease",
            "Classe les maladies probables d'une culture à partir des symptômes observés.",
            object_schema(
                json!({
                    "crop": {"type": "string", "description": "Culture touchée, par ex. 'cacao'"},
                    "symptoms": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Symptômes observés"
                    },
                    "affected_parts": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Organes atteints (feuilles, cabosses, tiges...)"
                    },
                    "conditions": {"type": "string", "description": "Conditions météo et de terrain"}
                }),
                &["crop", "symptoms"],
            ),
        )
    }
}

pub struct IdentifyPestTool {
    ctx: ToolContext,
}

impl IdentifyPestTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for IdentifyPestTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let query: PestQuery = parse_args(args)?;
        let report = diagnose_pest(&query);
        self.ctx.publish("get_pest_identification", &report)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_pest_identification",
            "Identifie le ravageur le plus probable d'après sa description et les dégâts.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "description": {"type": "string", "description": "Aspect du ravageur"},
                    "damage": {"type": "string", "description": "Dégâts constatés"},
                    "location": {"type": "string", "description": "Où le ravageur est observé"}
                }),
                &["crop"],
            ),
        )
    }
}

fn default_severity() -> String {
    "modérée".to_string()
}

fn default_budget() -> String {
    "limité".to_string()
}

#[derive(Debug, Deserialize)]
struct TreatmentArgs {
    diagnosis: String,
    crop: String,
    #[serde(default = "default_severity")]
    severity: String,
    #[serde(default = "default_budget")]
    budget: String,
}

pub struct TreatmentTool {
    ctx: ToolContext,
}

impl TreatmentTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for TreatmentTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: TreatmentArgs = parse_args(args)?;
        let plan = plan_treatment(
            &args.diagnosis,
            &args.crop,
            Severity::parse(&args.severity)?,
            Budget::parse(&args.budget)?,
        );
        self.ctx.publish("get_treatment_recommendations", &plan)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_treatment_recommendations",
            "Plan de traitement (produits, calendrier, coût) pour une maladie diagnostiquée.",
            object_schema(
                json!({
                    "diagnosis": {"type": "string", "description": "Maladie ou ravageur diagnostiqué"},
                    "crop": {"type": "string"},
                    "severity": {
                        "type": "string",
                        "enum": ["faible", "modérée", "élevée", "très élevée", "critique"]
                    },
                    "budget": {"type": "string", "enum": ["limité", "modéré", "élevé"]}
                }),
                &["diagnosis", "crop"],
            ),
        )
    }
}

fn default_farming_system() -> String {
    "traditionnel".to_string()
}

#[derive(Debug, Deserialize)]
struct PreventionArgs {
    crop: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    threats: Vec<String>,
    #[serde(default = "default_farming_system")]
    farming_system: String,
}

pub struct PreventionTool {
    ctx: ToolContext,
}

impl PreventionTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for PreventionTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: PreventionArgs = parse_args(args)?;
        let region = self.ctx.region(args.region.as_deref());
        let plan = plan_prevention(
            &args.crop,
            Some(region),
            &args.threats,
            FarmingSystem::parse_or_intensive(&args.farming_system),
        );
        self.ctx.publish("get_prevention_strategies", &plan)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_prevention_strategies",
            "Stratégies de prévention adaptées au système de culture.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "region": {"type": "string"},
                    "threats": {"type": "array", "items": {"type": "string"}},
                    "farming_system": {
                        "type": "string",
                        "enum": ["traditionnel", "biologique", "intensif"]
                    }
                }),
                &["crop"],
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

    fn context() -> ToolContext {
        ToolContext::new(SessionState::default(), Region::Centre)
    }

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_diagnosis_tool_records_report() {
        let ctx = context();
        let tool = DiagnoseDiseaseTool::new(ctx.clone());

        let result = tool
            .run(&args(json!({
                "crop": "cacao",
                "symptoms": ["taches brunes sur cabosses"],
                "affected_parts": ["cabosses"]
            })))
            .unwrap();

        assert!(result["candidates"].is_array());
        assert_eq!(ctx.session.get("diagnose_plant_disease"), Some(result));
    }

    #[test]
    fn test_diagnosis_tool_rejects_missing_crop() {
        let tool = DiagnoseDiseaseTool::new(context());
        let err = tool.run(&args(json!({"symptoms": []}))).unwrap_err();
        assert!(matches!(err, AgroError::Tool(_)));
    }

    #[test]
    fn test_pest_tool() {
        let tool = IdentifyPestTool::new(context());
        let result = tool
            .run(&args(json!({"crop": "maïs", "damage": "trous dans les feuilles"})))
            .unwrap();
        assert!(result.is_object());
    }

    #[test]
    fn test_treatment_tool_uses_defaults() {
        let tool = TreatmentTool::new(context());
        let result = tool
            .run(&args(json!({"diagnosis": "Pourriture brune", "crop": "cacao"})))
            .unwrap();
        assert_eq!(result["severity"], "modérée");
    }

    #[test]
    fn test_treatment_tool_rejects_unknown_budget() {
        let tool = TreatmentTool::new(context());
        let err = tool
            .run(&args(json!({"diagnosis": "Pourriture brune", "crop": "cacao", "budget": "infini"})))
            .unwrap_err();
        assert!(matches!(err, AgroError::Validation(_)));
    }

    #[test]
    fn test_prevention_tool() {
        let ctx = context();
        let tool = PreventionTool::new(ctx.clone());
        tool.run(&args(json!({"crop": "cacao", "farming_system": "biologique"}))).unwrap();
        assert!(ctx.session.get("get_prevention_strategies").is_some());
    }

    #[test]
    fn test_descriptors() {
        let ctx = context();
        let tools: Vec<Box<dyn LlmTool>> = vec![
            Box::new(DiagnoseDiseaseTool::new(ctx.clone())) as Box<dyn LlmTool>,
            Box::new(IdentifyPestTool::new(ctx.clone())),
            Box::new(TreatmentTool::new(ctx.clone())),
            Box::new(PreventionTool::new(ctx)),
        ];
        for tool in &tools {
            let descriptor = tool.descriptor();
            assert_eq!(descriptor.r#type, "function");
            assert_eq!(descriptor.function.parameters["type"], "object");
        }
        assert!(tools[2].matches("get_treatment_recommendations"));
    }
}
