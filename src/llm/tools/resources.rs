//! Soil, fertilizer, water and land tools.

use super::context::ToolContext;
use super::tool::{object_schema, parse_args, LlmTool, ToolDescriptor};
use crate::calculators::nutrients::{calculate_nutrient_needs, recommend_fertilizers, SoilAnalysis};
use crate::calculators::soil::{analyze_soil_requirements, suggest_soil_amendments};
use crate::calculators::suitability::{assess_land_suitability, TerrainRecord};
use crate::calculators::water::optimize_irrigation;
use crate::calculators::Budget;
use crate::error::Result;
use crate::knowledge::inputs::SoilFertility;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct SoilRequirementArgs {
    crop: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    soil_type: Option<String>,
    #[serde(default)]
    current_ph: Option<f64>,
}

pub struct SoilRequirementTool {
    ctx: ToolContext,
}

impl SoilRequirementTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for SoilRequirementTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: SoilRequirementArgs = parse_args(args)?;
        let region = self.ctx.region(args.region.as_deref());
        let report = analyze_soil_requirements(&args.crop, region, args.soil_type.as_deref(), args.current_ph)?;
        self.ctx.publish("analyze_soil_requirements", &report)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "analyze_soil_requirements",
            "Compare les exigences de sol d'une culture avec le sol de la région et chiffre les corrections.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "region": {"type": "string"},
                    "soil_type": {"type": "string"},
                    "current_ph": {"type": "number", "minimum": 0, "maximum": 14}
                }),
                &["crop"],
            ),
        )
    }
}

fn default_soil_fertility() -> String {
    "moyenne".to_string()
}

fn default_fertilizer_budget() -> String {
    "modéré".to_string()
}

#[derive(Debug, Deserialize)]
struct FertilizerArgs {
    crop: String,
    area_ha: f64,
    #[serde(default = "default_soil_fertility")]
    soil_fertility: String,
    #[serde(default = "default_fertilizer_budget")]
    budget: String,
}

pub struct FertilizerTool {
    ctx: ToolContext,
}

impl FertilizerTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for FertilizerTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: FertilizerArgs = parse_args(args)?;
        let programme = recommend_fertilizers(
            &args.crop,
            args.area_ha,
            SoilFertility::parse(&args.soil_fertility)?,
            Budget::parse(&args.budget)?,
        )?;
        self.ctx.publish("recommend_fertilizers", &programme)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "recommend_fertilizers",
            "Programme de fertilisation (compost, urée, phosphate) avec doses et coûts.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "area_ha": {"type": "number"},
                    "soil_fertility": {"type": "string", "enum": ["faible", "moyenne", "bonne", "élevée"]},
                    "budget": {"type": "string", "enum": ["limité", "modéré", "élevé"]}
                }),
                &["crop", "area_ha"],
            ),
        )
    }
}

fn default_water_source() -> String {
    "pluie".to_string()
}

#[derive(Debug, Deserialize)]
struct IrrigationArgs {
    crop: String,
    area_ha: f64,
    #[serde(default)]
    region: Option<String>,
    #[serde(default = "default_water_source")]
    water_source: String,
}

pub struct IrrigationTool {
    ctx: ToolContext,
}

impl IrrigationTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for IrrigationTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: IrrigationArgs = parse_args(args)?;
        let region = self.ctx.region(args.region.as_deref());
        let plan = optimize_irrigation(&args.crop, region, args.area_ha, &args.water_source)?;
        self.ctx.publish("optimize_irrigation", &plan)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "optimize_irrigation",
            "Bilan hydrique, système d'irrigation conseillé, coût et calendrier d'arrosage.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "area_ha": {"type": "number"},
                    "region": {"type": "string"},
                    "water_source": {"type": "string", "description": "pluie, puits, rivière, forage..."}
                }),
                &["crop", "area_ha"],
            ),
        )
    }
}

#[derive(Debug, Deserialize)]
struct SuitabilityArgs {
    crop: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    terrain: TerrainRecord,
}

pub struct LandSuitabilityTool {
    ctx: ToolContext,
}

impl LandSuitabilityTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for LandSuitabilityTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: SuitabilityArgs = parse_args(args)?;
        // the terrain is scored on its own when no region is named
        let region = args.region.as_deref().map(|name| self.ctx.region(Some(name)));
        let report = assess_land_suitability(&args.crop, region, &args.terrain)?;
        self.ctx.publish("assess_land_suitability", &report)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "assess_land_suitability",
            "Note l'aptitude d'un terrain (altitude, pente, drainage, exposition, pH) pour une culture.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "region": {"type": "string"},
                    "terrain": {
                        "type": "object",
                        "properties": {
                            "altitude": {"type": "number", "description": "Mètres"},
                            "pente": {"type": "number", "description": "Pente en %"},
                            "drainage": {"type": "string"},
                            "exposition": {"type": "string"},
                            "ph": {"type": "number"}
                        }
                    }
                }),
                &["crop", "terrain"],
            ),
        )
    }
}

#[derive(Debug, Deserialize)]
struct NutrientArgs {
    crop: String,
    target_yield: f64,
    #[serde(default)]
    soil_analysis: Option<SoilAnalysis>,
}

pub struct NutrientNeedsTool {
    ctx: ToolContext,
}

impl NutrientNeedsTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for NutrientNeedsTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: NutrientArgs = parse_args(args)?;
        let plan = calculate_nutrient_needs(&args.crop, args.target_yield, args.soil_analysis.as_ref())?;
        self.ctx.publish("calculate_nutrient_needs", &plan)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "calculate_nutrient_needs",
            "Besoins en N, P, K, Ca, Mg et S pour un rendement visé, avec fractionnement.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "target_yield": {"type": "number", "description": "Rendement visé en kg/ha"},
                    "soil_analysis": {
                        "type": "object",
                        "properties": {
                            "ph": {"type": "number"},
                            "organic_matter": {"type": "number"},
                            "available_p": {"type": "number"},
                            "exchangeable_k": {"type": "number"},
                            "exchangeable_ca": {"type": "number"},
                            "exchangeable_mg": {"type": "number"}
                        }
                    }
                }),
                &["crop", "target_yield"],
            ),
        )
    }
}

#[derive(Debug, Deserialize)]
struct AmendmentArgs {
    ph: f64,
    organic_matter: f64,
    #[serde(default)]
    constraints: Vec<String>,
    #[serde(default)]
    budget: Option<f64>,
}

pub struct SoilAmendmentTool {
    ctx: ToolContext,
}

impl SoilAmendmentTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for SoilAmendmentTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: AmendmentArgs = parse_args(args)?;
        let plan = suggest_soil_amendments(args.ph, args.organic_matter, &args.constraints, args.budget)?;
        self.ctx.publish("suggest_soil_amendments", &plan)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "suggest_soil_amendments",
            "Amendements (chaux, compost...) pour corriger pH et matière organique sur un hectare.",
            object_schema(
                json!({
                    "ph": {"type": "number"},
                    "organic_matter": {"type": "number", "description": "Matière organique en %"},
                    "constraints": {"type": "array", "items": {"type": "string"}},
                    "budget": {"type": "number", "description": "Budget en FCFA"}
                }),
                &["ph", "organic_matter"],
            ),
        )
    }
}
