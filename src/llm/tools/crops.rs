//! Crop catalogue and calendar tools.

use super::context::ToolContext;
use super::tool::{object_schema, parse_args, LlmTool, ToolDescriptor};
use crate::error::{AgroError, Result};
use crate::knowledge::crops::profiled_crops;
use crate::knowledge::seasons::crop_calendar;
use crate::knowledge::{Crop, Region};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct CropArgs {
    crop: String,
}

pub struct CropProfileTool {
    ctx: ToolContext,
}

impl CropProfileTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for CropProfileTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: CropArgs = parse_args(args)?;
        let profile = Crop::resolve(&args.crop).profile_or_default();
        self.ctx.publish("get_crop_profile", profile)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_crop_profile",
            "Fiche agronomique d'une culture: cycle, températures, sols, régions, rendement, besoins.",
            object_schema(json!({"crop": {"type": "string"}}), &["crop"]),
        )
    }
}

#[derive(Debug, Deserialize)]
struct CalendarArgs {
    crop: String,
    #[serde(default)]
    region: Option<String>,
    /// ISO date; today when absent.
    #[serde(default)]
    planting_date: Option<String>,
}

pub struct PlantingCalendarTool {
    ctx: ToolContext,
}

impl PlantingCalendarTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for PlantingCalendarTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: CalendarArgs = parse_args(args)?;
        let planting = match args.planting_date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| AgroError::invalid("planting_date", format!("'{raw}': {e}")))?,
            None => self.ctx.today(),
        };
        let region = self.ctx.region(args.region.as_deref());
        let calendar = crop_calendar(Crop::resolve(&args.crop), region, planting);
        self.ctx.publish("get_planting_calendar", &calendar)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_planting_calendar",
            "Fenêtres de semis de la région et date de récolte attendue pour une plantation.",
            object_schema(
                json!({
                    "crop": {"type": "string"},
                    "region": {"type": "string"},
                    "planting_date": {"type": "string", "description": "Date de semis AAAA-MM-JJ"}
                }),
                &["crop"],
            ),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct RegionalCrops {
    region: Region,
    /// Crops with a profile that lists the region.
    recommended: Vec<Crop>,
    main_crops: &'static [&'static str],
    soil_types: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct RegionArgs {
    #[serde(default)]
    region: Option<String>,
}

pub struct RegionalCropsTool {
    ctx: ToolContext,
}

impl RegionalCropsTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl LlmTool for RegionalCropsTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let args: RegionArgs = parse_args(args)?;
        let region = self.ctx.region(args.region.as_deref());
        let profile = region.profile();
        let result = RegionalCrops {
            region,
            recommended: profiled_crops()
                .filter(|crop| crop.profile_or_default().suitable_regions.contains(&region))
                .collect(),
            main_crops: profile.main_crops,
            soil_types: profile.soil_types,
        };
        self.ctx.publish("get_regional_crops", &result)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_regional_crops",
            "Cultures adaptées à une région et types de sols dominants.",
            object_schema(json!({"region": {"type": "string"}}), &[]),
        )
    }
}
