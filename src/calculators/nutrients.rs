//! Nutrient budgets from target yield, and practical fertilizer programmes.

use super::{require_non_negative, require_ph, require_positive, Budget};
use crate::error::Result;
use crate::knowledge::crops::{Crop, FertilizerNeed, NutrientUptake};
use crate::knowledge::inputs::{
    BaseCompost, MineralFertilizer, SoilFertility, ROCK_PHOSPHATE, TOP_UP_THRESHOLD_KG, UREA,
};
use crate::units::GRAMS_PER_KG;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Nutrient {
    N,
    P,
    K,
    Ca,
    Mg,
    S,
}

impl Nutrient {
    pub const ALL: [Nutrient; 6] = [
        Nutrient::N,
        Nutrient::P,
        Nutrient::K,
        Nutrient::Ca,
        Nutrient::Mg,
        Nutrient::S,
    ];

    /// Share of the applied element the crop actually takes up.
    pub fn fertilizer_efficiency(&self) -> f64 {
        match self {
            Nutrient::N => 0.6,
            Nutrient::P => 0.2,
            Nutrient::K => 0.8,
            Nutrient::Ca => 0.7,
            Nutrient::Mg => 0.6,
            Nutrient::S => 0.5,
        }
    }

    fn uptake(&self, table: &NutrientUptake) -> f64 {
        match self {
            Nutrient::N => table.n,
            Nutrient::P => table.p,
            Nutrient::K => table.k,
            Nutrient::Ca => table.ca,
            Nutrient::Mg => table.mg,
            Nutrient::S => table.s,
        }
    }

    /// How the seasonal dose is split across application stages.
    pub fn split(&self) -> &'static [(Stage, f64)] {
        match self {
            Nutrient::N => &[(Stage::Basal, 0.3), (Stage::SideDress1, 0.4), (Stage::SideDress2, 0.3)],
            Nutrient::K => &[(Stage::Basal, 0.5), (Stage::SideDress1, 0.3), (Stage::SideDress2, 0.2)],
            _ => &[(Stage::Basal, 1.0)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// At planting.
    Basal,
    SideDress1,
    SideDress2,
}

/// Laboratory soil test. Levels in ppm.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SoilAnalysis {
    pub ph: Option<f64>,
    pub organic_matter: Option<f64>,
    #[serde(alias = "available_P")]
    pub available_p: Option<f64>,
    #[serde(alias = "exchangeable_K")]
    pub exchangeable_k: Option<f64>,
    #[serde(alias = "exchangeable_Ca")]
    pub exchangeable_ca: Option<f64>,
    #[serde(alias = "exchangeable_Mg")]
    pub exchangeable_mg: Option<f64>,
}

impl SoilAnalysis {
    /// Measured level and its critical threshold for the nutrients a soil test corrects.
    fn level(&self, nutrient: Nutrient) -> Option<(f64, f64)> {
        match nutrient {
            Nutrient::P => self.available_p.map(|v| (v, 15.0)),
            Nutrient::K => self.exchangeable_k.map(|v| (v, 120.0)),
            Nutrient::Ca => self.exchangeable_ca.map(|v| (v, 2000.0)),
            Nutrient::Mg => self.exchangeable_mg.map(|v| (v, 240.0)),
            Nutrient::N | Nutrient::S => None,
        }
    }

    fn validate(&self) -> Result<()> {
        let levels = [
            ("available_p", self.available_p),
            ("exchangeable_k", self.exchangeable_k),
            ("exchangeable_ca", self.exchangeable_ca),
            ("exchangeable_mg", self.exchangeable_mg),
            ("organic_matter", self.organic_matter),
        ];
        for (field, value) in levels {
            if let Some(value) = value {
                require_non_negative(field, value)?;
            }
        }
        if let Some(ph) = self.ph {
            require_ph("ph", ph)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientRequirement {
    pub nutrient: Nutrient,
    /// Removed by the harvest, kg/ha.
    pub uptake_kg: f64,
    /// To apply, after fertilizer efficiency and any soil correction, kg/ha.
    pub fertilizer_kg: f64,
    /// Set when a soil test below its critical level raised the dose.
    pub soil_correction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledApplication {
    pub stage: Stage,
    pub nutrient: Nutrient,
    pub fraction: f64,
    pub kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientPlan {
    pub crop: Crop,
    pub target_yield_kg_ha: f64,
    pub soil_analysis: Option<SoilAnalysis>,
    pub requirements: Vec<NutrientRequirement>,
    pub schedule: Vec<ScheduledApplication>,
}

impl NutrientPlan {
    /// Total scheduled for a nutrient across all stages.
    pub fn total(&self, nutrient: Nutrient) -> f64 {
        self.schedule.iter().filter(|a| a.nutrient == nutrient).map(|a| a.kg).sum()
    }
}

/// Fertilizer budget for `target_yield` kg/ha. Crops without an uptake table use maïs.
pub fn calculate_nutrient_needs(
    crop: &str,
    target_yield: f64,
    soil: Option<&SoilAnalysis>,
) -> Result<NutrientPlan> {
    let target_yield = require_non_negative("target_yield", target_yield)?;
    if let Some(soil) = soil {
        soil.validate()?;
    }
    let crop = Crop::resolve(crop);
    let uptake_table = crop.profile_or_default().uptake;

    let requirements: Vec<NutrientRequirement> = Nutrient::ALL
        .into_iter()
        .map(|nutrient| {
            let uptake_kg = target_yield * nutrient.uptake(&uptake_table) / GRAMS_PER_KG;
            let base = uptake_kg / nutrient.fertilizer_efficiency();
            let soil_correction = soil
                .and_then(|s| s.level(nutrient))
                .filter(|(current, critical)| current < critical)
                .map(|(current, critical)| base * (1.0 + (critical - current) / critical));
            NutrientRequirement {
                nutrient,
                uptake_kg,
                fertilizer_kg: soil_correction.unwrap_or(base),
                soil_correction,
            }
        })
        .collect();

    let schedule = requirements
        .iter()
        .flat_map(|req| {
            req.nutrient.split().iter().map(move |&(stage, fraction)| ScheduledApplication {
                stage,
                nutrient: req.nutrient,
                fraction,
                kg: req.fertilizer_kg * fraction,
            })
        })
        .collect();

    Ok(NutrientPlan {
        crop,
        target_yield_kg_ha: target_yield,
        soil_analysis: soil.cloned(),
        requirements,
        schedule,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertilizerApplication {
    pub product: &'static str,
    /// Tonnes for compost, kilograms for mineral products.
    pub quantity_per_ha: f64,
    pub total_quantity: f64,
    pub unit_cost: f64,
    pub cost: f64,
    pub timing: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertilizerProgramme {
    pub crop: Crop,
    pub area_ha: f64,
    pub soil_fertility: SoilFertility,
    pub budget: Budget,
    /// Upper share of mineral fertilizer the budget allows, percent.
    pub max_chemical_percent: f64,
    pub adjusted_needs: FertilizerNeed,
    pub applications: Vec<FertilizerApplication>,
    pub total_cost: f64,
    pub cost_per_hectare: f64,
    pub calendar: &'static [(&'static str, &'static [&'static str])],
}

static APPLICATION_CALENDAR: [(&str, &[&str]); 4] = [
    ("avant_plantation", &["compost", "phosphate"]),
    ("plantation", &["engrais starter"]),
    ("45_jours", &["urée fraction 1"]),
    ("90_jours", &["urée fraction 2", "potasse"]),
];

fn mineral_top_up(fertilizer: &'static MineralFertilizer, residual_kg: f64, area_ha: f64) -> FertilizerApplication {
    let quantity_per_ha = residual_kg / fertilizer.grade;
    let total_quantity = quantity_per_ha * area_ha;
    FertilizerApplication {
        product: fertilizer.name,
        quantity_per_ha,
        total_quantity,
        unit_cost: fertilizer.price_per_kg,
        cost: total_quantity * fertilizer.price_per_kg,
        timing: fertilizer.timing,
    }
}

/// Compost base dressing plus urea and rock phosphate where the residual need
/// stays above the top-up threshold.
pub fn recommend_fertilizers(
    crop: &str,
    area_ha: f64,
    soil_fertility: SoilFertility,
    budget: Budget,
) -> Result<FertilizerProgramme> {
    let area_ha = require_positive("area_ha", area_ha)?;
    let crop = Crop::resolve(crop);
    let base = crop.profile_or_default().fertilizer_need;
    let factor = soil_fertility.need_factor();
    let adjusted_needs = FertilizerNeed {
        n: base.n * factor,
        p2o5: base.p2o5 * factor,
        k2o: base.k2o * factor,
        ca: base.ca * factor,
        mg: base.mg * factor,
    };

    let compost_tonnes = BaseCompost::TONNES_PER_HA * area_ha;
    let mut applications = vec![FertilizerApplication {
        product: "compost",
        quantity_per_ha: BaseCompost::TONNES_PER_HA,
        total_quantity: compost_tonnes,
        unit_cost: BaseCompost::PRICE_PER_TONNE,
        cost: compost_tonnes * BaseCompost::PRICE_PER_TONNE,
        timing: "avant plantation",
    }];

    let (n_supply, p_supply, _) = BaseCompost::SUPPLY;
    let residual_n = (adjusted_needs.n - n_supply).max(0.0);
    let residual_p = (adjusted_needs.p2o5 - p_supply).max(0.0);
    if residual_n > TOP_UP_THRESHOLD_KG {
        applications.push(mineral_top_up(&UREA, residual_n, area_ha));
    }
    if residual_p > TOP_UP_THRESHOLD_KG {
        applications.push(mineral_top_up(&ROCK_PHOSPHATE, residual_p, area_ha));
    }

    let total_cost: f64 = applications.iter().map(|a| a.cost).sum();
    let max_chemical_percent = match budget {
        Budget::Limite => 20.0,
        Budget::Modere => 50.0,
        Budget::Eleve => 80.0,
    };

    Ok(FertilizerProgramme {
        crop,
        area_ha,
        soil_fertility,
        budget,
        max_chemical_percent,
        adjusted_needs,
        applications,
        total_cost,
        cost_per_hectare: total_cost / area_ha,
        calendar: &APPLICATION_CALENDAR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_maize_needs_without_soil_test() {
        let plan = calculate_nutrient_needs("maïs", 5000.0, None).unwrap();
        let n = &plan.requirements[0];
        assert_eq!(n.nutrient, Nutrient::N);
        assert_relative_eq!(n.uptake_kg, 75.0);
        assert_relative_eq!(n.fertilizer_kg, 125.0, epsilon = 1e-9);
        assert!(n.soil_correction.is_none());
        assert_relative_eq!(plan.total(Nutrient::N), 125.0, epsilon = 1e-9);
    }

    #[test]
    fn test_schedule_fractions_sum_to_one() {
        for crop in ["cacao", "café", "manioc", "maïs", "plantain", "arachide"] {
            let plan = calculate_nutrient_needs(crop, 1200.0, None).unwrap();
            for nutrient in Nutrient::ALL {
                let fractions: f64 = plan
                    .schedule
                    .iter()
                    .filter(|a| a.nutrient == nutrient)
                    .map(|a| a.fraction)
                    .sum();
                assert!((fractions - 1.0).abs() < 1e-6, "{crop} {nutrient:?}");
            }
        }
    }

    #[test]
    fn test_every_split_starts_at_planting() {
        for nutrient in Nutrient::ALL {
            let stages: Vec<Stage> = nutrient.split().iter().map(|(stage, _)| *stage).collect();
            assert_eq!(stages[0], Stage::Basal);
            let expected: &[Stage] = match nutrient {
                Nutrient::N | Nutrient::K => &[Stage::Basal, Stage::SideDress1, Stage::SideDress2],
                _ => &[Stage::Basal],
            };
            assert_eq!(stages, expected);
        }
    }

    #[test]
    fn test_requirements_non_negative() {
        for target in [0.0, 1.0, 800.0, 30000.0] {
            let plan = calculate_nutrient_needs("plantain", target, None).unwrap();
            assert!(plan.requirements.iter().all(|r| r.uptake_kg >= 0.0 && r.fertilizer_kg >= 0.0));
        }
    }

    #[test]
    fn test_low_phosphorus_raises_dose() {
        let soil = SoilAnalysis {
            available_p: Some(7.5),
            exchangeable_k: Some(200.0),
            ..Default::default()
        };
        let plan = calculate_nutrient_needs("maïs", 5000.0, Some(&soil)).unwrap();
        let p = plan.requirements.iter().find(|r| r.nutrient == Nutrient::P).unwrap();
        // 15 kg uptake / 0.2 = 75, deficit ratio 0.5
        assert_relative_eq!(p.fertilizer_kg, 112.5, epsilon = 1e-9);
        let k = plan.requirements.iter().find(|r| r.nutrient == Nutrient::K).unwrap();
        assert!(k.soil_correction.is_none());
    }

    #[test]
    fn test_magnesium_and_calcium_corrections() {
        let soil = SoilAnalysis {
            exchangeable_ca: Some(1000.0),
            exchangeable_mg: Some(0.0),
            ..Default::default()
        };
        let plan = calculate_nutrient_needs("cacao", 1000.0, Some(&soil)).unwrap();
        let ca = plan.requirements.iter().find(|r| r.nutrient == Nutrient::Ca).unwrap();
        let mg = plan.requirements.iter().find(|r| r.nutrient == Nutrient::Mg).unwrap();
        assert_relative_eq!(ca.fertilizer_kg, 8.0 / 0.7 * 1.5, epsilon = 1e-9);
        assert_relative_eq!(mg.fertilizer_kg, 4.0 / 0.6 * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_crop_uses_maize_table() {
        let plan = calculate_nutrient_needs("quinoa", 1000.0, None).unwrap();
        assert_eq!(plan.crop, Crop::Mais);
    }

    #[test]
    fn test_negative_yield_is_rejected() {
        assert!(calculate_nutrient_needs("maïs", -1.0, None).is_err());
        assert!(calculate_nutrient_needs("maïs", f64::INFINITY, None).is_err());
    }

    #[test]
    fn test_negative_soil_level_is_rejected() {
        let soil = SoilAnalysis {
            available_p: Some(-2.0),
            ..Default::default()
        };
        assert!(calculate_nutrient_needs("maïs", 1000.0, Some(&soil)).is_err());
    }

    #[test]
    fn test_soil_analysis_accepts_lab_field_names() {
        let soil: SoilAnalysis =
            serde_json::from_value(serde_json::json!({"available_P": 10.0, "exchangeable_K": 90.0}))
                .unwrap();
        assert_eq!(soil.available_p, Some(10.0));
        assert_eq!(soil.exchangeable_k, Some(90.0));
    }

    #[test]
    fn test_maize_fertilizer_programme() {
        let programme =
            recommend_fertilizers("maïs", 2.0, SoilFertility::Moyenne, Budget::Modere).unwrap();
        let products: Vec<_> = programme.applications.iter().map(|a| a.product).collect();
        assert_eq!(products, vec!["compost", "urée (46% N)", "phosphate naturel"]);

        let urea = &programme.applications[1];
        assert_relative_eq!(urea.quantity_per_ha, 125.0 / 0.46, epsilon = 1e-9);
        let expected = 100_000.0 + (125.0 / 0.46 * 2.0 * 450.0) + (30.0 / 0.28 * 2.0 * 300.0);
        assert_relative_eq!(programme.total_cost, expected, epsilon = 1e-6);
        assert_relative_eq!(programme.cost_per_hectare, expected / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rich_soil_needs_compost_only() {
        let programme =
            recommend_fertilizers("arachide", 1.0, SoilFertility::Elevee, Budget::Limite).unwrap();
        assert_eq!(programme.applications.len(), 1);
        assert_eq!(programme.total_cost, 50_000.0);
        assert_eq!(programme.max_chemical_percent, 20.0);
    }
}
