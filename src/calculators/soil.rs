//! Soil fit for a crop and amendment programmes.

use super::{require_non_negative, require_ph};
use crate::error::Result;
use crate::knowledge::crops::{Crop, SoilRequirement};
use crate::knowledge::inputs::{
    Amendment, AmendmentPurpose, COMPOST, COMPOST_PRICE_PER_TONNE, DOLOMITE, GYPSUM, LIME,
    LIME_PRICE_PER_TONNE,
};
use crate::knowledge::{normalize_key, Region, SoilProfile};
use serde::Serialize;

/// Tonnes of lime per hectare for each pH unit to correct.
const LIME_T_PER_PH_UNIT: f64 = 2.0;
/// Tonnes of compost per hectare for each point of organic matter to gain.
const COMPOST_T_PER_OM_POINT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhStatus {
    #[serde(rename = "optimal")]
    Optimal,
    #[serde(rename = "trop acide")]
    TooAcidic,
    #[serde(rename = "trop alcalin")]
    TooAlkaline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilImprovement {
    pub action: &'static str,
    pub tonnes_per_ha: f64,
    pub cost: f64,
    pub priority: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilRequirementReport {
    pub crop: Crop,
    pub region: Region,
    pub soil_type: String,
    pub requirements: &'static SoilRequirement,
    pub regional_soil: &'static SoilProfile,
    /// Measured pH, or the regional average when none was given.
    pub ph: f64,
    pub ph_status: PhStatus,
    pub improvements: Vec<SoilImprovement>,
    pub total_improvement_cost: f64,
    pub overall_suitability: &'static str,
}

/// Compare a crop's soil needs with the regional soil survey.
pub fn analyze_soil_requirements(
    crop: &str,
    region: Region,
    soil_type: Option<&str>,
    current_ph: Option<f64>,
) -> Result<SoilRequirementReport> {
    if let Some(ph) = current_ph {
        require_ph("current_ph", ph)?;
    }
    let crop = Crop::resolve(crop);
    let requirements = &crop.profile_or_default().soil;
    let regional_soil = region.soil_or_default();

    let ph = current_ph.unwrap_or(regional_soil.average_ph);
    let optimal = requirements.optimal_ph;
    let ph_status = if optimal.contains(ph) {
        PhStatus::Optimal
    } else if ph < optimal.min {
        PhStatus::TooAcidic
    } else {
        PhStatus::TooAlkaline
    };

    let mut improvements = Vec::new();
    if ph_status == PhStatus::TooAcidic {
        let tonnes = (optimal.min - ph) * LIME_T_PER_PH_UNIT;
        improvements.push(SoilImprovement {
            action: "Chaulage",
            tonnes_per_ha: tonnes,
            cost: tonnes * LIME_PRICE_PER_TONNE,
            priority: "élevée",
        });
    }
    if regional_soil.organic_matter_percent < requirements.organic_matter_min {
        let tonnes = (requirements.organic_matter_optimal - regional_soil.organic_matter_percent)
            * COMPOST_T_PER_OM_POINT;
        improvements.push(SoilImprovement {
            action: "Apport matière organique",
            tonnes_per_ha: tonnes,
            cost: tonnes * COMPOST_PRICE_PER_TONNE,
            priority: "élevée",
        });
    }

    let total_improvement_cost = improvements.iter().map(|i| i.cost).sum();
    let overall_suitability = if improvements.is_empty() { "bonne" } else { "moyenne" };

    Ok(SoilRequirementReport {
        crop,
        region,
        soil_type: soil_type.unwrap_or(regional_soil.dominant_type).to_string(),
        requirements,
        regional_soil,
        ph,
        ph_status,
        improvements,
        total_improvement_cost,
        overall_suitability,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmendmentRecommendation {
    pub amendment: &'static Amendment,
    pub tonnes_per_ha: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationWindow {
    #[serde(rename = "début_saison_sèche")]
    DebutSaisonSeche,
    AvantPlantation,
    EntretienAnnuel,
}

impl From<AmendmentPurpose> for ApplicationWindow {
    fn from(purpose: AmendmentPurpose) -> Self {
        match purpose {
            AmendmentPurpose::AcidityCorrection => ApplicationWindow::DebutSaisonSeche,
            AmendmentPurpose::OrganicMatter => ApplicationWindow::AvantPlantation,
            AmendmentPurpose::Structure => ApplicationWindow::EntretienAnnuel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmendmentPlan {
    pub ph: f64,
    pub organic_matter: f64,
    pub constraints: Vec<String>,
    pub budget: Option<f64>,
    pub amendments: Vec<AmendmentRecommendation>,
    pub total_cost: f64,
    pub schedule: Vec<(ApplicationWindow, &'static str)>,
    pub ph_target: f64,
    pub organic_matter_target: f64,
}

fn has_constraint(constraints: &[String], wanted: &str) -> bool {
    let wanted = normalize_key(wanted);
    constraints.iter().any(|c| normalize_key(c) == wanted)
}

fn recommendation(amendment: &'static Amendment, tonnes_per_ha: f64) -> AmendmentRecommendation {
    AmendmentRecommendation {
        amendment,
        tonnes_per_ha,
        cost: tonnes_per_ha * amendment.price_per_tonne,
    }
}

/// Amendments for one hectare.
///
/// When the programme exceeds `budget`, amendments are kept cheapest first
/// while they still fit.
pub fn suggest_soil_amendments(
    ph: f64,
    organic_matter: f64,
    constraints: &[String],
    budget: Option<f64>,
) -> Result<AmendmentPlan> {
    require_ph("ph", ph)?;
    require_non_negative("organic_matter", organic_matter)?;
    if let Some(budget) = budget {
        require_non_negative("budget", budget)?;
    }

    let mut amendments = Vec::new();
    if ph < 5.5 {
        let lime_needed = (6.0 - ph) * LIME_T_PER_PH_UNIT;
        if has_constraint(constraints, "carence magnésium") {
            amendments.push(recommendation(&DOLOMITE, lime_needed.min(3.0)));
        } else {
            amendments.push(recommendation(&LIME, lime_needed.min(4.0)));
        }
    }
    if organic_matter < 3.0 {
        let compost_needed = (3.0 - organic_matter) * 10.0;
        amendments.push(recommendation(&COMPOST, compost_needed.min(20.0)));
    }
    if has_constraint(constraints, "compaction") {
        amendments.push(recommendation(&GYPSUM, 3.0));
    }

    let mut total_cost: f64 = amendments.iter().map(|a| a.cost).sum();
    if let Some(budget) = budget.filter(|b| total_cost > *b) {
        amendments.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        let mut running = 0.0;
        amendments.retain(|a| {
            if running + a.cost <= budget {
                running += a.cost;
                true
            } else {
                false
            }
        });
        total_cost = running;
    }

    let schedule = amendments
        .iter()
        .map(|a| (ApplicationWindow::from(a.amendment.purpose), a.amendment.name))
        .collect();

    Ok(AmendmentPlan {
        ph,
        organic_matter,
        constraints: constraints.to_vec(),
        budget,
        amendments,
        total_cost,
        schedule,
        ph_target: if ph < 6.0 { (ph + 1.0).min(6.5) } else { ph },
        organic_matter_target: (organic_matter + 1.0).min(4.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cacao_in_centre_needs_lime_and_compost() {
        let report = analyze_soil_requirements("cacao", Region::Centre, None, None).unwrap();
        assert_eq!(report.ph, 4.8);
        assert_eq!(report.ph_status, PhStatus::TooAcidic);
        assert_eq!(report.soil_type, "ferrallitique");
        assert_eq!(report.improvements.len(), 2);
        // (6.0 - 4.8) * 2 t of lime, (5.0 - 2.5) * 20 t of compost
        assert_relative_eq!(report.improvements[0].tonnes_per_ha, 2.4, epsilon = 1e-9);
        assert_relative_eq!(report.improvements[1].tonnes_per_ha, 50.0, epsilon = 1e-9);
        assert_relative_eq!(report.total_improvement_cost, 120_000.0 + 500_000.0, epsilon = 1e-6);
        assert_eq!(report.overall_suitability, "moyenne");
    }

    #[test]
    fn test_measured_ph_overrides_regional_average() {
        let report =
            analyze_soil_requirements("café", Region::Ouest, Some("andosol"), Some(6.5)).unwrap();
        assert_eq!(report.ph_status, PhStatus::Optimal);
        assert_eq!(report.soil_type, "andosol");
        assert_eq!(report.overall_suitability, "bonne");
    }

    #[test]
    fn test_alkaline_soil_is_flagged() {
        let report = analyze_soil_requirements("maïs", Region::Nord, None, Some(7.8)).unwrap();
        assert_eq!(report.ph_status, PhStatus::TooAlkaline);
        assert!(report.improvements.iter().all(|i| i.action != "Chaulage"));
    }

    #[test]
    fn test_unsurveyed_region_uses_centre_soil() {
        let report = analyze_soil_requirements("manioc", Region::Est, None, None).unwrap();
        assert_eq!(report.regional_soil.dominant_type, "ferrallitique");
    }

    #[test]
    fn test_invalid_ph_is_rejected() {
        assert!(analyze_soil_requirements("maïs", Region::Centre, None, Some(-1.0)).is_err());
        assert!(suggest_soil_amendments(15.0, 2.0, &[], None).is_err());
    }

    #[test]
    fn test_acid_poor_soil_programme() {
        let plan = suggest_soil_amendments(4.5, 1.5, &[], None).unwrap();
        let names: Vec<_> = plan.amendments.iter().map(|a| a.amendment.name).collect();
        assert_eq!(names, vec!["chaux_agricole", "compost"]);
        assert_relative_eq!(plan.amendments[0].tonnes_per_ha, 3.0, epsilon = 1e-9);
        assert_relative_eq!(plan.total_cost, 150_000.0 + 150_000.0, epsilon = 1e-6);
        assert_eq!(plan.schedule[0].0, ApplicationWindow::DebutSaisonSeche);
        assert_eq!(plan.schedule[1].0, ApplicationWindow::AvantPlantation);
        assert_eq!(plan.ph_target, 5.5);
    }

    #[test]
    fn test_magnesium_deficiency_switches_to_dolomite() {
        let constraints = vec!["Carence magnesium".to_string()];
        let plan = suggest_soil_amendments(4.0, 3.5, &constraints, None).unwrap();
        assert_eq!(plan.amendments.len(), 1);
        assert_eq!(plan.amendments[0].amendment.name, "dolomie");
        assert_eq!(plan.amendments[0].tonnes_per_ha, 3.0);
        assert_eq!(plan.schedule[0].0, ApplicationWindow::DebutSaisonSeche);
    }

    #[test]
    fn test_budget_keeps_cheapest_first() {
        let constraints = vec!["compaction".to_string()];
        // lime 4 t = 200 000, compost 20 t = 200 000, gypsum 3 t = 90 000
        let plan = suggest_soil_amendments(3.5, 0.5, &constraints, Some(250_000.0)).unwrap();
        let names: Vec<_> = plan.amendments.iter().map(|a| a.amendment.name).collect();
        assert_eq!(names, vec!["gypse"]);
        assert_eq!(plan.total_cost, 90_000.0);
    }

    #[test]
    fn test_healthy_soil_needs_nothing() {
        let plan = suggest_soil_amendments(6.3, 4.0, &[], Some(10_000.0)).unwrap();
        assert!(plan.amendments.is_empty());
        assert_eq!(plan.total_cost, 0.0);
        assert_eq!(plan.organic_matter_target, 4.0);
    }
}
