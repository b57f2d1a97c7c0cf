//! Irrigation need and system choice from the regional water balance.

use super::require_positive;
use crate::error::Result;
use crate::knowledge::crops::{Crop, WaterRequirement};
use crate::knowledge::inputs::{
    irrigation_system, ConservationTechnique, IrrigationKind, IrrigationSystem,
    CONSERVATION_TECHNIQUES,
};
use crate::knowledge::Region;
use serde::Serialize;

/// Deficit, in mm per cycle, above which irrigation is worth installing.
pub const IRRIGATION_THRESHOLD_MM: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrigationSchedule {
    pub frequency: &'static str,
    pub application_duration: &'static str,
    pub critical_periods: &'static [&'static str],
    pub seasonal_adjustments: &'static [(&'static str, &'static str)],
}

static SEASONAL_ADJUSTMENTS: [(&str, &str); 3] = [
    ("saison_sèche", "irrigation quotidienne si nécessaire"),
    ("saison_pluies", "irrigation d'appoint seulement"),
    ("début_pluies", "réduction progressive"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrigationPlan {
    pub crop: Crop,
    pub region: Region,
    pub area_ha: f64,
    pub water_source: String,
    pub annual_rainfall_mm: f64,
    pub crop_needs: &'static WaterRequirement,
    pub deficit_mm: f64,
    pub irrigation_required: bool,
    pub system: &'static IrrigationSystem,
    pub installation_cost: f64,
    pub schedule: IrrigationSchedule,
    pub conservation: &'static [ConservationTechnique],
}

fn system_for(crop: Option<Crop>) -> IrrigationKind {
    match crop {
        Some(Crop::Cacao | Crop::Cafe | Crop::Plantain) => IrrigationKind::MicroAspersion,
        Some(Crop::Mais | Crop::Arachide) => IrrigationKind::Aspersion,
        _ => IrrigationKind::GoutteAGoutte,
    }
}

pub fn optimize_irrigation(
    crop: &str,
    region: Region,
    area_ha: f64,
    water_source: &str,
) -> Result<IrrigationPlan> {
    let area_ha = require_positive("area_ha", area_ha)?;
    let named = Crop::from_name(crop);
    let resolved = Crop::resolve(crop);
    let crop_needs = &resolved.profile_or_default().water;

    let annual_rainfall_mm = region.profile().annual_rainfall_mm;
    let deficit_mm = (crop_needs.need_mm.max - annual_rainfall_mm).max(0.0);
    let system = irrigation_system(system_for(named));

    Ok(IrrigationPlan {
        crop: resolved,
        region,
        area_ha,
        water_source: water_source.to_string(),
        annual_rainfall_mm,
        crop_needs,
        deficit_mm,
        irrigation_required: deficit_mm > IRRIGATION_THRESHOLD_MM,
        system,
        installation_cost: system.cost_per_ha * area_ha,
        schedule: IrrigationSchedule {
            frequency: "tous les 3-5 jours selon saison",
            application_duration: "2-4 heures/application",
            critical_periods: crop_needs.critical_periods,
            seasonal_adjustments: &SEASONAL_ADJUSTMENTS,
        },
        conservation: &CONSERVATION_TECHNIQUES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cacao_in_far_north_needs_irrigation() {
        let plan = optimize_irrigation("cacao", Region::ExtremeNord, 2.0, "forage").unwrap();
        assert_eq!(plan.deficit_mm, 1200.0);
        assert!(plan.irrigation_required);
        assert_eq!(plan.system.kind, IrrigationKind::MicroAspersion);
        assert_eq!(plan.installation_cost, 1_200_000.0);
        assert_eq!(plan.schedule.critical_periods, &["floraison", "développement fruits"]);
    }

    #[test]
    fn test_wet_region_has_no_deficit() {
        let plan = optimize_irrigation("plantain", Region::Littoral, 1.0, "pluie").unwrap();
        assert_eq!(plan.deficit_mm, 0.0);
        assert!(!plan.irrigation_required);
    }

    #[test]
    fn test_deficit_threshold_is_exclusive() {
        // café needs 1500 mm, Adamaoua receives 1300
        let plan = optimize_irrigation("café", Region::Adamaoua, 1.0, "rivière").unwrap();
        assert_eq!(plan.deficit_mm, 200.0);
        assert!(plan.irrigation_required);
        // maïs needs 600 mm, Extrême-Nord receives exactly 600
        let plan = optimize_irrigation("maïs", Region::ExtremeNord, 1.0, "pluie").unwrap();
        assert_eq!(plan.deficit_mm, 0.0);
        assert_eq!(plan.system.kind, IrrigationKind::Aspersion);
    }

    #[test]
    fn test_unprofiled_crop_gets_drip_and_maize_needs() {
        let plan = optimize_irrigation("tomate", Region::Centre, 0.5, "puits").unwrap();
        assert_eq!(plan.crop, Crop::Mais);
        assert_eq!(plan.system.kind, IrrigationKind::GoutteAGoutte);
        assert_eq!(plan.installation_cost, 400_000.0);
    }

    #[test]
    fn test_zero_area_is_rejected() {
        assert!(optimize_irrigation("maïs", Region::Centre, 0.0, "pluie").is_err());
    }
}
