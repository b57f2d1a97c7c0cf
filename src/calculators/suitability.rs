//! Land suitability classes (FAO S1/S2/S3/N) from terrain observations.
//!
//! Each criterion scores 1 to 3. Criteria the farmer did not measure are left
//! out of the denominator, so a terrain described only by its slope is judged
//! on slope alone.

use super::{require_non_negative, require_ph};
use crate::error::Result;
use crate::knowledge::{normalize_key, Crop, Range, Region};
use serde::{Deserialize, Serialize};
use tracing::debug;

const MAX_CRITERION_SCORE: u8 = 3;
const ALTITUDE_TOLERANCE_M: f64 = 200.0;
const PH_TOLERANCE: f64 = 0.5;

/// Terrain observations, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TerrainRecord {
    /// Metres above sea level.
    pub altitude: Option<f64>,
    /// Slope in percent.
    #[serde(alias = "slope")]
    pub pente: Option<f64>,
    pub drainage: Option<String>,
    #[serde(alias = "exposure")]
    pub exposition: Option<String>,
    pub ph: Option<f64>,
}

impl TerrainRecord {
    fn validate(&self) -> Result<()> {
        if let Some(altitude) = self.altitude {
            require_non_negative("altitude", altitude)?;
        }
        if let Some(slope) = self.pente {
            require_non_negative("pente", slope)?;
        }
        if let Some(ph) = self.ph {
            require_ph("ph", ph)?;
        }
        Ok(())
    }
}

struct Criteria {
    altitude: Range,
    max_slope: f64,
    drainage: &'static [&'static str],
    exposure: &'static [&'static str],
    ph: Range,
}

static CACAO_CRITERIA: Criteria = Criteria {
    altitude: Range::new(0.0, 800.0),
    max_slope: 30.0,
    drainage: &["bien drainé", "modérément drainé"],
    exposure: &["ombragé", "mi-ombre"],
    ph: Range::new(5.5, 7.0),
};

static CAFE_CRITERIA: Criteria = Criteria {
    altitude: Range::new(500.0, 2000.0),
    max_slope: 45.0,
    drainage: &["bien drainé"],
    exposure: &["mi-ombre", "ombragé"],
    ph: Range::new(6.0, 7.0),
};

static MAIS_CRITERIA: Criteria = Criteria {
    altitude: Range::new(0.0, 1500.0),
    max_slope: 15.0,
    drainage: &["bien drainé", "modérément drainé"],
    exposure: &["plein soleil"],
    ph: Range::new(5.8, 7.2),
};

fn criteria_for(crop: &str) -> &'static Criteria {
    match Crop::from_name(crop) {
        Some(Crop::Cacao) => &CACAO_CRITERIA,
        Some(Crop::Cafe) => &CAFE_CRITERIA,
        Some(Crop::Mais) => &MAIS_CRITERIA,
        _ => {
            debug!("No suitability criteria for '{}', using maïs", crop);
            &MAIS_CRITERIA
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Altitude,
    Pente,
    Drainage,
    Exposition,
    Ph,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObservedValue {
    Number(f64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionEvaluation {
    pub criterion: Criterion,
    pub value: ObservedValue,
    pub score: u8,
    pub status: &'static str,
}

fn status_label(score: u8) -> &'static str {
    match score {
        3 => "excellent",
        2 => "bon",
        1 => "marginal",
        _ => "inadéquat",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuitabilityClass {
    #[serde(rename = "Très apte (S1)")]
    S1,
    #[serde(rename = "Apte (S2)")]
    S2,
    #[serde(rename = "Marginalement apte (S3)")]
    S3,
    #[serde(rename = "Inapte (N)")]
    N,
}

impl SuitabilityClass {
    /// Thresholds are closed on their lower bound.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            SuitabilityClass::S1
        } else if percent >= 60.0 {
            SuitabilityClass::S2
        } else if percent >= 40.0 {
            SuitabilityClass::S3
        } else {
            SuitabilityClass::N
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionPotential {
    #[serde(rename = "élevé")]
    Eleve,
    Moyen,
    Faible,
}

impl ProductionPotential {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 70.0 {
            ProductionPotential::Eleve
        } else if percent >= 50.0 {
            ProductionPotential::Moyen
        } else {
            ProductionPotential::Faible
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    pub issue: &'static str,
    pub solution: &'static str,
    pub cost: f64,
    pub feasibility: &'static str,
}

const DRAINAGE_WORKS: Improvement = Improvement {
    issue: "Drainage insuffisant",
    solution: "Installation drains, billonnage",
    cost: 100_000.0,
    feasibility: "moyenne",
};

const LIMING: Improvement = Improvement {
    issue: "Sol trop acide",
    solution: "Chaulage (2-3 t/ha)",
    cost: 150_000.0,
    feasibility: "élevée",
};

const TERRACING: Improvement = Improvement {
    issue: "Pente trop forte",
    solution: "Terrassement, cultures en courbes de niveau",
    cost: 200_000.0,
    feasibility: "faible",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuitabilityReport {
    pub crop: String,
    pub region: Option<Region>,
    pub terrain: TerrainRecord,
    pub evaluations: Vec<CriterionEvaluation>,
    pub score_percent: f64,
    pub class: SuitabilityClass,
    pub production_potential: ProductionPotential,
    pub improvements: Vec<Improvement>,
}

fn score_range(range: Range, value: f64, tolerance: f64) -> u8 {
    if range.contains(value) {
        3
    } else if range.distance_outside(value) <= tolerance {
        2
    } else {
        1
    }
}

fn score_slope(max_slope: f64, value: f64) -> u8 {
    if value <= max_slope / 2.0 {
        3
    } else if value <= max_slope {
        2
    } else {
        1
    }
}

fn score_label(accepted: &[&str], value: &str) -> u8 {
    let key = normalize_key(value);
    if accepted.iter().any(|a| normalize_key(a) == key) {
        3
    } else {
        1
    }
}

pub fn assess_land_suitability(
    crop: &str,
    region: Option<Region>,
    terrain: &TerrainRecord,
) -> Result<SuitabilityReport> {
    terrain.validate()?;
    let criteria = criteria_for(crop);

    let mut evaluations = Vec::new();
    let mut push = |criterion, value, score| {
        evaluations.push(CriterionEvaluation {
            criterion,
            value,
            score,
            status: status_label(score),
        })
    };

    if let Some(altitude) = terrain.altitude {
        push(
            Criterion::Altitude,
            ObservedValue::Number(altitude),
            score_range(criteria.altitude, altitude, ALTITUDE_TOLERANCE_M),
        );
    }
    if let Some(slope) = terrain.pente {
        push(Criterion::Pente, ObservedValue::Number(slope), score_slope(criteria.max_slope, slope));
    }
    if let Some(drainage) = &terrain.drainage {
        push(
            Criterion::Drainage,
            ObservedValue::Label(drainage.clone()),
            score_label(criteria.drainage, drainage),
        );
    }
    if let Some(exposure) = &terrain.exposition {
        push(
            Criterion::Exposition,
            ObservedValue::Label(exposure.clone()),
            score_label(criteria.exposure, exposure),
        );
    }
    if let Some(ph) = terrain.ph {
        push(Criterion::Ph, ObservedValue::Number(ph), score_range(criteria.ph, ph, PH_TOLERANCE));
    }

    let earned: u32 = evaluations.iter().map(|e| e.score as u32).sum();
    let possible = MAX_CRITERION_SCORE as u32 * evaluations.len() as u32;
    let score_percent = if possible > 0 {
        earned as f64 / possible as f64 * 100.0
    } else {
        0.0
    };

    let improvements = evaluations
        .iter()
        .filter(|e| e.score == 1)
        .filter_map(|e| match e.criterion {
            Criterion::Drainage => Some(DRAINAGE_WORKS),
            Criterion::Ph => terrain.ph.filter(|ph| *ph < criteria.ph.min).map(|_| LIMING),
            Criterion::Pente => Some(TERRACING),
            _ => None,
        })
        .collect();

    Ok(SuitabilityReport {
        crop: crop.to_string(),
        region,
        terrain: terrain.clone(),
        evaluations,
        score_percent,
        class: SuitabilityClass::from_percent(score_percent),
        production_potential: ProductionPotential::from_percent(score_percent),
        improvements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgroError;

    #[test]
    fn test_slope_only_evaluates_one_criterion() {
        let terrain = TerrainRecord {
            pente: Some(10.0),
            ..Default::default()
        };
        let report = assess_land_suitability("maïs", None, &terrain).unwrap();
        assert_eq!(report.evaluations.len(), 1);
        assert_eq!(report.evaluations[0].criterion, Criterion::Pente);
        // 10 > 15/2, so "bon"
        assert_eq!(report.evaluations[0].score, 2);
        assert!((report.score_percent - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.class, SuitabilityClass::S2);
    }

    #[test]
    fn test_empty_terrain_is_unsuitable_at_zero() {
        let report = assess_land_suitability("cacao", None, &TerrainRecord::default()).unwrap();
        assert!(report.evaluations.is_empty());
        assert_eq!(report.score_percent, 0.0);
        assert_eq!(report.class, SuitabilityClass::N);
        assert_eq!(report.production_potential, ProductionPotential::Faible);
    }

    #[test]
    fn test_ideal_cacao_plot() {
        let terrain = TerrainRecord {
            altitude: Some(450.0),
            pente: Some(8.0),
            drainage: Some("Bien drainé".to_string()),
            exposition: Some("mi-ombre".to_string()),
            ph: Some(6.2),
        };
        let report = assess_land_suitability("cacao", Some(Region::Centre), &terrain).unwrap();
        assert_eq!(report.score_percent, 100.0);
        assert_eq!(report.class, SuitabilityClass::S1);
        assert!(report.improvements.is_empty());
        assert!(report.evaluations.iter().all(|e| e.status == "excellent"));
    }

    #[test]
    fn test_tolerance_bands() {
        let terrain = TerrainRecord {
            altitude: Some(950.0),
            ph: Some(5.2),
            ..Default::default()
        };
        let report = assess_land_suitability("cacao", None, &terrain).unwrap();
        assert_eq!(report.evaluations[0].score, 2);
        assert_eq!(report.evaluations[1].score, 2);
    }

    #[test]
    fn test_poor_plot_gets_improvements() {
        let terrain = TerrainRecord {
            pente: Some(40.0),
            drainage: Some("mal drainé".to_string()),
            exposition: Some("ombragé".to_string()),
            ph: Some(4.5),
            ..Default::default()
        };
        let report = assess_land_suitability("maïs", None, &terrain).unwrap();
        assert_eq!(report.class, SuitabilityClass::N);
        let issues: Vec<_> = report.improvements.iter().map(|i| i.issue).collect();
        assert_eq!(issues, vec!["Pente trop forte", "Drainage insuffisant", "Sol trop acide"]);
    }

    #[test]
    fn test_alkaline_soil_gets_no_liming() {
        let terrain = TerrainRecord {
            ph: Some(8.5),
            ..Default::default()
        };
        let report = assess_land_suitability("maïs", None, &terrain).unwrap();
        assert_eq!(report.evaluations[0].score, 1);
        assert!(report.improvements.is_empty());
    }

    #[test]
    fn test_unknown_crop_uses_maize_criteria() {
        let terrain = TerrainRecord {
            exposition: Some("plein soleil".to_string()),
            ..Default::default()
        };
        let report = assess_land_suitability("sorgho", None, &terrain).unwrap();
        assert_eq!(report.score_percent, 100.0);
    }

    #[test]
    fn test_invalid_measurements_are_rejected() {
        let bad_ph = TerrainRecord {
            ph: Some(15.0),
            ..Default::default()
        };
        assert!(matches!(
            assess_land_suitability("maïs", None, &bad_ph),
            Err(AgroError::Validation(_))
        ));
        let bad_slope = TerrainRecord {
            pente: Some(-3.0),
            ..Default::default()
        };
        assert!(assess_land_suitability("maïs", None, &bad_slope).is_err());
    }

    #[test]
    fn test_class_is_total_over_percent() {
        assert_eq!(SuitabilityClass::from_percent(80.0), SuitabilityClass::S1);
        assert_eq!(SuitabilityClass::from_percent(79.9), SuitabilityClass::S2);
        assert_eq!(SuitabilityClass::from_percent(40.0), SuitabilityClass::S3);
        assert_eq!(SuitabilityClass::from_percent(0.0), SuitabilityClass::N);
    }

    #[test]
    fn test_terrain_deserializes_with_aliases() {
        let terrain: TerrainRecord =
            serde_json::from_value(serde_json::json!({"slope": 12.0, "ph": 6.0})).unwrap();
        assert_eq!(terrain.pente, Some(12.0));
        assert_eq!(terrain.ph, Some(6.0));
    }
}
