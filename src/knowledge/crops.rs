//! Crop catalog: identities, agronomic profiles and nutrient tables.

use super::{normalize_key, Range, Region};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Crops grown in Cameroon that the advisor knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crop {
    #[serde(rename = "cacao")]
    Cacao,
    #[serde(rename = "café")]
    Cafe,
    #[serde(rename = "manioc")]
    Manioc,
    #[serde(rename = "maïs")]
    Mais,
    #[serde(rename = "plantain")]
    Plantain,
    #[serde(rename = "arachide")]
    Arachide,
    #[serde(rename = "igname")]
    Igname,
    #[serde(rename = "coton")]
    Coton,
    #[serde(rename = "palmier_à_huile")]
    PalmierAHuile,
    #[serde(rename = "tomate")]
    Tomate,
    #[serde(rename = "gombo")]
    Gombo,
    #[serde(rename = "piment")]
    Piment,
}

/// Crop used whenever a name is unknown or has no profile.
pub const DEFAULT_CROP: Crop = Crop::Mais;

impl Crop {
    pub const ALL: [Crop; 12] = [
        Crop::Cacao,
        Crop::Cafe,
        Crop::Manioc,
        Crop::Mais,
        Crop::Plantain,
        Crop::Arachide,
        Crop::Igname,
        Crop::Coton,
        Crop::PalmierAHuile,
        Crop::Tomate,
        Crop::Gombo,
        Crop::Piment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Crop::Cacao => "cacao",
            Crop::Cafe => "café",
            Crop::Manioc => "manioc",
            Crop::Mais => "maïs",
            Crop::Plantain => "plantain",
            Crop::Arachide => "arachide",
            Crop::Igname => "igname",
            Crop::Coton => "coton",
            Crop::PalmierAHuile => "palmier_à_huile",
            Crop::Tomate => "tomate",
            Crop::Gombo => "gombo",
            Crop::Piment => "piment",
        }
    }

    /// Accent- and case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Crop> {
        let key = normalize_key(name);
        Crop::ALL.into_iter().find(|c| normalize_key(c.name()) == key)
    }

    /// Resolve a name to a crop that has a full profile, falling back to maïs.
    pub fn resolve(name: &str) -> Crop {
        match Crop::from_name(name) {
            Some(crop) if crop.profile().is_some() => crop,
            _ => {
                debug!("No profile for crop '{}', using {}", name, DEFAULT_CROP.name());
                DEFAULT_CROP
            }
        }
    }

    pub fn profile(&self) -> Option<&'static CropProfile> {
        PROFILES.iter().find(|p| p.crop == *self)
    }

    /// Profile of this crop, or of maïs when the crop has none.
    pub fn profile_or_default(&self) -> &'static CropProfile {
        self.profile().unwrap_or(&PROFILES[MAIS_INDEX])
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterNeed {
    Low,
    Medium,
    High,
}

/// Element removed from the field per kilogram of harvested product, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientUptake {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ca: f64,
    pub mg: f64,
    pub s: f64,
}

/// Fertilizer need per hectare in oxide form, kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FertilizerNeed {
    pub n: f64,
    pub p2o5: f64,
    pub k2o: f64,
    pub ca: f64,
    pub mg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilRequirement {
    pub optimal_ph: Range,
    pub min_depth_cm: u32,
    pub drainage: &'static str,
    pub organic_matter_min: f64,
    pub organic_matter_optimal: f64,
    pub textures: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterRequirement {
    /// Seasonal water need in mm, `min` is survival and `max` is optimal.
    pub need_mm: Range,
    pub critical_periods: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProfile {
    pub crop: Crop,
    pub scientific_name: &'static str,
    pub cycle_days: u32,
    pub optimal_temperature: Range,
    pub water_need: WaterNeed,
    pub preferred_soils: &'static [&'static str],
    pub suitable_regions: &'static [Region],
    pub base_yield_kg_ha: f64,
    pub soil: SoilRequirement,
    pub water: WaterRequirement,
    pub uptake: NutrientUptake,
    pub fertilizer_need: FertilizerNeed,
}

const MAIS_INDEX: usize = 3;

static PROFILES: [CropProfile; 6] = [
    CropProfile {
        crop: Crop::Cacao,
        scientific_name: "Theobroma cacao",
        cycle_days: 365,
        optimal_temperature: Range::new(21.0, 32.0),
        water_need: WaterNeed::High,
        preferred_soils: &["argileux", "humifère"],
        suitable_regions: &[Region::Centre, Region::Sud, Region::Littoral, Region::SudOuest],
        base_yield_kg_ha: 600.0,
        soil: SoilRequirement {
            optimal_ph: Range::new(6.0, 7.0),
            min_depth_cm: 150,
            drainage: "bien drainé",
            organic_matter_min: 3.0,
            organic_matter_optimal: 5.0,
            textures: &["argileux", "argilo-limoneux"],
        },
        water: WaterRequirement {
            need_mm: Range::new(1200.0, 1800.0),
            critical_periods: &["floraison", "développement fruits"],
        },
        uptake: NutrientUptake { n: 25.0, p: 3.0, k: 35.0, ca: 8.0, mg: 4.0, s: 2.0 },
        fertilizer_need: FertilizerNeed { n: 120.0, p2o5: 40.0, k2o: 150.0, ca: 80.0, mg: 30.0 },
    },
    CropProfile {
        crop: Crop::Cafe,
        scientific_name: "Coffea arabica/robusta",
        cycle_days: 365,
        optimal_temperature: Range::new(15.0, 24.0),
        water_need: WaterNeed::Medium,
        preferred_soils: &["volcanique", "humifère"],
        suitable_regions: &[Region::Ouest, Region::NordOuest, Region::Sud],
        base_yield_kg_ha: 800.0,
        soil: SoilRequirement {
            optimal_ph: Range::new(6.0, 6.8),
            min_depth_cm: 120,
            drainage: "bien drainé",
            organic_matter_min: 4.0,
            organic_matter_optimal: 6.0,
            textures: &["volcanique", "argilo-limoneux"],
        },
        water: WaterRequirement {
            need_mm: Range::new(1000.0, 1500.0),
            critical_periods: &["floraison", "grossissement grains"],
        },
        uptake: NutrientUptake { n: 20.0, p: 2.0, k: 25.0, ca: 5.0, mg: 3.0, s: 1.5 },
        fertilizer_need: FertilizerNeed { n: 150.0, p2o5: 50.0, k2o: 180.0, ca: 100.0, mg: 40.0 },
    },
    CropProfile {
        crop: Crop::Manioc,
        scientific_name: "Manihot esculenta",
        cycle_days: 300,
        optimal_temperature: Range::new(20.0, 30.0),
        water_need: WaterNeed::Medium,
        preferred_soils: &["sableux", "argileux", "latéritique"],
        suitable_regions: &Region::ALL,
        base_yield_kg_ha: 15000.0,
        soil: SoilRequirement {
            optimal_ph: Range::new(5.5, 6.5),
            min_depth_cm: 60,
            drainage: "bien drainé",
            organic_matter_min: 1.5,
            organic_matter_optimal: 3.0,
            textures: &["sableux", "sablo-limoneux"],
        },
        water: WaterRequirement {
            need_mm: Range::new(600.0, 1000.0),
            critical_periods: &["établissement", "tubérisation"],
        },
        uptake: NutrientUptake { n: 5.0, p: 1.0, k: 8.0, ca: 3.0, mg: 1.0, s: 0.5 },
        fertilizer_need: FertilizerNeed { n: 80.0, p2o5: 40.0, k2o: 120.0, ca: 30.0, mg: 15.0 },
    },
    CropProfile {
        crop: Crop::Mais,
        scientific_name: "Zea mays",
        cycle_days: 120,
        optimal_temperature: Range::new(18.0, 32.0),
        water_need: WaterNeed::Medium,
        preferred_soils: &["argileux", "limoneux"],
        suitable_regions: &[Region::Centre, Region::Ouest, Region::Adamaoua, Region::Nord],
        base_yield_kg_ha: 2500.0,
        soil: SoilRequirement {
            optimal_ph: Range::new(5.8, 7.0),
            min_depth_cm: 80,
            drainage: "bien drainé à modéré",
            organic_matter_min: 2.0,
            organic_matter_optimal: 4.0,
            textures: &["limoneux", "argilo-limoneux"],
        },
        water: WaterRequirement {
            need_mm: Range::new(450.0, 600.0),
            critical_periods: &["floraison", "remplissage grains"],
        },
        uptake: NutrientUptake { n: 15.0, p: 3.0, k: 8.0, ca: 2.0, mg: 2.0, s: 1.0 },
        fertilizer_need: FertilizerNeed { n: 200.0, p2o5: 80.0, k2o: 160.0, ca: 50.0, mg: 25.0 },
    },
    CropProfile {
        crop: Crop::Plantain,
        scientific_name: "Musa paradisiaca",
        cycle_days: 365,
        optimal_temperature: Range::new(22.0, 30.0),
        water_need: WaterNeed::High,
        preferred_soils: &["humifère", "argileux"],
        suitable_regions: &[Region::Centre, Region::Sud, Region::Littoral, Region::Est],
        base_yield_kg_ha: 20000.0,
        soil: SoilRequirement {
            optimal_ph: Range::new(6.0, 7.5),
            min_depth_cm: 100,
            drainage: "modéré à humide",
            organic_matter_min: 3.0,
            organic_matter_optimal: 5.0,
            textures: &["argileux", "argilo-limoneux"],
        },
        water: WaterRequirement {
            need_mm: Range::new(1200.0, 1800.0),
            critical_periods: &["toute l'année"],
        },
        uptake: NutrientUptake { n: 12.0, p: 1.5, k: 20.0, ca: 4.0, mg: 2.0, s: 1.0 },
        fertilizer_need: FertilizerNeed { n: 250.0, p2o5: 100.0, k2o: 300.0, ca: 120.0, mg: 50.0 },
    },
    CropProfile {
        crop: Crop::Arachide,
        scientific_name: "Arachis hypogaea",
        cycle_days: 120,
        optimal_temperature: Range::new(20.0, 30.0),
        water_need: WaterNeed::Medium,
        preferred_soils: &["sableux", "limoneux"],
        suitable_regions: &[Region::Centre, Region::Nord, Region::Adamaoua, Region::ExtremeNord],
        base_yield_kg_ha: 1200.0,
        soil: SoilRequirement {
            optimal_ph: Range::new(6.0, 7.0),
            min_depth_cm: 50,
            drainage: "bien drainé",
            organic_matter_min: 2.0,
            organic_matter_optimal: 3.5,
            textures: &["sableux", "sablo-limoneux"],
        },
        water: WaterRequirement {
            need_mm: Range::new(400.0, 550.0),
            critical_periods: &["floraison", "formation gousses"],
        },
        uptake: NutrientUptake { n: 40.0, p: 4.0, k: 12.0, ca: 8.0, mg: 3.0, s: 2.0 },
        fertilizer_need: FertilizerNeed { n: 30.0, p2o5: 60.0, k2o: 80.0, ca: 80.0, mg: 20.0 },
    },
];

/// Crops that have a full agronomic profile.
pub fn profiled_crops() -> impl Iterator<Item = Crop> {
    PROFILES.iter().map(|p| p.crop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_accepts_accents_and_case() {
        assert_eq!(Crop::from_name("maïs"), Some(Crop::Mais));
        assert_eq!(Crop::from_name("MAIS"), Some(Crop::Mais));
        assert_eq!(Crop::from_name("Café"), Some(Crop::Cafe));
        assert_eq!(Crop::from_name("palmier à huile"), Some(Crop::PalmierAHuile));
        assert_eq!(Crop::from_name("quinoa"), None);
    }

    #[test]
    fn test_resolve_falls_back_to_mais() {
        assert_eq!(Crop::resolve("quinoa"), Crop::Mais);
        assert_eq!(Crop::resolve("tomate"), Crop::Mais);
        assert_eq!(Crop::resolve("cacao"), Crop::Cacao);
    }

    #[test]
    fn test_default_profile_is_mais() {
        assert_eq!(Crop::Gombo.profile_or_default().crop, Crop::Mais);
    }

    #[test]
    fn test_profile_ranges_are_ordered() {
        for profile in PROFILES.iter() {
            assert!(profile.optimal_temperature.min <= profile.optimal_temperature.max);
            assert!(profile.soil.optimal_ph.min <= profile.soil.optimal_ph.max);
            assert!(profile.water.need_mm.min <= profile.water.need_mm.max);
            assert!(profile.soil.organic_matter_min <= profile.soil.organic_matter_optimal);
        }
    }

    #[test]
    fn test_uptake_values_non_negative() {
        for profile in PROFILES.iter() {
            let u = profile.uptake;
            assert!([u.n, u.p, u.k, u.ca, u.mg, u.s].iter().all(|v| *v >= 0.0));
        }
    }

    #[test]
    fn test_serde_uses_french_names() {
        assert_eq!(serde_json::to_string(&Crop::Mais).unwrap(), "\"maïs\"");
        let crop: Crop = serde_json::from_str("\"café\"").unwrap();
        assert_eq!(crop, Crop::Cafe);
    }
}
