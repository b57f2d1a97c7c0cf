//! The ten administrative regions and their agro-climatic profiles.

use super::{normalize_key, Range};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Centre,
    Littoral,
    Ouest,
    Sud,
    Est,
    Nord,
    Adamaoua,
    #[serde(rename = "Extrême-Nord")]
    ExtremeNord,
    #[serde(rename = "Nord-Ouest")]
    NordOuest,
    #[serde(rename = "Sud-Ouest")]
    SudOuest,
}

pub const DEFAULT_REGION: Region = Region::Centre;

/// Rainfall regime used for the seasonal calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    /// One rainy season, June to September.
    Sahelian,
    /// Two rainy seasons split by a short dry spell.
    Forest,
    /// Long rainy season with a mid-year lull.
    Highland,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::Centre,
        Region::Littoral,
        Region::Ouest,
        Region::Sud,
        Region::Est,
        Region::Nord,
        Region::Adamaoua,
        Region::ExtremeNord,
        Region::NordOuest,
        Region::SudOuest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Centre => "Centre",
            Region::Littoral => "Littoral",
            Region::Ouest => "Ouest",
            Region::Sud => "Sud",
            Region::Est => "Est",
            Region::Nord => "Nord",
            Region::Adamaoua => "Adamaoua",
            Region::ExtremeNord => "Extrême-Nord",
            Region::NordOuest => "Nord-Ouest",
            Region::SudOuest => "Sud-Ouest",
        }
    }

    pub fn from_name(name: &str) -> Option<Region> {
        let key = normalize_key(name);
        Region::ALL.into_iter().find(|r| normalize_key(r.name()) == key)
    }

    /// Resolve a name, falling back to Centre.
    pub fn resolve(name: &str) -> Region {
        Region::from_name(name).unwrap_or_else(|| {
            debug!("Unknown region '{}', using {}", name, DEFAULT_REGION.name());
            DEFAULT_REGION
        })
    }

    pub fn climate_zone(&self) -> ClimateZone {
        match self {
            Region::Nord | Region::ExtremeNord => ClimateZone::Sahelian,
            Region::Centre | Region::Sud | Region::Est | Region::Littoral => ClimateZone::Forest,
            Region::Ouest | Region::NordOuest | Region::Adamaoua | Region::SudOuest => {
                ClimateZone::Highland
            }
        }
    }

    pub fn profile(&self) -> &'static RegionProfile {
        // PROFILES is declared in variant order
        &PROFILES[*self as usize]
    }

    /// Soil survey for this region, or Centre's when none was surveyed.
    pub fn soil_or_default(&self) -> &'static SoilProfile {
        self.profile().soil.as_ref().unwrap_or(&FALLBACK_SOIL)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilProfile {
    pub dominant_type: &'static str,
    pub average_ph: f64,
    pub organic_matter_percent: f64,
    pub constraints: &'static [&'static str],
    pub advantages: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProfile {
    pub region: Region,
    pub climate: &'static str,
    pub rainfall_mm: Range,
    /// Long-run annual rainfall used for irrigation balances.
    pub annual_rainfall_mm: f64,
    pub temperature: Range,
    pub main_crops: &'static [&'static str],
    pub soil_types: &'static [&'static str],
    pub agricultural_zones: &'static [&'static str],
    pub soil: Option<SoilProfile>,
}

const CENTRE_SOIL: SoilProfile = SoilProfile {
    dominant_type: "ferrallitique",
    average_ph: 4.8,
    organic_matter_percent: 2.5,
    constraints: &["acidité", "pauvreté en bases", "lixiviation"],
    advantages: &["profondeur", "pas de toxicité aluminique sévère"],
};

static FALLBACK_SOIL: SoilProfile = CENTRE_SOIL;

static PROFILES: [RegionProfile; 10] = [
    RegionProfile {
        region: Region::Centre,
        climate: "Équatorial de transition",
        rainfall_mm: Range::new(1000.0, 1600.0),
        annual_rainfall_mm: 1400.0,
        temperature: Range::new(22.0, 28.0),
        main_crops: &["manioc", "maïs", "plantain", "arachide"],
        soil_types: &["argileux", "latéritique"],
        agricultural_zones: &["Yaoundé", "Mbalmayo", "Obala"],
        soil: Some(CENTRE_SOIL),
    },
    RegionProfile {
        region: Region::Littoral,
        climate: "Équatorial humide",
        rainfall_mm: Range::new(1500.0, 4000.0),
        annual_rainfall_mm: 2800.0,
        temperature: Range::new(24.0, 30.0),
        main_crops: &["cacao", "palmier_à_huile", "plantain", "manioc"],
        soil_types: &["argileux", "sableux"],
        agricultural_zones: &["Douala", "Edéa", "Nkongsamba"],
        soil: None,
    },
    RegionProfile {
        region: Region::Ouest,
        climate: "Tropical d'altitude",
        rainfall_mm: Range::new(1500.0, 2000.0),
        annual_rainfall_mm: 1800.0,
        temperature: Range::new(18.0, 25.0),
        main_crops: &["café", "maraîchage", "pomme_de_terre", "haricot"],
        soil_types: &["volcanique", "humifère"],
        agricultural_zones: &["Bafoussam", "Dschang", "Mbouda"],
        soil: Some(SoilProfile {
            dominant_type: "volcanique",
            average_ph: 5.8,
            organic_matter_percent: 4.2,
            constraints: &["pentes", "érosion potentielle"],
            advantages: &["fertilité naturelle", "rétention eau", "structure"],
        }),
    },
    RegionProfile {
        region: Region::Sud,
        climate: "Équatorial humide",
        rainfall_mm: Range::new(1500.0, 2000.0),
        annual_rainfall_mm: 1600.0,
        temperature: Range::new(23.0, 28.0),
        main_crops: &["cacao", "café", "plantain", "manioc"],
        soil_types: &["argileux", "latéritique"],
        agricultural_zones: &["Ebolowa", "Sangmélima", "Kribi"],
        soil: None,
    },
    RegionProfile {
        region: Region::Est,
        climate: "Équatorial humide",
        rainfall_mm: Range::new(1500.0, 1800.0),
        annual_rainfall_mm: 1500.0,
        temperature: Range::new(23.0, 28.0),
        main_crops: &["manioc", "plantain", "café", "cacao"],
        soil_types: &["latéritique", "argileux"],
        agricultural_zones: &["Bertoua", "Batouri", "Yokadouma"],
        soil: None,
    },
    RegionProfile {
        region: Region::Nord,
        climate: "Tropical sec",
        rainfall_mm: Range::new(900.0, 1200.0),
        annual_rainfall_mm: 1000.0,
        temperature: Range::new(25.0, 35.0),
        main_crops: &["coton", "arachide", "mil", "sorgho"],
        soil_types: &["sableux", "argileux"],
        agricultural_zones: &["Garoua", "Guider", "Figuil"],
        soil: Some(SoilProfile {
            dominant_type: "ferrugineux",
            average_ph: 6.2,
            organic_matter_percent: 1.8,
            constraints: &["faible MO", "carence P", "battance"],
            advantages: &["pas d'acidité", "bonne base"],
        }),
    },
    RegionProfile {
        region: Region::Adamaoua,
        climate: "Tropical d'altitude",
        rainfall_mm: Range::new(1200.0, 1500.0),
        annual_rainfall_mm: 1300.0,
        temperature: Range::new(20.0, 28.0),
        main_crops: &["maïs", "arachide", "igname", "élevage"],
        soil_types: &["latéritique", "volcanique"],
        agricultural_zones: &["Ngaoundéré", "Meiganga", "Banyo"],
        soil: None,
    },
    RegionProfile {
        region: Region::ExtremeNord,
        climate: "Sahélien",
        rainfall_mm: Range::new(400.0, 800.0),
        annual_rainfall_mm: 600.0,
        temperature: Range::new(28.0, 40.0),
        main_crops: &["mil", "sorgho", "niébé", "arachide"],
        soil_types: &["sableux", "argileux"],
        agricultural_zones: &["Maroua", "Mokolo", "Kousseri"],
        soil: None,
    },
    RegionProfile {
        region: Region::NordOuest,
        climate: "Tropical d'altitude",
        rainfall_mm: Range::new(1200.0, 2000.0),
        annual_rainfall_mm: 1600.0,
        temperature: Range::new(18.0, 26.0),
        main_crops: &["café", "maraîchage", "igname", "maïs"],
        soil_types: &["volcanique", "humifère"],
        agricultural_zones: &["Bamenda", "Kumbo", "Wum"],
        soil: None,
    },
    RegionProfile {
        region: Region::SudOuest,
        climate: "Équatorial humide",
        rainfall_mm: Range::new(2000.0, 4000.0),
        annual_rainfall_mm: 3000.0,
        temperature: Range::new(22.0, 28.0),
        main_crops: &["palmier_à_huile", "cacao", "café", "plantain"],
        soil_types: &["volcanique", "argileux"],
        agricultural_zones: &["Buea", "Limbe", "Kumba"],
        soil: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_follow_region_order() {
        for region in Region::ALL {
            assert_eq!(region.profile().region, region);
        }
    }

    #[test]
    fn test_from_name_with_accents() {
        assert_eq!(Region::from_name("extreme-nord"), Some(Region::ExtremeNord));
        assert_eq!(Region::from_name("Nord Ouest"), Some(Region::NordOuest));
        assert_eq!(Region::from_name("Atlantis"), None);
    }

    #[test]
    fn test_resolve_falls_back_to_centre() {
        assert_eq!(Region::resolve("Atlantis"), Region::Centre);
    }

    #[test]
    fn test_unsurveyed_region_uses_centre_soil() {
        assert_eq!(Region::Littoral.soil_or_default().dominant_type, "ferrallitique");
        assert_eq!(Region::Ouest.soil_or_default().dominant_type, "volcanique");
    }

    #[test]
    fn test_climate_zones() {
        assert_eq!(Region::ExtremeNord.climate_zone(), ClimateZone::Sahelian);
        assert_eq!(Region::Littoral.climate_zone(), ClimateZone::Forest);
        assert_eq!(Region::Adamaoua.climate_zone(), ClimateZone::Highland);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Region::ExtremeNord).unwrap(), "\"Extrême-Nord\"");
    }
}
