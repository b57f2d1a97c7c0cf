//! Plant-health catalogs: diseases, pests, treatment products and prevention strategies.
//!
//! Entry order inside each crop list is significant: it is the tie-break order
//! when two candidates score the same.

use super::{parse_label, Crop};
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    #[serde(rename = "faible")]
    Faible,
    #[serde(rename = "modérée")]
    Moderee,
    #[serde(rename = "élevée")]
    Elevee,
    #[serde(rename = "très élevée")]
    TresElevee,
    #[serde(rename = "critique")]
    Critique,
}

impl Severity {
    pub fn parse(raw: &str) -> Result<Self> {
        parse_label(
            raw,
            "severity",
            &[
                ("faible", Severity::Faible),
                ("modérée", Severity::Moderee),
                ("modéré", Severity::Moderee),
                ("élevée", Severity::Elevee),
                ("élevé", Severity::Elevee),
                ("très élevée", Severity::TresElevee),
                ("critique", Severity::Critique),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disease {
    pub name: &'static str,
    pub agent: &'static str,
    pub symptoms: &'static [&'static str],
    pub affected_parts: &'static [&'static str],
    pub conditions: &'static [&'static str],
    pub severity: Severity,
    pub treatments: &'static [&'static str],
}

static CACAO_DISEASES: [Disease; 3] = [
    Disease {
        name: "Pourriture brune",
        agent: "Phytophthora palmivora",
        symptoms: &["taches brunes", "pourriture fruits", "brunissement cabosses", "exsudat"],
        affected_parts: &["fruits", "cabosses", "branches"],
        conditions: &["humidité élevée", "température 25-30°C", "blessures"],
        severity: Severity::Elevee,
        treatments: &["fongicides cupriques", "taille sanitaire", "amélioration drainage"],
    },
    Disease {
        name: "Mirides",
        agent: "Sahlbergella singularis",
        symptoms: &["taches noires", "dessèchement branches", "écoulement sève", "chancres"],
        affected_parts: &["branches", "tronc", "rameaux"],
        conditions: &["saison sèche", "stress hydrique", "mauvais entretien"],
        severity: Severity::TresElevee,
        treatments: &["insecticides", "taille parties atteintes", "amélioration ombrage"],
    },
    Disease {
        name: "Chancre du cacaoyer",
        agent: "Phytophthora megakarya",
        symptoms: &["chancres bruns", "exsudat noir", "flétrissement", "défoliation"],
        affected_parts: &["tronc", "branches", "fruits"],
        conditions: &["blessures", "humidité", "mauvaise ventilation"],
        severity: Severity::Critique,
        treatments: &["fongicides systémiques", "curettage chancres", "mastication"],
    },
];

static MAIS_DISEASES: [Disease; 2] = [
    Disease {
        name: "Charbon du maïs",
        agent: "Ustilago maydis",
        symptoms: &["galles blanches", "galles noires", "déformation épis", "spores noires"],
        affected_parts: &["épis", "feuilles", "tiges"],
        conditions: &["humidité", "blessures", "variété sensible"],
        severity: Severity::Moderee,
        treatments: &["variétés résistantes", "rotation culturale", "élimination galles"],
    },
    Disease {
        name: "Striure du maïs",
        agent: "Maize streak virus",
        symptoms: &["striures jaunes", "nanisme", "déformation feuilles", "rendement réduit"],
        affected_parts: &["feuilles", "plant entier"],
        conditions: &["cicadelles vectrices", "saison des pluies"],
        severity: Severity::Elevee,
        treatments: &["variétés résistantes", "lutte contre cicadelles", "dates plantation"],
    },
];

static MANIOC_DISEASES: [Disease; 1] = [Disease {
    name: "Mosaïque du manioc",
    agent: "Cassava mosaic virus",
    symptoms: &["mosaïque feuilles", "jaunissement", "déformation", "nanisme"],
    affected_parts: &["feuilles", "plant entier"],
    conditions: &["boutures infectées", "aleurodes vectrices"],
    severity: Severity::Elevee,
    treatments: &["boutures saines", "lutte contre aleurodes", "variétés résistantes"],
}];

/// Diseases registered for a crop, empty when the crop has none.
pub fn diseases_for(crop: Crop) -> &'static [Disease] {
    match crop {
        Crop::Cacao => &CACAO_DISEASES,
        Crop::Mais => &MAIS_DISEASES,
        Crop::Manioc => &MANIOC_DISEASES,
        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pest {
    pub name: &'static str,
    pub scientific_name: &'static str,
    pub description: &'static str,
    pub damage: &'static [&'static str],
    pub location: &'static [&'static str],
    pub lifecycle: &'static str,
    pub peak_season: &'static str,
    pub economic_impact: &'static str,
}

static CACAO_PESTS: [Pest; 2] = [
    Pest {
        name: "Mirides",
        scientific_name: "Sahlbergella singularis",
        description: "Insecte brun-noir, 10-12mm, antennes longues",
        damage: &["taches noires branches", "dessèchement", "écoulement sève"],
        location: &["branches", "tronc", "rameaux"],
        lifecycle: "45-60 jours",
        peak_season: "saison sèche",
        economic_impact: "très élevé",
    },
    Pest {
        name: "Punaises des cabosses",
        scientific_name: "Bathycoelia thalassina",
        description: "Punaise verte, 8-10mm, forme ovale",
        damage: &["piqûres cabosses", "déformation fruits", "coulure"],
        location: &["cabosses", "fruits"],
        lifecycle: "30-40 jours",
        peak_season: "saison des pluies",
        economic_impact: "élevé",
    },
];

static MAIS_PESTS: [Pest; 2] = [
    Pest {
        name: "Foreur de tige",
        scientific_name: "Sesamia calamistis",
        description: "Chenille rosâtre, 25-40mm, tête brune",
        damage: &["trous dans tiges", "brisure plants", "flétrissement"],
        location: &["tiges", "épis"],
        lifecycle: "35-45 jours",
        peak_season: "début saison pluies",
        economic_impact: "élevé",
    },
    Pest {
        name: "Légionnaire d'automne",
        scientific_name: "Spodoptera frugiperda",
        description: "Chenille gris-brun, 30-40mm, rayures longitudinales",
        damage: &["défoliation", "consommation grains", "trous feuilles"],
        location: &["feuilles", "épis", "grains"],
        lifecycle: "30-35 jours",
        peak_season: "toute l'année",
        economic_impact: "très élevé",
    },
];

static MANIOC_PESTS: [Pest; 1] = [Pest {
    name: "Cochenille farineuse",
    scientific_name: "Phenacoccus manihoti",
    description: "Insecte blanc farineux, 2-4mm, colonies denses",
    damage: &["jaunissement feuilles", "déformation", "fumagine"],
    location: &["feuilles", "tiges", "bourgeons"],
    lifecycle: "20-30 jours",
    peak_season: "saison sèche",
    economic_impact: "élevé",
}];

pub fn pests_for(crop: Crop) -> &'static [Pest] {
    match crop {
        Crop::Cacao => &CACAO_PESTS,
        Crop::Mais => &MAIS_PESTS,
        Crop::Manioc => &MANIOC_PESTS,
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TreatmentCategory {
    #[serde(rename = "biologique")]
    Biologique,
    #[serde(rename = "traditionnel")]
    Traditionnel,
    #[serde(rename = "chimique")]
    Chimique,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentProduct {
    pub name: &'static str,
    pub category: TreatmentCategory,
    pub price: f64,
    pub dose: &'static str,
    /// Expected field efficacy, percent.
    pub efficacy: f64,
}

static TREATMENT_PRODUCTS: [TreatmentProduct; 12] = [
    TreatmentProduct { name: "Trichoderma", category: TreatmentCategory::Biologique, price: 5000.0, dose: "5g/L", efficacy: 70.0 },
    TreatmentProduct { name: "Bacillus thuringiensis", category: TreatmentCategory::Biologique, price: 8000.0, dose: "2g/L", efficacy: 65.0 },
    TreatmentProduct { name: "Extrait de neem", category: TreatmentCategory::Biologique, price: 3000.0, dose: "10ml/L", efficacy: 60.0 },
    TreatmentProduct { name: "Savon noir", category: TreatmentCategory::Biologique, price: 1000.0, dose: "20g/L", efficacy: 50.0 },
    TreatmentProduct { name: "Cendre de bois", category: TreatmentCategory::Traditionnel, price: 500.0, dose: "100g/L", efficacy: 45.0 },
    TreatmentProduct { name: "Extrait ail-piment", category: TreatmentCategory::Traditionnel, price: 800.0, dose: "50ml/L", efficacy: 55.0 },
    TreatmentProduct { name: "Urine fermentée", category: TreatmentCategory::Traditionnel, price: 0.0, dose: "1:10", efficacy: 40.0 },
    TreatmentProduct { name: "Infusion feuilles papayer", category: TreatmentCategory::Traditionnel, price: 200.0, dose: "100g/L", efficacy: 35.0 },
    TreatmentProduct { name: "Mancozèbe", category: TreatmentCategory::Chimique, price: 15000.0, dose: "2.5g/L", efficacy: 85.0 },
    TreatmentProduct { name: "Lambda-cyhalothrine", category: TreatmentCategory::Chimique, price: 12000.0, dose: "1ml/L", efficacy: 90.0 },
    TreatmentProduct { name: "Oxychlorure de cuivre", category: TreatmentCategory::Chimique, price: 8000.0, dose: "3g/L", efficacy: 80.0 },
    TreatmentProduct { name: "Profénofos", category: TreatmentCategory::Chimique, price: 18000.0, dose: "2ml/L", efficacy: 88.0 },
];

pub fn treatment_products(category: TreatmentCategory) -> impl Iterator<Item = &'static TreatmentProduct> {
    TREATMENT_PRODUCTS.iter().filter(move |p| p.category == category)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreventionCategory {
    #[serde(rename = "culturales")]
    Culturales,
    #[serde(rename = "biologiques")]
    Biologiques,
    #[serde(rename = "physiques")]
    Physiques,
    #[serde(rename = "sanitaires")]
    Sanitaires,
    #[serde(rename = "nutritionnelles")]
    Nutritionnelles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreventionStrategy {
    pub name: &'static str,
    pub category: PreventionCategory,
    pub cost: f64,
    pub efficacy: f64,
    pub description: &'static str,
}

static PREVENTION_STRATEGIES: [PreventionStrategy; 20] = [
    PreventionStrategy { name: "Rotation des cultures", category: PreventionCategory::Culturales, cost: 0.0, efficacy: 70.0, description: "Briser le cycle des parasites" },
    PreventionStrategy { name: "Densité optimale", category: PreventionCategory::Culturales, cost: 5000.0, efficacy: 60.0, description: "Réduire humidité et compétition" },
    PreventionStrategy { name: "Associations culturales", category: PreventionCategory::Culturales, cost: 2000.0, efficacy: 65.0, description: "Plantes répulsives ou attractives" },
    PreventionStrategy { name: "Dates de semis", category: PreventionCategory::Culturales, cost: 0.0, efficacy: 55.0, description: "Éviter les pics d'infestation" },
    PreventionStrategy { name: "Auxiliaires naturels", category: PreventionCategory::Biologiques, cost: 10000.0, efficacy: 75.0, description: "Prédateurs et parasitoïdes" },
    PreventionStrategy { name: "Plantes pièges", category: PreventionCategory::Biologiques, cost: 3000.0, efficacy: 60.0, description: "Concentrer les parasites" },
    PreventionStrategy { name: "Biodiversité fonctionnelle", category: PreventionCategory::Biologiques, cost: 5000.0, efficacy: 70.0, description: "Haies, bandes fleuries" },
    PreventionStrategy { name: "Micro-organismes bénéfiques", category: PreventionCategory::Biologiques, cost: 8000.0, efficacy: 65.0, description: "Mycorhizes, rhizobactéries" },
    PreventionStrategy { name: "Paillage", category: PreventionCategory::Physiques, cost: 15000.0, efficacy: 50.0, description: "Limiter mauvaises herbes et maladies sol" },
    PreventionStrategy { name: "Filets anti-insectes", category: PreventionCategory::Physiques, cost: 25000.0, efficacy: 85.0, description: "Barrière physique" },
    PreventionStrategy { name: "Pièges colorés", category: PreventionCategory::Physiques, cost: 8000.0, efficacy: 60.0, description: "Capture des adultes volants" },
    PreventionStrategy { name: "Barrières végétales", category: PreventionCategory::Physiques, cost: 12000.0, efficacy: 55.0, description: "Haies répulsives" },
    PreventionStrategy { name: "Assainissement", category: PreventionCategory::Sanitaires, cost: 2000.0, efficacy: 80.0, description: "Élimination résidus infectés" },
    PreventionStrategy { name: "Désinfection outils", category: PreventionCategory::Sanitaires, cost: 1000.0, efficacy: 70.0, description: "Éviter propagation" },
    PreventionStrategy { name: "Quarantaine nouvelles plants", category: PreventionCategory::Sanitaires, cost: 500.0, efficacy: 90.0, description: "Contrôle introduction" },
    PreventionStrategy { name: "Surveillance régulière", category: PreventionCategory::Sanitaires, cost: 3000.0, efficacy: 85.0, description: "Détection précoce" },
    PreventionStrategy { name: "Équilibre NPK", category: PreventionCategory::Nutritionnelles, cost: 20000.0, efficacy: 65.0, description: "Plantes plus résistantes" },
    PreventionStrategy { name: "Amendements organiques", category: PreventionCategory::Nutritionnelles, cost: 15000.0, efficacy: 70.0, description: "Amélioration sol et résistance" },
    PreventionStrategy { name: "Oligoéléments", category: PreventionCategory::Nutritionnelles, cost: 8000.0, efficacy: 60.0, description: "Stimulation défenses naturelles" },
    PreventionStrategy { name: "Compost de qualité", category: PreventionCategory::Nutritionnelles, cost: 10000.0, efficacy: 68.0, description: "Nutrition équilibrée" },
];

pub fn prevention_strategies(
    category: PreventionCategory,
) -> impl Iterator<Item = &'static PreventionStrategy> {
    PREVENTION_STRATEGIES.iter().filter(move |s| s.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diseases_for_known_crops() {
        assert_eq!(diseases_for(Crop::Cacao).len(), 3);
        assert_eq!(diseases_for(Crop::Mais).len(), 2);
        assert_eq!(diseases_for(Crop::Manioc).len(), 1);
        assert!(diseases_for(Crop::Tomate).is_empty());
    }

    #[test]
    fn test_disease_catalog_sets_are_non_empty() {
        for crop in Crop::ALL {
            for disease in diseases_for(crop) {
                assert!(!disease.symptoms.is_empty());
                assert!(!disease.affected_parts.is_empty());
                assert!(!disease.conditions.is_empty());
            }
        }
    }

    #[test]
    fn test_each_treatment_category_has_four_products() {
        for category in [
            TreatmentCategory::Biologique,
            TreatmentCategory::Traditionnel,
            TreatmentCategory::Chimique,
        ] {
            assert_eq!(treatment_products(category).count(), 4);
        }
    }

    #[test]
    fn test_severity_parse_accepts_both_genders() {
        assert_eq!(Severity::parse("modéré").unwrap(), Severity::Moderee);
        assert_eq!(Severity::parse("ELEVEE").unwrap(), Severity::Elevee);
        assert!(Severity::parse("grave").is_err());
    }

    #[test]
    fn test_pests_for_unlisted_crop_is_empty() {
        assert!(pests_for(Crop::Plantain).is_empty());
        assert_eq!(pests_for(Crop::Mais).len(), 2);
    }
}
