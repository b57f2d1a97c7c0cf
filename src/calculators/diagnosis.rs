//! Disease and pest scoring against the crop health catalogs.
//!
//! A candidate's probability is a weighted average of up to three partial
//! matches. Partials whose input is missing are skipped and their weight leaves
//! the denominator, so a farmer who only describes symptoms is scored on
//! symptoms alone.

use super::{descending, WeightedScore};
use crate::knowledge::health::{diseases_for, pests_for, Severity};
use crate::knowledge::{normalize_key, Crop};
use serde::{Deserialize, Serialize};
use tracing::debug;

const SYMPTOM_WEIGHT: f64 = 40.0;
const PART_WEIGHT: f64 = 30.0;
const CONDITION_WEIGHT: f64 = 30.0;

const PEST_DESCRIPTION_WEIGHT: f64 = 30.0;
const PEST_DAMAGE_WEIGHT: f64 = 40.0;
const PEST_LOCATION_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DiagnosisQuery {
    pub crop: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub affected_parts: Vec<String>,
    /// Free-text description of weather and field conditions.
    #[serde(default)]
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvidence {
    pub symptoms: Vec<&'static str>,
    pub affected_parts: Vec<&'static str>,
    pub conditions: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticCandidate {
    pub disease: &'static str,
    pub agent: &'static str,
    pub severity: Severity,
    pub treatments: &'static [&'static str],
    /// 0-100.
    pub probability: f64,
    pub evidence: MatchEvidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisReport {
    pub crop: String,
    pub candidates: Vec<DiagnosticCandidate>,
    pub most_likely: Option<&'static str>,
    pub confidence: f64,
}

/// Known entries found in the observations.
///
/// `contains(observation, known)` decides a hit; returns `None` when there is
/// nothing to compare against.
fn match_fraction(
    known: &'static [&'static str],
    observations: &[String],
    contains: impl Fn(&str, &str) -> bool,
) -> (Option<f64>, Vec<&'static str>) {
    if observations.is_empty() || known.is_empty() {
        return (None, Vec::new());
    }
    let normalized: Vec<String> = observations.iter().map(|o| normalize_key(o)).collect();
    let hits: Vec<&'static str> = known
        .iter()
        .copied()
        .filter(|k| {
            let key = normalize_key(k);
            normalized.iter().any(|o| contains(o, &key))
        })
        .collect();
    (Some(hits.len() as f64 / known.len() as f64), hits)
}

fn non_blank(text: &Option<String>) -> Vec<String> {
    text.iter().filter(|t| !t.trim().is_empty()).cloned().collect()
}

/// Rank the crop's diseases against the farmer's observations.
///
/// An unknown crop, or one without catalog entries, yields an empty report
/// with zero confidence.
pub fn diagnose_disease(query: &DiagnosisQuery) -> DiagnosisReport {
    let diseases = match Crop::from_name(&query.crop) {
        Some(crop) => diseases_for(crop),
        None => {
            debug!("Unknown crop '{}' for diagnosis", query.crop);
            &[]
        }
    };

    let symptoms: Vec<String> =
        query.symptoms.iter().filter(|s| !s.trim().is_empty()).cloned().collect();
    let parts: Vec<String> =
        query.affected_parts.iter().filter(|p| !p.trim().is_empty()).cloned().collect();
    let conditions = non_blank(&query.conditions);

    let mut candidates: Vec<DiagnosticCandidate> = diseases
        .iter()
        .map(|disease| {
            let (symptom_fraction, symptom_hits) =
                match_fraction(disease.symptoms, &symptoms, |obs, known| obs.contains(known));
            let (part_fraction, part_hits) =
                match_fraction(disease.affected_parts, &parts, |obs, known| obs == known);
            let (condition_fraction, condition_hits) =
                match_fraction(disease.conditions, &conditions, |obs, known| obs.contains(known));

            let mut score = WeightedScore::default();
            score.add(SYMPTOM_WEIGHT, symptom_fraction);
            score.add(PART_WEIGHT, part_fraction);
            score.add(CONDITION_WEIGHT, condition_fraction);

            DiagnosticCandidate {
                disease: disease.name,
                agent: disease.agent,
                severity: disease.severity,
                treatments: disease.treatments,
                probability: score.percent(),
                evidence: MatchEvidence {
                    symptoms: symptom_hits,
                    affected_parts: part_hits,
                    conditions: condition_hits,
                },
            }
        })
        .collect();

    candidates.sort_by(|a, b| descending(a.probability, b.probability));

    let confidence = candidates.first().map(|c| c.probability).unwrap_or(0.0);
    let most_likely = candidates.first().filter(|c| c.probability > 0.0).map(|c| c.disease);

    DiagnosisReport {
        crop: query.crop.clone(),
        candidates,
        most_likely,
        confidence,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PestQuery {
    pub crop: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub damage: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PestCandidate {
    pub pest: &'static str,
    pub scientific_name: &'static str,
    pub probability: f64,
    pub lifecycle: &'static str,
    pub peak_season: &'static str,
    pub economic_impact: &'static str,
    pub damage_patterns: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PestReport {
    pub crop: String,
    pub candidates: Vec<PestCandidate>,
    pub most_likely: Option<&'static str>,
    pub confidence: f64,
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| normalize_key(w.trim_matches(|c: char| c == ',' || c == '.')))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Share of the farmer's description words that echo the catalog description.
fn description_fraction(observed: &str, catalog: &str) -> Option<f64> {
    let observed = words(observed);
    if observed.is_empty() {
        return None;
    }
    let catalog = words(catalog);
    let hits = observed.iter().filter(|w| catalog.iter().any(|c| w.contains(c.as_str()))).count();
    Some(hits as f64 / observed.len() as f64)
}

/// Rank the crop's pests from a description, the damage seen and where it was found.
pub fn diagnose_pest(query: &PestQuery) -> PestReport {
    let pests = Crop::from_name(&query.crop).map(pests_for).unwrap_or(&[]);
    let damage = non_blank(&query.damage);
    let location = non_blank(&query.location);

    let mut candidates: Vec<PestCandidate> = pests
        .iter()
        .map(|pest| {
            let mut score = WeightedScore::default();
            score.add(
                PEST_DESCRIPTION_WEIGHT,
                query.description.as_deref().and_then(|d| description_fraction(d, pest.description)),
            );
            score.add(
                PEST_DAMAGE_WEIGHT,
                match_fraction(pest.damage, &damage, |obs, known| obs.contains(known)).0,
            );
            score.add(
                PEST_LOCATION_WEIGHT,
                match_fraction(pest.location, &location, |obs, known| obs.contains(known)).0,
            );

            PestCandidate {
                pest: pest.name,
                scientific_name: pest.scientific_name,
                probability: score.percent(),
                lifecycle: pest.lifecycle,
                peak_season: pest.peak_season,
                economic_impact: pest.economic_impact,
                damage_patterns: pest.damage,
            }
        })
        .collect();

    candidates.sort_by(|a, b| descending(a.probability, b.probability));

    let confidence = candidates.first().map(|c| c.probability).unwrap_or(0.0);
    let most_likely = candidates.first().filter(|c| c.probability > 0.0).map(|c| c.pest);

    PestReport {
        crop: query.crop.clone(),
        candidates,
        most_likely,
        confidence,
    }
}
