//! Deterministic agronomic calculators.
//!
//! Every calculator is a pure function from a typed query to a typed,
//! serialisable report. They never call the network; narratives are attached
//! afterwards by [`crate::narrative`].

pub mod diagnosis;
pub mod finance;
pub mod nutrients;
pub mod soil;
pub mod suitability;
pub mod treatment;
pub mod water;

use crate::error::{AgroError, Result};
use crate::knowledge::parse_label;
use serde::Serialize;
use std::cmp::Ordering;

/// How much the farmer is ready to spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Budget {
    #[serde(rename = "limité")]
    Limite,
    #[serde(rename = "modéré")]
    Modere,
    #[serde(rename = "élevé")]
    Eleve,
}

impl Budget {
    pub fn parse(raw: &str) -> Result<Self> {
        parse_label(
            raw,
            "budget",
            &[
                ("limité", Budget::Limite),
                ("modéré", Budget::Modere),
                ("élevé", Budget::Eleve),
            ],
        )
    }
}

/// Weighted average of partial scores where absent inputs leave the denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct WeightedScore {
    earned: f64,
    weight: f64,
}

impl WeightedScore {
    /// Record a partial score in `[0, 1]`, or skip it when `fraction` is `None`.
    pub fn add(&mut self, weight: f64, fraction: Option<f64>) {
        if let Some(fraction) = fraction {
            self.earned += weight * fraction.clamp(0.0, 1.0);
            self.weight += weight;
        }
    }

    pub fn percent(&self) -> f64 {
        if self.weight > 0.0 {
            self.earned / self.weight * 100.0
        } else {
            0.0
        }
    }
}

/// Descending order on a float key; equal keys keep their relative order under a stable sort.
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub(crate) fn require_positive(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AgroError::invalid(field, format!("{value} must be a positive number")))
    }
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AgroError::invalid(field, format!("{value} must not be negative")))
    }
}

pub(crate) fn require_ph(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=14.0).contains(&value) {
        Ok(value)
    } else {
        Err(AgroError::invalid(field, format!("{value} is outside the 0-14 pH scale")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_score_skips_absent_partials() {
        let mut score = WeightedScore::default();
        score.add(40.0, Some(0.5));
        score.add(30.0, None);
        score.add(30.0, None);
        assert_eq!(score.percent(), 50.0);
    }

    #[test]
    fn test_weighted_score_empty_is_zero() {
        assert_eq!(WeightedScore::default().percent(), 0.0);
    }

    #[test]
    fn test_weighted_score_renormalises() {
        let mut score = WeightedScore::default();
        score.add(40.0, Some(1.0));
        score.add(30.0, Some(0.0));
        assert!((score.percent() - 400.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_parse() {
        assert_eq!(Budget::parse("limite").unwrap(), Budget::Limite);
        assert!(Budget::parse("illimité").is_err());
    }

    #[test]
    fn test_validators() {
        assert!(require_positive("area_ha", 0.0).is_err());
        assert!(require_positive("area_ha", f64::NAN).is_err());
        assert_eq!(require_positive("area_ha", 2.5).unwrap(), 2.5);
        assert!(require_non_negative("yield", -1.0).is_err());
        assert!(require_ph("ph", 14.1).is_err());
        assert_eq!(require_ph("ph", 5.2).unwrap(), 5.2);
    }
}
