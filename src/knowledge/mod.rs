//! Static agronomic tables for Cameroon.
//!
//! All data is compiled in and read-only. Lookups by name go through
//! [`normalize_key`], so `"Maïs"`, `"mais"` and `"MAÏS"` resolve to the same
//! entry.

pub mod crops;
pub mod health;
pub mod inputs;
pub mod market;
pub mod regions;
pub mod seasons;

pub use crops::{Crop, CropProfile, NutrientUptake, WaterNeed};
pub use regions::{Region, RegionProfile, SoilProfile};

use crate::error::{AgroError, Result};
use serde::Serialize;

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from the nearest bound, 0 when inside.
    pub fn distance_outside(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Lower-case, strip French diacritics and unify separators.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            ' ' | '-' | '\'' => '_',
            other => other,
        })
        .collect()
}

/// Match a free-text label against `(label, value)` pairs after normalisation.
pub(crate) fn parse_label<T: Copy>(raw: &str, field: &str, table: &[(&str, T)]) -> Result<T> {
    let key = normalize_key(raw);
    table
        .iter()
        .find(|(label, _)| normalize_key(label) == key)
        .map(|(_, value)| *value)
        .ok_or_else(|| {
            let expected: Vec<&str> = table.iter().map(|(label, _)| *label).collect();
            AgroError::invalid(field, format!("'{raw}' is not one of {}", expected.join(", ")))
        })
}
