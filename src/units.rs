//! Currency, unit constants and small text helpers shared by every calculator.

use crate::error::{AgroError, Result};
use regex::Regex;

/// Currency of every monetary amount in the crate.
pub const CURRENCY: &str = "FCFA";
pub const AREA_UNIT: &str = "hectare";
pub const WEIGHT_UNIT: &str = "kg";
pub const TEMPERATURE_UNIT: &str = "celsius";

pub const KG_PER_TONNE: f64 = 1000.0;
pub const GRAMS_PER_KG: f64 = 1000.0;
pub const M2_PER_HECTARE: f64 = 10_000.0;

/// Upper bound on free text accepted from a farmer.
pub const MAX_INPUT_CHARS: usize = 1000;

const CONVERSIONS: &[(&str, &str, f64)] = &[
    ("ha", "m2", M2_PER_HECTARE),
    ("ha", "acre", 2.47105),
    ("acre", "ha", 0.404686),
    ("kg", "t", 1.0 / KG_PER_TONNE),
    ("kg", "lb", 2.20462),
    ("lb", "kg", 0.453592),
    ("l", "m3", 0.001),
    ("gal", "l", 3.78541),
];

/// Format an amount in FCFA with a space as thousands separator.
///
/// ```
/// assert_eq!(agrocam::units::format_currency(1_250_000.4), "1 250 000 FCFA");
/// ```
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped} {CURRENCY}")
    } else {
        format!("{grouped} {CURRENCY}")
    }
}

/// Convert between the area, weight and volume units used by farmers.
///
/// Pairs missing from the table are tried in reverse before failing.
pub fn convert_units(value: f64, from_unit: &str, to_unit: &str) -> Result<f64> {
    let from = from_unit.to_lowercase();
    let to = to_unit.to_lowercase();

    if from == to {
        return Ok(value);
    }

    if let Some((_, _, factor)) = CONVERSIONS.iter().find(|(f, t, _)| *f == from && *t == to) {
        return Ok(value * factor);
    }

    if let Some((_, _, factor)) = CONVERSIONS.iter().find(|(f, t, _)| *f == to && *t == from) {
        return Ok(value / factor);
    }

    Err(AgroError::invalid("unit", format!("no conversion from {from_unit} to {to_unit}")))
}

/// Cleans farmer-supplied text before it reaches a prompt.
#[derive(Debug, Clone)]
pub struct InputSanitizer {
    forbidden: Regex,
    whitespace: Regex,
}

impl InputSanitizer {
    pub fn new() -> Result<Self> {
        let forbidden = Regex::new(r#"[<>"';]"#)
            .map_err(|e| AgroError::Config(format!("sanitizer pattern: {e}")))?;
        let whitespace =
            Regex::new(r"\s+").map_err(|e| AgroError::Config(format!("sanitizer pattern: {e}")))?;
        Ok(Self {
            forbidden,
            whitespace,
        })
    }

    /// Strip markup characters, cap the length and collapse whitespace.
    pub fn clean(&self, text: &str) -> String {
        let stripped = self.forbidden.replace_all(text, "");
        let capped: String = stripped.chars().take(MAX_INPUT_CHARS).collect();
        self.whitespace.replace_all(&capped, " ").trim().to_string()
    }
}
