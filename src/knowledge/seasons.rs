//! Seasonal calendar by climate zone.

use super::regions::ClimateZone;
use super::{Crop, Range, Region};
use crate::error::{AgroError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Share of the annual rainfall that falls during the rainy months.
const RAINY_SEASON_SHARE: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    #[serde(rename = "saison_sèche")]
    SaisonSeche,
    #[serde(rename = "saison_des_pluies")]
    SaisonDesPluies,
    #[serde(rename = "petite_saison_sèche")]
    PetiteSaisonSeche,
    #[serde(rename = "grande_saison_sèche")]
    GrandeSaisonSeche,
}

impl Season {
    pub fn is_rainy(&self) -> bool {
        matches!(self, Season::SaisonDesPluies)
    }
}

/// Season for a calendar month (1-12) in a region.
pub fn season_for(region: Region, month: u32) -> Season {
    match region.climate_zone() {
        ClimateZone::Sahelian => match month {
            6..=9 => Season::SaisonDesPluies,
            _ => Season::SaisonSeche,
        },
        ClimateZone::Forest => match month {
            3..=5 | 8..=11 => Season::SaisonDesPluies,
            6 | 7 => Season::PetiteSaisonSeche,
            _ => Season::GrandeSaisonSeche,
        },
        ClimateZone::Highland => match month {
            3..=5 | 8..=10 => Season::SaisonDesPluies,
            _ => Season::SaisonSeche,
        },
    }
}

/// Field work recommended for a month.
pub fn seasonal_activities(region: Region, month: u32) -> &'static [&'static str] {
    if region.climate_zone() == ClimateZone::Sahelian {
        return match month {
            6..=9 => &["plantation", "sarclage", "fertilisation"],
            _ => &["récolte", "préparation_sol", "commercialisation"],
        };
    }
    match month {
        3..=5 | 8 | 9 => &["plantation", "entretien_cultures"],
        12 | 1 | 2 => &["préparation_sol", "récolte_cultures_pérennes"],
        _ => &["entretien_général", "surveillance_sanitaire"],
    }
}

/// Cycle length adjusted for regional temperature: faster in the hot north,
/// slower in the western highlands.
pub fn adjusted_cycle_days(crop: Crop, region: Region) -> i64 {
    let base = crop.profile().map(|p| p.cycle_days).unwrap_or(120) as f64;
    let factor = match region {
        Region::Nord | Region::ExtremeNord => 0.9,
        Region::Ouest | Region::NordOuest => 1.1,
        _ => 1.0,
    };
    (base * factor) as i64
}

pub fn estimate_maturity(planting: NaiveDate, crop: Crop, region: Region) -> NaiveDate {
    planting + Duration::days(adjusted_cycle_days(crop, region))
}

/// Months (1-12) of the main rainy season start, used as planting windows.
pub fn planting_months(region: Region) -> &'static [u32] {
    match region.climate_zone() {
        ClimateZone::Sahelian => &[6, 7],
        ClimateZone::Forest => &[3, 4, 8, 9],
        ClimateZone::Highland => &[3, 4, 8],
    }
}

fn check_month(month: u32) -> Result<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(AgroError::invalid("month", format!("{month} is not a month number")))
    }
}

/// Long-run climate of a region for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateNormals {
    pub region: Region,
    pub month: u32,
    pub climate: &'static str,
    pub season: Season,
    pub temperature: Range,
    /// Expected rainfall for the month, in mm.
    pub rainfall_mm: f64,
    pub activities: &'static [&'static str],
}

/// Regional normals for `month`: the annual rainfall is spread over the
/// rainy months, with a small remainder over the dry ones.
pub fn climate_normals(region: Region, month: u32) -> Result<ClimateNormals> {
    let month = check_month(month)?;
    let profile = region.profile();
    let season = season_for(region, month);

    let rainy_months = (1..=12).filter(|m| season_for(region, *m).is_rainy()).count() as f64;
    let rainfall_mm = if season.is_rainy() {
        profile.annual_rainfall_mm * RAINY_SEASON_SHARE / rainy_months
    } else {
        profile.annual_rainfall_mm * (1.0 - RAINY_SEASON_SHARE) / (12.0 - rainy_months)
    };

    Ok(ClimateNormals {
        region,
        month,
        climate: profile.climate,
        season,
        temperature: profile.temperature,
        rainfall_mm: rainfall_mm.round(),
        activities: seasonal_activities(region, month),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropCalendar {
    pub crop: Crop,
    pub region: Region,
    pub planting_date: NaiveDate,
    pub season_at_planting: Season,
    pub in_planting_window: bool,
    pub planting_months: &'static [u32],
    pub cycle_days: i64,
    pub expected_harvest: NaiveDate,
}

/// Planting window check and expected harvest date for a planting.
pub fn crop_calendar(crop: Crop, region: Region, planting: NaiveDate) -> CropCalendar {
    let months = planting_months(region);
    CropCalendar {
        crop,
        region,
        planting_date: planting,
        season_at_planting: season_for(region, planting.month()),
        in_planting_window: months.contains(&planting.month()),
        planting_months: months,
        cycle_days: adjusted_cycle_days(crop, region),
        expected_harvest: estimate_maturity(planting, crop, region),
    }
}
