//! Market price bands, sales channels and investment opportunities.

use super::{parse_label, Crop};
use crate::error::Result;
use serde::Serialize;

/// Farm-gate reference prices in FCFA/kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Band used for crops without market data.
pub const DEFAULT_PRICE_BAND: PriceBand = PriceBand {
    min: 100.0,
    max: 500.0,
    average: 300.0,
};

pub fn price_band(crop: Crop) -> PriceBand {
    match crop {
        Crop::Cacao => PriceBand { min: 1000.0, max: 1500.0, average: 1200.0 },
        Crop::Cafe => PriceBand { min: 1500.0, max: 2500.0, average: 2000.0 },
        Crop::Manioc => PriceBand { min: 150.0, max: 300.0, average: 200.0 },
        Crop::Mais => PriceBand { min: 200.0, max: 400.0, average: 300.0 },
        Crop::Plantain => PriceBand { min: 100.0, max: 200.0, average: 150.0 },
        Crop::Arachide => PriceBand { min: 600.0, max: 1000.0, average: 800.0 },
        _ => DEFAULT_PRICE_BAND,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketType {
    #[serde(rename = "producteur")]
    Producteur,
    #[serde(rename = "gros")]
    Gros,
    #[serde(rename = "détail")]
    Detail,
    #[serde(rename = "export")]
    Export,
}

impl MarketType {
    pub fn parse(raw: &str) -> Result<Self> {
        parse_label(
            raw,
            "market_type",
            &[
                ("producteur", MarketType::Producteur),
                ("gros", MarketType::Gros),
                ("détail", MarketType::Detail),
                ("export", MarketType::Export),
            ],
        )
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            MarketType::Producteur => 0.7,
            MarketType::Gros => 1.0,
            MarketType::Detail => 1.4,
            MarketType::Export => 1.2,
        }
    }
}

/// Price factor for a calendar month: lean season (June to August) and harvest glut
/// (November to January).
pub fn seasonal_price_factor(month: u32) -> f64 {
    match month {
        6..=8 => 1.2,
        11 | 12 | 1 => 0.9,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SalesChannelKind {
    #[serde(rename = "marché_local")]
    MarcheLocal,
    #[serde(rename = "coopérative")]
    Cooperative,
    #[serde(rename = "grossiste")]
    Grossiste,
    #[serde(rename = "export")]
    Export,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesChannel {
    pub kind: SalesChannelKind,
    /// Price obtained relative to the average band price.
    pub relative_price: f64,
    pub delivery_days: u32,
    /// Transport cost as a share of the band price, per kg.
    pub transport_ratio: f64,
    pub advantages: &'static [&'static str],
    pub drawbacks: &'static [&'static str],
}

pub static SALES_CHANNELS: [SalesChannel; 4] = [
    SalesChannel {
        kind: SalesChannelKind::MarcheLocal,
        relative_price: 0.8,
        delivery_days: 1,
        transport_ratio: 0.02,
        advantages: &["Paiement immédiat", "Pas d'intermédiaire"],
        drawbacks: &["Prix plus bas", "Quantités limitées"],
    },
    SalesChannel {
        kind: SalesChannelKind::Cooperative,
        relative_price: 0.9,
        delivery_days: 7,
        transport_ratio: 0.01,
        advantages: &["Prix négocié", "Soutien technique"],
        drawbacks: &["Délai de paiement", "Conditions qualité"],
    },
    SalesChannel {
        kind: SalesChannelKind::Grossiste,
        relative_price: 0.85,
        delivery_days: 3,
        transport_ratio: 0.03,
        advantages: &["Gros volumes", "Régularité"],
        drawbacks: &["Négociation difficile", "Dépendance"],
    },
    SalesChannel {
        kind: SalesChannelKind::Export,
        relative_price: 1.2,
        delivery_days: 30,
        transport_ratio: 0.08,
        advantages: &["Prix élevé", "Devise"],
        drawbacks: &["Exigences qualité", "Procédures complexes"],
    },
];

pub fn sales_channel(kind: SalesChannelKind) -> &'static SalesChannel {
    // SALES_CHANNELS is declared in variant order
    &SALES_CHANNELS[kind as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Potential {
    #[serde(rename = "faible")]
    Faible,
    #[serde(rename = "modéré")]
    Modere,
    #[serde(rename = "élevé")]
    Eleve,
    #[serde(rename = "très élevé")]
    TresEleve,
}

impl Potential {
    pub fn score(&self) -> f64 {
        match self {
            Potential::TresEleve => 5.0,
            Potential::Eleve => 4.0,
            Potential::Modere => 3.0,
            Potential::Faible => 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub name: &'static str,
    pub sector: &'static str,
    pub potential: Potential,
    pub min_investment: f64,
    /// Expected return on investment, percent.
    pub roi_percent_low: f64,
    pub roi_percent_high: f64,
    pub target_market: &'static str,
}

pub static OPPORTUNITIES: [Opportunity; 7] = [
    Opportunity {
        name: "moringa",
        sector: "cultures_émergentes",
        potential: Potential::TresEleve,
        min_investment: 200_000.0,
        roi_percent_low: 200.0,
        roi_percent_high: 300.0,
        target_market: "export, nutrition",
    },
    Opportunity {
        name: "avocat",
        sector: "cultures_émergentes",
        potential: Potential::Eleve,
        min_investment: 500_000.0,
        roi_percent_low: 150.0,
        roi_percent_high: 200.0,
        target_market: "urbain, export",
    },
    Opportunity {
        name: "spiruline",
        sector: "cultures_émergentes",
        potential: Potential::Eleve,
        min_investment: 1_000_000.0,
        roi_percent_low: 300.0,
        roi_percent_high: 400.0,
        target_market: "santé, export",
    },
    Opportunity {
        name: "farine_manioc",
        sector: "transformation",
        potential: Potential::TresEleve,
        min_investment: 300_000.0,
        roi_percent_low: 100.0,
        roi_percent_high: 150.0,
        target_market: "boulangerie, export",
    },
    Opportunity {
        name: "huile_palme_artisanale",
        sector: "transformation",
        potential: Potential::Eleve,
        min_investment: 150_000.0,
        roi_percent_low: 80.0,
        roi_percent_high: 120.0,
        target_market: "local, régional",
    },
    Opportunity {
        name: "location_équipement",
        sector: "services",
        potential: Potential::Eleve,
        min_investment: 800_000.0,
        roi_percent_low: 60.0,
        roi_percent_high: 100.0,
        target_market: "petits agriculteurs",
    },
    Opportunity {
        name: "formation_conseil",
        sector: "services",
        potential: Potential::Modere,
        min_investment: 50_000.0,
        roi_percent_low: 50.0,
        roi_percent_high: 80.0,
        target_market: "agriculteurs, coopératives",
    },
];
