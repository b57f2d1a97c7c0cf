//! Production costs, profitability, prices and sales planning.
//!
//! Monetary amounts are FCFA, quantities are kilograms and areas are hectares.

use super::{descending, require_non_negative, require_positive};
use crate::error::{AgroError, Result};
use crate::knowledge::crops::Crop;
use crate::knowledge::inputs::{
    InputLevel, ProductionSystem, FERTILIZER_LINE, PESTICIDE_LINE, PRODUCTION_COST_TEMPLATE,
    PROFITABILITY_COST_LINES,
};
use crate::knowledge::market::{
    price_band, sales_channel, seasonal_price_factor, MarketType, Opportunity, PriceBand,
    SalesChannelKind, DEFAULT_PRICE_BAND, OPPORTUNITIES,
};
use crate::knowledge::parse_label;
use crate::units::CURRENCY;
use serde::Serialize;

/// Yield assumed for crops without an agronomic profile, kg/ha.
pub const FALLBACK_YIELD_KG_HA: f64 = 1000.0;

const MAJOR_COST_DRIVERS: usize = 3;
const TOP_OPPORTUNITIES: usize = 5;
/// Quantity above which a patient seller is steered to export.
const EXPORT_MIN_KG: f64 = 1000.0;

fn band_for(crop: &str) -> PriceBand {
    Crop::from_name(crop).map(price_band).unwrap_or(DEFAULT_PRICE_BAND)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLine {
    pub item: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCategory {
    pub category: &'static str,
    pub lines: Vec<CostLine>,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionCostReport {
    pub crop: String,
    pub area_ha: f64,
    pub input_level: InputLevel,
    pub categories: Vec<CostCategory>,
    pub per_hectare: f64,
    pub total: f64,
    pub currency: &'static str,
    pub major_cost_drivers: Vec<(&'static str, f64)>,
}

pub fn calculate_production_costs(
    crop: &str,
    area_ha: f64,
    input_level: InputLevel,
) -> Result<ProductionCostReport> {
    let area_ha = require_positive("area_ha", area_ha)?;
    let factor = input_level.factor();

    let categories: Vec<CostCategory> = PRODUCTION_COST_TEMPLATE
        .iter()
        .map(|template| {
            let lines: Vec<CostLine> = template
                .items
                .iter()
                .map(|&(item, cost)| CostLine {
                    item,
                    amount: cost * factor,
                })
                .collect();
            let subtotal = lines.iter().map(|l| l.amount).sum();
            CostCategory {
                category: template.name,
                lines,
                subtotal,
            }
        })
        .collect();

    let per_hectare: f64 = categories.iter().map(|c| c.subtotal).sum();

    let mut drivers: Vec<(&'static str, f64)> =
        categories.iter().map(|c| (c.category, c.subtotal)).collect();
    drivers.sort_by(|a, b| descending(a.1, b.1));
    drivers.truncate(MAJOR_COST_DRIVERS);

    Ok(ProductionCostReport {
        crop: crop.to_string(),
        area_ha,
        input_level,
        categories,
        per_hectare,
        total: per_hectare * area_ha,
        currency: CURRENCY,
        major_cost_drivers: drivers,
    })
}

/// Quantity needed to cover costs at the going price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "kg")]
pub enum BreakEven {
    Kg(f64),
    /// No quantity covers the costs when the product sells for nothing.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilityReport {
    pub crop: String,
    pub area_ha: f64,
    pub production_system: ProductionSystem,
    pub cost_lines: Vec<(&'static str, f64)>,
    pub cost_per_hectare: f64,
    pub total_cost: f64,
    pub yield_per_hectare_kg: f64,
    pub total_yield_kg: f64,
    pub price_per_kg: f64,
    pub gross_revenue: f64,
    pub net_revenue: f64,
    /// `net / gross`, 0 when nothing is sold.
    pub profit_margin: f64,
    /// `net / cost`, 0 when nothing is spent.
    pub roi: f64,
    pub break_even: BreakEven,
}

impl ProfitabilityReport {
    pub fn profit_margin_percent(&self) -> f64 {
        self.profit_margin * 100.0
    }

    pub fn roi_percent(&self) -> f64 {
        self.roi * 100.0
    }
}

pub fn analyze_profitability(
    crop: &str,
    area_ha: f64,
    system: ProductionSystem,
) -> Result<ProfitabilityReport> {
    let area_ha = require_positive("area_ha", area_ha)?;
    let (fertilizer_factor, pesticide_factor) = system.input_factors();

    let cost_lines: Vec<(&'static str, f64)> = PROFITABILITY_COST_LINES
        .iter()
        .map(|(line, cost)| {
            let factor = match *line {
                FERTILIZER_LINE => fertilizer_factor,
                PESTICIDE_LINE => pesticide_factor,
                _ => 1.0,
            };
            (*line, cost * factor)
        })
        .collect();
    let cost_per_hectare: f64 = cost_lines.iter().map(|(_, c)| c).sum();
    let total_cost = cost_per_hectare * area_ha;

    let base_yield = Crop::from_name(crop)
        .and_then(|c| c.profile())
        .map(|p| p.base_yield_kg_ha)
        .unwrap_or(FALLBACK_YIELD_KG_HA);
    let yield_per_hectare_kg = base_yield * system.yield_factor();
    let total_yield_kg = yield_per_hectare_kg * area_ha;

    let price_per_kg = band_for(crop).average;
    let gross_revenue = total_yield_kg * price_per_kg;
    let net_revenue = gross_revenue - total_cost;

    let (profit_margin, roi, break_even) = ratios(gross_revenue, total_cost, price_per_kg);

    Ok(ProfitabilityReport {
        crop: crop.to_string(),
        area_ha,
        production_system: system,
        cost_lines,
        cost_per_hectare,
        total_cost,
        yield_per_hectare_kg,
        total_yield_kg,
        price_per_kg,
        gross_revenue,
        net_revenue,
        profit_margin,
        roi,
        break_even,
    })
}

/// Margin, ROI and break-even volume; a zero denominator yields 0 (or
/// `Unreachable`) instead of a division.
fn ratios(gross_revenue: f64, total_cost: f64, price_per_kg: f64) -> (f64, f64, BreakEven) {
    let net_revenue = gross_revenue - total_cost;
    let profit_margin = if gross_revenue > 0.0 { net_revenue / gross_revenue } else { 0.0 };
    let roi = if total_cost > 0.0 { net_revenue / total_cost } else { 0.0 };
    let break_even = if price_per_kg > 0.0 {
        BreakEven::Kg(total_cost / price_per_kg)
    } else {
        BreakEven::Unreachable
    };
    (profit_margin, roi, break_even)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Hausse,
    Baisse,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub crop: String,
    pub market_type: MarketType,
    pub month: u32,
    pub current_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub currency: &'static str,
    pub trend: PriceTrend,
}

/// Price for a crop on a market in a given month (1-12).
pub fn market_price_quote(crop: &str, market_type: MarketType, month: u32) -> Result<PriceQuote> {
    if !(1..=12).contains(&month) {
        return Err(AgroError::invalid("month", format!("{month} is not a month number")));
    }
    let band = band_for(crop);
    let seasonal = seasonal_price_factor(month);
    let factor = market_type.multiplier() * seasonal;
    let trend = if seasonal > 1.0 {
        PriceTrend::Hausse
    } else if seasonal < 1.0 {
        PriceTrend::Baisse
    } else {
        PriceTrend::Stable
    };

    Ok(PriceQuote {
        crop: crop.to_string(),
        market_type,
        month,
        current_price: (band.average * factor).round(),
        min_price: (band.min * factor).round(),
        max_price: (band.max * factor).round(),
        currency: CURRENCY,
        trend,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Normal,
    Patient,
}

impl Urgency {
    pub fn parse(raw: &str) -> Result<Self> {
        parse_label(
            raw,
            "urgency",
            &[
                ("urgent", Urgency::Urgent),
                ("normal", Urgency::Normal),
                ("patient", Urgency::Patient),
            ],
        )
    }

    fn channels(&self, quantity_kg: f64) -> [SalesChannelKind; 2] {
        match self {
            Urgency::Urgent => [SalesChannelKind::MarcheLocal, SalesChannelKind::Grossiste],
            Urgency::Patient if quantity_kg > EXPORT_MIN_KG => {
                [SalesChannelKind::Export, SalesChannelKind::Cooperative]
            }
            _ => [SalesChannelKind::Cooperative, SalesChannelKind::Grossiste],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueScenario {
    pub channel: SalesChannelKind,
    pub price_per_kg: f64,
    pub gross_revenue: f64,
    pub transport_cost: f64,
    pub net_revenue: f64,
    pub delivery_days: u32,
    pub advantages: &'static [&'static str],
    pub drawbacks: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesStrategy {
    pub crop: String,
    pub quantity_kg: f64,
    pub urgency: Urgency,
    pub scenarios: Vec<RevenueScenario>,
    pub recommended_channel: SalesChannelKind,
    pub estimated_best_revenue: f64,
}

/// Compare the channels suited to the seller's urgency and pick the best net revenue.
///
/// On equal net revenue the channel listed first wins.
pub fn recommend_sales_strategy(crop: &str, quantity_kg: f64, urgency: Urgency) -> Result<SalesStrategy> {
    let quantity_kg = require_non_negative("quantity_kg", quantity_kg)?;
    let base_price = band_for(crop).average;

    let scenarios: Vec<RevenueScenario> = urgency
        .channels(quantity_kg)
        .into_iter()
        .map(|kind| {
            let channel = sales_channel(kind);
            let price_per_kg = base_price * channel.relative_price;
            let gross_revenue = quantity_kg * price_per_kg;
            let transport_cost = quantity_kg * channel.transport_ratio * base_price;
            RevenueScenario {
                channel: kind,
                price_per_kg,
                gross_revenue,
                transport_cost,
                net_revenue: gross_revenue - transport_cost,
                delivery_days: channel.delivery_days,
                advantages: channel.advantages,
                drawbacks: channel.drawbacks,
            }
        })
        .collect();

    let best = scenarios
        .iter()
        .fold(None::<&RevenueScenario>, |best, s| match best {
            Some(b) if b.net_revenue >= s.net_revenue => Some(b),
            _ => Some(s),
        })
        .ok_or_else(|| AgroError::Agent("no sales channel available".to_string()))?;
    let recommended_channel = best.channel;
    let estimated_best_revenue = best.net_revenue;

    Ok(SalesStrategy {
        crop: crop.to_string(),
        quantity_kg,
        urgency,
        scenarios,
        recommended_channel,
        estimated_best_revenue,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOpportunity {
    pub opportunity: &'static Opportunity,
    pub score: f64,
}

/// Opportunities affordable within `budget`, best first. `None` means no budget limit.
pub fn rank_market_opportunities(budget: Option<f64>) -> Result<Vec<RankedOpportunity>> {
    if let Some(budget) = budget {
        require_non_negative("investment_budget", budget)?;
    }
    let mut ranked: Vec<RankedOpportunity> = OPPORTUNITIES
        .iter()
        .filter(|o| budget.map_or(true, |b| o.min_investment <= b))
        .map(|o| RankedOpportunity {
            opportunity: o,
            score: o.roi_percent_low / 20.0 + o.potential.score(),
        })
        .collect();
    ranked.sort_by(|a, b| descending(a.score, b.score));
    ranked.truncate(TOP_OPPORTUNITIES);
    Ok(ranked)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiSummary {
    pub total_return: f64,
    pub roi_percent: f64,
    /// `None` when the investment never pays back.
    pub payback_years: Option<f64>,
    pub annual_roi_percent: f64,
}

/// Simple multi-year return on an investment.
pub fn calculate_roi(investment: f64, annual_return: f64, years: u32) -> Result<RoiSummary> {
    let investment = require_non_negative("investment", investment)?;
    let annual_return = require_non_negative("annual_return", annual_return)?;
    let total_return = annual_return * years as f64;
    let roi_percent = if investment > 0.0 { total_return / investment * 100.0 } else { 0.0 };
    Ok(RoiSummary {
        total_return,
        roi_percent,
        payback_years: (annual_return > 0.0).then(|| investment / annual_return),
        annual_roi_percent: if years > 0 { roi_percent / years as f64 } else { 0.0 },
    })
}
