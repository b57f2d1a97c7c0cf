//! Budget a small maize and cocoa farm with the calculators alone.
//!
//! ```text
//! cargo run --example farm_budget
//! cargo run --example farm_budget -- --narrate
//! ```
//!
//! With `--narrate` each result also gets a short explanation from the root
//! model; a slow or failing model only drops the explanation.

use agrocam::calculators::finance::{analyze_profitability, calculate_production_costs, calculate_roi};
use agrocam::calculators::nutrients::recommend_fertilizers;
use agrocam::calculators::Budget;
use agrocam::knowledge::inputs::{InputLevel, ProductionSystem, SoilFertility};
use agrocam::narrative::Narratable;
use agrocam::prelude::*;
use agrocam::units::format_currency;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn narrator(config: &AdvisorConfig) -> anyhow::Result<Narrator> {
    if !std::env::args().any(|a| a == "--narrate") {
        return Ok(Narrator::disabled());
    }

    let gateway: Arc<dyn LlmGateway> = match &config.gemini_api_key {
        Some(key) => Arc::new(GeminiGateway::with_config(
            agrocam::llm::gateways::GeminiConfig::new(key.clone()),
        )?),
        None => Arc::new(OllamaGateway::new()?),
    };
    let model = match config.gemini_api_key {
        Some(_) => config.models.root.clone(),
        None => std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "qwen3:32b".to_string()),
    };
    let broker = Arc::new(LlmBroker::new(model, gateway).with_max_retries(config.max_retries));
    Ok(Narrator::new(Arc::new(BrokerNarrator::new(broker)), config.narrative_timeout))
}

async fn show<T: Narratable>(narrator: &Narrator, result: T) {
    let advised = narrator.advise(result).await;
    println!("\n{}", advised.result.headline());
    match &advised.narrative {
        Some(text) => println!("{text}"),
        None => println!("(pas de commentaire: {:?})", advised.status),
    }
}

#[derive(Serialize)]
struct Line<'a> {
    item: &'a str,
    amount: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = AdvisorConfig::from_env()?;
    let narrator = narrator(&config)?;

    let maize_costs = calculate_production_costs("maïs", 2.0, InputLevel::Standard)?;
    let maize = analyze_profitability("maïs", 2.0, ProductionSystem::Ameliore)?;
    let cocoa = analyze_profitability("cacao", 3.0, ProductionSystem::Traditionnel)?;
    let fertilizer = recommend_fertilizers("maïs", 2.0, SoilFertility::Faible, Budget::Modere)?;

    let summary = [
        Line { item: "Coûts maïs (2 ha)", amount: format_currency(maize_costs.total) },
        Line { item: "Bénéfice net maïs", amount: format_currency(maize.net_revenue) },
        Line { item: "Bénéfice net cacao (3 ha)", amount: format_currency(cocoa.net_revenue) },
        Line { item: "Engrais maïs", amount: format_currency(fertilizer.total_cost) },
    ];
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!(
        "Marge maïs: {:.1} %, marge cacao: {:.1} %",
        maize.profit_margin_percent(),
        cocoa.profit_margin_percent()
    );

    let investment = maize_costs.total + fertilizer.total_cost;
    let roi = calculate_roi(investment, maize.net_revenue.max(0.0), 3)?;

    show(&narrator, maize_costs).await;
    show(&narrator, maize).await;
    show(&narrator, cocoa).await;
    show(&narrator, fertilizer).await;
    show(&narrator, roi).await;

    Ok(())
}
