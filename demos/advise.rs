//! Ask the advisory agents a question.
//!
//! ```text
//! cargo run --example advise -- --query "Quel est le prix du cacao ?"
//! cargo run --example advise -- --interactive
//! ```
//!
//! Uses Gemini when `GEMINI_API_KEY` is set, otherwise a local Ollama server
//! with the model named by `OLLAMA_MODEL`.

use agrocam::config::AgentModels;
use agrocam::prelude::*;
use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SAMPLE_QUESTION: &str = "Mon cacao a des taches brunes sur les cabosses, que faire ?";

fn gateway(config: &mut AdvisorConfig) -> anyhow::Result<Arc<dyn LlmGateway>> {
    if let Some(key) = &config.gemini_api_key {
        let gateway = GeminiGateway::with_config(agrocam::llm::gateways::GeminiConfig::new(key.clone()))?;
        return Ok(Arc::new(gateway));
    }

    let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "qwen3:32b".to_string());
    println!("GEMINI_API_KEY not set, using Ollama model {model}");
    config.models = AgentModels {
        root: model.clone(),
        weather: model.clone(),
        crops: model.clone(),
        health: model.clone(),
        economic: model.clone(),
        resources: model,
    };
    Ok(Arc::new(OllamaGateway::new()?))
}

async fn answer(coordinator: &Coordinator, question: &str) {
    match coordinator.ask(question).await {
        Ok(answer) => {
            println!("\n[{}] {}\n", answer.domain, answer.correlation_id);
            println!("{}\n", answer.answer);
        }
        Err(e) => eprintln!("Erreur: {e}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = AdvisorConfig::from_env().context("loading configuration")?;
    let gateway = gateway(&mut config)?;
    let coordinator = Coordinator::from_config(gateway, &config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = args
        .iter()
        .position(|a| a == "--query")
        .and_then(|i| args.get(i + 1))
        .cloned();

    if args.iter().any(|a| a == "--interactive") {
        println!("Posez vos questions (ligne vide pour quitter).");
        let stdin = io::stdin();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
                break;
            }
            answer(&coordinator, &line).await;
        }
    } else {
        answer(&coordinator, query.as_deref().unwrap_or(SAMPLE_QUESTION)).await;
    }

    Ok(())
}
