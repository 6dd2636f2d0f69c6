// Main entry point
use clap::Parser;
use colored::Colorize;
use nlq::domain::model::{TranslationRequest, TranslationResponse};
use nlq::infrastructure;
use nlq::infrastructure::config::{load_config, Config};
use nlq::infrastructure::engine::MemoryEngine;
use nlq::infrastructure::reference::StaticReference;
use nlq::interfaces::cli::Cli;
use nlq::presentation;
use nlq::state::AppState;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        infrastructure::config::generate_config_sample()?;
        return Ok(());
    }

    let Some(dataset_path) = cli
        .dataset
        .clone()
        .or_else(|| config.engine.dataset.as_ref().map(PathBuf::from))
    else {
        eprintln!(
            "{}",
            "No dataset configured. Set engine.dataset in the config or pass --dataset.".red()
        );
        std::process::exit(1);
    };
    let engine = MemoryEngine::load(&dataset_path)?;

    if cli.print_schema {
        println!("{}", engine.sdl());
        return Ok(());
    }

    let reference_path = cli
        .reference
        .clone()
        .or_else(|| config.reference.as_ref().map(PathBuf::from));
    let reference = match reference_path {
        Some(path) => Some(StaticReference::load(&path)?),
        None => None,
    };

    let state = AppState::new(config.clone(), engine, reference)?;

    if cli.status {
        print_status(&state, &dataset_path);
        return Ok(());
    }

    if cli.question.is_empty() {
        eprintln!("{}", "Please provide a question".red());
        std::process::exit(1);
    }

    let question = cli.question.join(" ");
    let request = TranslationRequest::new(question.clone());

    let outcome = tokio::select! {
        outcome = state.translator.translate(&request) => outcome,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted");
            std::process::exit(130);
        }
    };

    if cli.json {
        let response = TranslationResponse::from(outcome.clone());
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        let theme = presentation::theme::Theme::from_name(&config.theme);
        print!(
            "{}",
            presentation::render::format_outcome(&question, &outcome, &theme)
        );
    }

    if !outcome.is_data() {
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &infrastructure::config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn print_status(state: &AppState, dataset_path: &std::path::Path) {
    let config: &Config = &state.config;

    println!("{}", "nlq Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config: {}",
        infrastructure::config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    println!(
        "Dataset: {} ({} types)",
        dataset_path.display(),
        state.engine.schema().types.len()
    );
    println!("Model endpoint: {}", config.llm.base_url);
    println!("Model: {}", config.llm.model);

    if config.llm.resolved_api_key().is_some() {
        println!("API key: Configured");
    } else {
        println!("API key: {}", "Not configured".yellow());
    }
}
