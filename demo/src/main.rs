//! DIARISK: Diabetes Risk Assessment Demo CLI
//!
//! Sends one hard-coded example patient to the configured completion
//! endpoint, validates the reply, and prints the outcome.
//!
//! Usage:
//!   cargo run -p demo
//!   cargo run -p demo -- --config diarisk.toml
//!   cargo run -p demo -- --json
//!
//! The API key is read from `OPENAI_API_KEY` (or the variable named by
//! `api_key_env` in the config file). A `.env` file in the working directory
//! is loaded first.

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use diarisk_client::{get_risk_with_config, ServiceConfig};
use diarisk_contracts::{call::CallResult, patient::PatientRecord};

// ── CLI definition ────────────────────────────────────────────────────────────

/// DIARISK: LLM-backed diabetes risk assessment with validated output.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "DIARISK diabetes risk assessment demo",
    long_about = "Requests a diabetes risk assessment for an example patient from an\n\
                  OpenAI-compatible endpoint and validates the structured reply."
)]
struct Cli {
    /// TOML service configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full call result as JSON instead of a report.
    #[arg(long)]
    json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    dotenvy::dotenv().ok();

    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let patient = example_patient();

    let result = match ServiceConfig::load(cli.config.as_deref()) {
        Ok(config) => {
            debug!(model = %config.model, base_url = %config.base_url, "service configured");
            get_risk_with_config(&patient, &config)
        }
        Err(e) => CallResult::failed(&e),
    };

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Demo error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_report(&result);
    }
}

// ── Example data ──────────────────────────────────────────────────────────────

/// A fictional patient with borderline glucose and a family history.
fn example_patient() -> PatientRecord {
    PatientRecord::new()
        .with("age", 45)
        .with("bmi", 28.5)
        .with("glucose_level", 110)
        .with("family_history", "Father had type 2 diabetes")
        .with("symptoms", json!(["increased thirst", "frequent urination"]))
        .with("blood_pressure", "130/85")
        .with("cholesterol", json!({ "total": 210, "hdl": 45, "ldl": 130 }))
        .with("physical_activity", "sedentary")
}

// ── Report ────────────────────────────────────────────────────────────────────

fn print_report(result: &CallResult) {
    println!();
    println!("Diabetes Risk Assessment:");
    println!("========================================");

    match result.validation.data() {
        Some(assessment) => {
            println!("  Risk level:       {}", assessment.risk_level());
            println!("  Key factors:");
            for factor in assessment.key_factors() {
                println!("    - {}", factor);
            }
            println!("  Recommendations:");
            for rec in assessment.recommendations() {
                println!("    - {}", rec);
            }
        }
        None => {
            let error = result.validation.error_message().unwrap_or_default();
            println!("  Validation:       FAILED");
            println!("  Error:            {}", error);
            match &result.raw {
                Some(raw) => {
                    println!("  Raw model output:");
                    for line in raw.lines() {
                        println!("    {}", line);
                    }
                }
                None => println!("  Raw model output: (none; the call failed)"),
            }
        }
    }
    println!();
}
