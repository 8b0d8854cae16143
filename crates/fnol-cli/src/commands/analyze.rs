//! Analyze command - extract fields from a single document and route the claim.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use fnol_core::{open_store, ClaimAnalysis, ClaimAnalyzer, ClaimField, ClaimProcessor};

use super::{load_config, read_document};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file (PDF or text); the configured sample document when omitted
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Save the analyzed claim to the configured store
    #[arg(long)]
    save: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    match &args.input {
        Some(path) => info!("Analyzing file: {}", path.display()),
        None => info!(
            "Analyzing sample document: {}",
            config.extraction.sample_document.display()
        ),
    }

    let text = read_document(args.input.as_deref(), &config)?;
    let analyzer = ClaimAnalyzer::from_config(&config)?;
    let analysis = analyzer.analyze(&text);

    let output = format_analysis(&analysis, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.save {
        let store = open_store(&config.storage)?;
        let stored = store.save(&analysis)?;
        eprintln!("{} Saved claim #{}", style("✓").green(), stored.id);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_analysis(analysis: &ClaimAnalysis, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(analysis)?),
        OutputFormat::Text => Ok(format_text(analysis)),
    }
}

fn format_text(analysis: &ClaimAnalysis) -> String {
    let decision = &analysis.decision;
    let fields = &decision.extracted_fields;
    let mut output = String::new();

    output.push_str(&format!("Route: {}\n", decision.route));
    output.push_str(&format!("Reasoning: {}\n", decision.reasoning));

    if !decision.missing_fields.is_empty() {
        let missing: Vec<&str> = decision.missing_fields.iter().map(|f| f.name()).collect();
        output.push_str(&format!("Missing: {}\n", missing.join(", ")));
    }
    output.push('\n');

    output.push_str("Fields:\n");
    for field in ClaimField::MANDATORY.iter().chain([ClaimField::IncidentTime].iter()) {
        output.push_str(&format!(
            "  {:<18} {}\n",
            field.name(),
            fields.get(*field).unwrap_or("-")
        ));
    }

    output
}
