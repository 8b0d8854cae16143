//! Batch command for analyzing multiple claim documents.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use fnol_core::{ClaimAnalysis, ClaimAnalyzer, ClaimProcessor, DocumentExtractor, Upload};

use super::load_config;

/// Extensions picked up from the glob.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "text"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of analyzing a single file.
struct BatchResult {
    path: PathBuf,
    analysis: Option<ClaimAnalysis>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} files to analyze", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = DocumentExtractor::new(&config.extraction.sample_document);
    let analyzer = ClaimAnalyzer::from_config(&config)?;
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = analyze_file(&path, &extractor, &analyzer);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(analysis) => results.push(BatchResult {
                path,
                analysis: Some(analysis),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to analyze {}: {}", path.display(), error_msg);
                    results.push(BatchResult {
                        path,
                        analysis: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to analyze {}: {}", path.display(), error_msg);
                    anyhow::bail!("Analysis failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        let mut taken = HashSet::new();
        for result in &results {
            if let Some(analysis) = &result.analysis {
                let output_path = output_dir.join(output_file_name(&result.path, &mut taken));
                fs::write(&output_path, serde_json::to_string_pretty(analysis)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!(
        "{} Analyzed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Per-file output name: the full input file name plus `.json`, so `a.txt` and
/// `a.pdf` never share an output. Repeats from other directories get a counter.
fn output_file_name(path: &Path, taken: &mut HashSet<String>) -> String {
    let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("claim");
    let mut name = format!("{}.json", file_name);
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("{}-{}.json", file_name, n);
        n += 1;
    }
    name
}

fn analyze_file(
    path: &Path,
    extractor: &DocumentExtractor,
    analyzer: &ClaimAnalyzer,
) -> anyhow::Result<ClaimAnalysis> {
    let upload = Upload::from_path(path)?;
    if upload.data.is_empty() {
        anyhow::bail!("File is empty");
    }

    let text = extractor.extract(Some(&upload))?;
    Ok(analyzer.analyze(&text))
}

fn write_summary(path: &Path, results: &[BatchResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "policy_number",
        "route",
        "missing_fields",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time_ms = result.processing_time_ms.to_string();

        if let Some(analysis) = &result.analysis {
            let decision = &analysis.decision;
            let missing: Vec<&str> = decision.missing_fields.iter().map(|f| f.name()).collect();
            wtr.write_record([
                filename,
                "success",
                decision.extracted_fields.policy_number.as_deref().unwrap_or(""),
                decision.route.as_str(),
                &missing.join(";"),
                &time_ms,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &time_ms,
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
