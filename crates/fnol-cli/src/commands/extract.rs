//! Extract-text command - print the text of a document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use super::{load_config, read_document};

/// Arguments for the extract-text command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or text); the configured sample document when omitted
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_document(args.input.as_deref(), &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &text)?;
        eprintln!(
            "{} Text written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", text);
    }

    Ok(())
}
