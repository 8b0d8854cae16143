//! Claims command - inspect the claim store.

use clap::{Args, Subcommand};
use console::style;

use fnol_core::open_store;

use super::load_config;

/// Arguments for the claims command.
#[derive(Args)]
pub struct ClaimsArgs {
    #[command(subcommand)]
    command: ClaimsCommand,
}

#[derive(Subcommand)]
enum ClaimsCommand {
    /// List saved claims
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single saved claim as JSON
    Show {
        /// Claim id
        id: u64,
    },
}

pub async fn run(args: ClaimsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config.storage)?;

    match args.command {
        ClaimsCommand::List { json } => {
            let claims = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&claims)?);
                return Ok(());
            }

            if claims.is_empty() {
                println!("{} No saved claims.", style("ℹ").blue());
                return Ok(());
            }

            println!(
                "{:>5}  {:<20}  {:<17}  {:>12}  {}",
                "ID", "POLICY", "ROUTE", "DAMAGE", "CREATED"
            );
            for claim in &claims {
                println!(
                    "{:>5}  {:<20}  {:<17}  {:>12}  {}",
                    claim.id,
                    claim.policy_number.as_deref().unwrap_or("-"),
                    claim.recommended_route.as_str(),
                    claim
                        .estimated_damage
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    claim.created_at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
        ClaimsCommand::Show { id } => match store.get(id)? {
            Some(claim) => println!("{}", serde_json::to_string_pretty(&claim)?),
            None => anyhow::bail!("Claim not found: {}", id),
        },
    }

    Ok(())
}
