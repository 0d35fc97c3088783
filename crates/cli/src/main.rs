//! Apola CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! apola-cli migrate
//!
//! # Load provinces and cities from a YAML file
//! apola-cli seed regions data/regions.yaml
//!
//! # Create a product category
//! apola-cli category create -n "Atasan"
//! ```
//!
//! All commands read `ADMIN_DATABASE_URL` (falling back to `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "apola-cli")]
#[command(author, version, about = "Apola CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage product categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert provinces and cities from a YAML file
    Regions {
        /// Path to the regions YAML file
        #[arg(default_value = "crates/cli/data/regions.yaml")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a new category
    Create {
        /// Category name (at least 3 characters)
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Regions { file } => commands::seed::regions(&file).await?,
        },
        Commands::Category { action } => match action {
            CategoryAction::Create { name } => {
                commands::category::create(&name).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_category_create() {
        let cli = Cli::try_parse_from(["apola-cli", "category", "create", "-n", "Atasan"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Category {
                action: CategoryAction::Create { name }
            }) if name == "Atasan"
        ));
    }
}
