//! Shine Store CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! shine-cli migrate
//!
//! # Insert product documents from a JSON or YAML array
//! shine-cli seed products data/products.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed products` - Bulk-insert catalog documents

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shine-cli")]
#[command(author, version, about = "Shine Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert product documents from a file
    Products {
        /// Path to a JSON (`.json`) or YAML (`.yaml`, `.yml`) array of objects
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(&file).await?,
        },
    }
    Ok(())
}
