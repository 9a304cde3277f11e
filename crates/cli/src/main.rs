//! Vitrine CLI - Local store seeding, backups, and publication.
//!
//! # Usage
//!
//! ```bash
//! # Seed the local store with the default template
//! vitrine-cli seed
//!
//! # Export the store document to a dated JSON file
//! vitrine-cli export
//!
//! # Replace the store document with a backup file
//! vitrine-cli import --yes backup.json
//!
//! # Publish the store document to the hosted document store
//! vitrine-cli publish
//!
//! # Fetch the latest published revision
//! vitrine-cli fetch --doc-id 68e36776ae596e708f07b93a
//! ```
//!
//! # Commands
//!
//! - `seed` - Write the default template into the local store
//! - `export` / `import` - Snapshot backups of the store document
//! - `publish` / `fetch` - Remote document store round-trips

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default template into the local store
    Seed {
        /// Overwrite an existing store document
        #[arg(long)]
        force: bool,
    },
    /// Export the store document to a JSON file
    Export {
        /// Output path (default: vitrine-backup-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the store document with a backup file
    Import {
        /// Backup file to import
        file: PathBuf,

        /// Confirm the wholesale replacement
        #[arg(long)]
        yes: bool,
    },
    /// Publish the store document to the hosted document store
    Publish,
    /// Fetch the latest published revision
    Fetch {
        /// Document id (default: the one configured in the store document)
        #[arg(long)]
        doc_id: Option<String>,
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
        Commands::Seed { force } => commands::seed::run(force)?,
        Commands::Export { output } => commands::backup::export(output)?,
        Commands::Import { file, yes } => commands::backup::import(&file, yes)?,
        Commands::Publish => commands::sync::publish().await?,
        Commands::Fetch { doc_id } => commands::sync::fetch(doc_id).await?,
    }
    Ok(())
}
