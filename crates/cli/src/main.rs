//! Curbside CLI - price lookups and content checks.
//!
//! # Usage
//!
//! ```bash
//! # Price a 20 yard dumpster for two weeks
//! curbside price --size 20 --days 14
//!
//! # Print the full pricing table
//! curbside price --table
//!
//! # Check the embedded city pages, guides and FAQ
//! curbside content check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "curbside")]
#[command(author, version, about = "Curbside CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up rental prices
    Price {
        /// Size key (10, 15, 20, 30, 10-dirt)
        #[arg(short, long, default_value = "20", conflicts_with = "table")]
        size: String,

        /// Rental length in days
        #[arg(short, long, default_value_t = 7, conflicts_with = "table")]
        days: u32,

        /// Print every size at the common rental lengths
        #[arg(long)]
        table: bool,
    },
    /// Inspect the embedded content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Load every page and report problems
    Check,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Price { table: true, .. } => commands::price::table(),
        Commands::Price { size, days, .. } => commands::price::quote(&size, days)?,
        Commands::Content { action } => match action {
            ContentAction::Check => commands::content::check()?,
        },
    }
    Ok(())
}
