//! podbase CLI
//!
//! Operator tooling: assembles the feed-refresh queue and drives it.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "podbase")]
#[command(about = "Podcast list and feed-refresh tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Assemble the refresh queue and hand each candidate to the refresher
    Refresh(commands::refresh::RefreshArgs),
}

fn main() {
    podbase_observability::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Refresh(args) => commands::refresh::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
