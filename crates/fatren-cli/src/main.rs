//! CLI application for batch-renaming invoice PDFs.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{extract, learn, patterns, rename};

/// Rename invoice PDFs from extracted supplier, number and date fields
#[derive(Parser)]
#[command(name = "fatren")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the pattern store file
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename a batch of invoice files
    Rename(rename::RenameArgs),

    /// Extract fields from a single invoice file
    Extract(extract::ExtractArgs),

    /// Teach new extraction patterns from confirmed values
    Learn(learn::LearnArgs),

    /// Manage the pattern store
    Patterns(patterns::PatternsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let store_path = commands::store_path(cli.store.as_deref());

    // Execute command
    match cli.command {
        Commands::Rename(args) => rename::run(args, &store_path),
        Commands::Extract(args) => extract::run(args, &store_path),
        Commands::Learn(args) => learn::run(args, &store_path),
        Commands::Patterns(args) => patterns::run(args, &store_path),
    }
}
