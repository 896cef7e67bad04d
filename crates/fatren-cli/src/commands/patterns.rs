//! Patterns command - manage the pattern store.

use std::path::Path;

use clap::{Args, Subcommand, ValueEnum};
use console::style;
use regex::Regex;

use fatren_core::{FieldKind, PatternStore};

/// Arguments for the patterns command.
#[derive(Args)]
pub struct PatternsArgs {
    #[command(subcommand)]
    command: PatternsCommand,
}

#[derive(Subcommand)]
enum PatternsCommand {
    /// Show the full pattern store
    Show,

    /// Show the pattern store file path
    Path,

    /// Add a pattern by hand
    Add(AddArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Field kind the pattern extracts
    #[arg(short, long, value_enum)]
    kind: KindArg,

    /// The regular expression to store
    #[arg(short, long)]
    regex: String,

    /// Scope the pattern to one supplier instead of the global list
    #[arg(long)]
    supplier: Option<String>,
}

#[derive(ValueEnum, Clone, Copy)]
enum KindArg {
    /// Supplier name (one capture group)
    Supplier,
    /// Invoice number and date (two capture groups)
    NumberDate,
}

impl From<KindArg> for FieldKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Supplier => FieldKind::SupplierName,
            KindArg::NumberDate => FieldKind::NumberAndDate,
        }
    }
}

pub fn run(args: PatternsArgs, store_path: &Path) -> anyhow::Result<()> {
    match args.command {
        PatternsCommand::Show => show(store_path),
        PatternsCommand::Path => show_path(store_path),
        PatternsCommand::Add(add_args) => add(add_args, store_path),
    }
}

fn show(store_path: &Path) -> anyhow::Result<()> {
    let store = PatternStore::load(store_path);
    println!("{}", store.to_json()?);
    Ok(())
}

fn show_path(store_path: &Path) -> anyhow::Result<()> {
    println!("Pattern store: {}", store_path.display());

    if store_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("The store is created with default patterns on first use.");
    }

    Ok(())
}

fn add(args: AddArgs, store_path: &Path) -> anyhow::Result<()> {
    let kind = FieldKind::from(args.kind);

    // A bad pattern would be skipped by the matcher on every resolve;
    // reject it here instead of storing it.
    let compiled = Regex::new(&args.regex)
        .map_err(|e| anyhow::anyhow!("Invalid regular expression: {}", e))?;

    let groups = compiled.captures_len() - 1;
    if groups != kind.capture_groups() {
        anyhow::bail!(
            "A {} pattern needs exactly {} capture group(s), found {}",
            kind,
            kind.capture_groups(),
            groups
        );
    }

    let mut store = PatternStore::load(store_path);
    match args.supplier {
        Some(supplier) => {
            let supplier = supplier.trim();
            if supplier.is_empty() {
                anyhow::bail!("Supplier name must not be empty");
            }
            store.add_supplier_pattern(supplier, kind, &args.regex);
            println!(
                "{} Added {} pattern for supplier '{}'",
                style("✓").green(),
                kind,
                supplier
            );
        }
        None => {
            if store.add_global_pattern(kind, &args.regex) {
                println!("{} Added global {} pattern", style("✓").green(), kind);
            } else {
                println!(
                    "{} Global {} pattern already present",
                    style("ℹ").blue(),
                    kind
                );
            }
        }
    }

    Ok(())
}
