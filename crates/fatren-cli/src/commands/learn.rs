//! Learn command - the confirm-or-correct channel.
//!
//! The user supplies the values the document should have produced; new
//! patterns are synthesized from them and persisted, so future
//! documents with the same layout match automatically.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use console::style;

use fatren_core::{learn_from_confirmation, FieldKind, FieldMatcher, PatternStore, PdfTextExtractor};

/// Arguments for the learn command.
#[derive(Args)]
pub struct LearnArgs {
    /// Input PDF file the confirmed values belong to
    input: PathBuf,

    /// Confirmed supplier denomination
    #[arg(long)]
    supplier: Option<String>,

    /// Confirmed invoice number (requires --date)
    #[arg(long, requires = "date")]
    number: Option<String>,

    /// Confirmed invoice date (requires --number)
    #[arg(long, requires = "number")]
    date: Option<String>,
}

pub fn run(args: LearnArgs, store_path: &Path) -> anyhow::Result<()> {
    if args.supplier.is_none() && args.number.is_none() {
        anyhow::bail!("Nothing to learn: pass --supplier and/or --number with --date");
    }

    let mut store = PatternStore::load(store_path);

    let text = PdfTextExtractor::extract_text_from_path(&args.input)
        .with_context(|| format!("extracting text from {}", args.input.display()))?;

    // The candidate result supplies the supplier scope when the user
    // confirmed only number and date.
    let candidate = FieldMatcher::new().resolve(&text, &store);

    if let Some(ref supplier) = args.supplier {
        if learn_from_confirmation(&mut store, None, FieldKind::SupplierName, supplier, &text) {
            println!(
                "{} Learned a supplier-name pattern from '{}'",
                style("✓").green(),
                supplier
            );
        } else {
            println!(
                "{} Could not derive a supplier-name pattern: '{}' does not occur in the text",
                style("✗").red(),
                supplier
            );
        }
    }

    if let (Some(number), Some(date)) = (args.number.as_deref(), args.date.as_deref()) {
        let supplier = args
            .supplier
            .as_deref()
            .or(candidate.supplier.as_deref());
        let value = format!("{} {}", number, date);

        if learn_from_confirmation(
            &mut store,
            supplier,
            FieldKind::NumberAndDate,
            &value,
            &text,
        ) {
            println!(
                "{} Learned a number+date pattern for supplier '{}'",
                style("✓").green(),
                supplier.unwrap_or("-")
            );
        } else if supplier.is_none() {
            println!(
                "{} No supplier resolved or confirmed; number+date patterns are supplier-scoped",
                style("✗").red()
            );
        } else {
            println!(
                "{} Could not derive a number+date pattern from '{}'",
                style("✗").red(),
                value
            );
        }
    }

    Ok(())
}
