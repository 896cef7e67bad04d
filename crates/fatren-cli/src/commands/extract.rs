//! Extract command - inspect the fields resolved from a single file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use console::style;

use fatren_core::{FieldMatcher, PatternStore, PdfTextExtractor};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also print the raw extracted text
    #[arg(long)]
    raw: bool,
}

#[derive(ValueEnum, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run(args: ExtractArgs, store_path: &Path) -> anyhow::Result<()> {
    let store = PatternStore::load(store_path);

    let text = PdfTextExtractor::extract_text_from_path(&args.input)
        .with_context(|| format!("extracting text from {}", args.input.display()))?;

    let result = FieldMatcher::new().resolve(&text, &store);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            let field = |v: &Option<String>| match v {
                Some(v) => style(v.clone()).green(),
                None => style("(not found)".to_string()).yellow(),
            };
            println!("Supplier:       {}", field(&result.supplier));
            println!("Invoice number: {}", field(&result.invoice_number));
            println!("Invoice date:   {}", field(&result.invoice_date));

            if args.raw {
                println!();
                println!("{}", style("Raw text:").dim());
                println!("{}", result.raw_text);
            }
        }
    }

    Ok(())
}
