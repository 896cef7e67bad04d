//! Rename command - the batch loop over invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use fatren_core::{build_file_name, ExtractionResult, FieldMatcher, FileNaming, PatternStore, PdfTextExtractor};

/// Arguments for the rename command.
#[derive(Args)]
pub struct RenameArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Document type, e.g. FATT or NC
    #[arg(short = 't', long, default_value = "FATT")]
    doc_type: String,

    /// Season of reference, e.g. PE or AI
    #[arg(long, required_unless_present = "generic")]
    season: Option<String>,

    /// Year of reference
    #[arg(long, required_unless_present = "generic")]
    year: Option<String>,

    /// Gender of reference, e.g. UOMO or DONNA
    #[arg(long, required_unless_present = "generic")]
    gender: Option<String>,

    /// Use the simplified name without type/season/year/gender
    #[arg(short, long)]
    generic: bool,

    /// Move renamed files into this directory instead of renaming in place
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Show what would be renamed without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Also write a summary.csv next to the outputs
    #[arg(long)]
    summary: bool,
}

/// Outcome of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    new_name: Option<String>,
    error: Option<String>,
}

pub fn run(args: RenameArgs, store_path: &Path) -> anyhow::Result<()> {
    let start = Instant::now();
    let store = PatternStore::load(store_path);
    let matcher = FieldMatcher::new();

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("pdf")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        results.push(process_file(&path, &matcher, &store, &args));
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    let renamed: Vec<_> = results.iter().filter(|r| r.new_name.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} renamed, {} failed",
        style(renamed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(
    path: &Path,
    matcher: &FieldMatcher,
    store: &PatternStore,
    args: &RenameArgs,
) -> ProcessResult {
    let mut outcome = ProcessResult {
        path: path.to_path_buf(),
        result: None,
        new_name: None,
        error: None,
    };

    // Any extraction failure degrades to "no text available"; the file
    // is counted as failed, not fatal for the batch.
    let text = match PdfTextExtractor::extract_text_from_path(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("No text available from {}: {}", path.display(), e);
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };

    let result = matcher.resolve(&text, store);
    if !result.is_complete() {
        outcome.error = Some(format!(
            "extraction incomplete (supplier: {}, number: {}, date: {})",
            result.supplier.as_deref().unwrap_or("-"),
            result.invoice_number.as_deref().unwrap_or("-"),
            result.invoice_date.as_deref().unwrap_or("-"),
        ));
        outcome.result = Some(result);
        return outcome;
    }

    let name = build_file_name(&FileNaming {
        doc_type: &args.doc_type,
        number: result.invoice_number.as_deref().unwrap_or_default(),
        date: result.invoice_date.as_deref().unwrap_or_default(),
        supplier: result.supplier.as_deref().unwrap_or_default(),
        season: args.season.as_deref().unwrap_or_default(),
        year: args.year.as_deref().unwrap_or_default(),
        gender: args.gender.as_deref().unwrap_or_default(),
        generic: args.generic,
    });

    let target_dir = args
        .output_dir
        .clone()
        .or_else(|| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let target = unique_target(&target_dir, &name);

    if args.dry_run {
        println!(
            "{} {} -> {}",
            style("→").cyan(),
            path.display(),
            target.display()
        );
    } else if let Err(e) = fs::rename(path, &target) {
        outcome.error = Some(format!("rename failed: {}", e));
        outcome.result = Some(result);
        return outcome;
    } else {
        debug!("Renamed {} -> {}", path.display(), target.display());
    }

    outcome.result = Some(result);
    outcome.new_name = Some(name);
    outcome
}

// Collisions get a timestamp suffix; the naming rule itself does no
// uniqueness handling.
fn unique_target(dir: &Path, name: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
    unique_target_with_stamp(dir, name, &stamp)
}

// The stamped candidate can itself collide (several identical invoices
// within one second, or leftovers from an earlier run), so keep
// counting until a free name is found rather than overwrite.
fn unique_target_with_stamp(dir: &Path, name: &str, stamp: &str) -> PathBuf {
    let target = dir.join(name);
    if !target.exists() {
        return target;
    }

    let stem = name.strip_suffix(".pdf").unwrap_or(name);
    let candidate = dir.join(format!("{}-{}.pdf", stem, stamp));
    if !candidate.exists() {
        return candidate;
    }

    let mut counter = 2;
    loop {
        let candidate = dir.join(format!("{}-{}-{}.pdf", stem, stamp, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "supplier",
        "invoice_number",
        "invoice_date",
        "new_name",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let fields = result.result.as_ref();

        wtr.write_record([
            filename,
            if result.new_name.is_some() {
                "renamed"
            } else {
                "failed"
            },
            fields.and_then(|r| r.supplier.as_deref()).unwrap_or(""),
            fields
                .and_then(|r| r.invoice_number.as_deref())
                .unwrap_or(""),
            fields
                .and_then(|r| r.invoice_date.as_deref())
                .unwrap_or(""),
            result.new_name.as_deref().unwrap_or(""),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
