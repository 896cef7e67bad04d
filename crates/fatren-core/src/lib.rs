//! Core library for invoice PDF renaming.
//!
//! This crate provides:
//! - PDF text extraction (lopdf + pdf-extract)
//! - A persistent, learnable store of extraction regex patterns
//! - Ranked field matching (supplier name, invoice number, invoice date)
//! - Pattern synthesis from confirmed corrections
//! - The standardized file naming rule

pub mod error;
pub mod naming;
pub mod patterns;
pub mod pdf;

pub use error::{FatrenError, PdfError, Result, StoreError};
pub use naming::{build_file_name, FileNaming};
pub use patterns::matcher::{ExtractionResult, FieldMatcher};
pub use patterns::store::{FieldKind, PatternStore};
pub use patterns::synth::{learn_from_confirmation, synthesize};
pub use pdf::{PdfTextExtractor, TextSource};
