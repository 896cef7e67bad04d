//! Ranked field matching against the pattern store.
//!
//! Resolution order: global supplier-name patterns in stored order,
//! then the resolved supplier's number+date override, then global
//! number+date patterns in stored order. First match wins at every
//! step; a supplier-specific override that matches wins outright even
//! when a global pattern would also match.

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::store::{FieldKind, PatternStore};

/// Fields resolved from a document, best-effort.
///
/// A partial result (some fields absent) is a valid outcome, not an
/// error. The raw text is always carried so a caller can present it to
/// a human for correction regardless of match success.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExtractionResult {
    /// Supplier denomination, trimmed.
    pub supplier: Option<String>,
    /// Invoice number, trimmed, with `/` replaced by `-`.
    pub invoice_number: Option<String>,
    /// Invoice date, trimmed, as it appears in the document.
    pub invoice_date: Option<String>,
    /// The full extracted document text.
    pub raw_text: String,
}

impl ExtractionResult {
    /// A fully-absent result carrying only the raw text.
    pub fn absent(raw_text: impl Into<String>) -> Self {
        Self {
            supplier: None,
            invoice_number: None,
            invoice_date: None,
            raw_text: raw_text.into(),
        }
    }

    /// True when supplier, number and date are all resolved.
    pub fn is_complete(&self) -> bool {
        self.supplier.is_some() && self.invoice_number.is_some() && self.invoice_date.is_some()
    }
}

/// Resolves invoice fields from raw text using a pattern store.
pub struct FieldMatcher;

impl FieldMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Resolve supplier, invoice number and invoice date from `text`.
    ///
    /// Never fails: no match means absent fields. Stored patterns that
    /// do not compile are skipped with a warning, since the store is
    /// user-extendable.
    pub fn resolve(&self, text: &str, store: &PatternStore) -> ExtractionResult {
        let mut result = ExtractionResult::absent(text);

        // Supplier first: its overrides steer number+date resolution.
        for pattern in store.get_global_patterns(FieldKind::SupplierName) {
            let Some(re) = compile(pattern) else { continue };
            if let Some(caps) = re.captures(text) {
                if let Some(group) = caps.get(1) {
                    let supplier = group.as_str().trim().to_string();
                    debug!("Supplier '{}' matched by pattern {}", supplier, pattern);
                    result.supplier = Some(supplier);
                    break;
                }
            }
        }

        // Supplier-specific override wins outright when it matches.
        if let Some(supplier) = result.supplier.clone() {
            if let Some(pattern) = store.get_supplier_pattern(&supplier, FieldKind::NumberAndDate) {
                if let Some(re) = compile(pattern) {
                    if let Some(caps) = re.captures(text) {
                        if let (Some(number), Some(date)) = (caps.get(1), caps.get(2)) {
                            debug!("Supplier-specific number+date pattern matched for '{}'", supplier);
                            result.invoice_number = Some(normalize_number(number.as_str()));
                            result.invoice_date = Some(date.as_str().trim().to_string());
                            return result;
                        }
                    }
                }
            }
        }

        for pattern in store.get_global_patterns(FieldKind::NumberAndDate) {
            let Some(re) = compile(pattern) else { continue };
            if let Some(caps) = re.captures(text) {
                if let (Some(number), Some(date)) = (caps.get(1), caps.get(2)) {
                    debug!("Global number+date pattern matched: {}", pattern);
                    result.invoice_number = Some(normalize_number(number.as_str()));
                    result.invoice_date = Some(date.as_str().trim().to_string());
                    break;
                }
            }
        }

        result
    }
}

impl Default for FieldMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping invalid stored pattern '{}': {}", pattern, e);
            None
        }
    }
}

// Slashes are invalid in file names, so they are normalized away here
// rather than left for the naming rule to delete.
fn normalize_number(raw: &str) -> String {
    raw.trim().replace('/', "-")
}
