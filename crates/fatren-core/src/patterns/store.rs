//! Persistent store of extraction regex patterns.
//!
//! The store is a single JSON document holding ordered global pattern
//! lists per field kind and one override pattern per field kind per
//! supplier. Every mutation is followed by a full atomic persist; the
//! on-disk file is the single source of truth across process restarts.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Default pattern for supplier names: a literal label followed by free text.
pub const DEFAULT_SUPPLIER_PATTERN: &str = r"Denominazione:\s*(.+)";

/// Default pattern for invoice number and date: an alphanumeric token
/// followed by a `DD-MM-YYYY` date.
pub const DEFAULT_NUMBER_DATE_PATTERN: &str = r"([A-Z0-9/\-]+)\s+(\d{2}-\d{2}-\d{4})";

/// Category of extractable data.
///
/// Invoice number and date are conflated into a single kind because one
/// two-group pattern produces both values in a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Supplier name. Patterns carry exactly one capture group.
    #[serde(rename = "denominazione")]
    SupplierName,
    /// Invoice number and date. Patterns carry exactly two capture
    /// groups, number first, date second.
    #[serde(rename = "numero_data")]
    NumberAndDate,
}

impl FieldKind {
    /// Number of capture groups a pattern of this kind must have.
    pub fn capture_groups(&self) -> usize {
        match self {
            FieldKind::SupplierName => 1,
            FieldKind::NumberAndDate => 2,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::SupplierName => write!(f, "denominazione"),
            FieldKind::NumberAndDate => write!(f, "numero_data"),
        }
    }
}

/// The persisted document shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct PatternDocument {
    /// Per-supplier override patterns, keyed by the exact trimmed
    /// supplier denomination. Case-sensitive: denominations differing
    /// only in case are distinct suppliers.
    #[serde(rename = "fornitori")]
    suppliers: BTreeMap<String, BTreeMap<FieldKind, String>>,

    /// Global patterns per field kind, in priority order. First match
    /// wins; most recently learned patterns are appended last.
    #[serde(rename = "regex_patterns")]
    globals: BTreeMap<FieldKind, Vec<String>>,

    /// Set on every mutation.
    last_updated: DateTime<Utc>,
}

impl PatternDocument {
    fn bootstrap() -> Self {
        let mut globals = BTreeMap::new();
        globals.insert(
            FieldKind::SupplierName,
            vec![DEFAULT_SUPPLIER_PATTERN.to_string()],
        );
        globals.insert(
            FieldKind::NumberAndDate,
            vec![DEFAULT_NUMBER_DATE_PATTERN.to_string()],
        );
        Self {
            suppliers: BTreeMap::new(),
            globals,
            last_updated: Utc::now(),
        }
    }
}

/// Persistent pattern store bound to a file path.
#[derive(Debug)]
pub struct PatternStore {
    path: PathBuf,
    doc: PatternDocument,
}

impl PatternStore {
    /// Load the store from `path`.
    ///
    /// Never fails: a missing file or any read/parse failure yields a
    /// fresh store seeded with the built-in default patterns. The
    /// failure is logged, not raised.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<PatternDocument>(&content) {
                Ok(doc) => {
                    debug!("Loaded pattern store from {}", path.display());
                    doc
                }
                Err(e) => {
                    warn!(
                        "Failed to parse pattern store {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    PatternDocument::bootstrap()
                }
            },
            Err(e) => {
                debug!(
                    "Pattern store {} not readable ({}). Using defaults.",
                    path.display(),
                    e
                );
                PatternDocument::bootstrap()
            }
        };
        Self { path, doc }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the store was last mutated.
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.doc.last_updated
    }

    /// Persist the full document. Failure is logged, never raised; the
    /// in-memory store keeps the mutation and the next successful save
    /// reconciles the divergence.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            warn!(
                "Failed to save pattern store {}: {}",
                self.path.display(),
                e
            );
        }
    }

    fn try_save(&self) -> Result<(), StoreError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        // Write-temp-then-replace so a crash mid-write cannot corrupt
        // the previous valid file.
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        let content = serde_json::to_string_pretty(&self.doc)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;

        debug!("Saved pattern store to {}", self.path.display());
        Ok(())
    }

    /// Append a global pattern for `kind` if not already present.
    ///
    /// Returns `true` when the pattern was actually appended (and the
    /// store persisted); a duplicate is a no-op with no write.
    pub fn add_global_pattern(&mut self, kind: FieldKind, pattern: &str) -> bool {
        let list = self.doc.globals.entry(kind).or_default();
        if list.iter().any(|p| p == pattern) {
            debug!("Global {} pattern already present, skipping", kind);
            return false;
        }
        list.push(pattern.to_string());
        self.doc.last_updated = Utc::now();
        self.save();
        info!("Added global {} pattern: {}", kind, pattern);
        true
    }

    /// Insert or overwrite the single pattern for `supplier` + `kind`.
    /// Always persists.
    pub fn add_supplier_pattern(&mut self, supplier: &str, kind: FieldKind, pattern: &str) {
        self.doc
            .suppliers
            .entry(supplier.to_string())
            .or_default()
            .insert(kind, pattern.to_string());
        self.doc.last_updated = Utc::now();
        self.save();
        info!("Added {} pattern for supplier '{}': {}", kind, supplier, pattern);
    }

    /// Global patterns for `kind`, in priority order. Empty for an
    /// unknown kind, never an error.
    pub fn get_global_patterns(&self, kind: FieldKind) -> &[String] {
        self.doc
            .globals
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All override patterns registered for `supplier`.
    pub fn get_supplier_patterns(&self, supplier: &str) -> Option<&BTreeMap<FieldKind, String>> {
        self.doc.suppliers.get(supplier)
    }

    /// The single override pattern for `supplier` + `kind`, if any.
    pub fn get_supplier_pattern(&self, supplier: &str, kind: FieldKind) -> Option<&str> {
        self.doc
            .suppliers
            .get(supplier)
            .and_then(|kinds| kinds.get(&kind))
            .map(String::as_str)
    }

    /// Render the full document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }
}
