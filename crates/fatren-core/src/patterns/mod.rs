//! Learnable extraction pattern engine.
//!
//! The store holds global regex patterns per field kind plus
//! per-supplier overrides, the matcher resolves invoice fields with
//! supplier-specific patterns taking precedence, and the synthesizer
//! derives new patterns from confirmed corrections.

pub mod matcher;
pub mod store;
pub mod synth;

pub use matcher::{ExtractionResult, FieldMatcher};
pub use store::{FieldKind, PatternStore};
pub use synth::{learn_from_confirmation, synthesize};
