//! Pattern synthesis from confirmed corrections.
//!
//! Given the full document text and a human-confirmed value, derive a
//! new regex generalizing how that value appears in context. Supplier
//! name patterns anchor a short literal prefix at the nearest
//! label-like boundary; number+date patterns rebuild the two-token
//! value as a two-group match. Synthesis is strict and deterministic:
//! when the input does not fit, no pattern is produced.

use regex::Regex;
use tracing::{debug, info, warn};

use super::store::{FieldKind, PatternStore};

/// Characters preceding a confirmed supplier value considered when
/// building the literal prefix.
const CONTEXT_WINDOW_CHARS: usize = 20;

/// Derive a new regex pattern for `kind` from a confirmed value and
/// the surrounding document text.
///
/// Returns `None` when no pattern can be derived: the value does not
/// occur in the text (supplier), or does not split into exactly two
/// whitespace-separated tokens (number+date). Never panics and never
/// produces a pattern that does not compile.
pub fn synthesize(kind: FieldKind, confirmed_value: &str, text: &str) -> Option<String> {
    let pattern = match kind {
        FieldKind::SupplierName => synthesize_supplier(confirmed_value, text)?,
        FieldKind::NumberAndDate => synthesize_number_date(confirmed_value)?,
    };

    // A synthesized pattern that fails to compile would poison the
    // store for every later match.
    if let Err(e) = Regex::new(&pattern) {
        warn!("Synthesized pattern '{}' does not compile: {}", pattern, e);
        return None;
    }

    Some(pattern)
}

fn synthesize_supplier(confirmed_value: &str, text: &str) -> Option<String> {
    let value = confirmed_value.trim();
    if value.is_empty() {
        debug!("Empty confirmed supplier value, nothing to synthesize");
        return None;
    }

    // Exact substring only. Guessing a near match would learn a
    // pattern that never fires.
    let Some(idx) = text.find(value) else {
        debug!("Confirmed supplier '{}' not found in text", value);
        return None;
    };

    let before = &text[..idx];
    let window_start = before
        .char_indices()
        .rev()
        .take(CONTEXT_WINDOW_CHARS)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(before.len());
    let window = &before[window_start..];

    // Anchor at the rightmost label-like boundary (inclusive) so the
    // prefix does not capture mid-word noise. Without a separator the
    // whole window is kept as a best-effort literal prefix.
    let prefix = match window.rfind(|c: char| c == ' ' || c == '\n' || c == ':') {
        Some(pos) => &window[pos..],
        None => window,
    };

    Some(format!("{}(.+)", regex::escape(prefix)))
}

fn synthesize_number_date(confirmed_value: &str) -> Option<String> {
    let parts: Vec<&str> = confirmed_value.split_whitespace().collect();
    if parts.len() != 2 {
        debug!(
            "Confirmed number+date value '{}' has {} tokens, expected 2",
            confirmed_value,
            parts.len()
        );
        return None;
    }

    Some(format!(
        r"({})\s+({})",
        regex::escape(parts[0]),
        regex::escape(parts[1])
    ))
}

/// Synthesize a pattern from a confirmed correction and persist it.
///
/// Supplier-name patterns are shared globally: labeling conventions
/// are assumed universal. Number+date patterns are scoped to the
/// current supplier, since that layout is supplier-specific; without a
/// resolved supplier nothing is learned.
///
/// Returns `true` when a pattern was synthesized and handed to the
/// store.
pub fn learn_from_confirmation(
    store: &mut PatternStore,
    supplier: Option<&str>,
    kind: FieldKind,
    confirmed_value: &str,
    text: &str,
) -> bool {
    let Some(pattern) = synthesize(kind, confirmed_value, text) else {
        debug!("No {} pattern synthesized from '{}'", kind, confirmed_value);
        return false;
    };

    match kind {
        FieldKind::SupplierName => {
            store.add_global_pattern(kind, &pattern);
        }
        FieldKind::NumberAndDate => {
            let Some(supplier) = supplier.map(str::trim).filter(|s| !s.is_empty()) else {
                warn!("No supplier resolved, skipping number+date learning");
                return false;
            };
            store.add_supplier_pattern(supplier, kind, &pattern);
        }
    }

    info!("Learned {} pattern: {}", kind, pattern);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use regex::Regex;

    #[test]
    fn test_supplier_pattern_anchors_at_separator() {
        let text = "Numero 12\nFattura emessa da:ACME SRL\nVia Roma 1\n";

        // Rightmost separator in the context window is the colon, so
        // the pattern anchors there instead of keeping "emessa da".
        let pattern = synthesize(FieldKind::SupplierName, "ACME SRL", text).unwrap();
        assert_eq!(pattern, ":(.+)");

        let re = Regex::new(&pattern).unwrap();
        let caps = re.captures(text).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "ACME SRL");
    }

    #[test]
    fn test_supplier_pattern_generalizes_to_new_document() {
        let text = "Fornitore: ACME SRL\n";
        let pattern = synthesize(FieldKind::SupplierName, "ACME SRL", text).unwrap();

        let re = Regex::new(&pattern).unwrap();
        let other = "Fornitore: BETA SPA\n";
        let caps = re.captures(other).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "BETA SPA");
    }

    #[test]
    fn test_supplier_value_not_in_text_fails() {
        assert_eq!(
            synthesize(FieldKind::SupplierName, "ACME SRL", "no supplier here"),
            None
        );
    }

    #[test]
    fn test_supplier_value_at_text_start() {
        let text = "ACME SRL\nINV-1 05-03-2024\n";
        let pattern = synthesize(FieldKind::SupplierName, "ACME SRL", text).unwrap();

        let re = Regex::new(&pattern).unwrap();
        assert!(re.is_match(text));
    }

    #[test]
    fn test_supplier_prefix_without_separator_kept_whole() {
        let text = "XYZACME SRL rest";
        let pattern = synthesize(FieldKind::SupplierName, "ACME SRL", text).unwrap();

        // "XYZ" has no space/newline/colon, so the literal prefix is
        // kept unbounded.
        assert!(pattern.starts_with("XYZ"));
        let re = Regex::new(&pattern).unwrap();
        assert!(re.is_match(text));
    }

    #[test]
    fn test_supplier_prefix_escapes_metacharacters() {
        let text = "(Ragione-sociale)ACME SRL\n";
        let pattern = synthesize(FieldKind::SupplierName, "ACME SRL", text).unwrap();

        let re = Regex::new(&pattern).unwrap();
        let caps = re.captures(text).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "ACME SRL");
    }

    #[test]
    fn test_supplier_window_respects_multibyte_text() {
        let text = "Società àèìòù àèìòù àèìòù: ACME SRL\n";
        let pattern = synthesize(FieldKind::SupplierName, "ACME SRL", text).unwrap();
        assert!(Regex::new(&pattern).unwrap().is_match(text));
    }

    #[test]
    fn test_number_date_two_tokens() {
        let pattern = synthesize(FieldKind::NumberAndDate, "INV-42 01-02-2024", "").unwrap();

        let re = Regex::new(&pattern).unwrap();
        let caps = re.captures("INV-42 01-02-2024").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "INV-42");
        assert_eq!(caps.get(2).unwrap().as_str(), "01-02-2024");
    }

    #[test]
    fn test_number_date_single_token_fails() {
        assert_eq!(
            synthesize(FieldKind::NumberAndDate, "only-one-token", ""),
            None
        );
    }

    #[test]
    fn test_number_date_three_tokens_fails() {
        assert_eq!(
            synthesize(FieldKind::NumberAndDate, "a b c", ""),
            None
        );
    }

    #[test]
    fn test_learn_routes_supplier_pattern_globally() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PatternStore::load(dir.path().join("patterns.json"));
        let text = "Fornitore: ACME SRL\n";

        assert!(learn_from_confirmation(
            &mut store,
            None,
            FieldKind::SupplierName,
            "ACME SRL",
            text
        ));

        let globals = store.get_global_patterns(FieldKind::SupplierName);
        assert_eq!(globals.len(), 2);
        assert!(globals[1].ends_with("(.+)"));
    }

    #[test]
    fn test_learn_scopes_number_date_to_supplier() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PatternStore::load(dir.path().join("patterns.json"));

        assert!(learn_from_confirmation(
            &mut store,
            Some("ACME SRL"),
            FieldKind::NumberAndDate,
            "INV-42 01-02-2024",
            ""
        ));

        // Scoped to the supplier, not added globally.
        assert_eq!(store.get_global_patterns(FieldKind::NumberAndDate).len(), 1);
        assert!(store
            .get_supplier_pattern("ACME SRL", FieldKind::NumberAndDate)
            .is_some());
    }

    #[test]
    fn test_learn_number_date_without_supplier_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PatternStore::load(dir.path().join("patterns.json"));

        assert!(!learn_from_confirmation(
            &mut store,
            None,
            FieldKind::NumberAndDate,
            "INV-42 01-02-2024",
            ""
        ));
    }
}
