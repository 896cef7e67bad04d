//! End-to-end flow: default store -> match -> naming, and the
//! correction/learning round trip on a new document layout.

use fatren_core::{
    build_file_name, learn_from_confirmation, FieldKind, FieldMatcher, FileNaming, PatternStore,
};
use pretty_assertions::assert_eq;

const INVOICE_TEXT: &str = "Denominazione: ACME SRL\nINV-2024/07  05-03-2024\n";

#[test]
fn default_store_extracts_and_names_invoice() {
    let dir = tempfile::tempdir().unwrap();
    let store = PatternStore::load(dir.path().join("patterns.json"));

    let result = FieldMatcher::new().resolve(INVOICE_TEXT, &store);
    assert_eq!(result.supplier.as_deref(), Some("ACME SRL"));
    assert_eq!(result.invoice_number.as_deref(), Some("INV-2024-07"));
    assert_eq!(result.invoice_date.as_deref(), Some("05-03-2024"));

    let full = build_file_name(&FileNaming {
        doc_type: "FATT",
        number: result.invoice_number.as_deref().unwrap(),
        date: result.invoice_date.as_deref().unwrap(),
        supplier: result.supplier.as_deref().unwrap(),
        season: "PE",
        year: "2024",
        gender: "UOMO",
        generic: false,
    });
    assert_eq!(full, "FATT INV-2024-07 DEL 05-03-2024 ACME SRL PE 2024 UOMO.pdf");

    let generic = build_file_name(&FileNaming {
        doc_type: "FATT",
        number: result.invoice_number.as_deref().unwrap(),
        date: result.invoice_date.as_deref().unwrap(),
        supplier: result.supplier.as_deref().unwrap(),
        season: "PE",
        year: "2024",
        gender: "UOMO",
        generic: true,
    });
    assert_eq!(generic, "ACME SRL INV-2024-07 DEL 05-03-2024.pdf");
}

#[test]
fn corrections_teach_a_new_document_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("patterns.json");
    let mut store = PatternStore::load(&store_path);
    let matcher = FieldMatcher::new();

    // A layout the default patterns do not know.
    let text = "Fornitore: BETA SPA\nN. 77/A 01-02-2025\n";
    let candidate = matcher.resolve(text, &store);
    assert_eq!(candidate.supplier, None);

    // The user confirms the supplier; its pattern becomes global.
    assert!(learn_from_confirmation(
        &mut store,
        None,
        FieldKind::SupplierName,
        "BETA SPA",
        text
    ));

    let resolved = matcher.resolve(text, &store);
    assert_eq!(resolved.supplier.as_deref(), Some("BETA SPA"));

    // The confirmed number+date gets scoped to this supplier.
    assert!(learn_from_confirmation(
        &mut store,
        resolved.supplier.as_deref(),
        FieldKind::NumberAndDate,
        "77/A 01-02-2025",
        text
    ));
    assert!(store
        .get_supplier_pattern("BETA SPA", FieldKind::NumberAndDate)
        .is_some());

    // Everything survives a restart.
    let reloaded = PatternStore::load(&store_path);
    let result = FieldMatcher::new().resolve(text, &reloaded);
    assert_eq!(result.supplier.as_deref(), Some("BETA SPA"));
    assert_eq!(result.invoice_number.as_deref(), Some("77-A"));
    assert_eq!(result.invoice_date.as_deref(), Some("01-02-2025"));
    assert!(result.is_complete());
}
