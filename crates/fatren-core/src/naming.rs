//! Standardized invoice file naming.

/// Characters that are invalid in file names on common filesystems.
/// They are deleted outright, not substituted.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Inputs for the naming rule: resolved fields plus the user-chosen
/// classification.
#[derive(Debug, Clone)]
pub struct FileNaming<'a> {
    /// Document type, e.g. "FATT" for an invoice, "NC" for a credit note.
    pub doc_type: &'a str,
    /// Invoice number.
    pub number: &'a str,
    /// Invoice date in `DD-MM-YYYY` form.
    pub date: &'a str,
    /// Supplier denomination.
    pub supplier: &'a str,
    /// Season of reference, e.g. "PE", "AI", "CONTINUATIVO".
    pub season: &'a str,
    /// Year of reference.
    pub year: &'a str,
    /// Gender of reference, e.g. "UOMO", "DONNA".
    pub gender: &'a str,
    /// Simplified naming omitting the classification fields.
    pub generic: bool,
}

/// Build the standardized file name for an invoice.
///
/// Pure function; collision handling is the caller's responsibility.
pub fn build_file_name(naming: &FileNaming<'_>) -> String {
    let name = if naming.generic {
        format!(
            "{} {} DEL {}.pdf",
            naming.supplier, naming.number, naming.date
        )
    } else {
        format!(
            "{} {} DEL {} {} {} {} {}.pdf",
            naming.doc_type,
            naming.number,
            naming.date,
            naming.supplier,
            naming.season,
            naming.year,
            naming.gender
        )
    };

    sanitize(&name)
}

fn sanitize(name: &str) -> String {
    name.chars().filter(|c| !INVALID_CHARS.contains(c)).collect()
}
