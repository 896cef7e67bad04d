//! PDF text extraction using lopdf and pdf-extract.
//!
//! lopdf handles document structure (parse validation, encryption, page
//! count); pdf-extract produces the concatenated text of all pages in
//! document order.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Source of extractable document text.
///
/// Callers treat any failure as "no text available" and degrade to an
/// absent extraction result instead of propagating.
pub trait TextSource {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the loaded document.
    fn page_count(&self) -> u32;

    /// Extract text from the entire document, pages concatenated in order.
    fn extract_text(&self) -> Result<String>;
}

/// PDF text extractor backed by lopdf + pdf-extract.
pub struct PdfTextExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfTextExtractor {
    /// Create a new, empty extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Read a file and extract its full text in one call.
    ///
    /// Fails distinctly on a missing file (I/O), a non-PDF input
    /// (parse), an encrypted document, or one without pages.
    pub fn extract_text_from_path(path: &Path) -> Result<String> {
        let data = std::fs::read(path)?;
        let mut extractor = Self::new();
        extractor.load(&data)?;
        extractor.extract_text()
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdfTextExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract works on the raw bytes, so re-save the
            // decrypted document for it
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        debug!("Extracted {} chars of text", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_starts_empty() {
        let extractor = PdfTextExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_text_without_document_fails() {
        let extractor = PdfTextExtractor::new();
        assert!(matches!(
            extractor.extract_text(),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_load_rejects_non_pdf_bytes() {
        let mut extractor = PdfTextExtractor::new();
        let result = extractor.load(b"this is not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PdfTextExtractor::extract_text_from_path(Path::new("/no/such/file.pdf"));
        assert!(matches!(result, Err(PdfError::Io(_))));
    }
}
