//! Error types for the fatren-core library.

use thiserror::Error;

/// Main error type for the fatren library.
#[derive(Error, Debug)]
pub enum FatrenError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Pattern store error.
    #[error("pattern store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Could not read the file from disk.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the persisted pattern store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write the store file.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize the store document.
    #[error("store serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for the fatren library.
pub type Result<T> = std::result::Result<T, FatrenError>;
