//! Error types for the fnol-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::claim::ClaimField;

/// Main error type for the fnol library.
#[derive(Error, Debug)]
pub enum FnolError {
    /// Document-to-text extraction error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Field rule construction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Claim persistence error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning an uploaded document into text.
///
/// A failed extraction means no claim analysis takes place; it is never
/// reported as a claim with missing fields.
#[derive(Error, Debug)]
pub enum DocumentError {
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

    /// The fallback sample document does not exist.
    #[error("sample document not found: {}", .0.display())]
    SampleNotFound(PathBuf),

    /// I/O error while reading a document.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to building field extraction rules.
///
/// Resolving fields never fails; only constructing a rule table can.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A fallback pattern did not compile.
    #[error("invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: ClaimField,
        #[source]
        source: regex::Error,
    },
}

/// Errors related to claim persistence.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read or write the backing file.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized.
    #[error("failed to serialize claims: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock.
    #[error("claim store lock poisoned")]
    Poisoned,
}

/// Result type for the fnol library.
pub type Result<T> = std::result::Result<T, FnolError>;
