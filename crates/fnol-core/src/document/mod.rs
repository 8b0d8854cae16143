//! Document-to-text extraction.

mod pdf;

pub use pdf::PdfExtractor;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::DocumentError;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// An uploaded document.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a local file, guessing the content type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let mut upload = Self::new(data);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            upload = upload.with_file_name(name);
        }
        if let Some(content_type) = content_type_for(path) {
            upload = upload.with_content_type(content_type);
        }
        Ok(upload)
    }
}

/// How the bytes of a document are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    /// Try PDF first, then plain text.
    Unknown,
}

impl DocumentKind {
    /// Classify by declared content type.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type.map(str::trim) {
            Some(ct) if ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE) => DocumentKind::Pdf,
            Some(ct) if ct.to_ascii_lowercase().starts_with("text/") => DocumentKind::Text,
            _ => DocumentKind::Unknown,
        }
    }
}

/// Converts uploads (or the bundled sample) into plain text.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    sample_document: PathBuf,
}

impl DocumentExtractor {
    pub fn new(sample_document: impl Into<PathBuf>) -> Self {
        Self {
            sample_document: sample_document.into(),
        }
    }

    pub fn sample_document(&self) -> &Path {
        &self.sample_document
    }

    /// Extract text from an upload, falling back to the sample document when
    /// there is no upload or it is empty.
    pub fn extract(&self, upload: Option<&Upload>) -> Result<String> {
        let upload = match upload {
            Some(u) if !u.data.is_empty() => u,
            _ => {
                info!(
                    "No uploaded file provided or file is empty, using sample document {}",
                    self.sample_document.display()
                );
                return self.extract_sample();
            }
        };

        info!(
            "Extracting text from uploaded file: {}, content_type={}",
            upload.file_name.as_deref().unwrap_or("<unnamed>"),
            upload.content_type.as_deref().unwrap_or("<none>")
        );

        match DocumentKind::from_content_type(upload.content_type.as_deref()) {
            DocumentKind::Pdf => PdfExtractor::text_from_bytes(&upload.data),
            DocumentKind::Text => Ok(decode_text(&upload.data)),
            DocumentKind::Unknown => match PdfExtractor::text_from_bytes(&upload.data) {
                Ok(text) => Ok(text),
                Err(e) => {
                    warn!("Failed to parse upload as PDF, reading as plain text: {}", e);
                    Ok(decode_text(&upload.data))
                }
            },
        }
    }

    fn extract_sample(&self) -> Result<String> {
        let path = &self.sample_document;
        if !path.is_file() {
            return Err(DocumentError::SampleNotFound(path.clone()));
        }

        let data = std::fs::read(path)?;
        if content_type_for(path) == Some(PDF_CONTENT_TYPE) {
            PdfExtractor::text_from_bytes(&data)
        } else {
            Ok(decode_text(&data))
        }
    }
}

/// Content type implied by a file extension.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(PDF_CONTENT_TYPE),
        "txt" | "text" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        _ => None,
    }
}

fn decode_text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}
