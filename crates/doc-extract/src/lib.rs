//! Document text extraction
//!
//! Turns an uploaded PDF or DOCX into plain text. Exactly two formats are
//! supported; anything else is rejected by [`detect_format`] before any bytes
//! are parsed.
//!
//! # Example
//! ```no_run
//! use doc_extract::{detect_format, extract_text, ExtractError};
//!
//! fn read_upload(name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
//!     let format = detect_format(name)?;
//!     extract_text(bytes, format)
//! }
//! ```

mod docx;
mod error;
mod pdf;

pub use error::ExtractError;
pub use shared_types::DocumentFormat;

use shared_types::document::extension_of;

/// Resolve the document format from a file name, rejecting unknown extensions.
pub fn detect_format(file_name: &str) -> Result<DocumentFormat, ExtractError> {
    DocumentFormat::from_file_name(file_name)
        .ok_or_else(|| ExtractError::UnsupportedFormat(extension_of(file_name)))
}

/// Extract the full text of a document.
///
/// Never returns partial text: any parse failure is an error, and so is a
/// document that yields only whitespace.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractError> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract(bytes)?,
        DocumentFormat::Docx => docx::extract(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Extraction(
            "document contains no extractable text".to_string(),
        ));
    }

    tracing::debug!(
        format = format.extension(),
        chars = text.chars().count(),
        "extracted document text"
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format_rejects_unknown() {
        match detect_format("photo.png") {
            Err(ExtractError::UnsupportedFormat(ext)) => assert_eq!(ext, "png"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
        assert!(matches!(
            detect_format("README"),
            Err(ExtractError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detect_format_accepts_supported() {
        assert_eq!(detect_format("a.pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(detect_format("a.Docx").unwrap(), DocumentFormat::Docx);
    }

    #[test]
    fn test_garbage_is_an_extraction_error() {
        let garbage = b"this is not a document at all";
        assert!(matches!(
            extract_text(garbage, DocumentFormat::Pdf),
            Err(ExtractError::Extraction(_))
        ));
        assert!(matches!(
            extract_text(garbage, DocumentFormat::Docx),
            Err(ExtractError::Extraction(_))
        ));
    }
}
