//! PDF text extraction via pdf-extract

use std::panic::{catch_unwind, AssertUnwindSafe};

use pdf_extract::extract_text_from_mem;

use crate::ExtractError;

pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(ExtractError::Extraction("missing %PDF header".to_string()));
    }

    // pdf-extract panics on some malformed font and xref tables
    let result = catch_unwind(AssertUnwindSafe(|| extract_text_from_mem(bytes)))
        .map_err(|_| ExtractError::Extraction("PDF parser aborted on malformed input".into()))?;

    result.map_err(|e| {
        let error_msg = e.to_string().to_lowercase();

        if error_msg.contains("encrypted")
            || error_msg.contains("password")
            || error_msg.contains("decrypt")
        {
            ExtractError::PasswordProtected
        } else {
            ExtractError::Extraction(e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_check() {
        assert!(matches!(
            extract(b"PK\x03\x04 docx bytes"),
            Err(ExtractError::Extraction(msg)) if msg.contains("%PDF")
        ));
    }

    #[test]
    fn test_truncated_pdf_fails() {
        assert!(extract(b"%PDF-1.5\n1 0 obj\n<<").is_err());
    }
}
