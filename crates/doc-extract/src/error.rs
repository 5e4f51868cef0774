use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported file type '{0}'. Only PDF and DOCX allowed.")]
    UnsupportedFormat(String),

    #[error("Document is password protected")]
    PasswordProtected,

    #[error("Failed to extract text: {0}")]
    Extraction(String),
}
