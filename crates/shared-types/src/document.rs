use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Infer the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        match extension_of(name).as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Lowercased extension of `name`, or an empty string when there is none.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// An upload written to transient storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub original_name: String,
    pub stored_path: PathBuf,
    pub size_bytes: u64,
    pub format: DocumentFormat,
}
