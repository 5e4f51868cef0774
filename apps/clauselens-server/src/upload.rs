//! Document upload and text extraction
//!
//! Uploads land in the configured upload directory as
//! `<unix-millis>-<sanitized original name>` (with a counter inserted on a
//! same-millisecond name clash). The extension is checked before
//! anything touches the disk, and extraction runs on the blocking pool.

use std::path::{Path, PathBuf};

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use chrono::Utc;
use doc_extract::{detect_format, extract_text, DocumentFormat};
use serde::Serialize;
use shared_types::UploadedFile;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{ApiError, ErrorReply};
use crate::request_id::RequestId;
use crate::state::AppState;

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: &'static str,
    pub file_path: String,
    pub extracted_text: String,
}

/// Handler: POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    id: RequestId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ErrorReply> {
    let mut multipart =
        multipart.map_err(|e| id.reject(ApiError::Validation(e.body_text())))?;

    let (original_name, format, bytes) = read_file_field(&mut multipart)
        .await
        .map_err(|e| id.reject(e))?;

    let uploaded = store_upload(&state.config.upload_dir, &original_name, format, &bytes)
        .await
        .map_err(|e| id.reject(e))?;

    info!(
        file = %uploaded.original_name,
        stored = %uploaded.stored_path.display(),
        bytes = uploaded.size_bytes,
        "File uploaded"
    );

    let extracted_text = extract_blocking(bytes, format)
        .await
        .map_err(|e| id.reject(e))?;

    Ok(Json(UploadResponse {
        message: "File uploaded",
        file_path: uploaded.stored_path.display().to_string(),
        extracted_text,
    }))
}

/// Pull the `file` field out of the form. Other fields are ignored.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<(String, DocumentFormat, Bytes), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid upload: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_owned)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("Uploaded file has no name".to_string()))?;

        let format = detect_format(&original_name)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid upload: {}", e.body_text())))?;

        return Ok((original_name, format, bytes));
    }

    Err(ApiError::Validation("No file uploaded".to_string()))
}

/// Attempts at finding a free name before giving up
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Write the upload to `upload_dir` under a timestamped, sanitized name.
///
/// Files are created exclusively: when `<millis>-<name>` is taken, a counter
/// is inserted (`<millis>-<n>-<name>`) so an earlier upload is never
/// overwritten.
pub async fn store_upload(
    upload_dir: &Path,
    original_name: &str,
    format: DocumentFormat,
    bytes: &[u8],
) -> Result<UploadedFile, ApiError> {
    tokio::fs::create_dir_all(upload_dir).await?;

    let sanitized = sanitize_file_name(original_name);
    let stored_path =
        create_unique(upload_dir, Utc::now().timestamp_millis(), &sanitized, bytes).await?;

    Ok(UploadedFile {
        original_name: original_name.to_string(),
        stored_path,
        size_bytes: bytes.len() as u64,
        format,
    })
}

async fn create_unique(
    upload_dir: &Path,
    millis: i64,
    sanitized: &str,
    bytes: &[u8],
) -> Result<PathBuf, ApiError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let stored_name = if attempt == 0 {
            format!("{}-{}", millis, sanitized)
        } else {
            format!("{}-{}-{}", millis, attempt, sanitized)
        };
        let stored_path = upload_dir.join(stored_name);

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&stored_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };
        file.write_all(bytes).await?;
        file.flush().await?;

        return Ok(stored_path);
    }

    Err(ApiError::Internal(format!(
        "no free file name for upload '{}'",
        sanitized
    )))
}

/// Re-extract a previously uploaded file. The path must resolve to a file
/// inside `upload_dir`.
pub async fn extract_stored(upload_dir: &Path, file_path: &str) -> Result<String, ApiError> {
    let not_uploaded = || ApiError::Validation(format!("Not an uploaded file: {}", file_path));

    let root = tokio::fs::canonicalize(upload_dir).await?;
    let resolved: PathBuf = tokio::fs::canonicalize(file_path)
        .await
        .map_err(|_| not_uploaded())?;
    if !resolved.starts_with(&root) || !resolved.is_file() {
        return Err(not_uploaded());
    }

    let name = resolved
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(not_uploaded)?;
    let format = detect_format(name)?;

    let bytes = tokio::fs::read(&resolved).await?;
    extract_blocking(Bytes::from(bytes), format).await
}

async fn extract_blocking(bytes: Bytes, format: DocumentFormat) -> Result<String, ApiError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, format)).await??;
    Ok(text)
}

/// Keep the final path component and replace anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\lease.docx"), "lease.docx");
        assert_eq!(sanitize_file_name("My Lease (final).pdf"), "My_Lease__final_.pdf");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[tokio::test]
    async fn test_store_upload_names_file_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let uploaded = store_upload(dir.path(), "lease.pdf", DocumentFormat::Pdf, b"%PDF-1.4")
            .await
            .unwrap();

        assert!(uploaded.stored_path.starts_with(dir.path()));
        let stored_name = uploaded
            .stored_path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let (millis, rest) = stored_name.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest, "lease.pdf");
        assert_eq!(uploaded.size_bytes, 8);
    }

    #[tokio::test]
    async fn test_same_name_uploads_keep_their_own_bytes() {
        let dir = tempfile::tempdir().unwrap();

        let bodies: [&[u8]; 3] = [b"%PDF-AAAA", b"%PDF-BBBB", b"%PDF-CCCC"];
        let mut stored = Vec::new();
        for body in bodies {
            let uploaded = store_upload(dir.path(), "lease.pdf", DocumentFormat::Pdf, body)
                .await
                .unwrap();
            stored.push((uploaded.stored_path, body));
        }

        assert_ne!(stored[0].0, stored[1].0);
        assert_ne!(stored[1].0, stored[2].0);
        assert_ne!(stored[0].0, stored[2].0);
        for (path, body) in &stored {
            assert_eq!(std::fs::read(path).unwrap(), body.to_vec());
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.ends_with("-lease.pdf"), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_taken_name_gets_counter_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let taken = dir.path().join("1700000000000-lease.pdf");
        std::fs::write(&taken, b"%PDF-OLD").unwrap();

        let path = create_unique(dir.path(), 1_700_000_000_000, "lease.pdf", b"%PDF-NEW")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("1700000000000-1-lease.pdf"));
        assert_eq!(std::fs::read(&taken).unwrap(), b"%PDF-OLD");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-NEW");
    }

    #[tokio::test]
    async fn test_exhausted_names_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("5-a.pdf"), b"x").unwrap();
        for n in 1..MAX_NAME_ATTEMPTS {
            std::fs::write(dir.path().join(format!("5-{}-a.pdf", n)), b"x").unwrap();
        }

        let err = create_unique(dir.path(), 5, "a.pdf", b"y").await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn test_extract_stored_rejects_paths_outside_upload_dir() {
        let uploads = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let outside = elsewhere.path().join("secret.pdf");
        std::fs::write(&outside, b"%PDF-1.4").unwrap();

        let err = extract_stored(uploads.path(), outside.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_extract_stored_missing_file() {
        let uploads = tempfile::tempdir().unwrap();
        let missing = uploads.path().join("nope.pdf");
        let err = extract_stored(uploads.path(), missing.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    proptest! {
        #[test]
        fn sanitized_names_are_single_safe_components(name in ".{0,64}") {
            let cleaned = sanitize_file_name(&name);
            prop_assert!(!cleaned.is_empty());
            prop_assert!(!cleaned.starts_with('.'));
            prop_assert!(cleaned
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')));
        }
    }
}
