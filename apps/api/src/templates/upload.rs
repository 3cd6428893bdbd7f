//! Template file validation and durable storage on the local filesystem.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::template::TemplateKind;

/// Resolves the template kind from the uploaded file name.
/// Anything other than `.pdf`, `.docx` or `.txt` is rejected before storage.
pub fn validate_file_name(file_name: &str) -> Result<TemplateKind, AppError> {
    TemplateKind::from_file_name(file_name).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported template file '{file_name}'. Only .pdf, .docx and .txt files are allowed"
        ))
    })
}

/// Writes the upload under `upload_dir` with a collision-free name and returns its path.
pub async fn store_file(
    upload_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to create {}: {e}", upload_dir.display())))?;

    let file_name = format!(
        "{}-{}",
        Uuid::new_v4(),
        sanitize_filename::sanitize(original_name)
    );
    let path = upload_dir.join(file_name);

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to write {}: {e}", path.display())))?;

    info!("Stored template file at {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Best-effort removal of a stored template file. Failures are logged only.
pub async fn remove_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove template file {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_name_rejects_unsupported_extension() {
        let err = validate_file_name("malware.exe").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_file_creates_directory_and_sanitizes_name() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("nested");

        let path = store_file(&upload_dir, "../../etc/passwd.txt", b"hello")
            .await
            .unwrap();

        assert!(path.starts_with(&upload_dir));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_remove_file_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        remove_file(&dir.path().join("gone.txt")).await;
    }
}
