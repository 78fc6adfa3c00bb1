//! The file being uploaded.

use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::Path;

/// A file held in memory for the duration of an upload.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    /// Build from in-memory bytes. The content type is guessed from the name
    /// when not given.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let file_name = file_name.into();
        let content_type = content_type.unwrap_or_else(|| guess_content_type(&file_name).to_string());
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid file name: {}", path.display()))?;
        Ok(Self::new(file_name, None, data))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lowercased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Content type for a file name, `application/octet-stream` when unknown.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_content_type_from_name() {
        let file = UploadFile::new("Deck.PDF", None, b"%PDF".to_vec());
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.extension().as_deref(), Some("pdf"));
        assert_eq!(file.size(), 4);
    }

    #[test]
    fn explicit_content_type_wins() {
        let file = UploadFile::new("blob", Some("image/png".to_string()), Vec::new());
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.extension(), None);
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.svg");
        tokio::fs::write(&path, b"<svg/>").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "logo.svg");
        assert_eq!(file.content_type, "image/svg+xml");
        assert_eq!(file.data.as_ref(), b"<svg/>");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        assert!(UploadFile::from_path("/definitely/not/here.pdf").await.is_err());
    }
}
