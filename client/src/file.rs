//! Files picked for upload

use std::path::Path;

use bytes::Bytes;
use image::ImageFormat;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file as chosen by the user, before or after compression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, extension included
    pub name: String,
    /// Declared content type
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, deriving the content type from its extension
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = ImageFormat::from_path(path)
            .map_or(FALLBACK_CONTENT_TYPE, |format| format.to_mime_type());

        Ok(Self::new(name, content_type, Bytes::from(bytes)))
    }

    /// Whether the declared content type names an image
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_check_uses_declared_type() {
        let png = UploadFile::new("a.png", "image/png", Bytes::new());
        let text = UploadFile::new("a.png", "text/plain", Bytes::new());
        assert!(png.is_image());
        assert!(!text.is_image());
    }

    #[tokio::test]
    async fn from_path_guesses_content_type() {
        let dir = tempfile::tempdir().unwrap();

        let photo = dir.path().join("beach.JPG");
        tokio::fs::write(&photo, b"not really a jpeg").await.unwrap();
        let file = UploadFile::from_path(&photo).await.unwrap();
        assert_eq!(file.name, "beach.JPG");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.size(), 17);

        let notes = dir.path().join("notes.txt");
        tokio::fs::write(&notes, b"hi").await.unwrap();
        let file = UploadFile::from_path(&notes).await.unwrap();
        assert_eq!(file.content_type, "application/octet-stream");
        assert!(!file.is_image());
    }
}
