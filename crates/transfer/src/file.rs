//! The local file chosen for upload.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use uplink_protocol::constants::FALLBACK_CONTENT_TYPE;

use crate::TransferError;

/// Where a file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already in memory.
    Memory(Bytes),
    /// A file on disk, streamed when the transfer starts.
    Disk(PathBuf),
}

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct LocalFile {
    name: String,
    content_type: String,
    size: u64,
    source: FileSource,
}

impl LocalFile {
    /// Creates a file from in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: data.len() as u64,
            source: FileSource::Memory(data),
        }
    }

    /// Opens a file on disk without reading its contents.
    ///
    /// The name is the path's final component; the content type is
    /// detected from the extension.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, TransferError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(TransferError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                TransferError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("path has no file name: {}", path.display()),
                ))
            })?;
        let content_type = detect_content_type(&name)
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();

        Ok(Self {
            name,
            content_type,
            size: metadata.len(),
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    /// Overrides the detected content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }
}

/// Detects a MIME type from a file name's extension.
pub fn detect_content_type(path: &str) -> Option<&'static str> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("pdf") => Some("application/pdf"),
        Some("json") => Some("application/json"),
        Some("zip") => Some("application/zip"),
        Some("gz") => Some("application/gzip"),
        Some("txt" | "log") => Some("text/plain"),
        Some("csv") => Some("text/csv"),
        Some("html" | "htm") => Some("text/html"),
        Some("md") => Some("text/markdown"),
        Some("png") => Some("image/png"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("webp") => Some("image/webp"),
        Some("gif") => Some("image/gif"),
        Some("svg") => Some("image/svg+xml"),
        Some("mp3") => Some("audio/mpeg"),
        Some("wav") => Some("audio/wav"),
        Some("mp4") => Some("video/mp4"),
        Some("webm") => Some("video/webm"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_content_type_known() {
        assert_eq!(detect_content_type("report.pdf"), Some("application/pdf"));
        assert_eq!(detect_content_type("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(detect_content_type("notes.txt"), Some("text/plain"));
        assert_eq!(detect_content_type("clip.mp4"), Some("video/mp4"));
    }

    #[test]
    fn detect_content_type_unknown() {
        assert_eq!(detect_content_type("archive.xyz"), None);
        assert_eq!(detect_content_type("noext"), None);
        assert_eq!(detect_content_type(""), None);
    }

    #[test]
    fn detect_content_type_case_insensitive() {
        assert_eq!(detect_content_type("REPORT.PDF"), Some("application/pdf"));
    }

    #[test]
    fn from_bytes_records_size() {
        let file = LocalFile::from_bytes("a.txt", "text/plain", &b"hello"[..]);
        assert_eq!(file.name(), "a.txt");
        assert_eq!(file.size(), 5);
        assert!(matches!(file.source(), FileSource::Memory(_)));
    }

    #[tokio::test]
    async fn open_reads_metadata_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = LocalFile::open(&path).await.unwrap();
        assert_eq!(file.name(), "report.pdf");
        assert_eq!(file.content_type(), "application/pdf");
        assert_eq!(file.size(), 8);
        assert!(matches!(file.source(), FileSource::Disk(p) if p == &path));
    }

    #[tokio::test]
    async fn open_unknown_extension_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0u8; 3]).unwrap();

        let file = LocalFile::open(&path).await.unwrap();
        assert_eq!(file.content_type(), FALLBACK_CONTENT_TYPE);

        let file = file.with_content_type("application/x-custom");
        assert_eq!(file.content_type(), "application/x-custom");
    }

    #[tokio::test]
    async fn open_rejects_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalFile::open(dir.path()).await.is_err());
        assert!(LocalFile::open(dir.path().join("missing.txt")).await.is_err());
    }
}
