//! File I/O utilities.
//!
//! Every write is a single open/write/close with no partial-write recovery; a
//! failure surfaces as `OcrCropError::Io` and is not retried.

use crate::{OcrCropError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Read a file asynchronously.
///
/// # Errors
///
/// Returns `OcrCropError::Io` for I/O errors (these always bubble up).
pub async fn read_file_async(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).await.map_err(OcrCropError::Io)
}

/// Validate that an input file exists.
///
/// # Errors
///
/// Returns `OcrCropError::InputNotFound` if the path is missing or not a file.
pub fn validate_file_exists(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(OcrCropError::InputNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Resolve `path` against the current directory without touching the filesystem.
pub fn resolve_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    std::path::absolute(path.as_ref()).map_err(OcrCropError::Io)
}

/// Write `text` to `path`, appending when `append` is set and truncating otherwise.
///
/// No separator is inserted between appended writes.
pub async fn write_text_async(path: impl AsRef<Path>, text: &str, append: bool) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    let mut file = options.open(path.as_ref()).await?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Write `bytes` to `path`, replacing any existing file.
pub async fn write_bytes_async(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    fs::write(path.as_ref(), bytes).await.map_err(OcrCropError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_file_async() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"test content").unwrap();

        let content = read_file_async(&file_path).await.unwrap();
        assert_eq!(content, b"test content");
    }

    #[tokio::test]
    async fn test_read_file_async_io_error() {
        let result = read_file_async("/nonexistent/file.txt").await;
        assert!(matches!(result.unwrap_err(), OcrCropError::Io(_)));
    }

    #[test]
    fn test_validate_file_exists() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.png");
        File::create(&file_path).unwrap();

        assert!(validate_file_exists(&file_path).is_ok());
        assert!(matches!(
            validate_file_exists(dir.path().join("nonexistent.png")),
            Err(OcrCropError::InputNotFound(_))
        ));
        assert!(validate_file_exists(dir.path()).is_err());
    }

    #[test]
    fn test_resolve_path_is_absolute() {
        let resolved = resolve_path("some/relative.png").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative.png"));
    }

    #[tokio::test]
    async fn test_write_text_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_text_async(&path, "first", false).await.unwrap();
        write_text_async(&path, "second", false).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_text_append_inserts_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_text_async(&path, "A", true).await.unwrap();
        write_text_async(&path, "B", true).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "AB");
    }

    #[tokio::test]
    async fn test_write_text_into_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let result = write_text_async(&path, "text", false).await;
        assert!(matches!(result.unwrap_err(), OcrCropError::Io(_)));
    }

    #[tokio::test]
    async fn test_write_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        write_bytes_async(&path, &[1, 2, 3]).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
