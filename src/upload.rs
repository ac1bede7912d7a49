//! Request-scoped storage for uploaded files.

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Reject declared content types that are present but not `video/*`.
pub fn check_content_type(content_type: Option<&str>) -> Result<()> {
    match content_type {
        Some(ct) if !ct.starts_with("video/") => {
            tracing::warn!(content_type = ct, "Rejected content type");
            Err(Error::ContentTypeRejected {
                content_type: ct.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Reject declared filenames containing `..` or a path separator.
///
/// The declared name is never used to build a storage path.
pub fn check_filename(filename: Option<&str>) -> Result<()> {
    match filename {
        Some(name) if name.contains("..") || name.contains('/') || name.contains('\\') => {
            tracing::warn!(filename = name, "Rejected suspicious file name");
            Err(Error::UnsafeFilename {
                filename: name.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// A uniquely named temporary file holding one upload.
///
/// The file is deleted when this value is dropped, whichever way the request
/// ends. A failed deletion is logged and otherwise ignored.
pub struct UploadedFile {
    file: Option<NamedTempFile>,
    writer: tokio::fs::File,
    path: PathBuf,
    len: u64,
}

impl UploadedFile {
    /// Create an empty temp file in `dir`, or the system temp dir.
    pub fn create(dir: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("upload-").suffix(".mp4");
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let writer = tokio::fs::File::from_std(file.as_file().try_clone()?);
        let path = file.path().to_path_buf();
        tracing::debug!(path = %path.display(), "Created upload temp file");

        Ok(Self {
            file: Some(file),
            writer,
            path,
            len: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy `chunks` into the file, failing with [`Error::SizeExceeded`] as
    /// soon as the running total passes `limit`.
    ///
    /// Only one chunk is held in memory at a time. A stream error is reported
    /// as [`Error::BadRequest`].
    pub async fn write_stream<S, E>(&mut self, chunks: S, limit: u64) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Display,
    {
        futures::pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| Error::BadRequest(e.to_string()))?;

            self.len += chunk.len() as u64;
            if self.len > limit {
                tracing::warn!(bytes = self.len, limit, "Upload exceeds size limit");
                return Err(Error::SizeExceeded { limit_bytes: limit });
            }

            self.writer.write_all(&chunk).await?;
        }

        self.writer.flush().await?;
        Ok(self.len)
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            match file.close() {
                Ok(()) => tracing::debug!(path = %self.path.display(), "Removed upload temp file"),
                Err(e) => tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove upload temp file"
                ),
            }
        }
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("path", &self.path)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = std::result::Result<Bytes, String>> {
        futures::stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_content_type_check() {
        assert!(check_content_type(Some("video/mp4")).is_ok());
        assert!(check_content_type(Some("video/quicktime")).is_ok());
        assert!(check_content_type(None).is_ok());
        assert_matches!(
            check_content_type(Some("image/png")),
            Err(Error::ContentTypeRejected { content_type }) if content_type == "image/png"
        );
        assert!(check_content_type(Some("application/octet-stream")).is_err());
    }

    #[test]
    fn test_filename_check() {
        assert!(check_filename(Some("promo.mp4")).is_ok());
        assert!(check_filename(Some("promo.v2.mp4")).is_ok());
        assert!(check_filename(None).is_ok());
        assert!(check_filename(Some("../evil.mp4")).is_err());
        assert!(check_filename(Some("clips/promo.mp4")).is_err());
        assert!(check_filename(Some("C:\\clips\\promo.mp4")).is_err());
        assert!(check_filename(Some("promo..mp4")).is_err());
    }

    #[tokio::test]
    async fn test_write_and_cleanup() {
        let dir = tempdir().unwrap();
        let mut upload = UploadedFile::create(Some(dir.path())).unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert!(upload.is_empty());

        let written = upload
            .write_stream(chunks(&[b"hello ", b"world"]), 1024)
            .await
            .unwrap();
        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");

        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_size_limit() {
        let dir = tempdir().unwrap();
        let mut upload = UploadedFile::create(Some(dir.path())).unwrap();
        let path = upload.path().to_path_buf();

        let err = upload
            .write_stream(chunks(&[b"0123456789", b"0123456789"]), 15)
            .await
            .unwrap_err();
        assert_matches!(err, Error::SizeExceeded { limit_bytes: 15 });

        drop(upload);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_exact_limit_is_accepted() {
        let dir = tempdir().unwrap();
        let mut upload = UploadedFile::create(Some(dir.path())).unwrap();
        let written = upload.write_stream(chunks(&[b"01234", b"56789"]), 10).await.unwrap();
        assert_eq!(written, 10);
    }

    #[tokio::test]
    async fn test_stream_error_is_bad_request() {
        let dir = tempdir().unwrap();
        let mut upload = UploadedFile::create(Some(dir.path())).unwrap();
        let stream = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"abc")),
            Err("connection reset".to_string()),
        ]);
        assert_matches!(
            upload.write_stream(stream, 1024).await,
            Err(Error::BadRequest(msg)) if msg == "connection reset"
        );
    }
}
