//! Byte source adapters
//!
//! The engine never touches container formats; a byte source hands it raw
//! elementary-stream bytes, in full or by byte range. Fetches are idempotent
//! reads with no side effects, so a request may safely be re-issued.

use std::io::SeekFrom;
use std::path::PathBuf;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::SourceError;

/// Requested byte window. A missing `end` means "through end of stream";
/// an `end` beyond the stream is clamped, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteRange {
    pub start: u64,
    #[serde(default)]
    pub end: Option<u64>,
}

impl ByteRange {
    /// Resolve against a concrete stream size into `[start, end)`.
    pub fn resolve(&self, total_size: u64) -> Result<(u64, u64), SourceError> {
        if self.start >= total_size {
            return Err(SourceError::Range(format!(
                "start {} is beyond stream end {}",
                self.start, total_size
            )));
        }
        if let Some(end) = self.end {
            if self.start > end {
                return Err(SourceError::Range(format!(
                    "start {} is past end {}",
                    self.start, end
                )));
            }
        }
        let end = self.end.map_or(total_size, |e| e.min(total_size));
        Ok((self.start, end))
    }
}

/// Adapter over whatever holds the elementary stream.
#[allow(async_fn_in_trait)]
pub trait ByteSource {
    /// Total size in bytes of the selected stream.
    async fn total_size(&self) -> Result<u64, SourceError>;

    /// Fetch the whole stream, or exactly the resolved slice of it.
    async fn fetch(&self, range: Option<&ByteRange>) -> Result<Bytes, SourceError>;
}

/// File-backed byte source; the path acts as the stream selector.
pub struct FileByteSource {
    path: PathBuf,
}

impl FileByteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn map_io(&self, err: std::io::Error) -> SourceError {
        if err.kind() == std::io::ErrorKind::NotFound {
            SourceError::StreamNotFound(self.path.display().to_string())
        } else {
            SourceError::Storage(err)
        }
    }
}

impl ByteSource for FileByteSource {
    async fn total_size(&self) -> Result<u64, SourceError> {
        let meta = fs::metadata(&self.path).await.map_err(|e| self.map_io(e))?;
        Ok(meta.len())
    }

    async fn fetch(&self, range: Option<&ByteRange>) -> Result<Bytes, SourceError> {
        match range {
            None => {
                let data = fs::read(&self.path).await.map_err(|e| self.map_io(e))?;
                Ok(Bytes::from(data))
            }
            Some(r) => {
                let total = self.total_size().await?;
                let (start, end) = r.resolve(total)?;
                let mut file = fs::File::open(&self.path)
                    .await
                    .map_err(|e| self.map_io(e))?;
                file.seek(SeekFrom::Start(start)).await?;
                let mut buf = vec![0u8; (end - start) as usize];
                file.read_exact(&mut buf).await?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

/// In-memory byte source for embedding and tests.
pub struct MemoryByteSource {
    data: Bytes,
}

impl MemoryByteSource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemoryByteSource {
    async fn total_size(&self) -> Result<u64, SourceError> {
        Ok(self.data.len() as u64)
    }

    async fn fetch(&self, range: Option<&ByteRange>) -> Result<Bytes, SourceError> {
        match range {
            None => Ok(self.data.clone()),
            Some(r) => {
                let (start, end) = r.resolve(self.data.len() as u64)?;
                Ok(self.data.slice(start as usize..end as usize))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_clamps_end_to_stream_size() {
        let range = ByteRange { start: 10, end: Some(1_000_000) };
        assert_eq!(range.resolve(100).unwrap(), (10, 100));
    }

    #[test]
    fn resolve_open_end_runs_to_stream_end() {
        let range = ByteRange { start: 0, end: None };
        assert_eq!(range.resolve(42).unwrap(), (0, 42));
    }

    #[test]
    fn resolve_rejects_start_beyond_end_of_stream() {
        let range = ByteRange { start: 100, end: None };
        assert!(matches!(range.resolve(100), Err(SourceError::Range(_))));
    }

    #[test]
    fn resolve_rejects_inverted_range() {
        let range = ByteRange { start: 50, end: Some(10) };
        assert!(matches!(range.resolve(100), Err(SourceError::Range(_))));
    }

    #[tokio::test]
    async fn memory_source_slices_exactly() {
        let src = MemoryByteSource::new(vec![0u8, 1, 2, 3, 4, 5]);
        let range = ByteRange { start: 2, end: Some(4) };
        let got = src.fetch(Some(&range)).await.unwrap();
        assert_eq!(&got[..], &[2, 3]);
    }

    #[tokio::test]
    async fn missing_file_is_stream_not_found() {
        let src = FileByteSource::new("/nonexistent/stream.h264");
        assert!(matches!(
            src.total_size().await,
            Err(SourceError::StreamNotFound(_))
        ));
    }
}
