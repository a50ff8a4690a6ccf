//! Error taxonomy for the analysis engine
//!
//! Everything here is a value; nothing crosses the engine boundary as a
//! panic. At the wire, failures are folded into `{success: false, error}`.

use std::time::Duration;
use thiserror::Error;

/// Bit reader ran off the end of its buffer.
///
/// Internal to the reader; decode functions convert this to
/// [`ParameterSetError`] at their boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bitstream exhausted")]
pub struct BitstreamExhausted;

/// A parameter set whose syntax prefix could not be decoded.
///
/// Isolated to the offending SPS/PPS/VPS; the rest of the scan survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed parameter set: {0}")]
pub struct ParameterSetError(pub &'static str);

impl From<BitstreamExhausted> for ParameterSetError {
    fn from(_: BitstreamExhausted) -> Self {
        ParameterSetError("bitstream exhausted")
    }
}

/// Failures raised by a byte source adapter.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("stream not found: {0}")]
    StreamNotFound(String),

    #[error("invalid byte range: {0}")]
    Range(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Fatal failures for a single analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),
}
