// src/lib.rs
pub mod analyzer {
    use std::path::PathBuf;
    use std::time::Duration;

    pub use crate::codec::Codec;
    pub use crate::constants::{
        DEFAULT_CHUNK_SIZE, DEFAULT_MAX_INLINE_SIZE, DEFAULT_TIMEOUT_SECS,
    };
    pub use crate::core::analyze;
    pub use crate::error::{AnalysisError, ParameterSetError, SourceError};
    pub use crate::report::{to_json, to_json_pretty};
    pub use crate::source::{ByteRange, ByteSource, FileByteSource, MemoryByteSource};
    pub use crate::stats::count_by_type;
    pub use crate::types::{
        AnalysisRequest, AnalysisResponse, AnalysisResult, BitstreamStatistics, ChunkResult,
        ChunkWindow, NalUnit, ParameterSet, ParameterSets, Pps, Sps, Vps,
    };

    pub struct Options {
        pub codec_hint: String,
        pub codec_specific: bool,
        pub max_inline_size: u64,
        pub byte_range: Option<ByteRange>,
        pub timeout_secs: u64,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                codec_hint: "h264".into(),
                codec_specific: true,
                max_inline_size: DEFAULT_MAX_INLINE_SIZE,
                byte_range: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }
        }
    }

    impl Options {
        fn request(&self) -> AnalysisRequest {
            AnalysisRequest {
                codec_hint: self.codec_hint.clone(),
                codec_specific: self.codec_specific,
                max_inline_size: self.max_inline_size,
                byte_range: self.byte_range,
            }
        }
    }

    /// Async entry-point; analyzes one elementary-stream file.
    pub async fn analyze_file(path: PathBuf, opts: &Options) -> AnalysisResponse {
        let source = FileByteSource::new(path);
        crate::core::analyze(&source, &opts.request(), Duration::from_secs(opts.timeout_secs))
            .await
    }
}

mod codec;
mod constants;
mod core;
mod error;
mod parsers;
mod report;
mod scanner;
mod source;
mod stats;
mod types;
