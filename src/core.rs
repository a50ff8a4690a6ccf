//! Analysis orchestration
//!
//! The engine is a stateless function of `(bytes, request)`. This module
//! owns the size-budget policy: full inline analysis under the budget, a
//! too-large advisory above it (the scanner is never run on an oversized
//! stream), and plain hex chunks for explicit byte-range requests. Chunk
//! sequencing state lives entirely in the caller.

use std::time::Duration;

use bytes::Bytes;
use log::{debug, warn};

use crate::codec::Codec;
use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::AnalysisError;
use crate::scanner::{ScanOptions, scan};
use crate::source::ByteSource;
use crate::stats;
use crate::types::{
    AnalysisRequest, AnalysisResponse, AnalysisResult, ChunkResult, ChunkWindow, NalUnit,
    ParameterSet, ParameterSets,
};

/// Run one analysis request against a byte source, bounded by `wall_clock`.
///
/// Never returns an error: every failure is folded into the
/// `AnalysisResponse::Failure` wire shape.
pub async fn analyze<S: ByteSource>(
    source: &S,
    req: &AnalysisRequest,
    wall_clock: Duration,
) -> AnalysisResponse {
    match tokio::time::timeout(wall_clock, run(source, req)).await {
        Ok(Ok(resp)) => resp,
        Ok(Err(err)) => AnalysisResponse::Failure { error: err.to_string() },
        Err(_) => AnalysisResponse::Failure {
            error: AnalysisError::Timeout(wall_clock).to_string(),
        },
    }
}

async fn run<S: ByteSource>(
    source: &S,
    req: &AnalysisRequest,
) -> Result<AnalysisResponse, AnalysisError> {
    let total = source.total_size().await?;

    // Explicit byte range: hex-only chunk. The slice may begin mid-NAL,
    // so the bytes pass through unscanned.
    if let Some(range) = &req.byte_range {
        let (start, end) = range.resolve(total).map_err(AnalysisError::Source)?;
        let data = source.fetch(Some(range)).await?;
        debug!("chunk {start}..{end}: {} bytes", data.len());
        return Ok(AnalysisResponse::Chunk(ChunkResult {
            bitstream: hex::encode(&data),
            current_chunk: ChunkWindow { start, end },
        }));
    }

    let codec = Codec::from_hint(&req.codec_hint);

    if total > req.max_inline_size {
        let suggested = suggested_chunk_size(req.max_inline_size);
        debug!("stream of {total} bytes exceeds inline budget {}", req.max_inline_size);
        return Ok(AnalysisResponse::TooLarge {
            message: format!(
                "stream is {total} bytes, over the {} byte inline budget; \
                 request byte ranges of up to {suggested} bytes instead",
                req.max_inline_size
            ),
            total_size: total,
            suggested_chunk_size: suggested,
        });
    }

    let data = source.fetch(None).await?;
    Ok(AnalysisResponse::Full(analyze_buffer(
        data,
        codec,
        req.codec_specific,
    )))
}

fn suggested_chunk_size(max_inline_size: u64) -> u64 {
    if max_inline_size > 0 {
        DEFAULT_CHUNK_SIZE.min(max_inline_size)
    } else {
        DEFAULT_CHUNK_SIZE
    }
}

/// Scan, classify and decode one fully materialized buffer.
///
/// An unsupported codec skips scanning entirely; the hex rendition is
/// still produced.
fn analyze_buffer(data: Bytes, codec: Codec, codec_specific: bool) -> AnalysisResult {
    let nal_units = if codec == Codec::Unsupported {
        Vec::new()
    } else {
        scan(&data, &ScanOptions { codec, base_offset: 0 })
    };

    let parameter_sets = if codec_specific {
        decode_parameter_sets(codec, &nal_units)
    } else {
        ParameterSets::default()
    };

    let statistics = stats::collect(data.len() as u64, &nal_units);

    AnalysisResult {
        codec,
        bitstream: hex::encode(&data),
        nal_units,
        parameter_sets,
        statistics,
    }
}

/// Decode every SPS/PPS/VPS in scan order. A malformed set is logged and
/// skipped; it never invalidates the rest of the response.
fn decode_parameter_sets(codec: Codec, nal_units: &[NalUnit]) -> ParameterSets {
    let mut sets = ParameterSets::default();
    for unit in nal_units {
        match codec.decode_parameter_set(unit) {
            Some(Ok(ParameterSet::Sps(sps))) => sets.sps.push(sps),
            Some(Ok(ParameterSet::Pps(pps))) => sets.pps.push(pps),
            Some(Ok(ParameterSet::Vps(vps))) => sets.vps.push(vps),
            Some(Err(err)) => {
                warn!("skipping {} at offset {}: {err}", unit.type_name, unit.offset);
            }
            None => {}
        }
    }
    sets
}
