//! Wire-format serialization of analysis responses
//!
//! One JSON shape per response variant; failures always come back as
//! `{success: false, error}` rather than an error crossing the boundary.

use serde::Serialize;

use crate::codec::Codec;
use crate::types::{
    AnalysisResponse, BitstreamStatistics, ChunkWindow, NalUnit, ParameterSets,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FullJson<'a> {
    success: bool,
    generated_at: String,
    bitstream: &'a str,
    format: &'static str,
    codec: Codec,
    nal_units: &'a [NalUnit],
    parameter_sets: &'a ParameterSets,
    statistics: &'a BitstreamStatistics,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SizeOnlyStats {
    total_size: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TooLargeJson<'a> {
    success: bool,
    generated_at: String,
    bitstream: Option<&'a str>, // always null, kept for shape parity
    message: &'a str,
    statistics: SizeOnlyStats,
    suggested_chunk_size: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChunkJson<'a> {
    success: bool,
    generated_at: String,
    bitstream: &'a str,
    current_chunk: ChunkWindow,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureJson<'a> {
    success: bool,
    error: &'a str,
}

fn to_value(resp: &AnalysisResponse) -> serde_json::Value {
    let generated_at = chrono::Utc::now().to_rfc3339();
    match resp {
        AnalysisResponse::Full(result) => serde_json::to_value(FullJson {
            success: true,
            generated_at,
            bitstream: &result.bitstream,
            format: "hex",
            codec: result.codec,
            nal_units: &result.nal_units,
            parameter_sets: &result.parameter_sets,
            statistics: &result.statistics,
        }),
        AnalysisResponse::TooLarge { message, total_size, suggested_chunk_size } => {
            serde_json::to_value(TooLargeJson {
                success: true,
                generated_at,
                bitstream: None,
                message,
                statistics: SizeOnlyStats { total_size: *total_size },
                suggested_chunk_size: *suggested_chunk_size,
            })
        }
        AnalysisResponse::Chunk(chunk) => serde_json::to_value(ChunkJson {
            success: true,
            generated_at,
            bitstream: &chunk.bitstream,
            current_chunk: chunk.current_chunk,
        }),
        AnalysisResponse::Failure { error } => serde_json::to_value(FailureJson {
            success: false,
            error,
        }),
    }
    .unwrap()
}

pub fn to_json(resp: &AnalysisResponse) -> String {
    to_value(resp).to_string()
}

pub fn to_json_pretty(resp: &AnalysisResponse) -> String {
    serde_json::to_string_pretty(&to_value(resp)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisResult, ChunkResult};

    #[test]
    fn too_large_keeps_null_bitstream_on_the_wire() {
        let resp = AnalysisResponse::TooLarge {
            message: "over budget".into(),
            total_size: 123,
            suggested_chunk_size: 64,
        };
        let v = to_value(&resp);
        assert_eq!(v["success"], true);
        assert!(v["bitstream"].is_null());
        assert_eq!(v["statistics"]["totalSize"], 123);
        assert_eq!(v["suggestedChunkSize"], 64);
    }

    #[test]
    fn full_response_carries_hex_format_marker() {
        let resp = AnalysisResponse::Full(AnalysisResult {
            codec: Codec::H264,
            bitstream: "00000001".into(),
            nal_units: Vec::new(),
            parameter_sets: ParameterSets::default(),
            statistics: BitstreamStatistics { total_size: 4, nal_unit_count: 0 },
        });
        let v = to_value(&resp);
        assert_eq!(v["format"], "hex");
        assert_eq!(v["codec"], "h264");
        assert_eq!(v["statistics"]["nalUnitCount"], 0);
    }

    #[test]
    fn chunk_response_reports_its_window() {
        let resp = AnalysisResponse::Chunk(ChunkResult {
            bitstream: "ff".into(),
            current_chunk: ChunkWindow { start: 10, end: 11 },
        });
        let v = to_value(&resp);
        assert_eq!(v["currentChunk"]["start"], 10);
        assert_eq!(v["currentChunk"]["end"], 11);
        assert!(v.get("nalUnits").is_none());
    }

    #[test]
    fn failure_is_structured_not_thrown() {
        let resp = AnalysisResponse::Failure { error: "stream not found: x".into() };
        let v = to_value(&resp);
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "stream not found: x");
    }
}
