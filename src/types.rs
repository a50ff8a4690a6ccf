use bytes::Bytes;
use serde::{Deserialize, Serialize, Serializer};

use crate::codec::Codec;
use crate::constants::DEFAULT_MAX_INLINE_SIZE;
use crate::source::ByteRange;

fn hex_bytes<S: Serializer>(bytes: &Bytes, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&hex::encode(bytes))
}

/// One NAL unit within the scanned byte range.
///
/// `offset` and `size` are measured against the original (still-emulated)
/// byte stream and span the start code through the end of the unit, so for
/// any ordered scan `offset + size` equals the next unit's `offset`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NalUnit {
    /// `None` when the unit is too short to hold this codec's NAL header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nal_type: Option<u8>,
    pub type_name: &'static str,
    pub offset: u64,
    pub size: u64,
    /// Length of the start code that preceded this unit (3 or 4)
    pub start_code_len: u8,
    /// Unit bytes without the start code, emulation bytes intact
    #[serde(serialize_with = "hex_bytes")]
    pub raw_bytes: Bytes,
    /// Payload after the NAL header with emulation prevention removed
    #[serde(serialize_with = "hex_bytes")]
    pub rbsp: Bytes,
    /// Set on a unit that runs to the end of the supplied bytes; when the
    /// scanned range is a slice of a larger stream the unit may be cut short.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_truncated: bool,
}

/// Decoded sequence parameter set (either codec family).
///
/// Only the positionally-decodable syntax prefix is modeled; VUI/HRD and
/// everything past the recognized prefix is not decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sps {
    pub id: u32,
    pub profile_idc: u8,
    pub level_idc: u8,
    /// HEVC general_tier_flag ("main"/"high"); absent for H.264
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<&'static str>,
    pub width: u32,
    pub height: u32,
    pub chroma_format: &'static str,
    pub bit_depth_luma: u8,
    pub bit_depth_chroma: u8,
}

/// Decoded picture parameter set prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pps {
    pub id: u32,
    pub sps_id: u32,
    /// H.264 entropy_coding_mode_flag ("cabac"/"cavlc")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy_coding: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_qp: Option<i32>,
}

/// Decoded video parameter set prefix (HEVC only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vps {
    pub id: u32,
    pub max_layers: u8,
    pub max_sub_layers: u8,
    pub temporal_id_nesting: bool,
}

/// Tagged union over the three parameter-set kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParameterSet {
    Sps(Sps),
    Pps(Pps),
    Vps(Vps),
}

/// All parameter sets found in one scan, in bitstream order.
///
/// Duplicate ids are retained as-is; a re-initializing or corrupt stream is
/// the caller's to interpret.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSets {
    pub sps: Vec<Sps>,
    pub pps: Vec<Pps>,
    pub vps: Vec<Vps>,
}

/// Aggregate counters over the byte range that was actually scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BitstreamStatistics {
    pub total_size: u64,
    pub nal_unit_count: u32,
}

/// Result of a full (non-chunked) analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub codec: Codec,
    /// Hex rendition of the scanned bytes
    pub bitstream: String,
    pub nal_units: Vec<NalUnit>,
    pub parameter_sets: ParameterSets,
    pub statistics: BitstreamStatistics,
}

/// Resolved byte window of a chunk response, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkWindow {
    pub start: u64,
    pub end: u64,
}

/// Result of an explicit byte-range request.
///
/// NAL classification is intentionally absent: a chunk may begin mid-NAL,
/// so per-unit fields on non-initial fragments would be unreliable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkResult {
    pub bitstream: String,
    pub current_chunk: ChunkWindow,
}

fn default_codec_specific() -> bool {
    true
}

fn default_max_inline_size() -> u64 {
    DEFAULT_MAX_INLINE_SIZE
}

/// One analysis request; the engine is a stateless function of this plus
/// the bytes behind the selected source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub codec_hint: String,
    /// When false, parameter-set decoding is skipped (hex + NAL list only)
    #[serde(default = "default_codec_specific")]
    pub codec_specific: bool,
    #[serde(default = "default_max_inline_size")]
    pub max_inline_size: u64,
    #[serde(default)]
    pub byte_range: Option<ByteRange>,
}

/// Engine response, one variant per wire shape.
#[derive(Debug, Clone)]
pub enum AnalysisResponse {
    Full(AnalysisResult),
    TooLarge {
        message: String,
        total_size: u64,
        suggested_chunk_size: u64,
    },
    Chunk(ChunkResult),
    Failure {
        error: String,
    },
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        !matches!(self, AnalysisResponse::Failure { .. })
    }
}
