//! Constants for Annex-B bitstream analysis

/// Annex-B start codes
pub const START_CODE_3: [u8; 3] = [0x00, 0x00, 0x01];
pub const START_CODE_4: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Emulation prevention sequence (0x000003, trailing 0x03 is removed)
pub const EMULATION_PREVENTION: [u8; 3] = [0x00, 0x00, 0x03];

/// Size budget defaults
pub const DEFAULT_MAX_INLINE_SIZE: u64 = 8 * 1024 * 1024; // 8 MiB inline before chunked delivery
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024; // 1 MiB suggested byte-range size
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// H.264 NAL unit types (ITU-T H.264 Table 7-1)
pub const H264_NAL_NON_IDR: u8 = 1;
pub const H264_NAL_IDR: u8 = 5;
pub const H264_NAL_SEI: u8 = 6;
pub const H264_NAL_SPS: u8 = 7;
pub const H264_NAL_PPS: u8 = 8;
pub const H264_NAL_AUD: u8 = 9;

/// HEVC NAL unit types (ITU-T H.265 Table 7-1)
pub const HEVC_NAL_VPS: u8 = 32;
pub const HEVC_NAL_SPS: u8 = 33;
pub const HEVC_NAL_PPS: u8 = 34;
pub const HEVC_NAL_AUD: u8 = 35;

/// H.264 profiles that carry chroma/bit-depth fields in the SPS
pub const H264_HIGH_PROFILES: [u8; 11] = [100, 110, 122, 244, 44, 83, 86, 118, 128, 138, 144];
