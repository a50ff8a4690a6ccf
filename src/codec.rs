//! Codec capability surface
//!
//! A closed set of codec families selected once from the caller's hint;
//! everything codec-specific (header layout, type names, parameter-set
//! dispatch) hangs off a match on this enum.

use serde::Serialize;

use crate::constants::*;
use crate::error::ParameterSetError;
use crate::parsers::{h264, hevc};
use crate::types::{NalUnit, ParameterSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    H264,
    Hevc,
    Unsupported,
}

impl Codec {
    /// Map a caller-supplied hint onto a family; anything unrecognized
    /// falls back to hex-only analysis.
    pub fn from_hint(hint: &str) -> Self {
        match hint.to_ascii_lowercase().as_str() {
            "h264" | "h.264" | "avc" => Codec::H264,
            "hevc" | "h265" | "h.265" => Codec::Hevc,
            _ => Codec::Unsupported,
        }
    }

    /// NAL header length in bytes.
    pub fn header_len(self) -> usize {
        match self {
            Codec::H264 => 1,
            Codec::Hevc => 2,
            Codec::Unsupported => 0,
        }
    }

    /// Extract nal_unit_type from the first header byte(s).
    pub fn nal_type(self, payload: &[u8]) -> Option<u8> {
        match self {
            // forbidden_zero_bit(1) + nal_ref_idc(2) + nal_unit_type(5)
            Codec::H264 => payload.first().map(|b| b & 0x1F),
            // forbidden_zero_bit(1) + nal_unit_type(6) + layer_id(6) + temporal_id_plus1(3)
            Codec::Hevc => {
                if payload.len() >= 2 {
                    Some((payload[0] >> 1) & 0x3F)
                } else {
                    None
                }
            }
            Codec::Unsupported => None,
        }
    }

    pub fn type_name(self, nal_type: u8) -> &'static str {
        match self {
            Codec::H264 => h264_type_name(nal_type),
            Codec::Hevc => hevc_type_name(nal_type),
            Codec::Unsupported => "unknown",
        }
    }

    /// Whether units of this type start a decodable picture.
    pub fn is_keyframe(self, nal_type: u8) -> bool {
        match self {
            Codec::H264 => nal_type == H264_NAL_IDR,
            Codec::Hevc => (16..=21).contains(&nal_type),
            Codec::Unsupported => false,
        }
    }

    /// Decode the unit's RBSP when it is a parameter set.
    ///
    /// `None` for anything else; a decode failure is returned, not raised,
    /// so the caller can skip the record and keep the rest of the scan.
    pub fn decode_parameter_set(
        self,
        unit: &NalUnit,
    ) -> Option<Result<ParameterSet, ParameterSetError>> {
        match self {
            Codec::H264 => match unit.nal_type {
                Some(H264_NAL_SPS) => Some(h264::decode_sps(&unit.rbsp).map(ParameterSet::Sps)),
                Some(H264_NAL_PPS) => Some(h264::decode_pps(&unit.rbsp).map(ParameterSet::Pps)),
                _ => None,
            },
            Codec::Hevc => match unit.nal_type {
                Some(HEVC_NAL_VPS) => Some(hevc::decode_vps(&unit.rbsp).map(ParameterSet::Vps)),
                Some(HEVC_NAL_SPS) => Some(hevc::decode_sps(&unit.rbsp).map(ParameterSet::Sps)),
                Some(HEVC_NAL_PPS) => Some(hevc::decode_pps(&unit.rbsp).map(ParameterSet::Pps)),
                _ => None,
            },
            Codec::Unsupported => None,
        }
    }
}

fn h264_type_name(nal_type: u8) -> &'static str {
    match nal_type {
        H264_NAL_NON_IDR => "non-IDR slice",
        2 => "slice partition A",
        3 => "slice partition B",
        4 => "slice partition C",
        H264_NAL_IDR => "IDR slice",
        H264_NAL_SEI => "SEI",
        H264_NAL_SPS => "SPS",
        H264_NAL_PPS => "PPS",
        H264_NAL_AUD => "access unit delimiter",
        10 => "end of sequence",
        11 => "end of stream",
        12 => "filler data",
        13 => "SPS extension",
        14 => "prefix NAL unit",
        15 => "subset SPS",
        19 => "auxiliary slice",
        _ => "reserved/unspecified",
    }
}

fn hevc_type_name(nal_type: u8) -> &'static str {
    match nal_type {
        0 | 1 => "trailing slice",
        2 | 3 => "TSA slice",
        4 | 5 => "STSA slice",
        6 | 7 => "RADL slice",
        8 | 9 => "RASL slice",
        16..=18 => "BLA slice",
        19 | 20 => "IDR slice",
        21 => "CRA slice",
        HEVC_NAL_VPS => "VPS",
        HEVC_NAL_SPS => "SPS",
        HEVC_NAL_PPS => "PPS",
        HEVC_NAL_AUD => "access unit delimiter",
        36 => "end of sequence",
        37 => "end of bitstream",
        38 => "filler data",
        39 => "SEI (prefix)",
        40 => "SEI (suffix)",
        _ => "reserved/unspecified",
    }
}
