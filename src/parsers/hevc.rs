//! HEVC parameter set decoders
//!
//! Same technique as the H.264 decoders: walk the syntax prefix with the
//! bit reader, stop once the reported fields are out. The SPS decoder has
//! to cross profile_tier_level to reach the id and dimensions.

use log::trace;

use crate::error::ParameterSetError;
use crate::parsers::bits::RbspReader;
use crate::parsers::{bit_depth_from_minus8, chroma_format_name};
use crate::types::{Pps, Sps, Vps};

struct ProfileTierLevel {
    profile_idc: u8,
    tier: &'static str,
    level_idc: u8,
}

/// general_profile_space(2) + tier(1) + profile_idc(5) + compat(32) +
/// constraints(48) + level_idc(8), then per-sub-layer presence flags.
fn profile_tier_level(
    br: &mut RbspReader,
    max_sub_layers: u8,
) -> Result<ProfileTierLevel, ParameterSetError> {
    br.skip(2)?; // general_profile_space
    let tier = if br.read_flag()? { "high" } else { "main" };
    let profile_idc = br.read_bits(5)? as u8;
    br.skip(32)?; // general_profile_compatibility_flags
    br.skip(48)?; // general constraint flags
    let level_idc = br.read_bits(8)? as u8;

    let sub_layers = max_sub_layers.saturating_sub(1) as usize;
    let mut profile_present = [false; 8];
    let mut level_present = [false; 8];
    for i in 0..sub_layers {
        profile_present[i] = br.read_flag()?;
        level_present[i] = br.read_flag()?;
    }
    if sub_layers > 0 {
        for _ in sub_layers..8 {
            br.skip(2)?; // reserved_zero_2bits
        }
    }
    for i in 0..sub_layers {
        if profile_present[i] {
            br.skip(88)?;
        }
        if level_present[i] {
            br.skip(8)?; // sub_layer_level_idc
        }
    }

    Ok(ProfileTierLevel { profile_idc, tier, level_idc })
}

pub fn decode_vps(rbsp: &[u8]) -> Result<Vps, ParameterSetError> {
    let mut br = RbspReader::new(rbsp);

    let vps_id = br.read_bits(4)?;
    br.skip(2)?; // vps_base_layer_internal_flag, vps_base_layer_available_flag
    let max_layers = br.read_bits(6)? as u8 + 1;
    let max_sub_layers = br.read_bits(3)? as u8 + 1;
    let temporal_id_nesting = br.read_flag()?;

    Ok(Vps {
        id: vps_id,
        max_layers,
        max_sub_layers,
        temporal_id_nesting,
    })
}

pub fn decode_sps(rbsp: &[u8]) -> Result<Sps, ParameterSetError> {
    let mut br = RbspReader::new(rbsp);

    br.skip(4)?; // sps_video_parameter_set_id
    let max_sub_layers = br.read_bits(3)? as u8 + 1;
    br.skip(1)?; // sps_temporal_id_nesting_flag
    let ptl = profile_tier_level(&mut br, max_sub_layers)?;

    let sps_id = br.read_ue()?;
    let chroma_format_idc = br.read_ue()?;
    if chroma_format_idc == 3 {
        br.skip(1)?; // separate_colour_plane_flag
    }
    let mut width = br.read_ue()?;
    let mut height = br.read_ue()?;

    if br.read_flag()? {
        // conformance window offsets are in chroma sample units
        let left = br.read_ue()?;
        let right = br.read_ue()?;
        let top = br.read_ue()?;
        let bottom = br.read_ue()?;
        let (sub_w, sub_h): (u64, u64) = match chroma_format_idc {
            1 => (2, 2),
            2 => (2, 1),
            _ => (1, 1),
        };
        // widened so ue(v) offsets near u32::MAX cannot overflow the product
        width = u64::from(width)
            .saturating_sub((u64::from(left) + u64::from(right)) * sub_w) as u32;
        height = u64::from(height)
            .saturating_sub((u64::from(top) + u64::from(bottom)) * sub_h) as u32;
    }

    let bit_depth_luma = bit_depth_from_minus8(br.read_ue()?)?;
    let bit_depth_chroma = bit_depth_from_minus8(br.read_ue()?)?;

    trace!("hevc sps {sps_id}: profile {}, {width}x{height}", ptl.profile_idc);

    Ok(Sps {
        id: sps_id,
        profile_idc: ptl.profile_idc,
        level_idc: ptl.level_idc,
        tier: Some(ptl.tier),
        width,
        height,
        chroma_format: chroma_format_name(chroma_format_idc),
        bit_depth_luma,
        bit_depth_chroma,
    })
}

pub fn decode_pps(rbsp: &[u8]) -> Result<Pps, ParameterSetError> {
    let mut br = RbspReader::new(rbsp);

    let pps_id = br.read_ue()?;
    let sps_id = br.read_ue()?;
    br.skip(1)?; // dependent_slice_segments_enabled_flag
    br.skip(1)?; // output_flag_present_flag
    br.skip(3)?; // num_extra_slice_header_bits
    br.skip(1)?; // sign_data_hiding_enabled_flag
    br.skip(1)?; // cabac_init_present_flag
    br.read_ue()?; // num_ref_idx_l0_default_active_minus1
    br.read_ue()?; // num_ref_idx_l1_default_active_minus1
    let init_qp = br.read_se()? + 26;

    Ok(Pps {
        id: pps_id,
        sps_id,
        entropy_coding: None,
        init_qp: Some(init_qp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::testutil::BitWriter;

    fn put_general_ptl(w: &mut BitWriter, profile_idc: u32, level_idc: u32) {
        w.put_bits(0, 2); // general_profile_space
        w.put_bit(false); // general_tier_flag: main
        w.put_bits(profile_idc, 5);
        w.put_bits(0, 32); // compatibility flags
        w.put_bits(0, 24); // constraint flags...
        w.put_bits(0, 24); // ...48 bits total
        w.put_bits(level_idc, 8);
    }

    /// Main-profile 1920x1080 SPS with a single sub-layer.
    fn main_profile_1080p_sps() -> Vec<u8> {
        let mut w = BitWriter::new();
        w.put_bits(0, 4); // sps_video_parameter_set_id
        w.put_bits(0, 3); // sps_max_sub_layers_minus1
        w.put_bit(true); // sps_temporal_id_nesting_flag
        put_general_ptl(&mut w, 1, 120); // Main, level 4.0
        w.put_ue(0); // sps_seq_parameter_set_id
        w.put_ue(1); // chroma_format_idc: 4:2:0
        w.put_ue(1920); // pic_width_in_luma_samples
        w.put_ue(1080); // pic_height_in_luma_samples
        w.put_bit(false); // conformance_window_flag
        w.put_ue(2); // bit_depth_luma_minus8 -> 10
        w.put_ue(0); // bit_depth_chroma_minus8 -> 8
        w.finish()
    }

    #[test]
    fn decodes_main_profile_1080p_sps() {
        let sps = decode_sps(&main_profile_1080p_sps()).unwrap();
        assert_eq!(sps.id, 0);
        assert_eq!(sps.profile_idc, 1);
        assert_eq!(sps.tier, Some("main"));
        assert_eq!(sps.level_idc, 120);
        assert_eq!((sps.width, sps.height), (1920, 1080));
        assert_eq!(sps.chroma_format, "4:2:0");
        assert_eq!(sps.bit_depth_luma, 10);
        assert_eq!(sps.bit_depth_chroma, 8);
    }

    #[test]
    fn conformance_window_is_applied_in_chroma_units() {
        let mut w = BitWriter::new();
        w.put_bits(0, 4);
        w.put_bits(0, 3);
        w.put_bit(true);
        put_general_ptl(&mut w, 1, 93); // level 3.1
        w.put_ue(0);
        w.put_ue(1); // 4:2:0
        w.put_ue(1280);
        w.put_ue(736); // coded height, 16-aligned
        w.put_bit(true); // conformance_window_flag
        w.put_ue(0); // left
        w.put_ue(0); // right
        w.put_ue(0); // top
        w.put_ue(8); // bottom: 8 chroma samples -> 16 luma
        w.put_ue(0);
        w.put_ue(0);
        let sps = decode_sps(&w.finish()).unwrap();
        assert_eq!((sps.width, sps.height), (1280, 720));
    }

    #[test]
    fn decodes_vps_prefix() {
        let mut w = BitWriter::new();
        w.put_bits(0, 4); // vps_video_parameter_set_id
        w.put_bits(3, 2); // base layer internal + available
        w.put_bits(0, 6); // vps_max_layers_minus1
        w.put_bits(0, 3); // vps_max_sub_layers_minus1
        w.put_bit(true); // vps_temporal_id_nesting_flag
        let vps = decode_vps(&w.finish()).unwrap();
        assert_eq!(vps.id, 0);
        assert_eq!(vps.max_layers, 1);
        assert_eq!(vps.max_sub_layers, 1);
        assert!(vps.temporal_id_nesting);
    }

    #[test]
    fn decodes_pps_prefix() {
        let mut w = BitWriter::new();
        w.put_ue(0); // pps_pic_parameter_set_id
        w.put_ue(0); // pps_seq_parameter_set_id
        w.put_bit(false); // dependent_slice_segments_enabled
        w.put_bit(false); // output_flag_present
        w.put_bits(0, 3); // num_extra_slice_header_bits
        w.put_bit(false); // sign_data_hiding_enabled
        w.put_bit(false); // cabac_init_present
        w.put_ue(0); // num_ref_idx_l0_default_active_minus1
        w.put_ue(0); // num_ref_idx_l1_default_active_minus1
        w.put_se(0); // init_qp_minus26
        let pps = decode_pps(&w.finish()).unwrap();
        assert_eq!(pps.id, 0);
        assert_eq!(pps.sps_id, 0);
        assert_eq!(pps.init_qp, Some(26));
        assert_eq!(pps.entropy_coding, None);
    }

    #[test]
    fn oversized_conformance_window_saturates_without_overflow() {
        let mut w = BitWriter::new();
        w.put_bits(0, 4);
        w.put_bits(0, 3);
        w.put_bit(true);
        put_general_ptl(&mut w, 1, 93);
        w.put_ue(0);
        w.put_ue(1); // 4:2:0
        w.put_ue(1280);
        w.put_ue(720);
        w.put_bit(true); // conformance_window_flag
        w.put_ue(u32::MAX - 1); // left, largest ue a 32-bit reader yields
        w.put_ue(u32::MAX - 1); // right
        w.put_ue(0);
        w.put_ue(0);
        w.put_ue(0);
        w.put_ue(0);
        let sps = decode_sps(&w.finish()).unwrap();
        assert_eq!((sps.width, sps.height), (0, 720));
    }

    #[test]
    fn out_of_range_bit_depth_is_malformed() {
        let mut w = BitWriter::new();
        w.put_bits(0, 4);
        w.put_bits(0, 3);
        w.put_bit(true);
        put_general_ptl(&mut w, 1, 120);
        w.put_ue(0);
        w.put_ue(1);
        w.put_ue(1920);
        w.put_ue(1080);
        w.put_bit(false);
        w.put_ue(250); // bit_depth_luma_minus8, would wrap a u8
        w.put_ue(0);
        let err = decode_sps(&w.finish()).unwrap_err();
        assert_eq!(err, ParameterSetError("bit depth out of range"));
    }

    #[test]
    fn truncated_sps_is_malformed() {
        let full = main_profile_1080p_sps();
        let err = decode_sps(&full[..6]).unwrap_err();
        assert_eq!(err, ParameterSetError("bitstream exhausted"));
    }
}
