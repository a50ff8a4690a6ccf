//! H.264 parameter set decoders
//!
//! Positional prefix decoding only: each decoder walks the known syntax
//! until the fields it reports are extracted, then stops. VUI and HRD
//! parameters are not modeled.

use log::trace;

use crate::constants::H264_HIGH_PROFILES;
use crate::error::ParameterSetError;
use crate::parsers::bits::RbspReader;
use crate::parsers::{bit_depth_from_minus8, chroma_format_name};
use crate::types::{Pps, Sps};

pub fn decode_sps(rbsp: &[u8]) -> Result<Sps, ParameterSetError> {
    let mut br = RbspReader::new(rbsp);

    let profile_idc = br.read_bits(8)? as u8;
    br.skip(8)?; // constraint flags + reserved_zero_2bits
    let level_idc = br.read_bits(8)? as u8;
    let sps_id = br.read_ue()?;

    // High profiles carry chroma format and bit depths up front
    let mut chroma_format_idc = 1;
    let mut bit_depth_luma = 8u8;
    let mut bit_depth_chroma = 8u8;
    if H264_HIGH_PROFILES.contains(&profile_idc) {
        chroma_format_idc = br.read_ue()?;
        if chroma_format_idc == 3 {
            br.skip(1)?; // separate_colour_plane_flag
        }
        bit_depth_luma = bit_depth_from_minus8(br.read_ue()?)?;
        bit_depth_chroma = bit_depth_from_minus8(br.read_ue()?)?;
        br.skip(1)?; // qpprime_y_zero_transform_bypass_flag

        if br.read_flag()? {
            // seq_scaling_matrix_present_flag: consume the lists
            let lists = if chroma_format_idc == 3 { 12 } else { 8 };
            for idx in 0..lists {
                if br.read_flag()? {
                    let size = if idx < 6 { 16 } else { 64 };
                    let mut next_scale = 8i32;
                    for _ in 0..size {
                        if next_scale != 0 {
                            let delta = br.read_se()?;
                            next_scale = (next_scale + delta + 256) % 256;
                        }
                    }
                }
            }
        }
    }

    br.read_ue()?; // log2_max_frame_num_minus4
    let pic_order_cnt_type = br.read_ue()?;
    if pic_order_cnt_type == 0 {
        br.read_ue()?; // log2_max_pic_order_cnt_lsb_minus4
    } else if pic_order_cnt_type == 1 {
        br.skip(1)?; // delta_pic_order_always_zero_flag
        br.read_se()?; // offset_for_non_ref_pic
        br.read_se()?; // offset_for_top_to_bottom_field
        let n = br.read_ue()?;
        for _ in 0..n {
            br.read_se()?;
        }
    }
    br.read_ue()?; // max_num_ref_frames
    br.skip(1)?; // gaps_in_frame_num_value_allowed_flag

    let pic_width_in_mbs_minus1 = br.read_ue()?;
    let pic_height_in_map_units_minus1 = br.read_ue()?;
    let frame_mbs_only_flag = br.read_flag()?;
    if !frame_mbs_only_flag {
        br.skip(1)?; // mb_adaptive_frame_field_flag
    }
    br.skip(1)?; // direct_8x8_inference_flag

    let (crop_l, crop_r, crop_t, crop_b) = if br.read_flag()? {
        (br.read_ue()?, br.read_ue()?, br.read_ue()?, br.read_ue()?)
    } else {
        (0, 0, 0, 0)
    };

    // Crop units: CropUnitX = SubWidthC, CropUnitY = SubHeightC * (2 -
    // frame_mbs_only_flag), both 1-valued for monochrome and 4:4:4; only
    // 4:2:0 has SubHeightC = 2.
    let crop_unit_x = match chroma_format_idc {
        0 | 3 => 1u32,
        _ => 2,
    };
    let crop_unit_y = match chroma_format_idc {
        1 => 2 * (2 - frame_mbs_only_flag as u32),
        _ => 2 - frame_mbs_only_flag as u32,
    };

    // ue(v) fields can carry values far past any legal frame size; treat
    // overflow and crops larger than the coded area as corruption.
    let oob = || ParameterSetError("frame dimensions out of range");
    let coded_width = pic_width_in_mbs_minus1
        .checked_add(1)
        .and_then(|w| w.checked_mul(16))
        .ok_or_else(oob)?;
    let coded_height = pic_height_in_map_units_minus1
        .checked_add(1)
        .and_then(|h| h.checked_mul(if frame_mbs_only_flag { 16 } else { 32 }))
        .ok_or_else(oob)?;
    let width = crop_l
        .checked_add(crop_r)
        .and_then(|c| c.checked_mul(crop_unit_x))
        .and_then(|c| coded_width.checked_sub(c))
        .ok_or_else(oob)?;
    let height = crop_t
        .checked_add(crop_b)
        .and_then(|c| c.checked_mul(crop_unit_y))
        .and_then(|c| coded_height.checked_sub(c))
        .ok_or_else(oob)?;

    trace!("h264 sps {sps_id}: profile {profile_idc}, {width}x{height}");

    Ok(Sps {
        id: sps_id,
        profile_idc,
        level_idc,
        tier: None,
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
    let entropy_coding = if br.read_flag()? { "cabac" } else { "cavlc" };
    br.skip(1)?; // bottom_field_pic_order_in_frame_present_flag
    let num_slice_groups_minus1 = br.read_ue()?;

    // The slice-group map only appears in FMO streams; stop the prefix
    // decode before it rather than model the map types.
    let init_qp = if num_slice_groups_minus1 == 0 {
        br.read_ue()?; // num_ref_idx_l0_default_active_minus1
        br.read_ue()?; // num_ref_idx_l1_default_active_minus1
        br.skip(1)?; // weighted_pred_flag
        br.skip(2)?; // weighted_bipred_idc
        Some(br.read_se()? + 26)
    } else {
        None
    };

    Ok(Pps {
        id: pps_id,
        sps_id,
        entropy_coding: Some(entropy_coding),
        init_qp,
    })
}
