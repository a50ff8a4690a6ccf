//! Annex-B NAL unit scanner
//!
//! Single pass over a byte buffer: locate start codes, slice out units,
//! parse the header, strip emulation prevention. Offsets and sizes are
//! reported against the original byte stream; de-emulation happens only
//! on the payload copy handed to the decoders.

use bytes::Bytes;
use log::trace;

use crate::codec::Codec;
use crate::constants::{EMULATION_PREVENTION, START_CODE_3, START_CODE_4};
use crate::types::NalUnit;

pub struct ScanOptions {
    pub codec: Codec,
    /// Added to every reported offset, so a range scan stays absolute.
    pub base_offset: u64,
}

/// Segment `data` into NAL units.
///
/// A trailing unit not closed by another start code is still emitted, with
/// `is_truncated` set; whether bytes exist past the buffer is unknowable
/// here and left to the caller.
pub fn scan(data: &Bytes, opts: &ScanOptions) -> Vec<NalUnit> {
    let starts = find_start_codes(data);
    let mut units = Vec::with_capacity(starts.len());

    for (idx, &(pos, sc_len)) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).map_or(data.len(), |&(next, _)| next);
        let raw = data.slice(pos + sc_len..end);

        // A unit shorter than the NAL header gets no type at all rather
        // than a bogus type 0.
        let nal_type = opts.codec.nal_type(&raw);
        let type_name = match nal_type {
            Some(t) => opts.codec.type_name(t),
            None => "invalid header",
        };
        let header_len = opts.codec.header_len().min(raw.len());
        let rbsp = Bytes::from(remove_emulation_prevention(&raw[header_len..]));

        trace!(
            "nal at {}: {}, {} bytes",
            opts.base_offset + pos as u64,
            type_name,
            end - pos
        );

        units.push(NalUnit {
            nal_type,
            type_name,
            offset: opts.base_offset + pos as u64,
            size: (end - pos) as u64,
            start_code_len: sc_len as u8,
            raw_bytes: raw,
            rbsp,
            is_truncated: end == data.len(),
        });
    }

    units
}

/// Positions and lengths of every 3- or 4-byte start code.
fn find_start_codes(data: &[u8]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i + 3 <= data.len() {
        if data[i..i + 3] == START_CODE_3 {
            out.push((i, 3));
            i += 3;
            continue;
        }
        if i + 4 <= data.len() && data[i..i + 4] == START_CODE_4 {
            out.push((i, 4));
            i += 4;
            continue;
        }
        i += 1;
    }
    out
}

/// Remove emulation prevention bytes: each 0x000003 loses its trailing 0x03.
pub(crate) fn remove_emulation_prevention(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if i + 2 < data.len() && data[i..i + 3] == EMULATION_PREVENTION {
            out.push(0);
            out.push(0);
            i += 3;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    out
}
