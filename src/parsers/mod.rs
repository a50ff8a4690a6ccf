//! Codec-specific parameter set decoders

pub mod bits;
pub mod h264;
pub mod hevc;

use crate::error::ParameterSetError;

/// Both codecs code bit depth as `ue(v) + 8`; anything past 16 bits is
/// outside every defined profile and treated as corruption.
pub(crate) fn bit_depth_from_minus8(minus8: u32) -> Result<u8, ParameterSetError> {
    if minus8 > 8 {
        return Err(ParameterSetError("bit depth out of range"));
    }
    Ok(minus8 as u8 + 8)
}

pub(crate) fn chroma_format_name(idc: u32) -> &'static str {
    match idc {
        0 => "4:0:0",
        1 => "4:2:0",
        2 => "4:2:2",
        3 => "4:4:4",
        _ => "?",
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    /// MSB-first bit writer for building synthetic parameter sets in tests.
    pub struct BitWriter {
        bytes: Vec<u8>,
        bit: u8,
    }

    impl BitWriter {
        pub fn new() -> Self {
            Self { bytes: Vec::new(), bit: 0 }
        }

        pub fn put_bit(&mut self, b: bool) {
            if self.bit == 0 {
                self.bytes.push(0);
            }
            if b {
                let last = self.bytes.last_mut().unwrap();
                *last |= 1 << (7 - self.bit);
            }
            self.bit = (self.bit + 1) % 8;
        }

        pub fn put_bits(&mut self, value: u32, n: u32) {
            for i in (0..n).rev() {
                self.put_bit((value >> i) & 1 == 1);
            }
        }

        pub fn put_ue(&mut self, value: u32) {
            let v = value + 1;
            let bits = 32 - v.leading_zeros();
            for _ in 0..bits - 1 {
                self.put_bit(false);
            }
            self.put_bits(v, bits);
        }

        pub fn put_se(&mut self, value: i32) {
            let ue = if value <= 0 {
                (-value as u32) * 2
            } else {
                (value as u32) * 2 - 1
            };
            self.put_ue(ue);
        }

        /// Pad the final byte with zero bits and return the buffer.
        pub fn finish(self) -> Vec<u8> {
            self.bytes
        }
    }
}
