//! RBSP bit reader
//!
//! A pure cursor over a de-emulated byte slice. Every operation fails with
//! [`BitstreamExhausted`] instead of reading past the end; each parameter-set
//! decode gets a fresh reader over its own RBSP.

use bitstream_io::{BigEndian, BitRead, BitReader};

use crate::error::BitstreamExhausted;

pub struct RbspReader<'a> {
    inner: BitReader<&'a [u8], BigEndian>,
}

impl<'a> RbspReader<'a> {
    pub fn new(rbsp: &'a [u8]) -> Self {
        Self {
            inner: BitReader::endian(rbsp, BigEndian),
        }
    }

    /// Consume one bit.
    pub fn read_flag(&mut self) -> Result<bool, BitstreamExhausted> {
        self.inner.read_bit().map_err(|_| BitstreamExhausted)
    }

    /// Consume `n` bits, MSB first within each byte.
    pub fn read_bits(&mut self, n: u32) -> Result<u32, BitstreamExhausted> {
        debug_assert!(n <= 32);
        let mut val = 0u32;
        for _ in 0..n {
            val = (val << 1) | self.read_flag()? as u32;
        }
        Ok(val)
    }

    pub fn skip(&mut self, n: u32) -> Result<(), BitstreamExhausted> {
        self.inner.skip(n).map_err(|_| BitstreamExhausted)
    }

    /// Unsigned Exp-Golomb: count leading zeros k, value = 2^k - 1 + next k bits.
    pub fn read_ue(&mut self) -> Result<u32, BitstreamExhausted> {
        let mut zeros = 0u32;
        while !self.read_flag()? {
            zeros += 1;
            // a valid ue(v) never has 32+ leading zeros
            if zeros > 31 {
                return Err(BitstreamExhausted);
            }
        }
        if zeros == 0 {
            return Ok(0);
        }
        let rest = self.read_bits(zeros)?;
        Ok((1u32 << zeros) - 1 + rest)
    }

    /// Signed Exp-Golomb: even codes map to non-positive values.
    pub fn read_se(&mut self) -> Result<i32, BitstreamExhausted> {
        let ue = self.read_ue()?;
        Ok(if ue & 1 == 0 {
            -((ue / 2) as i32)
        } else {
            ((ue + 1) / 2) as i32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_golomb_table() {
        // bit patterns: 1 -> 0, 010 -> 1, 011 -> 2, 00100 -> 3, 00101 -> 4
        let cases: [(u8, u32); 5] = [
            (0b1000_0000, 0),
            (0b0100_0000, 1),
            (0b0110_0000, 2),
            (0b0010_0000, 3),
            (0b0010_1000, 4),
        ];
        for (byte, expected) in cases {
            let buf = [byte];
            let mut br = RbspReader::new(&buf);
            assert_eq!(br.read_ue().unwrap(), expected, "byte {byte:#010b}");
        }
    }

    #[test]
    fn signed_exp_golomb_alternates_sign() {
        // ue codes 0..=4 map to se 0, 1, -1, 2, -2
        let buf = [0b1010_0110, 0b0100_0010, 0b1000_0000];
        let mut br = RbspReader::new(&buf);
        assert_eq!(br.read_se().unwrap(), 0);
        assert_eq!(br.read_se().unwrap(), 1);
        assert_eq!(br.read_se().unwrap(), -1);
        assert_eq!(br.read_se().unwrap(), 2);
        assert_eq!(br.read_se().unwrap(), -2);
    }

    #[test]
    fn fixed_width_reads_are_msb_first() {
        let buf = [0b1100_0101, 0b1010_0000];
        let mut br = RbspReader::new(&buf);
        assert_eq!(br.read_bits(3).unwrap(), 0b110);
        assert_eq!(br.read_bits(8).unwrap(), 0b0010_1101);
        assert!(!br.read_flag().unwrap());
    }

    #[test]
    fn over_read_is_exhausted_not_panic() {
        let buf = [0xFF];
        let mut br = RbspReader::new(&buf);
        assert_eq!(br.read_bits(8).unwrap(), 0xFF);
        assert_eq!(br.read_flag(), Err(BitstreamExhausted));
    }

    #[test]
    fn all_zero_buffer_exhausts_ue() {
        let buf = [0x00, 0x00];
        let mut br = RbspReader::new(&buf);
        assert_eq!(br.read_ue(), Err(BitstreamExhausted));
    }
}
