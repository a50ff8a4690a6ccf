//! Aggregate statistics over one scanned byte range

use std::collections::BTreeMap;

use crate::types::{BitstreamStatistics, NalUnit};

/// Counters for whatever range was actually examined; `scanned_len` is the
/// length of that range, not of the whole file.
pub fn collect(scanned_len: u64, nal_units: &[NalUnit]) -> BitstreamStatistics {
    BitstreamStatistics {
        total_size: scanned_len,
        nal_unit_count: nal_units.len() as u32,
    }
}

/// Occurrences of each NAL type name, ordered by name. Used by the CLI
/// summary output.
pub fn count_by_type(nal_units: &[NalUnit]) -> BTreeMap<&'static str, u32> {
    let mut counts = BTreeMap::new();
    for unit in nal_units {
        *counts.entry(unit.type_name).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn unit(type_name: &'static str) -> NalUnit {
        NalUnit {
            nal_type: Some(0),
            type_name,
            offset: 0,
            size: 0,
            start_code_len: 3,
            raw_bytes: Bytes::new(),
            rbsp: Bytes::new(),
            is_truncated: false,
        }
    }

    #[test]
    fn total_size_reflects_scanned_range_not_file() {
        let stats = collect(512, &[unit("SPS"), unit("PPS")]);
        assert_eq!(stats.total_size, 512);
        assert_eq!(stats.nal_unit_count, 2);
    }

    #[test]
    fn counts_group_by_type_name() {
        let units = vec![unit("SEI"), unit("IDR slice"), unit("SEI")];
        let counts = count_by_type(&units);
        assert_eq!(counts["SEI"], 2);
        assert_eq!(counts["IDR slice"], 1);
    }
}
