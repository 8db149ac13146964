//! Processes one line-aligned chunk end to end: scan for `;`, scan for
//! `\n`, parse the temperature, upsert into a thread-local table.
//!
//! The chunk loop never allocates: the name is a view into the chunk's own
//! bytes, the temperature is parsed in place, and the table is pre-sized
//! once up front.

use crate::byte_range::ByteRange;
use crate::error::{EngineError, EngineResult};
use crate::fixed_point;
use crate::simd_scan;
use crate::table::StationTable;

/// Distinct station count a real-world measurement corpus is expected to
/// exercise, documented for readers sizing their own corpora; the table
/// itself is sized well above this so probe chains stay short even if a
/// chunk sees more distinct names than expected (any overrun past the
/// table's own capacity surfaces as a typed overflow error rather than
/// silently degrading).
pub const EXPECTED_STATIONS: usize = 413;

/// Capacity of each chunk's table. Quadratic probing on a power-of-two table
/// only ever reaches a bounded fraction of the table's slots from any given
/// starting bucket, so probe chains grow sharply as occupancy approaches
/// that fraction; at this capacity, a few hundred distinct stations leaves
/// enough headroom for probes to stay short for the lifetime of the run.
const CHUNK_TABLE_CAPACITY: usize = 16_384;

/// Builds an empty table sized the same way a chunk's table would be,
/// for callers that need one without having any chunk bytes to process
/// (e.g. an empty input file).
#[must_use]
pub fn empty_table() -> StationTable {
    StationTable::with_capacity(CHUNK_TABLE_CAPACITY)
}

/// Scans, parses, and aggregates one chunk. The chunk must be non-empty and
/// end with `\n`.
pub fn process_chunk(chunk: &[u8]) -> EngineResult<StationTable> {
    debug_assert!(!chunk.is_empty(), "chunk must be non-empty");
    debug_assert_eq!(*chunk.last().unwrap(), b'\n', "chunk must end with \\n");

    let mut table = StationTable::with_capacity(CHUNK_TABLE_CAPACITY);
    let mut cursor = 0usize;

    while cursor < chunk.len() {
        let name_start = cursor;
        let sep_offset = simd_scan::find(chunk, name_start, b';');
        if sep_offset >= chunk.len() {
            return Err(EngineError::MissingDelimiter { needle: b';' });
        }
        let name_bytes = &chunk[name_start..sep_offset];
        let name = ByteRange::new(name_bytes);
        let hash = name.key_hash();

        let (value, consumed) = fixed_point::parse_tenths(&chunk[sep_offset + 1..]);
        table.upsert(name, hash, value)?;

        cursor = sep_offset + 1 + consumed;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_and_aggs(table: &StationTable) -> Vec<(String, i64, i64, i32)> {
        let mut out: Vec<_> = table
            .iter_occupied()
            .map(|(name, agg)| {
                let bytes = unsafe { name.as_slice() }.to_vec();
                (
                    String::from_utf8(bytes).unwrap(),
                    i64::from(agg.min),
                    i64::from(agg.max),
                    agg.count,
                )
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn aggregates_repeated_and_single_station_observations() {
        let input = b"Hamburg;12.0\nHamburg;13.0\nBulawayo;8.9\n";
        let table = process_chunk(input).unwrap();
        let entries = names_and_aggs(&table);
        assert_eq!(
            entries,
            vec![
                ("Bulawayo".to_string(), 89, 89, 1),
                ("Hamburg".to_string(), 120, 130, 2),
            ]
        );
    }

    #[test]
    fn processes_negative_and_positive_boundary_values() {
        let input = b"A;-0.1\nA;0.1\n";
        let table = process_chunk(input).unwrap();
        let (_, agg) = table.iter_occupied().next().unwrap();
        assert_eq!(agg.min, -1);
        assert_eq!(agg.max, 1);
        assert_eq!(agg.sum, 0);
        assert_eq!(agg.count, 2);
    }

    #[test]
    fn single_line_file_produces_one_aggregate() {
        let input = b"SoloStation;42.5\n";
        let table = process_chunk(input).unwrap();
        let (_, agg) = table.iter_occupied().next().unwrap();
        assert_eq!(agg.min, 425);
        assert_eq!(agg.max, 425);
        assert_eq!(agg.count, 1);
    }

    #[test]
    fn total_row_count_equals_sum_of_per_station_counts() {
        let input = "k;1.0\n".repeat(10_000);
        let table = process_chunk(input.as_bytes()).unwrap();
        assert_eq!(table.total_count(), 10_000);
    }

    #[test]
    fn station_names_of_varied_lengths_hash_and_compare_correctly() {
        let input = b"A;1.0\nAB;1.0\nABC;1.0\nABCD;1.0\nABCDE;1.0\nThisIsAVeryLongStationNameOverThirtyTwoBytes;1.0\n";
        let table = process_chunk(input).unwrap();
        assert_eq!(table.occupied(), 6);
    }

    #[test]
    fn a_chunk_tail_missing_its_separator_is_a_typed_error() {
        let input = b"Hamburg;12.0\nBulawayo";
        let result = process_chunk(input);
        assert!(matches!(result, Err(crate::error::EngineError::MissingDelimiter { needle: b';' })));
    }
}
