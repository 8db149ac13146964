//! Partitions the mapped file into line-aligned, non-overlapping byte
//! ranges.
//!
//! Starts from `max(1, worker_count)` chunks and doubles the count while any
//! chunk would exceed [`MAX_CHUNK_BYTES`], then walks each boundary forward
//! to the next `\n` so no record is split across chunks.

use crate::simd_scan;

/// Ceiling on a single chunk's size, kept comfortably under `i32::MAX` so a
/// chunk's length always fits in a signed 32-bit offset even after the
/// alignment walk adds a few dozen bytes.
const MAX_CHUNK_BYTES: usize = i32::MAX as usize - 100_000;

/// Computes line-aligned chunk boundaries over `bytes`, targeting
/// `worker_count` chunks (never fewer than 1, and never so few that any
/// chunk would exceed [`MAX_CHUNK_BYTES`]).
#[must_use]
pub fn chunk_ranges(bytes: &[u8], worker_count: usize) -> Vec<&[u8]> {
    if bytes.is_empty() {
        return Vec::new();
    }

    let mut chunk_count = worker_count.max(1);
    while bytes.len() / chunk_count > MAX_CHUNK_BYTES {
        chunk_count *= 2;
    }

    let target_chunk_size = bytes.len().div_ceil(chunk_count);
    let mut ranges = Vec::with_capacity(chunk_count);
    let mut start = 0usize;

    while start < bytes.len() {
        let remaining = bytes.len() - start;
        if remaining <= target_chunk_size {
            ranges.push(&bytes[start..]);
            break;
        }

        // The boundary not-yet-aligned to a line; walk forward to the next
        // `\n` (inclusive) so the chunk ends right after it.
        let probe_from = start + target_chunk_size - 1;
        let newline_offset = simd_scan::find(bytes, probe_from, b'\n');
        let end = (newline_offset + 1).min(bytes.len());

        ranges.push(&bytes[start..end]);
        start = end;
    }

    ranges
}
