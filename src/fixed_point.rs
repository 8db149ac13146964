//! Allocation-free parser for the fixed-point temperature field.
//!
//! Input is assumed to match `-?\d{1,2}\.\d(?:[^\n]*)\n`; callers pass
//! already-validated, well-formed measurement files, so malformed bytes are
//! undefined behavior rather than a recoverable error.

/// Parses a temperature token starting right after the `;` and returns the
/// value in tenths along with the number of bytes consumed, including the
/// terminating `\n` and any skipped trailing metadata bytes.
#[inline]
#[must_use]
pub fn parse_tenths(bytes: &[u8]) -> (i16, usize) {
    let mut cursor = 0usize;

    let sign: i16 = if bytes[cursor] == b'-' {
        cursor += 1;
        -1
    } else {
        1
    };

    let b0 = bytes[cursor];
    let b1 = bytes[cursor + 1];
    let b2 = bytes[cursor + 2];
    let b3 = bytes[cursor + 3];

    let (value, consumed): (i16, usize) = if b1 == b'.' {
        (i16::from(digit(b0)) * 10 + i16::from(digit(b2)), 3)
    } else {
        (
            i16::from(digit(b0)) * 100 + i16::from(digit(b1)) * 10 + i16::from(digit(b3)),
            4,
        )
    };

    cursor += consumed;
    let digits_and_sign_len = cursor;

    // Skip any trailing metadata up to and including the terminating
    // newline (some measurement files carry extra fields after the
    // fractional digit).
    let mut end = cursor;
    while bytes[end] != b'\n' {
        end += 1;
    }
    let total_consumed = end + 1;
    debug_assert!(total_consumed >= digits_and_sign_len);

    (sign * value, total_consumed)
}

#[inline]
const fn digit(b: u8) -> u8 {
    b - b'0'
}
