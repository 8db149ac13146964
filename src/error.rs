//! Library-local error type.
//!
//! A small enum the engine returns, which the CLI boundary (`main.rs`) wraps
//! in `anyhow` context before deciding on an exit code.

use std::path::PathBuf;

/// Errors the aggregation engine can surface. There is no retry path for any
/// of these: the first error terminates the run.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The running CPU lacks the 256-bit compare/move-mask capability the
    /// vector scanner requires. Checked before the file is opened.
    #[error("CPU does not support the 256-bit vector compare this engine requires (AVX2)")]
    UnsupportedCpu,

    /// File open, stat, or mmap failure.
    #[error("failed to open or map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A per-chunk table exceeded its 7/8 occupancy cap. Impossible by
    /// contract for well-formed input and a correctly sized table; surfaced
    /// as a typed error here instead of a bare `debug_assert!` so it stays
    /// testable outside a debug build.
    #[error("station table overflow: occupancy exceeded capacity*7/8 ({occupied}/{capacity})")]
    TableOverflow { occupied: usize, capacity: usize },

    /// A chunk's tail had no `;` before the chunk's end, which cannot happen
    /// for well-formed, line-aligned input.
    #[error("chunk tail missing expected delimiter {needle:?}")]
    MissingDelimiter { needle: u8 },
}

pub type EngineResult<T> = Result<T, EngineError>;
