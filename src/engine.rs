//! Parallel driver: maps the file, dispatches one worker per chunk, and
//! folds per-chunk tables into a single merged table.
//!
//! One fork-join phase: the calling thread handles one chunk itself while
//! the rest run on spawned threads, then every per-chunk table is folded
//! into a single accumulator after all of them join.

use std::fs::File;
use std::path::Path;
use std::slice;
use std::thread;
use std::thread::available_parallelism;

use memmap::{Mmap, MmapOptions};
use tracing::{debug, info, instrument};

use crate::chunker;
use crate::error::{EngineError, EngineResult};
use crate::simd_scan;
use crate::table::StationTable;
use crate::worker;

/// How many worker threads to use. `Auto` asks the OS for the core count.
#[derive(Copy, Clone, Debug)]
pub enum Parallelism {
    Auto,
    Fixed(usize),
}

impl Parallelism {
    fn resolve(self, file_len: usize) -> usize {
        if file_len < 10_000 {
            return 1;
        }
        match self {
            Self::Auto => available_parallelism().map(Into::into).unwrap_or(1),
            Self::Fixed(n) => n.max(1),
        }
    }
}

/// Runs the full pipeline over `path` and returns the merged, still-
/// unsorted table. Sorting and rendering are left to [`crate::render`].
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn run(path: impl AsRef<Path>, parallelism: Parallelism) -> EngineResult<StationTable> {
    if !simd_scan::cpu_supports_vector_scan() {
        return Err(EngineError::UnsupportedCpu);
    }

    let path = path.as_ref();
    let (_mmap, bytes) = open_file(path)?;

    let worker_count = parallelism.resolve(bytes.len());
    info!(worker_count, file_bytes = bytes.len(), "dispatching chunk workers");

    let chunks = chunker::chunk_ranges(bytes, worker_count);
    debug!(chunk_count = chunks.len(), "file partitioned");

    if chunks.is_empty() {
        return Ok(worker::empty_table());
    }

    let mut chunk_iter = chunks.into_iter();
    // Reuse the calling thread for one chunk's work instead of spawning a
    // thread for every chunk.
    let main_thread_chunk = chunk_iter.next().expect("checked non-empty above");

    // `open_file` returns `bytes` with an unconstrained lifetime, so the
    // compiler is free to unify it with the `'static` bound `thread::spawn`
    // needs here. Safe because every handle below is joined before this
    // function returns, and `_mmap` (which backs `bytes`) is not dropped
    // until then.
    let handles: Vec<_> = chunk_iter
        .map(|chunk| thread::spawn(move || worker::process_chunk(chunk)))
        .collect();

    let mut merged = worker::process_chunk(main_thread_chunk)?;

    for handle in handles {
        let chunk_table = handle.join().expect("worker thread panicked")?;
        merged.merge(&chunk_table)?;
    }

    info!(stations = merged.occupied(), rows = merged.total_count(), "merge complete");

    Ok(merged)
}

/// Opens and maps `path`, returning the mapping (kept alive by the caller)
/// and a slice over it. The mapping must outlive every
/// [`crate::byte_range::ByteRange`] derived from the returned slice.
///
/// # Safety caveat
/// The returned slice's lifetime is detached from `mmap`'s; callers must
/// keep the returned `Mmap` alive for as long as the slice (or anything
/// derived from it) is in use.
fn open_file<'a>(path: &Path) -> EngineResult<(Mmap, &'a [u8])> {
    let file = File::open(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // SAFETY: the file is not concurrently truncated by this process; the
    // mapping is read-only and shared across worker threads.
    let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // SAFETY: valid for as long as `mmap` is not dropped.
    let bytes: &[u8] = unsafe { slice::from_raw_parts(mmap.as_ptr(), mmap.len()) };
    Ok((mmap, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile_like::TempFile {
        tempfile_like::TempFile::new(contents)
    }

    /// Minimal self-contained temp-file helper so the engine's tests do not
    /// need an extra dev-dependency just to write a scratch file.
    mod tempfile_like {
        use std::fs::File;
        use std::io::Write;
        use std::path::PathBuf;

        pub struct TempFile {
            pub path: PathBuf,
        }

        impl TempFile {
            pub fn new(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                path.push(format!(
                    "brc-engine-test-{}-{}.txt",
                    std::process::id(),
                    contents.len()
                ));
                let mut file = File::create(&path).unwrap();
                file.write_all(contents.as_bytes()).unwrap();
                Self { path }
            }
        }

        impl Drop for TempFile {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn run_single_worker_matches_multi_worker_output() {
        // Repeated enough to clear the small-file single-worker floor in
        // `Parallelism::resolve`, so `Fixed(4)` actually dispatches across
        // multiple chunks instead of collapsing to one.
        let contents = "Hamburg;12.0\nHamburg;13.0\nBulawayo;8.9\n".repeat(1_000);
        let temp = write_temp(&contents);

        let single = run(&temp.path, Parallelism::Fixed(1)).unwrap();
        let multi = run(&temp.path, Parallelism::Fixed(4)).unwrap();

        let mut single_rows: Vec<_> = single
            .iter_occupied()
            .map(|(name, agg)| (unsafe { name.as_slice() }.to_vec(), agg))
            .collect();
        let mut multi_rows: Vec<_> = multi
            .iter_occupied()
            .map(|(name, agg)| (unsafe { name.as_slice() }.to_vec(), agg))
            .collect();
        single_rows.sort_by(|a, b| a.0.cmp(&b.0));
        multi_rows.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(single_rows, multi_rows);
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let result = run("/nonexistent/path/does-not-exist.txt", Parallelism::Fixed(1));
        assert!(matches!(result, Err(EngineError::Io { .. })));
    }
}
