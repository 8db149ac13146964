//! Parallel aggregation engine for the one-billion-row weather station
//! challenge. Look at [`engine::run`], which drives the fork-join pipeline;
//! [`worker::process_chunk`] is the hot-path loop for a single chunk.
//!
//! The binaries in `src/bin/` and `src/main.rs` are thin CLI wrappers
//! around this library; they own argument parsing, logging setup, timing,
//! and final rendering to stdout. This crate owns the engine only.

pub mod byte_range;
pub mod chunker;
pub mod engine;
pub mod error;
pub mod fixed_point;
pub mod render;
pub mod simd_scan;
pub mod table;
pub mod worker;

pub use engine::{run, Parallelism};
pub use error::{EngineError, EngineResult};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn run_on_contents(contents: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "brc-engine-lib-test-{}-{}.txt",
            std::process::id(),
            contents.len()
        ));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(contents.as_bytes()).unwrap();
        }
        let table = run(&path, Parallelism::Fixed(1)).unwrap();
        let rows = render::sorted_rows(&table);
        let rendered = render::render(&rows);
        std::fs::remove_file(&path).ok();
        rendered
    }

    #[test]
    fn scenario_hamburg_bulawayo() {
        let out = run_on_contents("Hamburg;12.0\nHamburg;13.0\nBulawayo;8.9\n");
        assert_eq!(out, "Bulawayo=8.9/8.9/8.9\nHamburg=12.0/12.5/13.0\n");
    }

    #[test]
    fn scenario_negative_and_positive_average_to_zero() {
        let out = run_on_contents("A;-0.1\nA;0.1\n");
        assert_eq!(out, "A=-0.1/0.0/0.1\n");
    }

    #[test]
    fn scenario_apostrophe_name_sorts_after_saint() {
        let out = run_on_contents("St. John's;1.2\nSaint John;1.2\n");
        assert_eq!(out, "Saint John=1.2/1.2/1.2\nSt. John's=1.2/1.2/1.2\n");
    }

    #[test]
    fn scenario_symmetric_extremes_average_to_zero() {
        let out = run_on_contents("X;99.9\nX;-99.9\n");
        assert_eq!(out, "X=-99.9/0.0/99.9\n");
    }

    #[test]
    fn running_twice_on_the_same_file_is_byte_identical() {
        let contents = "Hamburg;12.0\nHamburg;13.0\nBulawayo;8.9\n".repeat(50);
        let first = run_on_contents(&contents);
        let second = run_on_contents(&contents);
        assert_eq!(first, second);
    }
}
