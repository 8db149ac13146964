#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::must_use_candidate,
    // clippy::restriction,
    // clippy::pedantic
)]
// now allow a few rules which are denied by the above statement
// --> they are ridiculous and not necessary
#![allow(
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::fallible_impl_from
)]
// I can't do anything about this; fault of the dependencies
#![allow(clippy::multiple_crate_versions)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]

//! Multi-threaded entry point: dispatches one worker per chunk across the
//! available cores and folds the results together.

use std::process::ExitCode;
use std::time::Instant;

use brc_engine::{render, Parallelism};

fn main() -> ExitCode {
    let begin = Instant::now();
    let file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./measurements.txt".to_string());

    match brc_engine::run(&file, Parallelism::Auto) {
        Ok(table) => {
            let rows = render::sorted_rows(&table);
            print!("{}", render::render(&rows));
            eprintln!("took {:?}", begin.elapsed());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
