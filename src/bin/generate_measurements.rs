//! Synthetic `<station>;<temperature>\n` corpus generator, for manual
//! testing and benchmarking against the engine without a real dataset.
//!
//! Grounded in `kahlstrm-brc-rs`'s `src/bin/create_measurements.rs`: a
//! `rand_distr::Normal` around each station's historical mean, gated
//! behind the `generate` feature so the default build's dependency graph
//! stays minimal (`kahlstrm-brc-rs`'s `[features] generate = [...]`
//! pattern).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use clap::Parser;
use rand::prelude::*;
use rand_distr::Normal;

struct WeatherStation {
    name: &'static str,
    mean_temperature: f64,
}

impl WeatherStation {
    fn sample(&self) -> f64 {
        let normal = Normal::new(self.mean_temperature, 10.0).expect("valid normal parameters");
        let measurement: f64 = normal.sample(&mut thread_rng());
        (measurement * 10.0).round() / 10.0
    }
}

const STATIONS: &[WeatherStation] = &[
    WeatherStation { name: "Abidjan", mean_temperature: 26.0 },
    WeatherStation { name: "Amsterdam", mean_temperature: 10.2 },
    WeatherStation { name: "Anchorage", mean_temperature: 2.8 },
    WeatherStation { name: "Ankara", mean_temperature: 12.0 },
    WeatherStation { name: "Athens", mean_temperature: 19.2 },
    WeatherStation { name: "Auckland", mean_temperature: 15.2 },
    WeatherStation { name: "Baghdad", mean_temperature: 22.77 },
    WeatherStation { name: "Bangkok", mean_temperature: 28.6 },
    WeatherStation { name: "Berlin", mean_temperature: 10.3 },
    WeatherStation { name: "Bulawayo", mean_temperature: 18.9 },
    WeatherStation { name: "Cairo", mean_temperature: 21.4 },
    WeatherStation { name: "Chicago", mean_temperature: 9.8 },
    WeatherStation { name: "Copenhagen", mean_temperature: 9.1 },
    WeatherStation { name: "Hamburg", mean_temperature: 9.7 },
    WeatherStation { name: "Jakarta", mean_temperature: 26.7 },
    WeatherStation { name: "Lagos", mean_temperature: 26.9 },
    WeatherStation { name: "Lima", mean_temperature: 18.7 },
    WeatherStation { name: "Mumbai", mean_temperature: 27.1 },
    WeatherStation { name: "Nairobi", mean_temperature: 17.8 },
    WeatherStation { name: "New York City", mean_temperature: 12.9 },
    WeatherStation { name: "Oslo", mean_temperature: 5.7 },
    WeatherStation { name: "Paris", mean_temperature: 12.3 },
    WeatherStation { name: "Reykjavik", mean_temperature: 4.3 },
    WeatherStation { name: "Saint John", mean_temperature: 5.2 },
    WeatherStation { name: "St. John's", mean_temperature: 5.0 },
    WeatherStation { name: "Singapore", mean_temperature: 27.0 },
    WeatherStation { name: "Tokyo", mean_temperature: 15.4 },
    WeatherStation { name: "Zurich", mean_temperature: 9.3 },
];

/// Generates a synthetic 1BRC-style measurements file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of measurement rows to generate.
    row_count: usize,

    /// Output file path.
    #[arg(default_value = "measurements.txt")]
    output: PathBuf,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let file = File::create(&args.output)?;
    let writer = Arc::new(Mutex::new(BufWriter::new(file)));
    generate(args.row_count, &writer)
}

fn generate<W: Write + Send + 'static>(
    row_count: usize,
    writer: &Arc<Mutex<W>>,
) -> std::io::Result<()> {
    let begin = Instant::now();
    let worker_count: usize = std::thread::available_parallelism().map_or(1, Into::into);

    let mut rows_per_worker = vec![row_count / worker_count; worker_count];
    for slot in rows_per_worker.iter_mut().take(row_count % worker_count) {
        *slot += 1;
    }

    let handles: Vec<_> = rows_per_worker
        .into_iter()
        .map(|count| {
            let writer = Arc::clone(writer);
            thread::spawn(move || write_rows(count, &writer))
        })
        .collect();

    for handle in handles {
        handle.join().expect("generator thread panicked")?;
    }

    eprintln!(
        "generated {row_count} rows into the target file in {:?}",
        begin.elapsed()
    );
    Ok(())
}

const FLUSH_THRESHOLD_BYTES: usize = 64 * 1024;

fn write_rows<W: Write>(count: usize, writer: &Arc<Mutex<W>>) -> std::io::Result<()> {
    let mut buffer = Vec::with_capacity(FLUSH_THRESHOLD_BYTES + 128);
    let mut rng = thread_rng();

    for _ in 0..count {
        let station = &STATIONS[rng.gen_range(0..STATIONS.len())];
        writeln!(buffer, "{};{:.1}", station.name, station.sample())?;
        if buffer.len() > FLUSH_THRESHOLD_BYTES {
            writer.lock().expect("generator mutex poisoned").write_all(&buffer)?;
            buffer.clear();
        }
    }
    writer.lock().expect("generator mutex poisoned").write_all(&buffer)?;
    Ok(())
}
