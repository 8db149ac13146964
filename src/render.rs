//! Collects a merged table's occupied slots, sorts them by raw name bytes
//! (ordinal, not locale-aware), and formats each as `name=min/mean/max`, one
//! line per station.

use std::fmt::Write as _;

use crate::table::StationTable;

/// One sorted, formatted output row.
#[derive(Debug, Clone, PartialEq)]
pub struct StationLine {
    pub name: Vec<u8>,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// Collects, sorts, and converts a merged table's slots into display-ready
/// rows, strictly ascending by byte-wise name comparison.
#[must_use]
pub fn sorted_rows(table: &StationTable) -> Vec<StationLine> {
    let mut rows: Vec<StationLine> = table
        .iter_occupied()
        .map(|(name, agg)| StationLine {
            // SAFETY: the table's backing mapping is still alive for the
            // duration of this call (caller's responsibility to uphold).
            name: unsafe { name.as_slice() }.to_vec(),
            min: f64::from(agg.min) / 10.0,
            mean: agg.mean(),
            max: f64::from(agg.max) / 10.0,
        })
        .collect();

    rows.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// Renders sorted rows as one `name=min/mean/max` line per station, each
/// value with one fractional digit, newline-terminated.
#[must_use]
pub fn render(rows: &[StationLine]) -> String {
    let mut out = String::new();
    for row in rows {
        let name = String::from_utf8_lossy(&row.name);
        let _ = writeln!(out, "{name}={:.1}/{:.1}/{:.1}", row.min, row.mean, row.max);
    }
    out
}
