//! Small helpers shared by the runner and the storage adapters.
//!
//! IMPORTANT:
//! - No provider-specific logic lives here.
//! - Everything in this module is pure and deterministic.
//!

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;

/// Builds the destination key for an archived log file.
///
/// Format:
///     <prefix>/<instance>/<file name>.gz
///
/// The key depends only on its inputs, so a file picked up by two
/// overlapping runs is written to the same object twice.
pub fn object_key(prefix: &str, instance: &str, file_name: &str) -> String {
    format!("{prefix}/{instance}/{file_name}.gz")
}

/// Number of newline-delimited lines in a log blob.
///
/// This is a proxy for "entries transferred", not a parser: a
/// multi-line stack trace counts once per line.
pub fn count_records(blob: &str) -> usize {
    blob.lines().count()
}

/// Gzip-compresses a text blob.
pub fn gzip(blob: &str) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(blob.len() / 4), Compression::default());
    encoder.write_all(blob.as_bytes())?;
    encoder.finish()
}

/// Converts a provider epoch-millisecond stamp.
pub fn from_epoch_ms(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// RFC 3339 with second precision, for log lines.
pub fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
