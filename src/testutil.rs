//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pipeline::RawFile;

pub const MULTIPART_BOUNDARY: &str = "csvmerge-test-boundary";

/// Deterministic MPAN used for row `i` when `distinct` keys are in play.
pub fn mpan(i: usize) -> String {
    format!("MPAN{:03}", i)
}

/// Generate headerless 4-column CSV content.
///
/// The first column cycles through `distinct` MPANs picked by a seeded RNG,
/// the other three hold the row index, a reading and a flag.
pub fn generate_mpan_csv(num_rows: usize, distinct: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::new();
    for i in 0..num_rows {
        let key = mpan(rng.gen_range(0..distinct.max(1)));
        let reading: f64 = rng.gen_range(0.0..1000.0);
        let _ = writeln!(out, "{},{},{:.3},{}", key, i, reading, i % 2 == 0);
    }
    out
}

/// Generate 4-column CSV content with a header row and `num_rows` rows.
///
/// Row `i` of file `tag` has `"{tag}-{i}"` in its first column, so combined
/// order can be asserted from the first column alone.
pub fn generate_headed_csv(tag: &str, num_rows: usize) -> String {
    let mut out = String::from("id,a,b,c\n");
    for i in 0..num_rows {
        let _ = writeln!(out, "{tag}-{i},{i},{},{}", i * 2, i * 3);
    }
    out
}

/// Generate headerless CSV with an arbitrary column count.
pub fn generate_wide_csv(columns: usize, num_rows: usize) -> String {
    let mut out = String::new();
    for i in 0..num_rows {
        let row: Vec<String> = (0..columns).map(|c| format!("{i}.{c}")).collect();
        let _ = writeln!(out, "{}", row.join(","));
    }
    out
}

/// Build a `multipart/form-data` body holding `files` as `files` fields.
pub fn multipart_body(files: &[RawFile]) -> Vec<u8> {
    multipart_body_with_fields(&[], files)
}

/// Like `multipart_body`, with plain text fields written before the files.
pub fn multipart_body_with_fields(fields: &[(&str, &str)], files: &[RawFile]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for file in files {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                file.name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

/// Write each `(name, content)` pair into `dir`, returning the paths in order.
pub fn write_csv_files(dir: &Path, files: &[(&str, &str)]) -> std::io::Result<Vec<PathBuf>> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.join(name);
            fs::write(&path, content)?;
            Ok(path)
        })
        .collect()
}

/// Creates a temp dir populated with `files`.
pub fn temp_csv_dir(files: &[(&str, &str)]) -> std::io::Result<(tempfile::TempDir, Vec<PathBuf>)> {
    let dir = tempfile::TempDir::new()?;
    let paths = write_csv_files(dir.path(), files)?;
    Ok((dir, paths))
}
