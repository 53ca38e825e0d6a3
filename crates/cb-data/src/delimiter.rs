//! Field delimiter detection
//!
//! Scores each candidate delimiter by how many fields it splits the first
//! few lines into; a candidate that leaves a line unsplit scores nothing
//! for that line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;

use crate::CsvError;

/// Candidates tried when none are given
pub const DEFAULT_DELIMITERS: &[u8] = &[b',', b';'];

/// Lines sampled from the top of the file (blank lines among them are
/// skipped but still consume the budget)
pub const DEFAULT_SAMPLE_LINES: usize = 10;

/// Detect the delimiter used by the file at `path`.
///
/// Each candidate's score is the sum, over sampled lines, of the field
/// count it produces whenever that count exceeds 1. The highest total
/// wins; on a tie the earlier-listed candidate wins. If no candidate ever
/// splits anything, `,` is returned.
pub fn detect_delimiter(
    path: &Path,
    delimiters: &[u8],
    sample_lines: usize,
) -> Result<u8, CsvError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut scores = vec![0usize; delimiters.len()];

    for line in reader.lines().take(sample_lines) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        for (i, &delimiter) in delimiters.iter().enumerate() {
            let fields = field_count(&line, delimiter);
            if fields > 1 {
                scores[i] += fields;
            }
        }
    }

    // Strict > keeps the earlier candidate on ties; an all-zero board
    // falls through to the comma default.
    let mut best_delimiter = None;
    let mut best_score = 0usize;
    for (&delimiter, &score) in delimiters.iter().zip(&scores) {
        if score > best_score {
            best_score = score;
            best_delimiter = Some(delimiter);
        }
    }

    Ok(best_delimiter.unwrap_or(b','))
}

/// Number of fields a quote-aware split of `line` yields
fn field_count(line: &str, delimiter: u8) -> usize {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.len(),
        _ => 0,
    }
}
