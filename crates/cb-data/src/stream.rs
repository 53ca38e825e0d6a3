//! Streaming row access over a delimited file
//!
//! A [`CsvStream`] is a lazy, finite, forward-only pass over the file. It
//! is not restartable; callers needing a second pass reopen the file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;

use crate::CsvError;

/// Forward-only row stream with a fixed delimiter.
///
/// Rows that are wholly empty (no cells, or a single cell that trims to
/// nothing) are skipped; header handling is up to the caller, which treats
/// the first row yielded as the header when it needs one.
pub struct CsvStream {
    reader: csv::Reader<BufReader<File>>,
    record: csv::StringRecord,
}

impl CsvStream {
    /// Open `path` for a single forward pass using `delimiter`
    pub fn open(path: &Path, delimiter: u8) -> Result<Self, CsvError> {
        let file = File::open(path)?;
        let reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        Ok(Self {
            reader,
            record: csv::StringRecord::new(),
        })
    }

    /// Next non-empty row, or `None` at end of file
    pub fn next_row(&mut self) -> Result<Option<Vec<String>>, CsvError> {
        loop {
            if !self.reader.read_record(&mut self.record)? {
                return Ok(None);
            }

            let row: Vec<String> = self.record.iter().map(|s| s.to_string()).collect();
            if !is_empty_row(&row) {
                return Ok(Some(row));
            }
        }
    }
}

/// True for rows with no cells, or exactly one cell of pure whitespace
pub fn is_empty_row(row: &[String]) -> bool {
    row.is_empty() || (row.len() == 1 && row[0].trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_is_empty_row() {
        assert!(is_empty_row(&[]));
        assert!(is_empty_row(&["".to_string()]));
        assert!(is_empty_row(&["   ".to_string()]));
        assert!(!is_empty_row(&[" ".to_string(), "x".to_string()]));
        assert!(!is_empty_row(&["x".to_string()]));
    }

    #[test]
    fn test_skips_blank_and_whitespace_lines() {
        let file = write_file("a,b\n\n   \n1,2\n\n3,4\n");
        let mut stream = CsvStream::open(file.path(), b',').unwrap();

        let mut rows = Vec::new();
        while let Some(row) = stream.next_row().unwrap() {
            rows.push(row);
        }

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["a", "b"]);
        assert_eq!(rows[1], vec!["1", "2"]);
        assert_eq!(rows[2], vec!["3", "4"]);
    }

    #[test]
    fn test_ragged_rows_pass_through() {
        // Structural consistency is the validator's job, not the reader's.
        let file = write_file("a,b\n1,2,3\n4\n");
        let mut stream = CsvStream::open(file.path(), b',').unwrap();

        stream.next_row().unwrap();
        assert_eq!(stream.next_row().unwrap().unwrap().len(), 3);
        assert_eq!(stream.next_row().unwrap().unwrap().len(), 1);
        assert!(stream.next_row().unwrap().is_none());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let file = write_file("a;b\n1;2\n");
        let mut stream = CsvStream::open(file.path(), b';').unwrap();
        assert_eq!(stream.next_row().unwrap().unwrap(), vec!["a", "b"]);
    }
}
