//! CSV processing facade: validation, row counting, schema extraction,
//! and record materialization over one detected delimiter per file.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use tracing::debug;

use cb_core::{ColumnSchema, ColumnType, Record};

use crate::delimiter::{detect_delimiter, DEFAULT_DELIMITERS, DEFAULT_SAMPLE_LINES};
use crate::infer::{detect_column_type, detect_value_type};
use crate::mime::{detect_mime, VALID_MIMES};
use crate::stream::CsvStream;
use crate::CsvError;

/// Data rows sampled for schema inference when callers don't say otherwise
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// CSV processor with per-file delimiter memoization.
///
/// Detection runs once per (processor, file) pair; reusing one processor
/// across files is safe because the memo is keyed by path.
pub struct CsvProcessor {
    /// Delimiter candidates, in preference order
    delimiters: Vec<u8>,

    /// Lines sampled for delimiter detection
    sample_lines: usize,

    /// Opt-in per-value type-drift checking during validation
    strict_types: bool,

    /// Detected delimiter per file path
    delimiter_cache: AHashMap<PathBuf, u8>,
}

impl Default for CsvProcessor {
    fn default() -> Self {
        Self {
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            sample_lines: DEFAULT_SAMPLE_LINES,
            strict_types: false,
            delimiter_cache: AHashMap::new(),
        }
    }
}

impl CsvProcessor {
    /// Create a processor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter candidates
    pub fn with_delimiters(mut self, delimiters: Vec<u8>) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Enable the strict per-value type-drift check in `validate_file`.
    ///
    /// Off by default, and deliberately so: enabling it rejects files the
    /// default validation accepts.
    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    /// Validate the file at `path` for use as a data source.
    ///
    /// Checks readability (existence, `.csv` extension, and the MIME
    /// allow-list when `check_mime` is set), a header of at least two
    /// columns, a consistent column count on every data row, and at least
    /// one data row. The first failure wins; nothing else is reported.
    ///
    /// `sample_size` only matters in strict mode, where it bounds the rows
    /// used to seed per-column type hints before drift checking begins.
    pub fn validate_file(
        &mut self,
        path: &Path,
        check_mime: bool,
        sample_size: usize,
    ) -> Result<(), CsvError> {
        if !self.is_readable_csv(path, check_mime) {
            return Err(CsvError::NotReadable {
                path: path.to_path_buf(),
            });
        }

        let mut stream = self.open_csv(path)?;
        let mut header: Option<Vec<String>> = None;
        let mut type_hints: Vec<Option<ColumnType>> = Vec::new();
        let mut line_num = 0usize;

        while let Some(row) = stream.next_row()? {
            line_num += 1;

            let header = match &header {
                None => {
                    let cols: Vec<String> = row.iter().map(|c| c.trim().to_string()).collect();
                    if cols.len() < 2 {
                        return Err(CsvError::InvalidHeader);
                    }
                    type_hints = vec![None; cols.len()];
                    header = Some(cols);
                    continue;
                }
                Some(header) => header,
            };

            if row.len() != header.len() {
                return Err(CsvError::ColumnCountMismatch { line: line_num });
            }

            if self.strict_types {
                self.check_type_drift(header, &mut type_hints, &row, line_num, sample_size)?;
            }
        }

        if line_num <= 1 {
            return Err(CsvError::EmptyFile);
        }

        Ok(())
    }

    /// Strict-mode helper: seed type hints over the first `sample_size`
    /// data rows, then flag any later value whose detected type disagrees
    /// (an integer where a float is expected still passes).
    fn check_type_drift(
        &self,
        header: &[String],
        type_hints: &mut [Option<ColumnType>],
        row: &[String],
        line_num: usize,
        sample_size: usize,
    ) -> Result<(), CsvError> {
        if line_num <= sample_size + 1 {
            for (i, value) in row.iter().enumerate() {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                if type_hints[i].is_none() {
                    type_hints[i] = Some(detect_value_type(value));
                }
            }
        } else {
            for (i, value) in row.iter().enumerate() {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                let expected = type_hints[i].unwrap_or(ColumnType::String);
                let actual = detect_value_type(value);
                if expected != actual
                    && !(expected == ColumnType::Float && actual == ColumnType::Integer)
                {
                    return Err(CsvError::TypeMismatch {
                        line: line_num,
                        column: header[i].clone(),
                        expected,
                        found: actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// Count data rows, skipping empty rows; `include_header` counts the
    /// first non-empty row too
    pub fn count_rows(&mut self, path: &Path, include_header: bool) -> Result<usize, CsvError> {
        let mut stream = self.open_csv(path)?;

        let mut count = 0usize;
        let mut has_header = false;

        while stream.next_row()?.is_some() {
            if !has_header {
                has_header = true;
                if !include_header {
                    continue;
                }
            }
            count += 1;
        }

        Ok(count)
    }

    /// Infer a schema from up to `sample_size` data rows.
    ///
    /// The first non-empty row names the columns. Blank cells contribute
    /// no samples, so a sparse column may see fewer values than the row
    /// budget allows: the countdown is shared across columns and ticks
    /// once per data row.
    pub fn extract_schema(
        &mut self,
        path: &Path,
        sample_size: usize,
    ) -> Result<Vec<ColumnSchema>, CsvError> {
        let mut stream = self.open_csv(path)?;
        let mut header: Option<Vec<String>> = None;
        let mut columns: indexmap::IndexMap<String, Vec<String>> = indexmap::IndexMap::new();
        let mut remaining = sample_size;

        while let Some(row) = stream.next_row()? {
            let header = match &header {
                None => {
                    let cols: Vec<String> = row.iter().map(|c| c.trim().to_string()).collect();
                    for col in &cols {
                        columns.entry(col.clone()).or_default();
                    }
                    header = Some(cols);
                    continue;
                }
                Some(header) => header,
            };

            for (i, col) in header.iter().enumerate() {
                let value = match row.get(i) {
                    Some(v) if !v.trim().is_empty() => v.trim(),
                    _ => continue,
                };
                let samples = columns.entry(col.clone()).or_default();
                if samples.len() < sample_size {
                    samples.push(value.to_string());
                }
            }

            if remaining <= 1 {
                break;
            }
            remaining -= 1;
        }

        if header.is_none() {
            return Err(CsvError::MissingHeader);
        }

        debug!(path = %path.display(), columns = columns.len(), "extracted schema");

        Ok(columns
            .into_iter()
            .map(|(name, samples)| ColumnSchema::new(name, detect_column_type(&samples)))
            .collect())
    }

    /// Materialize every data row as a header-keyed record.
    ///
    /// Cells beyond the header width are dropped and missing cells come
    /// back empty; validation is assumed to have passed already.
    pub fn read_records(&mut self, path: &Path) -> Result<Vec<Record>, CsvError> {
        let mut stream = self.open_csv(path)?;
        let mut header: Option<Vec<String>> = None;
        let mut records = Vec::new();

        while let Some(row) = stream.next_row()? {
            let header = match &header {
                None => {
                    header = Some(row.iter().map(|c| c.trim().to_string()).collect());
                    continue;
                }
                Some(header) => header,
            };

            let mut record = Record::with_capacity(header.len());
            for (i, col) in header.iter().enumerate() {
                record.insert(col.clone(), row.get(i).cloned().unwrap_or_default());
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Open a forward-only stream over `path` with its detected delimiter
    pub fn open_csv(&mut self, path: &Path) -> Result<CsvStream, CsvError> {
        let delimiter = self.delimiter_for(path)?;
        CsvStream::open(path, delimiter)
    }

    /// Detected delimiter for `path`, memoized per processor instance
    pub fn delimiter_for(&mut self, path: &Path) -> Result<u8, CsvError> {
        if let Some(&cached) = self.delimiter_cache.get(path) {
            return Ok(cached);
        }

        let delimiter = detect_delimiter(path, &self.delimiters, self.sample_lines)?;
        self.delimiter_cache.insert(path.to_path_buf(), delimiter);
        Ok(delimiter)
    }

    /// Readability gate: the file exists, carries a `.csv` extension, and
    /// (when `check_mime` is set) sniffs to an allow-listed MIME type
    fn is_readable_csv(&self, path: &Path, check_mime: bool) -> bool {
        if !path.is_file() {
            return false;
        }

        let is_csv_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv_ext {
            return false;
        }

        if check_mime {
            match detect_mime(path) {
                Ok(mime) => VALID_MIMES.contains(&mime),
                Err(_) => false,
            }
        } else {
            true
        }
    }
}
