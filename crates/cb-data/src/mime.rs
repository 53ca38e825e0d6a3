//! Content-based MIME sniffing for upload gating
//!
//! A small heuristic in place of libmagic: text with delimited lines reads
//! as CSV and plain text otherwise, while NUL bytes or invalid UTF-8 mark
//! the file as an opaque binary.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// MIME types accepted for CSV uploads
pub const VALID_MIMES: &[&str] = &[
    "text/csv",
    "text/plain",
    "application/vnd.ms-excel",
    "application/csv",
    "application/x-csv",
    "text/comma-separated-values",
    "text/x-comma-separated-values",
    "text/x-csv",
];

/// Bytes sniffed from the head of the file
const SNIFF_LEN: usize = 8192;

/// Detect a MIME type for the file at `path` from its leading bytes
pub fn detect_mime(path: &Path) -> io::Result<&'static str> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; SNIFF_LEN];
    let read = file.read(&mut buffer)?;
    buffer.truncate(read);

    if buffer.is_empty() {
        return Ok("application/x-empty");
    }

    if buffer.contains(&0) {
        return Ok("application/octet-stream");
    }

    // A multibyte char cut off at the sniff boundary is still text.
    let text = match std::str::from_utf8(&buffer) {
        Ok(text) => text,
        Err(e) if e.valid_up_to() > buffer.len().saturating_sub(4) && e.error_len().is_none() => {
            std::str::from_utf8(&buffer[..e.valid_up_to()]).unwrap_or("")
        }
        Err(_) => return Ok("application/octet-stream"),
    };

    let delimited = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.contains(',') || line.contains(';'))
        .unwrap_or(false);

    if delimited {
        Ok("text/csv")
    } else {
        Ok("text/plain")
    }
}
