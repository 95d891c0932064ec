//! Format detection from a bounded file prefix

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::StoreError;
use crate::models::StoreFormat;

/// Number of leading bytes inspected per file
pub const SNIFF_LEN: u64 = 512;

const SQLITE_MAGIC: &[u8] = b"SQLite format 3\0";
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Classify a file by reading at most [`SNIFF_LEN`] bytes
///
/// # Errors
///
/// Returns [`StoreError::Unreadable`] if the file cannot be opened or read.
/// An unrecognised file is not an error; it is reported as [`StoreFormat::Unknown`].
pub fn detect_format(path: &Path) -> Result<StoreFormat, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::unreadable(path, e))?;
    let mut prefix = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut prefix).map_err(|e| StoreError::unreadable(path, e))?;
    Ok(classify_prefix(&prefix))
}

/// Classify raw leading bytes
pub fn classify_prefix(prefix: &[u8]) -> StoreFormat {
    if prefix.starts_with(SQLITE_MAGIC) {
        return StoreFormat::Relational;
    }

    let text = prefix.strip_prefix(UTF8_BOM).unwrap_or(prefix);
    let start = text.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(text.len());
    let text = &text[start..];

    if text.starts_with(b"<?xml") || text.starts_with(b"<!--") || starts_with_doctype(text) {
        return StoreFormat::Hierarchical;
    }
    match text {
        [b'<', next, ..] if next.is_ascii_alphabetic() => StoreFormat::Hierarchical,
        _ => StoreFormat::Unknown,
    }
}

fn starts_with_doctype(text: &[u8]) -> bool {
    const DOCTYPE: &[u8] = b"<!DOCTYPE";
    text.len() >= DOCTYPE.len() && text[..DOCTYPE.len()].eq_ignore_ascii_case(DOCTYPE)
}
