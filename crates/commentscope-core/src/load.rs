//! CSV loading and validation for the comment dataset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::LoadError;
use crate::types::CommentRecord;

/// Columns that must be present in the input header.
pub const REQUIRED_COLUMNS: [&str; 4] = ["timestamp", "media_id", "media_caption", "comment_text"];

/// Date-time layouts tried after RFC 3339, in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Deserialize)]
struct RawComment {
    timestamp: String,
    media_id: Option<String>,
    media_caption: Option<String>,
    comment_text: Option<String>,
}

/// Load and validate the comment dataset at `path`.
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] if the file does not exist, and any error
/// from [`read_comments`] for malformed content.
pub fn load_comments(path: &Path) -> Result<Vec<CommentRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let records = read_comments(file)?;
    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        "data loaded successfully"
    );
    Ok(records)
}

/// Parse comment rows from any CSV reader.
///
/// Header names are trimmed and extra columns are ignored. Empty
/// `media_caption` / `comment_text` cells become empty strings.
///
/// # Errors
///
/// - [`LoadError::MissingColumns`] if any of [`REQUIRED_COLUMNS`] is absent.
/// - [`LoadError::InvalidTimestamp`] if a timestamp cannot be parsed.
/// - [`LoadError::Csv`] for malformed CSV.
pub fn read_comments<R: Read>(reader: R) -> Result<Vec<CommentRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawComment>().enumerate() {
        let raw = row?;
        // Header is line 1; data rows are numbered from 2.
        let line = idx + 2;
        let timestamp =
            parse_timestamp(&raw.timestamp).ok_or_else(|| LoadError::InvalidTimestamp {
                row: line,
                value: raw.timestamp.clone(),
            })?;
        records.push(CommentRecord::new(
            timestamp,
            raw.media_id.unwrap_or_default(),
            raw.media_caption.unwrap_or_default(),
            raw.comment_text.unwrap_or_default(),
        ));
    }

    Ok(records)
}

/// Parse a timestamp in any of the supported layouts.
///
/// Offsets are honoured for parsing but the wall-clock (local) time is kept,
/// so ISO week grouping matches the time the comment was posted.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
