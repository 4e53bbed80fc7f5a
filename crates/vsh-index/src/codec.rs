//! Flat CSV encoding of the index.
//!
//! ```text
//! "File Path","Created Date (System)","Protect Date","Deleted Date"
//! "Notes/a.md",05/01/24 10:30,FALSE,
//! "b.png",07/01/24 09:12,TRUE,12/03/24 18:00
//! ```
//!
//! The path field is quoted (paths may contain commas); the date columns
//! use one fixed zone-free format for both reading and writing, and an
//! empty deleted field means "still present". `TRUE` is the only token
//! that reads back as protected.

use chrono::NaiveDateTime;

use vsh_core::{Result, VshError};

use crate::{Index, IndexEntry};

/// Fixed on-disk date format. Unrelated to the configurable display format.
pub const INDEX_DATE_FORMAT: &str = "%d/%m/%y %H:%M";

/// Header row; the first line of the resource is always skipped on read.
pub const HEADER: &str = r#""File Path","Created Date (System)","Protect Date","Deleted Date""#;

const PROTECTED_TOKEN: &str = "TRUE";
const UNPROTECTED_TOKEN: &str = "FALSE";

/// Serialize an index, one row per entry in map (path) order.
#[must_use]
pub fn encode(index: &Index) -> String {
    let mut out = String::from(HEADER);
    for entry in index.values() {
        out.push('\n');
        out.push('"');
        out.push_str(&entry.path.replace('"', "\"\""));
        out.push_str("\",");
        out.push_str(&entry.created.format(INDEX_DATE_FORMAT).to_string());
        out.push(',');
        out.push_str(if entry.protected {
            PROTECTED_TOKEN
        } else {
            UNPROTECTED_TOKEN
        });
        out.push(',');
        if let Some(deleted) = entry.deleted {
            out.push_str(&deleted.format(INDEX_DATE_FORMAT).to_string());
        }
    }
    out.push('\n');
    out
}

/// Parse a serialized index. The first row is the header and is skipped;
/// blank lines are ignored.
pub fn decode(raw: &str) -> Result<Index> {
    let mut index = Index::new();
    for (lineno, line) in raw.lines().enumerate() {
        if lineno == 0 || line.trim().is_empty() {
            continue;
        }
        let entry = decode_row(line)
            .map_err(|e| VshError::Index(format!("row {}: {e}", lineno + 1)))?;
        index.insert(entry.path.clone(), entry);
    }
    Ok(index)
}

fn decode_row(line: &str) -> std::result::Result<IndexEntry, String> {
    let (path, rest) = split_path_field(line)?;
    let mut fields = rest.splitn(3, ',');
    let created = fields.next().ok_or("missing created date")?;
    let protect = fields.next().ok_or("missing protect field")?;
    let deleted = fields.next().unwrap_or("");

    let created = NaiveDateTime::parse_from_str(created, INDEX_DATE_FORMAT)
        .map_err(|e| format!("bad created date '{created}': {e}"))?;
    let deleted = if deleted.is_empty() {
        None
    } else {
        Some(
            NaiveDateTime::parse_from_str(deleted, INDEX_DATE_FORMAT)
                .map_err(|e| format!("bad deleted date '{deleted}': {e}"))?,
        )
    };

    Ok(IndexEntry {
        path,
        created,
        protected: protect == PROTECTED_TOKEN,
        deleted,
    })
}

/// Split off the leading quoted path field, returning the unescaped path
/// and everything after the following comma.
fn split_path_field(line: &str) -> std::result::Result<(String, &str), String> {
    let inner = line.strip_prefix('"').ok_or("path field is not quoted")?;

    let mut path = String::new();
    let mut chars = inner.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            path.push(c);
            continue;
        }
        // Either an escaped quote ("") or the closing quote.
        match inner[i + 1..].chars().next() {
            Some('"') => {
                path.push('"');
                chars.next();
            }
            Some(',') => return Ok((path, &inner[i + 2..])),
            Some(other) => return Err(format!("unexpected '{other}' after closing quote")),
            None => return Err("row ends after path field".to_string()),
        }
    }
    Err("unterminated quoted path field".to_string())
}
