// crates/quality-gate-core/src/core/catalog.rs
// ============================================================================
// Module: Scenario Catalog Store
// Description: Read-only loader for the delimited scenario catalog file.
// Purpose: Expose catalog rows as ordered scenario records with derived counts.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The catalog is a UTF-8 delimited file whose first line is a header. Data
//! rows are positional (`id, service, priority, test_type, automated,
//! test_ref, description`). Fully blank rows are ignored; rows with an empty
//! `id` are kept for record-level checks but excluded from the total count.
//! A double-quoted field may span physical lines; the record keeps the line
//! number where it starts.
//!
//! ## Invariants
//! - The catalog is never mutated.
//! - Record order matches file order.
//! - Reads are bounded by [`MAX_CATALOG_BYTES`] unless a caller passes a limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ScenarioId;
use crate::core::scenario::ScenarioRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Conventional catalog filename in the repository root.
pub const DEFAULT_CATALOG_FILE: &str = "test_scenarios.csv";
/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';
/// Maximum catalog size in bytes.
pub const MAX_CATALOG_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file does not exist.
    #[error("scenario catalog not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The catalog file could not be read.
    #[error("failed to read scenario catalog {}: {error}", path.display())]
    Io {
        /// Catalog path.
        path: PathBuf,
        /// Underlying I/O error message.
        error: String,
    },
    /// The catalog exceeds the read limit.
    #[error("scenario catalog {} exceeds size limit ({limit} bytes)", path.display())]
    TooLarge {
        /// Catalog path.
        path: PathBuf,
        /// Byte limit applied.
        limit: usize,
    },
    /// The catalog is not valid UTF-8.
    #[error("scenario catalog {} is not valid utf-8", path.display())]
    NotUtf8 {
        /// Catalog path.
        path: PathBuf,
    },
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Ordered, read-only scenario catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    /// Scenario rows in file order (header and fully blank rows excluded).
    records: Vec<ScenarioRecord>,
}

impl ScenarioCatalog {
    /// Creates a catalog from already-parsed records.
    #[must_use]
    pub const fn new(records: Vec<ScenarioRecord>) -> Self {
        Self {
            records,
        }
    }

    /// Loads the catalog from disk with the default size limit.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the file is missing and other
    /// [`CatalogError`] variants when it cannot be read.
    pub fn load(path: &Path, delimiter: char) -> Result<Self, CatalogError> {
        Self::load_with_limit(path, delimiter, MAX_CATALOG_BYTES)
    }

    /// Loads the catalog from disk with an explicit size limit.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file is missing, too large, or unreadable.
    pub fn load_with_limit(
        path: &Path,
        delimiter: char,
        max_bytes: usize,
    ) -> Result<Self, CatalogError> {
        let bytes = read_catalog_limited(path, max_bytes)?;
        let text = String::from_utf8(bytes).map_err(|_| CatalogError::NotUtf8 {
            path: path.to_path_buf(),
        })?;
        Ok(Self::parse(&text, delimiter))
    }

    /// Parses catalog text. The first record is always treated as the header.
    #[must_use]
    pub fn parse(text: &str, delimiter: char) -> Self {
        let records = split_records(text, delimiter)
            .into_iter()
            .skip(1)
            .filter(|raw| raw.fields.iter().any(|field| !field.trim().is_empty()))
            .map(|raw| ScenarioRecord::from_fields(raw.line, &raw.fields))
            .collect();
        Self::new(records)
    }

    /// Returns all records in file order.
    #[must_use]
    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    /// Counts records with a non-empty identifier.
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.iter().filter(|record| record.has_id()).count()
    }

    /// Counts records marked as automated.
    #[must_use]
    pub fn automated_count(&self) -> usize {
        self.records.iter().filter(|record| record.automated).count()
    }

    /// Iterates over automated records in file order.
    pub fn automated(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter().filter(|record| record.automated)
    }

    /// Returns identifiers that appear on more than one row, sorted.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<ScenarioId> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for record in self.records.iter().filter(|record| record.has_id()) {
            if !seen.insert(&record.id) {
                duplicates.insert(record.id.clone());
            }
        }
        duplicates.into_iter().collect()
    }

    /// Builds the reporting summary for the catalog.
    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        let mut by_test_type = BTreeMap::new();
        let mut by_priority = BTreeMap::new();
        let mut by_service = BTreeMap::new();
        for record in self.records.iter().filter(|record| record.has_id()) {
            *by_test_type.entry(record.test_type.label().to_string()).or_insert(0) += 1;
            *by_priority.entry(record.priority.label().to_string()).or_insert(0) += 1;
            let service = if record.service.is_empty() { "-" } else { record.service.as_str() };
            *by_service.entry(service.to_string()).or_insert(0) += 1;
        }
        let total = self.total();
        let automated = self.automated_count();
        CatalogSummary {
            total,
            automated,
            automation_ratio: ratio(automated, total),
            by_test_type,
            by_priority,
            by_service,
        }
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Reporting summary of catalog composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Records with a non-empty identifier.
    pub total: usize,
    /// Records marked as automated.
    pub automated: usize,
    /// Automated share of the total (0.0 when the catalog is empty).
    pub automation_ratio: f64,
    /// Record counts keyed by test type label.
    pub by_test_type: BTreeMap<String, usize>,
    /// Record counts keyed by priority label.
    pub by_priority: BTreeMap<String, usize>,
    /// Record counts keyed by service tag.
    pub by_service: BTreeMap<String, usize>,
}

/// Computes `part / whole`, returning zero for an empty whole.
#[allow(clippy::cast_precision_loss, reason = "Catalog counts are far below 2^52.")]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the catalog while enforcing a maximum byte limit.
fn read_catalog_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, CatalogError> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            CatalogError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CatalogError::Io {
                path: path.to_path_buf(),
                error: err.to_string(),
            }
        }
    })?;
    let limit = u64::try_from(max_bytes.saturating_add(1)).map_err(|_| CatalogError::TooLarge {
        path: path.to_path_buf(),
        limit: max_bytes,
    })?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(|err| CatalogError::Io {
        path: path.to_path_buf(),
        error: err.to_string(),
    })?;
    if buf.len() > max_bytes {
        return Err(CatalogError::TooLarge {
            path: path.to_path_buf(),
            limit: max_bytes,
        });
    }
    Ok(buf)
}

/// One delimited record before it is interpreted.
#[derive(Debug, PartialEq, Eq)]
struct RawRecord {
    /// 1-based line on which the record starts.
    line: usize,
    /// Unquoted field values.
    fields: Vec<String>,
}

/// Splits catalog text into records of fields, honoring double-quoted fields.
///
/// Inside quotes, `""` is a literal quote and neither the delimiter nor a
/// line break ends the field. `\r\n` is treated as `\n`.
fn split_records(text: &str, delimiter: char) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }
        if ch == '\n' {
            line += 1;
        }
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' && current.trim().is_empty() {
            current.clear();
            in_quotes = true;
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else if ch == '\n' {
            fields.push(std::mem::take(&mut current));
            records.push(RawRecord {
                line: record_line,
                fields: std::mem::take(&mut fields),
            });
            record_line = line;
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() || !fields.is_empty() || in_quotes {
        fields.push(current);
        records.push(RawRecord {
            line: record_line,
            fields,
        });
    }
    records
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Fields of the first record in `text`.
    fn fields_of(text: &str, delimiter: char) -> Vec<String> {
        split_records(text, delimiter).into_iter().next().map(|raw| raw.fields).unwrap_or_default()
    }

    #[test]
    fn quoted_fields_keep_delimiters_and_escaped_quotes() {
        let fields = fields_of(r#"S-1,ec2,"High","says ""hi"", twice",x"#, ',');
        assert_eq!(fields, vec!["S-1", "ec2", "High", r#"says "hi", twice"#, "x"]);
    }

    #[test]
    fn carriage_returns_before_line_breaks_are_dropped() {
        let records = split_records("a,b\r\nc,d\r\n", ',');
        assert_eq!(records, vec![
            RawRecord {
                line: 1,
                fields: vec!["a".to_string(), "b".to_string()],
            },
            RawRecord {
                line: 2,
                fields: vec!["c".to_string(), "d".to_string()],
            },
        ]);
    }

    #[test]
    fn custom_delimiter_is_honored() {
        assert_eq!(fields_of("a;b,c;d", ';'), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn quoted_line_break_stays_in_one_record() {
        let records = split_records("h\nTS-1,\"first\nsecond\",x\nTS-2,y\n", ',');
        let lines: Vec<usize> = records.iter().map(|raw| raw.line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
        assert_eq!(records[1].fields, vec!["TS-1", "first\nsecond", "x"]);
    }

    #[test]
    fn blank_lines_become_single_empty_field_records() {
        let records = split_records("a\n\nb", ',');
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].fields, vec![""]);
        assert_eq!(records[2].line, 3);
    }

    #[test]
    fn ratio_of_empty_catalog_is_zero() {
        assert!(ratio(0, 0).abs() < f64::EPSILON);
    }
}
