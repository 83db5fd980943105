//! Bulk import staging from operator-provided CSV files
//!
//! Files are parsed entirely in memory into editable drafts; nothing is sent until the
//! operator commits. Columns are positional. Rows that cannot be read are kept aside as
//! [`RowError`]s instead of being silently truncated.

pub mod books;
pub mod students;

use csv::{ReaderBuilder, StringRecord, Trim};
use unicode_normalization::UnicodeNormalization;

pub use books::{BookDraft, BookField, BookImport};
pub use students::{StudentDraft, StudentField, StudentImport};

/// A CSV line that could not be staged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the file
    pub line: u64,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Parsed record with its line number
pub(crate) struct Record {
    pub line: u64,
    pub fields: Vec<String>,
}

/// Read all records; quoted fields may contain commas and newlines
pub(crate) fn read_records(text: &str) -> (Vec<Record>, Vec<RowError>) {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut errors = Vec::new();
    let mut record = StringRecord::new();
    let mut fallback_line = 0;

    loop {
        fallback_line += 1;
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                if record.iter().all(|f| f.is_empty()) {
                    continue;
                }
                let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
                records.push(Record {
                    line,
                    fields: record.iter().map(str::to_string).collect(),
                });
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                tracing::warn!("Unreadable CSV line {}: {}", line, e);
                errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                if !matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) {
                    break;
                }
            }
        }
    }

    (records, errors)
}

/// Compare a field against header aliases, ignoring case, width and surrounding spaces
pub(crate) fn is_header_alias(field: &str, aliases: &[&str]) -> bool {
    let normalized: String = field.nfkc().collect::<String>().trim().to_lowercase();
    aliases.iter().any(|alias| *alias == normalized)
}

/// Strip separators from an ISBN, keeping digits and the X check character
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Empty input maps to `None`; anything else must parse
pub(crate) fn parse_optional<T: std::str::FromStr>(value: &str) -> Result<Option<T>, ()> {
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some).map_err(|_| ())
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_fields_keep_commas() {
        let (records, errors) = read_records("\u{feff}\"Dune, Part One\",Herbert\n\n Emma , Austen \n");
        assert!(errors.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["Dune, Part One", "Herbert"]);
        assert_eq!(records[1].fields, vec!["Emma", "Austen"]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_header_alias() {
        assert!(is_header_alias(" TITLE ", &["title"]));
        assert!(is_header_alias("Ｔｉｔｌｅ", &["title"]));
        assert!(!is_header_alias("Dune", &["title"]));
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-2-07-040850-4"), "9782070408504");
        assert_eq!(normalize_isbn("0 8044 2957 X"), "080442957X");
    }
}
