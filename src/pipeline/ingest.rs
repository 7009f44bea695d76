use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use bytes::Bytes;
use csv::{ReaderBuilder, StringRecord};
use log::{error, info, warn};

use crate::table::{COLUMN_COUNT, Table};

/// An uploaded file: display name plus its raw content.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub bytes: Bytes,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// How the first row of every file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// First row holds the column identifiers.
    WithHeader,
    /// Every row is data; columns are named later by the combiner.
    Headerless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Why a file did not make it into the combined table.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Skipped { file: String, columns: usize },
    Unreadable { file: String, cause: String },
}

impl Diagnostic {
    pub fn file(&self) -> &str {
        match self {
            Diagnostic::Skipped { file, .. } | Diagnostic::Unreadable { file, .. } => file,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::Skipped { .. } => Severity::Warning,
            Diagnostic::Unreadable { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Skipped { file, .. } => write!(
                f,
                "File '{}' does not have exactly {} columns. Skipping.",
                file, COLUMN_COUNT
            ),
            Diagnostic::Unreadable { file, cause } => {
                write!(f, "Error reading '{}': {}", file, cause)
            }
        }
    }
}

/// Accepted tables in upload order, plus one diagnostic per rejected file.
#[derive(Debug, Default)]
pub struct Ingested {
    pub tables: Vec<Table>,
    pub diagnostics: Vec<Diagnostic>,
}

enum Parsed {
    Accepted(Table),
    WrongShape(usize),
}

/// Parses every file independently. A bad file never aborts the batch.
pub fn ingest(files: Vec<RawFile>, mode: InputMode) -> Ingested {
    let mut out = Ingested::default();

    for file in files {
        let diagnostic = match parse(&file.bytes, mode) {
            Ok(Parsed::Accepted(table)) => {
                info!(file = file.name.as_str(), rows = table.num_rows(); "accepted file");
                out.tables.push(table);
                continue;
            }
            Ok(Parsed::WrongShape(columns)) => Diagnostic::Skipped {
                file: file.name,
                columns,
            },
            Err(cause) => Diagnostic::Unreadable {
                file: file.name,
                cause,
            },
        };

        match diagnostic.severity() {
            Severity::Warning => warn!("{}", diagnostic),
            Severity::Error => error!("{}", diagnostic),
        }
        out.diagnostics.push(diagnostic);
    }

    out
}

fn parse(bytes: &[u8], mode: InputMode) -> Result<Parsed, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(mode == InputMode::WithHeader)
        .flexible(true)
        .from_reader(bytes);

    let header: Option<Vec<String>> = match mode {
        InputMode::WithHeader => Some(
            reader
                .headers()
                .map_err(|e| e.to_string())?
                .iter()
                .map(String::from)
                .collect(),
        ),
        InputMode::Headerless => None,
    };

    let records: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| e.to_string())?;

    let width = match &header {
        Some(names) => names.len(),
        None => records.first().map(StringRecord::len).unwrap_or(0),
    };
    if width == 0 {
        return Err("No columns to parse from file".to_string());
    }
    // short rows are padded with blanks below, long rows cannot be placed
    if let Some(record) = records.iter().find(|r| r.len() > width) {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        return Err(format!(
            "Expected {} fields in line {}, saw {}",
            width,
            line,
            record.len()
        ));
    }
    if width != COLUMN_COUNT {
        return Ok(Parsed::WrongShape(width));
    }

    let names = header.unwrap_or_else(|| (0..COLUMN_COUNT).map(|i| i.to_string()).collect());
    let columns: Vec<ArrayRef> = (0..COLUMN_COUNT)
        .map(|c| {
            let array = StringArray::from_iter_values(records.iter().map(|r| r.get(c).unwrap_or("")));
            Arc::new(array) as ArrayRef
        })
        .collect();

    Table::try_new(names, columns)
        .map(Parsed::Accepted)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> RawFile {
        RawFile::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn test_header_row_becomes_column_names() {
        let out = ingest(
            vec![file("a.csv", "w,x,y,z\n1,2,3,4\n5,6,7,8\n")],
            InputMode::WithHeader,
        );
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.tables.len(), 1);
        assert_eq!(out.tables[0].column_names(), vec!["w", "x", "y", "z"]);
        assert_eq!(out.tables[0].num_rows(), 2);
    }

    #[test]
    fn test_headerless_keeps_first_row() {
        let out = ingest(
            vec![file("a.csv", "1,2,3,4\n5,6,7,8\n")],
            InputMode::Headerless,
        );
        assert_eq!(out.tables[0].num_rows(), 2);
        assert_eq!(out.tables[0].row(0), ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_wrong_width_is_skipped_with_warning() {
        let out = ingest(
            vec![
                file("three.csv", "a,b,c\n1,2,3\n"),
                file("four.csv", "a,b,c,d\n1,2,3,4\n"),
            ],
            InputMode::WithHeader,
        );
        assert_eq!(out.tables.len(), 1);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::Skipped {
                file: "three.csv".to_string(),
                columns: 3
            }]
        );
        assert_eq!(
            out.diagnostics[0].to_string(),
            "File 'three.csv' does not have exactly 4 columns. Skipping."
        );
        assert_eq!(out.diagnostics[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let out = ingest(
            vec![file("a.csv", "a,b,c,d\n1,2,3,4\n5,6,7\n")],
            InputMode::WithHeader,
        );
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.tables[0].num_rows(), 2);
        assert_eq!(out.tables[0].row(1), ["5", "6", "7", ""]);
    }

    #[test]
    fn test_short_rows_are_padded_without_header() {
        let out = ingest(
            vec![file("a.csv", "1,2,3,4\n5\n")],
            InputMode::Headerless,
        );
        assert_eq!(out.tables[0].row(1), ["5", "", "", ""]);
    }

    #[test]
    fn test_long_rows_are_unreadable() {
        let out = ingest(
            vec![file("bad.csv", "1,2,3,4\n1,2,3,4,5\n")],
            InputMode::Headerless,
        );
        assert!(out.tables.is_empty());
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::Unreadable {
                file: "bad.csv".to_string(),
                cause: "Expected 4 fields in line 2, saw 5".to_string()
            }]
        );
        assert_eq!(out.diagnostics[0].severity(), Severity::Error);
    }

    #[test]
    fn test_long_rows_win_over_wrong_width() {
        let out = ingest(
            vec![file("bad.csv", "a,b,c\n1,2,3,4,5\n")],
            InputMode::WithHeader,
        );
        assert_eq!(out.diagnostics[0].severity(), Severity::Error);
    }

    #[test]
    fn test_empty_file_is_unreadable() {
        let out = ingest(vec![file("empty.csv", "")], InputMode::WithHeader);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::Unreadable {
                file: "empty.csv".to_string(),
                cause: "No columns to parse from file".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let out = ingest(
            vec![RawFile::new("bin.csv", vec![0x31, 0x2c, 0xff, 0xfe, 0x2c, 0x33, 0x2c, 0x34])],
            InputMode::Headerless,
        );
        assert!(out.tables.is_empty());
        assert_eq!(out.diagnostics[0].file(), "bin.csv");
        assert_eq!(out.diagnostics[0].severity(), Severity::Error);
    }

    #[test]
    fn test_header_only_file_is_accepted_empty() {
        let out = ingest(vec![file("h.csv", "a,b,c,d\n")], InputMode::WithHeader);
        assert_eq!(out.tables.len(), 1);
        assert!(out.tables[0].is_empty());
    }

    #[test]
    fn test_upload_order_is_kept() {
        let out = ingest(
            vec![
                file("1.csv", "x,1,1,1\n"),
                file("bad.csv", "x\n"),
                file("2.csv", "y,2,2,2\n"),
            ],
            InputMode::Headerless,
        );
        assert_eq!(out.tables.len(), 2);
        assert_eq!(out.tables[0].cell(0, 0), "x");
        assert_eq!(out.tables[1].cell(0, 0), "y");
    }

    #[test]
    fn test_cells_are_not_trimmed() {
        let out = ingest(
            vec![file("s.csv", " 123 ,a,b,c\n0123,d,e,f\n")],
            InputMode::Headerless,
        );
        assert_eq!(out.tables[0].cell(0, 0), " 123 ");
        assert_eq!(out.tables[0].cell(1, 0), "0123");
    }
}
