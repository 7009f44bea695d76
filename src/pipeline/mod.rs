//! Upload → validate → concatenate → (filter) → spreadsheet.

mod combine;
mod export;
mod filter;
mod ingest;

pub use combine::{MPAN_COLUMNS, combine};
pub use export::{
    COMBINED_FILE_NAME, COMBINED_SHEET, Export, FILTERED_SHEET, XLSX_MIME, combined_export,
    export_xlsx, filtered_export, safe_file_name,
};
pub use filter::filter_by_mpan;
pub use ingest::{Diagnostic, InputMode, Ingested, RawFile, Severity, ingest};

use crate::core::MergeError;
use crate::table::Table;

/// Result of one upload batch: the combined table, or why there is none,
/// alongside the per-file diagnostics either way.
#[derive(Debug)]
pub struct Combined {
    pub table: Result<Table, MergeError>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn combine_files(files: Vec<RawFile>, mode: InputMode) -> Combined {
    let Ingested {
        tables,
        diagnostics,
    } = ingest(files, mode);
    Combined {
        table: combine(&tables, mode),
        diagnostics,
    }
}
