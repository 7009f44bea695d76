use log::info;
use rust_xlsxwriter::{Format, Workbook};

use crate::core::MergeError;
use crate::table::Table;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const COMBINED_SHEET: &str = "Combined";
pub const COMBINED_FILE_NAME: &str = "combined_data.xlsx";
pub const FILTERED_SHEET: &str = "Filtered";

/// An in-memory spreadsheet ready to be offered for download.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Serializes `table` into a single-sheet workbook.
///
/// The header row carries the column identifiers; no index column is
/// written. Cells are written as text so reading the sheet back gives the
/// exact values that went in.
pub fn export_xlsx(table: &Table, sheet: &str) -> Result<Vec<u8>, MergeError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    for (col, name) in table.column_names().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header)?;
    }
    for (idx, row) in table.rows().enumerate() {
        let xl_row = u32::try_from(idx + 1)
            .map_err(|_| MergeError::ExportError(format!("row {} out of range", idx + 1)))?;
        for (col, value) in row.iter().enumerate() {
            // blank cells stay blank instead of holding an empty string
            if !value.is_empty() {
                worksheet.write_string(xl_row, col as u16, *value)?;
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    info!(sheet = sheet, rows = table.num_rows(), bytes = bytes.len(); "exported workbook");
    Ok(bytes)
}

pub fn combined_export(table: &Table) -> Result<Export, MergeError> {
    Ok(Export {
        file_name: COMBINED_FILE_NAME.to_string(),
        bytes: export_xlsx(table, COMBINED_SHEET)?,
    })
}

/// `mpan` is user input; the file name keeps it only as a plain ASCII token
/// with no path separators.
pub fn filtered_export(table: &Table, mpan: &str) -> Result<Export, MergeError> {
    Ok(Export {
        file_name: safe_file_name(&format!("{mpan}_filtered.xlsx")),
        bytes: export_xlsx(table, FILTERED_SHEET)?,
    })
}

/// Replaces quotes, path separators, control and non-ASCII characters
/// with `_`.
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}
