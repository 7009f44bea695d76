use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use log::info;

use crate::core::MergeError;
use crate::pipeline::InputMode;
use crate::table::{COLUMN_COUNT, Table, schema_for};

/// Column identifiers given to headerless input.
pub const MPAN_COLUMNS: [&str; COLUMN_COUNT] = ["MPAN", "Column2", "Column3", "Column4"];

/// Concatenates accepted tables in file order, then row order.
///
/// With a header the first table's column identifiers win and later tables
/// are aligned by position. Headerless input is named `MPAN_COLUMNS`.
pub fn combine(tables: &[Table], mode: InputMode) -> Result<Table, MergeError> {
    let first = tables.first().ok_or(MergeError::NoValidInput)?;

    let names: Vec<String> = match mode {
        InputMode::WithHeader => first.column_names(),
        InputMode::Headerless => MPAN_COLUMNS.iter().map(|n| n.to_string()).collect(),
    };
    let schema = schema_for(&names);

    let batches: Vec<RecordBatch> = tables
        .iter()
        .map(|t| RecordBatch::try_new(schema.clone(), t.batch().columns().to_vec()))
        .collect::<Result<_, _>>()?;
    let combined = Table::from_batch(concat_batches(&schema, &batches)?)?;

    info!(
        files = tables.len(),
        rows = combined.num_rows();
        "combined tables"
    );
    Ok(combined)
}
