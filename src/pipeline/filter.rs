use arrow::array::StringArray;
use arrow::compute::filter_record_batch;
use arrow::compute::kernels::cmp::eq;

use crate::core::MergeError;
use crate::table::Table;

/// Rows whose first (MPAN) column equals `key` exactly.
///
/// No trimming, case folding or partial matching. An empty result is a
/// valid answer, not an error.
pub fn filter_by_mpan(table: &Table, key: &str) -> Result<Table, MergeError> {
    let key = StringArray::new_scalar(key);
    let mask = eq(table.batch().column(0), &key)?;
    Table::from_batch(filter_record_batch(table.batch(), &mask)?)
}
