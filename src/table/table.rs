use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::core::MergeError;

/// Every accepted table has exactly this many columns.
pub const COLUMN_COUNT: usize = 4;

/// Ordered column identifiers plus rows of `COLUMN_COUNT` text cells.
///
/// Backed by a single `RecordBatch` whose columns are all non-null Utf8.
/// Cells keep the text they were read with, so the canonical string form
/// of a cell is the cell itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    pub fn try_new(names: Vec<String>, columns: Vec<ArrayRef>) -> Result<Self, MergeError> {
        if names.len() != COLUMN_COUNT || columns.len() != COLUMN_COUNT {
            return Err(MergeError::TableError(format!(
                "expected {} columns, got {} names and {} arrays",
                COLUMN_COUNT,
                names.len(),
                columns.len()
            )));
        }
        let batch = RecordBatch::try_new(schema_for(&names), columns)?;
        Ok(Self { batch })
    }

    pub fn from_rows<S: AsRef<str>>(
        names: [S; COLUMN_COUNT],
        rows: &[[S; COLUMN_COUNT]],
    ) -> Result<Self, MergeError> {
        let columns: Vec<ArrayRef> = (0..COLUMN_COUNT)
            .map(|c| {
                let array: StringArray =
                    StringArray::from_iter_values(rows.iter().map(|row| row[c].as_ref()));
                Arc::new(array) as ArrayRef
            })
            .collect();
        let names = names.iter().map(|n| n.as_ref().to_string()).collect();
        Self::try_new(names, columns)
    }

    pub fn from_batch(batch: RecordBatch) -> Result<Self, MergeError> {
        if batch.num_columns() != COLUMN_COUNT {
            return Err(MergeError::TableError(format!(
                "expected {} columns, got {}",
                COLUMN_COUNT,
                batch.num_columns()
            )));
        }
        if let Some(field) = batch
            .schema()
            .fields()
            .iter()
            .find(|f| f.data_type() != &DataType::Utf8)
        {
            return Err(MergeError::TableError(format!(
                "column '{}' has type {}, expected Utf8",
                field.name(),
                field.data_type()
            )));
        }
        Ok(Self { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn column(&self, idx: usize) -> &StringArray {
        self.batch.column(idx).as_string::<i32>()
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.column(col).value(row)
    }

    pub fn row(&self, idx: usize) -> [&str; COLUMN_COUNT] {
        std::array::from_fn(|col| self.cell(idx, col))
    }

    pub fn rows(&self) -> impl Iterator<Item = [&str; COLUMN_COUNT]> + '_ {
        (0..self.num_rows()).map(|idx| self.row(idx))
    }

    /// First `n` rows (or all of them when the table is shorter).
    pub fn head(&self, n: usize) -> Table {
        let len = n.min(self.num_rows());
        Table {
            batch: self.batch.slice(0, len),
        }
    }
}

pub(crate) fn schema_for(names: &[String]) -> SchemaRef {
    let fields: Vec<Field> = names
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, false))
        .collect();
    Arc::new(Schema::new(fields))
}
