mod table;

pub use table::{COLUMN_COUNT, Table};
pub(crate) use table::schema_for;
