// frbhost-core/src/ports/table.rs

// Where tables come from, without knowing how they are stored.
// Adapters: DuckDB (CSV / Parquet) and the FITS codec.

use std::path::Path;

use crate::domain::photometry::PhotometryTable;
use crate::error::HostError;

pub trait TableReader {
    fn read_table(&self, path: &Path) -> Result<PhotometryTable, HostError>;
}
