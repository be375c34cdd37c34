// frbhost-core/src/infrastructure/adapters/tables.rs

use std::path::Path;
use tracing::info;

use crate::domain::photometry::PhotometryTable;
use crate::error::HostError;
use crate::infrastructure::adapters::duckdb::DuckDbTableReader;
use crate::infrastructure::codec::{is_fits, read_ascii_table, read_fits_table};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::extension;
use crate::ports::table::TableReader;

/// FITS and whitespace-delimited text go through the built-in codecs,
/// CSV and Parquet through DuckDB.
pub struct FileTableReader {
    duckdb: DuckDbTableReader,
}

impl FileTableReader {
    pub fn new() -> Result<Self, InfrastructureError> {
        Ok(Self {
            duckdb: DuckDbTableReader::new()?,
        })
    }
}

impl TableReader for FileTableReader {
    fn read_table(&self, path: &Path) -> Result<PhotometryTable, HostError> {
        let table = if is_fits(path) {
            read_fits_table(path)?
        } else {
            match extension(path).as_str() {
                "csv" | "tsv" | "parquet" | "pq" => self.duckdb.read_table(path)?,
                _ => read_ascii_table(path)?,
            }
        };
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.columns().len(),
            "Table loaded"
        );
        Ok(table)
    }
}
