// frbhost-core/src/infrastructure/adapters/duckdb.rs

// CSV / Parquet ingest. DuckDB infers the schema; every column is then cast to
// one of the three storage kinds of `PhotometryTable`.

use duckdb::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};

use crate::domain::photometry::{Column, ColumnData, PhotometryTable};
use crate::error::HostError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::infrastructure::fs::extension;
use crate::ports::table::TableReader;

const SOURCE_VIEW: &str = "frbhost_source";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageKind {
    Float,
    Int,
    Text,
}

fn storage_kind(duck_type: &str) -> StorageKind {
    let t = duck_type.to_ascii_uppercase();
    if t.starts_with("DOUBLE")
        || t.starts_with("FLOAT")
        || t.starts_with("REAL")
        || t.starts_with("DECIMAL")
    {
        StorageKind::Float
    } else if t.ends_with("INT") || t.ends_with("INTEGER") || t == "BOOLEAN" {
        StorageKind::Int
    } else {
        StorageKind::Text
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub struct DuckDbTableReader {
    conn: Mutex<Connection>,
}

impl DuckDbTableReader {
    pub fn new() -> Result<Self, InfrastructureError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Table function DuckDB uses for `path`.
    fn scan_expr(path: &Path) -> String {
        let literal = quote_literal(&path.to_string_lossy());
        match extension(path).as_str() {
            "parquet" | "pq" => format!("read_parquet({literal})"),
            _ => format!("read_csv_auto({literal})"),
        }
    }

    fn load(conn: &Connection, path: &Path) -> Result<PhotometryTable, InfrastructureError> {
        conn.execute_batch(&format!(
            "CREATE OR REPLACE VIEW {SOURCE_VIEW} AS SELECT * FROM {}",
            Self::scan_expr(path)
        ))?;

        let mut stmt = conn.prepare(&format!("PRAGMA table_info('{SOURCE_VIEW}')"))?;
        let schema = stmt
            .query_map([], |row| {
                let name: String = row.get("name")?;
                let duck_type: String = row.get("type")?;
                Ok((name, duck_type))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut table = PhotometryTable::new();
        for (name, duck_type) in schema {
            let kind = storage_kind(&duck_type);
            debug!(column = %name, %duck_type, ?kind, "Reading column");
            let data = Self::read_column(conn, &name, kind)?;
            table
                .push_column(Column::new(name.clone(), data))
                .map_err(|e| DatabaseError::UnsupportedValue {
                    column: name,
                    kind: e.to_string(),
                })?;
        }
        Ok(table)
    }

    fn read_column(
        conn: &Connection,
        name: &str,
        kind: StorageKind,
    ) -> Result<ColumnData, InfrastructureError> {
        let cast = match kind {
            StorageKind::Float => "DOUBLE",
            StorageKind::Int => "BIGINT",
            StorageKind::Text => "VARCHAR",
        };
        let sql = format!(
            "SELECT CAST({} AS {cast}) FROM {SOURCE_VIEW}",
            quote_ident(name)
        );
        let mut stmt = conn.prepare(&sql)?;

        let data = match kind {
            StorageKind::Float => ColumnData::Float(
                stmt.query_map([], |row| row.get::<_, Option<f64>>(0))?
                    .collect::<Result<_, _>>()?,
            ),
            StorageKind::Int => ColumnData::Int(
                stmt.query_map([], |row| row.get::<_, Option<i64>>(0))?
                    .collect::<Result<_, _>>()?,
            ),
            StorageKind::Text => ColumnData::Text(
                stmt.query_map([], |row| row.get::<_, Option<String>>(0))?
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(data)
    }
}

impl TableReader for DuckDbTableReader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn read_table(&self, path: &Path) -> Result<PhotometryTable, HostError> {
        if !path.exists() {
            return Err(InfrastructureError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("table '{}' not found", path.display()),
            ))
            .into());
        }
        let conn = self
            .conn
            .lock()
            .map_err(|_| HostError::InternalError("DuckDB Mutex Poisoned".into()))?;
        Ok(Self::load(&conn, path)?)
    }
}
