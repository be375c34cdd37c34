// frbhost-core/src/infrastructure/codec/mod.rs

pub mod ascii;
pub mod fits;

use std::path::Path;

use crate::domain::photometry::PhotometryTable;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::extension;

pub use ascii::{HeaderStyle, read_ascii_table, render_table, write_ascii_table};
pub use fits::{read_fits_table, write_fits_table};

pub fn is_fits(path: &Path) -> bool {
    matches!(extension(path).as_str(), "fits" | "fit" | "fts")
}

/// Write a data table, FITS or text depending on the extension of `path`.
pub fn write_table(
    path: &Path,
    table: &PhotometryTable,
    overwrite: bool,
) -> Result<(), InfrastructureError> {
    if is_fits(path) {
        write_fits_table(path, table, overwrite)
    } else {
        write_ascii_table(path, table, HeaderStyle::Commented, overwrite)
    }
}
