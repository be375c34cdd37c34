// frbhost-core/src/application/compare.rs
//
// Observed vs best-fit model fluxes, one line per band.

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::photometry::columns::ERR_SUFFIX;
use crate::domain::photometry::{Column, PhotometryTable};
use crate::domain::ports::filters::FilterCatalog;
use crate::error::HostError;
use crate::infrastructure::codec::{HeaderStyle, write_ascii_table};
use crate::ports::table::TableReader;

pub const COMPARISON_FILE: &str = "photo_observed_model.dat";
pub const RESULTS_FILE: &str = "results.fits";
const BEST_PREFIX: &str = "best.";
const LINE_PREFIX: &str = "line";
const NM_PER_MICRON: f64 = 1000.0;

/// Bands that have a filter curve: no `_err` columns, no emission lines.
pub fn photometric_bands(bands: &[String]) -> Vec<String> {
    bands
        .iter()
        .filter(|b| !b.ends_with(ERR_SUFFIX) && !b.starts_with(LINE_PREFIX))
        .cloned()
        .collect()
}

fn first_value(table: &PhotometryTable, column: &str) -> Result<Option<f64>, DomainError> {
    let values = table.floats(column)?;
    match values.first() {
        Some(v) => Ok(*v),
        None => Err(DomainError::RowCountMismatch {
            name: column.to_string(),
            expected: 1,
            actual: 0,
        }),
    }
}

/// Build the comparison from the first object of the data file and of
/// `<out_dir>/results.fits`.
pub fn comparison_table(
    bands: &[String],
    observed: &PhotometryTable,
    model: &PhotometryTable,
    filters: &dyn FilterCatalog,
) -> Result<PhotometryTable, HostError> {
    let bands = photometric_bands(bands);
    let mut lambda = Vec::with_capacity(bands.len());
    let mut model_flux = Vec::with_capacity(bands.len());
    let mut obs_flux = Vec::with_capacity(bands.len());
    let mut obs_err = Vec::with_capacity(bands.len());

    for band in &bands {
        lambda.push(Some(filters.pivot_wavelength(band)? / NM_PER_MICRON));
        model_flux.push(first_value(model, &format!("{BEST_PREFIX}{band}"))?);
        obs_flux.push(first_value(observed, band)?);
        obs_err.push(first_value(observed, &format!("{band}{ERR_SUFFIX}"))?);
    }

    Ok(PhotometryTable::from_columns(vec![
        Column::floats("lambda_filter", lambda),
        Column::floats("model_flux", model_flux),
        Column::floats("observed_flux", obs_flux),
        Column::floats("observed_flux_err", obs_err),
    ])?)
}

/// Write `<out_dir>/photo_observed_model.dat`, replacing any previous one.
#[instrument(skip(bands, tables, filters), fields(out_dir = %out_dir.display()))]
pub fn compare_obs_model(
    bands: &[String],
    data_file: &Path,
    out_dir: &Path,
    tables: &dyn TableReader,
    filters: &dyn FilterCatalog,
) -> Result<PathBuf, HostError> {
    let observed = tables.read_table(data_file)?;
    let model = tables.read_table(&out_dir.join(RESULTS_FILE))?;
    let table = comparison_table(bands, &observed, &model, filters)?;

    let path = out_dir.join(COMPARISON_FILE);
    write_ascii_table(&path, &table, HeaderStyle::Plain, true)?;
    info!(bands = table.row_count(), path = %path.display(), "Comparison table written");
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FileTableReader, PivotTable};
    use crate::infrastructure::codec::{read_ascii_table, write_fits_table};
    use anyhow::Result;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_band_filtering() {
        assert_eq!(
            photometric_bands(&names(&["DES_g", "DES_g_err", "line.H-alpha", "WISE1"])),
            names(&["DES_g", "WISE1"])
        );
    }

    #[test]
    fn test_compare_writes_table() -> Result<()> {
        let dir = tempdir()?;
        let data_file = dir.path().join("cigale_in.fits");
        let out_dir = dir.path().join("out");

        let observed = PhotometryTable::from_columns(vec![
            Column::floats("DES_g", vec![Some(0.036), Some(1.0)]),
            Column::floats("DES_g_err", vec![Some(0.002), Some(1.0)]),
        ])?;
        let model = PhotometryTable::from_columns(vec![Column::floats(
            "best.DES_g",
            vec![Some(0.035)],
        )])?;
        write_fits_table(&data_file, &observed, true)?;
        write_fits_table(&out_dir.join(RESULTS_FILE), &model, true)?;

        let filters = PivotTable::new(BTreeMap::from([("DES_g".to_string(), 481.0)]));
        let path = compare_obs_model(
            &names(&["DES_g", "DES_g_err"]),
            &data_file,
            &out_dir,
            &FileTableReader::new()?,
            &filters,
        )?;

        let back = read_ascii_table(&path)?;
        assert_eq!(
            back.column_names(),
            names(&["lambda_filter", "model_flux", "observed_flux", "observed_flux_err"])
        );
        assert_eq!(back.floats("lambda_filter")?, vec![Some(0.481)]);
        assert_eq!(back.floats("model_flux")?, vec![Some(0.035)]);
        assert_eq!(back.floats("observed_flux_err")?, vec![Some(0.002)]);
        Ok(())
    }

    #[test]
    fn test_unknown_filter_is_an_error() -> Result<()> {
        let observed = PhotometryTable::from_columns(vec![
            Column::floats("X", vec![Some(1.0)]),
            Column::floats("X_err", vec![Some(0.1)]),
        ])?;
        let model =
            PhotometryTable::from_columns(vec![Column::floats("best.X", vec![Some(1.0)])])?;
        let res = comparison_table(&names(&["X"]), &observed, &model, &PivotTable::default());
        assert!(res.is_err());
        Ok(())
    }
}
