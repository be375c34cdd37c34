// frbhost-core/src/application/translate.rs
//
// USE CASE: survey catalog -> CIGALE input table.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::photometry::{
    BandPair, MASK_SENTINEL, PhotometryTable, canonical_band_name, convert_mags_to_flux,
    detect_mag_columns, find_identifier,
};
use crate::error::HostError;
use crate::infrastructure::codec::write_table;

pub const ID_COLUMN: &str = "id";
pub const REDSHIFT_COLUMN: &str = "redshift";

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationReport {
    pub path: PathBuf,
    pub rows: usize,
    /// Flux columns in output order, errors included.
    pub bands: Vec<String>,
}

/// Rename one photometric column to its CIGALE name, filling masked
/// cross-match entries first.
fn canonicalise(table: &mut PhotometryTable, column: &str) -> Result<String, DomainError> {
    let rename = canonical_band_name(column);
    if rename.fill_masked {
        table.fill_masked(&rename.source, MASK_SENTINEL)?;
    }
    if rename.target != rename.source {
        debug!(from = %rename.source, to = %rename.target, "Renaming band");
    }
    table.rename_column(&rename.source, &rename.target)?;
    Ok(rename.target)
}

fn identifier_column(table: &PhotometryTable) -> Result<String, DomainError> {
    match find_identifier(&table.column_names()) {
        Err(DomainError::MissingIdentifier(_)) if table.has_column(ID_COLUMN) => {
            Ok(ID_COLUMN.to_string())
        }
        other => other,
    }
}

/// Reshape `table` into `id, redshift, <band>, <band>_err, ...` with fluxes in
/// mJy, without writing anything.
pub fn to_cigale_table(
    table: &PhotometryTable,
    zcol: &str,
) -> Result<(PhotometryTable, Vec<BandPair>), DomainError> {
    if !table.has_column(zcol) {
        return Err(DomainError::MissingColumn(zcol.to_string()));
    }

    let pairs = detect_mag_columns(&table.column_names());
    let mut out = table.clone();
    out.rename_column(zcol, REDSHIFT_COLUMN)?;

    let mut renamed = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        let band = canonicalise(&mut out, &pair.band)?;
        let error = canonicalise(&mut out, &pair.error)?;
        renamed.push(BandPair { band, error });
    }

    let id = identifier_column(&out)?;
    out.rename_column(&id, ID_COLUMN)?;

    convert_mags_to_flux(&mut out, &renamed)?;

    let mut projection = vec![ID_COLUMN.to_string(), REDSHIFT_COLUMN.to_string()];
    for pair in &renamed {
        projection.push(pair.band.clone());
        projection.push(pair.error.clone());
    }
    Ok((out.select(&projection)?, renamed))
}

/// Translate and write the CIGALE data file.
/// The format follows the extension of `data_file` (FITS or text).
#[instrument(skip(table), fields(data_file = %data_file.display()))]
pub fn translate_catalog(
    table: &PhotometryTable,
    zcol: &str,
    data_file: &Path,
    overwrite: bool,
) -> Result<TranslationReport, HostError> {
    let (cigale_table, pairs) = to_cigale_table(table, zcol)?;
    write_table(data_file, &cigale_table, overwrite)?;

    let bands: Vec<String> = pairs
        .into_iter()
        .flat_map(|p| [p.band, p.error])
        .collect();
    info!(
        rows = cigale_table.row_count(),
        bands = bands.len(),
        "CIGALE input table written"
    );

    Ok(TranslationReport {
        path: data_file.to_path_buf(),
        rows: cigale_table.row_count(),
        bands,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::photometry::{Column, ColumnData};
    use crate::infrastructure::codec::read_fits_table;
    use crate::infrastructure::error::InfrastructureError;
    use anyhow::Result;
    use tempfile::tempdir;

    fn catalog() -> Result<PhotometryTable> {
        let mag = |v: f64| Column::floats("", vec![Some(v), Some(v + 1.0)]);
        let named = |name: &str, v: f64| Column {
            name: name.to_string(),
            ..mag(v)
        };
        Ok(PhotometryTable::from_columns(vec![
            Column::new(
                "ID",
                ColumnData::Text(vec![Some("J0158".into()), Some("J0532".into())]),
            ),
            named("ra", 29.5),
            named("dec", 65.7),
            named("z", 0.03),
            named("DES_g", 20.0),
            named("DES_g_err", 0.05),
            named("DES_Y", 19.0),
            named("DES_Y_err", 0.1),
            named("W1", 15.0),
            named("W1_err", 0.02),
        ])?)
    }

    #[test]
    fn test_end_to_end_fits_output() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cigale_in.fits");

        let report = translate_catalog(&catalog()?, "z", &path, true)?;
        assert_eq!(report.rows, 2);

        let back = read_fits_table(&path)?;
        assert_eq!(
            back.column_names(),
            vec![
                "id",
                "redshift",
                "DES_g",
                "DES_g_err",
                "DES_y",
                "DES_y_err",
                "WISE1",
                "WISE1_err"
            ]
        );
        assert_eq!(
            report.bands,
            vec!["DES_g", "DES_g_err", "DES_y", "DES_y_err", "WISE1", "WISE1_err"]
        );

        // 20 mag AB -> 3.6308e-2 mJy
        let g = back.floats("DES_g")?[0].unwrap();
        assert!((g - 0.036_307_805).abs() < 1e-8);
        // W1 is Vega: 309.54 Jy zero point
        let w1 = back.floats("WISE1")?[0].unwrap();
        assert!((w1 - 309_540.0 * 10f64.powf(-6.0)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_missing_zcol() -> Result<()> {
        let dir = tempdir()?;
        let res = translate_catalog(&catalog()?, "photo_z", &dir.path().join("x.fits"), true);
        assert!(matches!(
            res,
            Err(HostError::Domain(DomainError::MissingColumn(c))) if c == "photo_z"
        ));
        assert!(!dir.path().join("x.fits").exists());
        Ok(())
    }

    #[test]
    fn test_identifier_problems_are_explicit() -> Result<()> {
        let mut no_id = catalog()?;
        no_id.rename_column("ID", "name")?;
        assert!(matches!(
            to_cigale_table(&no_id, "z"),
            Err(DomainError::MissingIdentifier(_))
        ));

        let mut two_ids = catalog()?;
        two_ids.push_column(Column::floats("objID", vec![Some(1.0), Some(2.0)]))?;
        assert!(matches!(
            to_cigale_table(&two_ids, "z"),
            Err(DomainError::AmbiguousIdentifier(_))
        ));
        Ok(())
    }

    #[test]
    fn test_decals_wise_masked_entries() -> Result<()> {
        let table = PhotometryTable::from_columns(vec![
            Column::new("ID", ColumnData::Int(vec![Some(1), Some(2)])),
            Column::floats("z", vec![Some(0.1), Some(0.2)]),
            Column::floats("DECaL_W2", vec![None, Some(16.0)]),
            Column::floats("DECaL_W2_err", vec![None, Some(0.1)]),
        ])?;
        let (out, _) = to_cigale_table(&table, "z")?;
        assert_eq!(
            out.column_names(),
            vec!["id", "redshift", "WISE2", "WISE2_err"]
        );
        // Masked magnitudes become -99 before conversion and stay sentinels
        assert_eq!(out.floats("WISE2")?[0], Some(-99.0));
        assert_eq!(out.floats("WISE2_err")?[0], Some(-99.0));
        Ok(())
    }

    #[test]
    fn test_text_output_and_overwrite() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cigale_in.txt");
        translate_catalog(&catalog()?, "z", &path, false)?;
        assert!(std::fs::read_to_string(&path)?.starts_with("# "));

        let again = translate_catalog(&catalog()?, "z", &path, false);
        assert!(matches!(
            again,
            Err(HostError::Infrastructure(InfrastructureError::OutputExists(_)))
        ));
        Ok(())
    }
}
