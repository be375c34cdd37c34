// frbhost-core/src/domain/photometry/columns.rs

// Column-name heuristics for survey catalogs (DES, DECaLS, SDSS, Pan-STARRS, WISE).
// Surveys are recognised by naming convention only.

use crate::domain::error::DomainError;

pub const ERR_SUFFIX: &str = "_err";
pub const ID_MARKER: &str = "ID";

/// Value written in place of masked cross-match entries and unusable photometry.
pub const MASK_SENTINEL: f64 = -99.0;

const WISE_SHORT: char = 'W';
const WISE_FULL: &str = "WISE";
const DECALS_MARKER: &str = "DECaL";
const DECALS_PREFIX: &str = "DECaL_";
const DES_Y_UPPER: &str = "DES_Y";
const DES_Y_LOWER: &str = "DES_y";

/// A magnitude column and its uncertainty column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandPair {
    pub band: String,
    pub error: String,
}

impl BandPair {
    pub fn new(band: impl Into<String>) -> Self {
        let band = band.into();
        let error = format!("{band}{ERR_SUFFIX}");
        Self { band, error }
    }
}

/// Find `<band>` / `<band>_err` pairs, in table order of the error columns.
pub fn detect_mag_columns(names: &[String]) -> Vec<BandPair> {
    names
        .iter()
        .filter_map(|name| name.strip_suffix(ERR_SUFFIX))
        .filter(|band| !band.is_empty() && names.iter().any(|n| n == band))
        .map(BandPair::new)
        .collect()
}

/// Locate the unique column whose name contains `ID` (case-sensitive).
pub fn find_identifier(names: &[String]) -> Result<String, DomainError> {
    let candidates: Vec<String> = names
        .iter()
        .filter(|n| n.contains(ID_MARKER))
        .cloned()
        .collect();
    match candidates.len() {
        0 => Err(DomainError::MissingIdentifier(ID_MARKER.to_string())),
        1 => Ok(candidates.into_iter().next().unwrap_or_default()),
        _ => Err(DomainError::AmbiguousIdentifier(candidates)),
    }
}

/// How one photometric column is renamed for CIGALE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandRename {
    pub source: String,
    pub target: String,
    /// DECaLS-WISE cross-match columns carry masked entries that must be filled.
    pub fill_masked: bool,
}

/// Canonical CIGALE name of a survey column.
pub fn canonical_band_name(name: &str) -> BandRename {
    let mut target = name.to_string();
    let mut fill_masked = false;

    if target.contains(WISE_SHORT) && !target.contains(WISE_FULL) {
        target = target.replace(WISE_SHORT, WISE_FULL);
        if name.contains(DECALS_MARKER) {
            fill_masked = true;
            target = target.replace(DECALS_PREFIX, "");
        }
    }
    if target.contains(DES_Y_UPPER) {
        target = target.replace(DES_Y_UPPER, DES_Y_LOWER);
    }

    BandRename {
        source: name.to_string(),
        target,
        fill_masked,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_pairs_in_table_order() {
        let cols = names(&[
            "ID", "ra", "dec", "z", "DES_g", "DES_g_err", "DES_Y", "DES_Y_err", "W1", "W1_err",
        ]);
        let pairs = detect_mag_columns(&cols);
        let bands: Vec<&str> = pairs.iter().map(|p| p.band.as_str()).collect();
        assert_eq!(bands, vec!["DES_g", "DES_Y", "W1"]);
        assert_eq!(pairs[2].error, "W1_err");
    }

    #[test]
    fn test_orphan_error_column_is_ignored() {
        let cols = names(&["ID", "r_err", "gerr", "g"]);
        assert!(detect_mag_columns(&cols).is_empty());
    }

    #[test]
    fn test_identifier_lookup() -> Result<()> {
        assert_eq!(find_identifier(&names(&["ra", "objID"]))?, "objID");
        assert!(matches!(
            find_identifier(&names(&["ra", "id"])),
            Err(DomainError::MissingIdentifier(_))
        ));
        assert!(matches!(
            find_identifier(&names(&["ID", "DES_ID"])),
            Err(DomainError::AmbiguousIdentifier(_))
        ));
        Ok(())
    }

    #[test]
    fn test_survey_quirks() {
        assert_eq!(canonical_band_name("W1").target, "WISE1");
        assert_eq!(canonical_band_name("W2_err").target, "WISE2_err");
        assert_eq!(canonical_band_name("WISE_W1").target, "WISE_W1");
        assert_eq!(canonical_band_name("DES_Y").target, "DES_y");
        assert_eq!(canonical_band_name("DES_Y_err").target, "DES_y_err");
        assert_eq!(canonical_band_name("SDSS_r").target, "SDSS_r");

        let xmatch = canonical_band_name("DECaL_W3_err");
        assert_eq!(xmatch.target, "WISE3_err");
        assert!(xmatch.fill_masked);
        assert!(!canonical_band_name("DECaL_g").fill_masked);
    }
}
