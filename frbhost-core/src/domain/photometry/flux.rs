// frbhost-core/src/domain/photometry/flux.rs

// Magnitudes -> flux densities in mJy.
// AB bands share one zero point; WISE and VISTA catalogs are Vega-based and
// use the per-band zero points published with each survey.

use crate::domain::error::DomainError;
use crate::domain::photometry::columns::{BandPair, MASK_SENTINEL};
use crate::domain::photometry::table::PhotometryTable;

/// 3631 Jy expressed in mJy.
pub const AB_ZERO_POINT_MJY: f64 = 3_630_780.5;

/// Magnitudes below this are catalog sentinels (-99, -999), not measurements.
const BAD_MAG_LIMIT: f64 = -10.0;

const WISE_ZERO_POINTS_JY: [(&str, f64); 4] = [
    ("1", 309.54),
    ("2", 171.787),
    ("3", 31.674),
    ("4", 8.363),
];

const VISTA_ZERO_POINTS_JY: [(&str, f64); 4] = [
    ("Y", 2087.32),
    ("J", 1554.03),
    ("H", 1030.40),
    ("Ks", 674.83),
];

/// Zero point (mJy) for a band, Vega bands first, AB otherwise.
pub fn zero_point_mjy(band: &str) -> f64 {
    if band.contains("WISE") && !band.contains("WFC3") {
        for (suffix, jy) in WISE_ZERO_POINTS_JY {
            if band.ends_with(suffix) {
                return jy * 1000.0;
            }
        }
    }
    if band.contains("VISTA")
        && let Some(filter) = band.rsplit('_').next()
    {
        for (name, jy) in VISTA_ZERO_POINTS_JY {
            if filter == name {
                return jy * 1000.0;
            }
        }
    }
    AB_ZERO_POINT_MJY
}

/// Convert one magnitude / error pair. Unusable inputs map to the sentinel.
pub fn mag_to_flux(mag: Option<f64>, mag_err: Option<f64>, zero_point: f64) -> (f64, f64) {
    let flux = match mag {
        Some(m) if m.is_finite() && m > BAD_MAG_LIMIT => zero_point * 10f64.powf(-m / 2.5),
        _ => return (MASK_SENTINEL, MASK_SENTINEL),
    };
    let err = match mag_err {
        Some(e) if e.is_finite() && e >= 0.0 => flux * (10f64.powf(e / 2.5) - 1.0),
        _ => MASK_SENTINEL,
    };
    (flux, err)
}

/// Replace every magnitude pair of `table` by fluxes, in place.
pub fn convert_mags_to_flux(
    table: &mut PhotometryTable,
    pairs: &[BandPair],
) -> Result<(), DomainError> {
    for pair in pairs {
        let mags = table.floats(&pair.band)?;
        let errs = table.floats(&pair.error)?;
        let zp = zero_point_mjy(&pair.band);

        let (fluxes, flux_errs): (Vec<_>, Vec<_>) = mags
            .into_iter()
            .zip(errs)
            .map(|(m, e)| {
                let (f, fe) = mag_to_flux(m, e, zp);
                (Some(f), Some(fe))
            })
            .unzip();

        table.set_floats(&pair.band, fluxes)?;
        table.set_floats(&pair.error, flux_errs)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::photometry::table::Column;
    use anyhow::Result;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_ab_magnitude_zero_is_3631_jy() {
        let (f, _) = mag_to_flux(Some(0.0), Some(0.1), AB_ZERO_POINT_MJY);
        assert!(close(f, 3_630_780.5));
    }

    #[test]
    fn test_ab_magnitude_20() {
        // 20 mag AB = 3631 Jy * 1e-8 = 3.6308e-2 mJy
        let (f, e) = mag_to_flux(Some(20.0), Some(0.1), AB_ZERO_POINT_MJY);
        assert!(close(f, 0.036307805));
        assert!(close(e, f * (10f64.powf(0.04) - 1.0)));
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(mag_to_flux(None, Some(0.1), 1.0), (-99.0, -99.0));
        assert_eq!(mag_to_flux(Some(-99.0), Some(0.1), 1.0), (-99.0, -99.0));
        let (f, e) = mag_to_flux(Some(18.0), Some(-999.0), AB_ZERO_POINT_MJY);
        assert!(f > 0.0);
        assert_eq!(e, -99.0);
    }

    #[test]
    fn test_vega_zero_points() {
        assert!(close(zero_point_mjy("WISE1"), 309_540.0));
        assert!(close(zero_point_mjy("WISE_W4"), 8_363.0));
        assert!(close(zero_point_mjy("VISTA_Ks"), 674_830.0));
        assert!(close(zero_point_mjy("DES_g"), AB_ZERO_POINT_MJY));
        assert!(close(zero_point_mjy("WFC3_F160W"), AB_ZERO_POINT_MJY));
    }

    #[test]
    fn test_convert_table_in_place() -> Result<()> {
        let mut table = PhotometryTable::from_columns(vec![
            Column::floats("DES_g", vec![Some(20.0), None]),
            Column::floats("DES_g_err", vec![Some(0.05), Some(0.1)]),
        ])?;
        convert_mags_to_flux(&mut table, &[BandPair::new("DES_g")])?;
        let flux = table.floats("DES_g")?;
        assert!(close(flux[0].unwrap_or_default(), 0.036307805));
        assert_eq!(flux[1], Some(-99.0));
        assert_eq!(table.floats("DES_g_err")?[1], Some(-99.0));
        Ok(())
    }
}
