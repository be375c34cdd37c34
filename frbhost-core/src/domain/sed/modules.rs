// frbhost-core/src/domain/sed/modules.rs

// Default SED modules and their starting parameter grids.
// Values are physically motivated starting points for FRB host galaxies.

use crate::domain::sed::params::{ModuleParams, ParamValue};

pub const DEFAULT_SED_MODULES: [&str; 7] = [
    "sfhdelayed",
    "bc03",
    "nebular",
    "dustatt_calzleit",
    "dale2014",
    "restframe_parameters",
    "redshifting",
];

type DefaultsFn = fn() -> ModuleParams;

/// Module name -> producer of its default parameter set.
const DEFAULTS_TABLE: [(&str, DefaultsFn); 7] = [
    ("sfhdelayed", sfhdelayed),
    ("bc03", bc03),
    ("nebular", nebular),
    ("dustatt_calzleit", dustatt_calzleit),
    ("dale2014", dale2014),
    ("restframe_parameters", restframe_parameters),
    ("redshifting", redshifting),
];

pub fn default_modules() -> Vec<String> {
    DEFAULT_SED_MODULES.iter().map(|m| m.to_string()).collect()
}

pub fn has_defaults(module: &str) -> bool {
    DEFAULTS_TABLE.iter().any(|(name, _)| *name == module)
}

/// Default parameters of `module`; empty for modules without an entry.
pub fn default_params(module: &str) -> ModuleParams {
    DEFAULTS_TABLE
        .iter()
        .find(|(name, _)| *name == module)
        .map(|(_, producer)| producer())
        .unwrap_or_default()
}

/// `n` points evenly spaced in log10 between `10^start` and `10^end`.
pub fn log_space(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![10f64.powf(start)],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| 10f64.powf(start + step * i as f64))
                .collect()
        }
    }
}

fn params(entries: Vec<(&str, ParamValue)>) -> ModuleParams {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn sfhdelayed() -> ModuleParams {
    params(vec![
        // e-folding time of the main population (Myr)
        ("tau_main", ParamValue::floats(&log_space(1.0, 3.0, 10))),
        // age (Myr)
        ("age_main", ParamValue::floats(&log_space(3.0, 4.0, 10))),
        ("tau_burst", ParamValue::Float(50.0)),
        ("age_burst", ParamValue::Float(20.0)),
        // burst fraction by mass
        ("f_burst", ParamValue::Float(0.0)),
        // SFR at t = 0 (Msun/yr)
        ("sfr_A", ParamValue::Float(0.1)),
        ("normalise", ParamValue::Bool(false)),
    ])
}

fn bc03() -> ModuleParams {
    params(vec![
        // 0: Salpeter, 1: Chabrier
        ("imf", ParamValue::Int(1)),
        (
            "metallicity",
            ParamValue::floats(&[0.0001, 0.0004, 0.004, 0.008, 0.02, 0.05]),
        ),
        // young/old separation (Myr)
        ("separation_age", ParamValue::Int(10)),
    ])
}

fn nebular() -> ModuleParams {
    params(vec![
        ("logU", ParamValue::Float(-2.0)),
        ("f_esc", ParamValue::Float(0.0)),
        ("f_dust", ParamValue::Float(0.0)),
        ("lines_width", ParamValue::Float(300.0)),
        ("emission", ParamValue::Bool(true)),
    ])
}

fn dustatt_calzleit() -> ModuleParams {
    params(vec![
        (
            "E_BVs_young",
            ParamValue::floats(&[0.12, 0.25, 0.37, 0.5, 0.62, 0.74, 0.86]),
        ),
        ("E_BVs_old_factor", ParamValue::Float(1.0)),
        // UV bump centre and FWHM (nm)
        ("uv_bump_wavelength", ParamValue::Float(217.5)),
        ("uv_bump_width", ParamValue::Float(35.0)),
        // 3 for the Milky Way
        ("uv_bump_amplitude", ParamValue::Float(0.0)),
        ("powerlaw_slope", ParamValue::Float(0.0)),
        ("filters", ParamValue::text("B_B90 & V_B90 & FUV")),
    ])
}

fn dale2014() -> ModuleParams {
    params(vec![
        ("fracAGN", ParamValue::floats(&[0.0, 0.05, 0.1, 0.2])),
        ("alpha", ParamValue::Float(2.0)),
    ])
}

fn restframe_parameters() -> ModuleParams {
    params(vec![
        ("beta_calz94", ParamValue::Bool(false)),
        ("D4000", ParamValue::Bool(false)),
        ("IRX", ParamValue::Bool(false)),
        ("EW_lines", ParamValue::text("500.7/1.0 & 656.3/1.0")),
        ("luminosity_filters", ParamValue::text("u_prime & r_prime")),
        ("colours_filters", ParamValue::text("u_prime-r_prime")),
    ])
}

fn redshifting() -> ModuleParams {
    // empty: use the redshifts of the input table
    params(vec![("redshift", ParamValue::text(""))])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_module_has_an_entry() {
        for module in DEFAULT_SED_MODULES {
            assert!(has_defaults(module), "{module}");
            assert!(!default_params(module).is_empty(), "{module}");
        }
    }

    #[test]
    fn test_tau_main_grid() {
        let sfh = default_params("sfhdelayed");
        let grid = sfh["tau_main"].as_list().unwrap_or_default();
        assert_eq!(grid.len(), 10);

        let values: Vec<f64> = grid
            .iter()
            .filter_map(|v| match v {
                ParamValue::Float(x) => Some(*x),
                _ => None,
            })
            .collect();
        assert!((values[0] - 10.0).abs() < 1e-9);
        assert!((values[9] - 1000.0).abs() < 1e-9);
        // constant ratio between neighbours
        let ratio = values[1] / values[0];
        for w in values.windows(2) {
            assert!((w[1] / w[0] - ratio).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unknown_module_has_no_defaults() {
        assert!(!has_defaults("m2005"));
        assert!(default_params("m2005").is_empty());
    }

    #[test]
    fn test_log_space_edges() {
        assert!(log_space(0.0, 1.0, 0).is_empty());
        assert_eq!(log_space(2.0, 3.0, 1), vec![100.0]);
    }
}
