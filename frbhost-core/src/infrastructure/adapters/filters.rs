// frbhost-core/src/infrastructure/adapters/filters.rs

// Band name -> pivot wavelength (nm).
// Two sources: a pivot table from the project config and a CIGALE filter
// directory holding `<name>.dat` transmission curves.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::ports::filters::FilterCatalog;
use crate::error::HostError;
use crate::infrastructure::error::InfrastructureError;

const FILTER_EXTENSION: &str = "dat";

// --- PIVOT TABLE ---

#[derive(Debug, Clone, Default)]
pub struct PivotTable {
    pivots_nm: BTreeMap<String, f64>,
}

impl PivotTable {
    pub fn new(pivots_nm: BTreeMap<String, f64>) -> Self {
        Self { pivots_nm }
    }
}

impl FilterCatalog for PivotTable {
    fn pivot_wavelength(&self, name: &str) -> Result<f64, HostError> {
        self.pivots_nm
            .get(name)
            .copied()
            .ok_or_else(|| InfrastructureError::UnknownFilter(name.to_string()).into())
    }
}

// --- FILTER DIRECTORY ---

/// `sqrt(∫T·λ dλ / ∫T/λ dλ)` by the trapezoid rule.
pub fn pivot_from_curve(curve: &[(f64, f64)]) -> Option<f64> {
    let mut num = 0.0;
    let mut den = 0.0;
    for w in curve.windows(2) {
        let ((l0, t0), (l1, t1)) = (w[0], w[1]);
        let dl = l1 - l0;
        if l0 <= 0.0 || dl < 0.0 {
            return None;
        }
        num += 0.5 * (t0 * l0 + t1 * l1) * dl;
        den += 0.5 * (t0 / l0 + t1 / l1) * dl;
    }
    (den > 0.0 && num > 0.0).then(|| (num / den).sqrt())
}

/// Wavelength / transmission pairs of a CIGALE filter file; `#` lines skipped.
pub fn parse_curve(text: &str) -> Result<Vec<(f64, f64)>, String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| {
            let mut it = l.split_whitespace().map(str::parse::<f64>);
            match (it.next(), it.next()) {
                (Some(Ok(lambda)), Some(Ok(trans))) => Ok((lambda, trans)),
                _ => Err(format!("bad filter line '{l}'")),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct FilterDirectory {
    root: PathBuf,
}

impl FilterDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .map(|e| e.into_path())
            .find(|p| {
                p.extension().is_some_and(|e| e == FILTER_EXTENSION)
                    && p.file_stem().is_some_and(|s| s == name)
            })
    }

    fn read_pivot(path: &Path) -> Result<f64, InfrastructureError> {
        let text = fs::read_to_string(path)?;
        let curve = parse_curve(&text).map_err(InfrastructureError::ConfigError)?;
        pivot_from_curve(&curve).ok_or_else(|| {
            InfrastructureError::ConfigError(format!(
                "Filter curve '{}' has no usable transmission",
                path.display()
            ))
        })
    }
}

impl FilterCatalog for FilterDirectory {
    fn pivot_wavelength(&self, name: &str) -> Result<f64, HostError> {
        let path = self
            .find(name)
            .ok_or_else(|| InfrastructureError::UnknownFilter(name.to_string()))?;
        debug!(filter = name, path = %path.display(), "Filter curve found");
        Ok(Self::read_pivot(&path)?)
    }
}

// --- CHAIN ---

/// Asks each catalog in turn; the first hit wins.
#[derive(Default)]
pub struct ChainedCatalog {
    catalogs: Vec<Box<dyn FilterCatalog>>,
}

impl ChainedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, catalog: impl FilterCatalog + 'static) -> Self {
        self.catalogs.push(Box::new(catalog));
        self
    }
}

impl FilterCatalog for ChainedCatalog {
    fn pivot_wavelength(&self, name: &str) -> Result<f64, HostError> {
        for catalog in &self.catalogs {
            match catalog.pivot_wavelength(name) {
                Ok(pivot) => return Ok(pivot),
                Err(HostError::Infrastructure(InfrastructureError::UnknownFilter(_))) => {}
                Err(e) => warn!(filter = name, error = %e, "Filter lookup failed"),
            }
        }
        Err(InfrastructureError::UnknownFilter(name.to_string()).into())
    }
}
