// frbhost-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::application::records::DEFAULT_RECORDS_DIR;
use crate::infrastructure::adapters::filters::{ChainedCatalog, FilterDirectory, PivotTable};
use crate::infrastructure::adapters::ne2001::{DEFAULT_NE2001, Ne2001Command};
use crate::infrastructure::adapters::pcigale::{
    DEFAULT_PCIGALE, DEFAULT_PCIGALE_PLOTS, PcigaleCommand,
};
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["frbhost.yaml", "frbhost_project_conf.yaml"];

pub const ENV_PCIGALE: &str = "FRBHOST_PCIGALE";
pub const ENV_RECORDS_DIR: &str = "FRBHOST_RECORDS_DIR";
pub const ENV_FILTERS_DIR: &str = "FRBHOST_FILTERS_DIR";

/// Optional `frbhost.yaml`. Every field has a default, so the file itself is
/// optional too.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,

    /// CIGALE entry point (`pcigale run`)
    pub pcigale: String,

    #[serde(rename = "pcigale-plots")]
    pub pcigale_plots: String,

    /// Command printing DM_ISM for `<l> <b> <distance_kpc>`
    pub ne2001: String,

    /// CIGALE filter directory (`<band>.dat` transmission curves)
    #[serde(rename = "filters-dir")]
    pub filters_dir: Option<PathBuf>,

    /// Band -> pivot wavelength (nm), consulted before `filters-dir`
    #[serde(rename = "pivot-wavelengths")]
    pub pivot_wavelengths: BTreeMap<String, f64>,

    /// FRB base table (CSV, Parquet or FITS)
    #[serde(rename = "base-table")]
    pub base_table: Option<PathBuf>,

    #[serde(rename = "records-dir")]
    pub records_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "frbhost".to_string(),
            pcigale: DEFAULT_PCIGALE.to_string(),
            pcigale_plots: DEFAULT_PCIGALE_PLOTS.to_string(),
            ne2001: DEFAULT_NE2001.to_string(),
            filters_dir: None,
            pivot_wavelengths: BTreeMap::new(),
            base_table: None,
            records_dir: PathBuf::from(DEFAULT_RECORDS_DIR),
        }
    }
}

impl ProjectConfig {
    pub fn fitter(&self) -> PcigaleCommand {
        PcigaleCommand {
            fit_command: self.pcigale.clone(),
            plot_command: self.pcigale_plots.clone(),
        }
    }

    pub fn dispersion_model(&self) -> Ne2001Command {
        Ne2001Command {
            command: self.ne2001.clone(),
        }
    }

    /// Pivot table first, then the filter directory when one is configured.
    pub fn filter_catalog(&self, project_dir: &Path) -> ChainedCatalog {
        let catalog = ChainedCatalog::new().with(PivotTable::new(self.pivot_wavelengths.clone()));
        match &self.filters_dir {
            Some(dir) => catalog.with(FilterDirectory::new(resolve(project_dir, dir))),
            None => catalog,
        }
    }
}

/// `path` relative to `project_dir` unless already absolute.
pub fn resolve(project_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let mut config = match find_main_config(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading project configuration");
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                ProjectConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        None => {
            info!("No frbhost.yaml found, using defaults");
            ProjectConfig::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup(ENV_PCIGALE) {
        info!(old = ?config.pcigale, new = ?val, "Overriding pcigale command via ENV");
        config.pcigale = val;
    }
    if let Some(val) = lookup(ENV_RECORDS_DIR) {
        info!(old = ?config.records_dir, new = ?val, "Overriding records dir via ENV");
        config.records_dir = PathBuf::from(val);
    }
    if let Some(val) = lookup(ENV_FILTERS_DIR) {
        info!(old = ?config.filters_dir, new = ?val, "Overriding filters dir via ENV");
        config.filters_dir = Some(PathBuf::from(val));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::ports::filters::FilterCatalog;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() -> Result<()> {
        let dir = tempdir()?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.pcigale, "pcigale");
        assert_eq!(config.records_dir, PathBuf::from("data/FRBs"));
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("frbhost.yaml"),
            "ne2001: python -m ne2001.dm_ism\npivot-wavelengths:\n  DES_g: 481.0\n",
        )?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.ne2001, "python -m ne2001.dm_ism");
        assert_eq!(config.pcigale_plots, "pcigale-plots");
        assert_eq!(
            config.filter_catalog(dir.path()).pivot_wavelength("DES_g")?,
            481.0
        );
        Ok(())
    }

    #[test]
    fn test_bad_yaml_is_reported() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("frbhost.yaml"), "records-dir: [unclosed")?;
        assert!(matches!(
            load_project_config(dir.path()),
            Err(InfrastructureError::YamlError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProjectConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            ENV_PCIGALE => Some("/opt/cigale/bin/pcigale".to_string()),
            ENV_FILTERS_DIR => Some("/opt/cigale/filters".to_string()),
            _ => None,
        });
        assert_eq!(config.pcigale, "/opt/cigale/bin/pcigale");
        assert_eq!(config.filters_dir, Some(PathBuf::from("/opt/cigale/filters")));
        assert_eq!(config.records_dir, PathBuf::from("data/FRBs"));
    }

    #[test]
    fn test_resolve() {
        let root = Path::new("/project");
        assert_eq!(resolve(root, Path::new("data")), PathBuf::from("/project/data"));
        assert_eq!(resolve(root, Path::new("/abs")), PathBuf::from("/abs"));
    }
}
