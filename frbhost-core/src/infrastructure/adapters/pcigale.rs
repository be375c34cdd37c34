// frbhost-core/src/infrastructure/adapters/pcigale.rs

use std::path::Path;
use tracing::{info, instrument};

use crate::domain::ports::fitter::SedFitter;
use crate::error::HostError;
use crate::infrastructure::adapters::process::run_tool;

pub const DEFAULT_PCIGALE: &str = "pcigale";
pub const DEFAULT_PCIGALE_PLOTS: &str = "pcigale-plots";

/// CIGALE driven through its command-line entry points.
#[derive(Debug, Clone)]
pub struct PcigaleCommand {
    pub fit_command: String,
    pub plot_command: String,
}

impl Default for PcigaleCommand {
    fn default() -> Self {
        Self {
            fit_command: DEFAULT_PCIGALE.to_string(),
            plot_command: DEFAULT_PCIGALE_PLOTS.to_string(),
        }
    }
}

/// pcigale looks for `pcigale.ini` in its working directory.
fn working_dir(config_file: &Path) -> &Path {
    match config_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn config_arg(config_file: &Path) -> Vec<String> {
    config_file
        .file_name()
        .map(|n| vec!["-c".to_string(), n.to_string_lossy().into_owned()])
        .unwrap_or_default()
}

impl SedFitter for PcigaleCommand {
    #[instrument(skip(self), fields(config = %config_file.display()))]
    fn fit(&self, config_file: &Path) -> Result<(), HostError> {
        let mut args = config_arg(config_file);
        args.push("run".to_string());
        run_tool(&self.fit_command, &args, Some(working_dir(config_file)))?;
        info!("CIGALE fit finished");
        Ok(())
    }

    #[instrument(skip(self), fields(config = %config_file.display()))]
    fn plot(&self, config_file: &Path) -> Result<(), HostError> {
        let mut args = config_arg(config_file);
        args.push("sed".to_string());
        run_tool(&self.plot_command, &args, Some(working_dir(config_file)))?;
        info!("CIGALE SED plots written");
        Ok(())
    }
}
