// frbhost-core/src/domain/sed/config.rs

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::error::DomainError;
use crate::domain::sed::modules::{default_modules, default_params};
use crate::domain::sed::params::{ModuleParams, ParamValue};

pub const DEFAULT_DATA_FILE: &str = "cigale_in.fits";
pub const DEFAULT_CONFIG_FILE: &str = "pcigale.ini";
pub const ANALYSIS_METHOD: &str = "pdf_analysis";

/// Settings of the PDF analysis module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisParams {
    pub variables: Vec<String>,
    pub bands: Vec<String>,
    pub save_best_sed: bool,
    pub save_chi2: bool,
    pub lim_flag: bool,
    pub mock_flag: bool,
    pub redshift_decimals: u32,
    pub blocks: u32,
}

impl AnalysisParams {
    fn with_bands(bands: Vec<String>) -> Self {
        Self {
            variables: Vec::new(),
            bands,
            save_best_sed: true,
            save_chi2: false,
            lim_flag: true,
            mock_flag: false,
            redshift_decimals: 2,
            blocks: 1,
        }
    }

    /// `(key, value)` pairs in `[analysis_params]` order.
    pub fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        let texts = |v: &[String]| ParamValue::List(v.iter().map(|s| ParamValue::text(s)).collect());
        vec![
            ("variables", texts(&self.variables)),
            ("bands", texts(&self.bands)),
            ("save_best_sed", ParamValue::Bool(self.save_best_sed)),
            ("save_chi2", ParamValue::Bool(self.save_chi2)),
            ("lim_flag", ParamValue::Bool(self.lim_flag)),
            ("mock_flag", ParamValue::Bool(self.mock_flag)),
            (
                "redshift_decimals",
                ParamValue::Int(i64::from(self.redshift_decimals)),
            ),
            ("blocks", ParamValue::Int(i64::from(self.blocks))),
        ]
    }
}

/// What the caller asks for. `None` fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigRequest {
    pub data_file: String,
    pub cores: Option<usize>,
    pub sed_modules: Option<Vec<String>>,
    pub module_params: Option<BTreeMap<String, ModuleParams>>,
    /// Flux columns of the data file, written to `analysis_params.bands`.
    pub bands: Vec<String>,
}

/// Complete CIGALE configuration, ready to be rendered to `pcigale.ini`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CigaleConfig {
    pub data_file: String,
    pub parameters_file: String,
    pub sed_modules: Vec<String>,
    pub analysis_method: String,
    pub cores: usize,
    /// One entry per module, in `sed_modules` order.
    pub sed_modules_params: Vec<(String, ModuleParams)>,
    pub analysis_params: AnalysisParams,
}

impl CigaleConfig {
    /// Assemble a configuration.
    ///
    /// A module list other than the default requires `module_params` to cover
    /// every module. Modules without an override get their default set; an
    /// override replaces the whole set of its module.
    pub fn build(request: ConfigRequest, available_cores: usize) -> Result<Self, DomainError> {
        let defaults = default_modules();
        let sed_modules = request.sed_modules.unwrap_or_else(|| defaults.clone());
        let overrides = request.module_params.unwrap_or_default();

        if sed_modules != defaults {
            let missing: Vec<String> = sed_modules
                .iter()
                .filter(|m| !overrides.contains_key(*m))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(DomainError::ModuleParamsMissing(missing));
            }
        }

        let sed_modules_params = sed_modules
            .iter()
            .map(|module| {
                let params = overrides
                    .get(module)
                    .cloned()
                    .unwrap_or_else(|| default_params(module));
                (module.clone(), params)
            })
            .collect();

        Ok(Self {
            data_file: request.data_file,
            parameters_file: String::new(),
            sed_modules,
            analysis_method: ANALYSIS_METHOD.to_string(),
            cores: request.cores.unwrap_or(available_cores).max(1),
            sed_modules_params,
            analysis_params: AnalysisParams::with_bands(request.bands),
        })
    }

    pub fn module_params(&self, module: &str) -> Option<&ModuleParams> {
        self.sed_modules_params
            .iter()
            .find(|(name, _)| name == module)
            .map(|(_, p)| p)
    }
}

/// Override entries naming modules that are not in the module list.
pub fn unused_overrides(
    sed_modules: &[String],
    overrides: &BTreeMap<String, ModuleParams>,
) -> Vec<String> {
    overrides
        .keys()
        .filter(|k| !sed_modules.contains(k))
        .cloned()
        .collect()
}
