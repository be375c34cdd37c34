// frbhost-core/src/domain/sed/mod.rs

pub mod config;
pub mod modules;
pub mod params;

pub use config::{
    ANALYSIS_METHOD, AnalysisParams, CigaleConfig, ConfigRequest, DEFAULT_CONFIG_FILE,
    DEFAULT_DATA_FILE,
};
pub use modules::{DEFAULT_SED_MODULES, default_modules, default_params};
pub use params::{ModuleParams, ParamValue};
